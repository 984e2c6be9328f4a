//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! crawl cycle end-to-end, plus an in-memory fetcher for scenarios that
//! need real host names.

use async_trait::async_trait;
use site_census::config::{load_config_with_hash, Config, CrawlerConfig};
use site_census::crawler::{Coordinator, FetchResult, Fetcher};
use site_census::output::{write_all, CrawlReport, JsonOutput, MarkdownOutput, OutputHandler, SqliteOutputHandler};
use site_census::state::CrawlPhase;
use site_census::storage::{HostScope, SqliteStorage, Storage};
use site_census::{crawl, CensusError, CrawlStatistics};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given budget
fn create_test_config(budget: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            page_budget: budget,
            workers: 4,
            request_timeout_ms: 2000,
            ..CrawlerConfig::default()
        },
        ..Config::default()
    }
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Serves a fixed set of pages keyed by absolute URL; everything else is 404
struct InMemorySite {
    pages: HashMap<String, String>,
}

impl InMemorySite {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl Fetcher for InMemorySite {
    async fn fetch(&self, url: &Url) -> FetchResult {
        match self.pages.get(url.as_str()) {
            Some(html) => FetchResult::Success {
                final_url: url.clone(),
                status_code: 200,
                body: html.clone(),
                content_type: Some("text/html".to_string()),
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        &format!(
            r#"<html><head><link rel="stylesheet" href="/style.css"></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/report.pdf">Report</a>
            <a href="http://external.com/">Elsewhere</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_html(&mock_server, "/page1", r#"<a href="/">Home</a>"#).await;
    mount_html(&mock_server, "/page2", r#"<a href="/page1">Page 1</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/style.css"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("a { color: red }", "text/css"))
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(&base_url, &create_test_config(10))
        .expect("Failed to create coordinator");
    let state = coordinator.run().await.expect("Crawl failed");

    assert_eq!(state.phase(), CrawlPhase::Completed);
    // The stylesheet is fetched but is not an HTML page
    assert_eq!(state.pages(), 3);
    assert_eq!(state.broken_links(), 1);
    assert_eq!(state.broken()[0].status_code, Some(200));
    assert!(state.broken()[0].url.ends_with("/style.css"));
    // 5 classified on the home page, 1 on each subpage
    assert_eq!(state.total_links(), 7);
    assert_eq!(state.rejected_links(), 1);
    assert_eq!(state.external_resources().len(), 1);
    assert_eq!(state.file_links()[".pdf"].count, 1);

    let page1 = Url::parse(&format!("{}/page1", base_url)).unwrap();
    assert!(state.visited().contains(&page1));
}

#[tokio::test]
async fn test_broken_links_are_counted_not_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/error">Error</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let state = Coordinator::new(&base_url, &create_test_config(10))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages(), 1);
    assert_eq!(state.broken_links(), 2);

    let mut codes: Vec<_> = state.broken().iter().filter_map(|b| b.status_code).collect();
    codes.sort();
    assert_eq!(codes, vec![404, 503]);
}

#[tokio::test]
async fn test_seed_not_found() {
    let mock_server = MockServer::start().await;

    let state = Coordinator::new(&mock_server.uri(), &create_test_config(10))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages(), 0);
    assert_eq!(state.broken_links(), 1);
    assert_eq!(state.phase(), CrawlPhase::Completed);
}

#[tokio::test]
async fn test_redirect_target_is_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", r#"<a href="/old">Old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/new", r#"<a href="/">Home</a>"#).await;

    let state = Coordinator::new(&base_url, &create_test_config(10))
        .unwrap()
        .run()
        .await
        .unwrap();

    let new = Url::parse(&format!("{}/new", base_url)).unwrap();
    let old = Url::parse(&format!("{}/old", base_url)).unwrap();
    assert!(state.visited().contains(&new));
    assert!(!state.visited().contains(&old));
    assert_eq!(state.pages(), 2);
}

#[tokio::test]
async fn test_windows_1251_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // "Привет" in windows-1251
    let mut body = b"<html><body><p>".to_vec();
    body.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
    body.extend_from_slice(br#"</p><a href="/page1">1</a></body></html>"#);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=windows-1251")
                .set_body_bytes(body),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/page1", "").await;

    let fetcher = site_census::HttpFetcher::new(
        &Default::default(),
        Duration::from_secs(2),
        10,
    )
    .unwrap();
    match fetcher.fetch(&Url::parse(&base_url).unwrap()).await {
        FetchResult::Success { body, .. } => assert!(body.contains("Привет")),
        other => panic!("Expected success, got {:?}", other),
    }

    let state = Coordinator::new(&base_url, &create_test_config(10))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(state.pages(), 2);
}

#[tokio::test]
async fn test_budget_is_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_html(&mock_server, "/", &links).await;
    for i in 0..20 {
        mount_html(&mock_server, &format!("/p{}", i), "").await;
    }

    let state = Coordinator::new(&base_url, &create_test_config(3))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages(), 3);
    assert_eq!(state.phase(), CrawlPhase::Exhausted);
    for url in state.frontier().queued_urls() {
        assert!(!state.visited().contains(url));
    }
}

#[tokio::test]
async fn test_connect_timeout_is_broken() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", r#"<a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(10);
    config.crawler.request_timeout_ms = 300;

    let state = Coordinator::new(&base_url, &config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages(), 1);
    assert_eq!(state.broken_links(), 1);
    let slow = Url::parse(&format!("{}/slow", base_url)).unwrap();
    assert!(!state.visited().contains(&slow));
}

#[tokio::test]
async fn test_statistics_scenario_in_memory() {
    let site = InMemorySite::new(&[
        (
            "http://test.com/",
            r#"<a href="/page1">1</a><link href="http://external.com"><img src="/doc.pdf">"#,
        ),
        ("http://test.com/page1", "<p>nothing here</p>"),
    ]);

    let coordinator =
        Coordinator::with_fetcher("http://test.com", &create_test_config(2), Arc::new(site))
            .unwrap();
    let state = coordinator.run().await.unwrap();
    let stats = CrawlStatistics::from_state(&state);

    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.total_links, 3);
    assert_eq!(stats.internal_pages, 1);
    assert_eq!(stats.external_links, 1);
    assert_eq!(stats.file_links[".pdf"].count, 1);
    assert_eq!(stats.broken_links, 0);
}

#[tokio::test]
async fn test_subdomains_are_crawled() {
    let site = InMemorySite::new(&[
        (
            "http://test.com/",
            r#"<a href="http://cs.test.com/">cs</a><a href="http://nottest.com/">x</a>"#,
        ),
        ("http://cs.test.com/", r#"<a href="/staff">staff</a>"#),
        ("http://cs.test.com/staff", ""),
    ]);

    let state = Coordinator::with_fetcher("http://test.com", &create_test_config(10), Arc::new(site))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages(), 3);
    assert!(state.subdomains().contains("cs.test.com"));
    assert!(state.external_resources().contains("nottest.com"));
}

#[tokio::test]
async fn test_malformed_seed() {
    let state = crawl("wrong_url", 10).await.unwrap();

    assert_eq!(state.pages(), 0);
    assert_eq!(state.broken_links(), 1);
    assert_eq!(state.phase(), CrawlPhase::Completed);
}

#[tokio::test]
async fn test_zero_budget_is_an_error() {
    let result = crawl("http://test.com", 0).await;
    assert!(matches!(result, Err(CensusError::InvalidBudget(0))));
}

#[tokio::test]
async fn test_config_file_and_report_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("census.toml");
    std::fs::write(
        &config_path,
        r#"
[crawler]
page-budget = 5
workers = 2
file-extensions = [".pdf", ".xlsx"]
"#,
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(&config_path).unwrap();
    assert_eq!(config.crawler.page_budget, 5);

    let site = InMemorySite::new(&[(
        "http://test.com/",
        r#"<a href="/sheet.XLSX">s</a><a href="/sheet.XLSX">s</a><a href="http://a.org">a</a>"#,
    )]);
    let coordinator =
        Coordinator::with_fetcher("http://test.com", &config, Arc::new(site)).unwrap();
    let state = coordinator.run().await.unwrap();

    let report = CrawlReport::from_state(coordinator.seed_config(), &state).with_config_hash(hash);
    assert_eq!(report.statistics.file_links[".xlsx"].count, 2);
    assert_eq!(report.statistics.unique_file_links, 1);

    let storage = Arc::new(Mutex::new(SqliteStorage::new(&dir.path().join("census.db")).unwrap()));
    let sqlite_handler = SqliteOutputHandler::new(storage.clone());
    let handlers: Vec<Box<dyn OutputHandler>> = vec![
        Box::new(JsonOutput::new(dir.path().join("report.json"))),
        Box::new(MarkdownOutput::new(dir.path().join("summary.md"))),
    ];
    write_all(&handlers, &report).unwrap();
    sqlite_handler.write_report(&report).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(json["statistics"]["total_pages"], 1);
    assert_eq!(json["external_resources"][0], "a.org");

    let summary = std::fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(summary.contains("| .xlsx | 2 | 1 |"));

    let run_id = sqlite_handler.last_run_id().unwrap();
    let storage = storage.lock().unwrap();
    let run = storage.get_run(run_id).unwrap();
    assert_eq!(run.outcome, CrawlPhase::Completed);
    assert_eq!(run.config_hash, report.config_hash);
    assert_eq!(
        storage.get_hosts(run_id, HostScope::External).unwrap(),
        vec!["a.org"]
    );
}
