use serde::Deserialize;

/// Default page budget when neither the config file nor the CLI sets one
pub const DEFAULT_PAGE_BUDGET: usize = 100;

/// Default number of concurrent fetch workers
pub const DEFAULT_WORKERS: usize = 8;

/// Upper bound on concurrent fetch workers
pub const MAX_WORKERS: usize = 64;

/// Default per-request timeout (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Default redirect hop limit
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Document extensions recognized when no list is configured
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Main configuration structure for Site-Census
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of distinct pages to fetch
    #[serde(rename = "page-budget", default = "default_page_budget")]
    pub page_budget: usize,

    /// Number of concurrent fetch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Timeout for each individual request (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum number of redirect hops followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Path suffixes counted as document links (leading dot, any case)
    #[serde(rename = "file-extensions", default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_budget: default_page_budget(),
            workers: default_workers(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            file_extensions: default_file_extensions(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
///
/// Each export is written only when its path is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON report file
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,

    /// Path to the SQLite database file
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

fn default_page_budget() -> usize {
    DEFAULT_PAGE_BUDGET
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

fn default_file_extensions() -> Vec<String> {
    DEFAULT_FILE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_crawler_name() -> String {
    "SiteCensus".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
