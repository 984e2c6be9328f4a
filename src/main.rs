//! Site-Census main entry point
//!
//! This is the command-line interface for the Site-Census link census.

use anyhow::Context;
use clap::Parser;
use site_census::config::{load_config_with_hash, validate, Config, SeedConfig};
use site_census::crawler::Coordinator;
use site_census::output::{
    print_statistics, write_all, CrawlReport, JsonOutput, MarkdownOutput, OutputHandler,
    SqliteOutputHandler,
};
use site_census::storage::open_storage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Census: a single-domain link census
///
/// Site-Census crawls one web domain from a seed URL under a page budget
/// and reports how many pages, subdomains, external hosts, broken links
/// and document links it found.
#[derive(Parser, Debug)]
#[command(name = "site-census")]
#[command(version)]
#[command(about = "A single-domain link census", long_about = None)]
struct Cli {
    /// URL the crawl starts from; its host is the base domain
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of pages to fetch
    #[arg(short, long)]
    budget: Option<usize>,

    /// Number of concurrent fetch workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "N")]
    timeout_ms: Option<u64>,

    /// Maximum redirect hops per request
    #[arg(long, value_name = "N")]
    max_redirects: Option<usize>,

    /// Write the full report as JSON
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Write a markdown summary
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Archive the report in a SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Stop the crawl after this many seconds and report what was found
    #[arg(long, value_name = "N")]
    deadline_secs: Option<u64>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        return handle_dry_run(&cli.seed, &config);
    }

    handle_crawl(&cli, &config, config_hash, cancellation_token(cli.deadline_secs)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_census=info,warn"),
            1 => EnvFilter::new("site_census=debug,info"),
            2 => EnvFilter::new("site_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(budget) = cli.budget {
        config.crawler.page_budget = budget;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(timeout) = cli.timeout_ms {
        config.crawler.request_timeout_ms = timeout;
    }
    if let Some(redirects) = cli.max_redirects {
        config.crawler.max_redirects = redirects;
    }
    if let Some(path) = &cli.json {
        config.output.json_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.database {
        config.output.database_path = Some(path.display().to_string());
    }
}

/// Cancels on Ctrl-C or once the deadline passes
fn cancellation_token(deadline_secs: Option<u64>) -> CancellationToken {
    let token = CancellationToken::new();

    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with partial results");
            on_signal.cancel();
        }
    });

    if let Some(secs) = deadline_secs {
        let on_deadline = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            tracing::warn!("Deadline of {}s reached, finishing with partial results", secs);
            on_deadline.cancel();
        });
    }

    token
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(seed: &str, config: &Config) -> anyhow::Result<()> {
    let seed_config = SeedConfig::new(seed, &config.crawler)?;
    validate(config)?;

    println!("=== Site-Census Dry Run ===\n");

    println!("Seed:");
    println!("  URL: {}", seed_config.seed);
    match &seed_config.seed_error {
        Some(e) => println!("  Invalid: {} (would be reported as one broken link)", e),
        None => println!("  Base domain: {}", seed_config.base_domain),
    }

    println!("\nCrawler Configuration:");
    println!("  Page budget: {}", seed_config.page_budget);
    println!("  Workers: {}", seed_config.workers);
    println!("  Request timeout: {:?}", seed_config.request_timeout);
    println!("  Max redirects: {}", seed_config.max_redirects);
    println!("  File extensions: {}", seed_config.file_extensions.join(", "));

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  JSON: {}", config.output.json_path.as_deref().unwrap_or("-"));
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("-")
    );
    println!(
        "  Database: {}",
        config.output.database_path.as_deref().unwrap_or("-")
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    cli: &Cli,
    config: &Config,
    config_hash: Option<String>,
    token: CancellationToken,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(&cli.seed, config)?;
    let state = coordinator.run_until_cancelled(token).await?;

    let mut report = CrawlReport::from_state(coordinator.seed_config(), &state);
    if let Some(hash) = config_hash {
        report = report.with_config_hash(hash);
    }

    if !cli.quiet {
        print_statistics(&report.statistics);
    }

    let handlers = build_handlers(config)?;
    write_all(&handlers, &report).context("Failed to write crawl report")?;

    Ok(())
}

fn build_handlers(config: &Config) -> anyhow::Result<Vec<Box<dyn OutputHandler>>> {
    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();

    if let Some(path) = &config.output.json_path {
        handlers.push(Box::new(JsonOutput::new(path)));
    }
    if let Some(path) = &config.output.summary_path {
        handlers.push(Box::new(MarkdownOutput::new(path)));
    }
    if let Some(path) = &config.output.database_path {
        let storage = open_storage(Path::new(path))
            .with_context(|| format!("Failed to open database {}", path))?;
        handlers.push(Box::new(SqliteOutputHandler::new(Arc::new(Mutex::new(
            storage,
        )))));
    }

    Ok(handlers)
}
