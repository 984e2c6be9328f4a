//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent
//! - Bounded redirect following
//! - Charset-aware body decoding
//! - Error classification into broken-link outcomes

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
///
/// Fetching never fails in the `Result` sense: every outcome, including
/// transport failures, is one of these variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Decoded page body
        body: String,
        /// Content-Type header value, if the server sent one
        content_type: Option<String>,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Timeout, connection refused, DNS failure, too many redirects or a
    /// failed body read
    NetworkError {
        /// Error description
        reason: String,
    },
}

impl FetchResult {
    /// Short human-readable description of a failure
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { reason } => Some(reason.clone()),
        }
    }
}

/// Something that can retrieve one URL
///
/// The coordinator only talks to this trait so crawls can run against an
/// in-memory site in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, following redirects
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total time allowed for one request
/// * `max_redirects` - Redirect hops followed before giving up
///
/// # Example
///
/// ```no_run
/// use site_census::config::UserAgentConfig;
/// use site_census::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig::default();
/// let client = build_http_client(&config, Duration::from_secs(5), 10).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
    max_redirects: usize,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with its own client
    pub fn new(
        config: &UserAgentConfig,
        timeout: Duration,
        max_redirects: usize,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout, max_redirects)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // text() decodes using the charset from Content-Type
        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
                content_type,
            },
            Err(e) => classify_error(&e),
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let reason = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_body() || e.is_decode() {
        format!("Failed to read body: {}", e)
    } else {
        e.to_string()
    };

    FetchResult::NetworkError { reason }
}
