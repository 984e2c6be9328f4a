use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, MAX_WORKERS};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Smallest accepted per-request timeout (milliseconds)
const MIN_REQUEST_TIMEOUT_MS: u64 = 100;

/// Largest accepted redirect hop limit
const MAX_REDIRECT_LIMIT: usize = 30;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.page_budget < 1 {
        return Err(ConfigError::Validation(format!(
            "page_budget must be >= 1, got {}",
            config.page_budget
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.request_timeout_ms < MIN_REQUEST_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= {}ms, got {}ms",
            MIN_REQUEST_TIMEOUT_MS, config.request_timeout_ms
        )));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    if config.file_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "file_extensions cannot be empty".to_string(),
        ));
    }

    for extension in &config.file_extensions {
        validate_extension(extension)?;
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    let paths = [
        ("json_path", &config.json_path),
        ("summary_path", &config.summary_path),
        ("database_path", &config.database_path),
    ];

    for (name, path) in paths {
        if matches!(path, Some(p) if p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} cannot be empty when set",
                name
            )));
        }
    }

    Ok(())
}

/// Validates a document extension such as ".pdf"
fn validate_extension(extension: &str) -> ConfigResult<()> {
    let Some(suffix) = extension.strip_prefix('.') else {
        return Err(ConfigError::InvalidExtension(format!(
            "'{}' must start with '.'",
            extension
        )));
    };

    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidExtension(format!(
            "'{}' must be '.' followed by letters or digits",
            extension
        )));
    }

    Ok(())
}
