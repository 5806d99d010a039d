use crate::config::types::{Config, CrawlerConfig, IngestConfig, ScheduleConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Configuration problems are rejected here, at run start, so that a bad
/// chunk geometry or timeout is never discovered mid-crawl.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_ingest_config(&config.ingest)?;
    validate_schedule_config(&config.schedule)?;

    if config.renderer.enabled || config.renderer.fallback_on_empty {
        Url::parse(&config.renderer.webdriver_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid webdriver-url '{}': {}",
                config.renderer.webdriver_url, e
            ))
        })?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < -1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be -1 (unbounded) or >= 0, got {}",
            config.max_depth
        )));
    }

    if config.max_pages < -1 || config.max_pages == 0 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be -1 (unbounded) or >= 1, got {}",
            config.max_pages
        )));
    }

    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if !(5..=300).contains(&config.page_timeout) {
        return Err(ConfigError::Validation(format!(
            "page_timeout must be between 5 and 300 seconds, got {}",
            config.page_timeout
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates chunk geometry
fn validate_ingest_config(config: &IngestConfig) -> Result<(), ConfigError> {
    if config.chunk_size == 0 {
        return Err(ConfigError::Validation(
            "chunk_size must be >= 1".to_string(),
        ));
    }

    if config.chunk_overlap >= config.chunk_size {
        return Err(ConfigError::Validation(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            config.chunk_overlap, config.chunk_size
        )));
    }

    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates schedule settings
fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    if config.hour > 23 {
        return Err(ConfigError::Validation(format!(
            "schedule hour must be 0-23, got {}",
            config.hour
        )));
    }

    if config.minute > 59 {
        return Err(ConfigError::Validation(format!(
            "schedule minute must be 0-59, got {}",
            config.minute
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    Ok(())
}
