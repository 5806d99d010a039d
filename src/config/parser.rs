use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use websift::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    if !config.schedule.command.is_empty() {
        tracing::info!(
            event = "schedule_configured",
            command = %config.schedule.command,
            hour = config.schedule.hour,
            minute = config.schedule.minute,
            "daily crawl schedule configured"
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
max-pages = 200
workers = 4
page-timeout = 20
ingest-pdf = true
allow = ["docs.partner.example"]

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[ingest]
chunk-size = 400
chunk-overlap = 100
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 200);
        assert_eq!(config.crawler.workers, 4);
        assert!(config.crawler.ingest_pdf);
        assert_eq!(config.crawler.allow, vec!["docs.partner.example"]);
        assert_eq!(config.ingest.chunk_size, 400);
        assert_eq!(config.ingest.chunk_overlap, 100);
    }

    #[test]
    fn test_defaults_applied() {
        let config_content = r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, -1);
        assert_eq!(config.crawler.max_pages, -1);
        assert_eq!(config.crawler.workers, 1);
        assert_eq!(config.crawler.page_timeout, 30);
        assert!(config.crawler.follow_robots);
        assert!(!config.crawler.ingest_pdf);
        assert!(!config.renderer.enabled);
        assert_eq!(config.ingest.chunk_size, 512);
        assert_eq!(config.ingest.chunk_overlap, 128);
        assert_eq!(config.schedule.hour, 3);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[ingest]
chunk-size = 100
chunk-overlap = 100
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_user_agent_full_string() {
        let config_content = r#"
[user-agent]
crawler-name = "WebsiftBot"
crawler-version = "0.2"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.user_agent.full_string(),
            "WebsiftBot/0.2 (+https://example.com/bot; bot@example.com)"
        );
    }
}
