//! Configuration parsing and validation for idlewatch
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Poll cadence, query, session and power-off settings
//! - The list of monitored servers
//! - Validation that reports every problem at once

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<WatchConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<WatchConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    // Validation already parsed every address, so this cannot fail in practice
    WatchConfig::from_raw(raw).map_err(|e| ConfigError::ValidationFailed {
        errors: vec![ValidationError::GlobalError(e.to_string())],
    })
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use idlewatch_util::ServerName;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn parse_minimal_config() {
        let config = r#"
            config_version = 1

            [[servers]]
            name = "minecraft"
            address = "35.214.110.227:25565"
        "#;

        let config = parse_config(config).unwrap();
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.servers[0].name.as_str(), "minecraft");
        assert_eq!(config.servers[0].address.port, 25565);
        assert!(!config.servers[0].idle_flag);

        assert_eq!(config.watchdog.grace_period, Duration::from_secs(600));
        assert_eq!(config.watchdog.poll_interval, Duration::from_secs(900));
        assert_eq!(config.session.stop_command, "/stop");
        assert_eq!(config.power.command, vec!["shutdown".to_string()]);
        assert!(config.power.use_sudo);
    }

    #[test]
    fn overrides_apply() {
        let config = r#"
            config_version = 1

            [watchdog]
            grace_period_seconds = 0
            poll_interval_seconds = 60

            [query]
            timeout_seconds = 2

            [[servers]]
            name = "creative"
            address = "mc.example.com"
            idle_flag = true
        "#;

        let config = parse_config(config).unwrap();
        assert_eq!(config.watchdog.grace_period, Duration::ZERO);
        assert_eq!(config.watchdog.poll_interval, Duration::from_secs(60));
        assert_eq!(config.query.timeout, Duration::from_secs(2));

        let server = config.get_server(&ServerName::new("creative")).unwrap();
        assert!(server.idle_flag);
        assert_eq!(server.address.port, idlewatch_util::DEFAULT_GAME_PORT);
    }

    #[test]
    fn reject_wrong_version() {
        let config = r#"
            config_version = 99

            [[servers]]
            name = "minecraft"
            address = "localhost:25565"
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_servers() {
        let config = r#"
            config_version = 1

            [[servers]]
            name = "minecraft"
            address = "localhost:25565"

            [[servers]]
            name = "minecraft"
            address = "localhost:25566"
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            config_version = 1

            [[servers]]
            name = "minecraft"
            address = "127.0.0.1:25565"
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.servers.len(), 1);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
