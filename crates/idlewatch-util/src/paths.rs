//! Default paths for idlewatch
//!
//! - Config: `$IDLEWATCH_CONFIG`, `$XDG_CONFIG_HOME/idlewatch/config.toml`,
//!   `~/.config/idlewatch/config.toml`, or `/etc/idlewatch/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the config path
pub const IDLEWATCH_CONFIG_ENV: &str = "IDLEWATCH_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "idlewatch";

/// Get the default configuration file path.
///
/// Order of precedence:
/// 1. `$IDLEWATCH_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/idlewatch/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/idlewatch/config.toml`
/// 4. `/etc/idlewatch/config.toml` (no HOME)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(IDLEWATCH_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking IDLEWATCH_CONFIG.
/// Used by the CLI, which reads the env var itself.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}
