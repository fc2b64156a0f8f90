//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Poll cadence
    #[serde(default)]
    pub watchdog: RawWatchdogConfig,

    /// Status query client settings
    #[serde(default)]
    pub query: RawQueryConfig,

    /// Session (tmux) control settings
    #[serde(default)]
    pub session: RawSessionConfig,

    /// Host power-off settings
    #[serde(default)]
    pub power: RawPowerConfig,

    /// Monitored servers
    #[serde(default)]
    pub servers: Vec<RawServer>,
}

/// Poll timing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWatchdogConfig {
    /// Delay before the first poll cycle (default: 600)
    pub grace_period_seconds: Option<u64>,

    /// Delay between poll cycles (default: 900)
    pub poll_interval_seconds: Option<u64>,
}

/// Status query settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawQueryConfig {
    /// Connect/read timeout for one status query (default: 5)
    pub timeout_seconds: Option<u64>,

    /// Protocol version sent in the handshake (default: 47)
    pub protocol_version: Option<i32>,
}

/// Session control settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionConfig {
    /// tmux binary (default: "tmux" from PATH)
    pub tmux_path: Option<PathBuf>,

    /// Command typed into the server console to stop it (default: "/stop")
    pub stop_command: Option<String>,
}

/// Host power-off settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPowerConfig {
    /// Power-off argv (default: ["shutdown"])
    pub command: Option<Vec<String>>,

    /// Prefix with sudo when not running as root (default: true)
    pub use_sudo: Option<bool>,
}

/// Raw server definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawServer {
    /// Unique name; also the session name hosting the server
    pub name: String,

    /// Query address, `host:port`
    pub address: String,

    /// Start with one idle poll already counted
    #[serde(default)]
    pub idle_flag: bool,
}
