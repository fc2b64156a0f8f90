//! Validated configuration structures

use crate::schema::{RawConfig, RawPowerConfig, RawQueryConfig, RawServer, RawSessionConfig, RawWatchdogConfig};
use idlewatch_util::{Result, ServerAddress, ServerName};
use std::path::PathBuf;
use std::time::Duration;

/// Default delay before the first poll cycle
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(600);

/// Default delay between poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(900);

/// Default timeout for a single status query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default handshake protocol version
pub const DEFAULT_PROTOCOL_VERSION: i32 = 47;

/// Default console command that stops a server
pub const DEFAULT_STOP_COMMAND: &str = "/stop";

/// Validated configuration ready for use by the watchdog
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub watchdog: WatchdogSettings,
    pub query: QuerySettings,
    pub session: SessionSettings,
    pub power: PowerSettings,
    pub servers: Vec<ServerConfig>,
}

impl WatchConfig {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Result<Self> {
        let servers = raw
            .servers
            .into_iter()
            .map(ServerConfig::from_raw)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            watchdog: WatchdogSettings::from_raw(raw.watchdog),
            query: QuerySettings::from_raw(raw.query),
            session: SessionSettings::from_raw(raw.session),
            power: PowerSettings::from_raw(raw.power),
            servers,
        })
    }

    /// Get server by name
    pub fn get_server(&self, name: &ServerName) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| &s.name == name)
    }
}

/// Poll cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogSettings {
    pub grace_period: Duration,
    pub poll_interval: Duration,
}

impl WatchdogSettings {
    fn from_raw(raw: RawWatchdogConfig) -> Self {
        Self {
            grace_period: raw
                .grace_period_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_GRACE_PERIOD),
            poll_interval: raw
                .poll_interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
        }
    }
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Status query settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySettings {
    pub timeout: Duration,
    pub protocol_version: i32,
}

impl QuerySettings {
    fn from_raw(raw: RawQueryConfig) -> Self {
        Self {
            timeout: raw
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_QUERY_TIMEOUT),
            protocol_version: raw.protocol_version.unwrap_or(DEFAULT_PROTOCOL_VERSION),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_QUERY_TIMEOUT,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
        }
    }
}

/// Session control settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub tmux_path: PathBuf,
    pub stop_command: String,
}

impl SessionSettings {
    fn from_raw(raw: RawSessionConfig) -> Self {
        Self {
            tmux_path: raw.tmux_path.unwrap_or_else(|| PathBuf::from("tmux")),
            stop_command: raw
                .stop_command
                .unwrap_or_else(|| DEFAULT_STOP_COMMAND.to_string()),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_raw(RawSessionConfig::default())
    }
}

/// Host power-off settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerSettings {
    pub command: Vec<String>,
    pub use_sudo: bool,
}

impl PowerSettings {
    fn from_raw(raw: RawPowerConfig) -> Self {
        Self {
            command: raw.command.unwrap_or_else(|| vec!["shutdown".to_string()]),
            use_sudo: raw.use_sudo.unwrap_or(true),
        }
    }
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self::from_raw(RawPowerConfig::default())
    }
}

/// A monitored server as declared in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub name: ServerName,
    pub address: ServerAddress,
    pub idle_flag: bool,
}

impl ServerConfig {
    fn from_raw(raw: RawServer) -> Result<Self> {
        Ok(Self {
            name: ServerName::new(raw.name),
            address: raw.address.parse()?,
            idle_flag: raw.idle_flag,
        })
    }
}
