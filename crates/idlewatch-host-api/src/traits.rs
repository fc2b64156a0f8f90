//! Collaborator traits

use async_trait::async_trait;
use idlewatch_util::{ServerAddress, SessionName, WatchError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from session and power control
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Invalid session: {0}")]
    InvalidSession(#[from] WatchError),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HostResult<T> = Result<T, HostError>;

/// Reasons a status query can fail
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Query timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid status payload: {0}")]
    Payload(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Status reported by a game server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Players currently online
    pub online: u32,

    /// Player slots, if reported
    pub max: Option<u32>,

    /// Server version name, if reported
    pub version: Option<String>,
}

impl ServerStatus {
    pub fn with_online(online: u32) -> Self {
        Self {
            online,
            max: None,
            version: None,
        }
    }
}

/// Queries a game server for its current status
#[async_trait]
pub trait ServerQuery: Send + Sync {
    async fn query(&self, address: &ServerAddress) -> QueryResult<ServerStatus>;
}

/// Controls the session (e.g. a tmux session) hosting a server process
#[async_trait]
pub trait SessionController: Send + Sync {
    /// Whether the session currently exists
    async fn exists(&self, session: &SessionName) -> HostResult<bool>;

    /// Type a command line into the session and submit it
    async fn send_command(&self, session: &SessionName, text: &str) -> HostResult<()>;

    /// Press Enter in the session
    async fn send_keystroke(&self, session: &SessionName) -> HostResult<()>;

    /// Forcibly end the session
    async fn terminate(&self, session: &SessionName) -> HostResult<()>;
}

/// Powers off the host machine
#[async_trait]
pub trait PowerController: Send + Sync {
    async fn shutdown_host(&self) -> HostResult<()>;
}
