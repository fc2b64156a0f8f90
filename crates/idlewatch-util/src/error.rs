//! Error types for idlewatch

use thiserror::Error;

use crate::ServerName;

/// Core error type for idlewatch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Duplicate server name: {0}")]
    DuplicateServer(ServerName),

    #[error("Server not found: {0}")]
    ServerNotFound(ServerName),

    #[error("Invalid session name '{name}': {reason}")]
    InvalidSessionName { name: String, reason: String },

    #[error("Invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}

pub type Result<T> = std::result::Result<T, WatchError>;
