//! Strongly-typed identifiers for idlewatch

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::WatchError;

/// Longest session name accepted
const MAX_SESSION_NAME_LEN: usize = 256;

/// Unique name of a monitored server, as declared in the configuration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerName(String);

impl ServerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServerName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Name of the controllable session hosting a server process.
///
/// Every monitored server runs in a session named after the server itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionName(String);

impl SessionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the name can be handed to a session manager as a target.
    ///
    /// Rejects names that tmux would interpret as target syntax (`:` and `.`
    /// separate window and pane) or that could be read as a flag.
    pub fn validate(&self) -> Result<(), WatchError> {
        let invalid = |reason: &str| WatchError::InvalidSessionName {
            name: self.0.clone(),
            reason: reason.to_string(),
        };

        if self.0.is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.0.len() > MAX_SESSION_NAME_LEN {
            return Err(invalid("name is longer than 256 characters"));
        }
        if self.0.starts_with('-') {
            return Err(invalid("name must not start with '-'"));
        }
        if let Some(c) = self
            .0
            .chars()
            .find(|c| matches!(c, ':' | '.') || c.is_whitespace() || c.is_control())
        {
            return Err(invalid(&format!("name contains invalid character {:?}", c)));
        }
        Ok(())
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&ServerName> for SessionName {
    fn from(server: &ServerName) -> Self {
        Self(server.0.clone())
    }
}

impl From<&str> for SessionName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
