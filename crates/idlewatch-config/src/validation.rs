//! Configuration validation

use crate::schema::{RawConfig, RawServer};
use idlewatch_util::{ServerAddress, SessionName};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Server '{server}': {message}")]
    ServerError { server: String, message: String },

    #[error("Duplicate server name: {0}")]
    DuplicateServerName(String),

    #[error("No servers configured")]
    NoServers,

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }

    let mut seen_names = HashSet::new();
    for server in &config.servers {
        if !seen_names.insert(&server.name) {
            errors.push(ValidationError::DuplicateServerName(server.name.clone()));
        }
    }

    for server in &config.servers {
        errors.extend(validate_server(server));
    }

    if config.watchdog.poll_interval_seconds == Some(0) {
        errors.push(ValidationError::GlobalError(
            "watchdog.poll_interval_seconds must be greater than 0".into(),
        ));
    }

    if config.query.timeout_seconds == Some(0) {
        errors.push(ValidationError::GlobalError(
            "query.timeout_seconds must be greater than 0".into(),
        ));
    }

    if let Some(stop) = &config.session.stop_command
        && stop.trim().is_empty() {
            errors.push(ValidationError::GlobalError(
                "session.stop_command cannot be empty".into(),
            ));
        }

    if let Some(command) = &config.power.command
        && command.first().is_none_or(|program| program.trim().is_empty()) {
            errors.push(ValidationError::GlobalError(
                "power.command must name a program".into(),
            ));
        }

    errors
}

fn validate_server(server: &RawServer) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = SessionName::new(server.name.as_str()).validate() {
        errors.push(ValidationError::ServerError {
            server: server.name.clone(),
            message: e.to_string(),
        });
    }

    if let Err(e) = server.address.parse::<ServerAddress>() {
        errors.push(ValidationError::ServerError {
            server: server.name.clone(),
            message: e.to_string(),
        });
    }

    errors
}
