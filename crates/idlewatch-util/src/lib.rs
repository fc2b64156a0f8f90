//! Shared utilities for idlewatch
//!
//! This crate provides:
//! - ID types (ServerName, SessionName)
//! - Server address parsing
//! - Error types
//! - Time helpers (wall-clock now, duration formatting)
//! - Default configuration path

mod address;
mod error;
mod ids;
mod paths;
mod time;

pub use address::*;
pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
