//! Linux collaborators for idlewatch
//!
//! Provides:
//! - Session control over tmux (`has-session`, `send-keys`, `kill-session`)
//! - Host power-off through the system `shutdown` command
//! - Minecraft Java Edition status queries (Server List Ping)

mod power;
mod query;
mod slp;
mod tmux;

pub use power::*;
pub use query::*;
pub use tmux::*;
