//! Events emitted by the poller

use chrono::{DateTime, Local};
use idlewatch_util::{ServerName, SessionName};

use crate::{PollOutcome, SequenceOutcome};

/// Something the poller observed or did during a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A server was queried
    Polled {
        server: ServerName,
        outcome: PollOutcome,
    },

    /// First idle poll seen; the next idle poll shuts the server down
    Armed { server: ServerName },

    /// A pending shutdown was cancelled by a non-idle poll
    Disarmed { server: ServerName },

    /// The shutdown sequence ran for a server
    ShutdownInvoked {
        server: ServerName,
        session: SessionName,
        outcome: SequenceOutcome,
    },

    /// The server is no longer monitored
    Removed { server: ServerName },
}

/// Everything that happened in one poll cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Local>,
    pub events: Vec<WatchEvent>,
    /// Servers still monitored after the cycle
    pub remaining: usize,
}

impl CycleReport {
    /// Servers whose shutdown sequence ran in this cycle
    pub fn shut_down(&self) -> impl Iterator<Item = &ServerName> {
        self.events.iter().filter_map(|e| match e {
            WatchEvent::ShutdownInvoked { server, .. } => Some(server),
            _ => None,
        })
    }
}

/// Result of a complete watch, returned once no server remains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSummary {
    pub cycles: u64,
    /// Servers shut down, in the order it happened
    pub shut_down: Vec<ServerName>,
}
