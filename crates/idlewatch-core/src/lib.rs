//! Core of idlewatch
//!
//! This crate contains:
//! - The server registry (names, addresses, idle flags)
//! - The idle-trigger state machine (Running -> PendingShutdown -> shutdown)
//! - The shutdown sequencer (stop command, grace wait, force kill, power-off)
//! - The poller driving cycles until no monitored server remains

mod events;
mod poller;
mod registry;
mod sequencer;
mod trigger;

pub use events::*;
pub use poller::*;
pub use registry::*;
pub use sequencer::*;
pub use trigger::*;
