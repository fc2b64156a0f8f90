//! Collaborator trait interfaces for idlewatch
//!
//! This crate defines the seams between the watchdog core and the outside
//! world: game-server status queries, session control, host power-off and
//! the clock used for every wait. It contains no platform code itself.

mod clock;
mod mock;
mod traits;

pub use clock::*;
pub use mock::*;
pub use traits::*;
