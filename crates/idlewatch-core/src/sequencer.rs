//! Shutdown sequence for one idle server
//!
//! Steps, in order:
//! 1. Check the session exists; if not, do nothing at all
//! 2. Send the stop command
//! 3. Wait [`STOP_GRACE`]
//! 4. Press Enter to close any prompt left behind
//! 5. Force-terminate the session if it is still there
//! 6. Power off the host
//!
//! Failures in steps 2 to 6 are logged and the sequence carries on.

use idlewatch_host_api::{Clock, PowerController, SessionController};
use idlewatch_util::SessionName;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time the server gets to exit after the stop command
pub const STOP_GRACE: Duration = Duration::from_secs(15);

/// What the shutdown sequence did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// No session was found; nothing was sent and the host stays up
    NotAttempted,
    Completed {
        /// The session outlived the stop command and was terminated
        force_killed: bool,
        /// The power-off request succeeded
        powered_off: bool,
    },
}

impl SequenceOutcome {
    pub fn attempted(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

pub struct ShutdownSequencer {
    sessions: Arc<dyn SessionController>,
    power: Arc<dyn PowerController>,
    clock: Arc<dyn Clock>,
    stop_command: String,
}

impl ShutdownSequencer {
    pub fn new(
        sessions: Arc<dyn SessionController>,
        power: Arc<dyn PowerController>,
        clock: Arc<dyn Clock>,
        stop_command: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            power,
            clock,
            stop_command: stop_command.into(),
        }
    }

    pub async fn sequence(&self, session: &SessionName) -> SequenceOutcome {
        match self.sessions.exists(session).await {
            Ok(true) => {}
            Ok(false) => {
                info!(session = %session, "No session found, nothing to stop");
                return SequenceOutcome::NotAttempted;
            }
            Err(e) => {
                warn!(session = %session, error = %e, "Could not check session, skipping shutdown");
                return SequenceOutcome::NotAttempted;
            }
        }

        match self.sessions.send_command(session, &self.stop_command).await {
            Ok(()) => info!(session = %session, command = %self.stop_command, "Sent stop command"),
            Err(e) => warn!(session = %session, error = %e, "Failed to send stop command"),
        }

        self.clock.sleep(STOP_GRACE).await;

        // Usually fails because the session already closed
        if let Err(e) = self.sessions.send_keystroke(session).await {
            debug!(session = %session, error = %e, "Enter keystroke not delivered");
        }

        let force_killed = self.force_kill_if_running(session).await;
        let powered_off = self.power_off().await;

        SequenceOutcome::Completed {
            force_killed,
            powered_off,
        }
    }

    async fn force_kill_if_running(&self, session: &SessionName) -> bool {
        match self.sessions.exists(session).await {
            Ok(false) => false,
            Ok(true) => match self.sessions.terminate(session).await {
                Ok(()) => {
                    warn!(session = %session, "Session still running after stop, terminated it");
                    true
                }
                Err(e) => {
                    warn!(session = %session, error = %e, "Failed to terminate session");
                    false
                }
            },
            Err(e) => {
                warn!(session = %session, error = %e, "Could not check session after stop");
                false
            }
        }
    }

    async fn power_off(&self) -> bool {
        match self.power.shutdown_host().await {
            Ok(()) => {
                info!("Host power-off requested");
                true
            }
            Err(e) => {
                warn!(error = %e, "Host power-off failed");
                false
            }
        }
    }
}
