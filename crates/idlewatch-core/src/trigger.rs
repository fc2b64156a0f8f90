//! Idle-trigger state machine
//!
//! A server must be seen idle on two consecutive polls before it is shut
//! down. Any poll that is not idle, including a failed query, clears the
//! pending state. As a consequence a server that stops answering queries
//! altogether is never shut down by the watchdog.

use idlewatch_host_api::{QueryResult, ServerStatus};

/// Result of polling one server once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No players online
    Idle,
    /// At least one player online
    Active { online: u32 },
    /// The status query failed
    QueryFailed { reason: String },
}

impl PollOutcome {
    /// Classify the result of a status query
    pub fn classify(result: &QueryResult<ServerStatus>) -> Self {
        match result {
            Ok(status) if status.online == 0 => Self::Idle,
            Ok(status) => Self::Active {
                online: status.online,
            },
            Err(e) => Self::QueryFailed {
                reason: e.to_string(),
            },
        }
    }
}

/// Per-server trigger state, stored in the registry as the idle flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    /// No idle poll observed since the flag was last cleared
    Running,
    /// Exactly one idle poll observed; the next idle poll shuts down
    PendingShutdown,
}

impl TriggerState {
    pub fn from_idle_flag(flag: bool) -> Self {
        if flag {
            Self::PendingShutdown
        } else {
            Self::Running
        }
    }

    pub fn idle_flag(self) -> bool {
        self == Self::PendingShutdown
    }

    /// Apply one poll outcome
    pub fn on_poll(self, outcome: &PollOutcome) -> Transition {
        match (self, outcome) {
            (Self::PendingShutdown, PollOutcome::Idle) => Transition::Shutdown,
            (Self::Running, PollOutcome::Idle) => Transition::Continue(Self::PendingShutdown),
            (_, PollOutcome::Active { .. } | PollOutcome::QueryFailed { .. }) => {
                Transition::Continue(Self::Running)
            }
        }
    }
}

/// What the poller should do after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep monitoring in the given state
    Continue(TriggerState),
    /// Run the shutdown sequence and stop monitoring the server
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlewatch_host_api::QueryError;

    fn failed() -> PollOutcome {
        PollOutcome::QueryFailed {
            reason: "connection refused".into(),
        }
    }

    fn active(online: u32) -> PollOutcome {
        PollOutcome::Active { online }
    }

    /// Feed outcomes from the initial state; returns the final state, or
    /// None once shutdown is triggered
    fn run(outcomes: &[PollOutcome]) -> Option<TriggerState> {
        let mut state = TriggerState::Running;
        for outcome in outcomes {
            match state.on_poll(outcome) {
                Transition::Continue(next) => state = next,
                Transition::Shutdown => return None,
            }
        }
        Some(state)
    }

    #[test]
    fn classify_query_results() {
        assert_eq!(PollOutcome::classify(&Ok(ServerStatus::with_online(0))), PollOutcome::Idle);
        assert_eq!(
            PollOutcome::classify(&Ok(ServerStatus::with_online(4))),
            active(4)
        );
        let err: QueryResult<ServerStatus> = Err(QueryError::Protocol("bad packet".into()));
        assert!(matches!(
            PollOutcome::classify(&err),
            PollOutcome::QueryFailed { reason } if reason.contains("bad packet")
        ));
    }

    #[test]
    fn transition_table() {
        use TriggerState::*;

        assert_eq!(Running.on_poll(&PollOutcome::Idle), Transition::Continue(PendingShutdown));
        assert_eq!(PendingShutdown.on_poll(&PollOutcome::Idle), Transition::Shutdown);
        assert_eq!(Running.on_poll(&active(1)), Transition::Continue(Running));
        assert_eq!(PendingShutdown.on_poll(&active(1)), Transition::Continue(Running));
        assert_eq!(Running.on_poll(&failed()), Transition::Continue(Running));
        assert_eq!(PendingShutdown.on_poll(&failed()), Transition::Continue(Running));
    }

    #[test]
    fn flag_round_trip() {
        assert_eq!(TriggerState::from_idle_flag(false), TriggerState::Running);
        assert_eq!(TriggerState::from_idle_flag(true), TriggerState::PendingShutdown);
        assert!(TriggerState::PendingShutdown.idle_flag());
        assert!(!TriggerState::Running.idle_flag());
    }

    #[test]
    fn two_consecutive_idle_polls_shut_down() {
        assert_eq!(run(&[PollOutcome::Idle, PollOutcome::Idle]), None);
    }

    #[test]
    fn idle_then_active_resets() {
        assert_eq!(
            run(&[PollOutcome::Idle, active(3)]),
            Some(TriggerState::Running)
        );
        assert_eq!(
            run(&[PollOutcome::Idle, active(3), PollOutcome::Idle]),
            Some(TriggerState::PendingShutdown)
        );
    }

    #[test]
    fn query_failures_never_advance() {
        assert_eq!(run(&[failed(), failed()]), Some(TriggerState::Running));
        assert_eq!(run(&[failed(), failed(), failed()]), Some(TriggerState::Running));
    }

    #[test]
    fn idle_then_failure_clears_progress() {
        assert_eq!(
            run(&[PollOutcome::Idle, failed()]),
            Some(TriggerState::Running)
        );
        // The failure in between means these two idle polls are not consecutive
        assert_eq!(
            run(&[PollOutcome::Idle, failed(), PollOutcome::Idle]),
            Some(TriggerState::PendingShutdown)
        );
    }
}
