//! The watch loop

use idlewatch_config::WatchdogSettings;
use idlewatch_host_api::{Clock, QueryResult, ServerQuery, ServerStatus};
use idlewatch_util::{ServerName, format_datetime_full, format_duration, now};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    CycleReport, PollOutcome, Registry, SequenceOutcome, ShutdownSequencer, Transition, WatchEvent,
    WatchSummary,
};

/// Polls every registered server on a fixed cadence and shuts down the
/// ones found idle on two consecutive polls.
///
/// Servers are processed one at a time. The only waits are the startup
/// grace period, the poll interval and the wait inside the shutdown sequence.
pub struct Poller {
    registry: Registry,
    query: Arc<dyn ServerQuery>,
    sequencer: ShutdownSequencer,
    clock: Arc<dyn Clock>,
    settings: WatchdogSettings,
}

impl Poller {
    pub fn new(
        registry: Registry,
        query: Arc<dyn ServerQuery>,
        sequencer: ShutdownSequencer,
        clock: Arc<dyn Clock>,
        settings: WatchdogSettings,
    ) -> Self {
        Self {
            registry,
            query,
            sequencer,
            clock,
            settings,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &WatchdogSettings {
        &self.settings
    }

    /// Run until no monitored server remains
    pub async fn run(mut self) -> WatchSummary {
        let grace = self.settings.grace_period;
        if !grace.is_zero() {
            info!(
                grace = %format_duration(grace),
                servers = self.registry.len(),
                "Waiting for servers to start before first poll"
            );
            self.clock.sleep(grace).await;
        }

        let mut summary = WatchSummary::default();
        loop {
            let report = self.run_cycle().await;
            summary.cycles += 1;
            summary.shut_down.extend(report.shut_down().cloned());

            if self.registry.is_empty() {
                info!(
                    cycles = summary.cycles,
                    shut_down = summary.shut_down.len(),
                    "No monitored servers remain, stopping"
                );
                return summary;
            }

            let interval = self.settings.poll_interval;
            debug!(next_poll_in = %format_duration(interval), "Cycle complete");
            self.clock.sleep(interval).await;
        }
    }

    /// Poll every server once
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started_at = now();
        let names = self.registry.snapshot();
        let mut events = Vec::new();

        info!(
            at = %format_datetime_full(&started_at),
            servers = %names.iter().map(ServerName::as_str).collect::<Vec<_>>().join(", "),
            "Currently active servers"
        );

        for name in &names {
            self.poll_server(name, &mut events).await;
        }

        CycleReport {
            started_at,
            events,
            remaining: self.registry.len(),
        }
    }

    async fn poll_server(&mut self, name: &ServerName, events: &mut Vec<WatchEvent>) {
        let Some(server) = self.registry.get(name).cloned() else {
            return;
        };

        let result = self.query.query(&server.address).await;
        log_query_result(name, &server.address.to_string(), &result);
        let outcome = PollOutcome::classify(&result);

        let transition = server.trigger_state().on_poll(&outcome);
        events.push(WatchEvent::Polled {
            server: name.clone(),
            outcome,
        });

        match transition {
            Transition::Shutdown => {
                let session = server.session();
                warn!(server = %name, session = %session, "Idle on two consecutive polls, invoking shutdown");

                let outcome = self.sequencer.sequence(&session).await;
                if outcome == SequenceOutcome::NotAttempted {
                    info!(server = %name, "Shutdown not attempted, session was already gone");
                }
                events.push(WatchEvent::ShutdownInvoked {
                    server: name.clone(),
                    session,
                    outcome,
                });

                self.registry.remove(name);
                events.push(WatchEvent::Removed {
                    server: name.clone(),
                });
            }
            Transition::Continue(next) => {
                let idle_flag = next.idle_flag();
                if idle_flag != server.idle_flag {
                    if idle_flag {
                        info!(server = %name, "Server idle, will shut down if still idle next poll");
                        events.push(WatchEvent::Armed {
                            server: name.clone(),
                        });
                    } else {
                        info!(server = %name, "Pending shutdown cancelled");
                        events.push(WatchEvent::Disarmed {
                            server: name.clone(),
                        });
                    }
                }

                if let Err(e) = self.registry.set_idle_flag(name, idle_flag) {
                    warn!(server = %name, error = %e, "Failed to update idle flag");
                }
            }
        }
    }
}

fn log_query_result(name: &ServerName, address: &str, result: &QueryResult<ServerStatus>) {
    match result {
        Ok(status) => info!(
            server = %name,
            online = status.online,
            max = ?status.max,
            "Players online"
        ),
        Err(e) => warn!(server = %name, address, error = %e, "Error querying server"),
    }
}
