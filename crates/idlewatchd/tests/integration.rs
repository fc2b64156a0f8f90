//! Integration tests for idlewatchd
//!
//! These tests drive a complete watch from a configuration file through the
//! core poller, with mock collaborators standing in for the host.

use idlewatch_config::{ConfigError, load_config, parse_config};
use idlewatch_core::{Poller, Registry, ShutdownSequencer, WatchEvent};
use idlewatch_host_api::{HostCall, MockHost, MockSessionBehavior};
use idlewatch_util::{ServerAddress, ServerName, SessionName};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const CONFIG: &str = r#"
config_version = 1

[watchdog]
grace_period_seconds = 60
poll_interval_seconds = 300

[session]
stop_command = "stop"

[[servers]]
name = "creative"
address = "10.0.0.2:25566"

[[servers]]
name = "survival"
address = "10.0.0.1"
"#;

fn make_poller(host: &MockHost, config_text: &str) -> Poller {
    let config = parse_config(config_text).unwrap();
    let registry = Registry::from_config(&config.servers).unwrap();
    let sequencer = ShutdownSequencer::new(
        host.sessions.clone(),
        host.power.clone(),
        host.clock.clone(),
        config.session.stop_command.clone(),
    );
    Poller::new(
        registry,
        host.query.clone(),
        sequencer,
        host.clock.clone(),
        config.watchdog,
    )
}

fn creative() -> ServerAddress {
    ServerAddress::new("10.0.0.2", 25566)
}

fn survival() -> ServerAddress {
    ServerAddress::new("10.0.0.1", 25565)
}

#[test]
fn test_example_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config.example.toml");
    let config = load_config(&path).unwrap();

    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.power.command, vec!["shutdown", "-h", "now"]);
}

#[test]
fn test_config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.watchdog.grace_period, Duration::from_secs(60));
    assert_eq!(config.servers[1].address, survival());
}

#[test]
fn test_invalid_server_list_is_rejected() {
    let result = parse_config(
        r#"
        config_version = 1

        [[servers]]
        name = "bad name"
        address = "10.0.0.1:0"
        "#,
    );

    match result {
        Err(ConfigError::ValidationFailed { errors }) => assert!(errors.len() >= 2),
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_watch_shuts_down_every_server() {
    let host = MockHost::new();
    host.sessions
        .add_session("creative", MockSessionBehavior::ExitsOnCommand);
    host.sessions.add_session("survival", MockSessionBehavior::Lingers);

    // creative: idle twice. survival: busy, idle, then idle again
    host.query.push_online(&creative(), 0);
    host.query.push_online(&creative(), 0);
    host.query.push_online(&survival(), 2);
    host.query.push_online(&survival(), 0);
    host.query.push_online(&survival(), 0);

    let summary = make_poller(&host, CONFIG).run().await;

    assert_eq!(summary.cycles, 3);
    assert_eq!(
        summary.shut_down,
        vec![ServerName::new("creative"), ServerName::new("survival")]
    );

    // Only the lingering session needed a forced kill
    let terminated: Vec<_> = host
        .log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HostCall::Terminate(_)))
        .collect();
    assert_eq!(terminated, vec![HostCall::Terminate(SessionName::new("survival"))]);

    assert_eq!(host.power.power_offs(), 2);
    assert_eq!(
        host.log
            .count(|c| matches!(c, HostCall::SendCommand(_, cmd) if cmd == "stop")),
        2
    );
    assert_eq!(
        host.clock.sleeps(),
        vec![
            Duration::from_secs(60),
            Duration::from_secs(300),
            Duration::from_secs(15),
            Duration::from_secs(300),
            Duration::from_secs(15),
        ]
    );
}

#[tokio::test]
async fn test_cycle_report_events() {
    let host = MockHost::new();
    host.query.push_online(&creative(), 0);
    host.query.push_failure(&survival(), "no route to host");
    let mut poller = make_poller(&host, CONFIG);

    let report = poller.run_cycle().await;

    assert_eq!(report.remaining, 2);
    assert!(report.events.contains(&WatchEvent::Armed {
        server: ServerName::new("creative")
    }));
    assert!(!report.events.iter().any(|e| matches!(
        e,
        WatchEvent::Armed { server } | WatchEvent::Disarmed { server }
            if server.as_str() == "survival"
    )));
}

#[tokio::test]
async fn test_crashed_server_is_removed_without_power_off() {
    let host = MockHost::new();
    host.query.push_online(&creative(), 0);
    host.query.push_online(&survival(), 0);
    host.query.push_online(&creative(), 0);
    host.query.push_online(&survival(), 0);

    let summary = make_poller(&host, CONFIG).run().await;

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.shut_down.len(), 2);
    assert_eq!(host.power.power_offs(), 0);
    // Sessions are already gone: only the existence checks happen
    assert_eq!(host.log.count(|c| matches!(c, HostCall::Exists(_))), 2);
    assert_eq!(host.log.count(|c| matches!(c, HostCall::SendCommand(..))), 0);
}
