//! idlewatchd - Idle-shutdown watchdog for game servers
//!
//! Wires together:
//! - Configuration loading
//! - The Minecraft status client
//! - tmux session control and host power-off
//! - The core poller, run until no monitored server remains

use anyhow::{Context, Result};
use clap::Parser;
use idlewatch_config::{WatchConfig, load_config};
use idlewatch_core::{Poller, Registry, ShutdownSequencer};
use idlewatch_host_api::{Clock, PowerController, ServerQuery, SessionController, TokioClock};
use idlewatch_host_linux::{DryRunPower, JavaStatusQuery, SystemPower, TmuxSessions};
use idlewatch_util::{IDLEWATCH_CONFIG_ENV, config_path_without_env, format_duration};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// idlewatchd - Shuts down idle game servers and powers off the host
#[derive(Parser, Debug)]
#[command(name = "idlewatchd")]
#[command(about = "Shuts down idle game servers and powers off the host", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/idlewatch/config.toml)
    #[arg(short, long, env = IDLEWATCH_CONFIG_ENV, default_value_os_t = config_path_without_env())]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Start polling immediately instead of waiting for the grace period
    #[arg(long)]
    skip_grace: bool,

    /// Log the power-off instead of running it
    #[arg(long)]
    dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_poller(config: WatchConfig, args: &Args) -> Result<Poller> {
    let registry =
        Registry::from_config(&config.servers).context("Failed to build server registry")?;

    let query: Arc<dyn ServerQuery> = Arc::new(JavaStatusQuery::new(
        config.query.timeout,
        config.query.protocol_version,
    ));
    let sessions: Arc<dyn SessionController> =
        Arc::new(TmuxSessions::new(config.session.tmux_path.clone()));
    let power: Arc<dyn PowerController> = if args.dry_run {
        Arc::new(DryRunPower::new(config.power.command.clone()))
    } else {
        let power = SystemPower::new(config.power.command.clone(), config.power.use_sudo);
        info!(command = %power.argv().join(" "), "Host power-off command");
        Arc::new(power)
    };
    let clock: Arc<dyn Clock> = Arc::new(TokioClock);

    let mut watchdog = config.watchdog;
    if args.skip_grace {
        watchdog.grace_period = Duration::ZERO;
    }

    let sequencer = ShutdownSequencer::new(
        sessions,
        power,
        clock.clone(),
        config.session.stop_command.clone(),
    );

    Ok(Poller::new(registry, query, sequencer, clock, watchdog))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    info!(version = env!("CARGO_PKG_VERSION"), "idlewatchd starting");

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    info!(
        config_path = %args.config.display(),
        servers = config.servers.len(),
        poll_interval = %format_duration(config.watchdog.poll_interval),
        dry_run = args.dry_run,
        "Configuration loaded"
    );

    let poller = build_poller(config, &args)?;

    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    tokio::select! {
        summary = poller.run() => {
            info!(
                cycles = summary.cycles,
                shut_down = summary.shut_down.len(),
                "Watch complete"
            );
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, exiting");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, exiting");
        }
    }

    Ok(())
}
