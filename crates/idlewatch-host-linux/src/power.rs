//! Host power-off

use async_trait::async_trait;
use idlewatch_host_api::{HostError, HostResult, PowerController};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// Powers off the host by running a system command
pub struct SystemPower {
    argv: Vec<String>,
}

impl SystemPower {
    /// `command` is the power-off argv; with `use_sudo` it is prefixed by
    /// `sudo` unless the daemon already runs as root.
    pub fn new(command: Vec<String>, use_sudo: bool) -> Self {
        let is_root = nix::unistd::geteuid().is_root();
        Self {
            argv: power_argv(command, use_sudo, is_root),
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

fn power_argv(command: Vec<String>, use_sudo: bool, is_root: bool) -> Vec<String> {
    if use_sudo && !is_root {
        std::iter::once("sudo".to_string()).chain(command).collect()
    } else {
        command
    }
}

#[async_trait]
impl PowerController for SystemPower {
    async fn shutdown_host(&self) -> HostResult<()> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| HostError::CommandFailed("Empty power-off command".into()))?;

        info!(command = %self.argv.join(" "), "Powering off host");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "Power-off command failed");
            Err(HostError::CommandFailed(format!(
                "{} exited with {}",
                program, output.status
            )))
        }
    }
}

/// Logs the power-off it would perform instead of performing it
pub struct DryRunPower {
    argv: Vec<String>,
}

impl DryRunPower {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

#[async_trait]
impl PowerController for DryRunPower {
    async fn shutdown_host(&self) -> HostResult<()> {
        info!(command = %self.argv.join(" "), "Dry run: skipping host power-off");
        Ok(())
    }
}
