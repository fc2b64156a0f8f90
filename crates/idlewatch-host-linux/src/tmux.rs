//! tmux-backed session control

use async_trait::async_trait;
use idlewatch_host_api::{HostError, HostResult, SessionController};
use idlewatch_util::SessionName;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::debug;

/// Controls server consoles running inside tmux sessions
pub struct TmuxSessions {
    tmux: PathBuf,
}

impl TmuxSessions {
    pub fn new(tmux: impl Into<PathBuf>) -> Self {
        Self { tmux: tmux.into() }
    }

    async fn run(&self, args: &[String]) -> HostResult<Output> {
        debug!(tmux = %self.tmux.display(), ?args, "Running tmux");
        let output = Command::new(&self.tmux)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;
        Ok(output)
    }

    async fn run_checked(&self, session: &SessionName, args: &[String]) -> HostResult<()> {
        let output = self.run(args).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(HostError::CommandFailed(format!(
                "tmux {} for session '{}' exited with {}: {}",
                args[0],
                session,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

impl Default for TmuxSessions {
    fn default() -> Self {
        Self::new("tmux")
    }
}

/// Exact-match session target, so `mc` never resolves to `mc-creative`
fn session_target(session: &SessionName) -> HostResult<String> {
    session.validate()?;
    Ok(format!("={}", session))
}

/// Exact-match pane target: the active pane of the session
fn pane_target(session: &SessionName) -> HostResult<String> {
    session.validate()?;
    Ok(format!("={}:", session))
}

fn has_session_args(session: &SessionName) -> HostResult<Vec<String>> {
    Ok(vec!["has-session".into(), "-t".into(), session_target(session)?])
}

fn send_keys_args(session: &SessionName, text: Option<&str>) -> HostResult<Vec<String>> {
    let mut args = vec!["send-keys".into(), "-t".into(), pane_target(session)?];
    if let Some(text) = text {
        // -l types the text literally; Enter is sent as a separate key below
        args.push("-l".into());
        args.push(text.into());
    }
    Ok(args)
}

fn enter_args(session: &SessionName) -> HostResult<Vec<String>> {
    Ok(vec![
        "send-keys".into(),
        "-t".into(),
        pane_target(session)?,
        "C-m".into(),
    ])
}

fn kill_session_args(session: &SessionName) -> HostResult<Vec<String>> {
    Ok(vec!["kill-session".into(), "-t".into(), session_target(session)?])
}

#[async_trait]
impl SessionController for TmuxSessions {
    async fn exists(&self, session: &SessionName) -> HostResult<bool> {
        let output = self.run(&has_session_args(session)?).await?;
        Ok(output.status.success())
    }

    async fn send_command(&self, session: &SessionName, text: &str) -> HostResult<()> {
        self.run_checked(session, &send_keys_args(session, Some(text))?)
            .await?;
        self.run_checked(session, &enter_args(session)?).await
    }

    async fn send_keystroke(&self, session: &SessionName) -> HostResult<()> {
        self.run_checked(session, &enter_args(session)?).await
    }

    async fn terminate(&self, session: &SessionName) -> HostResult<()> {
        self.run_checked(session, &kill_session_args(session)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_are_exact_matches() {
        let mc = SessionName::new("minecraft");
        assert_eq!(
            has_session_args(&mc).unwrap(),
            vec!["has-session", "-t", "=minecraft"]
        );
        assert_eq!(
            kill_session_args(&mc).unwrap(),
            vec!["kill-session", "-t", "=minecraft"]
        );
        assert_eq!(
            enter_args(&mc).unwrap(),
            vec!["send-keys", "-t", "=minecraft:", "C-m"]
        );
    }

    #[test]
    fn command_text_is_sent_literally() {
        let mc = SessionName::new("minecraft");
        assert_eq!(
            send_keys_args(&mc, Some("/stop")).unwrap(),
            vec!["send-keys", "-t", "=minecraft:", "-l", "/stop"]
        );
    }

    #[test]
    fn invalid_session_names_never_reach_tmux() {
        let bad = SessionName::new("mc:0.1");
        assert!(matches!(
            has_session_args(&bad),
            Err(HostError::InvalidSession(_))
        ));
    }

    #[tokio::test]
    async fn exists_follows_exit_status() {
        let mc = SessionName::new("minecraft");

        // Stand-ins for tmux that ignore their arguments
        assert!(TmuxSessions::new("true").exists(&mc).await.unwrap());
        assert!(!TmuxSessions::new("false").exists(&mc).await.unwrap());
    }

    #[tokio::test]
    async fn failing_command_is_reported() {
        let mc = SessionName::new("minecraft");
        let result = TmuxSessions::new("false").terminate(&mc).await;
        assert!(matches!(result, Err(HostError::CommandFailed(_))));
    }

    #[tokio::test]
    async fn missing_binary_is_io_error() {
        let mc = SessionName::new("minecraft");
        let result = TmuxSessions::new("/nonexistent/tmux").exists(&mc).await;
        assert!(matches!(result, Err(HostError::Io(_))));
    }
}
