//! Mock collaborators for testing

use async_trait::async_trait;
use idlewatch_util::{ServerAddress, SessionName};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    Clock, HostError, HostResult, PowerController, QueryError, QueryResult, ServerQuery,
    ServerStatus, SessionController,
};

/// One interaction with a mock collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Query(ServerAddress),
    Exists(SessionName),
    SendCommand(SessionName, String),
    SendKeystroke(SessionName),
    Terminate(SessionName),
    PowerOff,
    Sleep(Duration),
}

/// Ordered call log, shareable between mocks so tests can assert on
/// interleaving across collaborators
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<HostCall>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: HostCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&HostCall) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| matches(c)).count()
    }
}

/// Scripted status query client
pub struct MockQuery {
    log: CallLog,
    scripts: Arc<Mutex<HashMap<ServerAddress, VecDeque<Result<u32, String>>>>>,
}

impl MockQuery {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            scripts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Queue a successful response reporting `online` players
    pub fn push_online(&self, address: &ServerAddress, online: u32) {
        self.push(address, Ok(online));
    }

    /// Queue a failed query
    pub fn push_failure(&self, address: &ServerAddress, reason: impl Into<String>) {
        self.push(address, Err(reason.into()));
    }

    /// Addresses queried so far, in order
    pub fn queried(&self) -> Vec<ServerAddress> {
        self.log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Query(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }

    fn push(&self, address: &ServerAddress, response: Result<u32, String>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(address.clone())
            .or_default()
            .push_back(response);
    }
}

impl Default for MockQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServerQuery for MockQuery {
    async fn query(&self, address: &ServerAddress) -> QueryResult<ServerStatus> {
        self.log.record(HostCall::Query(address.clone()));

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(address)
            .and_then(|q| q.pop_front());

        match next {
            Some(Ok(online)) => Ok(ServerStatus::with_online(online)),
            Some(Err(reason)) => Err(QueryError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                reason,
            ))),
            None => Err(QueryError::Protocol(format!(
                "no scripted response for {}",
                address
            ))),
        }
    }
}

/// How a mock session reacts to the stop command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSessionBehavior {
    /// The server exits as soon as a command is sent
    ExitsOnCommand,
    /// The session survives until terminated
    Lingers,
}

/// Mock session controller
pub struct MockSessions {
    log: CallLog,
    sessions: Arc<Mutex<HashMap<SessionName, MockSessionBehavior>>>,

    /// Configure send/terminate operations to fail
    pub fail_commands: Arc<Mutex<bool>>,
}

impl MockSessions {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            fail_commands: Arc::new(Mutex::new(false)),
        }
    }

    pub fn add_session(&self, name: impl Into<String>, behavior: MockSessionBehavior) {
        self.sessions
            .lock()
            .unwrap()
            .insert(SessionName::new(name), behavior);
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .contains_key(&SessionName::new(name))
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.log.calls()
    }

    fn check_writable(&self, session: &SessionName) -> HostResult<()> {
        if *self.fail_commands.lock().unwrap() {
            return Err(HostError::CommandFailed("Mock command failure".into()));
        }
        if !self.sessions.lock().unwrap().contains_key(session) {
            return Err(HostError::CommandFailed(format!(
                "can't find session: {}",
                session
            )));
        }
        Ok(())
    }
}

impl Default for MockSessions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionController for MockSessions {
    async fn exists(&self, session: &SessionName) -> HostResult<bool> {
        self.log.record(HostCall::Exists(session.clone()));
        Ok(self.sessions.lock().unwrap().contains_key(session))
    }

    async fn send_command(&self, session: &SessionName, text: &str) -> HostResult<()> {
        self.log
            .record(HostCall::SendCommand(session.clone(), text.to_string()));
        self.check_writable(session)?;

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.get(session) == Some(&MockSessionBehavior::ExitsOnCommand) {
            sessions.remove(session);
        }
        Ok(())
    }

    async fn send_keystroke(&self, session: &SessionName) -> HostResult<()> {
        self.log.record(HostCall::SendKeystroke(session.clone()));
        self.check_writable(session)
    }

    async fn terminate(&self, session: &SessionName) -> HostResult<()> {
        self.log.record(HostCall::Terminate(session.clone()));
        self.check_writable(session)?;
        self.sessions.lock().unwrap().remove(session);
        Ok(())
    }
}

/// Mock power controller
pub struct MockPower {
    log: CallLog,

    /// Configure power-off to fail
    pub fail: Arc<Mutex<bool>>,
}

impl MockPower {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Number of power-off requests received
    pub fn power_offs(&self) -> usize {
        self.log.count(|c| matches!(c, HostCall::PowerOff))
    }
}

impl Default for MockPower {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PowerController for MockPower {
    async fn shutdown_host(&self) -> HostResult<()> {
        self.log.record(HostCall::PowerOff);
        if *self.fail.lock().unwrap() {
            return Err(HostError::CommandFailed("Mock power-off failure".into()));
        }
        Ok(())
    }
}

/// Clock that records requested sleeps and returns immediately
pub struct MockClock {
    log: CallLog,
}

impl MockClock {
    pub fn new() -> Self {
        Self::with_log(CallLog::new())
    }

    pub fn with_log(log: CallLog) -> Self {
        Self { log }
    }

    /// Every sleep requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.log
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Sleep(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Simulated time elapsed
    pub fn elapsed(&self) -> Duration {
        self.sleeps().into_iter().sum()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for MockClock {
    async fn sleep(&self, duration: Duration) {
        self.log.record(HostCall::Sleep(duration));
    }
}

/// A full set of mock collaborators sharing one call log
pub struct MockHost {
    pub log: CallLog,
    pub query: Arc<MockQuery>,
    pub sessions: Arc<MockSessions>,
    pub power: Arc<MockPower>,
    pub clock: Arc<MockClock>,
}

impl MockHost {
    pub fn new() -> Self {
        let log = CallLog::new();
        Self {
            query: Arc::new(MockQuery::with_log(log.clone())),
            sessions: Arc::new(MockSessions::with_log(log.clone())),
            power: Arc::new(MockPower::with_log(log.clone())),
            clock: Arc::new(MockClock::with_log(log.clone())),
            log,
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> ServerAddress {
        ServerAddress::new("10.0.0.1", 25565)
    }

    #[tokio::test]
    async fn scripted_query_responses_in_order() {
        let query = MockQuery::new();
        query.push_online(&addr(), 0);
        query.push_failure(&addr(), "connection refused");

        assert_eq!(query.query(&addr()).await.unwrap().online, 0);
        assert!(matches!(query.query(&addr()).await, Err(QueryError::Io(_))));
        // Exhausted script fails rather than inventing a player count
        assert!(matches!(query.query(&addr()).await, Err(QueryError::Protocol(_))));
        assert_eq!(query.queried().len(), 3);
    }

    #[tokio::test]
    async fn session_exits_on_command() {
        let sessions = MockSessions::new();
        sessions.add_session("mc", MockSessionBehavior::ExitsOnCommand);
        let mc = SessionName::new("mc");

        assert!(sessions.exists(&mc).await.unwrap());
        sessions.send_command(&mc, "/stop").await.unwrap();
        assert!(!sessions.exists(&mc).await.unwrap());
    }

    #[tokio::test]
    async fn lingering_session_survives_until_terminated() {
        let sessions = MockSessions::new();
        sessions.add_session("mc", MockSessionBehavior::Lingers);
        let mc = SessionName::new("mc");

        sessions.send_command(&mc, "/stop").await.unwrap();
        assert!(sessions.is_running("mc"));

        sessions.terminate(&mc).await.unwrap();
        assert!(!sessions.is_running("mc"));
        assert!(sessions.terminate(&mc).await.is_err());
    }

    #[tokio::test]
    async fn shared_log_orders_calls_across_mocks() {
        let host = MockHost::new();
        host.clock.sleep(Duration::from_secs(15)).await;
        host.power.shutdown_host().await.unwrap();

        assert_eq!(
            host.log.calls(),
            vec![HostCall::Sleep(Duration::from_secs(15)), HostCall::PowerOff]
        );
        assert_eq!(host.power.power_offs(), 1);
        assert_eq!(host.clock.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test]
    async fn power_failure_is_reported() {
        let power = MockPower::new();
        *power.fail.lock().unwrap() = true;
        assert!(power.shutdown_host().await.is_err());
        assert_eq!(power.power_offs(), 1);
    }
}
