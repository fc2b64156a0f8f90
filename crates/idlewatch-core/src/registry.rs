//! Registry of monitored servers

use idlewatch_config::ServerConfig;
use idlewatch_util::{Result, ServerAddress, ServerName, SessionName, WatchError};
use std::collections::BTreeMap;

use crate::TriggerState;

/// A server under watch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredServer {
    pub name: ServerName,
    pub address: ServerAddress,
    /// Set after one idle poll; cleared by any non-idle poll
    pub idle_flag: bool,
}

impl MonitoredServer {
    pub fn new(name: impl Into<ServerName>, address: ServerAddress) -> Self {
        Self {
            name: name.into(),
            address,
            idle_flag: false,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            name: config.name.clone(),
            address: config.address.clone(),
            idle_flag: config.idle_flag,
        }
    }

    pub fn trigger_state(&self) -> TriggerState {
        TriggerState::from_idle_flag(self.idle_flag)
    }

    /// The session hosting this server is named after it
    pub fn session(&self) -> SessionName {
        SessionName::from(&self.name)
    }
}

/// The set of monitored servers, keyed by name.
///
/// The key set only ever shrinks, through [`Registry::remove`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    servers: BTreeMap<ServerName, MonitoredServer>,
}

impl Registry {
    pub fn new(servers: impl IntoIterator<Item = MonitoredServer>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for server in servers {
            if map.contains_key(&server.name) {
                return Err(WatchError::DuplicateServer(server.name));
            }
            map.insert(server.name.clone(), server);
        }
        Ok(Self { servers: map })
    }

    pub fn from_config(servers: &[ServerConfig]) -> Result<Self> {
        Self::new(servers.iter().map(MonitoredServer::from_config))
    }

    /// Names of all registered servers, in order, detached from the registry
    pub fn snapshot(&self) -> Vec<ServerName> {
        self.servers.keys().cloned().collect()
    }

    pub fn get(&self, name: &ServerName) -> Option<&MonitoredServer> {
        self.servers.get(name)
    }

    pub fn set_idle_flag(&mut self, name: &ServerName, idle_flag: bool) -> Result<()> {
        let server = self
            .servers
            .get_mut(name)
            .ok_or_else(|| WatchError::ServerNotFound(name.clone()))?;
        server.idle_flag = idle_flag;
        Ok(())
    }

    /// Remove a server; removing an absent name is a no-op
    pub fn remove(&mut self, name: &ServerName) -> Option<MonitoredServer> {
        self.servers.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }
}
