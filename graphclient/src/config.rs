// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client configuration
//!
//! A client is assembled either programmatically through [`ClientBuilder`] or
//! from a JSON [`ClientConfig`]:
//!
//! ```json
//! {
//!   "connections": [
//!     { "alias": "default", "uri": "bolt://primary:7687", "master": true },
//!     { "alias": "replica", "uri": "bolt://replica:7687" }
//!   ],
//!   "default_alias": "default",
//!   "log_level": "info",
//!   "log_events": true
//! }
//! ```
//!
//! Turning a [`ConnectionConfig`] into a live connection is up to a
//! [`ConnectionFactory`] supplied by the driver integration.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::client::Client;
use crate::driver::Connection;
use crate::error::{Error, Result};
use crate::events::{EventChannel, EventSubscriber};
use crate::logging::{init_logging, LogLevel, LoggingSubscriber};
use crate::registry::{ConnectionRegistry, ConnectionRegistryBuilder};

/// One configured endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub alias: String,
    pub uri: String,
    /// Whether this is the write-capable connection
    #[serde(default)]
    pub master: bool,
}

impl ConnectionConfig {
    pub fn new(alias: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            uri: uri.into(),
            master: false,
        }
    }

    pub fn as_master(mut self) -> Self {
        self.master = true;
        self
    }
}

/// Serializable client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub connections: Vec<ConnectionConfig>,
    /// Connection used when no alias is given; the first one otherwise
    #[serde(default)]
    pub default_alias: Option<String>,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
    /// Register a [`LoggingSubscriber`] on the client's event channel
    #[serde(default)]
    pub log_events: bool,
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        info!("Loading client configuration from {:?}", path.as_ref());
        Self::from_json_str(&contents)
    }

    /// Check aliases and master designation without connecting anywhere
    pub fn validate(&self) -> Result<()> {
        if self.connections.is_empty() {
            return Err(Error::Config("At least one connection is required".into()));
        }

        let mut seen = HashSet::new();
        for connection in &self.connections {
            if connection.alias.is_empty() {
                return Err(Error::Config("Connection alias must not be empty".into()));
            }
            if !seen.insert(connection.alias.as_str()) {
                return Err(Error::Config(format!(
                    "Connection alias '{}' configured twice",
                    connection.alias
                )));
            }
        }

        let masters = self.connections.iter().filter(|c| c.master).count();
        if masters > 1 {
            return Err(Error::Config(format!(
                "Only one master connection allowed, found {}",
                masters
            )));
        }

        if let Some(default) = &self.default_alias {
            if !seen.contains(default.as_str()) {
                return Err(Error::Config(format!(
                    "Default connection '{}' is not configured",
                    default
                )));
            }
        }

        Ok(())
    }

    pub fn master_alias(&self) -> Option<&str> {
        self.connections
            .iter()
            .find(|c| c.master)
            .map(|c| c.alias.as_str())
    }

    /// Initialise env_logger with the configured level
    pub fn init_logging(&self) {
        init_logging(self.log_level);
    }
}

/// Creates driver connections from configuration entries
pub trait ConnectionFactory {
    fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&ConnectionConfig) -> Result<Arc<dyn Connection>>,
{
    fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>> {
        self(config)
    }
}

/// Fluent builder for [`Client`]
pub struct ClientBuilder {
    registry: ConnectionRegistryBuilder,
    events: Arc<EventChannel>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::builder(),
            events: Arc::new(EventChannel::new()),
        }
    }

    /// Builder populated from configuration, connecting through `factory`
    pub fn from_config(config: &ClientConfig, factory: &dyn ConnectionFactory) -> Result<Self> {
        config.validate()?;

        let mut builder = Self::new();
        for entry in &config.connections {
            let connection = factory.connect(entry)?;
            if connection.alias() != entry.alias {
                return Err(Error::Config(format!(
                    "Factory returned connection '{}' for alias '{}'",
                    connection.alias(),
                    entry.alias
                )));
            }
            builder = builder.add_connection(connection);
        }

        if let Some(master) = config.master_alias() {
            builder = builder.set_master(master);
        }
        if let Some(default) = &config.default_alias {
            builder = builder.set_default(default.as_str());
        }
        if config.log_events {
            builder = builder.add_subscriber(Arc::new(LoggingSubscriber));
        }
        Ok(builder)
    }

    pub fn add_connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.registry = self.registry.with_connection(connection);
        self
    }

    pub fn set_master(mut self, alias: impl Into<String>) -> Self {
        self.registry = self.registry.master(alias);
        self
    }

    pub fn set_default(mut self, alias: impl Into<String>) -> Self {
        self.registry = self.registry.default_alias(alias);
        self
    }

    /// Share an existing event channel instead of creating a fresh one
    pub fn with_event_channel(mut self, events: Arc<EventChannel>) -> Self {
        self.events = events;
        self
    }

    pub fn add_subscriber(self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.events.add_subscriber(subscriber);
        self
    }

    pub fn build(self) -> Result<Client> {
        let registry = self.registry.build()?;
        Ok(Client::new(registry, self.events))
    }
}
