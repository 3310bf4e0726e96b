// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection registry
//!
//! Holds the aliased connections of a client and knows which one is the
//! default and which one is the write-capable master. The registry is built
//! once and never changes afterwards.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use crate::driver::Connection;
use crate::error::{Error, Result};

/// Immutable set of aliased connections
pub struct ConnectionRegistry {
    connections: HashMap<String, Arc<dyn Connection>>,
    /// Aliases in registration order
    aliases: Vec<String>,
    default_alias: String,
    master_alias: Option<String>,
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("aliases", &self.aliases)
            .field("default_alias", &self.default_alias)
            .field("master_alias", &self.master_alias)
            .finish()
    }
}

impl ConnectionRegistry {
    pub fn builder() -> ConnectionRegistryBuilder {
        ConnectionRegistryBuilder::default()
    }

    /// Resolve an alias, or the default connection when `alias` is `None`
    pub fn resolve(&self, alias: Option<&str>) -> Result<Arc<dyn Connection>> {
        match alias {
            Some(alias) => self.get(alias),
            None => Ok(self.default_connection()),
        }
    }

    /// Connection registered under `alias`
    pub fn get(&self, alias: &str) -> Result<Arc<dyn Connection>> {
        self.connections
            .get(alias)
            .cloned()
            .ok_or_else(|| Error::UnknownConnectionAlias(alias.to_string()))
    }

    pub fn default_connection(&self) -> Arc<dyn Connection> {
        // The builder guarantees the default alias is registered.
        Arc::clone(&self.connections[&self.default_alias])
    }

    pub fn master_connection(&self) -> Result<Arc<dyn Connection>> {
        let alias = self.master_alias.as_deref().ok_or(Error::NoMasterConfigured)?;
        self.get(alias)
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    pub fn master_alias(&self) -> Option<&str> {
        self.master_alias.as_deref()
    }

    /// Registered aliases, in registration order
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.connections.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Collects connections and the default/master designations
#[derive(Default)]
pub struct ConnectionRegistryBuilder {
    connections: Vec<Arc<dyn Connection>>,
    default_alias: Option<String>,
    master_alias: Option<String>,
}

impl ConnectionRegistryBuilder {
    /// Register a connection under its own alias
    pub fn with_connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connections.push(connection);
        self
    }

    /// Connection used when no alias is given; the first one registered otherwise
    pub fn default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = Some(alias.into());
        self
    }

    /// Designate the write-capable connection
    pub fn master(mut self, alias: impl Into<String>) -> Self {
        self.master_alias = Some(alias.into());
        self
    }

    pub fn build(self) -> Result<ConnectionRegistry> {
        let mut connections = HashMap::new();
        let mut aliases = Vec::with_capacity(self.connections.len());

        for connection in self.connections {
            let alias = connection.alias().to_string();
            if alias.is_empty() {
                return Err(Error::Config("Connection alias must not be empty".into()));
            }
            if connections.contains_key(&alias) {
                return Err(Error::Config(format!(
                    "Connection alias '{}' registered twice",
                    alias
                )));
            }
            debug!("Registering connection '{}'", alias);
            aliases.push(alias.clone());
            connections.insert(alias, connection);
        }

        let default_alias = match self.default_alias {
            Some(alias) => alias,
            None => aliases
                .first()
                .cloned()
                .ok_or_else(|| Error::Config("At least one connection is required".into()))?,
        };
        if !connections.contains_key(&default_alias) {
            return Err(Error::Config(format!(
                "Default connection '{}' is not registered",
                default_alias
            )));
        }

        if let Some(master) = &self.master_alias {
            if !connections.contains_key(master) {
                return Err(Error::Config(format!(
                    "Master connection '{}' is not registered",
                    master
                )));
            }
        }

        info!(
            "Connection registry ready: {} connection(s), default '{}', master {:?}",
            aliases.len(),
            default_alias,
            self.master_alias
        );

        Ok(ConnectionRegistry {
            connections,
            aliases,
            default_alias,
            master_alias: self.master_alias,
        })
    }
}
