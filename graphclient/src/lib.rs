// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphClient - routed, event-mediated Cypher client
//!
//! This crate sits between application code and a graph database driver. It
//! decides which connection a statement or a batch of statements goes to,
//! publishes lifecycle events around every execution, and lets event
//! listeners decide whether a failed execution should raise.
//!
//! # Quick Start
//!
//! ```no_run
//! use graphclient::{params, Client, Error};
//! use graphclient::driver::memory::MemoryConnection;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Error> {
//! let client = Client::builder()
//!     .add_connection(Arc::new(MemoryConnection::new("default")))
//!     .add_connection(Arc::new(MemoryConnection::new("replica")))
//!     .set_master("default")
//!     .build()?;
//!
//! // Reads go wherever the alias says
//! client.run("MATCH (n) RETURN n", params! {}, None, Some("replica"))?;
//!
//! // Writes always go to the master
//! client.run_write("CREATE (n:Person {name: $name})", params! { "name" => "Alice" }, None)?;
//!
//! // A stack with a write is routed to the master as a whole
//! let mut stack = client.stack(Some("import"), Some("replica"));
//! stack.push_write("CREATE (m:Movie)", params! {}, None);
//! stack.push("MATCH (m:Movie) RETURN count(m)", params! {}, Some("count".into()));
//! let results = client.run_stack(&stack)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Application Code (Your Rust App)      │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  GraphClient (this crate)               │
//! │  - Client (routing + execution)         │
//! │  - ConnectionRegistry (aliases/master)  │
//! │  - EventChannel (pre/post/failure)      │
//! │  - Transaction (instrumented handle)    │
//! └─────────────────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────┐
//! │  Driver (Connection trait)              │
//! │  - wire protocol, pooling               │
//! │  - pipelines, native transactions       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! - [`client`] - Routing and event-mediated execution
//! - [`registry`] - Aliased connections, default and master
//! - [`statement`] - Statement and stack value objects
//! - [`result`] - Records, per-statement results and collections
//! - [`events`] - Lifecycle events and listeners
//! - [`transaction`] - Transaction handle
//! - [`driver`] - Driver traits and the in-memory backend
//! - [`config`] - Configuration and the client builder
//! - [`logging`] - Logger setup and the logging subscriber
//! - [`error`] - Error types and handling

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod labels;
pub mod logging;
pub mod registry;
pub mod result;
pub mod statement;
pub mod transaction;

#[doc(hidden)]
pub use serde_json as __serde_json;

// Re-export main types for convenience
pub use client::Client;
pub use config::{ClientBuilder, ClientConfig, ConnectionConfig, ConnectionFactory};
pub use driver::{Connection, DriverTransaction, Pipeline, TransactionStatus};
pub use error::{DatabaseError, Error, Result};
pub use events::{
    EventChannel, EventSubscriber, FailureDecision, FailureEvent, PostRunEvent, PreRunEvent,
    Signal,
};
pub use labels::Label;
pub use logging::{init_logging, LogLevel, LoggingSubscriber};
pub use registry::ConnectionRegistry;
pub use result::{Record, ResultCollection, ResultSummary, StatementResult, UpdateStatistics};
pub use statement::{Parameters, Stack, Statement};
pub use transaction::Transaction;
