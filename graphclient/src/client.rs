// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client - routes statements to connections and publishes execution events
//!
//! Routing rules:
//! - [`Client::run`] uses the connection named by the alias, or the default one
//! - [`Client::run_write`] always uses the master connection
//! - [`Client::run_stack`] uses the master connection when the stack contains a
//!   write, and the stack's own alias otherwise
//!
//! `run` and `run_stack` are wrapped in pre-run/post-run/on-failure events and
//! failure listeners may suppress the driver error. `run_write` bypasses events
//! entirely and its errors always propagate.

use log::{debug, error, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ClientBuilder;
use crate::driver::DriverResult;
use crate::error::{Error, Result};
use crate::events::{EventChannel, FailureDecision, FailureEvent, PostRunEvent, PreRunEvent};
use crate::labels::{labels_from_result, Label, LABELS_QUERY};
use crate::registry::ConnectionRegistry;
use crate::result::{ResultCollection, StatementResult};
use crate::statement::{Parameters, Stack, Statement};
use crate::transaction::Transaction;

/// Execute a unit of work between pre-run and post-run/on-failure events.
///
/// Returns `Ok(None)` when a failure listener suppressed the driver error.
pub(crate) fn execute_with_events<T, E, W>(
    events: &EventChannel,
    statements: Vec<Statement>,
    execute: E,
    wrap: W,
) -> Result<Option<T>>
where
    E: FnOnce() -> DriverResult<T>,
    W: FnOnce(&T) -> ResultCollection,
{
    let execution_id = Uuid::new_v4();
    events.dispatch_pre_run(&PreRunEvent::new(execution_id, statements));

    match execute() {
        Ok(output) => {
            events.dispatch_post_run(&PostRunEvent::new(execution_id, wrap(&output)));
            Ok(Some(output))
        }
        Err(e) => {
            let event = FailureEvent::new(execution_id, e);
            match events.dispatch_failure(&event) {
                FailureDecision::Suppress => {
                    warn!("[{}] failure suppressed: {}", execution_id, event.error());
                    Ok(None)
                }
                FailureDecision::Propagate => {
                    error!("[{}] execution failed: {}", execution_id, event.error());
                    Err(Error::Database(event.into_error()))
                }
            }
        }
    }
}

/// Main entry point: a registry of connections plus an event channel
#[derive(Debug)]
pub struct Client {
    registry: ConnectionRegistry,
    events: Arc<EventChannel>,
}

impl Client {
    pub fn new(registry: ConnectionRegistry, events: Arc<EventChannel>) -> Self {
        Self { registry, events }
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run a statement on the aliased (or default) connection.
    ///
    /// Returns `Ok(None)` if the statement failed and a failure listener
    /// suppressed the error.
    pub fn run(
        &self,
        query: &str,
        parameters: Parameters,
        tag: Option<&str>,
        connection_alias: Option<&str>,
    ) -> Result<Option<StatementResult>> {
        let connection = self.registry.resolve(connection_alias)?;
        debug!("run on '{}': {}", connection.alias(), query);

        let statement = Statement::new(query, parameters, tag.map(str::to_string));
        execute_with_events(
            &self.events,
            vec![statement.clone()],
            || connection.run(statement.text(), statement.parameters(), statement.tag()),
            |result| ResultCollection::from_result(result.clone()),
        )
    }

    /// Run a statement on the master connection, without events
    pub fn run_write(
        &self,
        query: &str,
        parameters: Parameters,
        tag: Option<&str>,
    ) -> Result<StatementResult> {
        let connection = self.registry.master_connection()?;
        debug!("run_write on '{}': {}", connection.alias(), query);

        Ok(connection.run(query, &parameters, tag)?)
    }

    /// Create an empty stack
    pub fn stack(&self, tag: Option<&str>, connection_alias: Option<&str>) -> Stack {
        Stack::new(tag.map(str::to_string), connection_alias.map(str::to_string))
    }

    /// Run every statement of a stack as one pipeline.
    ///
    /// Stacks containing a write go to the master connection whatever alias
    /// they were created with.
    pub fn run_stack(&self, stack: &Stack) -> Result<Option<ResultCollection>> {
        let connection = if stack.has_writes() {
            self.registry.master_connection()?
        } else {
            self.registry.resolve(stack.connection_alias())?
        };
        debug!(
            "run_stack {:?} on '{}' ({} statement(s), writes: {})",
            stack.tag(),
            connection.alias(),
            stack.len(),
            stack.has_writes()
        );

        let mut pipeline = connection.create_pipeline(stack.tag());
        for statement in stack.statements() {
            pipeline.push(statement.text(), statement.parameters(), statement.tag());
        }

        let tag = stack.tag().map(str::to_string);
        let results = execute_with_events(
            &self.events,
            stack.statements().to_vec(),
            || pipeline.run(),
            |results| ResultCollection::from_batch(results.clone(), tag.clone()),
        )?;
        Ok(results.map(|results| ResultCollection::from_batch(results, tag)))
    }

    /// Open a transaction on the aliased (or default) connection
    pub fn transaction(&self, connection_alias: Option<&str>) -> Result<Transaction> {
        let connection = self.registry.resolve(connection_alias)?;
        debug!("opening transaction on '{}'", connection.alias());

        let native = connection.transaction()?;
        Ok(Transaction::new(
            native,
            Arc::clone(&self.events),
            connection.alias(),
        ))
    }

    /// List the node labels known to the aliased (or default) connection
    pub fn get_labels(&self, connection_alias: Option<&str>) -> Result<Vec<Label>> {
        let connection = self.registry.resolve(connection_alias)?;
        let result = connection.run(LABELS_QUERY, &Parameters::new(), None)?;
        Ok(labels_from_result(&result))
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn events(&self) -> &Arc<EventChannel> {
        &self.events
    }
}
