// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Transaction handle
//!
//! Pairs a driver transaction with the client's event channel. Lifecycle
//! (begin/commit/rollback) is entirely the driver's business; statements run
//! through the handle publish the same events as [`crate::Client::run`].
//! A handle dropped while still open is rolled back.

use log::{debug, warn};
use std::sync::Arc;

use crate::client::execute_with_events;
use crate::driver::{DriverTransaction, TransactionStatus};
use crate::error::Result;
use crate::events::EventChannel;
use crate::result::{ResultCollection, StatementResult};
use crate::statement::{Parameters, Stack, Statement};

pub struct Transaction {
    native: Box<dyn DriverTransaction>,
    events: Arc<EventChannel>,
    connection_alias: String,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("connection_alias", &self.connection_alias)
            .field("status", &self.native.status())
            .finish()
    }
}

impl Transaction {
    pub fn new(
        native: Box<dyn DriverTransaction>,
        events: Arc<EventChannel>,
        connection_alias: impl Into<String>,
    ) -> Self {
        Self {
            native,
            events,
            connection_alias: connection_alias.into(),
        }
    }

    pub fn begin(&mut self) -> Result<()> {
        debug!("begin transaction on '{}'", self.connection_alias);
        Ok(self.native.begin()?)
    }

    /// Run a statement inside the transaction; `Ok(None)` if a failure was suppressed
    pub fn run(
        &mut self,
        query: &str,
        parameters: Parameters,
        tag: Option<&str>,
    ) -> Result<Option<StatementResult>> {
        let statement = Statement::new(query, parameters, tag.map(str::to_string));
        let native = &mut self.native;
        execute_with_events(
            &self.events,
            vec![statement.clone()],
            || native.run(statement.text(), statement.parameters(), statement.tag()),
            |result| ResultCollection::from_result(result.clone()),
        )
    }

    /// Run a stack inside the transaction.
    ///
    /// The stack's alias and write flag are ignored: everything goes to the
    /// connection the transaction was opened on.
    pub fn run_stack(&mut self, stack: &Stack) -> Result<Option<ResultCollection>> {
        if let Some(alias) = stack.connection_alias() {
            if alias != self.connection_alias {
                debug!(
                    "stack alias '{}' ignored inside transaction on '{}'",
                    alias, self.connection_alias
                );
            }
        }

        let tag = stack.tag().map(str::to_string);
        let native = &mut self.native;
        let results = execute_with_events(
            &self.events,
            stack.statements().to_vec(),
            || native.run_batch(stack.statements()),
            |results| ResultCollection::from_batch(results.clone(), tag.clone()),
        )?;
        Ok(results.map(|results| ResultCollection::from_batch(results, tag)))
    }

    pub fn commit(&mut self) -> Result<()> {
        debug!("commit transaction on '{}'", self.connection_alias);
        Ok(self.native.commit()?)
    }

    pub fn rollback(&mut self) -> Result<()> {
        debug!("rollback transaction on '{}'", self.connection_alias);
        Ok(self.native.rollback()?)
    }

    pub fn status(&self) -> TransactionStatus {
        self.native.status()
    }

    pub fn is_open(&self) -> bool {
        self.status() == TransactionStatus::Open
    }

    pub fn is_committed(&self) -> bool {
        self.status() == TransactionStatus::Committed
    }

    pub fn is_rolled_back(&self) -> bool {
        self.status() == TransactionStatus::RolledBack
    }

    pub fn connection_alias(&self) -> &str {
        &self.connection_alias
    }

    pub fn events(&self) -> &Arc<EventChannel> {
        &self.events
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.is_open() {
            warn!(
                "transaction on '{}' dropped while open, rolling back",
                self.connection_alias
            );
            if let Err(e) = self.native.rollback() {
                warn!("rollback on drop failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::memory::MemoryConnection;
    use crate::driver::Connection;
    use crate::error::DatabaseError;
    use crate::events::FailureDecision;
    use parking_lot::Mutex;

    fn open(conn: &MemoryConnection, events: Arc<EventChannel>) -> Transaction {
        Transaction::new(conn.transaction().unwrap(), events, conn.alias())
    }

    #[test]
    fn test_lifecycle_is_delegated() {
        let conn = MemoryConnection::new("default");
        let mut tx = open(&conn, Arc::new(EventChannel::new()));

        assert_eq!(tx.status(), TransactionStatus::Pending);
        tx.begin().unwrap();
        assert!(tx.is_open());

        tx.run("CREATE (n)", Parameters::new(), None).unwrap();
        tx.commit().unwrap();
        assert!(tx.is_committed());
        assert_eq!(conn.journal().len(), 1);

        assert!(tx.rollback().unwrap_err().is_database_error());
    }

    #[test]
    fn test_run_publishes_events() {
        let conn = MemoryConnection::new("default");
        let events = Arc::new(EventChannel::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        events.on_pre_run(move |e| s.lock().push(format!("pre:{}", e.statements()[0].text())));
        let s = Arc::clone(&seen);
        events.on_post_run(move |e| s.lock().push(format!("post:{}", e.results().len())));

        let mut tx = open(&conn, events);
        tx.run("CREATE (n)", Parameters::new(), Some("create")).unwrap();

        assert_eq!(*seen.lock(), vec!["pre:CREATE (n)", "post:1"]);
    }

    #[test]
    fn test_run_failure_can_be_suppressed() {
        let conn = MemoryConnection::new("default");
        conn.fail_on("BAD", DatabaseError::new("syntax"));
        let events = Arc::new(EventChannel::new());
        events.on_failure(|_| Some(FailureDecision::Suppress));

        let mut tx = open(&conn, events);
        assert!(tx.run("BAD", Parameters::new(), None).unwrap().is_none());
        assert!(tx.is_rolled_back());
    }

    #[test]
    fn test_run_stack_inside_transaction() {
        let conn = MemoryConnection::new("default");
        let mut tx = open(&conn, Arc::new(EventChannel::new()));

        let mut stack = Stack::new(Some("batch".into()), Some("replica".into()));
        stack
            .push_write("CREATE (a)", Parameters::new(), None)
            .push("MATCH (n) RETURN n", Parameters::new(), None);

        let results = tx.run_stack(&stack).unwrap().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.tag(), Some("batch"));

        tx.commit().unwrap();
        assert_eq!(conn.journal().entries_for("default").len(), 2);
    }

    #[test]
    fn test_drop_rolls_back_open_transaction() {
        let conn = MemoryConnection::new("default");
        {
            let mut tx = open(&conn, Arc::new(EventChannel::new()));
            tx.run("CREATE (n)", Parameters::new(), None).unwrap();
            assert!(tx.is_open());
        }
        assert!(conn.journal().is_empty());
    }
}
