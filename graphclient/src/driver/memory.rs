// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory driver backend
//!
//! Scripted connections that never leave the process. Every execution attempt
//! is appended to a [`Journal`], which can be shared between connections to
//! observe the global execution order. Responses and failures are scripted per
//! query text.

use log::{debug, trace};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Connection, DriverResult, DriverTransaction, Pipeline, TransactionStatus};
use crate::error::DatabaseError;
use crate::labels::LABELS_QUERY;
use crate::result::{Record, ResultSummary, StatementResult, UpdateStatistics};
use crate::statement::{Parameters, Statement};

/// How a statement reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionKind {
    Direct,
    Pipeline,
    Transaction,
}

/// One execution attempt
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub connection_alias: String,
    pub statement: Statement,
    pub kind: ExecutionKind,
    pub succeeded: bool,
}

/// Append-only log of execution attempts, cheap to clone and share
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().clone()
    }

    /// Entries executed on one connection
    pub fn entries_for(&self, alias: &str) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.connection_alias == alias)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    records: Vec<Record>,
    statistics: UpdateStatistics,
}

#[derive(Debug)]
struct MemoryState {
    alias: String,
    journal: Journal,
    responses: RwLock<HashMap<String, ScriptedResponse>>,
    failures: RwLock<HashMap<String, DatabaseError>>,
    labels: RwLock<Vec<String>>,
}

impl MemoryState {
    /// Produce the outcome of one statement without journaling it
    fn evaluate(&self, statement: &Statement) -> DriverResult<StatementResult> {
        if let Some(error) = self.failures.read().get(statement.text()) {
            debug!(
                "[{}] scripted failure for '{}': {}",
                self.alias,
                statement.text(),
                error
            );
            return Err(error.clone());
        }

        let summary = ResultSummary::new(statement.clone(), self.alias.clone());
        if let Some(response) = self.responses.read().get(statement.text()) {
            return Ok(StatementResult::new(
                response.records.clone(),
                summary.with_statistics(response.statistics),
            ));
        }

        if statement.text() == LABELS_QUERY {
            let records = self
                .labels
                .read()
                .iter()
                .map(|label| Record::single("label", Value::String(label.clone())))
                .collect();
            return Ok(StatementResult::new(records, summary));
        }

        Ok(StatementResult::new(Vec::new(), summary))
    }

    fn entry(&self, statement: Statement, kind: ExecutionKind, succeeded: bool) -> JournalEntry {
        JournalEntry {
            connection_alias: self.alias.clone(),
            statement,
            kind,
            succeeded,
        }
    }
}

/// Scripted in-process connection
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    state: Arc<MemoryState>,
}

impl MemoryConnection {
    pub fn new(alias: impl Into<String>) -> Self {
        Self::with_journal(alias, Journal::new())
    }

    /// Connection recording into an existing (possibly shared) journal
    pub fn with_journal(alias: impl Into<String>, journal: Journal) -> Self {
        Self {
            state: Arc::new(MemoryState {
                alias: alias.into(),
                journal,
                responses: RwLock::new(HashMap::new()),
                failures: RwLock::new(HashMap::new()),
                labels: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.state.journal
    }

    /// Answer `query` with the given records
    pub fn respond_to(&self, query: impl Into<String>, records: Vec<Record>) -> &Self {
        self.respond_to_with(query, records, UpdateStatistics::default())
    }

    /// Answer `query` with the given records and update counters
    pub fn respond_to_with(
        &self,
        query: impl Into<String>,
        records: Vec<Record>,
        statistics: UpdateStatistics,
    ) -> &Self {
        self.state.responses.write().insert(
            query.into(),
            ScriptedResponse {
                records,
                statistics,
            },
        );
        self
    }

    /// Make every execution of `query` fail with `error`
    pub fn fail_on(&self, query: impl Into<String>, error: DatabaseError) -> &Self {
        self.state.failures.write().insert(query.into(), error);
        self
    }

    /// Stop failing `query`
    pub fn clear_failure(&self, query: &str) -> &Self {
        self.state.failures.write().remove(query);
        self
    }

    /// Labels reported for `CALL db.labels()`
    pub fn set_labels<I, S>(&self, labels: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.state.labels.write() = labels.into_iter().map(Into::into).collect();
        self
    }
}

impl Connection for MemoryConnection {
    fn alias(&self) -> &str {
        &self.state.alias
    }

    fn run(
        &self,
        query: &str,
        parameters: &Parameters,
        tag: Option<&str>,
    ) -> DriverResult<StatementResult> {
        let statement = Statement::new(query, parameters.clone(), tag.map(str::to_string));
        trace!("[{}] run: {}", self.state.alias, statement);

        let mut journal = self.state.journal.entries.lock();
        let outcome = self.state.evaluate(&statement);
        journal.push(
            self.state
                .entry(statement, ExecutionKind::Direct, outcome.is_ok()),
        );
        outcome
    }

    fn transaction(&self) -> DriverResult<Box<dyn DriverTransaction>> {
        Ok(Box::new(MemoryTransaction {
            state: Arc::clone(&self.state),
            status: TransactionStatus::Pending,
            pending: Vec::new(),
        }))
    }

    fn create_pipeline(&self, tag: Option<&str>) -> Box<dyn Pipeline> {
        Box::new(MemoryPipeline {
            state: Arc::clone(&self.state),
            tag: tag.map(str::to_string),
            statements: Vec::new(),
        })
    }
}

/// Pipeline of a [`MemoryConnection`]
pub struct MemoryPipeline {
    state: Arc<MemoryState>,
    tag: Option<String>,
    statements: Vec<Statement>,
}

impl Pipeline for MemoryPipeline {
    fn push(&mut self, query: &str, parameters: &Parameters, tag: Option<&str>) {
        self.statements.push(Statement::new(
            query,
            parameters.clone(),
            tag.map(str::to_string),
        ));
    }

    fn len(&self) -> usize {
        self.statements.len()
    }

    fn run(self: Box<Self>) -> DriverResult<Vec<StatementResult>> {
        let MemoryPipeline {
            state,
            tag,
            statements,
        } = *self;
        debug!(
            "[{}] running pipeline {:?} with {} statement(s)",
            state.alias,
            tag,
            statements.len()
        );

        // Held for the whole batch so no other call interleaves.
        let mut journal = state.journal.entries.lock();
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            match state.evaluate(&statement) {
                Ok(result) => {
                    journal.push(state.entry(statement, ExecutionKind::Pipeline, true));
                    results.push(result);
                }
                Err(e) => {
                    journal.push(state.entry(statement, ExecutionKind::Pipeline, false));
                    return Err(e);
                }
            }
        }
        Ok(results)
    }
}

/// Transaction of a [`MemoryConnection`]; entries reach the journal on commit
pub struct MemoryTransaction {
    state: Arc<MemoryState>,
    status: TransactionStatus,
    pending: Vec<JournalEntry>,
}

impl MemoryTransaction {
    fn closed_error(&self) -> DatabaseError {
        DatabaseError::with_code(
            "Neo.ClientError.Transaction.TransactionNotFound",
            format!("Transaction is {}", self.status),
        )
    }

    fn ensure_open(&mut self) -> DriverResult<()> {
        match self.status {
            TransactionStatus::Pending => self.begin(),
            TransactionStatus::Open => Ok(()),
            _ => Err(self.closed_error()),
        }
    }

    fn execute(&mut self, statement: Statement) -> DriverResult<StatementResult> {
        match self.state.evaluate(&statement) {
            Ok(result) => {
                self.pending
                    .push(self.state.entry(statement, ExecutionKind::Transaction, true));
                Ok(result)
            }
            Err(e) => {
                // A failed statement rolls the whole transaction back.
                let entry = self.state.entry(statement, ExecutionKind::Transaction, false);
                self.state.journal.entries.lock().push(entry);
                self.pending.clear();
                self.status = TransactionStatus::RolledBack;
                Err(e)
            }
        }
    }
}

impl DriverTransaction for MemoryTransaction {
    fn begin(&mut self) -> DriverResult<()> {
        if self.status != TransactionStatus::Pending {
            return Err(DatabaseError::with_code(
                "Neo.ClientError.Transaction.TransactionStartFailed",
                format!("Cannot begin a transaction that is {}", self.status),
            ));
        }
        trace!("[{}] begin transaction", self.state.alias);
        self.status = TransactionStatus::Open;
        Ok(())
    }

    fn run(
        &mut self,
        query: &str,
        parameters: &Parameters,
        tag: Option<&str>,
    ) -> DriverResult<StatementResult> {
        self.ensure_open()?;
        self.execute(Statement::new(query, parameters.clone(), tag.map(str::to_string)))
    }

    fn run_batch(&mut self, statements: &[Statement]) -> DriverResult<Vec<StatementResult>> {
        self.ensure_open()?;
        statements
            .iter()
            .map(|statement| self.execute(statement.clone()))
            .collect()
    }

    fn commit(&mut self) -> DriverResult<()> {
        if self.status != TransactionStatus::Open {
            return Err(self.closed_error());
        }
        debug!(
            "[{}] commit transaction with {} statement(s)",
            self.state.alias,
            self.pending.len()
        );
        self.state.journal.entries.lock().append(&mut self.pending);
        self.status = TransactionStatus::Committed;
        Ok(())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        match self.status {
            TransactionStatus::Pending | TransactionStatus::Open => {
                debug!("[{}] rollback transaction", self.state.alias);
                self.pending.clear();
                self.status = TransactionStatus::RolledBack;
                Ok(())
            }
            _ => Err(self.closed_error()),
        }
    }

    fn status(&self) -> TransactionStatus {
        self.status
    }
}
