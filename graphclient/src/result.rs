// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query results
//!
//! Drivers hand back one [`StatementResult`] per executed statement. The
//! client groups them into a [`ResultCollection`] for the post-run event and
//! for the stack path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::statement::Statement;

/// One row returned by a statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    keys: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record; missing trailing values are filled with `null`
    pub fn new(keys: Vec<String>, mut values: Vec<Value>) -> Self {
        values.resize(keys.len(), Value::Null);
        Self { keys, values }
    }

    /// Record with a single column
    pub fn single(key: impl Into<String>, value: Value) -> Self {
        Self::new(vec![key.into()], vec![value])
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get a value by column name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keys
            .iter()
            .position(|k| k == key)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column position
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Update counters reported by the server for a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatistics {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
    pub labels_added: u64,
    pub labels_removed: u64,
}

impl UpdateStatistics {
    pub fn contains_updates(&self) -> bool {
        *self != UpdateStatistics::default()
    }
}

/// Metadata about how and where a statement ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    statement: Statement,
    connection_alias: String,
    statistics: UpdateStatistics,
}

impl ResultSummary {
    pub fn new(statement: Statement, connection_alias: impl Into<String>) -> Self {
        Self {
            statement,
            connection_alias: connection_alias.into(),
            statistics: UpdateStatistics::default(),
        }
    }

    pub fn with_statistics(mut self, statistics: UpdateStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Alias of the connection the statement was executed on
    pub fn connection_alias(&self) -> &str {
        &self.connection_alias
    }

    pub fn statistics(&self) -> &UpdateStatistics {
        &self.statistics
    }
}

/// The records and summary produced by one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    records: Vec<Record>,
    summary: ResultSummary,
}

impl StatementResult {
    pub fn new(records: Vec<Record>, summary: ResultSummary) -> Self {
        Self { records, summary }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// First record, if any
    pub fn first_record(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn summary(&self) -> &ResultSummary {
        &self.summary
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Ordered results of a run or a stack; `results()[i]` belongs to statement `i`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultCollection {
    tag: Option<String>,
    results: Vec<StatementResult>,
}

impl ResultCollection {
    pub fn from_result(result: StatementResult) -> Self {
        Self {
            tag: result.summary().statement().tag().map(str::to_string),
            results: vec![result],
        }
    }

    pub fn from_batch(results: Vec<StatementResult>, tag: Option<String>) -> Self {
        Self { tag, results }
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn results(&self) -> &[StatementResult] {
        &self.results
    }

    pub fn get(&self, index: usize) -> Option<&StatementResult> {
        self.results.get(index)
    }

    /// First result carrying the given statement tag
    pub fn get_by_tag(&self, tag: &str) -> Option<&StatementResult> {
        self.results
            .iter()
            .find(|r| r.summary().statement().tag() == Some(tag))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<StatementResult> {
        self.results
    }
}

impl IntoIterator for ResultCollection {
    type Item = StatementResult;
    type IntoIter = std::vec::IntoIter<StatementResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a StatementResult;
    type IntoIter = std::slice::Iter<'a, StatementResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
