// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph driver abstraction
//!
//! The client never talks to a server itself. Everything that touches the
//! wire (protocol, pooling, transaction semantics) lives behind these traits:
//!
//! - [`Connection`] - a named endpoint that runs statements
//! - [`Pipeline`] - a batch of statements executed as one unit on a connection
//! - [`DriverTransaction`] - a native transaction opened on a connection
//!
//! The [`memory`] backend implements all three in-process.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::result::StatementResult;
use crate::statement::{Parameters, Statement};

/// Result type for driver operations
pub type DriverResult<T> = std::result::Result<T, DatabaseError>;

/// A named connection to a graph database
pub trait Connection: Send + Sync {
    /// Alias this connection is registered under
    fn alias(&self) -> &str;

    /// Execute a single statement
    fn run(
        &self,
        query: &str,
        parameters: &Parameters,
        tag: Option<&str>,
    ) -> DriverResult<StatementResult>;

    /// Open a native transaction on this connection
    fn transaction(&self) -> DriverResult<Box<dyn DriverTransaction>>;

    /// Create an empty pipeline bound to this connection
    fn create_pipeline(&self, tag: Option<&str>) -> Box<dyn Pipeline>;
}

/// Batch-execution context bound to one connection
pub trait Pipeline: Send {
    fn push(&mut self, query: &str, parameters: &Parameters, tag: Option<&str>);

    /// Number of statements pushed so far
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Execute every pushed statement in push order.
    ///
    /// The returned results line up with the pushed statements.
    fn run(self: Box<Self>) -> DriverResult<Vec<StatementResult>>;
}

/// Lifecycle state of a native transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Created but not begun yet
    Pending,
    Open,
    Committed,
    RolledBack,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Open => "OPEN",
            TransactionStatus::Committed => "COMMITTED",
            TransactionStatus::RolledBack => "ROLLED_BACK",
        };
        write!(f, "{}", name)
    }
}

/// Native transaction handed out by a [`Connection`]
pub trait DriverTransaction: Send {
    fn begin(&mut self) -> DriverResult<()>;

    fn run(
        &mut self,
        query: &str,
        parameters: &Parameters,
        tag: Option<&str>,
    ) -> DriverResult<StatementResult>;

    /// Execute several statements inside the transaction, in order
    fn run_batch(&mut self, statements: &[Statement]) -> DriverResult<Vec<StatementResult>>;

    fn commit(&mut self) -> DriverResult<()>;

    fn rollback(&mut self) -> DriverResult<()>;

    fn status(&self) -> TransactionStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_status_display() {
        assert_eq!(TransactionStatus::Pending.to_string(), "PENDING");
        assert_eq!(TransactionStatus::Open.to_string(), "OPEN");
        assert_eq!(TransactionStatus::Committed.to_string(), "COMMITTED");
        assert_eq!(TransactionStatus::RolledBack.to_string(), "ROLLED_BACK");
    }
}
