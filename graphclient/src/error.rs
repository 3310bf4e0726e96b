// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for GraphClient

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error raised by a driver connection, pipeline or transaction.
///
/// This is the only error kind that event listeners get to see: routing and
/// configuration problems are reported through [`Error`] directly.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", render_database_error(.code, .message))]
pub struct DatabaseError {
    /// Server status code, e.g. `Neo.ClientError.Statement.SyntaxError`
    pub code: Option<String>,
    pub message: String,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

fn render_database_error(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("{}: {}", code, message),
        None => message.to_string(),
    }
}

/// Main error type for GraphClient operations
#[derive(Error, Debug)]
pub enum Error {
    /// No connection is registered under the requested alias
    #[error("No connection registered under alias '{0}'")]
    UnknownConnectionAlias(String),

    /// A write was routed to the master but none was designated
    #[error("No master connection configured")]
    NoMasterConfigured,

    /// Query or pipeline failure reported by the driver
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Invalid registry or client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised by the driver while executing statements.
    pub fn is_database_error(&self) -> bool {
        matches!(self, Error::Database(_))
    }

    /// The driver error, if this is one.
    pub fn as_database_error(&self) -> Option<&DatabaseError> {
        match self {
            Error::Database(e) => Some(e),
            _ => None,
        }
    }
}
