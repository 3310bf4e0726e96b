// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statement and stack value objects
//!
//! A [`Statement`] is a single Cypher query with its parameters and an
//! optional tag. A [`Stack`] is an ordered batch of statements that is sent to
//! one connection as a single pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query parameters, keyed by parameter name
pub type Parameters = BTreeMap<String, serde_json::Value>;

/// A single Cypher statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    text: String,
    parameters: Parameters,
    tag: Option<String>,
}

impl Statement {
    pub fn new(text: impl Into<String>, parameters: Parameters, tag: Option<String>) -> Self {
        Self {
            text: text.into(),
            parameters,
            tag,
        }
    }

    /// Statement without parameters or tag
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Parameters::new(), None)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "[{}] {}", tag, self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Ordered batch of statements destined for one connection.
///
/// `has_writes` is only ever set by [`Stack::push_write`]; the client uses it
/// to route the whole stack to the master connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    tag: Option<String>,
    connection_alias: Option<String>,
    statements: Vec<Statement>,
    has_writes: bool,
}

impl Stack {
    pub fn new(tag: Option<String>, connection_alias: Option<String>) -> Self {
        Self {
            tag,
            connection_alias,
            statements: Vec::new(),
            has_writes: false,
        }
    }

    /// Append a read statement
    pub fn push(
        &mut self,
        query: impl Into<String>,
        parameters: Parameters,
        tag: Option<String>,
    ) -> &mut Self {
        self.statements.push(Statement::new(query, parameters, tag));
        self
    }

    /// Append a statement that writes, marking the whole stack as writing
    pub fn push_write(
        &mut self,
        query: impl Into<String>,
        parameters: Parameters,
        tag: Option<String>,
    ) -> &mut Self {
        self.has_writes = true;
        self.push(query, parameters, tag)
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn connection_alias(&self) -> Option<&str> {
        self.connection_alias.as_deref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn has_writes(&self) -> bool {
        self.has_writes
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Build a [`Parameters`] map from `key => value` pairs.
///
/// ```ignore
/// let params = params! { "name" => "Alice", "age" => 42 };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::statement::Parameters::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::statement::Parameters::new();
        $(
            map.insert($key.to_string(), $crate::__serde_json::json!($value));
        )+
        map
    }};
}
