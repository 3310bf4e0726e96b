// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Node label listing

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::StatementResult;

/// Introspection query listing every node label in the database
pub const LABELS_QUERY: &str = "CALL db.labels()";

/// A node label known to the database
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.name)
    }
}

/// Map each record's single field to a label
pub(crate) fn labels_from_result(result: &StatementResult) -> Vec<Label> {
    result
        .records()
        .iter()
        .filter_map(|record| record.value_at(0))
        .map(|value| match value {
            Value::String(name) => Label::new(name.as_str()),
            other => Label::new(other.to_string()),
        })
        .collect()
}
