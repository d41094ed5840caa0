//! # Rule Schema
//!
//! A [`Schema`] is the ordered, priority-ranked list of input columns
//! that define a rule system. Columns are stored highest-priority-first
//! (ascending by `priority`); column priority also fixes the trie's
//! depth order and the tie-break spine used by the priority
//! comparator.

pub mod validator;

pub use validator::{DefaultValidator, Validator};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column name reserved for a rule's unique identifier. Never valid as
/// a declared column name.
pub const RULE_ID: &str = "rule_id";
/// Column name reserved for a rule's output identifier. Never valid as
/// a declared column name.
pub const RULE_OUTPUT_ID: &str = "rule_output_id";

/// The two supported column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDataType {
    String,
    NumericRange,
}

/// A single declared input column (RuleInputMetaData).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub priority: u32,
    pub data_type: ColumnDataType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, priority: u32, data_type: ColumnDataType) -> Self {
        ColumnSchema { name: name.into(), priority, data_type }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("schema has no declared columns")]
    Empty,
    #[error("duplicate column priority {0}")]
    DuplicatePriority(u32),
    #[error("duplicate column name '{0}'")]
    DuplicateName(String),
    #[error("'{0}' is a reserved column name and cannot be declared")]
    ReservedName(String),
}

/// The ordered set of columns for a named rule system, sorted ascending
/// by `priority` (index 0 is the most important column).
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Build a schema from storage-returned columns, validating
    /// uniqueness of names/priorities and rejecting reserved names.
    /// Storage may return columns in any order; this always re-sorts
    /// by priority.
    pub fn new(mut columns: Vec<ColumnSchema>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen_names = HashSet::new();
        let mut seen_priorities = HashSet::new();
        for column in &columns {
            if column.name == RULE_ID || column.name == RULE_OUTPUT_ID {
                return Err(SchemaError::ReservedName(column.name.clone()));
            }
            if !seen_names.insert(column.name.clone()) {
                return Err(SchemaError::DuplicateName(column.name.clone()));
            }
            if !seen_priorities.insert(column.priority) {
                return Err(SchemaError::DuplicatePriority(column.priority));
            }
        }

        columns.sort_by_key(|c| c.priority);
        Ok(Schema { columns })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `name` among declared columns, in priority order.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
