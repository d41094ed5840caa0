//! # Rule
//!
//! An admitted rule binds exactly one [`RuleInput`] to each column
//! declared in its schema, plus a non-empty `rule_output_id` and an
//! optional `rule_id` assigned by storage once persisted. Rules are
//! immutable once constructed.

use std::collections::HashMap;

use thiserror::Error;

use crate::schema::Schema;
use crate::value::{RuleInput, ValueError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("rule_output_id must not be empty")]
    EmptyOutputId,
    #[error("column '{column}': {source}")]
    InvalidColumnValue { column: String, source: ValueError },
}

/// An immutable rule: one input per declared column, an output id, and
/// an optional assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    rule_id: Option<u64>,
    rule_output_id: String,
    inputs: Vec<RuleInput>,
}

impl Rule {
    /// Construct a rule from raw string values keyed by declared
    /// column name. A missing key is treated as the empty string
    /// (`Any`). Reserved keys (`rule_id`, `rule_output_id`) are not
    /// read from `raw`; the output id is passed separately.
    pub fn from_raw(
        schema: &Schema,
        raw: &HashMap<String, String>,
        rule_output_id: impl Into<String>,
    ) -> Result<Self, RuleError> {
        let rule_output_id = rule_output_id.into();
        if rule_output_id.is_empty() {
            return Err(RuleError::EmptyOutputId);
        }

        let mut inputs = Vec::with_capacity(schema.len());
        for column in schema.columns() {
            let raw_value = raw.get(&column.name).map(String::as_str).unwrap_or("");
            let input = RuleInput::parse(column.data_type, raw_value).map_err(|source| {
                RuleError::InvalidColumnValue { column: column.name.clone(), source }
            })?;
            inputs.push(input);
        }

        Ok(Rule { rule_id: None, rule_output_id, inputs })
    }

    /// Reconstitute a rule already known to storage (used by
    /// `RuleStore` implementations when loading persisted rows).
    pub fn from_parts(rule_id: Option<u64>, rule_output_id: String, inputs: Vec<RuleInput>) -> Self {
        Rule { rule_id, rule_output_id, inputs }
    }

    pub fn rule_id(&self) -> Option<u64> {
        self.rule_id
    }

    pub fn with_rule_id(mut self, rule_id: u64) -> Self {
        self.rule_id = Some(rule_id);
        self
    }

    pub fn rule_output_id(&self) -> &str {
        &self.rule_output_id
    }

    pub fn inputs(&self) -> &[RuleInput] {
        &self.inputs
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Total on declared columns. Panics if `name` is not one of
    /// `schema`'s columns — callers are expected to pass the schema
    /// this rule was constructed against.
    pub fn column_data(&self, schema: &Schema, name: &str) -> &RuleInput {
        let index = schema
            .column_index(name)
            .unwrap_or_else(|| panic!("column '{name}' is not declared in this schema"));
        &self.inputs[index]
    }

    /// True iff every declared column's input satisfies the
    /// corresponding request value. A missing request key is treated
    /// as the empty string, satisfied only by `Any`.
    pub fn evaluate(&self, schema: &Schema, request: &HashMap<String, String>) -> bool {
        schema.columns().iter().enumerate().all(|(index, column)| {
            let value = request.get(&column.name).map(String::as_str).unwrap_or("");
            self.inputs[index].satisfies(value)
        })
    }

    /// Symmetric: true iff every declared column's input overlaps the
    /// other rule's input for that column.
    pub fn is_conflicting(&self, other: &Rule) -> bool {
        debug_assert_eq!(self.inputs.len(), other.inputs.len(), "rules built from different schemas");
        self.inputs.iter().zip(other.inputs.iter()).all(|(a, b)| a.overlaps(b))
    }
}
