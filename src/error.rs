//! # Top-Level Errors
//!
//! [`RuleEngineError`] is the error type returned by `RuleSystem`
//! construction and mutation. Read paths (`get_rule_by_inputs` and
//! friends) never fail — an absent match is `None`, not an error.

use thiserror::Error;

use crate::rule::Rule;
use crate::schema::SchemaError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RuleEngineError {
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    #[error("rule conflicts with {} existing rule(s)", .0.len())]
    Conflict(Vec<Rule>),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}
