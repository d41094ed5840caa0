//! # RuleInput Value Model
//!
//! A [`RuleInput`] is the column-bound value stored on a `Rule`: either
//! a literal (or the `Any` wildcard) for string columns, or an
//! inclusive bound pair (or `Any`) for numeric-range columns. Parsing,
//! matching (`satisfies`), and conflict detection (`overlaps`) are all
//! driven off the same tagged variant — no trait objects, no
//! inheritance.
//!
//! ## Wire encoding
//!
//! - The empty string always parses to `Any` for either variant.
//! - Range columns use `"<lower>..<upper>"`, inclusive on both ends.
//!
//! ## Usage
//!
//! ```rust
//! use rule_engine::schema::ColumnDataType;
//! use rule_engine::RuleInput;
//!
//! let wildcard = RuleInput::parse(ColumnDataType::String, "").unwrap();
//! assert!(wildcard.satisfies("anything"));
//!
//! let range = RuleInput::parse(ColumnDataType::NumericRange, "1000..2000").unwrap();
//! assert!(range.satisfies("1500"));
//! assert!(!range.satisfies("2001"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::ColumnDataType;

/// A parsed, column-bound rule value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleInput {
    /// A string-typed column's value.
    Value(ValueInput),
    /// A numeric-range column's value.
    Range(RangeInput),
}

/// The `Value` variant's payload: a literal or the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueInput {
    Any,
    Literal(String),
}

/// The `Range` variant's payload: inclusive bounds or the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeInput {
    Any,
    Bounded { lower: i64, upper: i64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("range value '{0}' is missing a '..' separator")]
    MalformedRange(String),
    #[error("range bound '{0}' is not a valid integer")]
    NotNumeric(String),
    #[error("range lower bound {lower} is greater than upper bound {upper}")]
    InvertedRange { lower: i64, upper: i64 },
}

impl RuleInput {
    /// Parse a raw request/rule string into a `RuleInput` for a column
    /// of the given `data_type`. The empty string always yields `Any`.
    pub fn parse(data_type: ColumnDataType, raw: &str) -> Result<Self, ValueError> {
        if raw.is_empty() {
            return Ok(match data_type {
                ColumnDataType::String => RuleInput::Value(ValueInput::Any),
                ColumnDataType::NumericRange => RuleInput::Range(RangeInput::Any),
            });
        }

        match data_type {
            ColumnDataType::String => Ok(RuleInput::Value(ValueInput::Literal(raw.to_string()))),
            ColumnDataType::NumericRange => {
                let (lower_raw, upper_raw) = raw
                    .split_once("..")
                    .ok_or_else(|| ValueError::MalformedRange(raw.to_string()))?;
                let lower: i64 = lower_raw
                    .parse()
                    .map_err(|_| ValueError::NotNumeric(lower_raw.to_string()))?;
                let upper: i64 = upper_raw
                    .parse()
                    .map_err(|_| ValueError::NotNumeric(upper_raw.to_string()))?;
                if lower > upper {
                    return Err(ValueError::InvertedRange { lower, upper });
                }
                Ok(RuleInput::Range(RangeInput::Bounded { lower, upper }))
            }
        }
    }

    /// True iff this input's column matches the given request value.
    pub fn satisfies(&self, request_value: &str) -> bool {
        match self {
            RuleInput::Value(ValueInput::Any) | RuleInput::Range(RangeInput::Any) => true,
            RuleInput::Value(ValueInput::Literal(lit)) => lit == request_value,
            RuleInput::Range(RangeInput::Bounded { lower, upper }) => {
                matches!(request_value.parse::<i64>(), Ok(v) if v >= *lower && v <= *upper)
            }
        }
    }

    /// True iff this input overlaps `other` for the same column.
    pub fn overlaps(&self, other: &RuleInput) -> bool {
        match (self, other) {
            (RuleInput::Value(a), RuleInput::Value(b)) => match (a, b) {
                (ValueInput::Any, _) | (_, ValueInput::Any) => true,
                (ValueInput::Literal(x), ValueInput::Literal(y)) => x == y,
            },
            (RuleInput::Range(a), RuleInput::Range(b)) => match (a, b) {
                (RangeInput::Any, _) | (_, RangeInput::Any) => true,
                (
                    RangeInput::Bounded { lower: l1, upper: u1 },
                    RangeInput::Bounded { lower: l2, upper: u2 },
                ) => l1 <= u2 && l2 <= u1,
            },
            // A column is declared with one data_type; a schema built
            // through Rule::from_raw never produces mixed variants on
            // the same column.
            _ => false,
        }
    }

    /// True iff this input is the wildcard for its variant.
    pub fn is_any(&self) -> bool {
        matches!(self, RuleInput::Value(ValueInput::Any) | RuleInput::Range(RangeInput::Any))
    }
}

impl fmt::Display for RuleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleInput::Value(ValueInput::Any) | RuleInput::Range(RangeInput::Any) => Ok(()),
            RuleInput::Value(ValueInput::Literal(s)) => write!(f, "{s}"),
            RuleInput::Range(RangeInput::Bounded { lower, upper }) => write!(f, "{lower}..{upper}"),
        }
    }
}
