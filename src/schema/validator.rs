//! # Rule Validator Port
//!
//! `Validator` is the admission predicate applied to a candidate rule
//! before conflict detection runs. It is pure and side-effect-free:
//! same rule, same schema, same answer, every time. Host applications
//! may swap in a stricter policy; the engine ships the baseline.

use crate::rule::Rule;
use crate::schema::Schema;

pub trait Validator: Send + Sync {
    fn is_valid(&self, schema: &Schema, rule: &Rule) -> bool;
}

/// Baseline policy: a rule is valid iff its `rule_output_id` is
/// non-empty and it carries exactly one `RuleInput` per declared
/// column (the wildcard `Any` counts as populated).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn is_valid(&self, schema: &Schema, rule: &Rule) -> bool {
        !rule.rule_output_id().is_empty() && rule.input_count() == schema.len()
    }
}
