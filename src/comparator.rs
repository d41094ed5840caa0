//! # Priority Comparator
//!
//! Total order over *eligible* rules for a given request: walk schema
//! columns in priority order; at the first column where the two
//! rules' stored values differ, the rule with the non-`Any` value
//! ranks higher (earlier). If all columns tie the rules compare equal.
//!
//! Only meaningful on rules that have already been filtered to
//! `evaluate(request) == true` — applying it to arbitrary rules is
//! undefined, and this function makes no attempt to detect that
//! misuse.

use std::cmp::Ordering;

use crate::rule::Rule;
use crate::schema::Schema;

pub fn compare_eligible(schema: &Schema, a: &Rule, b: &Rule) -> Ordering {
    for index in 0..schema.len() {
        let ai = &a.inputs()[index];
        let bi = &b.inputs()[index];
        if ai == bi {
            continue;
        }
        match (ai.is_any(), bi.is_any()) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            // Both non-Any but distinct concrete values (or, in
            // principle, two distinct Any encodings): neither wins on
            // wildcard-ness, so this column contributes no ranking.
            _ => continue,
        }
    }
    Ordering::Equal
}
