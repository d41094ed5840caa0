//! # Trie Index (RSNode)
//!
//! A column-priority prefix trie over admitted rules. Keyed by
//! [`RuleInput`] at each level; a root-to-leaf path spells a rule's
//! column-ordered inputs.
//!
//! Unlike the construction bug in the original engine this was
//! distilled from — a stray "always create a new child" lookup that
//! meant the trie was effectively a chain per rule and was never
//! consulted by query paths — this implementation looks up the exact
//! key before branching, so rules sharing a prefix share trie nodes,
//! and it is kept coherent across `insert`/`remove`.

use std::collections::HashMap;

use crate::rule::Rule;
use crate::schema::Schema;
use crate::value::RuleInput;

#[derive(Debug, Default)]
struct RsNode {
    children: HashMap<RuleInput, RsNode>,
    rule: Option<Rule>,
}

/// Column-priority prefix trie over a rule set.
#[derive(Debug, Default)]
pub struct RsTrie {
    root: RsNode,
}

impl RsTrie {
    pub fn new() -> Self {
        RsTrie::default()
    }

    /// Build a trie from scratch over `rules`, in schema-priority
    /// order. Rules are inserted in the order given; insertion order
    /// does not affect the resulting structure.
    pub fn build(schema: &Schema, rules: &[Rule]) -> Self {
        let mut trie = RsTrie::new();
        for rule in rules {
            trie.insert(schema, rule.clone());
        }
        trie
    }

    /// Insert or replace the rule at its column path.
    pub fn insert(&mut self, schema: &Schema, rule: Rule) {
        let mut node = &mut self.root;
        for index in 0..schema.len() {
            let key = rule.inputs()[index].clone();
            node = node.children.entry(key).or_default();
        }
        node.rule = Some(rule);
    }

    /// Remove the rule at its column path, pruning now-empty
    /// interior nodes. Returns true iff a terminal rule was removed.
    pub fn remove(&mut self, schema: &Schema, rule: &Rule) -> bool {
        Self::remove_at(&mut self.root, schema, rule, 0)
    }

    fn remove_at(node: &mut RsNode, schema: &Schema, rule: &Rule, depth: usize) -> bool {
        if depth == schema.len() {
            return node.rule.take().is_some();
        }
        let key = &rule.inputs()[depth];
        let Some(child) = node.children.get_mut(key) else {
            return false;
        };
        let removed = Self::remove_at(child, schema, rule, depth + 1);
        if removed && child.children.is_empty() && child.rule.is_none() {
            node.children.remove(key);
        }
        removed
    }

    /// Collect every terminal rule reachable by following, at each
    /// depth, every child whose key is satisfied by the request value
    /// for that column — this naturally covers both the exact-literal
    /// branch and the `Any` branch, since `RuleInput::satisfies`
    /// already returns true for `Any` keys.
    pub fn query(&self, schema: &Schema, request: &HashMap<String, String>) -> Vec<Rule> {
        let mut results = Vec::new();
        Self::walk(&self.root, schema, request, 0, &mut results);
        results
    }

    fn walk(
        node: &RsNode,
        schema: &Schema,
        request: &HashMap<String, String>,
        depth: usize,
        results: &mut Vec<Rule>,
    ) {
        if depth == schema.len() {
            if let Some(rule) = &node.rule {
                results.push(rule.clone());
            }
            return;
        }

        let column = &schema.columns()[depth];
        let request_value = request.get(&column.name).map(String::as_str).unwrap_or("");

        for (key, child) in &node.children {
            if key.satisfies(request_value) {
                Self::walk(child, schema, request, depth + 1, results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDataType, ColumnSchema};

    fn schema() -> Schema {
        Schema::new(vec![ColumnSchema::new("brand", 1, ColumnDataType::String)]).unwrap()
    }

    fn rule(schema: &Schema, brand: &str, output_id: &str) -> Rule {
        let mut raw = HashMap::new();
        raw.insert("brand".to_string(), brand.to_string());
        Rule::from_raw(schema, &raw, output_id).unwrap()
    }

    #[test]
    fn query_returns_exact_and_any_branches() {
        let schema = schema();
        let exact = rule(&schema, "Adidas", "exact");
        let wildcard = rule(&schema, "", "wildcard");
        let other = rule(&schema, "Nike", "other");

        let trie = RsTrie::build(&schema, &[exact.clone(), wildcard.clone(), other.clone()]);

        let mut request = HashMap::new();
        request.insert("brand".to_string(), "Adidas".to_string());
        let mut found: Vec<_> = trie.query(&schema, &request).into_iter().map(|r| r.rule_output_id().to_string()).collect();
        found.sort();

        assert_eq!(found, vec!["exact".to_string(), "wildcard".to_string()]);
    }

    #[test]
    fn remove_prunes_empty_nodes_and_drops_the_rule() {
        let schema = schema();
        let exact = rule(&schema, "Adidas", "exact");
        let mut trie = RsTrie::build(&schema, &[exact.clone()]);

        assert!(trie.remove(&schema, &exact));
        assert!(!trie.remove(&schema, &exact));

        let mut request = HashMap::new();
        request.insert("brand".to_string(), "Adidas".to_string());
        assert!(trie.query(&schema, &request).is_empty());
    }
}
