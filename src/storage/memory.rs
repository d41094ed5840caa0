//! # In-Memory Rule Store
//!
//! A swap-in `RuleStore` test double. Not persistent; exists so unit
//! and integration tests exercise the storage port rather than poking
//! `RuleSystem` internals directly.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::rule::Rule;
use crate::schema::ColumnSchema;

use super::{RuleStore, StorageError, StorageResult};

struct RuleSystemTable {
    columns: Vec<ColumnSchema>,
    rules: HashMap<u64, Rule>,
    next_id: u64,
}

/// In-memory `RuleStore`. Register a schema with [`register_schema`]
/// before constructing a `RuleSystem` against it.
#[derive(Default)]
pub struct MemoryRuleStore {
    systems: Mutex<HashMap<String, RuleSystemTable>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        MemoryRuleStore::default()
    }

    /// Declare a rule system's columns. Calling this twice for the
    /// same name replaces its columns and clears its rules.
    pub fn register_schema(&self, name: impl Into<String>, columns: Vec<ColumnSchema>) {
        let mut systems = self.systems.lock();
        systems.insert(name.into(), RuleSystemTable { columns, rules: HashMap::new(), next_id: 1 });
    }
}

impl RuleStore for MemoryRuleStore {
    fn is_valid(&self, name: &str) -> StorageResult<bool> {
        Ok(self.systems.lock().contains_key(name))
    }

    fn get_inputs(&self, name: &str) -> StorageResult<Vec<ColumnSchema>> {
        let systems = self.systems.lock();
        let table = systems.get(name).ok_or_else(|| StorageError::RuleSystemNotFound(name.to_string()))?;
        Ok(table.columns.clone())
    }

    fn get_all_rules(&self, name: &str) -> StorageResult<Vec<Rule>> {
        let systems = self.systems.lock();
        let table = systems.get(name).ok_or_else(|| StorageError::RuleSystemNotFound(name.to_string()))?;
        Ok(table.rules.values().cloned().collect())
    }

    fn save_rule(&self, name: &str, mut rule: Rule) -> StorageResult<Rule> {
        let mut systems = self.systems.lock();
        let table = systems.get_mut(name).ok_or_else(|| StorageError::RuleSystemNotFound(name.to_string()))?;

        let id = match rule.rule_id() {
            Some(id) => id,
            None => {
                let id = table.next_id;
                table.next_id += 1;
                rule = rule.with_rule_id(id);
                id
            }
        };
        table.rules.insert(id, rule.clone());
        Ok(rule)
    }

    fn delete_rule(&self, name: &str, rule: &Rule) -> StorageResult<bool> {
        let mut systems = self.systems.lock();
        let table = systems.get_mut(name).ok_or_else(|| StorageError::RuleSystemNotFound(name.to_string()))?;
        let Some(id) = rule.rule_id() else {
            return Ok(false);
        };
        Ok(table.rules.remove(&id).is_some())
    }
}
