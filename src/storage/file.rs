//! # File-Backed Rule Store
//!
//! Persists each registered rule system as one JSON file under a root
//! directory. Intended for small systems and tests exercising
//! persistence across process restarts; a production deployment is
//! expected to bring its own `RuleStore` over a real database.

use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::rule::Rule;
use crate::schema::ColumnSchema;
use crate::value::RuleInput;

use super::{RuleStore, StorageError, StorageResult};

#[derive(Debug, Serialize, Deserialize)]
struct StoredRule {
    rule_id: Option<u64>,
    rule_output_id: String,
    inputs: Vec<RuleInput>,
}

impl From<&Rule> for StoredRule {
    fn from(rule: &Rule) -> Self {
        StoredRule {
            rule_id: rule.rule_id(),
            rule_output_id: rule.rule_output_id().to_string(),
            inputs: rule.inputs().to_vec(),
        }
    }
}

impl From<StoredRule> for Rule {
    fn from(stored: StoredRule) -> Self {
        Rule::from_parts(stored.rule_id, stored.rule_output_id, stored.inputs)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RuleSystemFile {
    columns: Vec<ColumnSchema>,
    rules: Vec<StoredRule>,
    next_id: u64,
}

/// File-backed `RuleStore`. Each registered system lives at
/// `<root>/<name>.json`; every operation reads and rewrites the whole
/// file under a single lock, which is adequate for the small rule
/// counts this crate targets.
pub struct FileRuleStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FileRuleStore {
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(FileRuleStore { root, lock: Mutex::new(()) })
    }

    pub fn register_schema(&self, name: &str, columns: Vec<ColumnSchema>) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let file = RuleSystemFile { columns, rules: Vec::new(), next_id: 1 };
        self.write(name, &file)
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    fn read(&self, name: &str) -> StorageResult<RuleSystemFile> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StorageError::RuleSystemNotFound(name.to_string()));
        }
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn write(&self, name: &str, file: &RuleSystemFile) -> StorageResult<()> {
        let contents =
            serde_json::to_string_pretty(file).map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(self.path_for(name), contents)?;
        Ok(())
    }
}

impl RuleStore for FileRuleStore {
    fn is_valid(&self, name: &str) -> StorageResult<bool> {
        Ok(self.path_for(name).exists())
    }

    fn get_inputs(&self, name: &str) -> StorageResult<Vec<ColumnSchema>> {
        let _guard = self.lock.lock();
        Ok(self.read(name)?.columns)
    }

    fn get_all_rules(&self, name: &str) -> StorageResult<Vec<Rule>> {
        let _guard = self.lock.lock();
        Ok(self.read(name)?.rules.into_iter().map(Rule::from).collect())
    }

    fn save_rule(&self, name: &str, mut rule: Rule) -> StorageResult<Rule> {
        let _guard = self.lock.lock();
        let mut file = self.read(name)?;

        let id = match rule.rule_id() {
            Some(id) => id,
            None => {
                let id = file.next_id;
                file.next_id += 1;
                rule = rule.with_rule_id(id);
                id
            }
        };
        file.rules.retain(|stored| stored.rule_id != Some(id));
        file.rules.push(StoredRule::from(&rule));
        self.write(name, &file)?;
        Ok(rule)
    }

    fn delete_rule(&self, name: &str, rule: &Rule) -> StorageResult<bool> {
        let _guard = self.lock.lock();
        let mut file = self.read(name)?;
        let Some(id) = rule.rule_id() else {
            return Ok(false);
        };
        let before = file.rules.len();
        file.rules.retain(|stored| stored.rule_id != Some(id));
        let removed = file.rules.len() != before;
        if removed {
            self.write(name, &file)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::schema::{ColumnDataType, Schema};

    #[test]
    fn round_trips_a_rule_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRuleStore::new(dir.path()).unwrap();
        store.register_schema("pricing", vec![ColumnSchema::new("brand", 1, ColumnDataType::String)]).unwrap();

        let schema = Schema::new(store.get_inputs("pricing").unwrap()).unwrap();
        let mut raw = HashMap::new();
        raw.insert("brand".to_string(), "Adidas".to_string());
        let rule = Rule::from_raw(&schema, &raw, "out").unwrap();

        let saved = store.save_rule("pricing", rule).unwrap();
        assert_eq!(saved.rule_id(), Some(1));

        let reloaded = store.get_all_rules("pricing").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].rule_output_id(), "out");
    }

    #[test]
    fn missing_system_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRuleStore::new(dir.path()).unwrap();
        assert!(matches!(store.get_inputs("missing"), Err(StorageError::RuleSystemNotFound(_))));
    }
}
