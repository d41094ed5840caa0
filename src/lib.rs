//! # Rule Engine
//!
//! An embeddable rule engine: stores rules that map structured inputs
//! to a single output identifier and returns the best-matching rule
//! for a request.
//!
//! ## Pipeline
//!
//! ```text
//! Schema (ColumnSchema, priority-ordered)
//!     ↓
//! Rule::from_raw            → validated RuleInput per column
//!     ↓
//! Validator::is_valid       → admission gate
//!     ↓
//! conflict check            → every admitted rule vs. overlap
//!     ↓
//! RuleStore::save_rule      → persisted, id-assigned
//!     ↓
//! RuleSystemState           → Arc<Vec<Rule>> + Arc<RsTrie>, published via ArcSwap
//!     ↓
//! get_rule_by_inputs / query_trie → best match by compare_eligible
//! ```
//!
//! Reads never block on or observe a write in progress: `RuleSystem`
//! publishes a freshly rebuilt snapshot atomically on every
//! `add_rule`/`delete_rule`, and concurrent readers always see either
//! the old or the new snapshot, never a partial one.
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use rule_engine::schema::{ColumnDataType, ColumnSchema};
//! use rule_engine::storage::MemoryRuleStore;
//! use rule_engine::RuleSystem;
//!
//! let store = Arc::new(MemoryRuleStore::new());
//! store.register_schema(
//!     "pricing",
//!     vec![
//!         ColumnSchema::new("brand", 1, ColumnDataType::String),
//!         ColumnSchema::new("article_type", 2, ColumnDataType::String),
//!     ],
//! );
//!
//! let system = RuleSystem::new("pricing", store, None).unwrap();
//!
//! let mut inputs = HashMap::new();
//! inputs.insert("brand".to_string(), "Adidas".to_string());
//! inputs.insert("article_type".to_string(), "T Shirt".to_string());
//! system.add_rule_from_map(&inputs, "discount_10pct").unwrap();
//!
//! let matched = system.get_rule_by_inputs(&inputs).unwrap();
//! assert_eq!(matched.rule_output_id(), "discount_10pct");
//! ```

pub mod comparator;
pub mod config;
pub mod error;
pub mod rule;
pub mod schema;
pub mod storage;
pub mod system;
pub mod trie;
pub mod value;

pub use config::RuleEngineConfig;
pub use error::RuleEngineError;
pub use rule::{Rule, RuleError};
pub use schema::{ColumnDataType, ColumnSchema, Schema, SchemaError, Validator};
pub use storage::{RuleStore, StorageError};
pub use system::RuleSystem;
pub use value::{RangeInput, RuleInput, ValueError, ValueInput};
