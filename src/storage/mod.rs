//! # Storage Port (DAO)
//!
//! [`RuleStore`] is the only I/O boundary this crate crosses. A
//! `RuleSystem` is constructed against an `Arc<dyn RuleStore>` and
//! never touches a backend directly; swapping implementations (memory,
//! file, or a host's own database-backed store) requires no change to
//! matching logic.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use file::FileRuleStore;
pub use memory::MemoryRuleStore;

use crate::rule::Rule;
use crate::schema::ColumnSchema;

pub trait RuleStore: Send + Sync {
    /// True iff `name` is a registered rule system this store can
    /// serve columns and rules for.
    fn is_valid(&self, name: &str) -> StorageResult<bool>;

    /// The declared columns for `name`, in storage's native order
    /// (callers are expected to pass them through `Schema::new`, which
    /// re-sorts by priority).
    fn get_inputs(&self, name: &str) -> StorageResult<Vec<ColumnSchema>>;

    /// Every rule currently persisted for `name`.
    fn get_all_rules(&self, name: &str) -> StorageResult<Vec<Rule>>;

    /// Persist `rule`, assigning it a `rule_id` if it doesn't already
    /// carry one. Returns the persisted rule (with its id set).
    fn save_rule(&self, name: &str, rule: Rule) -> StorageResult<Rule>;

    /// Remove the rule matching `rule`'s id. Returns false if no such
    /// rule was present.
    fn delete_rule(&self, name: &str, rule: &Rule) -> StorageResult<bool>;
}
