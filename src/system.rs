//! # Rule System Facade
//!
//! `RuleSystem` is the single entry point applications use: it owns a
//! schema, a validator, a storage port, and the current admitted rule
//! set, and serves reads off an immutable snapshot published by
//! `ArcSwap` so readers never block on or observe a write in
//! progress. Writes (`add_rule`/`delete_rule`) are serialized through
//! a `Mutex` and publish a freshly rebuilt snapshot on success —
//! mirroring the copy-on-write, single-writer/many-reader model the
//! storage engine uses for its own point-in-time snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::comparator::compare_eligible;
use crate::error::RuleEngineError;
use crate::rule::Rule;
use crate::schema::{DefaultValidator, Schema, Validator};
use crate::storage::RuleStore;
use crate::trie::RsTrie;

struct RuleSystemState {
    rules: Arc<Vec<Rule>>,
    trie: Arc<RsTrie>,
}

/// An embedded rule system: a named schema plus its currently admitted
/// rules, backed by a [`RuleStore`].
pub struct RuleSystem {
    name: String,
    schema: Arc<Schema>,
    validator: Arc<dyn Validator>,
    store: Arc<dyn RuleStore>,
    state: ArcSwap<RuleSystemState>,
    write_lock: Mutex<()>,
}

impl RuleSystem {
    /// Load `name` from `store`. `validator` defaults to
    /// [`DefaultValidator`] when `None`. Rules already present in
    /// storage are loaded as-is (not conflict-checked — only
    /// `add_rule` enforces the conflict invariant); any rule the
    /// validator rejects is logged and excluded from the in-memory
    /// set, since there is no mutation to refuse.
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn RuleStore>,
        validator: Option<Arc<dyn Validator>>,
    ) -> Result<Self, RuleEngineError> {
        let name = name.into();
        if !store.is_valid(&name)? {
            return Err(RuleEngineError::InvalidRule(format!(
                "'{name}' is not a registered rule system"
            )));
        }

        let schema = Schema::new(store.get_inputs(&name)?)?;
        let validator = validator.unwrap_or_else(|| Arc::new(DefaultValidator) as Arc<dyn Validator>);

        let mut rules = Vec::new();
        for rule in store.get_all_rules(&name)? {
            if validator.is_valid(&schema, &rule) {
                rules.push(rule);
            } else {
                warn!(system = %name, rule_id = ?rule.rule_id(), "dropping rule that fails validation on load");
            }
        }

        let trie = RsTrie::build(&schema, &rules);
        info!(system = %name, rule_count = rules.len(), "rule system loaded");

        Ok(RuleSystem {
            name,
            schema: Arc::new(schema),
            validator,
            store,
            state: ArcSwap::from_pointee(RuleSystemState { rules: Arc::new(rules), trie: Arc::new(trie) }),
            write_lock: Mutex::new(()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every currently admitted rule, in no particular order.
    pub fn get_all_rules(&self) -> Vec<Rule> {
        self.state.load().rules.as_ref().clone()
    }

    pub fn get_rule_by_id(&self, rule_id: Option<u64>) -> Option<Rule> {
        let rule_id = rule_id?;
        self.state.load().rules.iter().find(|r| r.rule_id() == Some(rule_id)).cloned()
    }

    /// Admitted rules whose inputs evaluate true for `request`, sorted
    /// highest-priority-first via [`compare_eligible`].
    fn eligible_rules(&self, request: &HashMap<String, String>) -> Vec<Rule> {
        let snapshot = self.state.load();
        let mut eligible: Vec<Rule> =
            snapshot.rules.iter().filter(|rule| rule.evaluate(&self.schema, request)).cloned().collect();
        eligible.sort_by(|a, b| compare_eligible(&self.schema, a, b));
        eligible
    }

    /// The single best-matching rule for `request`, or `None` if no
    /// admitted rule evaluates true. Uses the linear scan-and-sort
    /// path rather than the trie index.
    pub fn get_rule_by_inputs(&self, request: &HashMap<String, String>) -> Option<Rule> {
        self.eligible_rules(request).into_iter().next()
    }

    /// The trie-indexed equivalent of [`get_rule_by_inputs`]. Proven
    /// to agree with it for any admitted rule set; offered as the
    /// faster path for large rule systems.
    pub fn query_trie(&self, request: &HashMap<String, String>) -> Option<Rule> {
        let snapshot = self.state.load();
        let mut candidates = snapshot.trie.query(&self.schema, request);
        candidates.sort_by(|a, b| compare_eligible(&self.schema, a, b));
        candidates.into_iter().next()
    }

    /// The second-best eligible rule for `request`, preserving the
    /// reference engine's literal threshold: this returns `Some` only
    /// when at least three rules are eligible, not two. A caller
    /// expecting "second choice whenever more than one rule matches"
    /// will be surprised by exactly two eligible rules yielding
    /// `None` — that is carried over intentionally, not a bug in this
    /// port.
    pub fn get_next_applicable_rule(&self, request: &HashMap<String, String>) -> Option<Rule> {
        let eligible = self.eligible_rules(request);
        if eligible.len() > 2 {
            Some(eligible[1].clone())
        } else {
            None
        }
    }

    /// Every admitted rule whose inputs overlap `rule`'s on every
    /// column.
    pub fn get_conflicting_rules(&self, rule: &Rule) -> Vec<Rule> {
        self.state.load().rules.iter().filter(|existing| existing.is_conflicting(rule)).cloned().collect()
    }

    /// Validate, conflict-check, persist, and admit `rule`.
    ///
    /// - `Err(InvalidRule)` if `rule_output_id` is empty.
    /// - `Ok(None)` if the validator rejects the rule (no error: the
    ///   caller supplied a well-formed but policy-rejected rule).
    /// - `Err(Conflict(_))` naming every admitted rule `rule` overlaps
    ///   with on every column.
    /// - `Ok(Some(rule))` with the persisted (id-assigned) rule on
    ///   success.
    pub fn add_rule(&self, rule: Rule) -> Result<Option<Rule>, RuleEngineError> {
        if rule.rule_output_id().is_empty() {
            return Err(RuleEngineError::InvalidRule("rule_output_id must not be empty".to_string()));
        }

        if !self.validator.is_valid(&self.schema, &rule) {
            info!(system = %self.name, "rejected rule: fails validator policy");
            return Ok(None);
        }

        let _guard = self.write_lock.lock();

        let snapshot = self.state.load();
        let conflicts: Vec<Rule> =
            snapshot.rules.iter().filter(|existing| existing.is_conflicting(&rule)).cloned().collect();
        if !conflicts.is_empty() {
            return Err(RuleEngineError::Conflict(conflicts));
        }

        let persisted = self.store.save_rule(&self.name, rule)?;

        let mut rules = snapshot.rules.as_ref().clone();
        rules.push(persisted.clone());
        let trie = RsTrie::build(&self.schema, &rules);
        self.state.store(Arc::new(RuleSystemState { rules: Arc::new(rules), trie: Arc::new(trie) }));

        info!(system = %self.name, rule_id = ?persisted.rule_id(), "rule admitted");
        Ok(Some(persisted))
    }

    /// Convenience: build a [`Rule`] from raw request-shaped values
    /// and admit it.
    pub fn add_rule_from_map(
        &self,
        raw: &HashMap<String, String>,
        rule_output_id: impl Into<String>,
    ) -> Result<Option<Rule>, RuleEngineError> {
        let rule = Rule::from_raw(&self.schema, raw, rule_output_id)
            .map_err(|e| RuleEngineError::InvalidRule(e.to_string()))?;
        self.add_rule(rule)
    }

    /// Remove the rule with the given id. Returns `false` if `rule_id`
    /// is `None` or no admitted rule has that id.
    pub fn delete_rule_by_id(&self, rule_id: Option<u64>) -> bool {
        let Some(rule_id) = rule_id else {
            return false;
        };
        let Some(rule) = self.get_rule_by_id(Some(rule_id)) else {
            return false;
        };
        self.delete_rule(&rule)
    }

    /// Remove `rule` (matched by id). Returns `false` if it carries no
    /// id, storage reports it absent, or storage errors (logged).
    pub fn delete_rule(&self, rule: &Rule) -> bool {
        let _guard = self.write_lock.lock();

        let removed = match self.store.delete_rule(&self.name, rule) {
            Ok(removed) => removed,
            Err(err) => {
                warn!(system = %self.name, error = %err, "delete_rule failed in storage");
                return false;
            }
        };

        if !removed {
            return false;
        }

        let snapshot = self.state.load();
        let rules: Vec<Rule> =
            snapshot.rules.iter().filter(|r| r.rule_id() != rule.rule_id()).cloned().collect();
        let trie = RsTrie::build(&self.schema, &rules);
        self.state.store(Arc::new(RuleSystemState { rules: Arc::new(rules), trie: Arc::new(trie) }));

        info!(system = %self.name, rule_id = ?rule.rule_id(), "rule removed");
        true
    }
}
