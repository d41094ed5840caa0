//! Integration Tests
//!
//! End-to-end scenarios against `RuleSystem` backed by
//! `MemoryRuleStore`: exact-vs-wildcard ranking, explicit conflict
//! detection, range matching, and deletion.

use std::collections::HashMap;
use std::sync::Arc;

use rule_engine::error::RuleEngineError;
use rule_engine::schema::{ColumnDataType, ColumnSchema};
use rule_engine::storage::{MemoryRuleStore, RuleStore};
use rule_engine::{Rule, RuleSystem};

fn pricing_schema() -> Vec<ColumnSchema> {
    vec![
        ColumnSchema::new("brand", 1, ColumnDataType::String),
        ColumnSchema::new("article_type", 2, ColumnDataType::String),
        ColumnSchema::new("style_id", 3, ColumnDataType::String),
        ColumnSchema::new("is_active", 4, ColumnDataType::String),
        ColumnSchema::new("valid_date_range", 5, ColumnDataType::NumericRange),
    ]
}

fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Scenarios 1 and 2 seed an exact rule alongside a wildcard-brand
/// rule that overlaps it on every other column. Both rules are
/// admissible on their own, but the spec's own conflict rule (`Any`
/// overlaps everything) would make adding them back-to-back through
/// `add_rule` reject the second one — the reference engine only
/// conflict-checks writes, not the rule set it loads at startup. So
/// these are seeded directly through the store, exactly as a
/// pre-populated backend would present them to `RuleSystem::new`.
fn seed_pricing_system(store: &Arc<MemoryRuleStore>, name: &str, rules: &[(&[(&str, &str)], &str)]) {
    store.register_schema(name, pricing_schema());
    let schema = rule_engine::Schema::new(store.get_inputs(name).unwrap()).unwrap();
    for (inputs, output_id) in rules {
        let rule = Rule::from_raw(&schema, &raw(inputs), *output_id).unwrap();
        store.save_rule(name, rule).unwrap();
    }
}

#[test]
fn exact_rule_outranks_wildcard_brand_rule() {
    let store = Arc::new(MemoryRuleStore::new());
    seed_pricing_system(
        &store,
        "pricing",
        &[
            (&[("article_type", "T Shirt"), ("is_active", "true")], "wildcard_brand"),
            (
                &[("brand", "Adidas"), ("article_type", "T Shirt"), ("is_active", "true")],
                "exact_adidas",
            ),
        ],
    );
    let system = RuleSystem::new("pricing", store, None).unwrap();

    let request = raw(&[("brand", "Adidas"), ("article_type", "T Shirt"), ("is_active", "true")]);
    let matched = system.get_rule_by_inputs(&request).unwrap();
    assert_eq!(matched.rule_output_id(), "exact_adidas");
}

#[test]
fn wildcard_rule_still_matches_a_different_brand() {
    let store = Arc::new(MemoryRuleStore::new());
    seed_pricing_system(
        &store,
        "pricing",
        &[
            (&[("article_type", "T Shirt"), ("is_active", "true")], "wildcard_brand"),
            (
                &[("brand", "Adidas"), ("article_type", "T Shirt"), ("is_active", "true")],
                "exact_adidas",
            ),
        ],
    );
    let system = RuleSystem::new("pricing", store, None).unwrap();

    let request = raw(&[("brand", "Puma"), ("article_type", "T Shirt"), ("is_active", "true")]);
    let matched = system.get_rule_by_inputs(&request).unwrap();
    assert_eq!(matched.rule_output_id(), "wildcard_brand");
}

#[test]
fn adding_a_rule_that_overlaps_every_column_of_an_existing_rule_is_rejected() {
    let store = Arc::new(MemoryRuleStore::new());
    store.register_schema("pricing", pricing_schema());
    let system = RuleSystem::new("pricing", store, None).unwrap();

    system
        .add_rule_from_map(&raw(&[("brand", "Adidas"), ("article_type", "T Shirt")]), "first")
        .unwrap()
        .expect("first rule should be admitted");

    let result = system.add_rule_from_map(&raw(&[("brand", "Adidas"), ("article_type", "T Shirt")]), "second");
    match result {
        Err(RuleEngineError::Conflict(conflicts)) => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].rule_output_id(), "first");
        }
        other => panic!("expected a conflict error, got {other:?}"),
    }
}

#[test]
fn numeric_range_column_matches_values_inside_its_bounds() {
    let store = Arc::new(MemoryRuleStore::new());
    store.register_schema("pricing", pricing_schema());
    let system = RuleSystem::new("pricing", store, None).unwrap();

    system
        .add_rule_from_map(&raw(&[("brand", "Adidas"), ("valid_date_range", "20240101..20241231")]), "in_window")
        .unwrap()
        .unwrap();

    let inside = raw(&[("brand", "Adidas"), ("valid_date_range", "20240601")]);
    let outside = raw(&[("brand", "Adidas"), ("valid_date_range", "20250101")]);

    assert_eq!(system.get_rule_by_inputs(&inside).unwrap().rule_output_id(), "in_window");
    assert!(system.get_rule_by_inputs(&outside).is_none());
}

#[test]
fn deleting_a_rule_removes_it_from_subsequent_matches() {
    let store = Arc::new(MemoryRuleStore::new());
    store.register_schema("pricing", pricing_schema());
    let system = RuleSystem::new("pricing", store, None).unwrap();

    let added = system.add_rule_from_map(&raw(&[("brand", "Adidas")]), "out").unwrap().unwrap();
    let request = raw(&[("brand", "Adidas")]);
    assert!(system.get_rule_by_inputs(&request).is_some());

    assert!(system.delete_rule_by_id(added.rule_id()));
    assert!(system.get_rule_by_inputs(&request).is_none());
}

#[test]
fn get_next_applicable_rule_needs_three_eligible_rules() {
    // Each of these three rules overlaps the others on every column
    // (all leave every column but one as `Any`), so seeding them
    // through `add_rule`'s conflict gate is impossible; they're
    // loaded pre-populated instead, same as the ranking scenarios
    // above.
    let store = Arc::new(MemoryRuleStore::new());
    seed_pricing_system(
        &store,
        "pricing",
        &[
            (&[("brand", "Adidas")], "by_brand"),
            (&[("article_type", "T Shirt")], "by_article_type"),
            (&[], "catch_all"),
        ],
    );
    let system = RuleSystem::new("pricing", store, None).unwrap();

    let request = raw(&[("brand", "Adidas"), ("article_type", "T Shirt")]);
    let next = system.get_next_applicable_rule(&request).expect("three rules are eligible");
    assert_eq!(next.rule_output_id(), "by_article_type");

    // Drop to two eligible rules: the literal threshold (len() > 2,
    // not >= 2) means `None` is returned even though a second choice
    // clearly exists.
    let two_eligible_store = Arc::new(MemoryRuleStore::new());
    seed_pricing_system(
        &two_eligible_store,
        "pricing",
        &[(&[("brand", "Adidas")], "by_brand"), (&[], "catch_all")],
    );
    let two_eligible_system = RuleSystem::new("pricing", two_eligible_store, None).unwrap();
    let request = raw(&[("brand", "Adidas")]);
    assert!(two_eligible_system.get_next_applicable_rule(&request).is_none());
}
