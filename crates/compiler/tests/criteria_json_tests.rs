//! Criteria trees read from JSON.
//!
//! API clients submit criteria as JSON documents; these tests compile such
//! documents end to end, including the numeric wire codes.

mod common;

use serde_json::json;

use esearch_compiler::{ItemType, OperatorType, SearchNode};

use common::*;

fn parse(criteria: serde_json::Value) -> SearchNode {
    serde_json::from_value(criteria).expect("Failed to parse criteria")
}

fn parse_error(criteria: serde_json::Value) -> String {
    serde_json::from_value::<SearchNode>(criteria)
        .expect_err("Expected criteria to be rejected")
        .to_string()
}

#[test]
fn test_nested_json_tree() {
    let tree = parse(json!({
        "operator": "and",
        "search_items": [
            { "entry": { "item_type": "exact_match", "field_name": "name", "search_term": "Intro" } },
            { "caption": { "item_type": "partial", "search_term": "hello", "start_time_in_video": 1000 } },
            {
                "operator": "or",
                "search_items": [
                    { "category_entry": { "item_type": "exact_match", "field_name": "ancestor_id", "search_term": 42 } },
                    { "metadata": { "item_type": "exact_match", "search_term": "Red", "xpath": "/metadata/Color" } }
                ]
            }
        ]
    }));
    let compiled = entry_manager().compile(&tree).unwrap();

    let must = clauses(&compiled.query, "must");
    assert_eq!(must.len(), 3);
    assert_caption_fragment(&must[0]);
    assert_term(&must[1], "name", "intro");

    let nested = &must[2];
    assert_term(&clauses(nested, "should")[0], "category_ids", "p42s2");
    assert_metadata_fragment(&clauses(nested, "must")[0]);
}

#[test]
fn test_dynamic_field_key_in_json() {
    let tree = parse(json!({
        "operator": "and",
        "search_items": [
            { "metadata": { "item_type": "range", "field_name": "value_date", "range": { "gte": 5 } } }
        ]
    }));
    let manager = esearch_compiler::QueryManager::new(
        std::sync::Arc::new(registry_with_value_date()),
        esearch_compiler::CompilerConfig::default(),
    );
    let compiled = manager.compile(&tree).unwrap();

    let inner = clauses(&clauses(&compiled.query, "must")[0]["nested"]["query"], "must");
    assert_eq!(inner[0]["range"]["metadata.value_date"]["gte"], 5);
}

#[test]
fn test_missing_search_items_is_empty_operator() {
    let tree = parse(json!({ "operator": "or" }));
    let compiled = entry_manager().compile(&tree).unwrap();
    assert_eq!(compiled.query, json!({ "match_all": {} }));
}

#[test]
fn test_unregistered_field_name_fails() {
    let tree = parse(json!({
        "operator": "and",
        "search_items": [
            { "entry": { "item_type": "exact_match", "field_name": "partner_sort_value", "search_term": "x" } }
        ]
    }));
    assert!(entry_manager().compile(&tree).is_err());
}

#[test]
fn test_wire_codes() {
    assert_eq!(OperatorType::try_from(1u8).unwrap(), OperatorType::And);
    assert_eq!(OperatorType::try_from(2u8).unwrap(), OperatorType::Or);
    assert!(OperatorType::try_from(9u8).is_err());

    assert_eq!(ItemType::try_from(1u8).unwrap(), ItemType::ExactMatch);
    assert_eq!(ItemType::try_from(5u8).unwrap(), ItemType::Range);
    assert_eq!(ItemType::StartsWith.code(), 3);
    assert!(ItemType::try_from(0u8).is_err());
}

#[test]
fn test_numeric_codes_in_json() {
    let tree = parse(json!({
        "operator": 2,
        "search_items": [
            { "entry": { "item_type": 1, "field_name": "name", "search_term": "Intro" } },
            { "operator": 1, "search_items": [] }
        ]
    }));
    let SearchNode::Operator(root) = &tree else {
        panic!("Expected operator root");
    };
    assert_eq!(root.operator, OperatorType::Or);

    let compiled = entry_manager().compile(&tree).unwrap();
    let should = clauses(&compiled.query, "should");
    assert_eq!(should.len(), 1);
    assert_term(&should[0], "name", "intro");
}

#[test]
fn test_unknown_operator_in_json() {
    let message = parse_error(json!({ "operator": "xor", "search_items": [] }));
    assert!(message.contains("unknown operator type: xor"), "{}", message);

    let message = parse_error(json!({ "operator": 7 }));
    assert!(message.contains("unknown operator type: 7"), "{}", message);
}

#[test]
fn test_unknown_item_type_in_nested_json() {
    let message = parse_error(json!({
        "operator": "and",
        "search_items": [
            { "entry": { "item_type": "fuzzy", "field_name": "name", "search_term": "x" } }
        ]
    }));
    assert!(message.contains("unknown item type: fuzzy"), "{}", message);
}

#[test]
fn test_blank_metadata_constraints_in_json() {
    let tree = parse(json!({
        "operator": "and",
        "search_items": [
            { "metadata": { "item_type": "exact_match", "search_term": "Red", "xpath": "", "metadata_profile_id": 0 } }
        ]
    }));
    let compiled = entry_manager().compile(&tree).unwrap();

    let fragment = &clauses(&compiled.query, "must")[0];
    assert_metadata_fragment(fragment);
    let inner = clauses(&fragment["nested"]["query"], "must");
    assert_eq!(inner.len(), 1);
    assert_term(&inner[0], "metadata.value_text", "red");
}

#[test]
fn test_compiled_body_serializes() {
    let tree = parse(json!({
        "operator": "or",
        "search_items": [
            { "user": { "item_type": "starts_with", "field_name": "screen_name", "search_term": "Adm" } }
        ]
    }));
    let compiled = user_manager().compile(&tree).unwrap();
    let body = serde_json::to_string(&compiled.to_search_body()).unwrap();

    assert!(body.contains("\"prefix\":{\"screen_name\":\"adm\"}"));
    assert!(body.contains("\"minimum_should_match\":1"));
}
