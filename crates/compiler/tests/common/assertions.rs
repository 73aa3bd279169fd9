//! Assertion helpers for compiled query documents.

use serde_json::Value;

/// Returns the clauses under a verb of a `bool` query, or an empty slice.
pub fn clauses<'a>(query: &'a Value, verb: &str) -> &'a [Value] {
    query["bool"][verb]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Asserts that a clause is a nested caption fragment.
pub fn assert_caption_fragment(clause: &Value) {
    assert_eq!(
        clause["nested"]["path"], "caption_assets",
        "Expected caption fragment, got {}",
        clause
    );
    assert_eq!(
        clause["nested"]["query"]["nested"]["path"], "caption_assets.lines",
        "Caption fragment is missing the lines level: {}",
        clause
    );
}

/// Asserts that a clause is a nested metadata fragment.
pub fn assert_metadata_fragment(clause: &Value) {
    assert_eq!(
        clause["nested"]["path"], "metadata",
        "Expected metadata fragment, got {}",
        clause
    );
}

/// Asserts that a clause is `{"term": {path: value}}`.
pub fn assert_term(clause: &Value, path: &str, value: impl Into<Value>) {
    let value = value.into();
    assert_eq!(
        clause["term"][path], value,
        "Expected term {}={}, got {}",
        path, value, clause
    );
}

/// Collects every leaf `term` value for a path anywhere in a document.
pub fn find_terms<'a>(document: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    collect_terms(document, path, &mut found);
    found
}

fn collect_terms<'a>(document: &'a Value, path: &str, found: &mut Vec<&'a Value>) {
    match document {
        Value::Object(map) => {
            if let Some(term) = map.get("term").and_then(|term| term.get(path)) {
                found.push(term);
            }
            for value in map.values() {
                collect_terms(value, path, found);
            }
        }
        Value::Array(values) => {
            for value in values {
                collect_terms(value, path, found);
            }
        }
        _ => {}
    }
}
