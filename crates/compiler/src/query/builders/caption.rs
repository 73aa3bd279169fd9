//! Caption fragment builder.
//!
//! Caption lines are stored two levels deep (`caption_assets` →
//! `caption_assets.lines`), so all caption items of one operator are merged
//! into a single nested fragment:
//!
//! ```text
//! nested(caption_assets, inner_hits{_source: false})
//!   └─→ nested(caption_assets.lines, inner_hits)
//!         └─→ bool { per-item clauses under the combinator }
//! ```
//!
//! Merging keeps every caption predicate of a node on the same line.

use serde_json::{Value, json};

use crate::error::CompileResult;
use crate::mapping::FieldMappingRegistry;
use crate::query::bool_query::{BoolQuery, BoolVerb};
use crate::types::{CaptionFieldName, CaptionItem, Category, FieldName, ItemType};

use super::{DirectClause, field_clause, missing_term};

/// Nested path of caption assets.
pub const CAPTION_PATH: &str = "caption_assets";

/// Nested path of caption lines.
pub const CAPTION_LINES_PATH: &str = "caption_assets.lines";

/// Builds the combined fragment for the caption items of one operator.
pub fn build_fragment(
    items: &[&CaptionItem],
    combinator: BoolVerb,
    registry: &FieldMappingRegistry,
    inner_hits_size: u32,
) -> CompileResult<Value> {
    let mut lines = BoolQuery::new();
    for item in items {
        let clause = item_clause(item, registry)?;
        lines.push(clause.verb(combinator), clause.query);

        if let Some(start) = item.start_time_in_video {
            let path = registry.resolve(Category::Caption, CaptionFieldName::StartTime.key())?;
            lines.push(combinator, json!({ "range": { path: { "gte": start } } }));
        }
        if let Some(end) = item.end_time_in_video {
            let path = registry.resolve(Category::Caption, CaptionFieldName::EndTime.key())?;
            lines.push(combinator, json!({ "range": { path: { "gte": end } } }));
        }
    }

    Ok(json!({
        "nested": {
            "path": CAPTION_PATH,
            "inner_hits": { "size": inner_hits_size, "_source": false },
            "query": {
                "nested": {
                    "path": CAPTION_LINES_PATH,
                    "inner_hits": { "size": inner_hits_size },
                    "query": lines.into_value()
                }
            }
        }
    }))
}

fn item_clause(item: &CaptionItem, registry: &FieldMappingRegistry) -> CompileResult<DirectClause> {
    let field = item.field_name.key();
    let path = registry.resolve(Category::Caption, field)?;

    if item.item_type == ItemType::Partial {
        let term = item
            .search_term
            .as_ref()
            .ok_or_else(|| missing_term(Category::Caption, field, item.item_type))?;
        // Language-specific analyzers index into content_<lang> subfields
        return Ok(DirectClause::positive(json!({
            "multi_match": {
                "query": term.to_lowercase_string(),
                "fields": [path, format!("{path}_*")],
                "type": "most_fields"
            }
        })));
    }

    field_clause(
        Category::Caption,
        field,
        path,
        item.item_type,
        item.search_term.as_ref(),
        item.range.as_ref(),
    )
}
