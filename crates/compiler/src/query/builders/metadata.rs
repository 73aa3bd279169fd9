//! Metadata fragment builder.
//!
//! Custom metadata values live in the `metadata` nested documents. All
//! metadata items of one operator share a single nested fragment, so the
//! value, element path and profile constraints apply to the same document.

use serde_json::{Value, json};

use crate::error::CompileResult;
use crate::mapping::{FieldMappingRegistry, METADATA_PROFILE_ID_KEY, METADATA_XPATH_KEY};
use crate::query::bool_query::{BoolQuery, BoolVerb};
use crate::types::{Category, MetadataItem};

use super::{field_clause, term_clause};

/// Nested path of metadata documents.
pub const METADATA_PATH: &str = "metadata";

/// Builds the combined fragment for the metadata items of one operator.
pub fn build_fragment(
    items: &[&MetadataItem],
    combinator: BoolVerb,
    registry: &FieldMappingRegistry,
    inner_hits_size: u32,
) -> CompileResult<Value> {
    let mut query = BoolQuery::new();
    for item in items {
        let field = item.field_name.key();
        let path = registry.resolve_field(Category::Metadata, field)?;
        let clause = field_clause(
            Category::Metadata,
            field,
            path,
            item.item_type,
            item.search_term.as_ref(),
            item.range.as_ref(),
        )?;
        query.push(clause.verb(combinator), clause.query);

        if let Some(xpath) = item.xpath_filter() {
            let path = registry.resolve(Category::Metadata, METADATA_XPATH_KEY)?;
            query.push(combinator, term_clause(path, xpath.to_lowercase()));
        }
        if let Some(profile_id) = item.profile_id_filter() {
            let path = registry.resolve(Category::Metadata, METADATA_PROFILE_ID_KEY)?;
            query.push(combinator, term_clause(path, profile_id));
        }
    }

    Ok(json!({
        "nested": {
            "path": METADATA_PATH,
            "inner_hits": { "size": inner_hits_size, "_source": true },
            "query": query.into_value()
        }
    }))
}
