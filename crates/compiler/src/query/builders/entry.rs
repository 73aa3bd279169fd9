//! Entry field handler.
//!
//! Entry fields live at the top level of the entry document, so each item
//! becomes a single match primitive keyed by the resolved field path.

use crate::error::CompileResult;
use crate::mapping::FieldMappingRegistry;
use crate::types::{Category, EntryItem};

use super::{DirectClause, field_clause};

/// Builds the clause for an entry item.
pub fn build_clause(
    item: &EntryItem,
    registry: &FieldMappingRegistry,
) -> CompileResult<DirectClause> {
    let field = item.field_name.key();
    let path = registry.resolve_field(Category::Entry, field)?;
    field_clause(
        Category::Entry,
        field,
        path,
        item.item_type,
        item.search_term.as_ref(),
        item.range.as_ref(),
    )
}
