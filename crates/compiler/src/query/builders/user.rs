//! User field handler.
//!
//! Same clause shapes as entry fields, resolved through the user field map.

use crate::error::CompileResult;
use crate::mapping::FieldMappingRegistry;
use crate::types::{Category, UserItem};

use super::{DirectClause, field_clause};

/// Builds the clause for a user item.
pub fn build_clause(
    item: &UserItem,
    registry: &FieldMappingRegistry,
) -> CompileResult<DirectClause> {
    let field = item.field_name.key();
    let path = registry.resolve_field(Category::User, field)?;
    field_clause(
        Category::User,
        field,
        path,
        item.item_type,
        item.search_term.as_ref(),
        item.range.as_ref(),
    )
}
