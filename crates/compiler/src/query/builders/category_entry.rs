//! Category membership handler.
//!
//! The item is rewritten into a membership token on the category ids field
//! (see [`CategoryEntryItem`]) and compiled as an exact match. The item
//! itself is not modified, so the same tree compiles identically every time.

use crate::error::{CompileError, CompileResult};
use crate::mapping::FieldMappingRegistry;
use crate::types::{Category, CategoryEntryItem, FieldName, ItemType};

use super::{DirectClause, term_clause};

/// Builds the clause for a category entry item.
pub fn build_clause(
    item: &CategoryEntryItem,
    registry: &FieldMappingRegistry,
) -> CompileResult<DirectClause> {
    let field = item.field_name.key();
    if !item.field_name.allowed_item_types().contains(&item.item_type) {
        return Err(CompileError::InvalidFieldForType {
            category: Category::CategoryEntry,
            field: field.to_string(),
            item_type: item.item_type,
        });
    }

    let path = registry.resolve_field(Category::CategoryEntry, field)?;
    let clause = term_clause(path, item.membership_token()?);
    match item.item_type {
        ItemType::DoesntContain => Ok(DirectClause::negated(clause)),
        _ => Ok(DirectClause::positive(clause)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryEntryStatus;
    use serde_json::json;

    #[test]
    fn test_ancestor_id_token() {
        let registry = FieldMappingRegistry::standard();
        let clause = build_clause(&CategoryEntryItem::ancestor_id(42), registry).unwrap();
        assert_eq!(clause.query, json!({ "term": { "category_ids": "p42s2" } }));
        assert!(!clause.negated);
    }

    #[test]
    fn test_status_is_part_of_token() {
        let registry = FieldMappingRegistry::standard();
        let item = CategoryEntryItem::ancestor_id("42").with_status(CategoryEntryStatus::Rejected);
        let clause = build_clause(&item, registry).unwrap();
        assert_eq!(clause.query, json!({ "term": { "category_ids": "p42s4" } }));
    }

    #[test]
    fn test_direct_membership_negated() {
        let registry = FieldMappingRegistry::standard();
        let item = CategoryEntryItem::category_id(7).with_item_type(ItemType::DoesntContain);
        let clause = build_clause(&item, registry).unwrap();
        assert!(clause.negated);
        assert_eq!(clause.query, json!({ "term": { "category_ids": "c7s2" } }));
    }

    #[test]
    fn test_starts_with_rejected() {
        let registry = FieldMappingRegistry::standard();
        let item = CategoryEntryItem::ancestor_id(42).with_item_type(ItemType::StartsWith);
        assert!(matches!(
            build_clause(&item, registry),
            Err(CompileError::InvalidFieldForType { .. })
        ));
    }

    #[test]
    fn test_item_is_not_mutated() {
        let registry = FieldMappingRegistry::standard();
        let item = CategoryEntryItem::ancestor_id(42);
        let before = item.clone();
        build_clause(&item, registry).unwrap();
        assert_eq!(item, before);
    }
}
