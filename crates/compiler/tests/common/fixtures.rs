//! Criteria fixtures and manager constructors.

use std::sync::Arc;

use esearch_compiler::types::{
    CaptionItem, Category, CategoryEntryItem, EntryFieldName, EntryItem, ItemType, MetadataItem,
    UserFieldName, UserItem,
};
use esearch_compiler::{CompilerConfig, DynamicField, FieldMappingRegistry, QueryManager};

/// A manager over the standard registry and default configuration.
pub fn entry_manager() -> QueryManager {
    QueryManager::default()
}

/// A manager compiling user items only.
pub fn user_manager() -> QueryManager {
    QueryManager::new(
        Arc::new(FieldMappingRegistry::builder().build()),
        CompilerConfig::for_users(),
    )
}

/// A manager with the given configuration over the standard registry.
pub fn manager_with(config: CompilerConfig) -> QueryManager {
    QueryManager::new(Arc::new(FieldMappingRegistry::builder().build()), config)
}

/// A registry with a dynamic date field on metadata.
pub fn registry_with_value_date() -> FieldMappingRegistry {
    FieldMappingRegistry::builder()
        .dynamic(
            Category::Metadata,
            "value_date",
            DynamicField::new("metadata.value_date")
                .with_item_types([ItemType::ExactMatch, ItemType::Range]),
        )
        .expect("Failed to register dynamic field")
        .build()
}

/// `name = term` on entries.
pub fn entry_name(term: &str) -> EntryItem {
    EntryItem::new(ItemType::ExactMatch, EntryFieldName::Name, term)
}

/// Partial tag match on entries.
pub fn entry_tag_partial(term: &str) -> EntryItem {
    EntryItem::new(ItemType::Partial, EntryFieldName::Tags, term)
}

/// Partial match on caption content.
pub fn caption_partial(term: &str) -> CaptionItem {
    CaptionItem::new(ItemType::Partial, term)
}

/// Exact match on metadata text values.
pub fn metadata_text(term: &str) -> MetadataItem {
    MetadataItem::new(ItemType::ExactMatch, term)
}

/// Exact match on a user's email.
pub fn user_email(email: &str) -> UserItem {
    UserItem::new(ItemType::ExactMatch, UserFieldName::Email, email)
}

/// Membership in a category or any descendant.
pub fn ancestor(id: i64) -> CategoryEntryItem {
    CategoryEntryItem::ancestor_id(id)
}
