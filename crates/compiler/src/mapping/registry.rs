//! Field Mapping Registry.
//!
//! The registry maps `(category, field key)` to the backend index path.
//! It holds two tables:
//!
//! - the **static** table, filled from the field-name enums when the registry
//!   is built and never changed afterwards;
//! - the **dynamic** table, for caller-defined fields that cannot be
//!   enumerated ahead of time. Each dynamic field also declares which match
//!   kinds it accepts.
//!
//! A built registry is read-only, so a single instance can be shared across
//! threads without locking. [`FieldMappingRegistry::standard`] returns the
//! process-wide instance holding only the standard fields.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult, RegistryError};
use crate::types::fields::{
    CaptionFieldName, CategoryEntryFieldName, EntryFieldName, FieldName, MetadataFieldName,
    TEXT_ITEM_TYPES, UserFieldName,
};
use crate::types::{Category, ItemType};

/// Registry key of the metadata element path field.
pub const METADATA_XPATH_KEY: &str = "xpath";

/// Registry key of the metadata profile id field.
pub const METADATA_PROFILE_ID_KEY: &str = "metadata_profile_id";

/// Index field holding category membership tokens.
const CATEGORY_IDS_MAPPING_FIELD: &str = "category_ids";

static STANDARD: LazyLock<FieldMappingRegistry> =
    LazyLock::new(|| FieldMappingRegistry::builder().build());

/// A caller-defined field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicField {
    /// Backend index path.
    pub path: String,
    /// Match kinds the field accepts.
    #[serde(default = "default_dynamic_item_types")]
    pub item_types: Vec<ItemType>,
}

fn default_dynamic_item_types() -> Vec<ItemType> {
    TEXT_ITEM_TYPES.to_vec()
}

impl DynamicField {
    /// Creates a dynamic field accepting the free-text match kinds.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            item_types: default_dynamic_item_types(),
        }
    }

    /// Sets the accepted match kinds.
    pub fn with_item_types<I>(mut self, item_types: I) -> Self
    where
        I: IntoIterator<Item = ItemType>,
    {
        self.item_types = item_types.into_iter().collect();
        self
    }
}

/// Read-only mapping from domain fields to backend index paths.
pub struct FieldMappingRegistry {
    /// Standard fields indexed by (category, key).
    static_fields: HashMap<Category, HashMap<&'static str, String>>,

    /// Caller-defined fields indexed by (category, key).
    dynamic_fields: HashMap<Category, HashMap<String, DynamicField>>,
}

impl FieldMappingRegistry {
    /// Returns a builder pre-loaded with the standard fields.
    pub fn builder() -> FieldMappingRegistryBuilder {
        FieldMappingRegistryBuilder::new()
    }

    /// Returns the process-wide registry of standard fields.
    pub fn standard() -> &'static FieldMappingRegistry {
        &STANDARD
    }

    /// Resolves a field through the static table only.
    pub fn resolve(&self, category: Category, key: &str) -> CompileResult<&str> {
        self.static_fields
            .get(&category)
            .and_then(|fields| fields.get(key))
            .map(String::as_str)
            .ok_or_else(|| unresolved(category, key))
    }

    /// Resolves a field through the dynamic table only.
    pub fn resolve_dynamic(&self, category: Category, key: &str) -> CompileResult<&str> {
        self.dynamic_field(category, key)
            .map(|field| field.path.as_str())
            .ok_or_else(|| unresolved(category, key))
    }

    /// Resolves a field through the static table, falling back to the dynamic table.
    pub fn resolve_field(&self, category: Category, key: &str) -> CompileResult<&str> {
        self.resolve(category, key)
            .or_else(|_| self.resolve_dynamic(category, key))
    }

    /// Returns a dynamic field definition.
    pub fn dynamic_field(&self, category: Category, key: &str) -> Option<&DynamicField> {
        self.dynamic_fields
            .get(&category)
            .and_then(|fields| fields.get(key))
    }

    /// Returns the number of static mappings.
    pub fn static_len(&self) -> usize {
        self.static_fields.values().map(HashMap::len).sum()
    }

    /// Returns the number of dynamic mappings.
    pub fn dynamic_len(&self) -> usize {
        self.dynamic_fields.values().map(HashMap::len).sum()
    }
}

impl std::fmt::Debug for FieldMappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMappingRegistry")
            .field("static_count", &self.static_len())
            .field("dynamic_count", &self.dynamic_len())
            .finish()
    }
}

fn unresolved(category: Category, key: &str) -> CompileError {
    CompileError::UnresolvedField {
        category,
        field: key.to_string(),
    }
}

/// Builds a [`FieldMappingRegistry`].
///
/// The builder starts with the standard static fields; dynamic fields are
/// added with [`FieldMappingRegistryBuilder::dynamic`].
pub struct FieldMappingRegistryBuilder {
    static_fields: HashMap<Category, HashMap<&'static str, String>>,
    dynamic_fields: HashMap<Category, HashMap<String, DynamicField>>,
}

impl FieldMappingRegistryBuilder {
    fn new() -> Self {
        let mut builder = Self {
            static_fields: HashMap::new(),
            dynamic_fields: HashMap::new(),
        };
        builder.load_standard();
        builder
    }

    /// Removes every static mapping of a category.
    ///
    /// Fields of that category then resolve only through the dynamic table.
    pub fn without_static(mut self, category: Category) -> Self {
        self.static_fields.remove(&category);
        self
    }

    /// Registers a dynamic field.
    pub fn dynamic(
        mut self,
        category: Category,
        key: impl Into<String>,
        field: DynamicField,
    ) -> Result<Self, RegistryError> {
        let key = key.into();
        if field.path.trim().is_empty() {
            return Err(RegistryError::EmptyPath {
                category,
                field: key,
            });
        }

        let fields = self.dynamic_fields.entry(category).or_default();
        if fields.contains_key(&key) {
            return Err(RegistryError::DuplicateMapping {
                category,
                field: key,
            });
        }
        fields.insert(key, field);
        Ok(self)
    }

    /// Finishes the registry.
    pub fn build(self) -> FieldMappingRegistry {
        FieldMappingRegistry {
            static_fields: self.static_fields,
            dynamic_fields: self.dynamic_fields,
        }
    }

    fn load_standard(&mut self) {
        for field in EntryFieldName::all() {
            let path = match field {
                EntryFieldName::Id => "_id",
                other => other.key(),
            };
            self.insert_static::<EntryFieldName>(field.key(), path.to_string());
        }

        for field in UserFieldName::all() {
            let path = match field {
                UserFieldName::Type => "kuser_type",
                other => other.key(),
            };
            self.insert_static::<UserFieldName>(field.key(), path.to_string());
        }

        for field in CaptionFieldName::all() {
            self.insert_static::<CaptionFieldName>(
                field.key(),
                format!("caption_assets.lines.{}", field.key()),
            );
        }

        for field in MetadataFieldName::all() {
            self.insert_static::<MetadataFieldName>(
                field.key(),
                format!("metadata.{}", field.key()),
            );
        }
        for key in [METADATA_XPATH_KEY, METADATA_PROFILE_ID_KEY] {
            self.insert_static::<MetadataFieldName>(key, format!("metadata.{}", key));
        }

        for field in CategoryEntryFieldName::all() {
            self.insert_static::<CategoryEntryFieldName>(
                field.key(),
                CATEGORY_IDS_MAPPING_FIELD.to_string(),
            );
        }
    }

    fn insert_static<F: FieldName>(&mut self, key: &'static str, path: String) {
        self.static_fields
            .entry(F::CATEGORY)
            .or_default()
            .insert(key, path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_static_fields() {
        let registry = FieldMappingRegistry::standard();
        assert_eq!(registry.resolve(Category::Entry, "name").unwrap(), "name");
        assert_eq!(registry.resolve(Category::Entry, "id").unwrap(), "_id");
        assert_eq!(registry.resolve(Category::User, "type").unwrap(), "kuser_type");
        assert_eq!(
            registry.resolve(Category::Caption, "content").unwrap(),
            "caption_assets.lines.content"
        );
        assert_eq!(
            registry.resolve(Category::Metadata, "xpath").unwrap(),
            "metadata.xpath"
        );
        assert_eq!(
            registry
                .resolve(Category::CategoryEntry, "ancestor_id")
                .unwrap(),
            "category_ids"
        );
        assert_eq!(registry.dynamic_len(), 0);
    }

    #[test]
    fn test_static_category_is_separate() {
        let registry = FieldMappingRegistry::standard();
        // "email" exists for users only
        assert!(registry.resolve(Category::User, "email").is_ok());
        assert!(matches!(
            registry.resolve(Category::Entry, "email"),
            Err(CompileError::UnresolvedField { .. })
        ));
    }

    #[test]
    fn test_dynamic_fallback() {
        let registry = FieldMappingRegistry::builder()
            .dynamic(
                Category::Metadata,
                "value_date",
                DynamicField::new("metadata.value_date")
                    .with_item_types([ItemType::ExactMatch, ItemType::Range]),
            )
            .unwrap()
            .build();

        assert!(registry.resolve(Category::Metadata, "value_date").is_err());
        assert_eq!(
            registry
                .resolve_dynamic(Category::Metadata, "value_date")
                .unwrap(),
            "metadata.value_date"
        );
        assert_eq!(
            registry
                .resolve_field(Category::Metadata, "value_date")
                .unwrap(),
            "metadata.value_date"
        );
        assert!(
            registry
                .resolve_field(Category::Metadata, "value_geo")
                .is_err()
        );
    }

    #[test]
    fn test_static_wins_over_dynamic() {
        let registry = FieldMappingRegistry::builder()
            .dynamic(Category::Entry, "name", DynamicField::new("custom.name"))
            .unwrap()
            .build();
        assert_eq!(
            registry.resolve_field(Category::Entry, "name").unwrap(),
            "name"
        );

        let registry = FieldMappingRegistry::builder()
            .without_static(Category::Entry)
            .dynamic(Category::Entry, "name", DynamicField::new("custom.name"))
            .unwrap()
            .build();
        assert_eq!(
            registry.resolve_field(Category::Entry, "name").unwrap(),
            "custom.name"
        );
    }

    #[test]
    fn test_duplicate_and_empty_dynamic_fields() {
        let result = FieldMappingRegistry::builder()
            .dynamic(Category::Entry, "custom", DynamicField::new("a"))
            .and_then(|b| b.dynamic(Category::Entry, "custom", DynamicField::new("b")));
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateMapping { .. })
        ));

        let result = FieldMappingRegistry::builder().dynamic(
            Category::Entry,
            "custom",
            DynamicField::new(" "),
        );
        assert!(matches!(result, Err(RegistryError::EmptyPath { .. })));
    }
}
