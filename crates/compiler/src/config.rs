//! Compiler configuration.
//!
//! Configuration is plain serde data with per-field defaults, so a partial
//! JSON document only overrides what it names:
//!
//! ```json
//! {
//!   "compiler": { "max_depth": 16, "inner_hits_size": 5 },
//!   "dynamic_fields": [
//!     { "category": "metadata", "key": "value_date", "path": "metadata.value_date",
//!       "item_types": ["exact_match", "range"] }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapping::{DynamicField, FieldMappingRegistry};
use crate::types::{Category, ItemType};

/// What an operator with no children compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOperatorPolicy {
    /// `{"match_all": {}}`: the operator constrains nothing.
    #[default]
    MatchAll,
    /// `{"match_none": {}}`: the operator matches no document.
    MatchNone,
}

/// Settings for [`QueryManager`](crate::query::QueryManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Maximum depth of a criteria tree (default: 32).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Matching sub-documents returned per nested fragment (default: 10).
    #[serde(default = "default_inner_hits_size")]
    pub inner_hits_size: u32,

    /// Compilation of childless operators (default: match_all).
    #[serde(default)]
    pub empty_operator: EmptyOperatorPolicy,

    /// Item categories this compiler builds fragments for.
    /// Items of any other category are skipped with a diagnostic.
    #[serde(default = "default_categories")]
    pub categories: BTreeSet<Category>,
}

fn default_max_depth() -> usize {
    32
}

fn default_inner_hits_size() -> u32 {
    10
}

fn default_categories() -> BTreeSet<Category> {
    [
        Category::Entry,
        Category::Caption,
        Category::Metadata,
        Category::CategoryEntry,
    ]
    .into_iter()
    .collect()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            inner_hits_size: default_inner_hits_size(),
            empty_operator: EmptyOperatorPolicy::default(),
            categories: default_categories(),
        }
    }
}

impl CompilerConfig {
    /// Configuration for queries against the user index.
    pub fn for_users() -> Self {
        Self {
            categories: [Category::User].into_iter().collect(),
            ..Self::default()
        }
    }

    /// Sets the maximum tree depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the empty-operator policy.
    pub fn with_empty_operator(mut self, policy: EmptyOperatorPolicy) -> Self {
        self.empty_operator = policy;
        self
    }

    /// Returns true if items of the category are compiled.
    pub fn supports(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

/// A dynamic field declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicFieldConfig {
    /// Category of the field.
    pub category: Category,
    /// Key items use to name the field.
    pub key: String,
    /// Backend index path.
    pub path: String,
    /// Accepted match kinds (default: the free-text kinds).
    #[serde(default)]
    pub item_types: Option<Vec<ItemType>>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsearchConfig {
    /// Compiler settings.
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Caller-defined fields added to the registry.
    #[serde(default)]
    pub dynamic_fields: Vec<DynamicFieldConfig>,
}

impl EsearchConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Builds a registry holding the standard fields and the configured dynamic fields.
    pub fn build_registry(&self) -> Result<FieldMappingRegistry, ConfigError> {
        let mut builder = FieldMappingRegistry::builder();
        for field in &self.dynamic_fields {
            let mut dynamic = DynamicField::new(field.path.clone());
            if let Some(item_types) = &field.item_types {
                dynamic = dynamic.with_item_types(item_types.iter().copied());
            }
            builder = builder.dynamic(field.category, field.key.clone(), dynamic)?;
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_depth, 32);
        assert_eq!(config.inner_hits_size, 10);
        assert_eq!(config.empty_operator, EmptyOperatorPolicy::MatchAll);
        assert!(config.supports(Category::Caption));
        assert!(!config.supports(Category::User));

        let users = CompilerConfig::for_users();
        assert!(users.supports(Category::User));
        assert!(!users.supports(Category::Entry));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EsearchConfig =
            serde_json::from_str(r#"{ "compiler": { "max_depth": 4 } }"#).unwrap();
        assert_eq!(config.compiler.max_depth, 4);
        assert_eq!(config.compiler.inner_hits_size, 10);
        assert!(config.dynamic_fields.is_empty());
    }

    #[test]
    fn test_from_file_and_registry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "compiler": {{ "empty_operator": "match_none" }},
                "dynamic_fields": [
                    {{ "category": "metadata", "key": "value_date",
                       "path": "metadata.value_date", "item_types": ["range"] }}
                ]
            }}"#
        )
        .unwrap();

        let config = EsearchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.compiler.empty_operator, EmptyOperatorPolicy::MatchNone);

        let registry = config.build_registry().unwrap();
        let field = registry
            .dynamic_field(Category::Metadata, "value_date")
            .unwrap();
        assert_eq!(field.path, "metadata.value_date");
        assert_eq!(field.item_types, vec![ItemType::Range]);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = EsearchConfig::from_file("/nonexistent/esearch.json");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let invalid = EsearchConfig::from_file(file.path());
        assert!(matches!(invalid, Err(ConfigError::Parse { .. })));
    }
}
