//! Search Criteria Compiler
//!
//! This crate compiles a tree of search criteria into an Elasticsearch
//! `bool` query document. Callers describe what they are looking for with
//! typed predicates (entry fields, caption lines, custom metadata, users,
//! category membership) combined by AND/OR operators; the compiler validates
//! the tree and emits the Query DSL JSON ready to be sent to a cluster.
//!
//! # Architecture
//!
//! - [`types`] - Criteria tree: [`SearchOperator`], [`SearchItem`], field-name enums
//! - [`mapping`] - [`FieldMappingRegistry`] resolving fields to index paths
//! - [`query`] - [`QueryManager`] and the per-category fragment builders
//! - [`config`] - Compiler settings and configuration files
//! - [`error`] - Error types for all operations
//!
//! ```text
//! SearchNode ─→ QueryManager::validate ─→ QueryManager::build ─→ CompiledQuery
//!                     │                          │
//!                     └──── FieldMappingRegistry ┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use esearch_compiler::types::{CaptionItem, EntryFieldName, EntryItem, ItemType};
//! use esearch_compiler::{QueryManager, SearchOperator};
//!
//! let tree = SearchOperator::and()
//!     .with_item(EntryItem::new(ItemType::ExactMatch, EntryFieldName::Name, "Intro"))
//!     .with_item(CaptionItem::new(ItemType::Partial, "hello"));
//!
//! let compiled = QueryManager::default().compile_operator(&tree).unwrap();
//! let must = compiled.query["bool"]["must"].as_array().unwrap();
//!
//! // Caption predicates are grouped into one nested fragment
//! assert_eq!(must[0]["nested"]["path"], "caption_assets");
//! assert_eq!(must[1]["term"]["name"], "intro");
//! ```
//!
//! # Criteria as JSON
//!
//! Trees deserialize from JSON, which is how the `esearch` CLI reads them:
//!
//! ```
//! use esearch_compiler::{QueryManager, SearchNode};
//!
//! let tree: SearchNode = serde_json::from_value(serde_json::json!({
//!     "operator": "or",
//!     "search_items": [
//!         { "entry": { "item_type": "starts_with", "field_name": "tags", "search_term": "News" } },
//!         { "category_entry": { "item_type": "exact_match", "field_name": "ancestor_id", "search_term": 42 } }
//!     ]
//! }))
//! .unwrap();
//!
//! let compiled = QueryManager::default().compile(&tree).unwrap();
//! assert_eq!(compiled.query["bool"]["minimum_should_match"], 1);
//! assert_eq!(compiled.query["bool"]["should"][1]["term"]["category_ids"], "p42s2");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod query;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{CompilerConfig, EmptyOperatorPolicy, EsearchConfig};
pub use error::{CompileError, CompileResult, ConfigError, Error, RegistryError};
pub use mapping::{DynamicField, FieldMappingRegistry};
pub use query::{CompiledQuery, QueryManager, SkippedItem};
pub use types::{ItemType, OperatorType, SearchItem, SearchNode, SearchOperator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
