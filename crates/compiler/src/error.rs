//! Error types for the criteria compiler.
//!
//! Compilation is all-or-nothing: every [`CompileError`] aborts the compile
//! call and no partial document is returned. Items whose category has no
//! registered builder are *not* errors; they are reported as
//! [`SkippedItem`](crate::query::SkippedItem) diagnostics instead.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::types::{Category, ItemType};

/// Result alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;

/// The primary error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Criteria compilation errors
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Field mapping registry errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration loading errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while validating or compiling a criteria tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The field is not in the variant's allowed set for the requested item type.
    #[error("field '{field}' not allowed for {item_type} on {category} items")]
    InvalidFieldForType {
        category: Category,
        field: String,
        item_type: ItemType,
    },

    /// Neither the static nor the dynamic mapping knows the field.
    #[error("field '{field}' not allowed: no mapping for {category} items")]
    UnresolvedField { category: Category, field: String },

    /// The operator carries a combinator outside {and, or}.
    #[error("unknown operator type: {operator}")]
    UnknownOperator { operator: String },

    /// The item type code is not a known match kind.
    #[error("unknown item type: {item_type}")]
    InvalidItemType { item_type: String },

    /// The item type needs a search term and none was given.
    #[error("{item_type} on {category} field '{field}' requires a search term")]
    MissingSearchTerm {
        category: Category,
        field: String,
        item_type: ItemType,
    },

    /// The search term or range bounds cannot be used for the item type.
    #[error("invalid search term for {category} field '{field}': {message}")]
    InvalidSearchTerm {
        category: Category,
        field: String,
        message: String,
    },

    /// The criteria tree is nested deeper than the configured cap.
    #[error("criteria tree depth {depth} exceeds the maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },
}

/// Errors raised by the field mapping registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A dynamic mapping with the same key is already registered.
    #[error("duplicate mapping for {category}/{field}")]
    DuplicateMapping { category: Category, field: String },

    /// The backend path of a mapping is empty.
    #[error("empty backend path for {category}/{field}")]
    EmptyPath { category: Category, field: String },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected shape.
    #[error("failed to parse config from '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A dynamic field entry could not be registered.
    #[error("invalid dynamic field: {0}")]
    DynamicField(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_display() {
        let err = CompileError::InvalidFieldForType {
            category: Category::CategoryEntry,
            field: "ancestor_id".to_string(),
            item_type: ItemType::StartsWith,
        };
        let s = err.to_string();
        assert!(s.contains("not allowed"));
        assert!(s.contains("ancestor_id"));
        assert!(s.contains("starts_with"));
    }

    #[test]
    fn test_unresolved_field_display() {
        let err = CompileError::UnresolvedField {
            category: Category::Entry,
            field: "bogus".to_string(),
        };
        assert!(err.to_string().contains("not allowed"));
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_registry_error_wraps_into_error() {
        let err: Error = RegistryError::DuplicateMapping {
            category: Category::Metadata,
            field: "value_date".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Registry(_)));
        assert!(err.to_string().contains("metadata/value_date"));
    }

    #[test]
    fn test_depth_exceeded_display() {
        let err = CompileError::DepthExceeded {
            depth: 40,
            max_depth: 32,
        };
        assert!(err.to_string().contains("40"));
        assert!(err.to_string().contains("32"));
    }
}
