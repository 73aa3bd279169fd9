//! Field mapping: domain field names to backend index paths.
//!
//! - [`registry`] - the [`FieldMappingRegistry`] with its static and dynamic maps
//!
//! # Lookup Order
//!
//! ```text
//! (category, key)
//!     ├─→ static map   (standard fields, built once)
//!     └─→ dynamic map  (caller-defined fields, e.g. custom metadata paths)
//!             └─→ miss: UnresolvedField
//! ```

pub mod registry;

pub use registry::{
    DynamicField, FieldMappingRegistry, FieldMappingRegistryBuilder, METADATA_PROFILE_ID_KEY,
    METADATA_XPATH_KEY,
};
