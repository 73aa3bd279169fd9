//! Query compilation.
//!
//! - [`manager`] - the [`QueryManager`] walking a criteria tree
//! - [`builders`] - per-category fragment builders
//! - [`bool_query`] - the `bool` clause accumulator
//!
//! # Fragment Placement
//!
//! ```text
//! SearchOperator (And → must, Or → should + minimum_should_match: 1)
//!     ├─→ caption items   ─→ one nested fragment  ─→ must
//!     ├─→ entry, user and
//!     │   category items  ─→ one clause each      ─→ combinator (or must_not)
//!     ├─→ metadata items  ─→ one nested fragment  ─→ must
//!     └─→ nested operators ─→ recursive bool      ─→ must
//! ```

pub mod bool_query;
pub mod builders;
pub mod manager;

pub use bool_query::{BoolQuery, BoolVerb};
pub use builders::DirectClause;
pub use manager::{CompiledQuery, QueryManager, SkippedItem};
