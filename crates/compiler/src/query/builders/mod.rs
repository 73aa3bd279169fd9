//! Per-category fragment builders.
//!
//! Entry, user and category-entry items become field-level clauses placed
//! directly into the operator's `bool` query ([`DirectClause`]). Caption and
//! metadata items of one operator are merged into a single `nested`
//! fragment each.

pub mod caption;
pub mod category_entry;
pub mod entry;
pub mod metadata;
pub mod user;

use serde_json::{Value, json};

use crate::error::{CompileError, CompileResult};
use crate::mapping::FieldMappingRegistry;
use crate::types::{
    Category, CategoryEntryItem, EntryItem, ItemType, RangeBounds, SearchTerm, UserItem,
};

use super::bool_query::BoolVerb;

/// A field-level clause and whether it is negated.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectClause {
    /// The match primitive (`term`, `match`, `prefix`, `range`).
    pub query: Value,
    /// Negated clauses go under `must_not` regardless of the combinator.
    pub negated: bool,
}

impl DirectClause {
    /// A clause that follows the operator's combinator.
    pub fn positive(query: Value) -> Self {
        Self {
            query,
            negated: false,
        }
    }

    /// A clause placed under `must_not`.
    pub fn negated(query: Value) -> Self {
        Self {
            query,
            negated: true,
        }
    }

    /// The verb this clause goes under for a given combinator.
    pub fn verb(&self, combinator: BoolVerb) -> BoolVerb {
        if self.negated {
            BoolVerb::MustNot
        } else {
            combinator
        }
    }

    /// Renders the clause as a standalone query.
    pub fn into_fragment(self) -> Value {
        if self.negated {
            json!({ "bool": { "must_not": [self.query] } })
        } else {
            self.query
        }
    }
}

/// An item compiled into a direct clause.
#[derive(Debug, Clone, Copy)]
pub enum DirectItem<'a> {
    /// Entry document field.
    Entry(&'a EntryItem),
    /// User document field.
    User(&'a UserItem),
    /// Category membership.
    CategoryEntry(&'a CategoryEntryItem),
}

impl DirectItem<'_> {
    /// Builds the item's clause.
    pub fn build_clause(&self, registry: &FieldMappingRegistry) -> CompileResult<DirectClause> {
        match self {
            DirectItem::Entry(item) => entry::build_clause(item, registry),
            DirectItem::User(item) => user::build_clause(item, registry),
            DirectItem::CategoryEntry(item) => category_entry::build_clause(item, registry),
        }
    }
}

/// Builds the match primitive for a field path and match kind.
pub(crate) fn field_clause(
    category: Category,
    field: &str,
    path: &str,
    item_type: ItemType,
    search_term: Option<&SearchTerm>,
    range: Option<&RangeBounds>,
) -> CompileResult<DirectClause> {
    let term = || search_term.ok_or_else(|| missing_term(category, field, item_type));
    let clause = match item_type {
        ItemType::ExactMatch => DirectClause::positive(term_clause(path, term()?.to_query_value())),
        ItemType::Partial => DirectClause::positive(json!({
            "match": { path: term()?.to_lowercase_string() }
        })),
        ItemType::StartsWith => DirectClause::positive(prefix_clause(path, term()?)),
        ItemType::DoesntContain => {
            DirectClause::negated(term_clause(path, term()?.to_query_value()))
        }
        ItemType::Range => {
            let range = range.ok_or_else(|| missing_term(category, field, item_type))?;
            DirectClause::positive(range_clause(path, range))
        }
    };
    Ok(clause)
}

pub(crate) fn term_clause(path: &str, value: impl Into<Value>) -> Value {
    json!({ "term": { path: value.into() } })
}

pub(crate) fn prefix_clause(path: &str, term: &SearchTerm) -> Value {
    json!({ "prefix": { path: term.to_lowercase_string() } })
}

pub(crate) fn range_clause(path: &str, range: &RangeBounds) -> Value {
    json!({ "range": { path: range.to_query_value() } })
}

pub(crate) fn missing_term(category: Category, field: &str, item_type: ItemType) -> CompileError {
    CompileError::MissingSearchTerm {
        category,
        field: field.to_string(),
        item_type,
    }
}
