//! Core criteria types.
//!
//! This module defines the criteria tree that callers hand to the compiler:
//!
//! - [`ItemType`] - match kinds (exact, partial, prefix, negation, range)
//! - [`fields`] - per-category field-name enums and [`FieldRef`]
//! - [`items`] - the [`SearchItem`] leaf predicates
//! - [`operator`] - [`SearchOperator`] and the [`SearchNode`] tree node

pub mod fields;
pub mod items;
pub mod operator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;

pub use fields::{
    CaptionFieldName, CategoryEntryFieldName, EntryFieldName, FieldName, FieldRef,
    MetadataFieldName, UserFieldName,
};
pub use items::{
    CaptionItem, CategoryEntryItem, CategoryEntryStatus, EntryItem, MetadataItem, SearchItem,
    UserItem,
};
pub use operator::{OperatorType, SearchNode, SearchOperator};

/// The domain partition a criteria node belongs to.
///
/// The compiler groups the children of an operator by category and builds
/// one kind of fragment per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Top-level entry document fields.
    Entry,
    /// Caption lines, nested two levels deep.
    Caption,
    /// Custom metadata values, nested one level deep.
    Metadata,
    /// User index fields.
    User,
    /// Category membership of an entry.
    CategoryEntry,
    /// A nested boolean operator.
    Operator,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Entry => write!(f, "entry"),
            Category::Caption => write!(f, "caption"),
            Category::Metadata => write!(f, "metadata"),
            Category::User => write!(f, "user"),
            Category::CategoryEntry => write!(f, "category_entry"),
            Category::Operator => write!(f, "operator"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" => Ok(Category::Entry),
            "caption" => Ok(Category::Caption),
            "metadata" => Ok(Category::Metadata),
            "user" => Ok(Category::User),
            "category_entry" => Ok(Category::CategoryEntry),
            "operator" => Ok(Category::Operator),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

/// A wire value given either by name or by numeric code.
///
/// API clients send match kinds and operators both ways; decoding goes
/// through `FromStr` or `TryFrom<u8>` so unknown values keep their
/// [`CompileError`] kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireCode {
    Code(u64),
    Name(String),
}

impl WireCode {
    /// Narrows a numeric code, reporting out-of-range codes through `invalid`.
    pub(crate) fn decode<T, F>(self, invalid: F) -> Result<T, CompileError>
    where
        T: TryFrom<u8, Error = CompileError> + FromStr<Err = CompileError>,
        F: FnOnce(String) -> CompileError,
    {
        match self {
            WireCode::Code(code) => u8::try_from(code)
                .map_err(|_| invalid(code.to_string()))
                .and_then(T::try_from),
            WireCode::Name(name) => name.parse(),
        }
    }
}

/// Match kind requested by a search item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "WireCode")]
pub enum ItemType {
    /// Whole-value equality (`term`).
    ExactMatch,
    /// Analyzed, fuzzy match (`match` / `multi_match`).
    Partial,
    /// Prefix match (`prefix`).
    StartsWith,
    /// Negated equality (`must_not` + `term`).
    DoesntContain,
    /// Numeric or time bounds (`range`).
    Range,
}

impl ItemType {
    /// Returns the wire code used by API clients.
    pub fn code(&self) -> u8 {
        match self {
            ItemType::ExactMatch => 1,
            ItemType::Partial => 2,
            ItemType::StartsWith => 3,
            ItemType::DoesntContain => 4,
            ItemType::Range => 5,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::ExactMatch => write!(f, "exact_match"),
            ItemType::Partial => write!(f, "partial"),
            ItemType::StartsWith => write!(f, "starts_with"),
            ItemType::DoesntContain => write!(f, "doesnt_contain"),
            ItemType::Range => write!(f, "range"),
        }
    }
}

impl TryFrom<u8> for ItemType {
    type Error = CompileError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ItemType::ExactMatch),
            2 => Ok(ItemType::Partial),
            3 => Ok(ItemType::StartsWith),
            4 => Ok(ItemType::DoesntContain),
            5 => Ok(ItemType::Range),
            _ => Err(CompileError::InvalidItemType {
                item_type: code.to_string(),
            }),
        }
    }
}

impl TryFrom<WireCode> for ItemType {
    type Error = CompileError;

    fn try_from(wire: WireCode) -> Result<Self, Self::Error> {
        wire.decode(|item_type| CompileError::InvalidItemType { item_type })
    }
}

impl FromStr for ItemType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact_match" => Ok(ItemType::ExactMatch),
            "partial" => Ok(ItemType::Partial),
            "starts_with" => Ok(ItemType::StartsWith),
            "doesnt_contain" => Ok(ItemType::DoesntContain),
            "range" => Ok(ItemType::Range),
            _ => Err(CompileError::InvalidItemType {
                item_type: s.to_string(),
            }),
        }
    }
}

/// The value an item searches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchTerm {
    /// A numeric value, rendered as a JSON number.
    Number(i64),
    /// A text value, lower-cased when rendered.
    Text(String),
}

impl SearchTerm {
    /// Renders the term as a query value.
    ///
    /// Text is lower-cased for case-insensitive matching against the
    /// lowercase-normalized index fields.
    pub fn to_query_value(&self) -> serde_json::Value {
        match self {
            SearchTerm::Number(n) => serde_json::Value::from(*n),
            SearchTerm::Text(s) => serde_json::Value::from(s.to_lowercase()),
        }
    }

    /// Returns the lower-cased textual form of the term.
    pub fn to_lowercase_string(&self) -> String {
        match self {
            SearchTerm::Number(n) => n.to_string(),
            SearchTerm::Text(s) => s.to_lowercase(),
        }
    }

    /// Returns true for text terms that are empty after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, SearchTerm::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for SearchTerm {
    fn from(s: &str) -> Self {
        SearchTerm::Text(s.to_string())
    }
}

impl From<String> for SearchTerm {
    fn from(s: String) -> Self {
        SearchTerm::Text(s)
    }
}

impl From<i64> for SearchTerm {
    fn from(n: i64) -> Self {
        SearchTerm::Number(n)
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTerm::Number(n) => write!(f, "{}", n),
            SearchTerm::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Bounds for a [`ItemType::Range`] item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Greater than or equal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<i64>,
    /// Less than or equal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<i64>,
    /// Strictly greater than.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<i64>,
    /// Strictly less than.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<i64>,
}

impl RangeBounds {
    /// Creates an inclusive range.
    pub fn between(gte: i64, lte: i64) -> Self {
        Self {
            gte: Some(gte),
            lte: Some(lte),
            ..Default::default()
        }
    }

    /// Creates a lower-bounded range.
    pub fn at_least(gte: i64) -> Self {
        Self {
            gte: Some(gte),
            ..Default::default()
        }
    }

    /// Creates an upper-bounded range.
    pub fn at_most(lte: i64) -> Self {
        Self {
            lte: Some(lte),
            ..Default::default()
        }
    }

    /// Returns true if no bound is set.
    pub fn is_empty(&self) -> bool {
        self.gte.is_none() && self.lte.is_none() && self.gt.is_none() && self.lt.is_none()
    }

    /// Returns a description of contradictory bounds, if any.
    pub fn conflict(&self) -> Option<String> {
        let lower = match (self.gte, self.gt) {
            (Some(gte), Some(gt)) => Some(gte.max(gt.saturating_add(1))),
            (Some(gte), None) => Some(gte),
            (None, Some(gt)) => Some(gt.saturating_add(1)),
            (None, None) => None,
        };
        let upper = match (self.lte, self.lt) {
            (Some(lte), Some(lt)) => Some(lte.min(lt.saturating_sub(1))),
            (Some(lte), None) => Some(lte),
            (None, Some(lt)) => Some(lt.saturating_sub(1)),
            (None, None) => None,
        };
        match (lower, upper) {
            (Some(lo), Some(hi)) if lo > hi => {
                Some(format!("lower bound {} is above upper bound {}", lo, hi))
            }
            _ => None,
        }
    }

    /// Renders the bounds as the body of a `range` clause.
    pub fn to_query_value(&self) -> serde_json::Value {
        let mut range = serde_json::Map::new();
        if let Some(gte) = self.gte {
            range.insert("gte".to_string(), gte.into());
        }
        if let Some(gt) = self.gt {
            range.insert("gt".to_string(), gt.into());
        }
        if let Some(lte) = self.lte {
            range.insert("lte".to_string(), lte.into());
        }
        if let Some(lt) = self.lt {
            range.insert("lt".to_string(), lt.into());
        }
        serde_json::Value::Object(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_type_codes() {
        for item_type in [
            ItemType::ExactMatch,
            ItemType::Partial,
            ItemType::StartsWith,
            ItemType::DoesntContain,
            ItemType::Range,
        ] {
            assert_eq!(ItemType::try_from(item_type.code()).unwrap(), item_type);
            assert_eq!(item_type.to_string().parse::<ItemType>().unwrap(), item_type);
        }
        assert!(matches!(
            ItemType::try_from(9u8),
            Err(CompileError::InvalidItemType { .. })
        ));
    }

    #[test]
    fn test_item_type_deserialize_names_and_codes() {
        let by_name: ItemType = serde_json::from_value(json!("starts_with")).unwrap();
        let by_code: ItemType = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(by_name, ItemType::StartsWith);
        assert_eq!(by_code, ItemType::StartsWith);
        assert_eq!(serde_json::to_value(ItemType::StartsWith).unwrap(), json!("starts_with"));

        let err = serde_json::from_value::<ItemType>(json!("fuzzy")).unwrap_err();
        assert!(err.to_string().contains("unknown item type: fuzzy"));
        let err = serde_json::from_value::<ItemType>(json!(300)).unwrap_err();
        assert!(err.to_string().contains("unknown item type: 300"));
    }

    #[test]
    fn test_search_term_rendering() {
        assert_eq!(SearchTerm::from("Video").to_query_value(), json!("video"));
        assert_eq!(SearchTerm::from(42).to_query_value(), json!(42));
        assert!(SearchTerm::from("   ").is_blank());
        assert!(!SearchTerm::from(0).is_blank());
    }

    #[test]
    fn test_search_term_deserialize_untagged() {
        let t: SearchTerm = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(t, SearchTerm::Number(7));
        let t: SearchTerm = serde_json::from_value(json!("seven")).unwrap();
        assert_eq!(t, SearchTerm::Text("seven".to_string()));
    }

    #[test]
    fn test_range_bounds() {
        assert!(RangeBounds::default().is_empty());
        assert_eq!(
            RangeBounds::between(10, 20).to_query_value(),
            json!({ "gte": 10, "lte": 20 })
        );
        assert!(RangeBounds::between(30, 20).conflict().is_some());
        let open = RangeBounds {
            gt: Some(5),
            lt: Some(6),
            ..Default::default()
        };
        assert!(open.conflict().is_some());
        assert!(RangeBounds::at_least(1).conflict().is_none());
    }

    #[test]
    fn test_category_display_round_trip() {
        assert_eq!(Category::CategoryEntry.to_string(), "category_entry");
        assert_eq!(
            "category_entry".parse::<Category>().unwrap(),
            Category::CategoryEntry
        );
        assert!("bogus".parse::<Category>().is_err());
    }
}
