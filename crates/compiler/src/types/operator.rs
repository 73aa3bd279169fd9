//! Boolean operators and criteria tree nodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CompileError;

use super::{Category, SearchItem, WireCode};

/// Boolean combinator of an operator node.
///
/// `Not` is part of the API vocabulary but has no combinator in this
/// compiler; operators carrying it fail with
/// [`CompileError::UnknownOperator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "WireCode")]
pub enum OperatorType {
    /// All children must match.
    And,
    /// At least one child must match.
    Or,
    /// Negation.
    Not,
}

impl OperatorType {
    /// Returns the wire code used by API clients.
    pub fn code(&self) -> u8 {
        match self {
            OperatorType::And => 1,
            OperatorType::Or => 2,
            OperatorType::Not => 3,
        }
    }
}

impl fmt::Display for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorType::And => write!(f, "and"),
            OperatorType::Or => write!(f, "or"),
            OperatorType::Not => write!(f, "not"),
        }
    }
}

impl TryFrom<u8> for OperatorType {
    type Error = CompileError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OperatorType::And),
            2 => Ok(OperatorType::Or),
            3 => Ok(OperatorType::Not),
            _ => Err(CompileError::UnknownOperator {
                operator: code.to_string(),
            }),
        }
    }
}

impl FromStr for OperatorType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(OperatorType::And),
            "or" => Ok(OperatorType::Or),
            "not" => Ok(OperatorType::Not),
            _ => Err(CompileError::UnknownOperator {
                operator: s.to_string(),
            }),
        }
    }
}

impl TryFrom<WireCode> for OperatorType {
    type Error = CompileError;

    fn try_from(wire: WireCode) -> Result<Self, Self::Error> {
        wire.decode(|operator| CompileError::UnknownOperator { operator })
    }
}

/// An internal tree node: a combinator over an ordered list of children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOperator {
    /// Boolean combinator.
    pub operator: OperatorType,
    /// Children in caller order.
    #[serde(default)]
    pub search_items: Vec<SearchNode>,
}

impl SearchOperator {
    /// Creates an empty operator.
    pub fn new(operator: OperatorType) -> Self {
        Self {
            operator,
            search_items: Vec::new(),
        }
    }

    /// Creates an empty AND operator.
    pub fn and() -> Self {
        Self::new(OperatorType::And)
    }

    /// Creates an empty OR operator.
    pub fn or() -> Self {
        Self::new(OperatorType::Or)
    }

    /// Appends a leaf child.
    pub fn with_item(mut self, item: impl Into<SearchItem>) -> Self {
        self.search_items.push(SearchNode::Item(item.into()));
        self
    }

    /// Appends a nested operator child.
    pub fn with_operator(mut self, operator: SearchOperator) -> Self {
        self.search_items.push(SearchNode::Operator(operator));
        self
    }

    /// Returns true if the operator has no children.
    pub fn is_empty(&self) -> bool {
        self.search_items.is_empty()
    }

    /// Depth of the subtree rooted here (a childless operator has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .search_items
            .iter()
            .map(|child| match child {
                SearchNode::Item(_) => 1,
                SearchNode::Operator(op) => op.depth(),
            })
            .max()
            .unwrap_or(0)
    }
}

/// A node of the criteria tree.
///
/// In JSON, an object with an `operator` key is an operator node; anything
/// else is decoded as an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchNode {
    /// A boolean operator.
    Operator(SearchOperator),
    /// A leaf predicate.
    Item(SearchItem),
}

impl<'de> Deserialize<'de> for SearchNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let node = if value.get("operator").is_some() {
            SearchOperator::deserialize(value).map(SearchNode::Operator)
        } else {
            SearchItem::deserialize(value).map(SearchNode::Item)
        };
        node.map_err(serde::de::Error::custom)
    }
}

impl SearchNode {
    /// Returns the category of the node.
    pub fn category(&self) -> Category {
        match self {
            SearchNode::Operator(_) => Category::Operator,
            SearchNode::Item(item) => item.category(),
        }
    }
}

impl From<SearchOperator> for SearchNode {
    fn from(operator: SearchOperator) -> Self {
        SearchNode::Operator(operator)
    }
}

impl From<SearchItem> for SearchNode {
    fn from(item: SearchItem) -> Self {
        SearchNode::Item(item)
    }
}
