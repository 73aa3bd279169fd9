//! The query manager.
//!
//! [`QueryManager`] compiles a [`SearchNode`] tree into an Elasticsearch
//! query document. Compilation runs in two passes:
//!
//! 1. **Validation** walks the whole tree and checks depth, operator kinds,
//!    fields, match kinds and terms. The first failure aborts compilation.
//! 2. **Building** walks the tree again and assembles `bool` queries. Items
//!    whose category the manager does not compile are skipped and reported
//!    as [`SkippedItem`] diagnostics.
//!
//! The manager holds no mutable state, so one instance can serve concurrent
//! compilations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::{CompilerConfig, EmptyOperatorPolicy};
use crate::error::{CompileError, CompileResult};
use crate::mapping::FieldMappingRegistry;
use crate::types::{
    CaptionItem, Category, MetadataItem, SearchItem, SearchNode, SearchOperator,
};

use super::bool_query::{BoolQuery, BoolVerb};
use super::builders::{DirectItem, caption, metadata};

/// An item left out of the compiled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    /// Category the manager does not compile.
    pub category: Category,
    /// Field key of the item.
    pub field: String,
    /// Depth of the item in the tree (the root is 1).
    pub depth: usize,
}

/// The result of a compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// The query document.
    pub query: Value,
    /// Items that were skipped.
    pub diagnostics: Vec<SkippedItem>,
}

impl CompiledQuery {
    /// Returns true if every item of the tree is part of the query.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Wraps the query in a search request body.
    pub fn to_search_body(&self) -> Value {
        json!({ "query": self.query })
    }
}

/// Compiles criteria trees into query documents.
#[derive(Debug, Clone)]
pub struct QueryManager {
    registry: Arc<FieldMappingRegistry>,
    config: CompilerConfig,
}

impl Default for QueryManager {
    fn default() -> Self {
        Self::new(
            Arc::new(FieldMappingRegistry::builder().build()),
            CompilerConfig::default(),
        )
    }
}

impl QueryManager {
    /// Creates a manager over a registry.
    pub fn new(registry: Arc<FieldMappingRegistry>, config: CompilerConfig) -> Self {
        Self { registry, config }
    }

    /// Returns the field mapping registry.
    pub fn registry(&self) -> &FieldMappingRegistry {
        &self.registry
    }

    /// Returns the compiler configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Validates a tree without building anything.
    pub fn validate(&self, node: &SearchNode) -> CompileResult<()> {
        self.validate_at(node, 1)
    }

    /// Compiles any node.
    pub fn compile(&self, node: &SearchNode) -> CompileResult<CompiledQuery> {
        match node {
            SearchNode::Operator(operator) => self.compile_operator(operator),
            SearchNode::Item(item) => self.compile_item(item),
        }
    }

    /// Compiles an operator and its subtree.
    pub fn compile_operator(&self, operator: &SearchOperator) -> CompileResult<CompiledQuery> {
        self.validate_operator_at(operator, 1)?;
        tracing::debug!(
            operator = %operator.operator,
            children = operator.search_items.len(),
            depth = operator.depth(),
            "Compiling search criteria"
        );

        let mut diagnostics = Vec::new();
        let query = self.build_operator(operator, 1, &mut diagnostics)?;

        tracing::debug!(skipped = diagnostics.len(), "Compiled search criteria");
        Ok(CompiledQuery { query, diagnostics })
    }

    /// Compiles a single item into a standalone fragment.
    pub fn compile_item(&self, item: &SearchItem) -> CompileResult<CompiledQuery> {
        self.validate_item_at(item, 1)?;

        let mut diagnostics = Vec::new();
        if !self.config.supports(item.category()) {
            self.skip(item, 1, &mut diagnostics);
            return Ok(CompiledQuery {
                query: self.empty_fragment(),
                diagnostics,
            });
        }

        let size = self.config.inner_hits_size;
        let query = match item {
            SearchItem::Caption(caption) => {
                caption::build_fragment(&[caption], BoolVerb::Must, &self.registry, size)?
            }
            SearchItem::Metadata(metadata) => {
                metadata::build_fragment(&[metadata], BoolVerb::Must, &self.registry, size)?
            }
            SearchItem::Entry(entry) => DirectItem::Entry(entry)
                .build_clause(&self.registry)?
                .into_fragment(),
            SearchItem::User(user) => DirectItem::User(user)
                .build_clause(&self.registry)?
                .into_fragment(),
            SearchItem::CategoryEntry(category_entry) => DirectItem::CategoryEntry(category_entry)
                .build_clause(&self.registry)?
                .into_fragment(),
        };
        tracing::trace!(category = %item.category(), fragment = %query, "Built item fragment");

        Ok(CompiledQuery { query, diagnostics })
    }

    fn validate_at(&self, node: &SearchNode, depth: usize) -> CompileResult<()> {
        match node {
            SearchNode::Operator(operator) => self.validate_operator_at(operator, depth),
            SearchNode::Item(item) => self.validate_item_at(item, depth),
        }
    }

    fn validate_operator_at(&self, operator: &SearchOperator, depth: usize) -> CompileResult<()> {
        self.check_depth(depth)?;
        BoolVerb::for_operator(operator.operator)?;
        for child in &operator.search_items {
            self.validate_at(child, depth + 1)?;
        }
        Ok(())
    }

    fn validate_item_at(&self, item: &SearchItem, depth: usize) -> CompileResult<()> {
        self.check_depth(depth)?;
        // Skipped items are never built, so their fields need not resolve
        if self.config.supports(item.category()) {
            item.validate(&self.registry)?;
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> CompileResult<()> {
        if depth > self.config.max_depth {
            return Err(CompileError::DepthExceeded {
                depth,
                max_depth: self.config.max_depth,
            });
        }
        Ok(())
    }

    fn build_operator(
        &self,
        operator: &SearchOperator,
        depth: usize,
        diagnostics: &mut Vec<SkippedItem>,
    ) -> CompileResult<Value> {
        if operator.is_empty() {
            return Ok(self.empty_fragment());
        }

        let combinator = BoolVerb::for_operator(operator.operator)?;

        let mut captions: Vec<&CaptionItem> = Vec::new();
        let mut direct: Vec<DirectItem<'_>> = Vec::new();
        let mut metadata_items: Vec<&MetadataItem> = Vec::new();
        let mut operators: Vec<&SearchOperator> = Vec::new();

        for child in &operator.search_items {
            let item = match child {
                SearchNode::Operator(nested) => {
                    operators.push(nested);
                    continue;
                }
                SearchNode::Item(item) => item,
            };
            if !self.config.supports(item.category()) {
                self.skip(item, depth + 1, diagnostics);
                continue;
            }
            match item {
                SearchItem::Caption(caption) => captions.push(caption),
                SearchItem::Metadata(metadata) => metadata_items.push(metadata),
                SearchItem::Entry(entry) => direct.push(DirectItem::Entry(entry)),
                SearchItem::User(user) => direct.push(DirectItem::User(user)),
                SearchItem::CategoryEntry(category_entry) => {
                    direct.push(DirectItem::CategoryEntry(category_entry))
                }
            }
        }

        let size = self.config.inner_hits_size;
        let mut query = BoolQuery::new();

        if !captions.is_empty() {
            let fragment = caption::build_fragment(&captions, combinator, &self.registry, size)?;
            tracing::trace!(items = captions.len(), "Built caption fragment");
            query.push(BoolVerb::Must, fragment);
        }

        for item in &direct {
            let clause = item.build_clause(&self.registry)?;
            tracing::trace!(clause = %clause.query, negated = clause.negated, "Built field clause");
            query.push(clause.verb(combinator), clause.query);
        }

        if !metadata_items.is_empty() {
            let fragment =
                metadata::build_fragment(&metadata_items, combinator, &self.registry, size)?;
            tracing::trace!(items = metadata_items.len(), "Built metadata fragment");
            query.push(BoolVerb::Must, fragment);
        }

        for nested in operators {
            let fragment = self.build_operator(nested, depth + 1, diagnostics)?;
            query.push(BoolVerb::Must, fragment);
        }

        // Every child was skipped
        if query.is_empty() {
            return Ok(self.empty_fragment());
        }

        Ok(query.into_value())
    }

    fn skip(&self, item: &SearchItem, depth: usize, diagnostics: &mut Vec<SkippedItem>) {
        tracing::warn!(
            category = %item.category(),
            field = item.field_key(),
            depth,
            "Skipping item of unsupported category"
        );
        diagnostics.push(SkippedItem {
            category: item.category(),
            field: item.field_key().to_string(),
            depth,
        });
    }

    fn empty_fragment(&self) -> Value {
        match self.config.empty_operator {
            EmptyOperatorPolicy::MatchAll => json!({ "match_all": {} }),
            EmptyOperatorPolicy::MatchNone => json!({ "match_none": {} }),
        }
    }
}
