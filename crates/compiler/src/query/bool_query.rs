//! Accumulator for Elasticsearch `bool` queries.

use serde_json::{Map, Value, json};

use crate::error::{CompileError, CompileResult};
use crate::types::OperatorType;

/// Occurrence type of a clause inside a `bool` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolVerb {
    /// Required, scored.
    Must,
    /// Optional unless `minimum_should_match` says otherwise.
    Should,
    /// Excluded.
    MustNot,
}

impl BoolVerb {
    /// Selects the verb for an operator's combinator.
    ///
    /// The choice is structural and does not depend on the children.
    pub fn for_operator(operator: OperatorType) -> CompileResult<Self> {
        match operator {
            OperatorType::And => Ok(BoolVerb::Must),
            OperatorType::Or => Ok(BoolVerb::Should),
            other => Err(CompileError::UnknownOperator {
                operator: other.to_string(),
            }),
        }
    }

    /// The Query DSL key.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolVerb::Must => "must",
            BoolVerb::Should => "should",
            BoolVerb::MustNot => "must_not",
        }
    }
}

/// Collects clauses per verb and renders a `bool` query.
///
/// Whenever at least one `should` clause is present the rendered query
/// carries `minimum_should_match: 1`, so disjunctions are never reduced to
/// scoring hints next to `must` clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    must: Vec<Value>,
    should: Vec<Value>,
    must_not: Vec<Value>,
}

impl BoolQuery {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a clause under the given verb.
    pub fn push(&mut self, verb: BoolVerb, clause: Value) {
        match verb {
            BoolVerb::Must => self.must.push(clause),
            BoolVerb::Should => self.should.push(clause),
            BoolVerb::MustNot => self.must_not.push(clause),
        }
    }

    /// Returns the clauses collected under a verb.
    pub fn clauses(&self, verb: BoolVerb) -> &[Value] {
        match verb {
            BoolVerb::Must => &self.must,
            BoolVerb::Should => &self.should,
            BoolVerb::MustNot => &self.must_not,
        }
    }

    /// Returns the total number of clauses.
    pub fn len(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }

    /// Returns true if no clause was added.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders `{"bool": {...}}`, omitting empty verbs.
    pub fn into_value(self) -> Value {
        let mut body = Map::new();
        for (verb, clauses) in [
            (BoolVerb::Must, self.must),
            (BoolVerb::Should, self.should),
            (BoolVerb::MustNot, self.must_not),
        ] {
            if clauses.is_empty() {
                continue;
            }
            if verb == BoolVerb::Should {
                body.insert("minimum_should_match".to_string(), json!(1));
            }
            body.insert(verb.as_str().to_string(), Value::Array(clauses));
        }
        json!({ "bool": Value::Object(body) })
    }
}
