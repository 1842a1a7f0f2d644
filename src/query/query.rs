//! Query IR consumed by the document store
//!
//! Leaves compare a dotted storage field path with a literal. Combinators
//! nest sub-queries. The shape of this enum is the contract between the
//! translator and the store and must stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A compiled filter over stored documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Matches every document
    All,
    /// Matches no document
    Empty,
    Eq { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    StartsWith { field: String, value: Value },
    Contains { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Not(Box<Query>),
}

impl Query {
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Query::Eq {
            field: field.into(),
            value,
        }
    }

    /// Inequality is expressed as a negated equality
    pub fn not_eq(field: impl Into<String>, value: Value) -> Self {
        Query::not(Query::eq(field, value))
    }

    pub fn gt(field: impl Into<String>, value: Value) -> Self {
        Query::Gt {
            field: field.into(),
            value,
        }
    }

    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Query::Gte {
            field: field.into(),
            value,
        }
    }

    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Query::Lt {
            field: field.into(),
            value,
        }
    }

    pub fn lte(field: impl Into<String>, value: Value) -> Self {
        Query::Lte {
            field: field.into(),
            value,
        }
    }

    pub fn starts_with(field: impl Into<String>, value: Value) -> Self {
        Query::StartsWith {
            field: field.into(),
            value,
        }
    }

    pub fn contains(field: impl Into<String>, value: Value) -> Self {
        Query::Contains {
            field: field.into(),
            value,
        }
    }

    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Query::In {
            field: field.into(),
            values,
        }
    }

    pub fn and(left: Query, right: Query) -> Self {
        Query::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Query, right: Query) -> Self {
        Query::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(query: Query) -> Self {
        Query::Not(Box::new(query))
    }

    /// Returns the operation name for log and explain output
    pub fn op_name(&self) -> &'static str {
        match self {
            Query::All => "all",
            Query::Empty => "empty",
            Query::Eq { .. } => "eq",
            Query::Gt { .. } => "gt",
            Query::Gte { .. } => "gte",
            Query::Lt { .. } => "lt",
            Query::Lte { .. } => "lte",
            Query::StartsWith { .. } => "starts_with",
            Query::Contains { .. } => "contains",
            Query::In { .. } => "in",
            Query::And(..) => "and",
            Query::Or(..) => "or",
            Query::Not(_) => "not",
        }
    }

    /// Returns the field path of a leaf
    pub fn field(&self) -> Option<&str> {
        match self {
            Query::Eq { field, .. }
            | Query::Gt { field, .. }
            | Query::Gte { field, .. }
            | Query::Lt { field, .. }
            | Query::Lte { field, .. }
            | Query::StartsWith { field, .. }
            | Query::Contains { field, .. }
            | Query::In { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Returns true for combinator nodes
    pub fn is_combinator(&self) -> bool {
        matches!(self, Query::And(..) | Query::Or(..) | Query::Not(_))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::All => write!(f, "all"),
            Query::Empty => write!(f, "empty"),
            Query::Eq { field, value } => write!(f, "({} = {})", field, value),
            Query::Gt { field, value } => write!(f, "({} > {})", field, value),
            Query::Gte { field, value } => write!(f, "({} >= {})", field, value),
            Query::Lt { field, value } => write!(f, "({} < {})", field, value),
            Query::Lte { field, value } => write!(f, "({} <= {})", field, value),
            Query::StartsWith { field, value } => write!(f, "({} startsWith {})", field, value),
            Query::Contains { field, value } => write!(f, "({} contains {})", field, value),
            Query::In { field, values } => {
                write!(f, "({} in {})", field, Value::Array(values.clone()))
            }
            Query::And(left, right) => write!(f, "({} and {})", left, right),
            Query::Or(left, right) => write!(f, "({} or {})", left, right),
            Query::Not(inner) => write!(f, "not{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_eq_is_negated_eq() {
        assert_eq!(
            Query::not_eq("_id", json!(1)),
            Query::Not(Box::new(Query::eq("_id", json!(1))))
        );
    }

    #[test]
    fn test_display() {
        let q = Query::and(
            Query::gt("_id", json!(500)),
            Query::contains("Category", json!("e")),
        );
        assert_eq!(q.to_string(), "((_id > 500) and (Category contains \"e\"))");
        assert_eq!(Query::not(Query::eq("a", json!(1))).to_string(), "not(a = 1)");
        assert_eq!(
            Query::in_list("_id", vec![json!(1), json!(2)]).to_string(),
            "(_id in [1,2])"
        );
    }

    #[test]
    fn test_field_and_op_name() {
        let q = Query::starts_with("Name", json!("Kl"));
        assert_eq!(q.field(), Some("Name"));
        assert_eq!(q.op_name(), "starts_with");
        assert_eq!(Query::All.field(), None);
        assert!(Query::not(Query::All).is_combinator());
        assert!(!Query::Empty.is_combinator());
    }

    #[test]
    fn test_wire_form_is_stable() {
        let q = Query::or(Query::eq("a", json!(1)), Query::Empty);
        let wire = serde_json::to_value(&q).unwrap();
        assert_eq!(
            wire,
            json!({"or": [{"eq": {"field": "a", "value": 1}}, "empty"]})
        );
        let back: Query = serde_json::from_value(wire).unwrap();
        assert_eq!(back, q);
    }
}
