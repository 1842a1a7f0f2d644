//! Query evaluation against stored documents
//!
//! Reference semantics of the Query IR, used by the in-memory store:
//! - Field paths are dotted storage names
//! - Arrays on the path fan out; a leaf matches if any reached value matches
//! - Missing fields never match a leaf
//! - Numbers compare numerically, strings lexicographically, no coercion
//!   across kinds

use std::cmp::Ordering;

use serde_json::Value;

use super::query::Query;

/// Evaluates queries against documents
pub struct QueryMatcher;

impl QueryMatcher {
    /// Checks if a document matches a query
    pub fn matches(document: &Value, query: &Query) -> bool {
        match query {
            Query::All => true,
            Query::Empty => false,
            Query::And(left, right) => {
                Self::matches(document, left) && Self::matches(document, right)
            }
            Query::Or(left, right) => {
                Self::matches(document, left) || Self::matches(document, right)
            }
            Query::Not(inner) => !Self::matches(document, inner),
            Query::Eq { field, value } => Self::any_value(document, field, |v| eq_match(v, value)),
            Query::Gt { field, value } => {
                Self::any_value(document, field, |v| compare(v, value) == Some(Ordering::Greater))
            }
            Query::Gte { field, value } => Self::any_value(document, field, |v| {
                matches!(compare(v, value), Some(Ordering::Greater | Ordering::Equal))
            }),
            Query::Lt { field, value } => {
                Self::any_value(document, field, |v| compare(v, value) == Some(Ordering::Less))
            }
            Query::Lte { field, value } => Self::any_value(document, field, |v| {
                matches!(compare(v, value), Some(Ordering::Less | Ordering::Equal))
            }),
            Query::StartsWith { field, value } => {
                Self::any_value(document, field, |v| match (v, value) {
                    (Value::String(actual), Value::String(prefix)) => actual.starts_with(prefix),
                    _ => false,
                })
            }
            Query::Contains { field, value } => {
                Self::any_value(document, field, |v| match (v, value) {
                    (Value::String(actual), Value::String(needle)) => actual.contains(needle),
                    _ => false,
                })
            }
            Query::In { field, values } => Self::any_value(document, field, |v| {
                values.iter().any(|candidate| eq_match(v, candidate))
            }),
        }
    }

    fn any_value(document: &Value, field: &str, predicate: impl Fn(&Value) -> bool) -> bool {
        let mut values = Vec::new();
        let segments: Vec<&str> = field.split('.').collect();
        collect_values(document, &segments, &mut values);
        values.into_iter().any(predicate)
    }
}

/// Collects every value reachable through `segments`, fanning out over arrays
fn collect_values<'a>(current: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    match current {
        Value::Array(items) => {
            for item in items {
                collect_values(item, segments, out);
            }
        }
        Value::Object(map) => match segments.split_first() {
            Some((head, rest)) => {
                if let Some(next) = map.get(*head) {
                    collect_values(next, rest, out);
                }
            }
            None => out.push(current),
        },
        _ => {
            if segments.is_empty() {
                out.push(current);
            }
        }
    }
}

/// Equality with numeric normalization (1 == 1.0)
fn eq_match(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(_), Value::Number(_)) => compare(actual, expected) == Some(Ordering::Equal),
        _ => actual == expected,
    }
}

/// Orders two values of the same kind; `None` across kinds
fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            match (a.as_f64(), b.as_f64()) {
                (Some(af), Some(bf)) => af.partial_cmp(&bf),
                _ => None,
            }
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_match() {
        let doc = json!({"name": "Alice", "age": 30});
        assert!(QueryMatcher::matches(&doc, &Query::eq("name", json!("Alice"))));
        assert!(!QueryMatcher::matches(&doc, &Query::eq("name", json!("Bob"))));
        assert!(QueryMatcher::matches(&doc, &Query::eq("age", json!(30.0))));
    }

    #[test]
    fn test_no_type_coercion() {
        let doc = json!({"value": 123});
        assert!(!QueryMatcher::matches(&doc, &Query::eq("value", json!("123"))));
        assert!(!QueryMatcher::matches(&doc, &Query::gt("value", json!("1"))));
    }

    #[test]
    fn test_range_predicates() {
        let doc = json!({"age": 25});
        assert!(QueryMatcher::matches(&doc, &Query::gte("age", json!(18))));
        assert!(QueryMatcher::matches(&doc, &Query::lte("age", json!(25))));
        assert!(!QueryMatcher::matches(&doc, &Query::gt("age", json!(25))));
        assert!(!QueryMatcher::matches(&doc, &Query::lt("age", json!(25))));
    }

    #[test]
    fn test_string_operators() {
        let doc = json!({"Category": "AllergeneFree"});
        assert!(QueryMatcher::matches(&doc, &Query::starts_with("Category", json!("Aller"))));
        assert!(QueryMatcher::matches(&doc, &Query::contains("Category", json!("eneF"))));
        assert!(!QueryMatcher::matches(&doc, &Query::contains("Category", json!("s"))));
    }

    #[test]
    fn test_nested_path() {
        let doc = json!({"Supplier": {"Name": "Klaus"}});
        assert!(QueryMatcher::matches(&doc, &Query::eq("Supplier.Name", json!("Klaus"))));
        assert!(!QueryMatcher::matches(&doc, &Query::eq("Supplier.Name", json!("Peter"))));
    }

    #[test]
    fn test_array_fan_out() {
        let doc = json!({"Tags": [{"Code": "A"}, {"Code": "B"}], "Numbers": [1, 2, 3]});
        assert!(QueryMatcher::matches(&doc, &Query::eq("Tags.Code", json!("B"))));
        assert!(!QueryMatcher::matches(&doc, &Query::eq("Tags.Code", json!("C"))));
        assert!(QueryMatcher::matches(&doc, &Query::eq("Numbers", json!(2))));
        assert!(QueryMatcher::matches(&doc, &Query::gt("Numbers", json!(2))));
    }

    #[test]
    fn test_in_and_not() {
        let doc = json!({"_id": 3});
        let in_query = Query::in_list("_id", vec![json!(1), json!(2)]);
        assert!(!QueryMatcher::matches(&doc, &in_query));
        assert!(QueryMatcher::matches(&doc, &Query::not(in_query)));
    }

    #[test]
    fn test_missing_field() {
        let doc = json!({"name": "Alice"});
        assert!(!QueryMatcher::matches(&doc, &Query::eq("age", json!(30))));
        assert!(QueryMatcher::matches(&doc, &Query::not_eq("age", json!(30))));
    }

    #[test]
    fn test_sentinels_and_combinators() {
        let doc = json!({"a": 1});
        assert!(QueryMatcher::matches(&doc, &Query::All));
        assert!(!QueryMatcher::matches(&doc, &Query::Empty));
        assert!(QueryMatcher::matches(
            &doc,
            &Query::or(Query::Empty, Query::eq("a", json!(1)))
        ));
        assert!(!QueryMatcher::matches(
            &doc,
            &Query::and(Query::All, Query::Empty)
        ));
    }
}
