//! Query IR subsystem
//!
//! The output side of translation. A `Query` is an immutable combinator
//! tree of leaf comparisons over dotted storage field paths.
//!
//! # Node kinds
//!
//! - Leaves: `Eq`, `Gt`, `Gte`, `Lt`, `Lte`, `StartsWith`, `Contains`, `In`
//! - Combinators: `And`, `Or`, `Not`
//! - Sentinels: `All` (every document), `Empty` (no document)

mod matcher;
mod query;

pub use matcher::QueryMatcher;
pub use query::Query;
