//! Predicate translation subsystem
//!
//! Compiles a predicate expression tree into the Query IR consumed by the
//! document store.
//!
//! Translation is a pure recursive walk:
//! - dispatch over the closed set of node kinds
//! - member chains resolve to storage paths through the field mapping
//! - closed sub-expressions evaluate to serialized literals
//! - quantifiers over literal lists expand into `Or`/`And` trees
//!
//! Every supported shape yields a query. Every other shape fails with a
//! `TranslateError`.

mod context;
mod errors;
mod field;
mod quantifier;
mod value;
mod visitor;

pub use context::TranslationContext;
pub use errors::{TranslateError, TranslateResult};
pub use quantifier::Quantifier;
pub use visitor::QueryVisitor;
