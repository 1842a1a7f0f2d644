//! aerolite - predicate translation and lazy queries for an embedded
//! document store
//!
//! A caller builds a predicate tree (`expression`), the translator compiles
//! it into the Query IR (`query`) using the entity field mapping (`mapper`),
//! and the document store (`storage`) evaluates the IR. `collection` ties
//! these together behind a lazy, chainable query surface.

pub mod collection;
pub mod config;
pub mod expression;
pub mod mapper;
pub mod observability;
pub mod query;
pub mod storage;
pub mod translator;

pub use collection::{Collection, Entity, Queryable, QueryError, QueryResult};
pub use expression::{Expr, ExprType, Lambda, Parameter};
pub use query::Query;
pub use translator::{QueryVisitor, TranslateError};
