//! Lazy query surface
//!
//! `Collection<T>` stores entities and hands out `Queryable<T>` values.
//! A queryable accumulates predicates with `filter` and runs them through
//! its `QueryProvider` only when materialized.

mod collection;
mod errors;
mod provider;
mod queryable;

pub use collection::{Collection, Entity};
pub use errors::{QueryError, QueryResult};
pub use provider::{CollectionQueryProvider, QueryProvider};
pub use queryable::{EntityIter, Queryable, UntypedQueryable};
