//! Lazy queries
//!
//! A queryable is a predicate tree plus the provider that can run it.
//! Building one never touches storage. Each materialization translates the
//! tree once and performs exactly one `find`; nothing is cached, so
//! materializing twice re-reads the store.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::expression::{Expr, ExprRef, IntoExpr, Lambda};
use crate::query::Query;
use crate::storage::DocumentCursor;

use super::errors::{QueryError, QueryResult};
use super::provider::QueryProvider;

/// Lazy query over entities of type `T`
pub struct Queryable<T> {
    provider: Arc<dyn QueryProvider>,
    expression: ExprRef,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Queryable<T> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            expression: Arc::clone(&self.expression),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Queryable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queryable")
            .field("entity_type", &self.provider.entity_type())
            .field("expression", &self.expression)
            .finish()
    }
}

impl<T: DeserializeOwned> Queryable<T> {
    /// Query matching every document of the provider's entity type
    pub fn new(provider: Arc<dyn QueryProvider>) -> Self {
        let root = Expr::query_root(provider.entity_type());
        Self::from_expression(provider, root)
    }

    /// Query over an existing expression tree
    pub fn from_expression(provider: Arc<dyn QueryProvider>, expression: impl IntoExpr) -> Self {
        Self {
            provider,
            expression: expression.into_expr(),
            _marker: PhantomData,
        }
    }

    /// Returns a new query further restricted by `predicate`.
    ///
    /// The receiver is left untouched.
    pub fn filter(&self, predicate: Lambda) -> Self {
        Self::from_expression(
            Arc::clone(&self.provider),
            Expr::where_call(Arc::clone(&self.expression), predicate),
        )
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// Query IR this query would execute
    pub fn translate(&self) -> QueryResult<Query> {
        self.provider.translate(&self.expression)
    }

    /// Runs the query and returns a lazy iterator over the results
    pub fn iter(&self) -> QueryResult<EntityIter<T>> {
        let cursor = self.provider.execute(&self.expression)?;
        Ok(EntityIter {
            cursor,
            _marker: PhantomData,
        })
    }

    /// Runs the query and collects every result
    pub fn to_list(&self) -> QueryResult<Vec<T>> {
        self.iter()?.collect()
    }
}

/// Iterator over deserialized query results
pub struct EntityIter<T> {
    cursor: DocumentCursor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Iterator for EntityIter<T> {
    type Item = QueryResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let document = self.cursor.next()?;
        Some(serde_json::from_value(document).map_err(QueryError::Deserialize))
    }
}

/// Lazy query whose element type is known only at runtime.
///
/// Yields raw documents.
#[derive(Clone)]
pub struct UntypedQueryable {
    provider: Arc<dyn QueryProvider>,
    expression: ExprRef,
    element_type: String,
}

impl fmt::Debug for UntypedQueryable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedQueryable")
            .field("element_type", &self.element_type)
            .field("expression", &self.expression)
            .finish()
    }
}

impl UntypedQueryable {
    pub(crate) fn new(
        provider: Arc<dyn QueryProvider>,
        expression: impl IntoExpr,
        element_type: String,
    ) -> Self {
        Self {
            provider,
            expression: expression.into_expr(),
            element_type,
        }
    }

    pub fn element_type(&self) -> &str {
        &self.element_type
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    pub fn filter(&self, predicate: Lambda) -> Self {
        Self::new(
            Arc::clone(&self.provider),
            Expr::where_call(Arc::clone(&self.expression), predicate),
            self.element_type.clone(),
        )
    }

    pub fn translate(&self) -> QueryResult<Query> {
        self.provider.translate(&self.expression)
    }

    pub fn iter(&self) -> QueryResult<DocumentCursor> {
        self.provider.execute(&self.expression)
    }

    pub fn to_list(&self) -> QueryResult<Vec<Value>> {
        Ok(self.iter()?.collect())
    }

    /// Reinterprets the results as entities of type `T`
    pub fn typed<T: DeserializeOwned>(&self) -> Queryable<T> {
        Queryable::from_expression(Arc::clone(&self.provider), Arc::clone(&self.expression))
    }
}
