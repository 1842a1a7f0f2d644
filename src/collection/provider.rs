//! Query providers
//!
//! A provider owns everything needed to run a predicate tree: the field
//! mapping used for translation and the store that executes the result.

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::expression::Expr;
use crate::mapper::FieldMapping;
use crate::observability::{event_enabled, log_event, Event, MetricsSnapshot, QueryMetrics};
use crate::query::Query;
use crate::storage::{DocumentCursor, DocumentStore};
use crate::translator::QueryVisitor;

use super::errors::{QueryError, QueryResult};
use super::queryable::UntypedQueryable;

/// Translates and executes predicate trees for one entity type
pub trait QueryProvider: Send + Sync {
    /// Root entity type of the queries this provider runs
    fn entity_type(&self) -> &str;

    /// Translates `expression` without executing it
    fn translate(&self, expression: &Expr) -> QueryResult<Query>;

    /// Translates `expression` and runs it against the store
    fn execute(&self, expression: &Expr) -> QueryResult<DocumentCursor>;

    /// Builds a query over `expression`, resolving the element type from
    /// the expression's static type
    fn create_query(self: Arc<Self>, expression: Expr) -> QueryResult<UntypedQueryable>;
}

/// Provider backed by a `DocumentStore`
pub struct CollectionQueryProvider {
    store: Arc<dyn DocumentStore>,
    mapper: Arc<dyn FieldMapping + Send + Sync>,
    entity_type: String,
    config: QueryConfig,
    metrics: Arc<QueryMetrics>,
}

impl CollectionQueryProvider {
    /// `mapper` is used as given; its serialization settings are expected
    /// to already match `config.mapper`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        mapper: Arc<dyn FieldMapping + Send + Sync>,
        entity_type: impl Into<String>,
        config: QueryConfig,
    ) -> Self {
        Self {
            store,
            mapper,
            entity_type: entity_type.into(),
            config,
            metrics: Arc::new(QueryMetrics::new()),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl QueryProvider for CollectionQueryProvider {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn translate(&self, expression: &Expr) -> QueryResult<Query> {
        let visitor = QueryVisitor::new(self.mapper.as_ref(), &self.entity_type);
        match visitor.translate(expression) {
            Ok(query) => {
                self.metrics.increment_queries_translated();
                if self.config.log_queries && event_enabled(Event::QueryTranslated) {
                    let rendered = query.to_string();
                    log_event(
                        Event::QueryTranslated,
                        &[("entity", self.entity_type.as_str()), ("query", rendered.as_str())],
                    );
                }
                Ok(query)
            }
            Err(err) => {
                self.metrics.increment_queries_rejected();
                if self.config.log_queries {
                    let message = err.to_string();
                    log_event(
                        Event::QueryRejected,
                        &[
                            ("code", err.code()),
                            ("entity", self.entity_type.as_str()),
                            ("message", message.as_str()),
                        ],
                    );
                }
                Err(err.into())
            }
        }
    }

    fn execute(&self, expression: &Expr) -> QueryResult<DocumentCursor> {
        let query = self.translate(expression)?;
        let cursor = self.store.find(&query)?;
        self.metrics.increment_queries_executed();

        if event_enabled(Event::QueryExecuted) {
            let rendered = query.to_string();
            log_event(
                Event::QueryExecuted,
                &[("collection", self.entity_type.as_str()), ("query", rendered.as_str())],
            );
        }

        let metrics = Arc::clone(&self.metrics);
        Ok(DocumentCursor::new(
            cursor.inspect(move |_| metrics.increment_documents_read()),
        ))
    }

    fn create_query(self: Arc<Self>, expression: Expr) -> QueryResult<UntypedQueryable> {
        let ty = expression.ty();
        let element = match ty.queryable_element() {
            Some(element) if element == self.entity_type => element.to_string(),
            Some(element) => {
                return Err(QueryError::UnknownElementType(format!(
                    "{} (provider serves {})",
                    element, self.entity_type
                )))
            }
            None => return Err(QueryError::UnknownElementType(ty.to_string())),
        };
        Ok(UntypedQueryable::new(self, expression, element))
    }
}
