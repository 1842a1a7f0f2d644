//! Typed collections
//!
//! A collection pairs an in-memory store with a query provider for one
//! entity type. Entities are stored as their serde JSON form, so their
//! serialized field names must match the storage names of the mapping.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::QueryConfig;
use crate::expression::Lambda;
use crate::mapper::BsonMapper;
use crate::observability::MetricsSnapshot;
use crate::storage::{DocumentKey, MemoryStore};

use super::errors::{QueryError, QueryResult};
use super::provider::{CollectionQueryProvider, QueryProvider};
use super::queryable::Queryable;

/// A stored entity type
pub trait Entity: Serialize + DeserializeOwned {
    /// Name the entity's mapping is registered under
    fn type_name() -> &'static str;
}

/// Documents of one entity type
pub struct Collection<T: Entity> {
    store: Arc<MemoryStore>,
    provider: Arc<CollectionQueryProvider>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Entity> Collection<T> {
    /// Creates an empty collection that keeps the mapper's own settings
    pub fn new(mapper: BsonMapper) -> Self {
        let config = QueryConfig {
            mapper: mapper.config().clone(),
            ..QueryConfig::default()
        };
        Self::with_config(mapper, config)
    }

    /// Creates an empty collection; `config.mapper` replaces the mapper's
    /// serialization settings.
    pub fn with_config(mut mapper: BsonMapper, config: QueryConfig) -> Self {
        mapper.set_config(config.mapper.clone());
        let store = Arc::new(MemoryStore::new(T::type_name()));
        let provider = Arc::new(CollectionQueryProvider::new(
            store.clone(),
            Arc::new(mapper),
            T::type_name(),
            config,
        ));
        Self {
            store,
            provider,
            _marker: std::marker::PhantomData,
        }
    }

    /// Serializes and stores an entity, returning its key
    pub fn insert(&self, entity: &T) -> QueryResult<DocumentKey> {
        let document = serde_json::to_value(entity).map_err(QueryError::Serialize)?;
        Ok(self.store.insert(document)?)
    }

    /// Stores every entity, stopping at the first failure
    pub fn insert_many<'a>(&self, entities: impl IntoIterator<Item = &'a T>) -> QueryResult<usize>
    where
        T: 'a,
    {
        let mut count = 0;
        for entity in entities {
            self.insert(entity)?;
            count += 1;
        }
        Ok(count)
    }

    /// Lazy query over every entity of the collection
    pub fn as_queryable(&self) -> Queryable<T> {
        let provider: Arc<dyn QueryProvider> = self.provider.clone();
        Queryable::new(provider)
    }

    /// Shorthand for `as_queryable().filter(predicate).to_list()`
    pub fn find(&self, predicate: Lambda) -> QueryResult<Vec<T>> {
        self.as_queryable().filter(predicate).to_list()
    }

    pub fn provider(&self) -> Arc<CollectionQueryProvider> {
        Arc::clone(&self.provider)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.provider.metrics()
    }
}
