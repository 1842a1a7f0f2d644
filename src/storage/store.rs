//! Document store interface
//!
//! The store is the sole consumer of the Query IR. `find` evaluates a query
//! and returns a cursor over matching documents.

use std::fmt;

use serde_json::Value;

use crate::query::Query;

use super::errors::StorageResult;

/// Executes queries against stored documents
pub trait DocumentStore: Send + Sync {
    /// Returns the documents matching `query`
    fn find(&self, query: &Query) -> StorageResult<DocumentCursor>;
}

/// Lazy sequence of documents returned by `DocumentStore::find`
pub struct DocumentCursor {
    inner: Box<dyn Iterator<Item = Value> + Send>,
}

impl DocumentCursor {
    pub fn new(inner: impl Iterator<Item = Value> + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// A cursor that yields nothing
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for DocumentCursor {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next()
    }
}

impl fmt::Debug for DocumentCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCursor").finish_non_exhaustive()
    }
}
