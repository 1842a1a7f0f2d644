//! In-memory document store
//!
//! Documents are kept in a `BTreeMap` keyed by `_id`, so scans come out in
//! ascending key order. Integer keys sort before string keys.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use serde_json::Value;

use crate::mapper::ID_FIELD;
use crate::observability::{log_event, Event};
use crate::query::{Query, QueryMatcher};

use super::errors::{StorageError, StorageResult};
use super::store::{DocumentCursor, DocumentStore};

/// Primary key derived from a document's `_id`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKey {
    Int(i64),
    Str(String),
}

impl DocumentKey {
    /// Extracts the key of a document
    pub fn of(document: &Value) -> StorageResult<Self> {
        let Value::Object(fields) = document else {
            return Err(StorageError::invalid_document("document is not an object", document));
        };
        match fields.get(ID_FIELD) {
            Some(Value::Number(n)) => n.as_i64().map(DocumentKey::Int).ok_or_else(|| {
                StorageError::invalid_document("_id must be an integer or a string", document)
            }),
            Some(Value::String(s)) => Ok(DocumentKey::Str(s.clone())),
            Some(_) => Err(StorageError::invalid_document(
                "_id must be an integer or a string",
                document,
            )),
            None => Err(StorageError::invalid_document("missing _id", document)),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Int(i) => write!(f, "{}", i),
            DocumentKey::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Document store held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    documents: RwLock<BTreeMap<DocumentKey, Value>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a new document.
    ///
    /// Fails with AERO_STORAGE_WRITE_FAILED when the key already exists.
    pub fn insert(&self, document: Value) -> StorageResult<DocumentKey> {
        let key = DocumentKey::of(&document)?;
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StorageError::poisoned("insert"))?;
        if documents.contains_key(&key) {
            return Err(StorageError::write_failed(format!(
                "duplicate _id {} in '{}'",
                key, self.name
            )));
        }
        documents.insert(key.clone(), document);
        drop(documents);

        let id = key.to_string();
        log_event(
            Event::StoreInsert,
            &[("collection", self.name.as_str()), ("id", id.as_str())],
        );
        Ok(key)
    }

    /// Inserts or replaces a document, returning the previous version
    pub fn upsert(&self, document: Value) -> StorageResult<Option<Value>> {
        let key = DocumentKey::of(&document)?;
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StorageError::poisoned("upsert"))?;
        Ok(documents.insert(key, document))
    }

    /// Returns the document stored under `key`
    pub fn get(&self, key: &DocumentKey) -> StorageResult<Option<Value>> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StorageError::poisoned("get"))?;
        Ok(documents.get(key).cloned())
    }

    pub fn len(&self) -> StorageResult<usize> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StorageError::poisoned("len"))?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl DocumentStore for MemoryStore {
    /// Snapshots the matching documents so the cursor holds no lock
    fn find(&self, query: &Query) -> StorageResult<DocumentCursor> {
        if *query == Query::Empty {
            return Ok(DocumentCursor::empty());
        }
        let documents = self
            .documents
            .read()
            .map_err(|_| StorageError::poisoned("find"))?;
        let matches: Vec<Value> = documents
            .values()
            .filter(|document| QueryMatcher::matches(document, query))
            .cloned()
            .collect();
        Ok(DocumentCursor::new(matches.into_iter()))
    }
}
