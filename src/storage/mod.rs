//! Document storage subsystem
//!
//! Executes Query IR against stored documents. `DocumentStore` is the
//! interface the query surface depends on; `MemoryStore` keeps documents
//! in process memory, ordered by `_id`.

mod errors;
mod memory;
mod store;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use memory::{DocumentKey, MemoryStore};
pub use store::{DocumentCursor, DocumentStore};
