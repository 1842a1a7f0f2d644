//! Query metrics
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one query provider.
///
/// All counters use Relaxed atomics; values are exact once the
/// incrementing threads have been joined.
#[derive(Debug, Default)]
pub struct QueryMetrics {
    /// Predicates translated successfully
    queries_translated: AtomicU64,
    /// Predicates rejected by the translator
    queries_rejected: AtomicU64,
    /// Queries handed to the store
    queries_executed: AtomicU64,
    /// Documents yielded by store cursors
    documents_read: AtomicU64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_translated(&self) {
        self.queries_translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_documents_read(&self) {
        self.documents_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"queries_translated":{},"queries_rejected":{},"queries_executed":{},"documents_read":{}}}"#,
            s.queries_translated, s.queries_rejected, s.queries_executed, s.documents_read,
        )
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_translated: self.queries_translated.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            documents_read: self.documents_read.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of the query counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub queries_translated: u64,
    pub queries_rejected: u64,
    pub queries_executed: u64,
    pub documents_read: u64,
}
