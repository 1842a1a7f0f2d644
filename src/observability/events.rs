//! Observability events
//!
//! Events are explicit and typed; each one carries its own severity.

use std::fmt;

use super::logger::Severity;

/// Observable events of query translation and execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Query configuration loaded
    ConfigLoaded,

    // Query operations
    /// Predicate translated to a query
    QueryTranslated,
    /// Predicate rejected by the translator
    QueryRejected,
    /// Query handed to the document store
    QueryExecuted,

    // Store operations
    /// Document inserted
    StoreInsert,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryTranslated => "QUERY_TRANSLATED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::StoreInsert => "STORE_INSERT",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded => Severity::Info,
            Event::QueryRejected => Severity::Warn,
            Event::QueryTranslated | Event::QueryExecuted | Event::StoreInsert => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
