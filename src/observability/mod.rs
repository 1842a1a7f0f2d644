//! Observability subsystem
//!
//! - Structured logging (JSON)
//! - Query counters
//! - Typed events
//!
//! Observability is read-only: it never changes what a query returns.
//!
//! ```ignore
//! use aerolite::observability::{log_event, Event, QueryMetrics};
//!
//! log_event(Event::QueryTranslated, &[("entity", "Article")]);
//!
//! let metrics = QueryMetrics::new();
//! metrics.increment_queries_executed();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{LogStream, Logger, Severity};
pub use metrics::{MetricsSnapshot, QueryMetrics};

/// Log an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

/// True when `event` would be written under the current threshold
pub fn event_enabled(event: Event) -> bool {
    Logger::enabled(event.severity())
}
