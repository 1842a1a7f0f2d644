//! Structured JSON logger
//!
//! One event per line: `event` first, then `severity`, then the fields
//! sorted by key. Lines below the process-wide threshold are dropped
//! before anything is rendered.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};

use serde_json::Value;

/// Minimum severity written by `Logger::log`, stored as the discriminant
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(Severity::Info as u8);

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Only useful as a threshold: silences everything below it
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Parses a severity name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        [
            Severity::Trace,
            Severity::Info,
            Severity::Warn,
            Severity::Error,
            Severity::Fatal,
        ]
        .into_iter()
        .find(|severity| severity.as_str().eq_ignore_ascii_case(name))
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Severity::Trace,
            1 => Severity::Info,
            2 => Severity::Warn,
            3 => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stream a log line is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    /// Failures (ERROR and above) go to stderr
    pub fn for_severity(severity: Severity) -> Self {
        if severity >= Severity::Error {
            LogStream::Stderr
        } else {
            LogStream::Stdout
        }
    }
}

/// Process-wide JSON logger
pub struct Logger;

impl Logger {
    pub fn set_min_severity(severity: Severity) {
        MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
    }

    pub fn min_severity() -> Severity {
        Severity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
    }

    /// True when an event of `severity` would be written.
    ///
    /// Callers check this before rendering expensive field values.
    pub fn enabled(severity: Severity) -> bool {
        severity >= Self::min_severity()
    }

    /// Writes one line if `severity` passes the threshold
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !Self::enabled(severity) {
            return;
        }
        let line = Self::render(severity, event, fields);
        // A failed log write never fails the query
        let _ = match LogStream::for_severity(severity) {
            LogStream::Stdout => io::stdout().lock().write_all(line.as_bytes()),
            LogStream::Stderr => io::stderr().lock().write_all(line.as_bytes()),
        };
    }

    /// Renders a newline-terminated JSON object
    pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);

        let mut line = format!(
            "{{\"event\":{},\"severity\":\"{}\"",
            json_string(event),
            severity
        );
        for (key, value) in sorted {
            line.push(',');
            line.push_str(&json_string(key));
            line.push(':');
            line.push_str(&json_string(value));
        }
        line.push_str("}\n");
        line
    }
}

fn json_string(s: &str) -> String {
    Value::from(s).to_string()
}
