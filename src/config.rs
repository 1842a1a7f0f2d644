//! Query configuration
//!
//! Settings for a query provider: literal serialization, query logging and
//! the log threshold. Loadable from JSON; every field has a default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mapper::MapperConfig;
use crate::observability::{log_event, Event, Logger, Severity};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown log severity '{0}'")]
    UnknownSeverity(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "AERO_CONFIG_UNREADABLE",
            ConfigError::Parse(_) => "AERO_CONFIG_INVALID",
            ConfigError::UnknownSeverity(_) => "AERO_CONFIG_INVALID_SEVERITY",
        }
    }
}

/// Query provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Literal serialization settings
    #[serde(default)]
    pub mapper: MapperConfig,

    /// Log translated and rejected predicates (default: true)
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,

    /// Minimum log severity (default: "INFO")
    #[serde(default = "default_min_log_severity")]
    pub min_log_severity: String,
}

fn default_log_queries() -> bool {
    true
}

fn default_min_log_severity() -> String {
    "INFO".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            mapper: MapperConfig::default(),
            log_queries: default_log_queries(),
            min_log_severity: default_min_log_severity(),
        }
    }
}

impl QueryConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: QueryConfig = serde_json::from_str(json)?;
        config.severity()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parsed `min_log_severity`
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.min_log_severity)
            .ok_or_else(|| ConfigError::UnknownSeverity(self.min_log_severity.clone()))
    }

    /// Installs the log threshold process-wide
    pub fn apply(&self) -> Result<(), ConfigError> {
        let severity = self.severity()?;
        Logger::set_min_severity(severity);
        log_event(
            Event::ConfigLoaded,
            &[
                ("log_queries", if self.log_queries { "true" } else { "false" }),
                ("min_log_severity", severity.as_str()),
            ],
        );
        Ok(())
    }
}
