//! Mapper configuration
//!
//! Controls how host literals are turned into stored values.

use serde::{Deserialize, Serialize};

/// Serialization options applied to every literal the mapper produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Store enums by ordinal instead of by variant name (default: false)
    #[serde(default)]
    pub enum_as_integer: bool,

    /// Trim leading and trailing whitespace of strings (default: true)
    #[serde(default = "default_true")]
    pub trim_whitespace: bool,

    /// Serialize empty strings as null (default: true)
    #[serde(default = "default_true")]
    pub empty_string_to_null: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            enum_as_integer: false,
            trim_whitespace: default_true(),
            empty_string_to_null: default_true(),
        }
    }
}

impl MapperConfig {
    /// Create a config that stores strings verbatim
    pub fn verbatim_strings() -> Self {
        Self {
            trim_whitespace: false,
            empty_string_to_null: false,
            ..Default::default()
        }
    }
}
