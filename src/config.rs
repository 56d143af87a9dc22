//! Compiler configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{Dialect, TextMatch};
use crate::identifier::is_identifier;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid JSON for `AdminConfig`
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "ADMIN_CONFIG_IO",
            ConfigError::Parse(_) => "ADMIN_CONFIG_PARSE",
            ConfigError::Invalid(_) => "ADMIN_CONFIG_INVALID",
        }
    }
}

/// Settings shared by the resolvers and compilers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Store dialect; decides the case-insensitive match operator
    #[serde(default)]
    pub dialect: Dialect,

    /// Columns used to label related records, in priority order (default: name, title)
    #[serde(default = "default_label_fields")]
    pub label_fields: Vec<String>,

    /// Operator applied to free-text search terms (default: "default")
    #[serde(default = "default_search_operator")]
    pub search_operator: String,

    /// Search one level of belongs_to label columns (default: true)
    #[serde(default = "default_search_belongs_to")]
    pub search_belongs_to: bool,

    /// Escape `%`, `_` and `\` in pattern values (default: false)
    #[serde(default)]
    pub escape_like_wildcards: bool,

    /// Parent key used when the parent type cannot be consulted (default: "id")
    #[serde(default = "default_primary_key")]
    pub default_primary_key: String,
}

fn default_label_fields() -> Vec<String> {
    vec!["name".to_string(), "title".to_string()]
}

fn default_search_operator() -> String {
    "default".to_string()
}

fn default_search_belongs_to() -> bool {
    true
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            label_fields: default_label_fields(),
            search_operator: default_search_operator(),
            search_belongs_to: default_search_belongs_to(),
            escape_like_wildcards: false,
            default_primary_key: default_primary_key(),
        }
    }
}

impl AdminConfig {
    /// Default config for the given dialect
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Loads and validates a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parses and validates config JSON
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: AdminConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the serde defaults cannot guarantee
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(label) = self.label_fields.iter().find(|l| !is_identifier(l)) {
            return Err(ConfigError::Invalid(format!(
                "label field '{}' is not a valid column name",
                label
            )));
        }

        if !TextMatch::is_known(&self.search_operator) {
            return Err(ConfigError::Invalid(format!(
                "search_operator '{}' must be one of default, like, is, starts_with, ends_with",
                self.search_operator
            )));
        }

        if !is_identifier(&self.default_primary_key) {
            return Err(ConfigError::Invalid(format!(
                "default_primary_key '{}' is not a valid column name",
                self.default_primary_key
            )));
        }

        Ok(())
    }
}
