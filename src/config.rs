//! Record Configuration
//!
//! Selects the schema profile and the output options applied when records
//! are dumped to text.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::record::{AutomobileRecord, DumpOptions, JSON_DATE_FORMAT};
use crate::schema::{SchemaProfile, ValidationResult};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Date format chrono cannot render
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
}

/// Record configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordConfig {
    /// Schema profile (default: "normalized")
    #[serde(default)]
    pub profile: SchemaProfile,

    /// Date format for JSON output (default: "%Y/%m/%d")
    #[serde(default = "default_json_date_format")]
    pub json_date_format: String,

    /// Omit null fields from every view (default: false)
    #[serde(default)]
    pub exclude_none: bool,
}

fn default_json_date_format() -> String {
    JSON_DATE_FORMAT.to_string()
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            profile: SchemaProfile::default(),
            json_date_format: default_json_date_format(),
            exclude_none: false,
        }
    }
}

impl RecordConfig {
    /// Create a config with the specified profile
    pub fn with_profile(profile: SchemaProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    /// Parse and check a JSON config document
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Rejects settings that would fail at dump time
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = self.json_date_format.is_empty()
            || StrftimeItems::new(&self.json_date_format).any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(ConfigError::InvalidDateFormat(self.json_date_format.clone()));
        }
        Ok(())
    }

    /// Output options for dumping records
    pub fn dump_options(&self) -> DumpOptions {
        DumpOptions {
            exclude_none: self.exclude_none,
            json_date_format: self.json_date_format.clone(),
        }
    }

    /// Validates JSON text under the configured profile
    pub fn parse(&self, text: &str) -> ValidationResult<AutomobileRecord> {
        AutomobileRecord::from_json_str_with(text, self.profile)
    }

    /// Validates a mapping under the configured profile
    pub fn parse_map(&self, map: &Map<String, Value>) -> ValidationResult<AutomobileRecord> {
        AutomobileRecord::from_map_with(map, self.profile)
    }
}
