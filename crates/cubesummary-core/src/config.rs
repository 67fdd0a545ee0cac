//! Settings file.
//!
//! ```toml
//! grouping_time_zone = "America/Chicago"
//! summary_path = "summaries.json"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key is optional. The timezone is checked when the file is loaded so
//! a typo stops the program before any summary is generated.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{Result, SummaryError};
use crate::tz::parse_tz;

/// Reporting timezone used when nothing else is configured.
pub const DEFAULT_TIME_ZONE: &str = "Australia/Darwin";

/// Summary file used when nothing else is configured.
pub const DEFAULT_SUMMARY_PATH: &str = "summaries.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub grouping_time_zone: String,
    pub summary_path: PathBuf,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `cubesummary_core=debug`.
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grouping_time_zone: DEFAULT_TIME_ZONE.to_string(),
            summary_path: PathBuf::from(DEFAULT_SUMMARY_PATH),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| SummaryError::ConfigError(e.to_string()))?;
        settings.timezone()?;
        Ok(settings)
    }

    /// Read and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            SummaryError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_tz(&self.grouping_time_zone)
    }
}
