//! Ingestion limits loaded from TOML.
//!
//! Every field falls back to its default when omitted, so an empty file (or
//! no file at all) yields [`IngestConfig::default`]. Unknown keys are
//! rejected to catch typos in deployed configuration.

use crate::name::DEFAULT_MAX_NAME_LENGTH;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default upload budget: 32 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 32 << 20;

/// Default budget for an archive's inflated content: 128 MiB.
pub const DEFAULT_MAX_EXPANDED_BYTES: u64 = 128 << 20;

/// Limits applied while ingesting a pipeline upload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Largest upload accepted, in bytes, before any decoding.
    pub max_upload_bytes: u64,
    /// Largest total inflated size of an archive's entries, in bytes.
    pub max_expanded_bytes: u64,
    /// Longest pipeline name accepted, in characters.
    pub max_name_length: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_expanded_bytes: DEFAULT_MAX_EXPANDED_BYTES,
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

/// Errors raised while loading an [`IngestConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`IngestConfig`].
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl IngestConfig {
    /// Parse configuration from a TOML string.
    ///
    /// ```
    /// use pipeline_ingest::config::IngestConfig;
    ///
    /// let config = IngestConfig::from_toml_str("max_upload_bytes = 1024\n").expect("valid config");
    /// assert_eq!(config.max_upload_bytes, 1024);
    /// assert_eq!(config.max_name_length, 100);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from the TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
