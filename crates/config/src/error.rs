//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;
use vault_harness_invariants::FeeError;

/// Errors that can occur when loading or validating a deployment config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the expected shape.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Fee schedule is inconsistent.
    #[error("Invalid fee schedule: {0}")]
    Fee(#[from] FeeError),

    /// A required field is missing for the selected router kind.
    #[error("Missing {field} for {router_kind} router")]
    Missing {
        field: &'static str,
        router_kind: &'static str,
    },

    /// A field holds a value the harness cannot use.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
