//! Error types for gate configuration loading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in configuration file: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Configuration missing required 'version' field")]
    MissingVersion,

    #[error("Configuration missing required 'gates' array")]
    MissingGates,

    #[error("Invalid configuration: {0}")]
    Invalid(#[source] serde_json::Error),
}

/// Gate selection failures from `--gate` / `--phase` filters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Gate '{0}' not found in configuration")]
    GateNotFound(String),

    #[error("No gates found for phase '{0}'")]
    PhaseNotFound(String),

    #[error("No gates to run")]
    NoGates,
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
