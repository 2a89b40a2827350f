//! Error types.
//!
//! Detectors never fail: bad input is absorbed as a no-op. Errors only exist
//! at the edges, when loading configuration and when reading a replay stream.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The config text is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A parameter is outside its allowed range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that end a replay early.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read replay input: {0}")]
    Io(#[from] io::Error),
}
