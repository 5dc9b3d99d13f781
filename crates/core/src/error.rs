//! Error types for loading chart data and configuration.
//!
//! The numeric core never fails; these errors only come from file access,
//! parsing and worker tasks.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or comparing charts.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Reading an input file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON chart file.
    #[error("invalid JSON chart data: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV chart file.
    #[error("invalid CSV chart data: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be extracted.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Input file type is not recognized.
    #[error("unsupported input {}: expected a .json or .csv file", path.display())]
    UnsupportedInput {
        /// Offending path.
        path: PathBuf,
    },

    /// Unknown output format name.
    #[error("unknown output format '{0}', expected text or json")]
    UnknownFormat(String),

    /// A comparison worker panicked or was cancelled.
    #[error("comparison worker failed: {0}")]
    Worker(String),
}

impl StatsError {
    /// Creates an I/O error for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an unsupported input error.
    pub fn unsupported_input(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedInput { path: path.into() }
    }
}

impl From<figment::Error> for StatsError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for StatsError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}

/// Result type alias for chart loading and comparison.
pub type Result<T> = std::result::Result<T, StatsError>;
