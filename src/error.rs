//! Fatal error conditions of a resynchronization run.
//!
//! Per-sentence outcomes (not found, declined, conflict) are not errors;
//! they are decisions recorded in the audit log. Everything here aborts the
//! run before any output file is written.

use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::ParseError;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum ResyncError {
    /// A corpus, candidate or settings file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A corpus file is not in the sentence-block format.
    #[error("malformed corpus {}: {source}", path.display())]
    Malformed {
        /// File that failed.
        path: PathBuf,
        /// Offending line.
        source: ParseError,
    },

    /// An input or candidate path does not exist or holds no corpus files.
    #[error("no corpus files found at {}", path.display())]
    NoFiles {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// The tagging service failed for every chunk of a file.
    #[error("tagging service unavailable for {}: {reason}", path.display())]
    TaggerUnavailable {
        /// Input file being retagged.
        path: PathBuf,
        /// Last error reported by the service.
        reason: String,
    },

    /// An output would overwrite an input or another output.
    #[error("output path {} collides with an input or another output", path.display())]
    OutputCollision {
        /// The colliding path.
        path: PathBuf,
    },

    /// The async runtime driving tagger requests could not start.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Settings are missing or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for fallible run-level operations.
pub type Result<T, E = ResyncError> = std::result::Result<T, E>;
