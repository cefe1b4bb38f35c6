//! Error types for the detection engine
//!
//! Construction errors (missing profiles, bad patterns, malformed
//! resources) are fatal: the store is never partially usable. An
//! empty detection result is not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or verifying a detection engine.
#[derive(Error, Debug)]
pub enum GlossaError {
    /// A language was requested for which no profile exists under
    /// the active profile variant.
    #[error("profile for language '{language}' not found at {path}")]
    ProfileNotFound { language: String, path: PathBuf },

    #[error("invalid profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("invalid admission pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("language map resource {path} could not be used: {reason}")]
    MapResource { path: PathBuf, reason: String },

    /// A probability vector does not span the language roster.
    /// Unreachable once construction checks have passed.
    #[error("probability vector for '{ngram}' has length {actual}, expected {expected}")]
    VectorLengthMismatch {
        ngram: String,
        actual: usize,
        expected: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("malformed profile JSON: {0}")]
    ProfileFormat(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlossaError>;
