//! Error types for state file operations.

use resforge_common::EnvelopeError;
use std::path::PathBuf;

/// Errors that can occur while reading or writing the state file.
///
/// None of these fail a build: a read error degrades to an empty cache and a
/// write error skips the final flush. Both are surfaced as diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing the state file.
    #[error("state file I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The state file exists but is not a valid state file for this version.
    #[error("state file {path} is unusable: {source}")]
    Corrupt {
        /// The state file path.
        path: PathBuf,
        /// What was wrong with its contents.
        source: EnvelopeError,
    },
}

impl CacheError {
    /// The state file path this error concerns.
    pub fn path(&self) -> &std::path::Path {
        match self {
            CacheError::Io { path, .. } | CacheError::Corrupt { path, .. } => path,
        }
    }
}
