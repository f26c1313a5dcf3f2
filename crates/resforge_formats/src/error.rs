//! Error types for reading and writing resource files.

use std::path::PathBuf;

/// Errors produced by the format readers and writers.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A text resource line is malformed.
    #[error("line {line}: {message}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What is wrong with it.
        message: String,
    },

    /// An XML resource document is malformed or uses an unsupported construct.
    #[error("invalid resx document: {0}")]
    Xml(String),

    /// A typed value names an assembly that is neither built in nor referenced.
    #[error("cannot resolve type '{type_name}' of resource '{name}'")]
    UnresolvedType {
        /// Resource name.
        name: String,
        /// The type as written.
        type_name: String,
    },

    /// A file reference points at a file that cannot be read.
    #[error("resource '{name}' links to '{path}', which cannot be read: {source}")]
    LinkedFile {
        /// Resource name.
        name: String,
        /// The linked path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A value cannot be represented in the target format.
    #[error("resource '{name}': {reason}")]
    Unrepresentable {
        /// Resource name.
        name: String,
        /// Why it cannot be written.
        reason: &'static str,
    },

    /// A compiled resource blob is invalid.
    #[error("invalid compiled resources: {0}")]
    Binary(#[from] resforge_common::EnvelopeError),
}
