//! Error taxonomy of a build run.
//!
//! [`ConfigurationError`] aborts a run before any side effect.
//! [`ConversionError`] fails one source and the run continues.
//! [`GenerationError`] fails the whole run after the conversions.

use std::path::PathBuf;
use std::time::Duration;

use resforge_diagnostics::{Diagnostic, DiagnosticCode};

use crate::codes;

/// A fatal pre-flight problem with the task inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Explicit outputs were supplied but not one per source.
    #[error("{sources} source(s) but {outputs} output resource(s); they must pair one-to-one")]
    LengthMismatch {
        /// Number of sources.
        sources: usize,
        /// Number of explicit outputs.
        outputs: usize,
    },

    /// An accessor setting was supplied without a language.
    #[error("strongly-typed {field} was specified without a strongly-typed language")]
    StronglyTypedWithoutLanguage {
        /// The offending setting.
        field: &'static str,
    },

    /// An accessor was requested for more than one source.
    #[error("a strongly-typed accessor can only be generated for a single source, but {count} were given")]
    StronglyTypedMultipleSources {
        /// Number of sources.
        count: usize,
    },

    /// An output path can never be created.
    #[error("invalid output path '{path}': {reason}")]
    InvalidOutputPath {
        /// The path as given.
        path: PathBuf,
        /// Why it is invalid.
        reason: &'static str,
    },

    /// Two sources would overwrite the same output.
    #[error("sources {first} and {second} both resolve to output '{path}'")]
    DuplicateOutput {
        /// The shared output path.
        path: PathBuf,
        /// Index of the first source.
        first: usize,
        /// Index of the second source.
        second: usize,
    },

    /// An output would overwrite a source of the same batch.
    #[error("output of source {index} is '{path}', which is itself a source")]
    OutputIsSource {
        /// The output path.
        path: PathBuf,
        /// Index of the source the output belongs to.
        index: usize,
    },
}

impl ConfigurationError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ConfigurationError::LengthMismatch { .. } => codes::LENGTH_MISMATCH,
            ConfigurationError::StronglyTypedWithoutLanguage { .. } => codes::STR_WITHOUT_LANGUAGE,
            ConfigurationError::StronglyTypedMultipleSources { .. } => codes::STR_MULTIPLE_SOURCES,
            ConfigurationError::InvalidOutputPath { .. } => codes::INVALID_OUTPUT_PATH,
            ConfigurationError::DuplicateOutput { .. } => codes::DUPLICATE_OUTPUT,
            ConfigurationError::OutputIsSource { .. } => codes::OUTPUT_IS_SOURCE,
        }
    }

    /// Converts this error into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string())
            .with_note("no source was converted");
        match self {
            ConfigurationError::InvalidOutputPath { path, .. }
            | ConfigurationError::DuplicateOutput { path, .. } => diag.with_path(path),
            ConfigurationError::OutputIsSource { path, .. } => diag
                .with_path(path)
                .with_help("choose another output format or give explicit output resources"),
            ConfigurationError::StronglyTypedWithoutLanguage { .. } => {
                diag.with_help("set a strongly-typed language such as `CSharp` or `VisualBasic`")
            }
            _ => diag,
        }
    }
}

/// Why one source could not be converted.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// The source file does not exist.
    #[error("source file '{0}' does not exist")]
    MissingSource(PathBuf),

    /// The source or output extension is not a known resource format.
    #[error("unsupported file extension on '{0}'")]
    UnsupportedExtension(PathBuf),

    /// A reference assembly does not exist.
    #[error("reference '{0}' does not exist")]
    MissingReference(PathBuf),

    /// The content could not be read or written in the requested format.
    #[error("{detail}")]
    Format {
        /// The file the problem was found in.
        path: PathBuf,
        /// Description of the problem.
        detail: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The converter did not finish within the configured time limit.
    #[error("conversion did not finish within {0:?}")]
    TimedOut(Duration),

    /// The converter stopped without producing a result.
    #[error("converter aborted: {0}")]
    Aborted(String),
}

impl ConversionError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ConversionError::TimedOut(_) => codes::CONVERSION_TIMEOUT,
            _ => codes::CONVERSION_FAILED,
        }
    }
}

/// Why the strongly-typed accessor could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The language is not supported by the generator.
    #[error("no accessor generator for language '{0}'")]
    UnknownLanguage(String),

    /// The class name is not a valid identifier.
    #[error("'{0}' is not a valid class name")]
    InvalidClassName(String),

    /// The namespace is not a dotted identifier.
    #[error("'{0}' is not a valid namespace")]
    InvalidNamespace(String),

    /// The accessor path names an existing directory.
    #[error("cannot write accessor file '{0}': it is a directory")]
    PathIsDirectory(PathBuf),

    /// The accessor path can never be created.
    #[error("invalid accessor file name '{0}'")]
    InvalidPath(PathBuf),

    /// Writing the accessor failed.
    #[error("cannot write accessor file '{path}': {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use resforge_diagnostics::Severity;

    #[test]
    fn length_mismatch_display() {
        let err = ConfigurationError::LengthMismatch {
            sources: 2,
            outputs: 3,
        };
        assert_eq!(
            err.to_string(),
            "2 source(s) but 3 output resource(s); they must pair one-to-one"
        );
        assert_eq!(err.code().to_string(), "C001");
    }

    #[test]
    fn configuration_diagnostic_carries_path() {
        let err = ConfigurationError::InvalidOutputPath {
            path: PathBuf::from("a|b.resources"),
            reason: "contains '|'",
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.path, Some(PathBuf::from("a|b.resources")));
        assert_eq!(diag.code.to_string(), "C004");
    }

    #[test]
    fn timeout_has_its_own_code() {
        let err = ConversionError::TimedOut(Duration::from_secs(3));
        assert_eq!(err.code().to_string(), "R002");
        let err = ConversionError::MissingSource(PathBuf::from("A.resx"));
        assert_eq!(err.code().to_string(), "R001");
    }
}
