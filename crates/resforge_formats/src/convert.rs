//! Format dispatch and the [`Converter`] implementation.

use std::path::{Path, PathBuf};

use resforge_build::{ConversionError, ConversionOutcome, ConversionRequest, Converter};
use resforge_common::{write_atomic, ResourceFormat};
use tracing::debug;

use crate::error::FormatError;
use crate::model::ResourceSet;
use crate::{binary, resx, text};

/// A resource file read into memory.
#[derive(Debug, Default)]
pub struct ReadOutcome {
    /// The resources.
    pub set: ResourceSet,
    /// Linked files the content was pulled from.
    pub linked: Vec<PathBuf>,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> FormatError + '_ {
    move |source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_text_file(path: &Path) -> Result<String, FormatError> {
    let content = std::fs::read_to_string(path).map_err(io_error(path))?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Reads `path` as `format`.
///
/// `references` are consulted for typed resx values.
pub fn read_file(path: &Path, format: ResourceFormat, references: &[PathBuf]) -> Result<ReadOutcome, FormatError> {
    match format {
        ResourceFormat::Text => {
            let (set, warnings) = text::read(&read_text_file(path)?)?;
            Ok(ReadOutcome {
                set,
                linked: Vec::new(),
                warnings,
            })
        }
        ResourceFormat::Resx => {
            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            let doc = resx::read(&read_text_file(path)?, base_dir, references)?;
            Ok(ReadOutcome {
                set: doc.set,
                linked: doc.linked,
                warnings: doc.warnings,
            })
        }
        ResourceFormat::Binary => {
            let bytes = std::fs::read(path).map_err(io_error(path))?;
            Ok(ReadOutcome {
                set: binary::read(&bytes)?,
                ..ReadOutcome::default()
            })
        }
    }
}

/// Serializes `set` in `format`.
pub fn render(set: &ResourceSet, format: ResourceFormat) -> Result<Vec<u8>, FormatError> {
    match format {
        ResourceFormat::Text => text::write(set).map(String::into_bytes),
        ResourceFormat::Resx => resx::write(set).map(String::into_bytes),
        ResourceFormat::Binary => binary::write(set),
    }
}

fn conversion_error(path: &Path, err: FormatError) -> ConversionError {
    match err {
        FormatError::Io { path, source } => ConversionError::Io { path, source },
        other => ConversionError::Format {
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

/// Converts between the built-in formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinConverter;

impl Converter for BuiltinConverter {
    fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutcome, ConversionError> {
        if let Some(missing) = request.references.iter().find(|r| !r.exists()) {
            return Err(ConversionError::MissingReference(missing.clone()));
        }

        let outcome = read_file(&request.input, request.input_format, &request.references)
            .map_err(|e| conversion_error(&request.input, e))?;
        let bytes = render(&outcome.set, request.output_format)
            .map_err(|e| conversion_error(&request.output, e))?;

        if let Some(parent) = request.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConversionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomic(&request.output, &bytes).map_err(|source| ConversionError::Io {
            path: request.output.clone(),
            source,
        })?;

        debug!(
            input = %request.input.display(),
            output = %request.output.display(),
            resources = outcome.set.len(),
            "converted"
        );
        Ok(ConversionOutcome {
            linked: outcome.linked,
            resource_names: outcome.set.names(),
            warnings: outcome.warnings,
        })
    }
}
