//! Inputs and results of one build run.

use std::path::PathBuf;

use resforge_common::{ResourceFormat, TaskItem};
use serde::Serialize;

use crate::error::ConfigurationError;

/// Everything a run consumes. Read-only for the duration of the run.
#[derive(Debug, Clone, Default)]
pub struct TaskInputs {
    /// Source items, in order.
    pub sources: Vec<TaskItem>,
    /// Explicit output items, index-aligned with `sources`.
    pub output_resources: Option<Vec<TaskItem>>,
    /// Format of synthesized outputs.
    pub output_format: ResourceFormat,
    /// Reference assemblies.
    pub references: Vec<PathBuf>,
    /// Files whose change forces every source to rebuild.
    pub additional_inputs: Vec<PathBuf>,
    /// Strongly-typed accessor settings.
    pub strongly_typed: StronglyTypedDescriptor,
}

/// Strongly-typed accessor settings as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StronglyTypedDescriptor {
    /// Accessor language; `None` disables generation.
    pub language: Option<String>,
    /// Namespace of the generated class.
    pub namespace: Option<String>,
    /// Prefix of the manifest name the class loads resources by. `None`
    /// falls back to `namespace`; an empty string means no prefix.
    pub resources_namespace: Option<String>,
    /// Class name; defaults to the accessor file's base name.
    pub class_name: Option<String>,
    /// Accessor path; defaults to the output path with the language extension.
    pub file_name: Option<PathBuf>,
    /// Emit a public class instead of an internal one.
    pub public_class: bool,
}

impl StronglyTypedDescriptor {
    /// Returns `true` if an accessor was requested.
    pub fn is_requested(&self) -> bool {
        self.language.is_some()
    }

    /// Rejects class, namespace or file settings supplied without a language.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.language.is_some() {
            return Ok(());
        }
        let field = if self.class_name.is_some() {
            "class name"
        } else if self.namespace.is_some() {
            "namespace"
        } else if self.resources_namespace.is_some() {
            "resources namespace"
        } else if self.file_name.is_some() {
            "file name"
        } else {
            return Ok(());
        };
        Err(ConfigurationError::StronglyTypedWithoutLanguage { field })
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Outputs of the sources that were up to date or converted, in source order.
    pub output_resources: Vec<TaskItem>,
    /// Every file this run stands behind, in order: resource outputs, the
    /// state file, then the accessor file.
    pub files_written: Vec<PathBuf>,
    /// The resolved accessor path, when an accessor was requested.
    pub strongly_typed_file_name: Option<PathBuf>,
    /// The resolved accessor class name, when an accessor was requested.
    pub strongly_typed_class_name: Option<String>,
    /// `false` if any source or the accessor failed.
    pub success: bool,
}

impl RunResult {
    /// A failed run that produced nothing.
    pub fn failed() -> Self {
        Self::default()
    }
}
