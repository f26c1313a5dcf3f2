//! Collaborator interfaces: resource conversion and accessor generation.

use std::path::PathBuf;

use resforge_common::ResourceFormat;

use crate::error::{ConversionError, GenerationError};

/// One source-to-output conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// The source file.
    pub input: PathBuf,
    /// Format of the source file.
    pub input_format: ResourceFormat,
    /// The file to write.
    pub output: PathBuf,
    /// Format to write.
    pub output_format: ResourceFormat,
    /// Reference assemblies available for resolving typed values.
    pub references: Vec<PathBuf>,
}

/// What a successful conversion reports back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// Files the source links to instead of embedding.
    pub linked: Vec<PathBuf>,
    /// Resource names, in source order.
    pub resource_names: Vec<String>,
    /// Non-fatal problems worth reporting.
    pub warnings: Vec<String>,
}

/// Converts one resource file into another format.
///
/// Implementations must write `request.output` only on success.
pub trait Converter: Send + Sync {
    /// Performs the conversion.
    fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutcome, ConversionError>;
}

/// Everything the generator needs to write one accessor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorRequest {
    /// Names of the resources to expose.
    pub resource_names: Vec<String>,
    /// Accessor language as supplied.
    pub language: String,
    /// Namespace of the class, if any.
    pub namespace: Option<String>,
    /// Prefix of the manifest name passed to the resource manager, if any.
    pub resources_namespace: Option<String>,
    /// Class name.
    pub class_name: String,
    /// Emit a public class.
    pub public: bool,
    /// The accessor file to write.
    pub output: PathBuf,
    /// Path of the resource output the accessor loads from.
    pub resource_path: PathBuf,
}

/// Generates strongly-typed accessor source files.
pub trait AccessorGenerator: Send + Sync {
    /// The file extension (without dot) for `language`, or `None` if the
    /// language is not supported.
    fn file_extension(&self, language: &str) -> Option<&'static str>;

    /// Writes the accessor file.
    fn generate(&self, request: &AccessorRequest) -> Result<(), GenerationError>;
}
