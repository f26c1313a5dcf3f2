//! Configuration types deserialized from `resforge.toml`.

use resforge_common::{Metadata, TaskItem};
use serde::Deserialize;
use std::path::PathBuf;

/// The top-level task configuration parsed from `resforge.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Inputs, outputs and dependencies of the conversion task.
    #[serde(default)]
    pub task: TaskSection,
    /// Strongly-typed accessor generation settings.
    #[serde(default)]
    pub strongly_typed: StronglyTypedSection,
    /// Worker pool and timeout settings.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// The `[task]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSection {
    /// Resource files to convert, in order.
    #[serde(default)]
    pub sources: Vec<ItemSpec>,
    /// Explicit outputs, index-aligned with `sources`.
    #[serde(default)]
    pub output_resources: Option<Vec<ItemSpec>>,
    /// Reference assemblies consulted for typed resource values.
    #[serde(default)]
    pub references: Vec<PathBuf>,
    /// Extra files whose change forces every source to rebuild.
    #[serde(default)]
    pub additional_inputs: Vec<PathBuf>,
    /// Where the dependency cache is persisted.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// Format of synthesized outputs: `resources` (default), `resx`, or `txt`.
    #[serde(default)]
    pub output_format: Option<String>,
}

/// An item in a source or output list.
///
/// Accepts either a bare path string or a table with a path and metadata:
///
/// ```toml
/// sources = ["Strings.resx", { path = "Errors.resx", metadata = { Locale = "en-GB" } }]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemSpec {
    /// A bare path.
    Path(PathBuf),
    /// A path with metadata.
    Detailed {
        /// The file path.
        path: PathBuf,
        /// Metadata forwarded onto the matching output item.
        #[serde(default)]
        metadata: Metadata,
    },
}

impl ItemSpec {
    /// Returns the path of this item.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ItemSpec::Path(path) | ItemSpec::Detailed { path, .. } => path,
        }
    }

    /// Converts this spec into a task item.
    pub fn into_item(self) -> TaskItem {
        match self {
            ItemSpec::Path(path) => TaskItem::new(path),
            ItemSpec::Detailed { path, metadata } => TaskItem { path, metadata },
        }
    }
}

/// The `[strongly_typed]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StronglyTypedSection {
    /// Accessor language (`CSharp`, `VisualBasic`, or an alias).
    #[serde(default)]
    pub language: Option<String>,
    /// Namespace of the generated class.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Manifest prefix of the compiled resources; defaults to `namespace`.
    #[serde(default)]
    pub resources_namespace: Option<String>,
    /// Name of the generated class.
    #[serde(default)]
    pub class_name: Option<String>,
    /// Path of the generated accessor file.
    #[serde(default)]
    pub file_name: Option<PathBuf>,
    /// Emit a public class instead of an internal one.
    #[serde(default)]
    pub public_class: bool,
}

impl StronglyTypedSection {
    /// Returns `true` if no accessor field is set.
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.namespace.is_none()
            && self.resources_namespace.is_none()
            && self.class_name.is_none()
            && self.file_name.is_none()
            && !self.public_class
    }
}

/// The `[execution]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Number of conversion workers. Unset means one per CPU.
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Per-source converter time limit in seconds.
    #[serde(default)]
    pub converter_timeout_secs: Option<u64>,
}
