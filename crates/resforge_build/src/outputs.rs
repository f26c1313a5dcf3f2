//! Pairing each source with its output item.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use resforge_common::{merge_forwarding, ResourceFormat, TaskItem};

use crate::error::ConfigurationError;

const FORBIDDEN_CHARS: &[char] = &['<', '>', '|', '"', '?', '*'];

/// Computes and validates the output item of every source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputResolver {
    format: ResourceFormat,
}

impl OutputResolver {
    /// Creates a resolver that synthesizes outputs in `format`.
    pub fn new(format: ResourceFormat) -> Self {
        Self { format }
    }

    /// Resolves one output per source, in source order.
    ///
    /// Without explicit outputs, each output is the source path with the
    /// target format's extension. With explicit outputs, the counts must
    /// match. Either way, source metadata is forwarded onto the output,
    /// overwriting same-named entries. No output may coincide with another
    /// output or with any source.
    pub fn resolve(
        &self,
        sources: &[TaskItem],
        explicit: Option<&[TaskItem]>,
    ) -> Result<Vec<TaskItem>, ConfigurationError> {
        let mut outputs: Vec<TaskItem> = match explicit {
            Some(explicit) if explicit.len() != sources.len() => {
                return Err(ConfigurationError::LengthMismatch {
                    sources: sources.len(),
                    outputs: explicit.len(),
                });
            }
            Some(explicit) => explicit.to_vec(),
            None => sources
                .iter()
                .map(|s| TaskItem::new(self.format.apply_to(&s.path)))
                .collect(),
        };

        for (output, source) in outputs.iter_mut().zip(sources) {
            merge_forwarding(&mut output.metadata, &source.metadata);
        }

        let source_paths: HashSet<PathBuf> = sources.iter().map(|s| normalize(&s.path)).collect();
        let mut seen: HashMap<PathBuf, usize> = HashMap::new();
        for (index, output) in outputs.iter().enumerate() {
            validate_path(&output.path)?;
            let normalized = normalize(&output.path);
            if source_paths.contains(&normalized) {
                return Err(ConfigurationError::OutputIsSource {
                    path: output.path.clone(),
                    index,
                });
            }
            if let Some(first) = seen.insert(normalized, index) {
                return Err(ConfigurationError::DuplicateOutput {
                    path: output.path.clone(),
                    first,
                    second: index,
                });
            }
        }
        Ok(outputs)
    }
}

/// Rejects paths no filesystem will accept.
pub fn validate_path(path: &Path) -> Result<(), ConfigurationError> {
    let invalid = |reason| ConfigurationError::InvalidOutputPath {
        path: path.to_path_buf(),
        reason,
    };
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(invalid("path is empty"));
    }
    if text.contains('\0') {
        return Err(invalid("contains a NUL character"));
    }
    if text.chars().any(char::is_control) {
        return Err(invalid("contains a control character"));
    }
    if text.contains(FORBIDDEN_CHARS) {
        return Err(invalid("contains one of < > | \" ? *"));
    }
    if path.file_name().is_none() {
        return Err(invalid("does not name a file"));
    }
    Ok(())
}

/// Lexically removes `.` components and resolves `..` where possible.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
