//! Task resolution: anchoring paths at the project directory and parsing settings.

use crate::error::ConfigError;
use crate::types::{ItemSpec, TaskConfig};
use resforge_common::{ResourceFormat, TaskItem};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A task configuration with every path anchored at the project directory and
/// every textual setting parsed.
#[derive(Debug, Clone, Default)]
pub struct ResolvedTask {
    /// Source items in declaration order.
    pub sources: Vec<TaskItem>,
    /// Explicit output items, if the configuration lists any.
    pub output_resources: Option<Vec<TaskItem>>,
    /// Reference assembly paths.
    pub references: Vec<PathBuf>,
    /// Additional input paths.
    pub additional_inputs: Vec<PathBuf>,
    /// State file path.
    pub state_file: Option<PathBuf>,
    /// Format of synthesized outputs.
    pub output_format: ResourceFormat,
    /// Strongly-typed accessor settings.
    pub strongly_typed: ResolvedStronglyTyped,
    /// Worker count, if fixed.
    pub jobs: Option<usize>,
    /// Per-source converter time limit.
    pub converter_timeout: Option<Duration>,
}

/// Accessor settings with the file name anchored at the project directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStronglyTyped {
    /// Accessor language name as written.
    pub language: Option<String>,
    /// Namespace of the generated class.
    pub namespace: Option<String>,
    /// Manifest prefix of the compiled resources.
    pub resources_namespace: Option<String>,
    /// Name of the generated class.
    pub class_name: Option<String>,
    /// Path of the generated accessor file.
    pub file_name: Option<PathBuf>,
    /// Emit a public class.
    pub public_class: bool,
}

/// Resolves a parsed configuration against the directory that contains it.
///
/// Relative paths are joined onto `base_dir`; absolute paths are kept.
pub fn resolve_task(config: TaskConfig, base_dir: &Path) -> Result<ResolvedTask, ConfigError> {
    let anchor = |p: PathBuf| -> PathBuf {
        if p.is_absolute() {
            p
        } else {
            base_dir.join(p)
        }
    };
    let items = |specs: Vec<ItemSpec>| -> Vec<TaskItem> {
        specs
            .into_iter()
            .map(|spec| {
                let mut item = spec.into_item();
                item.path = anchor(std::mem::take(&mut item.path));
                item
            })
            .collect()
    };

    let output_format = match &config.task.output_format {
        Some(name) => name
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("task.output_format: {e}")))?,
        None => ResourceFormat::default(),
    };

    let st = config.strongly_typed;
    Ok(ResolvedTask {
        sources: items(config.task.sources),
        output_resources: config.task.output_resources.map(items),
        references: config.task.references.into_iter().map(anchor).collect(),
        additional_inputs: config
            .task
            .additional_inputs
            .into_iter()
            .map(anchor)
            .collect(),
        state_file: config.task.state_file.map(anchor),
        output_format,
        strongly_typed: ResolvedStronglyTyped {
            language: st.language,
            namespace: st.namespace,
            resources_namespace: st.resources_namespace,
            class_name: st.class_name,
            file_name: st.file_name.map(anchor),
            public_class: st.public_class,
        },
        jobs: config.execution.jobs,
        converter_timeout: config
            .execution
            .converter_timeout_secs
            .map(Duration::from_secs),
    })
}
