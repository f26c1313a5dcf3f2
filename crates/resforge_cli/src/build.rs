//! `resforge build`: load the task, merge flags, run the batch, report.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use resforge_build::{BatchCoordinator, BuildOptions, StronglyTypedDescriptor, TaskInputs};
use resforge_codegen::AccessorCodeGenerator;
use resforge_common::TaskItem;
use resforge_config::{load_config, load_config_file, resolve_task, ConfigError, ResolvedTask, CONFIG_FILE_NAME};
use resforge_diagnostics::DiagnosticSink;
use resforge_formats::BuiltinConverter;
use tracing::info;

use crate::report;
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `resforge build` command.
///
/// Returns exit code 0 if every source succeeded, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let task = merge_args(load_task(global.config.as_deref())?, args);
    let inputs = to_inputs(&task);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Building {} resource source(s)", inputs.sources.len());
    }
    info!(
        sources = inputs.sources.len(),
        state_file = ?task.state_file,
        jobs = ?task.jobs,
        "starting build"
    );

    let coordinator = BatchCoordinator::new(Arc::new(BuiltinConverter), Arc::new(AccessorCodeGenerator))
        .with_options(BuildOptions {
            jobs: task.jobs,
            converter_timeout: task.converter_timeout,
            ..BuildOptions::default()
        });
    let sink = DiagnosticSink::new();
    let result = coordinator.run_with_state(&inputs, task.state_file.as_deref(), &sink);

    report::emit(&result, &sink.take_all(), args.format, global);
    Ok(if result.success { 0 } else { 1 })
}

/// Loads the task file named by `--config`, else `./resforge.toml` if it
/// exists, else an empty task driven by flags alone.
fn load_task(config: Option<&Path>) -> Result<ResolvedTask, ConfigError> {
    match config {
        Some(path) => {
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            resolve_task(load_config_file(path)?, base)
        }
        None => {
            let cwd = Path::new(".");
            if cwd.join(CONFIG_FILE_NAME).is_file() {
                resolve_task(load_config(cwd)?, cwd)
            } else {
                Ok(ResolvedTask::default())
            }
        }
    }
}

/// Applies command-line flags on top of the task file.
///
/// Sources and outputs are index-aligned, so a flag list replaces the file's
/// list; `--source` alone also drops the file's outputs. References and
/// additional inputs accumulate. Scalar flags override.
fn merge_args(mut task: ResolvedTask, args: &BuildArgs) -> ResolvedTask {
    if !args.sources.is_empty() {
        task.sources = args.sources.iter().cloned().map(TaskItem::new).collect();
        task.output_resources = None;
    }
    if !args.outputs.is_empty() {
        task.output_resources = Some(args.outputs.iter().cloned().map(TaskItem::new).collect());
    }
    task.references.extend(args.references.iter().cloned());
    task.additional_inputs.extend(args.additional_inputs.iter().cloned());

    if let Some(state) = &args.state_file {
        task.state_file = Some(state.clone());
    }
    if let Some(format) = args.output_format {
        task.output_format = format;
    }

    let st = &mut task.strongly_typed;
    if let Some(language) = &args.str_language {
        st.language = Some(language.clone());
    }
    if let Some(namespace) = &args.str_namespace {
        st.namespace = Some(namespace.clone());
    }
    if let Some(prefix) = &args.str_resources_namespace {
        st.resources_namespace = Some(prefix.clone());
    }
    if let Some(class) = &args.str_class {
        st.class_name = Some(class.clone());
    }
    if let Some(file) = &args.str_file {
        st.file_name = Some(file.clone());
    }
    st.public_class |= args.public_class;

    if let Some(jobs) = args.jobs {
        task.jobs = Some(usize::try_from(jobs).unwrap_or(usize::MAX));
    }
    if let Some(secs) = args.timeout {
        task.converter_timeout = Some(Duration::from_secs(secs));
    }
    task
}

fn to_inputs(task: &ResolvedTask) -> TaskInputs {
    let st = &task.strongly_typed;
    TaskInputs {
        sources: task.sources.clone(),
        output_resources: task.output_resources.clone(),
        output_format: task.output_format,
        references: task.references.clone(),
        additional_inputs: task.additional_inputs.clone(),
        strongly_typed: StronglyTypedDescriptor {
            language: st.language.clone(),
            namespace: st.namespace.clone(),
            resources_namespace: st.resources_namespace.clone(),
            class_name: st.class_name.clone(),
            file_name: st.file_name.clone(),
            public_class: st.public_class,
        },
    }
}
