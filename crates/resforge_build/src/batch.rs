//! The top-level build driver.
//!
//! A run is: pre-flight validation, output resolution, a per-source
//! evaluate → convert → record pass on a worker pool, optional accessor
//! generation, and a single flush of the state file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use resforge_cache::{CacheRecord, CacheStore, LoadOutcome};
use resforge_common::{FileStamp, ResourceFormat, TaskItem};
use resforge_diagnostics::{Diagnostic, DiagnosticSink};
use tracing::{debug, info, warn};

use crate::accessor::StronglyTypedCoordinator;
use crate::codes;
use crate::converter::{AccessorGenerator, ConversionOutcome, ConversionRequest, Converter};
use crate::error::{ConfigurationError, ConversionError};
use crate::outputs::OutputResolver;
use crate::staleness::{Staleness, StalenessEvaluator};
use crate::task::{RunResult, TaskInputs};

/// Execution settings of a run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Worker count. `None` uses the global rayon pool; `Some(1)` runs
    /// sources sequentially on the calling thread.
    pub jobs: Option<usize>,
    /// Time limit for one converter call. A call that overruns is reported
    /// as failed; whatever it writes afterwards never reaches the output.
    pub converter_timeout: Option<Duration>,
    /// Version stamped into the state file.
    pub tool_version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            converter_timeout: None,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// How one source fared.
#[derive(Debug)]
enum SourceOutcome {
    UpToDate { resource_names: Vec<String> },
    Converted(ConversionOutcome),
    Failed(ConversionError),
}

/// Drives a batch of conversions.
pub struct BatchCoordinator {
    converter: Arc<dyn Converter>,
    generator: Arc<dyn AccessorGenerator>,
    options: BuildOptions,
}

impl BatchCoordinator {
    /// Creates a coordinator with default options.
    pub fn new(converter: Arc<dyn Converter>, generator: Arc<dyn AccessorGenerator>) -> Self {
        Self {
            converter,
            generator,
            options: BuildOptions::default(),
        }
    }

    /// Replaces the execution options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Loads the state file and reports an unusable one as a warning.
    pub fn load_state(&self, path: Option<&Path>, sink: &DiagnosticSink) -> CacheStore {
        let (store, outcome) = CacheStore::load(path, &self.options.tool_version);
        if let LoadOutcome::Unreadable(err) = outcome {
            sink.emit(
                Diagnostic::warning(codes::STATE_UNREADABLE, err.to_string())
                    .with_path(err.path())
                    .with_note("every source will be rebuilt"),
            );
        }
        store
    }

    /// Runs the batch.
    ///
    /// Never fails as a whole: problems are reported to `sink` and reflected
    /// in [`RunResult::success`]. The cache is flushed once at the end unless
    /// the run was rejected before any source was looked at.
    pub fn run(&self, inputs: &TaskInputs, cache: CacheStore, sink: &DiagnosticSink) -> RunResult {
        let outputs = match self.preflight(inputs) {
            Ok(outputs) => outputs,
            Err(err) => {
                warn!("{err}");
                sink.emit(err.to_diagnostic());
                return RunResult::failed();
            }
        };

        if inputs.sources.is_empty() {
            sink.emit(Diagnostic::note(codes::NO_SOURCES, "no resources specified"));
            return RunResult {
                success: true,
                ..RunResult::default()
            };
        }

        let records: Vec<Option<CacheRecord>> = inputs
            .sources
            .iter()
            .map(|s| cache.record(&s.path))
            .collect();
        let output_paths: Vec<PathBuf> = outputs.iter().map(|o| o.path.clone()).collect();
        debug!(sources = inputs.sources.len(), records = cache.len(), "evaluating sources");
        let evaluator = StalenessEvaluator::new(
            cache.path().is_some(),
            &inputs.additional_inputs,
            &inputs.references,
            &output_paths,
        );

        let outcomes = self.process_all(inputs, &outputs, &records, &evaluator, &cache);

        let mut result = RunResult {
            success: true,
            ..RunResult::default()
        };
        let mut resource_names = Vec::new();
        for ((source, output), outcome) in inputs.sources.iter().zip(&outputs).zip(outcomes) {
            match outcome {
                SourceOutcome::UpToDate { resource_names: names } => {
                    resource_names = names;
                }
                SourceOutcome::Converted(converted) => {
                    for warning in &converted.warnings {
                        sink.emit(
                            Diagnostic::warning(codes::CONVERSION_WARNING, warning.clone())
                                .with_path(&source.path),
                        );
                    }
                    resource_names = converted.resource_names;
                }
                SourceOutcome::Failed(err) => {
                    sink.emit(
                        Diagnostic::error(err.code(), err.to_string())
                            .with_path(&source.path)
                            .with_note(format!("{} was not written", output.path.display())),
                    );
                    result.success = false;
                    continue;
                }
            }
            result.output_resources.push(output.clone());
            result.files_written.push(output.path.clone());
        }

        let accessor_file = if inputs.strongly_typed.is_requested() {
            self.accessor_step(inputs, &outputs[0], &resource_names, &cache, &mut result, sink)
        } else {
            None
        };

        match cache.persist() {
            Ok(Some(path)) => result.files_written.push(path),
            Ok(None) => {}
            Err(err) => sink.emit(
                Diagnostic::warning(codes::STATE_UNWRITABLE, err.to_string())
                    .with_path(err.path())
                    .with_note("the next build will reconvert every source"),
            ),
        }
        // The accessor is always the last file written.
        result.files_written.extend(accessor_file);

        info!(
            sources = inputs.sources.len(),
            outputs = result.output_resources.len(),
            success = result.success,
            "build finished"
        );
        result
    }

    fn preflight(&self, inputs: &TaskInputs) -> Result<Vec<TaskItem>, ConfigurationError> {
        inputs.strongly_typed.validate()?;
        if inputs.strongly_typed.is_requested() && inputs.sources.len() > 1 {
            return Err(ConfigurationError::StronglyTypedMultipleSources {
                count: inputs.sources.len(),
            });
        }
        OutputResolver::new(inputs.output_format)
            .resolve(&inputs.sources, inputs.output_resources.as_deref())
    }

    fn process_all(
        &self,
        inputs: &TaskInputs,
        outputs: &[TaskItem],
        records: &[Option<CacheRecord>],
        evaluator: &StalenessEvaluator,
        cache: &CacheStore,
    ) -> Vec<SourceOutcome> {
        let work = |index: usize| {
            self.process_one(index, inputs, &outputs[index].path, records[index].as_ref(), evaluator, cache)
        };
        let count = inputs.sources.len();
        match self.options.jobs {
            Some(1) => (0..count).map(work).collect(),
            Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| (0..count).into_par_iter().map(work).collect()),
                Err(err) => {
                    warn!("cannot start {jobs} workers ({err}); converting sequentially");
                    (0..count).map(work).collect()
                }
            },
            None => (0..count).into_par_iter().map(work).collect(),
        }
    }

    fn process_one(
        &self,
        index: usize,
        inputs: &TaskInputs,
        output: &Path,
        record: Option<&CacheRecord>,
        evaluator: &StalenessEvaluator,
        cache: &CacheStore,
    ) -> SourceOutcome {
        let source = &inputs.sources[index].path;
        let Some(input_format) = ResourceFormat::from_path(source) else {
            return SourceOutcome::Failed(ConversionError::UnsupportedExtension(source.clone()));
        };
        let Some(output_format) = ResourceFormat::from_path(output) else {
            return SourceOutcome::Failed(ConversionError::UnsupportedExtension(output.to_path_buf()));
        };

        match evaluator.evaluate(index, source, input_format, output, record) {
            Staleness::UpToDate => {
                debug!(source = %source.display(), "up to date");
                return SourceOutcome::UpToDate {
                    resource_names: record.map(|r| r.resource_names.clone()).unwrap_or_default(),
                };
            }
            Staleness::Stale(reason) => {
                info!(source = %source.display(), output = %output.display(), %reason, "converting");
            }
        }

        let Some(source_stamp) = FileStamp::of(source) else {
            return SourceOutcome::Failed(ConversionError::MissingSource(source.clone()));
        };
        let request = ConversionRequest {
            input: source.clone(),
            input_format,
            output: output.to_path_buf(),
            output_format,
            references: inputs.references.clone(),
        };
        let converted = match self.convert(request) {
            Ok(converted) => converted,
            Err(err) => {
                debug!(source = %source.display(), error = %err, "conversion failed");
                return SourceOutcome::Failed(err);
            }
        };
        let Some(output_stamp) = FileStamp::of(output) else {
            return SourceOutcome::Failed(ConversionError::Aborted(format!(
                "converter reported success but {} does not exist",
                output.display()
            )));
        };

        cache.update(
            source.clone(),
            CacheRecord {
                source_stamp,
                output_path: output.to_path_buf(),
                output_stamp,
                linked: stamps(&converted.linked),
                references: stamps(&inputs.references),
                additional_inputs: evaluator.additional_fingerprint(),
                resource_names: converted.resource_names.clone(),
            },
        );
        SourceOutcome::Converted(converted)
    }

    /// Calls the converter, bounded by the configured time limit.
    ///
    /// With a limit the converter writes to a staging file next to the
    /// output, which is renamed into place only when the result arrives in
    /// time. A timed-out call keeps running on its own thread; its staging
    /// file is removed once it finishes and no record is written for the
    /// source.
    fn convert(&self, request: ConversionRequest) -> Result<ConversionOutcome, ConversionError> {
        let Some(limit) = self.options.converter_timeout else {
            return self.converter.convert(&request);
        };
        let output = request.output.clone();
        let staging = staging_path(&output);
        let staged = ConversionRequest {
            output: staging.clone(),
            ..request
        };

        let (tx, rx) = mpsc::channel();
        let converter = Arc::clone(&self.converter);
        std::thread::Builder::new()
            .name("resforge-convert".to_string())
            .spawn(move || {
                let result = converter.convert(&staged);
                if tx.send(result).is_err() {
                    debug!(path = %staged.output.display(), "discarding late conversion");
                    let _ = std::fs::remove_file(&staged.output);
                }
            })
            .map_err(|e| ConversionError::Aborted(e.to_string()))?;

        match rx.recv_timeout(limit) {
            Ok(Ok(outcome)) => {
                std::fs::rename(&staging, &output).map_err(|source| ConversionError::Io {
                    path: output.clone(),
                    source,
                })?;
                Ok(outcome)
            }
            Ok(Err(err)) => {
                let _ = std::fs::remove_file(&staging);
                Err(err)
            }
            Err(RecvTimeoutError::Timeout) => Err(ConversionError::TimedOut(limit)),
            Err(RecvTimeoutError::Disconnected) => {
                let _ = std::fs::remove_file(&staging);
                Err(ConversionError::Aborted("converter panicked".to_string()))
            }
        }
    }

    fn accessor_step(
        &self,
        inputs: &TaskInputs,
        output: &TaskItem,
        resource_names: &[String],
        cache: &CacheStore,
        result: &mut RunResult,
        sink: &DiagnosticSink,
    ) -> Option<PathBuf> {
        let coordinator = StronglyTypedCoordinator::new(self.generator.as_ref());
        let descriptor = &inputs.strongly_typed;
        let (file, class) = coordinator.echo(descriptor, &output.path);
        result.strongly_typed_file_name = file;
        result.strongly_typed_class_name = class;

        if !result.success {
            return None;
        }

        let generated = coordinator.plan(descriptor, &output.path).and_then(|plan| {
            result.strongly_typed_file_name = Some(plan.path.clone());
            result.strongly_typed_class_name = Some(plan.class_name.clone());
            coordinator
                .maybe_generate(&plan, resource_names, &output.path, cache)
                .map(|_| plan.path)
        });
        match generated {
            Ok(path) => Some(path),
            Err(err) => {
                let mut diag = Diagnostic::error(codes::ACCESSOR_FAILED, err.to_string());
                if let Some(path) = &result.strongly_typed_file_name {
                    diag = diag.with_path(path);
                }
                if let Some(class) = &result.strongly_typed_class_name {
                    diag = diag.with_note(format!("class {class} was not generated"));
                }
                sink.emit(diag);
                result.success = false;
                result.output_resources.clear();
                result.files_written.clear();
                None
            }
        }
    }

    /// Convenience: load the state file, run, and flush.
    pub fn run_with_state(
        &self,
        inputs: &TaskInputs,
        state_file: Option<&Path>,
        sink: &DiagnosticSink,
    ) -> RunResult {
        let cache = self.load_state(state_file, sink);
        self.run(inputs, cache, sink)
    }
}

fn staging_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

fn stamps(paths: &[PathBuf]) -> std::collections::BTreeMap<PathBuf, FileStamp> {
    paths
        .iter()
        .filter_map(|p| FileStamp::of(p).map(|s| (p.clone(), s)))
        .collect()
}
