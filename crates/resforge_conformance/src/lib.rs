//! Helpers for end-to-end build scenarios.
//!
//! A [`Fixture`] is a throwaway project directory. [`build`] runs the batch
//! coordinator with the real converter and accessor generator against it and
//! returns the result together with every diagnostic emitted.

#![warn(missing_docs)]

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use resforge_build::{BatchCoordinator, BuildOptions, RunResult, TaskInputs};
use resforge_codegen::AccessorCodeGenerator;
use resforge_common::TaskItem;
use resforge_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use resforge_formats::BuiltinConverter;
use tempfile::TempDir;

/// A temporary project directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Creates an empty project directory.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a project-relative file.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Writes a file, creating parent directories. Returns its path.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> io::Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Conventional state file location.
    pub fn state_file(&self) -> PathBuf {
        self.path("obj/resforge.state")
    }
}

/// Sets a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) -> io::Result<()> {
    File::options().write(true).open(path)?.set_modified(time)
}

/// Moves a file's modification time `secs` seconds into the past.
pub fn age(path: &Path, secs: u64) -> io::Result<()> {
    set_mtime(path, SystemTime::now() - Duration::from_secs(secs))
}

/// Moves a file's modification time `secs` seconds into the future.
pub fn touch_ahead(path: &Path, secs: u64) -> io::Result<()> {
    set_mtime(path, SystemTime::now() + Duration::from_secs(secs))
}

/// Current modification time of a file, if it exists.
pub fn mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Task inputs for plain source paths.
pub fn inputs(sources: &[PathBuf]) -> TaskInputs {
    TaskInputs {
        sources: sources.iter().cloned().map(TaskItem::new).collect(),
        ..TaskInputs::default()
    }
}

/// Result of one build run.
pub struct Build {
    /// What the coordinator returned.
    pub result: RunResult,
    /// Every diagnostic emitted.
    pub diagnostics: Vec<Diagnostic>,
}

impl Build {
    /// Codes of all diagnostics, e.g. `["R001", "S002"]`.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }

    /// Error-severity diagnostics.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    /// Paths of the output resources, in order.
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.result
            .output_resources
            .iter()
            .map(|o| o.path.clone())
            .collect()
    }
}

/// Runs one build with default options.
pub fn build(inputs: &TaskInputs, state_file: Option<&Path>) -> Build {
    build_with(BuildOptions::default(), inputs, state_file)
}

/// Runs one build with explicit options.
pub fn build_with(options: BuildOptions, inputs: &TaskInputs, state_file: Option<&Path>) -> Build {
    let coordinator = BatchCoordinator::new(Arc::new(BuiltinConverter), Arc::new(AccessorCodeGenerator))
        .with_options(options);
    let sink = DiagnosticSink::new();
    let result = coordinator.run_with_state(inputs, state_file, &sink);
    Build {
        result,
        diagnostics: sink.take_all(),
    }
}

/// A minimal resx document holding string resources.
pub fn resx_strings(entries: &[(&str, &str)]) -> String {
    let mut doc = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n");
    for (name, value) in entries {
        doc.push_str(&format!(
            "  <data name=\"{name}\" xml:space=\"preserve\">\n    <value>{value}</value>\n  </data>\n"
        ));
    }
    doc.push_str("</root>\n");
    doc
}
