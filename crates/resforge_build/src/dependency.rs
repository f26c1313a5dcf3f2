//! Uniform dependency invalidation.
//!
//! Every file a source depends on, whether it applies to one source or to
//! the whole batch, is described by a [`Dependency`] and checked by the same
//! routine: it is invalid if it is missing, if there is nothing to compare it
//! against, or if it is strictly newer than its baseline.

use std::fmt;
use std::path::PathBuf;

use resforge_common::FileStamp;

/// Which sources a dependency applies to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DependencyScope {
    /// Every source in the batch (or every source of a given format).
    Global,
    /// Only the source at this index.
    PerSource(usize),
}

/// The role a dependency plays.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DependencyKind {
    /// The source file itself.
    Source,
    /// A file linked from inside the source.
    Linked,
    /// A reference assembly.
    Reference,
    /// A caller-declared additional input.
    AdditionalInput,
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DependencyKind::Source => "source",
            DependencyKind::Linked => "linked file",
            DependencyKind::Reference => "reference",
            DependencyKind::AdditionalInput => "additional input",
        })
    }
}

/// A file whose stamp is compared against a baseline.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Dependency {
    /// The file.
    pub path: PathBuf,
    /// Its role.
    pub kind: DependencyKind,
    /// Which sources it invalidates.
    pub scope: DependencyScope,
    /// The stamp it must not be newer than, if one is known.
    pub baseline: Option<FileStamp>,
}

/// Why a dependency is invalid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Invalidation {
    /// The file does not exist.
    Missing,
    /// No baseline is known.
    NoBaseline,
    /// The file is strictly newer than its baseline.
    Newer {
        /// Current stamp.
        current: FileStamp,
        /// Baseline stamp.
        baseline: FileStamp,
    },
}

impl fmt::Display for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invalidation::Missing => f.write_str("is missing"),
            Invalidation::NoBaseline => f.write_str("was not recorded"),
            Invalidation::Newer { .. } => f.write_str("changed"),
        }
    }
}

impl Dependency {
    /// Creates a dependency.
    pub fn new(
        path: impl Into<PathBuf>,
        kind: DependencyKind,
        scope: DependencyScope,
        baseline: Option<FileStamp>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            scope,
            baseline,
        }
    }

    /// Checks the dependency against the live filesystem.
    pub fn check(&self) -> Option<Invalidation> {
        self.check_stamp(FileStamp::of(&self.path))
    }

    /// Checks the dependency against an already-read stamp.
    pub fn check_stamp(&self, current: Option<FileStamp>) -> Option<Invalidation> {
        let Some(current) = current else {
            return Some(Invalidation::Missing);
        };
        let Some(baseline) = self.baseline else {
            return Some(Invalidation::NoBaseline);
        };
        current
            .is_newer_than(baseline)
            .then_some(Invalidation::Newer { current, baseline })
    }
}
