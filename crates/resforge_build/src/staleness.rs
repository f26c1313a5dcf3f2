//! Per-source up-to-date decisions.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use resforge_cache::{path_set_fingerprint, CacheRecord};
use resforge_common::{ContentHash, FileStamp, ResourceFormat};
use tracing::debug;

use crate::dependency::{Dependency, DependencyKind, DependencyScope, Invalidation};

/// Why a source has to be converted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum StaleReason {
    /// There is no usable state file, so no record can be trusted.
    NoStateFile,
    /// The state file has no record for this source.
    NoRecord,
    /// The recorded output differs from the one requested now.
    OutputChanged {
        /// The output recorded last time.
        recorded: PathBuf,
    },
    /// The output file does not exist.
    OutputMissing,
    /// The output was modified after it was written.
    OutputReplaced,
    /// The set of additional inputs differs from last time.
    AdditionalInputsChanged,
    /// The set of references differs from last time.
    ReferencesChanged,
    /// A file dependency is invalid.
    Dependency {
        /// Role of the dependency.
        kind: DependencyKind,
        /// Which sources it applies to.
        scope: DependencyScope,
        /// The dependency file.
        path: PathBuf,
        /// What is wrong with it.
        invalidation: Invalidation,
    },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::NoStateFile => f.write_str("no state file"),
            StaleReason::NoRecord => f.write_str("not built before"),
            StaleReason::OutputChanged { recorded } => {
                write!(f, "output was previously {}", recorded.display())
            }
            StaleReason::OutputMissing => f.write_str("output is missing"),
            StaleReason::OutputReplaced => f.write_str("output was modified since it was written"),
            StaleReason::AdditionalInputsChanged => f.write_str("additional input set changed"),
            StaleReason::ReferencesChanged => f.write_str("reference set changed"),
            StaleReason::Dependency {
                kind,
                path,
                invalidation,
                ..
            } => write!(f, "{kind} {} {invalidation}", path.display()),
        }
    }
}

/// The verdict for one source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Staleness {
    /// The existing output can be reused.
    UpToDate,
    /// The source must be converted.
    Stale(StaleReason),
}

fn first_invalid(deps: impl IntoIterator<Item = Dependency>) -> Option<StaleReason> {
    deps.into_iter().find_map(|dep| {
        let invalidation = dep.check()?;
        Some(StaleReason::Dependency {
            kind: dep.kind,
            scope: dep.scope,
            path: dep.path,
            invalidation,
        })
    })
}

/// Decides, per source, whether its existing output can be reused.
///
/// Additional inputs are checked once for the whole batch against the oldest
/// output. References are checked per XML source against the stamps its own
/// record captured, so sources that never consume references cannot hold the
/// rest of the batch stale.
#[derive(Debug)]
pub struct StalenessEvaluator {
    global: Option<StaleReason>,
    additional_fingerprint: ContentHash,
    references: BTreeSet<PathBuf>,
}

impl StalenessEvaluator {
    /// Builds the evaluator for one batch.
    ///
    /// `outputs` are the resolved outputs of every source.
    pub fn new(
        state_usable: bool,
        additional_inputs: &[PathBuf],
        references: &[PathBuf],
        outputs: &[PathBuf],
    ) -> Self {
        let global = if state_usable {
            // An additional input only has to be older than the oldest output.
            let oldest_output = outputs.iter().filter_map(|p| FileStamp::of(p)).min();
            first_invalid(additional_inputs.iter().map(|p| {
                Dependency::new(p, DependencyKind::AdditionalInput, DependencyScope::Global, oldest_output)
            }))
        } else {
            Some(StaleReason::NoStateFile)
        };
        if let Some(reason) = &global {
            debug!(%reason, "every source is stale");
        }

        Self {
            global,
            additional_fingerprint: path_set_fingerprint(additional_inputs),
            references: references.iter().cloned().collect(),
        }
    }

    /// Fingerprint of the additional-input set, as stored in new records.
    pub fn additional_fingerprint(&self) -> ContentHash {
        self.additional_fingerprint
    }

    /// The source, its linked content and, for XML sources, the references,
    /// each against the stamp `record` captured.
    fn dependencies(
        &self,
        index: usize,
        source: &Path,
        format: ResourceFormat,
        record: &CacheRecord,
    ) -> Vec<Dependency> {
        let scope = DependencyScope::PerSource(index);
        let mut deps = vec![Dependency::new(
            source,
            DependencyKind::Source,
            scope,
            Some(record.source_stamp),
        )];
        deps.extend(
            record
                .linked
                .iter()
                .map(|(path, stamp)| Dependency::new(path, DependencyKind::Linked, scope, Some(*stamp))),
        );
        if format == ResourceFormat::Resx {
            deps.extend(self.references.iter().map(|path| {
                Dependency::new(
                    path,
                    DependencyKind::Reference,
                    DependencyScope::Global,
                    record.references.get(path).copied(),
                )
            }));
        }
        deps
    }

    /// Evaluates source `index`.
    pub fn evaluate(
        &self,
        index: usize,
        source: &Path,
        format: ResourceFormat,
        output: &Path,
        record: Option<&CacheRecord>,
    ) -> Staleness {
        match self.stale_reason(index, source, format, output, record) {
            Some(reason) => Staleness::Stale(reason),
            None => Staleness::UpToDate,
        }
    }

    fn stale_reason(
        &self,
        index: usize,
        source: &Path,
        format: ResourceFormat,
        output: &Path,
        record: Option<&CacheRecord>,
    ) -> Option<StaleReason> {
        if let Some(reason) = &self.global {
            return Some(reason.clone());
        }
        let Some(record) = record else {
            return Some(StaleReason::NoRecord);
        };
        if record.output_path != output {
            return Some(StaleReason::OutputChanged {
                recorded: record.output_path.clone(),
            });
        }
        match FileStamp::of(output) {
            None => return Some(StaleReason::OutputMissing),
            Some(stamp) if stamp != record.output_stamp => return Some(StaleReason::OutputReplaced),
            Some(_) => {}
        }
        if record.additional_inputs != self.additional_fingerprint {
            return Some(StaleReason::AdditionalInputsChanged);
        }
        if format == ResourceFormat::Resx && !record.references.keys().eq(self.references.iter()) {
            return Some(StaleReason::ReferencesChanged);
        }
        first_invalid(self.dependencies(index, source, format, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn touch(path: &Path, offset_secs: u64) {
        std::fs::write(path, "x").unwrap();
        let when = SystemTime::now() + Duration::from_secs(offset_secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(when)
            .unwrap();
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        source: PathBuf,
        output: PathBuf,
        linked: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("A.resx");
        let output = dir.path().join("A.resources");
        let linked = dir.path().join("logo.bmp");
        touch(&source, 0);
        touch(&linked, 0);
        touch(&output, 1);
        Fixture {
            _dir: dir,
            source,
            output,
            linked,
        }
    }

    fn record_for(f: &Fixture) -> CacheRecord {
        CacheRecord {
            source_stamp: FileStamp::of(&f.source).unwrap(),
            output_path: f.output.clone(),
            output_stamp: FileStamp::of(&f.output).unwrap(),
            linked: BTreeMap::from([(f.linked.clone(), FileStamp::of(&f.linked).unwrap())]),
            references: BTreeMap::new(),
            additional_inputs: path_set_fingerprint(&[]),
            resource_names: vec![],
        }
    }

    fn evaluator(f: &Fixture, additional: &[PathBuf]) -> StalenessEvaluator {
        StalenessEvaluator::new(true, additional, &[], &[f.output.clone()])
    }

    #[test]
    fn fresh_record_is_up_to_date() {
        let f = fixture();
        let record = record_for(&f);
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::UpToDate);
    }

    #[test]
    fn no_record_is_stale() {
        let f = fixture();
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, None);
        assert_eq!(verdict, Staleness::Stale(StaleReason::NoRecord));
    }

    #[test]
    fn unusable_state_forces_everything() {
        let f = fixture();
        let record = record_for(&f);
        let eval = StalenessEvaluator::new(false, &[], &[], &[f.output.clone()]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Text, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::Stale(StaleReason::NoStateFile));
    }

    #[test]
    fn deleted_output_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        std::fs::remove_file(&f.output).unwrap();
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::Stale(StaleReason::OutputMissing));
    }

    #[test]
    fn touched_source_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        touch(&f.source, 60);
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert!(matches!(
            verdict,
            Staleness::Stale(StaleReason::Dependency {
                kind: DependencyKind::Source,
                ..
            })
        ));
    }

    #[test]
    fn touched_linked_file_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        touch(&f.linked, 60);
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert!(matches!(
            verdict,
            Staleness::Stale(StaleReason::Dependency {
                kind: DependencyKind::Linked,
                scope: DependencyScope::PerSource(0),
                ..
            })
        ));
    }

    #[test]
    fn newer_additional_input_fires_globally() {
        let f = fixture();
        let extra = f.source.with_file_name("build.props");
        touch(&extra, 60);
        let mut record = record_for(&f);
        record.additional_inputs = path_set_fingerprint(&[extra.clone()]);
        let eval = evaluator(&f, &[extra]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Text, &f.output, Some(&record));
        assert!(matches!(
            verdict,
            Staleness::Stale(StaleReason::Dependency {
                kind: DependencyKind::AdditionalInput,
                scope: DependencyScope::Global,
                ..
            })
        ));
    }

    #[test]
    fn older_additional_input_does_not_fire() {
        let f = fixture();
        let extra = f.source.with_file_name("build.props");
        touch(&extra, 0);
        let mut record = record_for(&f);
        record.additional_inputs = path_set_fingerprint(&[extra.clone()]);
        let eval = evaluator(&f, &[extra]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Text, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::UpToDate);
    }

    #[test]
    fn changed_additional_input_set_is_stale() {
        let f = fixture();
        let extra = f.source.with_file_name("build.props");
        touch(&extra, 0);
        let record = record_for(&f);
        let eval = evaluator(&f, &[extra]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Text, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::Stale(StaleReason::AdditionalInputsChanged));
    }

    fn with_reference(f: &Fixture) -> (PathBuf, CacheRecord) {
        let reference = f.source.with_file_name("Widgets.dll");
        touch(&reference, 0);
        let mut record = record_for(f);
        record
            .references
            .insert(reference.clone(), FileStamp::of(&reference).unwrap());
        (reference, record)
    }

    #[test]
    fn newer_reference_only_affects_xml_sources() {
        let f = fixture();
        let (reference, record) = with_reference(&f);
        touch(&reference, 60);

        let eval = StalenessEvaluator::new(true, &[], &[reference], &[f.output.clone()]);
        let xml = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert!(matches!(
            xml,
            Staleness::Stale(StaleReason::Dependency {
                kind: DependencyKind::Reference,
                scope: DependencyScope::Global,
                ..
            })
        ));
        let text = eval.evaluate(0, &f.source, ResourceFormat::Text, &f.output, Some(&record));
        assert_eq!(text, Staleness::UpToDate);
    }

    #[test]
    fn reference_is_judged_against_each_record() {
        let f = fixture();
        let (reference, mut fresh) = with_reference(&f);
        let stale = fresh.clone();
        touch(&reference, 60);
        fresh
            .references
            .insert(reference.clone(), FileStamp::of(&reference).unwrap());

        let eval = StalenessEvaluator::new(true, &[], &[reference], &[f.output.clone()]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&fresh));
        assert_eq!(verdict, Staleness::UpToDate);
        let verdict = eval.evaluate(1, &f.source, ResourceFormat::Text, &f.output, Some(&stale));
        assert_eq!(verdict, Staleness::UpToDate);
    }

    #[test]
    fn added_reference_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        let reference = f.source.with_file_name("Widgets.dll");
        touch(&reference, 0);
        let eval = StalenessEvaluator::new(true, &[], &[reference], &[f.output.clone()]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::Stale(StaleReason::ReferencesChanged));
    }

    #[test]
    fn replaced_output_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        touch(&f.output, 30);
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &f.output, Some(&record));
        assert_eq!(verdict, Staleness::Stale(StaleReason::OutputReplaced));
    }

    #[test]
    fn moved_output_is_stale() {
        let f = fixture();
        let record = record_for(&f);
        let elsewhere = f.output.with_file_name("B.resources");
        touch(&elsewhere, 1);
        let eval = evaluator(&f, &[]);
        let verdict = eval.evaluate(0, &f.source, ResourceFormat::Resx, &elsewhere, Some(&record));
        assert!(matches!(verdict, Staleness::Stale(StaleReason::OutputChanged { .. })));
    }
}
