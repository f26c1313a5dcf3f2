//! The persisted state: per-source records and per-accessor records.

use resforge_common::{ContentHash, FileStamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything stored in the state file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    /// Per-source records keyed by source path.
    pub records: BTreeMap<PathBuf, CacheRecord>,
    /// Per-accessor records keyed by accessor file path.
    pub accessors: BTreeMap<PathBuf, AccessorRecord>,
}

/// What was known about a source after its last successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Modification stamp of the source when it was converted.
    pub source_stamp: FileStamp,
    /// The output the source was converted into.
    pub output_path: PathBuf,
    /// Modification stamp of the output right after it was written.
    pub output_stamp: FileStamp,
    /// Linked content discovered in the source, with its stamp at conversion time.
    pub linked: BTreeMap<PathBuf, FileStamp>,
    /// Reference assemblies in effect, with their stamps at conversion time.
    pub references: BTreeMap<PathBuf, FileStamp>,
    /// Fingerprint of the additional-input set in effect.
    pub additional_inputs: ContentHash,
    /// Names of the resources in the source, in file order.
    pub resource_names: Vec<String>,
}

/// Identity of the last accessor generated at a given path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorRecord {
    /// See [`accessor_fingerprint`](crate::accessor_fingerprint).
    pub fingerprint: ContentHash,
}
