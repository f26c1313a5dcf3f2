//! Process-scoped owner of the state file: load once, share, flush once.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use resforge_common::{write_atomic, Envelope};
use tracing::{debug, warn};

use crate::error::CacheError;
use crate::state::{AccessorRecord, CacheRecord, StateFile};

/// Envelope used for state files.
pub const STATE_ENVELOPE: Envelope = Envelope::new(*b"RFST", 1);

/// How the store was initialised.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No state file is configured; nothing is remembered between runs.
    Disabled,
    /// The configured state file does not exist yet.
    Missing,
    /// The state file was read successfully.
    Loaded {
        /// Number of source records read.
        records: usize,
    },
    /// The state file exists but could not be used.
    Unreadable(CacheError),
}

/// The dependency cache for one run.
///
/// Records are guarded by mutexes so conversion workers can read and update
/// their (disjoint) entries concurrently. [`persist`](Self::persist) consumes
/// the store, so the physical file is written at most once per run.
#[derive(Debug)]
pub struct CacheStore {
    path: Option<PathBuf>,
    tool_version: String,
    records: Mutex<BTreeMap<PathBuf, CacheRecord>>,
    accessors: Mutex<BTreeMap<PathBuf, AccessorRecord>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

impl CacheStore {
    fn from_state(path: Option<PathBuf>, tool_version: &str, state: StateFile) -> Self {
        Self {
            path,
            tool_version: tool_version.to_string(),
            records: Mutex::new(state.records),
            accessors: Mutex::new(state.accessors),
        }
    }

    /// A store that is never read from or written to disk.
    pub fn in_memory(tool_version: &str) -> Self {
        Self::from_state(None, tool_version, StateFile::default())
    }

    /// Loads the state file at `path`, or starts empty.
    ///
    /// This is fail-safe: a missing or unusable file yields an empty store,
    /// and the returned [`LoadOutcome`] says why so the caller can report it.
    pub fn load(path: Option<&Path>, tool_version: &str) -> (Self, LoadOutcome) {
        let Some(path) = path else {
            return (Self::in_memory(tool_version), LoadOutcome::Disabled);
        };
        let owned = Some(path.to_path_buf());

        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file; full rebuild");
                let store = Self::from_state(owned, tool_version, StateFile::default());
                return (store, LoadOutcome::Missing);
            }
            Err(source) => {
                let err = CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{err}");
                let store = Self::from_state(owned, tool_version, StateFile::default());
                return (store, LoadOutcome::Unreadable(err));
            }
        };

        match STATE_ENVELOPE.decode::<StateFile>(&raw) {
            Ok(state) => {
                let records = state.records.len();
                debug!(path = %path.display(), records, "state file loaded");
                (
                    Self::from_state(owned, tool_version, state),
                    LoadOutcome::Loaded { records },
                )
            }
            Err(source) => {
                let err = CacheError::Corrupt {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{err}");
                let store = Self::from_state(owned, tool_version, StateFile::default());
                (store, LoadOutcome::Unreadable(err))
            }
        }
    }

    /// The configured state file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a copy of the record for `source`, if any.
    pub fn record(&self, source: &Path) -> Option<CacheRecord> {
        lock(&self.records).get(source).cloned()
    }

    /// Creates or replaces the record for `source`.
    pub fn update(&self, source: PathBuf, record: CacheRecord) {
        lock(&self.records).insert(source, record);
    }

    /// Returns a copy of the record for the accessor at `path`, if any.
    pub fn accessor(&self, path: &Path) -> Option<AccessorRecord> {
        lock(&self.accessors).get(path).cloned()
    }

    /// Creates or replaces the record for the accessor at `path`.
    pub fn update_accessor(&self, path: PathBuf, record: AccessorRecord) {
        lock(&self.accessors).insert(path, record);
    }

    /// Number of source records currently held.
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    /// Returns `true` if no source records are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes the state file atomically and returns its path.
    ///
    /// Returns `Ok(None)` when no state file is configured. Missing parent
    /// directories are created.
    pub fn persist(self) -> Result<Option<PathBuf>, CacheError> {
        let Some(path) = self.path else {
            return Ok(None);
        };
        let state = StateFile {
            records: self.records.into_inner().unwrap_or_else(|e| e.into_inner()),
            accessors: self.accessors.into_inner().unwrap_or_else(|e| e.into_inner()),
        };
        let bytes = STATE_ENVELOPE
            .encode(&state, &self.tool_version)
            .map_err(|source| CacheError::Corrupt {
                path: path.clone(),
                source,
            })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_atomic(&path, &bytes).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), records = state.records.len(), "state file written");
        Ok(Some(path))
    }
}
