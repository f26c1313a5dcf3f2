//! File modification stamps used for staleness decisions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A file's last-modification time, normalised to seconds and nanoseconds
/// since the Unix epoch.
///
/// Ordering is chronological. Comparisons used for staleness are strict:
/// a dependency is only "newer" when its stamp is greater, never when equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileStamp {
    secs: u64,
    nanos: u32,
}

impl FileStamp {
    /// Reads the modification stamp of a file.
    ///
    /// Returns `None` if the path does not exist, is not a regular file, or
    /// its metadata cannot be read.
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        meta.modified().ok().map(Self::from_system_time)
    }

    /// Converts a [`SystemTime`], clamping times before the epoch to zero.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self {
            secs: since.as_secs(),
            nanos: since.subsec_nanos(),
        }
    }

    /// Converts this stamp back into a [`SystemTime`].
    pub fn to_system_time(self) -> SystemTime {
        UNIX_EPOCH + Duration::new(self.secs, self.nanos)
    }

    /// Returns `true` if this stamp is strictly later than `other`.
    pub fn is_newer_than(self, other: FileStamp) -> bool {
        self > other
    }
}

impl fmt::Debug for FileStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileStamp({}.{:09})", self.secs, self.nanos)
    }
}
