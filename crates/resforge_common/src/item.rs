//! Task items: a path plus a bag of string metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Arbitrary string metadata attached to a task item. Keys are unique.
pub type Metadata = BTreeMap<String, String>;

/// A file-bearing item handed to or produced by the build task.
///
/// The item's identity is its path; metadata never changes the path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// The file path this item refers to.
    pub path: PathBuf,
    /// Metadata carried alongside the path.
    #[serde(default)]
    pub metadata: Metadata,
}

impl TaskItem {
    /// Creates an item with no metadata.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            metadata: Metadata::new(),
        }
    }

    /// Adds a metadata entry, replacing any existing value for `key`.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the metadata value for `key`, if present.
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Returns the item path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for TaskItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Forwards every metadata entry of `src` onto `dst`.
///
/// Same-named entries on `dst` are overwritten; entries present only on
/// `dst` are kept.
pub fn merge_forwarding(dst: &mut Metadata, src: &Metadata) {
    for (key, value) in src {
        dst.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarding_overwrites_and_keeps_output_only_keys() {
        let source = TaskItem::new("X.resx").with_metadata("Locale", "en-GB");
        let mut output = TaskItem::new("custom.resources")
            .with_metadata("Locale", "fr")
            .with_metadata("Flavor", "Pumpkin");

        merge_forwarding(&mut output.metadata, &source.metadata);

        assert_eq!(output.metadata("Locale"), Some("en-GB"));
        assert_eq!(output.metadata("Flavor"), Some("Pumpkin"));
        assert_eq!(output.path, PathBuf::from("custom.resources"));
    }

    #[test]
    fn forwarding_from_empty_is_noop() {
        let mut dst = Metadata::new();
        dst.insert("Keep".into(), "me".into());
        merge_forwarding(&mut dst, &Metadata::new());
        assert_eq!(dst.len(), 1);
    }

    #[test]
    fn display_is_path() {
        let item = TaskItem::new("dir/Strings.resx");
        assert_eq!(item.to_string(), "dir/Strings.resx");
    }
}
