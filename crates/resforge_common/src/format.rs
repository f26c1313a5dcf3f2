//! Resource container formats and their file extensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A resource container format, selected by file extension.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum ResourceFormat {
    /// Structured XML resource definition (`.resx`).
    Resx,
    /// Compiled binary resource blob (`.resources`).
    #[default]
    Binary,
    /// Flat `name=value` text list (`.txt`, `.restext`, or no extension).
    Text,
}

impl ResourceFormat {
    /// Detects the format of a path from its extension.
    ///
    /// A path without an extension is treated as text. Returns `None` for
    /// unrecognised extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let Some(ext) = path.extension() else {
            return Some(ResourceFormat::Text);
        };
        match ext.to_str()?.to_ascii_lowercase().as_str() {
            "resx" => Some(ResourceFormat::Resx),
            "resources" => Some(ResourceFormat::Binary),
            "txt" | "restext" => Some(ResourceFormat::Text),
            _ => None,
        }
    }

    /// The canonical file extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ResourceFormat::Resx => "resx",
            ResourceFormat::Binary => "resources",
            ResourceFormat::Text => "txt",
        }
    }

    /// Returns `path` with its extension replaced by this format's extension.
    pub fn apply_to(self, path: &Path) -> PathBuf {
        path.with_extension(self.extension())
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceFormat::Resx => write!(f, "resx"),
            ResourceFormat::Binary => write!(f, "resources"),
            ResourceFormat::Text => write!(f, "text"),
        }
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource format '{0}' (expected resources, resx, or txt)")]
pub struct ParseFormatError(pub String);

impl FromStr for ResourceFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "resx" => Ok(ResourceFormat::Resx),
            "resources" | "binary" => Ok(ResourceFormat::Binary),
            "txt" | "text" | "restext" => Ok(ResourceFormat::Text),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_from_extension() {
        assert_eq!(ResourceFormat::from_path(Path::new("a.resx")), Some(ResourceFormat::Resx));
        assert_eq!(
            ResourceFormat::from_path(Path::new("a.resources")),
            Some(ResourceFormat::Binary)
        );
        assert_eq!(ResourceFormat::from_path(Path::new("a.txt")), Some(ResourceFormat::Text));
        assert_eq!(ResourceFormat::from_path(Path::new("a.ReSx")), Some(ResourceFormat::Resx));
        assert_eq!(ResourceFormat::from_path(Path::new("noext")), Some(ResourceFormat::Text));
        assert_eq!(ResourceFormat::from_path(Path::new("a.foo")), None);
    }

    #[test]
    fn default_is_binary() {
        assert_eq!(ResourceFormat::default(), ResourceFormat::Binary);
    }

    #[test]
    fn apply_replaces_extension() {
        let p = ResourceFormat::Binary.apply_to(Path::new("dir/Strings.resx"));
        assert_eq!(p, PathBuf::from("dir/Strings.resources"));
    }

    #[test]
    fn parse_names() {
        assert_eq!("resx".parse::<ResourceFormat>(), Ok(ResourceFormat::Resx));
        assert_eq!(".resources".parse::<ResourceFormat>(), Ok(ResourceFormat::Binary));
        assert_eq!("TXT".parse::<ResourceFormat>(), Ok(ResourceFormat::Text));
        assert!("dll".parse::<ResourceFormat>().is_err());
    }
}
