//! Order-independent fingerprints of dependency sets and accessor identity.

use resforge_common::ContentHash;
use std::path::{Path, PathBuf};

/// Fingerprints a set of paths, ignoring order and duplicates.
///
/// Used to notice when the additional-input or reference set itself changes
/// between runs, not just the files in it.
pub fn path_set_fingerprint(paths: &[PathBuf]) -> ContentHash {
    let mut sorted: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    sorted.sort();
    sorted.dedup();
    ContentHash::from_fields(sorted.iter().map(|p| p.to_string_lossy().into_owned()))
}

/// Fingerprints everything a generated accessor's text depends on.
///
/// Resource payload values are deliberately absent: an accessor only changes
/// when the class identity or the set of resource names does.
pub fn accessor_fingerprint(
    language: &str,
    namespace: Option<&str>,
    resources_namespace: Option<&str>,
    class_name: &str,
    public: bool,
    resource_names: &[String],
) -> ContentHash {
    let mut names: Vec<&str> = resource_names.iter().map(String::as_str).collect();
    names.sort_unstable();
    let header = [
        language,
        namespace.unwrap_or(""),
        resources_namespace.unwrap_or(""),
        class_name,
        if public { "public" } else { "internal" },
    ];
    ContentHash::from_fields(header.into_iter().chain(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_set_ignores_order_and_duplicates() {
        let a = path_set_fingerprint(&[PathBuf::from("a"), PathBuf::from("b")]);
        let b = path_set_fingerprint(&[PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("a")]);
        assert_eq!(a, b);
        assert_ne!(a, path_set_fingerprint(&[PathBuf::from("a")]));
    }

    #[test]
    fn empty_set_is_stable() {
        assert_eq!(path_set_fingerprint(&[]), path_set_fingerprint(&[]));
    }

    #[test]
    fn accessor_identity_changes() {
        let names = vec!["Hello".to_string(), "Bye".to_string()];
        let base = accessor_fingerprint("cs", Some("App"), None, "Strings", false, &names);
        assert_eq!(
            base,
            accessor_fingerprint("cs", Some("App"), None, "Strings", false, &["Bye".to_string(), "Hello".to_string()])
        );
        assert_ne!(base, accessor_fingerprint("cs", Some("App"), None, "Strings", true, &names));
        assert_ne!(base, accessor_fingerprint("cs", None, None, "Strings", false, &names));
        assert_ne!(base, accessor_fingerprint("cs", Some("App"), Some("Res"), "Strings", false, &names));
        assert_ne!(base, accessor_fingerprint("vb", Some("App"), None, "Strings", false, &names));
        assert_ne!(
            base,
            accessor_fingerprint("cs", Some("App"), None, "Strings", false, &["Hello".to_string()])
        );
    }
}
