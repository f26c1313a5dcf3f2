//! Identifier rules shared by accessor class and namespace names.

/// Returns `true` if `name` is a valid class identifier: a letter or `_`
/// followed by letters, digits, or `_`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Returns `true` if `ns` is a dot-separated sequence of valid identifiers.
pub fn is_valid_namespace(ns: &str) -> bool {
    !ns.is_empty() && ns.split('.').all(is_valid_identifier)
}

/// Turns an arbitrary file stem into a valid identifier.
///
/// Invalid characters become `_`; a leading digit gets a `_` prefix; an
/// empty input becomes `_`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match out.chars().next() {
        None => out.push('_'),
        Some(c) if c.is_ascii_digit() => out.insert(0, '_'),
        _ => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(is_valid_identifier("Strings"));
        assert!(is_valid_identifier("_private1"));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("~!@#$%^&amp;*("));
        assert!(!is_valid_identifier("a-b"));
    }

    #[test]
    fn namespaces() {
        assert!(is_valid_namespace("My.Resources"));
        assert!(!is_valid_namespace("My..Resources"));
        assert!(!is_valid_namespace(""));
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_identifier("Strings.en-GB"), "Strings_en_GB");
        assert_eq!(sanitize_identifier("123"), "_123");
        assert_eq!(sanitize_identifier(""), "_");
        assert_eq!(sanitize_identifier("Ok"), "Ok");
    }
}
