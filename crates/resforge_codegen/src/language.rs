//! Supported accessor languages.

use std::fmt;
use std::str::FromStr;

/// An accessor source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// C#, written to `.cs` files.
    CSharp,
    /// Visual Basic, written to `.vb` files.
    VisualBasic,
}

impl Language {
    /// Looks up a language by any of its accepted names, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if ["csharp", "c#", "cs"].iter().any(|n| name.eq_ignore_ascii_case(n)) {
            Some(Language::CSharp)
        } else if ["visualbasic", "vb"].iter().any(|n| name.eq_ignore_ascii_case(n)) {
            Some(Language::VisualBasic)
        } else {
            None
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Language::CSharp => "cs",
            Language::VisualBasic => "vb",
        }
    }

    /// Whether identifiers differ only by case are the same identifier.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Language::VisualBasic)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::CSharp => write!(f, "C#"),
            Language::VisualBasic => write!(f, "Visual Basic"),
        }
    }
}

/// Error returned when parsing an unknown language name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown accessor language '{}'", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_name(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_names() {
        for name in ["CSharp", "C#", "cs", "csharp"] {
            assert_eq!(Language::from_name(name), Some(Language::CSharp), "{name}");
        }
        for name in ["VisualBasic", "VB", "vb"] {
            assert_eq!(Language::from_name(name), Some(Language::VisualBasic), "{name}");
        }
        assert_eq!(Language::from_name("fsharp"), None);
        assert_eq!(Language::from_name(""), None);
    }

    #[test]
    fn extensions() {
        assert_eq!(Language::CSharp.extension(), "cs");
        assert_eq!(Language::VisualBasic.extension(), "vb");
    }

    #[test]
    fn parse_error_names_input() {
        let err = "Cobol".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "unknown accessor language 'Cobol'");
    }
}
