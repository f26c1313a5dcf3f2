//! The flat `name=value` text format.
//!
//! Blank lines and lines starting with `#` or `;` are comments. Name and
//! value are trimmed. Values understand `\\`, `\n`, `\r`, `\t`, `\"` and
//! `\uXXXX` escapes.

use crate::error::FormatError;
use crate::model::{Resource, ResourceSet, ResourceValue};

/// Parses a text resource file. Returns the set and any warnings.
pub fn read(content: &str) -> Result<(ResourceSet, Vec<String>), FormatError> {
    let mut set = ResourceSet::new();
    let mut warnings = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let syntax = |message: String| FormatError::Syntax {
            line: line_no,
            message,
        };

        if line.starts_with('[') {
            if line.eq_ignore_ascii_case("[strings]") {
                warnings.push(format!(
                    "line {line_no}: obsolete [strings] section marker ignored"
                ));
                continue;
            }
            return Err(syntax(format!("unsupported square bracket keyword {line}")));
        }

        let Some((name, value)) = line.split_once('=') else {
            return Err(syntax("missing '=' in name/value pair".to_string()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(syntax("resource name is empty".to_string()));
        }
        let value = unescape(value.trim()).map_err(syntax)?;

        if !set.insert(Resource::string(name, value)) {
            warnings.push(format!(
                "line {line_no}: duplicate resource name '{name}'; the first definition is kept"
            ));
        }
    }
    Ok((set, warnings))
}

/// Writes a resource set as text. Only string resources can be written.
pub fn write(set: &ResourceSet) -> Result<String, FormatError> {
    let mut out = String::new();
    for resource in set.iter() {
        let ResourceValue::String(value) = &resource.value else {
            return Err(FormatError::Unrepresentable {
                name: resource.name.clone(),
                reason: "only string resources can be written to a text file",
            });
        };
        let name = &resource.name;
        if name.trim() != name
            || name.contains(['=', '\n', '\r'])
            || name.starts_with(['#', ';', '['])
        {
            return Err(FormatError::Unrepresentable {
                name: name.clone(),
                reason: "name cannot be expressed in a text file",
            });
        }
        out.push_str(name);
        out.push('=');
        out.push_str(&escape(value));
        out.push('\n');
    }
    Ok(out)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape \\u{hex}"))?;
                out.push(decoded);
            }
            Some(other) => return Err(format!("invalid escape sequence \\{other}")),
            None => return Err("trailing backslash".to_string()),
        }
    }
    Ok(out)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let last = value.chars().count().saturating_sub(1);
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Edge whitespace would be trimmed away on read.
            ' ' if i == 0 || i == last => out.push_str("\\u0020"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
