//! Human-readable rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// Produces output like:
/// ```text
/// error[R001]: line 3: missing '=' in name/value pair
///   --> Strings.txt
///    = note: source skipped; other sources were still processed
///    = help: write entries as `name = value`
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, severity: Severity, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let ansi = match severity {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
            Severity::Note => "\x1b[1;36m",
        };
        format!("{ansi}{text}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity, &header),
            diag.message
        ));

        if let Some(path) = &diag.path {
            out.push_str(&format!("  --> {}\n", path.display()));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn render_error_with_path() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Resource, 1), "bad line")
            .with_path("res/Strings.txt");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.starts_with("error[R001]: bad line\n"));
        assert!(output.contains("--> res/Strings.txt"));
    }

    #[test]
    fn render_warning_with_notes() {
        let diag = Diagnostic::warning(DiagnosticCode::new(Category::State, 1), "state unreadable")
            .with_note("every source will be rebuilt")
            .with_help("delete the state file");
        let output = TerminalRenderer::new(false).render(&diag);
        assert!(output.contains("warning[S001]: state unreadable"));
        assert!(output.contains("= note: every source will be rebuilt"));
        assert!(output.contains("= help: delete the state file"));
        assert!(!output.contains("-->"));
    }

    #[test]
    fn color_wraps_header_only() {
        let diag = Diagnostic::error(DiagnosticCode::new(Category::Config, 5), "duplicate output");
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.starts_with("\x1b[1;31merror[C005]\x1b[0m: duplicate output"));
    }
}
