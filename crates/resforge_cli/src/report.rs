//! Rendering of the run result and diagnostics.

use resforge_build::RunResult;
use resforge_diagnostics::{Diagnostic, DiagnosticRenderer, TerminalRenderer};
use serde::Serialize;

use crate::{GlobalArgs, ReportFormat};

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a RunResult,
    diagnostics: &'a [Diagnostic],
}

/// Prints the report in the requested format.
///
/// Text goes to stderr (diagnostics) and stdout (file lists); JSON goes to
/// stdout as one document.
pub fn emit(result: &RunResult, diagnostics: &[Diagnostic], format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprint!("{}", renderer.render(diag));
            }
            if !global.quiet {
                print!("{}", summary(result));
            }
            if !result.success {
                let errors = diagnostics.iter().filter(|d| d.severity.is_error()).count();
                eprintln!("error: build failed with {errors} error(s)");
            }
        }
        ReportFormat::Json => println!("{}", to_json(result, diagnostics)),
    }
}

/// Plain-text listing of the run's outputs.
pub fn summary(result: &RunResult) -> String {
    let mut out = String::new();
    if !result.output_resources.is_empty() {
        out.push_str("Output resources:\n");
        for item in &result.output_resources {
            out.push_str(&format!("  {item}\n"));
        }
    }
    if !result.files_written.is_empty() {
        out.push_str("Files written:\n");
        for path in &result.files_written {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    if let (Some(file), Some(class)) = (
        &result.strongly_typed_file_name,
        &result.strongly_typed_class_name,
    ) {
        out.push_str(&format!("Accessor: {} (class {class})\n", file.display()));
    }
    out
}

/// The JSON report document.
pub fn to_json(result: &RunResult, diagnostics: &[Diagnostic]) -> String {
    serde_json::to_string_pretty(&JsonReport {
        result,
        diagnostics,
    })
    .unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resforge_build::codes;
    use resforge_common::TaskItem;
    use std::path::PathBuf;

    fn sample() -> RunResult {
        RunResult {
            output_resources: vec![TaskItem::new("obj/A.resources").with_metadata("Locale", "en-GB")],
            files_written: vec![PathBuf::from("obj/A.resources"), PathBuf::from("obj/state")],
            strongly_typed_file_name: Some(PathBuf::from("obj/A.cs")),
            strongly_typed_class_name: Some("A".into()),
            success: false,
        }
    }

    #[test]
    fn summary_lists_outputs_then_files() {
        let text = summary(&sample());
        assert_eq!(
            text,
            "Output resources:\n  obj/A.resources\nFiles written:\n  obj/A.resources\n  obj/state\nAccessor: obj/A.cs (class A)\n"
        );
    }

    #[test]
    fn empty_result_prints_nothing() {
        assert!(summary(&RunResult::default()).is_empty());
    }

    #[test]
    fn json_has_result_fields_and_diagnostics() {
        let diag = Diagnostic::error(codes::CONVERSION_FAILED, "bad line").with_path("B.resx");
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample(), &[diag])).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["output_resources"][0]["path"], "obj/A.resources");
        assert_eq!(json["output_resources"][0]["metadata"]["Locale"], "en-GB");
        assert_eq!(json["files_written"][1], "obj/state");
        assert_eq!(json["strongly_typed_class_name"], "A");
        assert_eq!(json["diagnostics"][0]["message"], "bad line");
    }
}
