//! Well-known diagnostic codes emitted by the build task.

use resforge_diagnostics::{Category, DiagnosticCode};

/// `C001`: explicit outputs do not pair one-to-one with sources.
pub const LENGTH_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Config, 1);
/// `C002`: an accessor setting was given without a language.
pub const STR_WITHOUT_LANGUAGE: DiagnosticCode = DiagnosticCode::new(Category::Config, 2);
/// `C003`: an accessor was requested for more than one source.
pub const STR_MULTIPLE_SOURCES: DiagnosticCode = DiagnosticCode::new(Category::Config, 3);
/// `C004`: an output path cannot exist on a filesystem.
pub const INVALID_OUTPUT_PATH: DiagnosticCode = DiagnosticCode::new(Category::Config, 4);
/// `C005`: two sources resolve to the same output.
pub const DUPLICATE_OUTPUT: DiagnosticCode = DiagnosticCode::new(Category::Config, 5);
/// `C006`: an output resolves onto a source.
pub const OUTPUT_IS_SOURCE: DiagnosticCode = DiagnosticCode::new(Category::Config, 6);

/// `R001`: a source could not be converted.
pub const CONVERSION_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Resource, 1);
/// `R002`: the converter did not finish in time.
pub const CONVERSION_TIMEOUT: DiagnosticCode = DiagnosticCode::new(Category::Resource, 2);
/// `R003`: the converter succeeded with a warning.
pub const CONVERSION_WARNING: DiagnosticCode = DiagnosticCode::new(Category::Resource, 3);

/// `A001`: the accessor file could not be generated.
pub const ACCESSOR_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Accessor, 1);

/// `S001`: the state file could not be read; everything is rebuilt.
pub const STATE_UNREADABLE: DiagnosticCode = DiagnosticCode::new(Category::State, 1);
/// `S002`: the state file could not be written.
pub const STATE_UNWRITABLE: DiagnosticCode = DiagnosticCode::new(Category::State, 2);

/// `I001`: there was nothing to convert.
pub const NO_SOURCES: DiagnosticCode = DiagnosticCode::new(Category::Input, 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render() {
        assert_eq!(LENGTH_MISMATCH.to_string(), "C001");
        assert_eq!(DUPLICATE_OUTPUT.to_string(), "C005");
        assert_eq!(CONVERSION_TIMEOUT.to_string(), "R002");
        assert_eq!(ACCESSOR_FAILED.to_string(), "A001");
        assert_eq!(STATE_UNWRITABLE.to_string(), "S002");
        assert_eq!(NO_SOURCES.to_string(), "I001");
    }
}
