//! Diagnostic types shared by the validation and usage layers.

use crate::{FileId, OffsetRange};
use std::sync::Arc;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Machine-readable diagnostic code.
///
/// Codes identify which check produced a record; messages carry the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The resolved document failed schema validation.
    SchemaValidation,
    /// The root operation has no explicit name.
    MissingOperationName,
    /// A leaf field is selected but never read by the surrounding program.
    UnusedField,
    /// An external fragment was merged in but never spread.
    UncolocatedFragment,
}

impl DiagnosticCode {
    /// Stable string form, suitable for host-tooling diagnostic codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchemaValidation => "schema-validation",
            Self::MissingOperationName => "missing-operation-name",
            Self::UnusedField => "unused-field",
            Self::UncolocatedFragment => "uncolocated-fragment",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic, located in original source coordinates.
///
/// Records are immutable after creation; the assembler shares them behind
/// `Arc` and the cache hands out the same allocation for repeated requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagnosticRecord {
    /// File the diagnostic belongs to.
    pub file: FileId,
    /// Absolute byte range in the original source file.
    pub range: OffsetRange,
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: Arc<str>,
}

impl DiagnosticRecord {
    /// Create an error-severity record.
    #[must_use]
    pub fn error(
        file: FileId,
        range: OffsetRange,
        code: DiagnosticCode,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            range,
            severity: DiagnosticSeverity::Error,
            code,
            message: message.into(),
        }
    }

    /// Create a warning-severity record.
    #[must_use]
    pub fn warning(
        file: FileId,
        range: OffsetRange,
        code: DiagnosticCode,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            file,
            range,
            severity: DiagnosticSeverity::Warning,
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        let file = FileId::new(0);
        let range = OffsetRange::new(0, 4);
        let err = DiagnosticRecord::error(file, range, DiagnosticCode::SchemaValidation, "bad");
        let warn = DiagnosticRecord::warning(file, range, DiagnosticCode::UnusedField, "unused");
        assert_eq!(err.severity, DiagnosticSeverity::Error);
        assert_eq!(warn.severity, DiagnosticSeverity::Warning);
        assert_eq!(warn.code.as_str(), "unused-field");
    }
}
