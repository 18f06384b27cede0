//! Assertion helpers for diagnostics.

use embedql_types::DiagnosticRecord;

/// Format diagnostics one per line for readable assertion failures.
#[must_use]
pub fn format_diagnostics(diagnostics: &[DiagnosticRecord]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }
    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                "[{}] {:?} {} {} {}",
                i + 1,
                d.severity,
                d.code,
                d.range,
                d.message
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format just the messages, for tests that do not care about positions.
#[must_use]
pub fn format_messages(diagnostics: &[DiagnosticRecord]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }
    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {}", i + 1, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}
