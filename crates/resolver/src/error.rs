//! Resolver error types.
//!
//! Resolution itself is infallible by design; the only error this layer can
//! report is the combined text failing to parse under the embedded grammar.

/// The resolved text is not a well-formed document.
///
/// Callers skip diagnostics for the affected occurrence; a parse failure
/// never aborts the wider analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("resolved document failed to parse: {message} (at offset {offset})")]
pub struct ParseFailure {
    /// First parse error reported by the grammar.
    pub message: String,
    /// Byte offset of the error in the resolved text.
    pub offset: usize,
}
