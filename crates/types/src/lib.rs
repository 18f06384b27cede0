//! Foundation types for embedded-GraphQL analysis.
//!
//! This crate provides shared types used across the embedql stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **File types**: [`FileId`], [`FileUri`]
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`], [`LineIndex`]
//! - **Diagnostic types**: [`DiagnosticSeverity`], [`DiagnosticCode`], [`DiagnosticRecord`]
//! - **Occurrence types**: [`Occurrence`], [`InterpolationSite`]

mod diagnostic;
mod file;
mod line_index;
mod occurrence;
mod position;

pub use diagnostic::{DiagnosticCode, DiagnosticRecord, DiagnosticSeverity};
pub use file::{FileId, FileUri};
pub use line_index::LineIndex;
pub use occurrence::{InterpolationSite, Occurrence};
pub use position::{OffsetRange, Position, Range};
