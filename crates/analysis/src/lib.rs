//! # Diagnostics assembly
//!
//! The top of the analysis stack: takes one embedded-document occurrence at a
//! time, runs it through resolution, schema validation, and the structural
//! checks (missing operation name, uncolocated fragments, unused fields), and
//! produces position-correct [`DiagnosticRecord`]s in original source
//! coordinates.
//!
//! The assembler is fail-soft end to end. A document whose resolved text does
//! not parse is skipped rather than reported (the host tooling surfaces raw
//! syntax errors itself), an empty schema slot suppresses schema-dependent
//! diagnostics without blocking the structural checks, and a failure on one
//! occurrence never affects its siblings.
//!
//! [`DiagnosticRecord`]: embedql_types::DiagnosticRecord

mod assembler;
mod cache;
mod checks;
mod schema;
mod validate;

pub use assembler::{AnalysisState, Assembler, UsageContext};
pub use schema::{SchemaRef, SchemaSnapshot};
