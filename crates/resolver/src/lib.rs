//! # Document resolution
//!
//! Turns one embedded-document occurrence, plus everything it transitively
//! references through interpolation or composition lists, into a single
//! flattened document text with a bidirectional position mapping back to
//! every fragment's original source location.
//!
//! Resolution is deliberately fail-soft: an interpolation that cannot be
//! resolved to a literal-producing declaration is left in place as a hole,
//! and the caller decides what to do when the combined text does not parse.
//! Resolution itself never errors and never panics.
//!
//! ```rust,ignore
//! let resolved = resolve(&occurrence, &symbols);
//! let table = field_paths(&resolved)?;
//! ```

mod digest;
mod error;
mod field_paths;
mod resolve;
mod span_map;

pub use digest::{derived_operation_name, document_digest};
pub use error::ParseFailure;
pub use field_paths::{field_paths, FieldPath, FieldPathTable, OperationKind};
pub use resolve::{resolve, Hole, HoleReason, MergedFragment, ResolvedDocument};
pub use span_map::{SourceRef, SpanEntry, SpanMap};
