//! # Field usage analysis
//!
//! Given the full set of field paths of a resolved document and the program
//! binding that receives the query's result, determines which paths the
//! surrounding program actually reads.
//!
//! This is a guarded fixed-point walk over the read-graph rooted at the
//! binding, not a dataflow framework: it only follows syntactic patterns
//! known to preserve field-path identity (destructuring, literal-key access,
//! array-transform callbacks, reassignment, guard unwrapping) and bails to a
//! safe over-approximation when a value escapes the analysis scope. Missing
//! a usage is the failure mode to avoid; over-reporting usage is acceptable.

mod unused;
mod walk;

pub use unused::{unused_leaves, UnusedGroup};

use embedql_host::{DeclarationId, HostTree, SymbolResolver};
use embedql_resolver::FieldPathTable;
use embedql_types::FileId;
use std::sync::Arc;

/// The program binding a query's result flows through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: Arc<str>,
    pub file: FileId,
    pub declaration: DeclarationId,
}

/// One concrete read observed while tracing a binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccessPath {
    pub path: Arc<str>,
}

/// Result of tracing one binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageReport {
    access_paths: Vec<AccessPath>,
    /// Whether the escape rule fired anywhere during the walk.
    pub bailed: bool,
}

impl UsageReport {
    /// All observed access paths, sorted and deduplicated.
    #[must_use]
    pub fn access_paths(&self) -> &[AccessPath] {
        &self.access_paths
    }

    /// Whether `path` was observed as read (directly or via a bail-out).
    #[must_use]
    pub fn is_used(&self, path: &str) -> bool {
        self.access_paths
            .binary_search_by(|a| a.path.as_ref().cmp(path))
            .is_ok()
    }
}

/// Trace `binding` through the host program and report which of the known
/// field paths it reads.
///
/// Callers are expected to skip documents with mutation- or
/// subscription-shaped roots before calling; "unused" has no meaning for
/// side-effecting operations.
#[must_use]
pub fn compute_usage(
    table: &FieldPathTable,
    binding: &Binding,
    tree: &HostTree,
    symbols: &dyn SymbolResolver,
) -> UsageReport {
    let mut walker = walk::Walker::new(table, tree, symbols, binding.file);
    walker.run(binding.declaration);
    let (used, bailed) = walker.finish();

    let access_paths = used.into_iter().map(|path| AccessPath { path }).collect();
    UsageReport {
        access_paths,
        bailed,
    }
}
