//! Schema-provider capability interface.

use std::sync::Arc;

/// Source of the current schema text, supplied by the host tooling.
///
/// The provider owns acquisition (file loading, introspection fetch, watch
/// reload); the analysis layer only observes snapshots. `version` is a
/// monotonic counter bumped on every reload, so readers can detect staleness
/// without comparing schema contents.
pub trait SchemaSource {
    /// Latest schema document text, or `None` while no schema has loaded.
    fn current(&self) -> Option<Arc<str>>;

    /// Monotonic reload counter.
    fn version(&self) -> u64;
}
