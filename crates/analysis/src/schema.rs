//! Shared schema snapshot slot.

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use embedql_host::SchemaSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// One parsed schema, frozen at a version.
///
/// An SDL with validation errors still yields a snapshot over the partial
/// schema; document validation stays best-effort rather than going dark while
/// the schema is being edited.
pub struct SchemaSnapshot {
    pub(crate) schema: Valid<Schema>,
    pub version: u64,
}

impl SchemaSnapshot {
    fn parse(sdl: &str, version: u64) -> Self {
        let schema = match Schema::parse_and_validate(sdl, "schema.graphql") {
            Ok(valid) => valid,
            Err(with_errors) => {
                tracing::debug!(errors = %with_errors.errors, "schema has errors, using partial schema");
                Valid::assume_valid(with_errors.partial)
            }
        };
        Self { schema, version }
    }
}

/// Shared slot holding the current [`SchemaSnapshot`].
///
/// `publish` swaps the snapshot wholesale and bumps a monotonic version;
/// readers either see a complete snapshot or none at all, never a partially
/// updated one. An empty slot means the schema provider has nothing yet and
/// all schema-dependent diagnostics are suppressed.
#[derive(Default)]
pub struct SchemaRef {
    slot: RwLock<Option<Arc<SchemaSnapshot>>>,
    version: AtomicU64,
}

impl SchemaRef {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `sdl` and publish it as the current snapshot. Returns the new
    /// version.
    pub fn publish(&self, sdl: &str) -> u64 {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(SchemaSnapshot::parse(sdl, version));
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(snapshot);
        tracing::debug!(version, "schema snapshot published");
        version
    }

    /// Pull the latest text from a [`SchemaSource`] and publish it, or empty
    /// the slot when the source has nothing. Returns the new version when a
    /// snapshot was published.
    pub fn refresh(&self, source: &dyn SchemaSource) -> Option<u64> {
        match source.current() {
            Some(sdl) => Some(self.publish(&sdl)),
            None => {
                self.clear();
                None
            }
        }
    }

    /// Empty the slot; subsequent readers observe provider-unavailable.
    pub fn clear(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// The current snapshot, if one has been published.
    #[must_use]
    pub fn current(&self) -> Option<Arc<SchemaSnapshot>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The version of the most recently published snapshot; zero before the
    /// first publish.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}
