//! Fingerprint-keyed diagnostics cache.

use embedql_resolver::ResolvedDocument;
use embedql_types::DiagnosticRecord;
use lru::LruCache;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Fingerprint over everything that determines an occurrence's diagnostics:
/// the effective document text, its merged fragments, and the schema version.
pub(crate) fn fingerprint(resolved: &ResolvedDocument, schema_version: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    resolved.text.hash(&mut hasher);
    for fragment in &resolved.merged_fragments {
        fragment.ident.hash(&mut hasher);
        fragment.text.hash(&mut hasher);
    }
    schema_version.hash(&mut hasher);
    hasher.finish()
}

struct CacheEntry {
    records: Arc<Vec<DiagnosticRecord>>,
    inserted: Instant,
}

/// Bounded LRU of diagnostic sets with a TTL ceiling.
///
/// An unchanged fingerprint within the TTL returns the identical `Arc`, so
/// repeated requests for an unedited occurrence are allocation-free.
pub(crate) struct DiagnosticsCache {
    entries: Mutex<LruCache<u64, CacheEntry>>,
    ttl: Duration,
}

impl DiagnosticsCache {
    pub(crate) fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub(crate) fn get(&self, fingerprint: u64) -> Option<Arc<Vec<DiagnosticRecord>>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(&fingerprint) {
            if entry.inserted.elapsed() < self.ttl {
                return Some(Arc::clone(&entry.records));
            }
            entries.pop(&fingerprint);
        }
        None
    }

    pub(crate) fn insert(&self, fingerprint: u64, records: Arc<Vec<DiagnosticRecord>>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.put(
            fingerprint,
            CacheEntry {
                records,
                inserted: Instant::now(),
            },
        );
    }
}
