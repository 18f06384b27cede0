//! The diagnostics assembler.

use crate::cache::{fingerprint, DiagnosticsCache};
use crate::checks;
use crate::schema::SchemaRef;
use crate::validate;
use embedql_config::EmbedqlConfig;
use embedql_host::SymbolResolver;
use embedql_resolver::{field_paths, resolve, FieldPathTable, ResolvedDocument};
use embedql_types::{DiagnosticRecord, FileId, Occurrence};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub use crate::checks::UsageContext;

/// Analysis progress for one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    /// Never seen, or edited since last seen.
    Unanalyzed,
    /// Resolution succeeded; checks have not run yet.
    Resolved,
    /// The resolved text did not parse. Terminal until the literal is edited.
    ResolveFailed,
    /// Diagnostics are current for the schema version they were built with.
    Validated,
    /// Validated against an older schema version; the next `diagnose` call
    /// revalidates reusing the stored resolution.
    Stale,
}

struct OccurrenceEntry {
    occurrence: Occurrence,
    resolved: ResolvedDocument,
    table: Option<FieldPathTable>,
    state: AnalysisState,
    schema_version: u64,
}

/// Runs the full diagnostic pipeline for embedded-document occurrences, one
/// at a time: resolve, parse-gate, validate against the current schema
/// snapshot, run the structural checks, and merge everything into a single
/// position-sorted record set.
///
/// Results are cached by content fingerprint; an unchanged occurrence under
/// an unchanged schema returns the identical `Arc` without re-running any
/// check. Editing the literal invalidates its entry; bumping the schema only
/// revalidates, reusing the stored resolution.
pub struct Assembler {
    schema: Arc<SchemaRef>,
    cache: DiagnosticsCache,
    client_directives: Vec<Arc<str>>,
    entries: HashMap<(FileId, usize), OccurrenceEntry>,
}

impl Assembler {
    #[must_use]
    pub fn new(schema: Arc<SchemaRef>, config: &EmbedqlConfig) -> Self {
        Self {
            schema,
            cache: DiagnosticsCache::new(
                config.cache.capacity,
                Duration::from_secs(config.cache.ttl_secs),
            ),
            client_directives: config
                .client_directives
                .iter()
                .map(|name| Arc::from(name.as_str()))
                .collect(),
            entries: HashMap::new(),
        }
    }

    /// The schema slot this assembler validates against.
    #[must_use]
    pub fn schema(&self) -> &Arc<SchemaRef> {
        &self.schema
    }

    /// Current analysis state of `occurrence`. Staleness is derived: a
    /// validated entry whose schema version lags the slot reports [`Stale`].
    ///
    /// [`Stale`]: AnalysisState::Stale
    #[must_use]
    pub fn state(&self, occurrence: &Occurrence) -> AnalysisState {
        match self.entries.get(&key(occurrence)) {
            None => AnalysisState::Unanalyzed,
            Some(entry) if entry.occurrence != *occurrence => AnalysisState::Unanalyzed,
            Some(entry) => {
                if entry.state == AnalysisState::Validated
                    && entry.schema_version != self.schema.version()
                {
                    AnalysisState::Stale
                } else {
                    entry.state
                }
            }
        }
    }

    /// Produce the diagnostics for one occurrence.
    ///
    /// `usage` supplies the host-program context for the unused-field check;
    /// without it, only the schema and structural checks run. Never panics
    /// and never fails: occurrences that cannot be analyzed yield an empty
    /// record set.
    #[tracing::instrument(skip_all, fields(file = occurrence.file.as_u32(), span = %occurrence.span))]
    pub fn diagnose(
        &mut self,
        occurrence: &Occurrence,
        symbols: &dyn SymbolResolver,
        usage: Option<&UsageContext<'_>>,
    ) -> Arc<Vec<DiagnosticRecord>> {
        let key = key(occurrence);
        let schema_version = self.schema.version();

        let reusable = self
            .entries
            .get(&key)
            .is_some_and(|entry| entry.occurrence == *occurrence);
        if !reusable {
            let resolved = resolve(occurrence, symbols);
            let (table, state) = match field_paths(&resolved) {
                Ok(table) => (Some(table), AnalysisState::Resolved),
                Err(failure) => {
                    tracing::debug!(
                        message = %failure.message,
                        offset = failure.offset,
                        "resolved text does not parse, skipping occurrence"
                    );
                    (None, AnalysisState::ResolveFailed)
                }
            };
            self.entries.insert(
                key,
                OccurrenceEntry {
                    occurrence: occurrence.clone(),
                    resolved,
                    table,
                    state,
                    schema_version,
                },
            );
        }

        let outcome = {
            let Some(entry) = self.entries.get(&key) else {
                return Arc::new(Vec::new());
            };
            let Some(table) = &entry.table else {
                return Arc::new(Vec::new());
            };
            let resolved = &entry.resolved;

            let print = fingerprint(resolved, schema_version);
            if let Some(cached) = self.cache.get(print) {
                tracing::debug!(fingerprint = print, "diagnostics cache hit");
                (print, cached, true)
            } else {
                let mut records = Vec::new();
                match self.schema.current() {
                    Some(snapshot) => records.extend(validate::schema_diagnostics(
                        resolved,
                        &snapshot,
                        &self.client_directives,
                    )),
                    None => {
                        tracing::debug!("no schema published, skipping schema validation");
                    }
                }
                if let Some(record) = checks::missing_operation_name(resolved, table) {
                    records.push(record);
                }
                records.extend(checks::uncolocated_fragments(resolved));
                if let Some(context) = usage {
                    records.extend(checks::unused_field_diagnostics(
                        resolved, table, context, symbols,
                    ));
                }
                merge(&mut records);
                (print, Arc::new(records), false)
            }
        };

        let (print, records, from_cache) = outcome;
        if !from_cache {
            self.cache.insert(print, Arc::clone(&records));
        }
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.state = AnalysisState::Validated;
            entry.schema_version = schema_version;
        }
        records
    }

    /// Diagnose a batch of occurrences. Each occurrence is processed in
    /// isolation; one bad literal never suppresses the others. Usage checking
    /// needs per-occurrence host context, so batch results carry only the
    /// schema and structural checks.
    pub fn diagnose_all<'a, I>(
        &mut self,
        occurrences: I,
        symbols: &dyn SymbolResolver,
    ) -> Vec<Arc<Vec<DiagnosticRecord>>>
    where
        I: IntoIterator<Item = &'a Occurrence>,
    {
        occurrences
            .into_iter()
            .map(|occurrence| self.diagnose(occurrence, symbols, None))
            .collect()
    }
}

/// Sort by position and drop exact duplicates produced by overlapping
/// checks.
fn merge(records: &mut Vec<DiagnosticRecord>) {
    records.sort_by(|a, b| {
        (a.file, a.range.start, a.range.end, a.code.as_str(), &a.message).cmp(&(
            b.file,
            b.range.start,
            b.range.end,
            b.code.as_str(),
            &b.message,
        ))
    });
    records.dedup();
}

fn key(occurrence: &Occurrence) -> (FileId, usize) {
    (occurrence.file, occurrence.span.start)
}
