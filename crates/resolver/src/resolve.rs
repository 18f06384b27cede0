//! Interpolation flattening.

use crate::span_map::{SourceRef, SpanEntry, SpanMap};
use embedql_types::{FileId, Occurrence, OffsetRange};
use embedql_host::{Declaration, DeclarationId, DeclarationShape, IdentifierRef, SymbolResolver};
use std::collections::HashSet;
use std::sync::Arc;

/// Why an interpolation site was left unexpanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleReason {
    /// The identifier did not resolve to any declaration.
    Unresolved,
    /// The declaration's initializer is not a recognized document shape.
    OpaqueShape,
    /// Expanding the reference would revisit a declaration already on the
    /// resolution path.
    Cycle,
}

/// An interpolation marker left in the resolved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hole {
    pub ident: Arc<str>,
    /// Marker range in the resolved text.
    pub range: OffsetRange,
    pub reason: HoleReason,
}

/// A fragment document merged out of line instead of spliced into the text.
///
/// The grammar supports out-of-line fragment definitions, so composition-list
/// references contribute their definitions directly rather than through text
/// expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFragment {
    /// The referencing identifier's name.
    pub ident: Arc<str>,
    /// The fragment's fully resolved text.
    pub text: Arc<str>,
    pub source: SourceRef,
}

/// The result of flattening an occurrence and everything it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// The occurrence this document was resolved from.
    pub occurrence: Occurrence,
    /// Combined text after all splices.
    pub text: Arc<str>,
    pub span_map: SpanMap,
    /// Out-of-line fragment documents, deduplicated by identifier.
    pub merged_fragments: Vec<MergedFragment>,
    /// Interpolation sites left unexpanded.
    pub holes: Vec<Hole>,
}

impl ResolvedDocument {
    /// Map a resolved-text offset back to an absolute offset in original
    /// source.
    ///
    /// Offsets inside a spliced region land inside the referenced
    /// occurrence's own span; offsets outside shift by the cumulative growth
    /// of earlier splices and then translate to file coordinates.
    #[must_use]
    pub fn map_offset(&self, resolved_offset: usize) -> (FileId, usize) {
        if let Some(entry) = self.span_map.entry_containing(resolved_offset) {
            if let Some(source) = entry.source {
                let relative = resolved_offset - entry.resolved.start;
                // Nested splices can grow the spliced text past the original
                // occurrence span; clamp rather than walk out of it.
                let offset = (source.span.start + relative).min(source.span.end);
                return (source.file, offset);
            }
        }
        let growth = self.span_map.growth_before(resolved_offset);
        let raw_offset = usize::try_from(resolved_offset as isize - growth).unwrap_or(0);
        let clamped = raw_offset.min(self.occurrence.raw_text.len());
        (self.occurrence.file, self.occurrence.span.start + clamped)
    }

    /// Map a resolved-text range back to original source. When the endpoints
    /// land in different files (a range straddling a splice boundary), the
    /// start wins and the range collapses to the start mapping.
    #[must_use]
    pub fn map_range(&self, resolved: OffsetRange) -> (FileId, OffsetRange) {
        let (start_file, start) = self.map_offset(resolved.start);
        let (end_file, end) = self.map_offset(resolved.end);
        if start_file == end_file && end >= start {
            (start_file, OffsetRange::new(start, end))
        } else {
            (start_file, OffsetRange::at(start))
        }
    }
}

/// Flatten `occurrence` and everything it transitively references into one
/// document.
///
/// Never fails: unresolvable or cyclic references become [`Hole`]s and the
/// best-effort text is returned. The caller is responsible for tolerating a
/// parse failure on the combined text.
pub fn resolve(occurrence: &Occurrence, symbols: &dyn SymbolResolver) -> ResolvedDocument {
    let mut visit = VisitState::default();
    // Seed with the occurrence's own declaration so a self-referential chain
    // terminates at the first revisit.
    if let Some(binding) = &occurrence.binding {
        let ident = IdentifierRef::new(occurrence.file, binding.clone());
        if let Some(decl) = symbols.resolve_declaration(&ident) {
            visit.path.insert(decl.id);
        }
    }
    resolve_inner(occurrence, symbols, &mut visit)
}

/// Declarations tracked during one resolution.
///
/// `path` holds the declarations currently being expanded, ancestor to
/// current; revisiting one is a genuine cycle. `expanded` holds every
/// declaration whose definition already made it into the document; revisiting
/// one of those is a diamond, and the marker is simply dropped.
#[derive(Default)]
struct VisitState {
    path: HashSet<DeclarationId>,
    expanded: HashSet<DeclarationId>,
}

fn resolve_inner(
    occurrence: &Occurrence,
    symbols: &dyn SymbolResolver,
    visit: &mut VisitState,
) -> ResolvedDocument {
    let mut text = occurrence.raw_text.to_string();
    let mut span_map = SpanMap::new();
    let mut merged_fragments: Vec<MergedFragment> = Vec::new();
    let mut holes = Vec::new();
    // Running growth so later marker ranges stay valid after earlier
    // splices. Sites are processed in source order; this ordering is
    // required, not incidental.
    let mut growth: isize = 0;

    for site in &occurrence.interpolations {
        let marker = shift_range(site.range, growth);
        let ident = IdentifierRef::new(occurrence.file, site.ident.clone());
        let Some(decl) = symbols.resolve_declaration(&ident) else {
            tracing::debug!(ident = %site.ident, "interpolation did not resolve, leaving hole");
            holes.push(Hole {
                ident: site.ident.clone(),
                range: marker,
                reason: HoleReason::Unresolved,
            });
            continue;
        };
        if visit.path.contains(&decl.id) {
            tracing::debug!(ident = %site.ident, "cyclic reference, leaving hole");
            holes.push(Hole {
                ident: site.ident.clone(),
                range: marker,
                reason: HoleReason::Cycle,
            });
            continue;
        }
        if visit.expanded.contains(&decl.id) {
            // Diamond: the definition is already in the document, so the
            // marker just goes away.
            text.replace_range(marker.start..marker.end, "");
            span_map.push(SpanEntry {
                ident: site.ident.clone(),
                original: marker,
                resolved: OffsetRange::at(marker.start),
                line_delta: 0,
                source: None,
                depth: 0,
            });
            growth -= marker.len() as isize;
            continue;
        }

        match &decl.shape {
            DeclarationShape::DirectDocument(nested) | DeclarationShape::WrappedDocument(nested) => {
                visit.expanded.insert(decl.id);
                visit.path.insert(decl.id);
                let nested_doc = resolve_inner(nested, symbols, visit);
                visit.path.remove(&decl.id);
                growth += splice(
                    &mut text,
                    &mut span_map,
                    &mut holes,
                    marker,
                    site.ident.clone(),
                    &nested_doc,
                );
                merge_fragments(&mut merged_fragments, nested_doc.merged_fragments);
            }
            DeclarationShape::FragmentList(idents) => {
                visit.expanded.insert(decl.id);
                // Out-of-line merge: remove the marker, keep the definitions.
                text.replace_range(marker.start..marker.end, "");
                span_map.push(SpanEntry {
                    ident: site.ident.clone(),
                    original: marker,
                    resolved: OffsetRange::at(marker.start),
                    line_delta: 0,
                    source: None,
                    depth: 0,
                });
                growth -= marker.len() as isize;
                for ident in idents {
                    collect_fragment(ident, symbols, visit, &mut merged_fragments);
                }
            }
            DeclarationShape::Opaque => {
                tracing::debug!(ident = %site.ident, "opaque declaration shape, leaving hole");
                holes.push(Hole {
                    ident: site.ident.clone(),
                    range: marker,
                    reason: HoleReason::OpaqueShape,
                });
            }
        }
    }

    ResolvedDocument {
        occurrence: occurrence.clone(),
        text: text.into(),
        span_map,
        merged_fragments,
        holes,
    }
}

/// Splice `nested` in place of `marker`, recording the span entry and
/// re-basing the nested document's own entries and holes. Returns the byte
/// growth of this splice.
fn splice(
    text: &mut String,
    span_map: &mut SpanMap,
    holes: &mut Vec<Hole>,
    marker: OffsetRange,
    ident: Arc<str>,
    nested: &ResolvedDocument,
) -> isize {
    text.replace_range(marker.start..marker.end, &nested.text);
    let resolved = OffsetRange::new(marker.start, marker.start + nested.text.len());
    let line_delta = nested.text.matches('\n').count() as u32;

    span_map.push(SpanEntry {
        ident,
        original: marker,
        resolved,
        line_delta,
        source: Some(SourceRef {
            file: nested.occurrence.file,
            span: nested.occurrence.span,
        }),
        depth: 0,
    });
    for entry in &nested.span_map {
        span_map.push(SpanEntry {
            ident: entry.ident.clone(),
            original: entry.original,
            resolved: entry.resolved.shifted_right(marker.start),
            line_delta: entry.line_delta,
            source: entry.source,
            depth: entry.depth + 1,
        });
    }
    for hole in &nested.holes {
        holes.push(Hole {
            ident: hole.ident.clone(),
            range: hole.range.shifted_right(marker.start),
            reason: hole.reason,
        });
    }

    nested.text.len() as isize - marker.len() as isize
}

/// Resolve one composition-list member to its fragment document.
fn collect_fragment(
    ident: &IdentifierRef,
    symbols: &dyn SymbolResolver,
    visit: &mut VisitState,
    merged: &mut Vec<MergedFragment>,
) {
    let Some(decl) = symbols.resolve_declaration(ident) else {
        return;
    };
    if visit.path.contains(&decl.id) || !visit.expanded.insert(decl.id) {
        return;
    }
    match fragment_occurrence(&decl) {
        Some(nested) => {
            visit.path.insert(decl.id);
            let nested_doc = resolve_inner(&nested, symbols, visit);
            visit.path.remove(&decl.id);
            let mut fragments = vec![MergedFragment {
                ident: decl.name.clone(),
                text: nested_doc.text,
                source: SourceRef {
                    file: nested_doc.occurrence.file,
                    span: nested_doc.occurrence.span,
                },
            }];
            fragments.extend(nested_doc.merged_fragments);
            merge_fragments(merged, fragments);
        }
        None => {
            if let DeclarationShape::FragmentList(idents) = &decl.shape {
                for inner in idents {
                    collect_fragment(inner, symbols, visit, merged);
                }
            }
        }
    }
}

fn fragment_occurrence(decl: &Declaration) -> Option<Occurrence> {
    match &decl.shape {
        DeclarationShape::DirectDocument(occ) | DeclarationShape::WrappedDocument(occ) => {
            Some(occ.clone())
        }
        _ => None,
    }
}

/// Append fragments not already present, keyed by identifier.
fn merge_fragments(into: &mut Vec<MergedFragment>, from: Vec<MergedFragment>) {
    for fragment in from {
        if !into.iter().any(|existing| existing.ident == fragment.ident) {
            into.push(fragment);
        }
    }
}

fn shift_range(range: OffsetRange, growth: isize) -> OffsetRange {
    let start = usize::try_from(range.start as isize + growth).unwrap_or(0);
    let end = usize::try_from(range.end as isize + growth).unwrap_or(0);
    OffsetRange::new(start, end)
}
