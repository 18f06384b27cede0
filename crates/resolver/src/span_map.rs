//! Position-translation table between resolved-document coordinates and
//! original source coordinates.

use embedql_types::{FileId, OffsetRange};
use std::sync::Arc;

/// Where a spliced piece of text came from in the original program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    /// File the referenced occurrence lives in.
    pub file: FileId,
    /// Absolute byte span of the referenced occurrence's content.
    pub span: OffsetRange,
}

/// One splice performed during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEntry {
    /// The interpolated identifier.
    pub ident: Arc<str>,
    /// The interpolation marker's byte range in the text as it stood just
    /// before this splice (earlier splices already applied).
    pub original: OffsetRange,
    /// The byte range the spliced text occupies in the resolved text.
    pub resolved: OffsetRange,
    /// Line count of the spliced text minus one; shifts line-based positions
    /// that follow the splice point.
    pub line_delta: u32,
    /// Source of the spliced text. `None` for markers that were removed
    /// without splicing (composition-list references merged out of line).
    pub source: Option<SourceRef>,
    /// Splice nesting depth. Zero for splices performed directly on the
    /// occurrence's own text; entries carried up from nested resolutions are
    /// re-based into outer coordinates with their depth incremented.
    pub depth: u32,
}

impl SpanEntry {
    /// Net byte growth introduced by this splice. Negative when a marker was
    /// removed without replacement text.
    #[must_use]
    pub fn delta(&self) -> isize {
        self.resolved.len() as isize - self.original.len() as isize
    }
}

/// Ordered list of [`SpanEntry`]s, one per interpolation site that was
/// expanded or removed. Splices are recorded left to right, so an entry's
/// ranges already account for all earlier splices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanMap {
    entries: Vec<SpanEntry>,
}

impl SpanMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: SpanEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpanEntry> {
        self.entries.iter()
    }

    /// The innermost splice whose resolved range contains `offset`.
    ///
    /// Entries from nested resolutions are re-based into the outer resolved
    /// coordinates with a greater depth, so the deepest match wins.
    #[must_use]
    pub fn entry_containing(&self, offset: usize) -> Option<&SpanEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.source.is_some() && entry.resolved.contains(offset))
            .max_by_key(|entry| entry.depth)
    }

    /// Cumulative byte growth from all top-level splices that end at or
    /// before `offset` in the resolved text.
    ///
    /// Nested entries are excluded: their growth is already part of the
    /// enclosing top-level splice's delta. Subtracting this from a resolved
    /// offset outside any spliced region yields the corresponding offset in
    /// the occurrence's raw text.
    #[must_use]
    pub fn growth_before(&self, offset: usize) -> isize {
        self.entries
            .iter()
            .filter(|entry| entry.depth == 0 && entry.resolved.end <= offset)
            .map(SpanEntry::delta)
            .sum()
    }
}

impl<'a> IntoIterator for &'a SpanMap {
    type Item = &'a SpanEntry;
    type IntoIter = std::slice::Iter<'a, SpanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(original: OffsetRange, resolved: OffsetRange, source: Option<SourceRef>) -> SpanEntry {
        SpanEntry {
            ident: "frag".into(),
            original,
            resolved,
            line_delta: 0,
            source,
            depth: 0,
        }
    }

    #[test]
    fn growth_accumulates_in_order() {
        let mut map = SpanMap::new();
        // Marker of 8 bytes replaced by 20 bytes of text: +12
        let src = SourceRef {
            file: FileId::new(1),
            span: OffsetRange::new(100, 120),
        };
        map.push(entry(OffsetRange::new(10, 18), OffsetRange::new(10, 30), Some(src)));
        // Marker of 8 bytes removed entirely: -8
        map.push(entry(OffsetRange::new(40, 48), OffsetRange::at(40), None));

        assert_eq!(map.growth_before(5), 0);
        assert_eq!(map.growth_before(30), 12);
        assert_eq!(map.growth_before(50), 4);
    }

    #[test]
    fn entry_containing_skips_removed_markers() {
        let mut map = SpanMap::new();
        map.push(entry(OffsetRange::new(10, 18), OffsetRange::at(10), None));
        assert!(map.entry_containing(10).is_none());

        let src = SourceRef {
            file: FileId::new(1),
            span: OffsetRange::new(0, 20),
        };
        map.push(entry(OffsetRange::new(20, 28), OffsetRange::new(12, 32), Some(src)));
        let found = map.entry_containing(15).map(|e| e.resolved);
        assert_eq!(found, Some(OffsetRange::new(12, 32)));
    }
}
