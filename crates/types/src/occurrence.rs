//! Embedded-document occurrences.

use crate::{FileId, OffsetRange};
use std::sync::Arc;

/// One interpolation site inside an occurrence's raw text.
///
/// The range covers the whole interpolation marker (including its delimiters)
/// and is relative to [`Occurrence::raw_text`]. Sites are kept in source
/// order; the resolver depends on that ordering when splicing left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationSite {
    /// The referenced identifier.
    pub ident: Arc<str>,
    /// Marker range, relative to the occurrence's raw text.
    pub range: OffsetRange,
}

impl InterpolationSite {
    /// Create a new interpolation site.
    #[must_use]
    pub fn new(ident: impl Into<Arc<str>>, range: OffsetRange) -> Self {
        Self {
            ident: ident.into(),
            range,
        }
    }
}

/// A located embedded-document literal found in host source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// File the literal appears in.
    pub file: FileId,
    /// Absolute byte span of the literal's content in the file.
    pub span: OffsetRange,
    /// The literal's text, before any interpolation expansion.
    pub raw_text: Arc<str>,
    /// Name of the enclosing binding, if the literal is assigned to one.
    pub binding: Option<Arc<str>>,
    /// Interpolation sites in source order.
    pub interpolations: Vec<InterpolationSite>,
}

impl Occurrence {
    /// Create an occurrence with no interpolation sites.
    #[must_use]
    pub fn plain(file: FileId, span: OffsetRange, raw_text: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            span,
            raw_text: raw_text.into(),
            binding: None,
            interpolations: Vec::new(),
        }
    }

    /// Attach the enclosing binding name.
    #[must_use]
    pub fn with_binding(mut self, name: impl Into<Arc<str>>) -> Self {
        self.binding = Some(name.into());
        self
    }

    /// Attach interpolation sites (must already be in source order).
    #[must_use]
    pub fn with_interpolations(mut self, sites: Vec<InterpolationSite>) -> Self {
        self.interpolations = sites;
        self
    }
}
