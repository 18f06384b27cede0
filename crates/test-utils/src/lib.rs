//! Test utilities for the embedql stack.
//!
//! The centerpiece is [`FakeWorkspace`]: an in-memory host program that
//! implements [`SymbolResolver`] over hand-built [`HostTree`]s, so resolver
//! and usage tests can describe a program without a real host frontend.

mod assertions;
mod workspace;

pub use assertions::{format_diagnostics, format_messages};
pub use workspace::FakeWorkspace;

use embedql_types::{FileId, InterpolationSite, Occurrence, OffsetRange};

/// Build an occurrence from raw text, deriving interpolation sites from
/// `${Name}` markers in the text.
///
/// The occurrence's file span starts at `span_start`, as if the literal
/// appeared at that offset in its file.
#[must_use]
pub fn occurrence(file: FileId, span_start: usize, raw_text: &str) -> Occurrence {
    let mut sites = Vec::new();
    let bytes = raw_text.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'{' {
            if let Some(close) = raw_text[i..].find('}') {
                let ident = &raw_text[i + 2..i + close];
                sites.push(InterpolationSite::new(
                    ident,
                    OffsetRange::new(i, i + close + 1),
                ));
                i += close + 1;
                continue;
            }
        }
        i += 1;
    }
    Occurrence::plain(
        file,
        OffsetRange::new(span_start, span_start + raw_text.len()),
        raw_text,
    )
    .with_interpolations(sites)
}
