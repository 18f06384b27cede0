//! Offset to line/column translation.

use crate::{OffsetRange, Position, Range};

/// Precomputed line-start table for a piece of source text.
///
/// Validator collaborators report positions as line/column pairs while the
/// span-mapping machinery works in byte offsets; this is the bridge between
/// the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line (line 0 starts at 0).
    line_starts: Vec<usize>,
    /// Total length of the indexed text in bytes.
    len: usize,
}

impl LineIndex {
    /// Build a line index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the indexed text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate a byte offset into a (line, column) pair, both 0-indexed.
    ///
    /// Offsets past the end of the text clamp to the final position.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insertion) => insertion - 1,
        };
        (line, offset - self.line_starts[line])
    }

    /// Translate a (line, column) pair (0-indexed) into a byte offset.
    ///
    /// Out-of-range lines clamp to the end of the text.
    #[must_use]
    pub fn offset(&self, line: usize, col: usize) -> usize {
        match self.line_starts.get(line) {
            Some(start) => (start + col).min(self.len),
            None => self.len,
        }
    }

    /// Translate a byte offset into a [`Position`].
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let (line, col) = self.line_col(offset);
        Position::new(line as u32, col as u32)
    }

    /// Translate an [`OffsetRange`] into a line/column [`Range`].
    #[must_use]
    pub fn range(&self, range: OffsetRange) -> Range {
        Range::new(self.position(range.start), self.position(range.end))
    }
}
