//! Position and range types for source locations.

/// Byte offset range in a source text.
///
/// Used internally for text manipulation and span mapping. Byte offsets are
/// converted to line/column [`Position`]s only at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range contains a byte offset.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Shift both endpoints right by `delta` bytes.
    #[must_use]
    pub const fn shifted_right(&self, delta: usize) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Shift both endpoints left by `delta` bytes, saturating at zero.
    #[must_use]
    pub const fn shifted_left(&self, delta: usize) -> Self {
        Self {
            start: self.start.saturating_sub(delta),
            end: self.end.saturating_sub(delta),
        }
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Position in a source text (editor coordinates, 0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: u32,
    /// Character offset within the line (0-indexed)
    pub character: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.character.cmp(&other.character),
            ord => ord,
        }
    }
}

/// Range in a source text (editor coordinates), `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Check if this range contains a position.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && position < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_range_basics() {
        let range = OffsetRange::new(10, 20);
        assert_eq!(range.len(), 10);
        assert!(!range.is_empty());
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(20));
        assert_eq!(format!("{range}"), "10..20");
    }

    #[test]
    fn offset_range_shifting() {
        let range = OffsetRange::new(10, 20);
        assert_eq!(range.shifted_right(5), OffsetRange::new(15, 25));
        assert_eq!(range.shifted_left(5), OffsetRange::new(5, 15));
        // Saturating at zero, not underflowing
        assert_eq!(range.shifted_left(15), OffsetRange::new(0, 5));
    }

    #[test]
    fn position_ordering() {
        let p1 = Position::new(0, 5);
        let p2 = Position::new(0, 10);
        let p3 = Position::new(1, 0);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert_eq!(p1.cmp(&p1), std::cmp::Ordering::Equal);
    }

    #[test]
    fn range_contains() {
        let range = Range::new(Position::new(1, 0), Position::new(3, 0));
        assert!(range.contains(Position::new(1, 5)));
        assert!(range.contains(Position::new(2, 0)));
        assert!(!range.contains(Position::new(0, 5)));
        assert!(!range.contains(Position::new(3, 0))); // end is exclusive
    }
}
