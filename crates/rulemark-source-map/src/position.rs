//! Line/column coordinates.

use serde::{Deserialize, Serialize};

/// A position within a source text.
///
/// Both `line` and `col` are 1-indexed as reported to callers; whatever
/// numbering an external parser uses internally is normalized before a
/// `Position` is constructed. Line 0 / column 0 occur only in synthesized
/// context bounds (see [`Span::with_context`](crate::Span::with_context)).
///
/// Positions are plain values: comparison is lexicographic by (line, col)
/// and the only "mutators" return shifted copies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in characters not bytes)
    pub col: usize,
}

impl Position {
    /// Create a position from 1-indexed line and column numbers.
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The same column on the following line.
    pub fn next_line(&self) -> Self {
        Self {
            line: self.line + 1,
            col: self.col,
        }
    }

    /// The same column on the preceding line.
    ///
    /// Saturates at line 0 rather than underflowing.
    pub fn previous_line(&self) -> Self {
        Self {
            line: self.line.saturating_sub(1),
            col: self.col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shifts() {
        let pos = Position::new(3, 7);
        assert_eq!(pos.next_line(), Position::new(4, 7));
        assert_eq!(pos.previous_line(), Position::new(2, 7));
        // the original is untouched
        assert_eq!(pos, Position::new(3, 7));
    }

    #[test]
    fn test_previous_line_saturates() {
        let pos = Position::new(0, 1);
        assert_eq!(pos.previous_line(), Position::new(0, 1));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 2));
        assert_eq!(Position::new(5, 5), Position::new(5, 5));
    }
}
