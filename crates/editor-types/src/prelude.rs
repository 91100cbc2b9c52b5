//! # Common editing types
//!
//! ## Overview
//!
//! These types describe positions inside of a document, the selections that a user holds there,
//! and the edits that get applied to the text between them.
use std::fmt;

use crate::util::sort2;

/// A location in a document.
///
/// Both fields count from zero, and columns are measured in characters rather than bytes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Position {
    /// The line this position is located on.
    pub line: usize,

    /// The character offset within the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }

    /// Create a copy of this position located at a different column on the same line.
    pub fn with_column(&self, column: usize) -> Self {
        Position { line: self.line, column }
    }

    /// Move this position a number of characters to the right, staying on the same line.
    pub fn right(&self, n: usize) -> Self {
        Position { line: self.line, column: self.column.saturating_add(n) }
    }

    /// Move this position a number of characters to the left, stopping at the line start.
    pub fn left(&self, n: usize) -> Self {
        Position { line: self.line, column: self.column.saturating_sub(n) }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Position::new(line, column)
    }
}

/// An ordered span of text between two positions.
///
/// The start is always less than or equal to the end.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TextRange {
    /// Where the span begins.
    pub start: Position,

    /// Where the span ends (exclusive).
    pub end: Position,
}

impl TextRange {
    /// Create a range covering the text between two positions, in either order.
    pub fn new(a: Position, b: Position) -> Self {
        let (start, end) = sort2(a, b);

        TextRange { start, end }
    }

    /// Create a zero-width range at a position.
    pub fn empty(pos: Position) -> Self {
        TextRange { start: pos, end: pos }
    }

    /// Whether this range covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether a position falls within this range, including both of its ends.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// The number of line breaks inside this range.
    pub fn line_span(&self) -> usize {
        self.end.line - self.start.line
    }

    /// Whether this range shares any text with another range.
    ///
    /// Ranges that only touch at their ends do not overlap.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Create the smallest range covering both this range and another one.
    pub fn union(&self, other: &TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A user's selection.
///
/// The anchor is where the selection was started, and the active end is where the caret is
/// drawn. When both are the same position, the selection is just a caret.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: Position,

    /// The moving end of the selection.
    pub active: Position,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: Position, active: Position) -> Self {
        Selection { anchor, active }
    }

    /// Create an empty selection at a position.
    pub fn caret(pos: Position) -> Self {
        Selection { anchor: pos, active: pos }
    }

    /// The earlier of the two ends.
    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// The later of the two ends.
    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Whether this selection is just a caret.
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Whether the active end comes before the anchor.
    pub fn is_reversed(&self) -> bool {
        self.active < self.anchor
    }

    /// The text covered by this selection.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.active)
    }

    /// Create a copy of this selection with a new active end.
    pub fn with_active(&self, active: Position) -> Self {
        Selection { anchor: self.anchor, active }
    }
}

impl From<TextRange> for Selection {
    fn from(range: TextRange) -> Self {
        Selection::new(range.start, range.end)
    }
}

/// A replacement of the text inside a range.
///
/// Insertions use an empty range, and deletions use empty text.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct TextEdit {
    /// The text being replaced.
    pub range: TextRange,

    /// The replacement text.
    pub text: String,
}

impl TextEdit {
    /// Insert text at a position.
    pub fn insert<T: Into<String>>(pos: Position, text: T) -> Self {
        TextEdit { range: TextRange::empty(pos), text: text.into() }
    }

    /// Remove the text in a range.
    pub fn delete(range: TextRange) -> Self {
        TextEdit { range, text: String::new() }
    }

    /// Replace the text in a range.
    pub fn replace<T: Into<String>>(range: TextRange, text: T) -> Self {
        TextEdit { range, text: text.into() }
    }
}

/// An opening and closing delimiter that wrap around some text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pair {
    /// Text placed before the wrapped span.
    pub open: String,

    /// Text placed after the wrapped span.
    pub close: String,
}

impl Pair {
    /// Create a new delimiter pair.
    pub fn new<A: Into<String>, B: Into<String>>(open: A, close: B) -> Self {
        Pair { open: open.into(), close: close.into() }
    }

    /// Whether both sides use the same delimiter, like quotation marks do.
    pub fn is_symmetric(&self) -> bool {
        self.open == self.close
    }
}

/// Represent movement along a 1-dimensional line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MoveDir1D {
    /// Move backwards, or to a previous point.
    Previous,

    /// Move forwards, or to a following point.
    Next,
}

/// How much of a text object gets selected.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ObjectScope {
    /// Select only the contents, excluding any delimiters or trailing whitespace.
    Inside,

    /// Select the contents along with their delimiters or trailing whitespace.
    Around,
}

/// Whether a search target is part of the resulting selection.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Inclusion {
    /// Stop on the far side of the found character.
    Inclusive,

    /// Stop on the near side of the found character.
    Exclusive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_ordering() {
        let a = Position::new(3, 1);
        let b = Position::new(1, 8);

        let range = TextRange::new(a, b);
        assert_eq!(range.start, b);
        assert_eq!(range.end, a);
        assert_eq!(range.line_span(), 2);
        assert!(range.contains(Position::new(2, 100)));
        assert!(!range.contains(Position::new(3, 2)));
    }

    #[test]
    fn test_range_overlaps() {
        let a = TextRange::new(Position::new(0, 0), Position::new(0, 5));
        let b = TextRange::new(Position::new(0, 5), Position::new(0, 9));
        let c = TextRange::new(Position::new(0, 4), Position::new(0, 9));

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert_eq!(a.union(&b), TextRange::new(Position::new(0, 0), Position::new(0, 9)));
    }

    #[test]
    fn test_selection_ends() {
        let sel = Selection::new(Position::new(0, 7), Position::new(0, 2));

        assert!(sel.is_reversed());
        assert!(!sel.is_empty());
        assert_eq!(sel.start(), Position::new(0, 2));
        assert_eq!(sel.end(), Position::new(0, 7));

        let caret = Selection::caret(Position::new(4, 4));
        assert!(caret.is_empty());
        assert_eq!(caret.range(), TextRange::empty(Position::new(4, 4)));
    }

    #[test]
    fn test_pair_symmetry() {
        assert!(Pair::new("\"", "\"").is_symmetric());
        assert!(!Pair::new("(", ")").is_symmetric());
        assert!(!Pair::new("<div>", "</div>").is_symmetric());
    }
}
