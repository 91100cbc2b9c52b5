//! # High-level rope manipulation
//!
//! ## Overview
//!
//! This module provides a wrapper around a rope implementation that works with the types from
//! [editor_types::prelude], implements [Document] on top of it, and applies batches of
//! [TextEdit] values atomically to support [EditBuffer](crate::editing::buffer::EditBuffer).
//!
//! Every edit in a batch is positioned relative to the text as it was before the batch started.
//! The edits are validated and sorted up front, and then applied from the end of the document
//! towards its start, so that applying one edit never moves the text another edit refers to.
use std::borrow::Cow;
use std::cmp::{Ord, Ordering, PartialOrd};
use std::fmt::{self, Display};
use std::ops::Range;

use ropey::Rope;

use editor_types::prelude::*;
use editor_types::Document;

use crate::errors::HostError;

/// Character offset into an [EditRope].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    derive_more::Add,
    derive_more::Sub,
    derive_more::From,
    derive_more::Into,
)]
pub struct CharOff(usize);

impl PartialOrd for CharOff {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CharOff {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

fn trim_break(line: Cow<'_, str>) -> Cow<'_, str> {
    match line {
        Cow::Borrowed(s) => {
            let s = s.strip_suffix('\n').unwrap_or(s);
            let s = s.strip_suffix('\r').unwrap_or(s);

            Cow::Borrowed(s)
        },
        Cow::Owned(mut s) => {
            if s.ends_with('\n') {
                s.pop();
            }

            if s.ends_with('\r') {
                s.pop();
            }

            Cow::Owned(s)
        },
    }
}

/// A single replacement that has been applied to an [EditRope].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct AppliedEdit {
    start: CharOff,
    end: CharOff,
    inserted: usize,
}

/// Describes how the character offsets of a document moved after applying a batch of edits.
///
/// Offsets are given relative to the text before the batch was applied.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OffsetMap {
    edits: Vec<AppliedEdit>,
}

impl OffsetMap {
    /// Find where an offset into the old text ended up in the new text.
    ///
    /// Offsets located at an insertion point move to after the inserted text. Offsets inside of
    /// replaced text move to the start of the replacement.
    pub fn map(&self, off: CharOff) -> CharOff {
        let mut shift: isize = 0;

        for edit in self.edits.iter() {
            if off < edit.start {
                break;
            }

            let removed = (edit.end - edit.start).0 as isize;

            if off >= edit.end {
                shift += edit.inserted as isize - removed;
                continue;
            }

            // The offset was inside of replaced text.
            return CharOff((edit.start.0 as isize + shift) as usize);
        }

        return CharOff((off.0 as isize + shift).max(0) as usize);
    }

    /// The number of edits that were applied.
    pub fn len(&self) -> usize {
        self.edits.len()
    }
}

/// A rope with conversions between [Position] values and character offsets.
#[derive(Clone, Debug, Default)]
pub struct EditRope {
    rope: Rope,
}

impl EditRope {
    /// Create an empty, zero-length rope.
    pub fn empty() -> EditRope {
        EditRope::from("")
    }

    /// Return the length in number of characters.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// Return the length in number of characters as a [CharOff].
    pub fn len_offset(&self) -> CharOff {
        CharOff(self.len())
    }

    /// Indicates whether or not this rope is empty (contains no characters).
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Return the character offset of the start of a given line.
    pub fn offset_of_line(&self, line: usize) -> CharOff {
        let line = line.min(self.rope.len_lines().saturating_sub(1));

        CharOff(self.rope.line_to_char(line))
    }

    /// Return the line number of the given character offset.
    pub fn line_of_offset(&self, off: CharOff) -> usize {
        self.rope
            .try_char_to_line(off.0)
            .unwrap_or_else(|_| self.rope.len_lines().saturating_sub(1))
    }

    /// Convert a [Position] into a character offset, clamping it into the document.
    pub fn to_offset(&self, pos: Position) -> CharOff {
        let pos = self.clamp(pos);

        self.offset_of_line(pos.line) + CharOff(pos.column)
    }

    /// Convert a character offset into a [Position].
    pub fn to_position(&self, off: CharOff) -> Position {
        let off = off.min(self.len_offset());
        let line = self.line_of_offset(off);
        let column = (off - self.offset_of_line(line)).0;

        Position::new(line, column.min(self.line_len(line)))
    }

    /// Convert a [TextRange] into a range of character offsets.
    pub fn to_offsets(&self, range: &TextRange) -> Range<CharOff> {
        Range { start: self.to_offset(range.start), end: self.to_offset(range.end) }
    }

    /// Whether a position refers to a location that exists in this rope.
    pub fn is_valid(&self, pos: Position) -> bool {
        pos.line < self.line_count() && pos.column <= self.line_len(pos.line)
    }

    /// Fetch the character at an offset.
    pub fn char_at_offset(&self, off: CharOff) -> Option<char> {
        self.rope.get_char(off.0)
    }

    /// Replace a range of characters with new text.
    pub fn replace(&mut self, range: Range<CharOff>, text: &str) {
        let start = range.start.0.min(self.len());
        let end = range.end.0.clamp(start, self.len());

        if start < end {
            self.rope.remove(start..end);
        }

        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }

    /// Apply several edits as a single, atomic change.
    ///
    /// Every edit's range refers to the text before any of the edits are applied. If any of the
    /// ranges is invalid, or two of them overlap, then nothing is changed.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Result<OffsetMap, HostError> {
        let mut sorted = Vec::with_capacity(edits.len());

        for (idx, edit) in edits.iter().enumerate() {
            if !self.is_valid(edit.range.start) || !self.is_valid(edit.range.end) {
                return Err(HostError::InvalidRange(edit.range));
            }

            let range = self.to_offsets(&edit.range);
            sorted.push((range, idx));
        }

        sorted.sort_by(|(a, ai), (b, bi)| {
            a.start.cmp(&b.start).then(a.end.cmp(&b.end)).then(ai.cmp(bi))
        });

        for pair in sorted.windows(2) {
            let (prev, _) = &pair[0];
            let (next, _) = &pair[1];

            if prev.end > next.start {
                return Err(HostError::OverlappingEdits);
            }
        }

        let mut map = OffsetMap::default();

        for (range, idx) in sorted.iter().rev() {
            let text = edits[*idx].text.as_str();

            self.replace(range.clone(), text);
            map.edits.push(AppliedEdit {
                start: range.start,
                end: range.end,
                inserted: text.chars().count(),
            });
        }

        map.edits.reverse();

        Ok(map)
    }
}

impl Document for EditRope {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let text = Cow::from(self.rope.line(line));

        return Some(trim_break(text));
    }

    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn offset_at(&self, pos: Position) -> usize {
        self.to_offset(pos).0
    }

    fn position_at(&self, offset: usize) -> Position {
        self.to_position(CharOff(offset))
    }

    fn text_in(&self, range: &TextRange) -> String {
        let Range { start, end } = self.to_offsets(range);

        self.rope.slice(start.0..end.0).to_string()
    }
}

impl From<&str> for EditRope {
    fn from(s: &str) -> Self {
        EditRope { rope: Rope::from_str(s) }
    }
}

impl From<String> for EditRope {
    fn from(s: String) -> Self {
        EditRope::from(s.as_str())
    }
}

impl PartialEq<&str> for EditRope {
    fn eq(&self, other: &&str) -> bool {
        self.rope == *other
    }
}

impl PartialEq<EditRope> for EditRope {
    fn eq(&self, other: &EditRope) -> bool {
        self.rope == other.rope
    }
}

impl Eq for EditRope {}

impl Display for EditRope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! pos {
        ($l: expr, $c: expr) => {
            Position::new($l, $c)
        };
    }

    macro_rules! range {
        ($sl: expr, $sc: expr, $el: expr, $ec: expr) => {
            TextRange::new(pos!($sl, $sc), pos!($el, $ec))
        };
    }

    #[test]
    fn test_lines() {
        let rope = EditRope::from("hello\nworld\r\n\nend");

        assert_eq!(rope.line_count(), 4);
        assert_eq!(rope.line(0).unwrap(), "hello");
        assert_eq!(rope.line(1).unwrap(), "world");
        assert_eq!(rope.line(2).unwrap(), "");
        assert_eq!(rope.line(3).unwrap(), "end");
        assert_eq!(rope.line(4), None);

        let rope = EditRope::from("trailing\n");
        assert_eq!(rope.line_count(), 2);
        assert_eq!(rope.line(1).unwrap(), "");
    }

    #[test]
    fn test_offsets() {
        let rope = EditRope::from("ab\ncde\n\nf");

        assert_eq!(rope.offset_at(pos!(1, 1)), 4);
        assert_eq!(rope.offset_at(pos!(3, 1)), 9);
        assert_eq!(rope.position_at(3), pos!(1, 0));
        assert_eq!(rope.position_at(7), pos!(2, 0));
        assert_eq!(rope.position_at(100), pos!(3, 1));

        assert_eq!(rope.to_offset(pos!(0, 40)), CharOff(2));
        assert_eq!(rope.text_in(&range!(0, 1, 1, 2)), "b\ncd");
    }

    #[test]
    fn test_apply_batch() {
        let mut rope = EditRope::from("one two three\nfour");
        let map = rope
            .apply(&[
                TextEdit::delete(range!(0, 4, 0, 8)),
                TextEdit::insert(pos!(1, 0), "> "),
                TextEdit::replace(range!(0, 0, 0, 3), "1"),
            ])
            .unwrap();

        assert_eq!(rope, "1 three\n> four");
        assert_eq!(map.len(), 3);

        // "three" started at offset 8.
        assert_eq!(map.map(CharOff(8)), CharOff(2));

        // "four" started at offset 14, and gets pushed past the inserted prefix.
        assert_eq!(map.map(CharOff(14)), CharOff(10));

        // Offsets inside of deleted text collapse to where it was.
        assert_eq!(map.map(CharOff(5)), CharOff(2));
    }

    #[test]
    fn test_apply_overlap() {
        let mut rope = EditRope::from("abcdef");
        let res = rope.apply(&[
            TextEdit::delete(range!(0, 0, 0, 3)),
            TextEdit::delete(range!(0, 2, 0, 4)),
        ]);

        assert_eq!(res, Err(HostError::OverlappingEdits));
        assert_eq!(rope, "abcdef");

        // Edits that only touch are fine.
        rope.apply(&[
            TextEdit::delete(range!(0, 0, 0, 2)),
            TextEdit::replace(range!(0, 2, 0, 4), "X"),
        ])
        .unwrap();
        assert_eq!(rope, "Xef");
    }

    #[test]
    fn test_apply_invalid() {
        let mut rope = EditRope::from("abc\ndef");
        let range = range!(0, 2, 0, 9);
        let res = rope.apply(&[TextEdit::delete(range)]);

        assert_eq!(res, Err(HostError::InvalidRange(range)));

        let range = range!(5, 0, 5, 0);
        let res = rope.apply(&[TextEdit::insert(range.start, "x")]);
        assert_eq!(res, Err(HostError::InvalidRange(range)));
        assert_eq!(rope, "abc\ndef");
    }

    #[test]
    fn test_multiple_inserts_same_point() {
        let mut rope = EditRope::from("word");
        rope.apply(&[TextEdit::insert(pos!(0, 0), "("), TextEdit::insert(pos!(0, 4), ")")])
            .unwrap();
        assert_eq!(rope, "(word)");
    }
}
