//! # Document access
//!
//! ## Overview
//!
//! The [Document] trait gives read-only access to a document's lines, and converts between
//! [Position] values and character offsets into the whole text. Implementors only need to supply
//! [Document::line_count] and [Document::line]; everything else is derived from those two.
//!
//! Lines never include their line break, and a line break counts as a single character when
//! computing offsets.
use std::borrow::Cow;

use crate::prelude::{Position, TextRange};
use crate::util::is_space_char;

/// Read access to the text of a document.
pub trait Document {
    /// The number of lines in the document. Documents always have at least one line.
    fn line_count(&self) -> usize;

    /// Fetch the text of a line, without its trailing line break.
    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// The full text of the document.
    fn text(&self) -> String {
        let mut text = String::new();

        for n in 0..self.line_count() {
            if n > 0 {
                text.push('\n');
            }

            if let Some(line) = self.line(n) {
                text.push_str(&line);
            }
        }

        return text;
    }

    /// The number of characters on a line.
    fn line_len(&self, line: usize) -> usize {
        self.line(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// The character located right after a position, if there is one on the same line.
    fn char_at(&self, pos: Position) -> Option<char> {
        self.line(pos.line)?.chars().nth(pos.column)
    }

    /// The column of the first character on a line that isn't whitespace.
    ///
    /// Lines with only whitespace return their length.
    fn first_non_whitespace(&self, line: usize) -> usize {
        match self.line(line) {
            Some(text) => text.chars().take_while(|c| is_space_char(*c)).count(),
            None => 0,
        }
    }

    /// Whether a line is empty or only contains whitespace.
    fn is_blank(&self, line: usize) -> bool {
        self.line(line).map(|l| l.trim().is_empty()).unwrap_or(true)
    }

    /// The range covering a line's text, excluding its line break.
    fn line_range(&self, line: usize) -> TextRange {
        let len = self.line_len(line);

        TextRange::new(Position::new(line, 0), Position::new(line, len))
    }

    /// The position after the last character in the document.
    fn end(&self) -> Position {
        let last = self.line_count().saturating_sub(1);

        Position::new(last, self.line_len(last))
    }

    /// Move a position so that it refers to an existing location in the document.
    fn clamp(&self, pos: Position) -> Position {
        let lines = self.line_count();

        if pos.line >= lines {
            return self.end();
        }

        let len = self.line_len(pos.line);

        return Position::new(pos.line, pos.column.min(len));
    }

    /// Convert a position into a character offset into [Document::text].
    fn offset_at(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let mut off = 0;

        for n in 0..pos.line {
            off += self.line_len(n) + 1;
        }

        return off + pos.column;
    }

    /// Convert a character offset into [Document::text] back into a position.
    fn position_at(&self, offset: usize) -> Position {
        let mut remaining = offset;
        let lines = self.line_count();

        for n in 0..lines {
            let len = self.line_len(n);

            if remaining <= len {
                return Position::new(n, remaining);
            }

            remaining -= len + 1;
        }

        return self.end();
    }

    /// Copy out the text inside a range.
    fn text_in(&self, range: &TextRange) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        let mut text = String::new();

        for n in start.line..=end.line {
            let Some(line) = self.line(n) else {
                break;
            };

            let from = if n == start.line { start.column } else { 0 };
            let to = if n == end.line { end.column } else { usize::MAX };

            if n > start.line {
                text.push('\n');
            }

            text.extend(line.chars().skip(from).take(to.saturating_sub(from)));
        }

        return text;
    }
}

impl Document for str {
    fn line_count(&self) -> usize {
        self.split('\n').count()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.split('\n').nth(line).map(Cow::Borrowed)
    }

    fn text(&self) -> String {
        self.to_string()
    }
}

impl Document for String {
    fn line_count(&self) -> usize {
        self.as_str().line_count()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.as_str().line(line)
    }

    fn text(&self) -> String {
        self.clone()
    }
}
