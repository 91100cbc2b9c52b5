//! # Editing buffer
//!
//! ## Overview
//!
//! [EditBuffer] is an in-memory [EditorHandle]: an [EditRope] with a set of selections, an
//! optional [SyntaxArena], undo history and a viewport scroll offset. It implements a small set of
//! built-in commands, named after the commands of popular graphical editors:
//!
//! | Command | Effect |
//! |---|---|
//! | `cursorUp`, `cursorDown`, `cursorLeft`, `cursorRight` | Move each caret by a character or line |
//! | `cursorHome`, `cursorEnd` | Move to the first non-blank character or end of the line |
//! | `cursorLineStart`, `cursorLineEnd` | Move to the first column or end of the line |
//! | `cursorPageUp`, `cursorPageDown` | Move a page of lines |
//! | `…Select` variants of the above | Move only the active end of each selection |
//! | `deleteLeft`, `deleteRight` | Delete the selection, or the character before/after the caret |
//! | `deleteAllRight` | Delete to the end of the line |
//! | `insertLineAfter`, `insertLineBefore` | Open an indented line below/above |
//! | `joinLines` | Join the line with the one after it |
//! | `scrollLineUp`, `scrollLineDown` | Move the viewport by a line |
//! | `revealLine` | Reveal `{"lineNumber": n, "at": "top" \| "center" \| "bottom"}` (1-based) |
//! | `type` | Replace each selection with `{"text": "..."}` |
//! | `undo`, `redo` | Move through the edit history |
//!
//! Every requested command name is recorded in [EditBuffer::commands]. Commands the buffer doesn't
//! know fail with [HostError::UnknownCommand].
//!
//! ## Example
//!
//! ```
//! use motionkit::editing::buffer::EditBuffer;
//!
//! let buffer = EditBuffer::from_marked("Hello [wor]ld");
//!
//! assert_eq!(buffer.text(), "Hello world");
//! assert_eq!(buffer.render(), "Hello [wor]ld");
//! ```
use async_trait::async_trait;
use serde_json::Value;

use editor_types::prelude::*;
use editor_types::util::indentation;
use editor_types::Document;

use crate::editing::rope::{CharOff, EditRope, OffsetMap};
use crate::editing::syntax::{SyntaxArena, SyntaxTree};
use crate::errors::HostError;
use crate::host::{EditorHandle, RevealAt};
use crate::util::{dedup_stable, merge_ranges, parse_marked, render_marked};

const DEFAULT_PAGE_HEIGHT: usize = 20;

#[derive(Clone, Debug)]
struct Snapshot {
    text: EditRope,
    selections: Vec<Selection>,
}

/// An in-memory document with selections, implementing [EditorHandle].
#[derive(Clone, Debug)]
pub struct EditBuffer {
    text: EditRope,
    selections: Vec<Selection>,
    syntax: Option<SyntaxArena>,

    past: Vec<Snapshot>,
    future: Vec<Snapshot>,

    scroll: usize,
    page_height: usize,

    commands: Vec<String>,
    revealed: Vec<(usize, RevealAt)>,
}

impl EditBuffer {
    /// Create a buffer with a single caret at the start of the text.
    pub fn new<T: Into<EditRope>>(text: T) -> Self {
        EditBuffer {
            text: text.into(),
            selections: vec![Selection::default()],
            syntax: None,
            past: vec![],
            future: vec![],
            scroll: 0,
            page_height: DEFAULT_PAGE_HEIGHT,
            commands: vec![],
            revealed: vec![],
        }
    }

    /// Create a buffer from text containing selection markers.
    ///
    /// Each selection is written as a `[` at its anchor and a `]` at its active end, so
    /// `"ab[]c"` has a caret after `b`. Text without markers gets a caret at the start.
    pub fn from_marked(marked: &str) -> Self {
        let (text, selections) = parse_marked(marked);
        let mut buffer = EditBuffer::new(text);

        if !selections.is_empty() {
            buffer.selections = selections;
        }

        return buffer;
    }

    /// Attach a syntax tree describing the buffer's text.
    ///
    /// The tree isn't updated when the text changes, so hosts should attach a new one after
    /// editing.
    pub fn with_syntax(mut self, syntax: SyntaxArena) -> Self {
        self.syntax = Some(syntax);
        self
    }

    /// Replace or remove the attached syntax tree.
    pub fn set_syntax(&mut self, syntax: Option<SyntaxArena>) {
        self.syntax = syntax;
    }

    /// Set how many lines the page movement commands move.
    pub fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    /// The buffer's text.
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// The underlying rope.
    pub fn rope(&self) -> &EditRope {
        &self.text
    }

    /// The buffer's text with selection markers inserted, in the format [EditBuffer::from_marked]
    /// accepts.
    pub fn render(&self) -> String {
        render_marked(&self.text.to_string(), &self.selections)
    }

    /// The name of every built-in command that has been requested, in order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Every line that has been revealed, in order.
    pub fn revealed(&self) -> &[(usize, RevealAt)] {
        &self.revealed
    }

    /// The first visible line.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot { text: self.text.clone(), selections: self.selections.clone() }
    }

    fn map_position(&self, map: &OffsetMap, pos: Position, old: &EditRope) -> Position {
        self.text.to_position(map.map(old.to_offset(pos)))
    }

    /// Apply edits and move every selection along with the text around it.
    fn edit(&mut self, edits: &[TextEdit]) -> Result<OffsetMap, HostError> {
        let before = self.snapshot();
        let map = self.text.apply(edits)?;

        self.selections = before
            .selections
            .iter()
            .map(|sel| {
                Selection::new(
                    self.map_position(&map, sel.anchor, &before.text),
                    self.map_position(&map, sel.active, &before.text),
                )
            })
            .collect();

        self.past.push(before);
        self.future.clear();

        Ok(map)
    }

    /// Delete a range for every selection, and leave a caret where each one was.
    fn delete_ranges<F>(&mut self, f: F) -> Result<(), HostError>
    where
        F: Fn(&EditRope, &Selection) -> Option<TextRange>,
    {
        let ranges: Vec<TextRange> = self
            .selections
            .iter()
            .filter_map(|sel| {
                if sel.is_empty() {
                    f(&self.text, sel)
                } else {
                    Some(sel.range())
                }
            })
            .collect();

        if ranges.is_empty() {
            return Ok(());
        }

        let ranges = merge_ranges(ranges);
        let edits: Vec<TextEdit> = ranges.into_iter().map(TextEdit::delete).collect();

        self.edit(&edits)?;

        let carets = self.selections.iter().map(|s| Selection::caret(s.start()));
        self.selections = dedup_stable(carets);

        Ok(())
    }

    fn move_carets<F>(&mut self, select: bool, f: F)
    where
        F: Fn(&EditRope, Position) -> Position,
    {
        self.selections = self
            .selections
            .iter()
            .map(|sel| {
                let active = f(&self.text, sel.active);

                if select {
                    sel.with_active(active)
                } else {
                    Selection::caret(active)
                }
            })
            .collect();
    }

    fn selection_lines(&self) -> Vec<usize> {
        let mut lines = dedup_stable(self.selections.iter().map(|s| s.active.line));
        lines.sort_unstable();
        lines
    }

    fn insert_lines(&mut self, after: bool) -> Result<(), HostError> {
        let lines = self.selection_lines();
        let mut edits = vec![];
        let mut offsets = vec![];

        for line in lines {
            let text = self.text.line(line).unwrap_or_default();
            let indent: String = text.chars().take(indentation(&text)).collect();

            let (pos, insert) = if after {
                (Position::new(line, self.text.line_len(line)), format!("\n{indent}"))
            } else {
                (Position::new(line, 0), format!("{indent}\n"))
            };

            offsets.push(self.text.to_offset(pos));
            edits.push(TextEdit::insert(pos, insert));
        }

        let map = self.edit(&edits)?;

        self.selections = offsets
            .into_iter()
            .map(|off| {
                let mut off = map.map(off);

                if !after {
                    // Step back over the inserted line break.
                    off = off - CharOff::from(1);
                }

                Selection::caret(self.text.to_position(off))
            })
            .collect();

        Ok(())
    }

    fn join_lines(&mut self) -> Result<(), HostError> {
        let mut edits = vec![];
        let mut starts = vec![];

        for line in self.selection_lines() {
            if line + 1 >= self.text.line_count() {
                continue;
            }

            let start = Position::new(line, self.text.line_len(line));
            let end = Position::new(line + 1, self.text.first_non_whitespace(line + 1));
            let sep = if self.text.is_blank(line + 1) || self.text.is_blank(line) {
                ""
            } else {
                " "
            };

            starts.push(self.text.to_offset(start));
            edits.push(TextEdit::replace(TextRange::new(start, end), sep));
        }

        if edits.is_empty() {
            return Ok(());
        }

        let map = self.edit(&edits)?;

        self.selections = starts
            .into_iter()
            .map(|off| Selection::caret(self.text.to_position(map.map(off))))
            .collect();

        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<(), HostError> {
        let edits: Vec<TextEdit> = self
            .selections
            .iter()
            .map(|sel| TextEdit::replace(sel.range(), text))
            .collect();

        self.edit(&edits)?;
        self.selections = self.selections.iter().map(|s| Selection::caret(s.end())).collect();

        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) -> Snapshot {
        let current = self.snapshot();

        self.text = snapshot.text;
        self.selections = snapshot.selections;

        return current;
    }

    fn undo(&mut self) {
        if let Some(prev) = self.past.pop() {
            let current = self.restore(prev);
            self.future.push(current);
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.future.pop() {
            let current = self.restore(next);
            self.past.push(current);
        }
    }

    fn reveal(&mut self, line: usize, at: RevealAt) -> Result<(), HostError> {
        if line >= self.text.line_count() {
            return Err(HostError::CommandFailed {
                name: "revealLine".into(),
                reason: format!("line {} is past the end of the document", line + 1),
            });
        }

        self.scroll = match at {
            RevealAt::Top => line,
            RevealAt::Center => line.saturating_sub(self.page_height / 2),
            RevealAt::Bottom => line.saturating_sub(self.page_height.saturating_sub(1)),
        };
        self.revealed.push((line, at));

        Ok(())
    }

    fn run(&mut self, name: &str, args: Option<&Value>) -> Result<(), HostError> {
        let page = self.page_height;

        match name {
            "cursorUp" | "cursorUpSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| up(doc, p, 1));
            },
            "cursorDown" | "cursorDownSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| down(doc, p, 1));
            },
            "cursorPageUp" | "cursorPageUpSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| up(doc, p, page));
            },
            "cursorPageDown" | "cursorPageDownSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| down(doc, p, page));
            },
            "cursorLeft" | "cursorLeftSelect" => {
                self.move_carets(name.ends_with("Select"), left);
            },
            "cursorRight" | "cursorRightSelect" => {
                self.move_carets(name.ends_with("Select"), right);
            },
            "cursorHome" | "cursorHomeSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| {
                    let first = doc.first_non_whitespace(p.line);

                    if p.column == first {
                        p.with_column(0)
                    } else {
                        p.with_column(first)
                    }
                });
            },
            "cursorEnd" | "cursorEndSelect" | "cursorLineEnd" | "cursorLineEndSelect" => {
                self.move_carets(name.ends_with("Select"), |doc, p| {
                    p.with_column(doc.line_len(p.line))
                });
            },
            "cursorLineStart" | "cursorLineStartSelect" => {
                self.move_carets(name.ends_with("Select"), |_, p| p.with_column(0));
            },
            "deleteLeft" => {
                self.delete_ranges(|doc, sel| {
                    let p = sel.active;

                    if p.column > 0 {
                        Some(TextRange::new(p.left(1), p))
                    } else if p.line > 0 {
                        let prev = Position::new(p.line - 1, doc.line_len(p.line - 1));
                        Some(TextRange::new(prev, p))
                    } else {
                        None
                    }
                })?;
            },
            "deleteRight" => {
                self.delete_ranges(|doc, sel| {
                    let p = sel.active;

                    if p.column < doc.line_len(p.line) {
                        Some(TextRange::new(p, p.right(1)))
                    } else if p.line + 1 < doc.line_count() {
                        Some(TextRange::new(p, Position::new(p.line + 1, 0)))
                    } else {
                        None
                    }
                })?;
            },
            "deleteAllRight" => {
                self.delete_ranges(|doc, sel| {
                    let p = sel.active;
                    let end = p.with_column(doc.line_len(p.line));

                    (p < end).then(|| TextRange::new(p, end))
                })?;
            },
            "insertLineAfter" => self.insert_lines(true)?,
            "insertLineBefore" => self.insert_lines(false)?,
            "joinLines" => self.join_lines()?,
            "scrollLineUp" => {
                self.scroll = self.scroll.saturating_sub(1);
            },
            "scrollLineDown" => {
                let max = self.text.line_count().saturating_sub(1);
                self.scroll = (self.scroll + 1).min(max);
            },
            "revealLine" => {
                let line = args
                    .and_then(|a| a.get("lineNumber"))
                    .and_then(Value::as_u64)
                    .ok_or_else(|| HostError::CommandFailed {
                        name: name.into(),
                        reason: "missing lineNumber".into(),
                    })?;
                let at = match args.and_then(|a| a.get("at")).and_then(Value::as_str) {
                    Some("top") => RevealAt::Top,
                    Some("bottom") => RevealAt::Bottom,
                    _ => RevealAt::Center,
                };

                self.reveal((line as usize).saturating_sub(1), at)?;
            },
            "type" => {
                let text = args
                    .and_then(|a| a.get("text"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| HostError::CommandFailed {
                        name: name.into(),
                        reason: "missing text".into(),
                    })?;

                self.type_text(text)?;
            },
            "undo" => self.undo(),
            "redo" => self.redo(),
            _ => {
                return Err(HostError::UnknownCommand(name.to_string()));
            },
        }

        Ok(())
    }
}

fn up(doc: &EditRope, p: Position, n: usize) -> Position {
    if p.line == 0 {
        return Position::default();
    }

    let line = p.line.saturating_sub(n);

    Position::new(line, p.column.min(doc.line_len(line)))
}

fn down(doc: &EditRope, p: Position, n: usize) -> Position {
    let last = doc.line_count().saturating_sub(1);

    if p.line >= last {
        return doc.end();
    }

    let line = (p.line + n).min(last);

    Position::new(line, p.column.min(doc.line_len(line)))
}

fn left(doc: &EditRope, p: Position) -> Position {
    if p.column > 0 {
        p.left(1)
    } else if p.line > 0 {
        Position::new(p.line - 1, doc.line_len(p.line - 1))
    } else {
        p
    }
}

fn right(doc: &EditRope, p: Position) -> Position {
    if p.column < doc.line_len(p.line) {
        p.right(1)
    } else if p.line + 1 < doc.line_count() {
        Position::new(p.line + 1, 0)
    } else {
        p
    }
}

#[async_trait(?Send)]
impl EditorHandle for EditBuffer {
    fn document(&self) -> &dyn Document {
        &self.text
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections
            .into_iter()
            .map(|s| Selection::new(self.text.clamp(s.anchor), self.text.clamp(s.active)))
            .collect();

        if self.selections.is_empty() {
            self.selections.push(Selection::default());
        }
    }

    fn syntax(&self) -> Option<&dyn SyntaxTree> {
        self.syntax.as_ref().map(|s| s as &dyn SyntaxTree)
    }

    async fn apply_edits(&mut self, edits: Vec<TextEdit>) -> Result<(), HostError> {
        if edits.is_empty() {
            return Ok(());
        }

        self.edit(&edits)?;

        Ok(())
    }

    async fn execute_command(&mut self, name: &str, args: Option<&Value>) -> Result<(), HostError> {
        tracing::debug!(command = name, "running built-in command");
        self.commands.push(name.to_string());
        self.run(name, args)
    }

    async fn reveal_line(&mut self, line: usize, at: RevealAt) -> Result<(), HostError> {
        self.reveal(line, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! run {
        ($buf: expr, $name: expr) => {
            $buf.execute_command($name, None).await.unwrap()
        };
        ($buf: expr, $name: expr, $args: expr) => {
            $buf.execute_command($name, Some(&$args)).await.unwrap()
        };
    }

    #[tokio::test]
    async fn test_cursor_movement() {
        let mut buf = EditBuffer::from_marked("ab[]c\n  de\nf");

        run!(buf, "cursorDown");
        assert_eq!(buf.render(), "abc\n  []de\nf");

        // The first press goes to the start of the line when already on the first non-blank.
        run!(buf, "cursorHome");
        assert_eq!(buf.render(), "abc\n[]  de\nf");
        run!(buf, "cursorHome");
        assert_eq!(buf.render(), "abc\n  []de\nf");

        run!(buf, "cursorLineStart");
        run!(buf, "cursorLeft");
        assert_eq!(buf.render(), "abc[]\n  de\nf");

        run!(buf, "cursorRight");
        run!(buf, "cursorEndSelect");
        assert_eq!(buf.render(), "abc\n[  de]\nf");

        run!(buf, "cursorPageDown");
        assert_eq!(buf.render(), "abc\n  de\nf[]");

        assert_eq!(buf.commands().len(), 8);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut buf = EditBuffer::new("text");
        let err = buf.execute_command("editor.action.revealDefinition", None).await.unwrap_err();

        assert_eq!(err, HostError::UnknownCommand("editor.action.revealDefinition".into()));
        assert_eq!(buf.commands(), &["editor.action.revealDefinition".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_commands() {
        let mut buf = EditBuffer::from_marked("a[]bc [d]e\nfg[]");

        run!(buf, "deleteRight");
        assert_eq!(buf.render(), "a[]c []e\nfg[]");

        run!(buf, "deleteLeft");
        assert_eq!(buf.render(), "[]c[]e\nf[]");

        let mut buf = EditBuffer::from_marked("one t[]wo\nthree");
        run!(buf, "deleteAllRight");
        assert_eq!(buf.render(), "one t[]\nthree");

        run!(buf, "deleteRight");
        assert_eq!(buf.render(), "one t[]three");
    }

    #[tokio::test]
    async fn test_insert_lines() {
        let mut buf = EditBuffer::from_marked("fn main() {\n    fo[]o();\n}");

        run!(buf, "insertLineAfter");
        assert_eq!(buf.render(), "fn main() {\n    foo();\n    []\n}");

        let mut buf = EditBuffer::from_marked("fn main() {\n    fo[]o();\n}");

        run!(buf, "insertLineBefore");
        assert_eq!(buf.render(), "fn main() {\n    []\n    foo();\n}");
    }

    #[tokio::test]
    async fn test_join_lines() {
        let mut buf = EditBuffer::from_marked("a[]b\n    cd\nef");

        run!(buf, "joinLines");
        assert_eq!(buf.render(), "ab[] cd\nef");
    }

    #[tokio::test]
    async fn test_undo_redo() {
        let mut buf = EditBuffer::from_marked("abc[]");

        run!(buf, "type", serde_json::json!({ "text": "def" }));
        assert_eq!(buf.render(), "abcdef[]");

        run!(buf, "undo");
        assert_eq!(buf.render(), "abc[]");

        run!(buf, "redo");
        assert_eq!(buf.render(), "abcdef[]");

        // Nothing left to redo.
        run!(buf, "redo");
        assert_eq!(buf.text(), "abcdef");
    }

    #[tokio::test]
    async fn test_scroll_and_reveal() {
        let text = vec!["line"; 50].join("\n");
        let mut buf = EditBuffer::new(text);

        run!(buf, "scrollLineDown");
        run!(buf, "scrollLineDown");
        run!(buf, "scrollLineUp");
        assert_eq!(buf.scroll(), 1);

        buf.reveal_line(30, RevealAt::Center).await.unwrap();
        assert_eq!(buf.scroll(), 20);

        run!(buf, "revealLine", serde_json::json!({ "lineNumber": 5, "at": "top" }));
        assert_eq!(buf.scroll(), 4);
        assert_eq!(buf.revealed(), &[(30, RevealAt::Center), (4, RevealAt::Top)]);

        assert!(buf.reveal_line(50, RevealAt::Top).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_edits_moves_selections() {
        let mut buf = EditBuffer::from_marked("ab [cd] ef");

        buf.apply_edits(vec![TextEdit::insert(Position::new(0, 0), ">> ")]).await.unwrap();
        assert_eq!(buf.render(), ">> ab [cd] ef");

        let res = buf
            .apply_edits(vec![
                TextEdit::delete(TextRange::new(Position::new(0, 0), Position::new(0, 4))),
                TextEdit::delete(TextRange::new(Position::new(0, 2), Position::new(0, 5))),
            ])
            .await;
        assert_eq!(res, Err(HostError::OverlappingEdits));
        assert_eq!(buf.render(), ">> ab [cd] ef");
    }
}
