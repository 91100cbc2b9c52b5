//! Modes that take a character or a number as their argument.
use async_trait::async_trait;

use editor_types::prelude::{MoveDir1D, Position, Selection, TextEdit, TextRange};
use editor_types::Document;
use keybindings::ModeInfo;

use crate::errors::EditResult;
use crate::host::{CursorStyle, RevealAt};
use crate::key::Key;

use super::{keys_pattern, Mode, ModeContext, ModeOutcome};

fn same_char(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Find `needle` in `chars`, ignoring case, starting at `start` and moving in `dir`.
///
/// Searching backwards only finds matches that end at or before `start`.
fn find_chars(chars: &[char], needle: &[char], start: usize, dir: MoveDir1D) -> Option<usize> {
    if needle.is_empty() || chars.len() < needle.len() {
        return None;
    }

    let matches = |i: usize| chars[i..i + needle.len()].iter().zip(needle).all(|(a, b)| same_char(*a, *b));
    let last = chars.len() - needle.len();

    match dir {
        MoveDir1D::Next => (start..=last).find(|i| matches(*i)),
        MoveDir1D::Previous => {
            let end = start.checked_sub(needle.len())?.min(last);

            (0..=end).rev().find(|i| matches(*i))
        },
    }
}

/// Move every caret to the result of `f`, leaving alone the ones it returns `None` for.
///
/// `f` gets the document's characters and the caret's offset into them, and returns the new
/// offset.
fn jump<F>(ctx: &mut ModeContext<'_>, f: F) -> bool
where
    F: Fn(&[char], usize) -> Option<usize>,
{
    let doc = ctx.editor.document();
    let chars: Vec<char> = doc.text().chars().collect();
    let mut moved = false;

    let selections = ctx
        .editor
        .selections()
        .into_iter()
        .map(|sel| {
            match f(&chars, doc.offset_at(sel.active)) {
                Some(off) => {
                    moved = true;
                    Selection::caret(doc.position_at(off))
                },
                None => sel,
            }
        })
        .collect();

    ctx.editor.set_selections(selections);

    return moved;
}

/// Mode that jumps to the next or previous place where two typed characters appear.
///
/// The search covers the whole document and ignores case.
#[derive(Clone, Debug)]
pub struct SneakMode {
    dir: MoveDir1D,
}

impl SneakMode {
    /// Search after the carets.
    pub fn forward() -> Self {
        SneakMode { dir: MoveDir1D::Next }
    }

    /// Search before the carets.
    pub fn backward() -> Self {
        SneakMode { dir: MoveDir1D::Previous }
    }
}

impl ModeInfo for SneakMode {
    fn name(&self) -> &str {
        match self.dir {
            MoveDir1D::Next => "sneak",
            MoveDir1D::Previous => "sneak-backwards",
        }
    }

    fn status_text(&self) -> &str {
        match self.dir {
            MoveDir1D::Next => "Sneak",
            MoveDir1D::Previous => "Sneak Backwards",
        }
    }
}

#[async_trait(?Send)]
impl Mode for SneakMode {
    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let needle: Option<Vec<char>> = keys.iter().map(Key::get_char).collect();

        let Some(needle) = needle else {
            ctx.error(&format!("Invalid key for sneak: {}", keys_pattern(keys)));
            return Ok(ctx.to_default());
        };

        if needle.len() < 2 {
            return Ok(ModeOutcome::Pending);
        }

        let dir = self.dir;
        let moved = jump(ctx, |chars, off| {
            match dir {
                MoveDir1D::Next => find_chars(chars, &needle, off + 1, dir),
                MoveDir1D::Previous => find_chars(chars, &needle, off.checked_sub(1)?, dir),
            }
        });

        tracing::debug!(mode = self.name(), keys = %keys_pattern(keys), moved, "sneak");

        Ok(ctx.to_default())
    }
}

/// Mode that jumps to the next occurrence of a typed character.
///
/// The search continues past the end of the caret's line. `find-char` leaves the caret after
/// the character, and `till-char` leaves it on it.
#[derive(Clone, Debug)]
pub struct CharSearchMode {
    till: bool,
}

impl CharSearchMode {
    /// Place the caret after the found character.
    pub fn find() -> Self {
        CharSearchMode { till: false }
    }

    /// Place the caret before the found character.
    pub fn till() -> Self {
        CharSearchMode { till: true }
    }
}

impl ModeInfo for CharSearchMode {
    fn name(&self) -> &str {
        if self.till {
            "till-char"
        } else {
            "find-char"
        }
    }

    fn status_text(&self) -> &str {
        if self.till {
            "Till Character"
        } else {
            "Find Character"
        }
    }
}

#[async_trait(?Send)]
impl Mode for CharSearchMode {
    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let Some(c) = keys.first().and_then(Key::get_char) else {
            ctx.error("Invalid key for char search");
            return Ok(ctx.to_default());
        };

        let till = self.till;

        jump(ctx, |chars, off| {
            let start = off + 1;
            let idx = start + chars.get(start..)?.iter().position(|ch| *ch == c)?;

            if till {
                Some(idx)
            } else {
                Some(idx + 1)
            }
        });

        Ok(ctx.to_default())
    }
}

/// Mode that collects a line number, and moves the caret to it once Enter is typed.
#[derive(Clone, Debug, Default)]
pub struct GoToLineMode;

impl ModeInfo for GoToLineMode {
    fn name(&self) -> &str {
        "go-to-line"
    }

    fn status_text(&self) -> &str {
        "Go To Line"
    }
}

#[async_trait(?Send)]
impl Mode for GoToLineMode {
    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let Some((Key::Char('\n'), digits)) = keys.split_last() else {
            return Ok(ModeOutcome::Pending);
        };

        let number: Option<usize> = keys_pattern(digits).parse().ok().filter(|n| *n > 0);

        let Some(number) = number else {
            ctx.error(&format!("Invalid line number: {}", keys_pattern(digits)));
            return Ok(ModeOutcome::Done);
        };

        let pos = ctx.editor.document().clamp(Position::new(number - 1, 0));

        ctx.editor.set_selections(vec![Selection::caret(pos)]);
        ctx.editor.reveal_line(pos.line, RevealAt::Center).await?;

        Ok(ctx.to_default())
    }
}

/// Mode that overwrites the character after each caret with the typed one.
#[derive(Clone, Debug, Default)]
pub struct ReplaceCharMode;

impl ModeInfo for ReplaceCharMode {
    fn name(&self) -> &str {
        "replace-char"
    }

    fn status_text(&self) -> &str {
        "Replace"
    }
}

#[async_trait(?Send)]
impl Mode for ReplaceCharMode {
    fn cursor_style(&self) -> CursorStyle {
        CursorStyle::Underline
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let Some(c) = keys.first().and_then(Key::get_char) else {
            ctx.error("Invalid key for replace");
            return Ok(ctx.to_default());
        };

        let doc = ctx.editor.document();
        let carets: Vec<Position> = ctx.editor.selections().into_iter().map(|s| s.active).collect();
        let edits: Vec<TextEdit> = carets
            .iter()
            .filter(|p| doc.char_at(**p).is_some())
            .map(|p| TextEdit::replace(TextRange::new(*p, p.right(1)), c.to_string()))
            .collect();

        if edits.is_empty() {
            return Ok(ctx.to_default());
        }

        ctx.editor.apply_edits(edits).await?;

        let doc = ctx.editor.document();
        let carets = carets.into_iter().map(|p| Selection::caret(doc.clamp(p.right(1)))).collect();
        ctx.editor.set_selections(carets);

        Ok(ctx.to_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::editing::buffer::EditBuffer;
    use crate::editing::store::{MemoryClipboard, StatusLog};
    use crate::host::MessageLevel;
    use crate::motions::MotionRegistry;

    macro_rules! press {
        ($mode: expr, $keys: expr, $buf: expr, $status: expr) => {{
            let mut clip = MemoryClipboard::default();
            let config = SessionConfig::default();
            let motions = MotionRegistry::default();
            let keys = Key::parse_seq($keys).unwrap();
            let mut ctx = ModeContext {
                editor: &mut $buf,
                clipboard: &mut clip,
                status: &mut $status,
                config: &config,
                motions: &motions,
            };

            $mode.handle(&keys, &mut ctx).await.unwrap()
        }};
        ($mode: expr, $keys: expr, $buf: expr) => {{
            let mut status = StatusLog::default();

            press!($mode, $keys, $buf, status)
        }};
    }

    fn normal() -> ModeOutcome {
        ModeOutcome::Switch("normal".into())
    }

    #[test]
    fn test_find_chars() {
        let chars: Vec<char> = "abcABCabc".chars().collect();
        let needle = ['b', 'c'];

        assert_eq!(find_chars(&chars, &needle, 0, MoveDir1D::Next), Some(1));
        assert_eq!(find_chars(&chars, &needle, 2, MoveDir1D::Next), Some(4));
        assert_eq!(find_chars(&chars, &needle, 8, MoveDir1D::Next), None);
        assert_eq!(find_chars(&chars, &needle, 9, MoveDir1D::Previous), Some(7));
        assert_eq!(find_chars(&chars, &needle, 6, MoveDir1D::Previous), Some(4));
        assert_eq!(find_chars(&chars, &needle, 2, MoveDir1D::Previous), None);
    }

    #[tokio::test]
    async fn test_sneak() {
        let mode = SneakMode::forward();
        let mut buf = EditBuffer::from_marked("[]let foo = 1;\nlet Foo = 2;");

        assert_eq!(press!(mode, "f", buf), ModeOutcome::Pending);
        assert_eq!(press!(mode, "fo", buf), normal());
        assert_eq!(buf.render(), "let []foo = 1;\nlet Foo = 2;");

        assert_eq!(press!(mode, "fo", buf), normal());
        assert_eq!(buf.render(), "let foo = 1;\nlet []Foo = 2;");

        // Nothing further along, so the caret stays put.
        assert_eq!(press!(mode, "fo", buf), normal());
        assert_eq!(buf.render(), "let foo = 1;\nlet []Foo = 2;");

        let mode = SneakMode::backward();
        assert_eq!(press!(mode, "le", buf), normal());
        assert_eq!(buf.render(), "let foo = 1;\n[]let Foo = 2;");

        assert_eq!(press!(mode, "le", buf), normal());
        assert_eq!(buf.render(), "[]let foo = 1;\nlet Foo = 2;");
    }

    #[tokio::test]
    async fn test_char_search() {
        let mut buf = EditBuffer::from_marked("[]one\ntwo");
        assert_eq!(press!(CharSearchMode::find(), "w", buf), normal());
        assert_eq!(buf.render(), "one\ntw[]o");

        let mut buf = EditBuffer::from_marked("[]one\ntwo");
        assert_eq!(press!(CharSearchMode::till(), "w", buf), normal());
        assert_eq!(buf.render(), "one\nt[]wo");

        let mut buf = EditBuffer::from_marked("[]one\ntwo");
        let mut status = StatusLog::default();
        assert_eq!(press!(CharSearchMode::find(), "<up>", buf, status), normal());
        assert_eq!(
            status.last(),
            Some((MessageLevel::Error, "Invalid key for char search".into()))
        );
    }

    #[tokio::test]
    async fn test_go_to_line() {
        let mut buf = EditBuffer::from_marked("a\n[]b\nc\nd");

        assert_eq!(press!(GoToLineMode, "3", buf), ModeOutcome::Pending);
        assert_eq!(press!(GoToLineMode, "3\n", buf), normal());
        assert_eq!(buf.render(), "a\nb\n[]c\nd");
        assert_eq!(buf.revealed(), &[(2, RevealAt::Center)]);

        assert_eq!(press!(GoToLineMode, "40\n", buf), normal());
        assert_eq!(buf.render(), "a\nb\nc\nd[]");

        let mut status = StatusLog::default();
        assert_eq!(press!(GoToLineMode, "x\n", buf, status), ModeOutcome::Done);
        assert_eq!(status.last(), Some((MessageLevel::Error, "Invalid line number: x".into())));
    }

    #[tokio::test]
    async fn test_replace_char() {
        let mut buf = EditBuffer::from_marked("[]abc d[]ef gh[]");

        assert_eq!(press!(ReplaceCharMode, "x", buf), normal());
        assert_eq!(buf.render(), "x[]bc dx[]f gh[]");
        assert_eq!(ReplaceCharMode.cursor_style(), CursorStyle::Underline);
    }
}
