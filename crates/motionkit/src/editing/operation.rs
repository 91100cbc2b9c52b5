//! # Verb-object operations
//!
//! ## Overview
//!
//! An [Operation] is the verb half of a verb-object command. The object is a [MotionSpec],
//! which gets applied to every current selection to produce the ranges that the operation acts
//! upon. Selections whose motion doesn't find anything are skipped: they're left where they are,
//! and contribute nothing to the clipboard or to the batch of edits.
//!
//! Deletions from every selection are sent to the host as a single batch, so each range is
//! relative to the document as it was before the operation started.
use editor_types::prelude::{Selection, TextEdit, TextRange};

use crate::errors::{EditError, EditResult};
use crate::host::{Clipboard, EditorHandle};
use crate::motions::{MotionContext, MotionSpec};
use crate::util::merge_ranges;

/// A pending operation waiting for a motion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Replace each selection with the motion's result.
    Select,

    /// Copy the text the motion covers to the clipboard.
    Yank,

    /// Copy the text the motion covers to the clipboard, and then remove it.
    Delete,

    /// Remove the text the motion covers, and start inserting in its place.
    Change,
}

impl Operation {
    /// The name of the mode that waits for this operation's motion.
    pub fn mode_name(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Yank => "yank",
            Operation::Delete => "delete",
            Operation::Change => "change",
        }
    }

    /// Apply a motion to every selection, and then perform this operation on the results.
    ///
    /// Returns whether the motion matched anything that the operation could act on. For
    /// [Operation::Change], that decides whether the caller should start inserting.
    pub async fn run(
        &self,
        motion: &MotionSpec,
        editor: &mut dyn EditorHandle,
        clipboard: &mut dyn Clipboard,
    ) -> EditResult<bool> {
        if *self == Operation::Select {
            return select(motion, editor);
        }

        let ranges = motion_ranges(motion, editor)?;
        let matches = ranges.iter().flatten().count();

        tracing::debug!(op = self.mode_name(), ?motion, matches, "applying motion");

        return self.run_ranges(ranges, editor, clipboard).await;
    }

    /// Perform this operation on the current selections instead of a motion's results.
    pub async fn run_on_selections(
        &self,
        editor: &mut dyn EditorHandle,
        clipboard: &mut dyn Clipboard,
    ) -> EditResult<bool> {
        if *self == Operation::Select {
            return Ok(true);
        }

        let ranges = editor.selections().iter().map(|sel| Some(sel.range())).collect();

        return self.run_ranges(ranges, editor, clipboard).await;
    }

    async fn run_ranges(
        &self,
        ranges: Vec<Option<TextRange>>,
        editor: &mut dyn EditorHandle,
        clipboard: &mut dyn Clipboard,
    ) -> EditResult<bool> {
        match self {
            Operation::Select => Ok(ranges.iter().any(Option::is_some)),
            Operation::Yank => yank(&ranges, editor, clipboard).await,
            Operation::Delete => {
                if !yank(&ranges, editor, clipboard).await? {
                    return Ok(false);
                }

                remove(&ranges, editor).await
            },
            Operation::Change => remove(&ranges, editor).await,
        }
    }
}

/// Apply a motion to each selection, producing one result per selection.
///
/// Motions that need a syntax tree fail with [EditError::NoSyntaxTree] when the host doesn't
/// have one, so that the user can be told why nothing happened.
pub fn motion_ranges(
    motion: &MotionSpec,
    editor: &dyn EditorHandle,
) -> EditResult<Vec<Option<TextRange>>> {
    let syntax = editor.syntax();

    if motion.requires_syntax() && syntax.is_none() {
        return Err(EditError::NoSyntaxTree);
    }

    let ctx = MotionContext::new(editor.document(), syntax);
    let ranges = editor
        .selections()
        .iter()
        .map(|sel| motion.apply(sel, &ctx).first().map(Selection::range))
        .collect();

    Ok(ranges)
}

/// Move each selection to wherever the motion takes it, leaving alone the ones it can't move.
pub fn select(motion: &MotionSpec, editor: &mut dyn EditorHandle) -> EditResult<bool> {
    let syntax = editor.syntax();

    if motion.requires_syntax() && syntax.is_none() {
        return Err(EditError::NoSyntaxTree);
    }

    let ctx = MotionContext::new(editor.document(), syntax);
    let mut matched = false;

    let selections: Vec<Selection> = editor
        .selections()
        .into_iter()
        .map(|sel| match motion.apply(&sel, &ctx).into_iter().next() {
            Some(res) => {
                matched = true;
                res
            },
            None => sel,
        })
        .collect();

    editor.set_selections(selections);

    Ok(matched)
}

/// Join the text in each range, in selection order.
pub fn range_text(ranges: &[TextRange], editor: &dyn EditorHandle) -> String {
    let doc = editor.document();

    ranges
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| doc.text_in(r))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn yank(
    ranges: &[Option<TextRange>],
    editor: &mut dyn EditorHandle,
    clipboard: &mut dyn Clipboard,
) -> EditResult<bool> {
    let ranges: Vec<TextRange> = ranges.iter().flatten().cloned().collect();

    if ranges.iter().all(TextRange::is_empty) {
        return Ok(false);
    }

    clipboard.write_text(range_text(&ranges, editor)).await?;

    Ok(true)
}

/// Delete every non-empty range in one batch, leaving a caret where each one started.
///
/// Selections without a range to delete stay as they were.
async fn remove(ranges: &[Option<TextRange>], editor: &mut dyn EditorHandle) -> EditResult<bool> {
    let deleted = |r: &&TextRange| !r.is_empty();
    let edits: Vec<TextRange> = ranges.iter().flatten().filter(deleted).cloned().collect();

    if edits.is_empty() {
        return Ok(false);
    }

    let carets = editor
        .selections()
        .into_iter()
        .zip(ranges)
        .map(|(sel, range)| match range.as_ref().filter(deleted) {
            Some(range) => Selection::caret(range.start),
            None => sel,
        })
        .collect();
    let edits = merge_ranges(edits).into_iter().map(TextEdit::delete).collect();

    // The host moves the carets along with the text around them.
    editor.set_selections(carets);
    editor.apply_edits(edits).await?;

    Ok(true)
}
