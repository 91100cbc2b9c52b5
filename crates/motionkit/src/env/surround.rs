//! Modes that edit the delimiters around selections.
//!
//! [SurroundMode] works on the current selections. The others first pick what to surround
//! with a motion: [YouSurroundMode] takes any motion followed by a trigger character, while
//! [ChangeSurroundMode] and [DeleteSurroundMode] take the trigger of the pair already there and
//! select its contents with the matching inside-pair motion.
use async_trait::async_trait;

use editor_types::prelude::{Pair, Position, Selection};
use keybindings::ModeInfo;

use crate::editing::operation::motion_ranges;
use crate::editing::surround::{surround, surround_targets, SurroundAction};
use crate::errors::EditResult;
use crate::key::Key;
use crate::motions::{MotionLookup, MotionSpec};

use super::{keys_pattern, Mode, ModeContext, ModeOutcome};

const SURROUND_COLOR: &str = "#98c379";

fn trigger<'a>(key: &Key, ctx: &ModeContext<'a>) -> Option<(char, &'a Pair)> {
    let c = key.get_char()?;
    let pair = ctx.config.surround.get(c)?;

    Some((c, pair))
}

fn unknown_trigger(key: &Key, ctx: &mut ModeContext<'_>) -> ModeOutcome {
    ctx.warn(&format!("Unknown surround character: {}.", keys_pattern(&[*key])));
    ctx.to_default()
}

/// Pair each selection with the motion's result for it, keeping the ones it didn't match.
///
/// Returns nothing when the motion didn't match any of them.
fn motion_targets(
    motion: &MotionSpec,
    ctx: &ModeContext<'_>,
) -> EditResult<Option<Vec<(Selection, bool)>>> {
    let ranges = motion_ranges(motion, &*ctx.editor)?;

    if ranges.iter().all(Option::is_none) {
        return Ok(None);
    }

    let targets = ctx
        .editor
        .selections()
        .into_iter()
        .zip(ranges)
        .map(|(sel, range)| match range {
            Some(range) => (Selection::from(range), true),
            None => (sel, false),
        })
        .collect();

    Ok(Some(targets))
}

/// Surround what a motion covers for every selection it matches.
async fn surround_motion(
    motion: &MotionSpec,
    action: SurroundAction<'_>,
    ctx: &mut ModeContext<'_>,
) -> EditResult {
    if let Some(targets) = motion_targets(motion, ctx)? {
        surround_targets(ctx.editor, &ctx.config.surround, targets, action).await?;
    }

    Ok(())
}

/// Select the contents of the pair that `c` triggers, using its inside-pair motion.
async fn select_inside(
    c: char,
    action: SurroundAction<'_>,
    ctx: &mut ModeContext<'_>,
) -> EditResult<ModeOutcome> {
    let keys = [Key::Char('i'), Key::Char(c)];

    let MotionLookup::Found(motion) = ctx.motions.find(&keys) else {
        ctx.warn(&format!("Unknown motion: {}.", keys_pattern(&keys)));
        return Ok(ctx.to_default());
    };

    surround_motion(&motion, action, ctx).await?;

    Ok(ctx.to_default())
}

/// Mode for adding, replacing or deleting the delimiters around the current selections.
///
/// - `a<c>` wraps each selection in the pair triggered by `c`.
/// - `r<c>` swaps whatever pair surrounds each selection for the one triggered by `c`.
/// - `d` removes whatever pair surrounds each selection.
#[derive(Clone, Debug, Default)]
pub struct SurroundMode;

impl ModeInfo for SurroundMode {
    fn name(&self) -> &str {
        "surround"
    }

    fn status_text(&self) -> &str {
        "Surround"
    }
}

#[async_trait(?Send)]
impl Mode for SurroundMode {
    fn color(&self) -> Option<&str> {
        Some(SURROUND_COLOR)
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let action = match keys {
            [Key::Char('a' | 'r')] => return Ok(ModeOutcome::Pending),
            [Key::Char('d')] => SurroundAction::Delete,
            [Key::Char(op @ ('a' | 'r')), key] => {
                let Some((_, pair)) = trigger(key, ctx) else {
                    return Ok(unknown_trigger(key, ctx));
                };

                if *op == 'a' {
                    SurroundAction::Add(pair)
                } else {
                    SurroundAction::Replace(pair)
                }
            },
            _ => {
                ctx.warn(&format!("Unknown key sequence: {}.", keys_pattern(keys)));
                return Ok(ctx.to_default());
            },
        };

        surround(ctx.editor, &ctx.config.surround, action).await?;

        Ok(ctx.to_default())
    }
}

/// Mode for wrapping what a motion covers in a pair.
///
/// The keys are a motion followed by the trigger character, like `iw(`. `s<c>` wraps each
/// caret's line, leaving its indentation outside.
#[derive(Clone, Debug, Default)]
pub struct YouSurroundMode;

impl ModeInfo for YouSurroundMode {
    fn name(&self) -> &str {
        "you-surround"
    }

    fn status_text(&self) -> &str {
        "Surround With"
    }
}

#[async_trait(?Send)]
impl Mode for YouSurroundMode {
    fn color(&self) -> Option<&str> {
        Some(SURROUND_COLOR)
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let Some((last, motion_keys)) = keys.split_last() else {
            return Ok(ModeOutcome::Pending);
        };

        if motion_keys.is_empty() {
            return Ok(ModeOutcome::Pending);
        }

        if motion_keys == [Key::Char('s')] {
            let Some((_, pair)) = trigger(last, ctx) else {
                return Ok(unknown_trigger(last, ctx));
            };

            let doc = ctx.editor.document();
            let lines = ctx
                .editor
                .selections()
                .into_iter()
                .map(|sel| {
                    let line = sel.active.line;
                    let start = Position::new(line, doc.first_non_whitespace(line));
                    let end = Position::new(line, doc.line_len(line));

                    Selection::new(start, end)
                })
                .collect();

            ctx.editor.set_selections(lines);
            surround(ctx.editor, &ctx.config.surround, SurroundAction::Add(pair)).await?;

            return Ok(ctx.to_default());
        }

        let motion = match ctx.motions.find(motion_keys) {
            MotionLookup::Found(motion) => motion,
            MotionLookup::Partial => return Ok(ModeOutcome::Pending),
            MotionLookup::Unknown => {
                // The last key may belong to a longer motion rather than being a trigger.
                let triggers = keys.iter().any(|k| trigger(k, ctx).is_some());

                if !triggers && matches!(ctx.motions.find(keys), MotionLookup::Partial) {
                    return Ok(ModeOutcome::Pending);
                }

                ctx.warn(&format!("Unknown motion: {}.", keys_pattern(motion_keys)));
                return Ok(ctx.to_default());
            },
        };

        let Some((_, pair)) = trigger(last, ctx) else {
            return Ok(unknown_trigger(last, ctx));
        };

        surround_motion(&motion, SurroundAction::Add(pair), ctx).await?;

        Ok(ctx.to_default())
    }
}

/// Mode for swapping one pair for another, like `({` to turn parentheses into braces.
#[derive(Clone, Debug, Default)]
pub struct ChangeSurroundMode;

impl ModeInfo for ChangeSurroundMode {
    fn name(&self) -> &str {
        "change-surround"
    }

    fn status_text(&self) -> &str {
        "Change Surround"
    }
}

#[async_trait(?Send)]
impl Mode for ChangeSurroundMode {
    fn color(&self) -> Option<&str> {
        Some(SURROUND_COLOR)
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let (old, new) = match keys {
            [old] => {
                if trigger(old, ctx).is_none() {
                    return Ok(unknown_trigger(old, ctx));
                }

                return Ok(ModeOutcome::Pending);
            },
            [old, new, ..] => (old, new),
            [] => return Ok(ModeOutcome::Pending),
        };

        let Some((old, _)) = trigger(old, ctx) else {
            return Ok(unknown_trigger(old, ctx));
        };

        let Some((_, pair)) = trigger(new, ctx) else {
            return Ok(unknown_trigger(new, ctx));
        };

        select_inside(old, SurroundAction::Replace(pair), ctx).await
    }
}

/// Mode for removing a pair, like `(` to delete the parentheses around the caret.
#[derive(Clone, Debug, Default)]
pub struct DeleteSurroundMode;

impl ModeInfo for DeleteSurroundMode {
    fn name(&self) -> &str {
        "delete-surround"
    }

    fn status_text(&self) -> &str {
        "Delete Surround"
    }
}

#[async_trait(?Send)]
impl Mode for DeleteSurroundMode {
    fn color(&self) -> Option<&str> {
        Some(SURROUND_COLOR)
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let Some(key) = keys.first() else {
            return Ok(ModeOutcome::Pending);
        };

        let Some((c, _)) = trigger(key, ctx) else {
            return Ok(unknown_trigger(key, ctx));
        };

        select_inside(c, SurroundAction::Delete, ctx).await
    }
}
