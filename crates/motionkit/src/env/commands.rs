//! # Key map commands
//!
//! ## Overview
//!
//! A [Command] is what a binding in a [KeyMapMode](super::KeyMapMode) runs. Host built-ins are
//! run once for every repeat, while [CustomCommand]s and [CustomHandler]s are run a single time
//! and given the count to use as they see fit.
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use editor_types::prelude::{MoveDir1D, Selection, TextEdit};
use editor_types::Document;

use crate::editing::operation::{self, Operation};
use crate::editing::syntax::{NodeId, SyntaxTree};
use crate::errors::{EditError, EditResult};
use crate::host::RevealAt;
use crate::motions::{matching_bracket, MotionSpec};

use super::select::grow_line_selection;
use super::ModeContext;

/// A command implemented outside of this crate.
#[async_trait(?Send)]
pub trait CustomHandler: Debug {
    /// Run the command.
    ///
    /// Returning a mode name switches to it, overriding whatever mode the binding specifies.
    async fn run(&self, count: usize, ctx: &mut ModeContext<'_>) -> EditResult<Option<String>>;
}

/// Ways of moving a selection around the syntax tree.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SmartSelect {
    /// Select the parent of the selected node.
    Expand,

    /// Select the first named child of the selected node.
    Shrink,

    /// Select the next named sibling, looking at ancestors when there isn't one.
    NextSibling,

    /// Select the previous named sibling, looking at ancestors when there isn't one.
    PreviousSibling,
}

/// Commands implemented by the engine itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CustomCommand {
    /// Move each caret one character right, unless it's at the end of its line.
    AppendAfterCaret,

    /// Replace each selection with the clipboard's contents.
    Paste,

    /// Move each selection with a motion, once per count.
    SelectMotion(MotionSpec),

    /// Scroll so that the primary caret's line is centered.
    RevealCaretLine,

    /// Perform an operation on the current selections.
    Operate(Operation),

    /// Move each caret to the bracket matching the one it's on.
    JumpToMatchingBracket,

    /// Move each selection around the syntax tree.
    SmartSelect(SmartSelect),

    /// Grow or shrink whole-line selections by a line.
    GrowLines(MoveDir1D),
}

/// The action bound to keys in a [KeyMapMode](super::KeyMapMode).
#[derive(Clone, Debug)]
pub enum Command {
    /// Run one of the host's built-in commands.
    BuiltIn {
        /// The command's name.
        name: String,

        /// Static arguments to pass along.
        args: Option<Value>,
    },

    /// Run a command implemented by the engine.
    Custom(CustomCommand),

    /// Run a command implemented by the host application.
    Handler(Arc<dyn CustomHandler>),
}

impl Command {
    /// Create a command that runs a host built-in without arguments.
    pub fn builtin<T: Into<String>>(name: T) -> Self {
        Command::BuiltIn { name: name.into(), args: None }
    }

    /// Create a command that runs a host built-in with arguments.
    pub fn builtin_with<T: Into<String>>(name: T, args: Value) -> Self {
        Command::BuiltIn { name: name.into(), args: Some(args) }
    }

    /// Run this command, and return the mode it wants to switch to, if any.
    pub async fn run(&self, count: usize, ctx: &mut ModeContext<'_>) -> EditResult<Option<String>> {
        match self {
            Command::BuiltIn { name, args } => {
                for _ in 0..count {
                    // A failed command is reported, but the binding still finishes normally.
                    if let Err(e) = ctx.editor.execute_command(name, args.as_ref()).await {
                        ctx.warn(&e.to_string());
                        break;
                    }
                }

                Ok(None)
            },
            Command::Custom(cmd) => {
                cmd.run(count, ctx).await?;

                Ok(None)
            },
            Command::Handler(handler) => handler.run(count, ctx).await,
        }
    }
}

impl From<CustomCommand> for Command {
    fn from(cmd: CustomCommand) -> Self {
        Command::Custom(cmd)
    }
}

impl CustomCommand {
    async fn run(&self, count: usize, ctx: &mut ModeContext<'_>) -> EditResult {
        match self {
            CustomCommand::AppendAfterCaret => {
                let doc = ctx.editor.document();
                let carets = ctx
                    .editor
                    .selections()
                    .into_iter()
                    .map(|sel| {
                        let pos = sel.active;

                        if pos.column < doc.line_len(pos.line) {
                            Selection::caret(pos.right(1))
                        } else {
                            Selection::caret(pos)
                        }
                    })
                    .collect();

                ctx.editor.set_selections(carets);
            },
            CustomCommand::Paste => {
                let text = ctx.clipboard.read_text().await?.repeat(count);
                let selections = ctx.editor.selections();
                let edits = selections.iter().map(|s| TextEdit::replace(s.range(), text.as_str()));

                ctx.editor.apply_edits(edits.collect()).await?;

                let carets = ctx.editor.selections().iter().map(|s| Selection::caret(s.end())).collect();
                ctx.editor.set_selections(carets);
            },
            CustomCommand::SelectMotion(motion) => {
                for _ in 0..count {
                    if !operation::select(motion, ctx.editor)? {
                        break;
                    }
                }
            },
            CustomCommand::RevealCaretLine => {
                let line = ctx.editor.selections().first().map(|s| s.active.line).unwrap_or(0);

                ctx.editor.reveal_line(line, RevealAt::Center).await?;
            },
            CustomCommand::Operate(op) => {
                op.run_on_selections(ctx.editor, ctx.clipboard).await?;
            },
            CustomCommand::JumpToMatchingBracket => {
                let doc = ctx.editor.document();
                let selections = ctx
                    .editor
                    .selections()
                    .into_iter()
                    .map(|sel| {
                        matching_bracket(doc, sel.active).map(Selection::caret).unwrap_or(sel)
                    })
                    .collect();

                ctx.editor.set_selections(selections);
            },
            CustomCommand::SmartSelect(kind) => {
                for _ in 0..count {
                    smart_select(*kind, ctx)?;
                }
            },
            CustomCommand::GrowLines(dir) => {
                let doc = ctx.editor.document();
                let selections = ctx
                    .editor
                    .selections()
                    .into_iter()
                    .map(|sel| (0..count).fold(sel, |sel, _| grow_line_selection(&sel, *dir, doc)))
                    .collect();

                ctx.editor.set_selections(selections);
            },
        }

        Ok(())
    }
}

/// Find the node that a smart selection command moves away from.
fn selected_node(tree: &dyn SyntaxTree, sel: &Selection) -> Option<NodeId> {
    tree.named_descendant_for_range(&sel.range())
}

fn sibling(tree: &dyn SyntaxTree, mut node: NodeId, dir: MoveDir1D) -> Option<NodeId> {
    loop {
        let next = match dir {
            MoveDir1D::Next => tree.next_named_sibling(node),
            MoveDir1D::Previous => tree.prev_named_sibling(node),
        };

        if next.is_some() {
            return next;
        }

        node = tree.parent(node)?;
    }
}

fn smart_select_one(kind: SmartSelect, tree: &dyn SyntaxTree, sel: Selection) -> Selection {
    let Some(node) = selected_node(tree, &sel) else {
        return sel;
    };

    let exact = tree.range(node) == sel.range();

    let target = match kind {
        SmartSelect::Expand if exact => tree.parent(node),
        SmartSelect::Expand => Some(node),
        SmartSelect::Shrink if exact => {
            tree.children(node).into_iter().find(|c| tree.is_named(*c))
        },
        SmartSelect::Shrink => None,
        SmartSelect::NextSibling => sibling(tree, node, MoveDir1D::Next),
        SmartSelect::PreviousSibling => sibling(tree, node, MoveDir1D::Previous),
    };

    match target {
        Some(target) => Selection::from(tree.range(target)),
        None => sel,
    }
}

fn smart_select(kind: SmartSelect, ctx: &mut ModeContext<'_>) -> EditResult {
    let Some(tree) = ctx.editor.syntax() else {
        return Err(EditError::NoSyntaxTree);
    };

    let selections = ctx
        .editor
        .selections()
        .into_iter()
        .map(|sel| smart_select_one(kind, tree, sel))
        .collect();

    ctx.editor.set_selections(selections);

    Ok(())
}
