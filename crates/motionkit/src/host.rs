//! # Host collaborators
//!
//! ## Overview
//!
//! The engine doesn't own any text. Everything it reads or changes goes through the traits in
//! this module, which a host editor implements:
//!
//! - [EditorHandle] gives access to the document, the selections, the syntax tree, atomic batch
//!   edits and the host's built-in commands.
//! - [Clipboard] stores text that gets yanked, deleted or pasted.
//! - [StatusDisplay] shows the current mode and transient messages.
//!
//! All of the asynchronous methods use [async_trait] without requiring `Send`, since keys are
//! processed one at a time on a single task.
//!
//! [EditBuffer](crate::editing::buffer::EditBuffer),
//! [MemoryClipboard](crate::editing::store::MemoryClipboard) and
//! [StatusLog](crate::editing::store::StatusLog) provide in-memory implementations of each.
use async_trait::async_trait;
use serde_json::Value;

use editor_types::prelude::{Selection, TextEdit};
use editor_types::Document;

use crate::editing::syntax::SyntaxTree;
use crate::errors::HostError;

/// Where a line should be placed within the viewport when revealing it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RevealAt {
    /// Scroll so that the line is at the top of the viewport.
    Top,

    /// Scroll so that the line is in the middle of the viewport.
    #[default]
    Center,

    /// Scroll so that the line is at the bottom of the viewport.
    Bottom,
}

/// Shape of the cursor to draw while a mode is active.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CursorStyle {
    /// A block covering the next character.
    #[default]
    Block,

    /// A thin line between two characters.
    Line,

    /// An underline beneath the next character.
    Underline,
}

/// How important a transient message is.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MessageLevel {
    /// Informational message.
    Info,

    /// Something the user asked for couldn't be done.
    Warning,

    /// Something failed.
    Error,
}

/// What the host should display to describe the current mode.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusInfo {
    /// Name of the current mode.
    pub mode: String,

    /// Status text, made up of the mode's description and the pending keys.
    pub text: String,

    /// Whether the current mode inserts typed text.
    pub insert: bool,

    /// Cursor shape to use.
    pub cursor: CursorStyle,

    /// Optional color hint for the status text.
    pub color: Option<String>,
}

/// Access to the editor that keys are being typed into.
#[async_trait(?Send)]
pub trait EditorHandle {
    /// The text of the document being edited.
    fn document(&self) -> &dyn Document;

    /// The current selections, in order.
    fn selections(&self) -> Vec<Selection>;

    /// Replace all of the current selections.
    fn set_selections(&mut self, selections: Vec<Selection>);

    /// The syntax tree for the document, if the host has one.
    fn syntax(&self) -> Option<&dyn SyntaxTree> {
        None
    }

    /// Apply several edits as one atomic change.
    ///
    /// Every range is relative to the document before any of the edits are made.
    async fn apply_edits(&mut self, edits: Vec<TextEdit>) -> Result<(), HostError>;

    /// Run one of the host's built-in commands by name.
    async fn execute_command(&mut self, name: &str, args: Option<&Value>)
        -> Result<(), HostError>;

    /// Scroll the viewport so that a line is visible.
    async fn reveal_line(&mut self, line: usize, at: RevealAt) -> Result<(), HostError>;
}

/// Shared text storage used for yanking and pasting.
#[async_trait(?Send)]
pub trait Clipboard {
    /// Fetch the current contents.
    async fn read_text(&mut self) -> Result<String, HostError>;

    /// Replace the current contents.
    async fn write_text(&mut self, text: String) -> Result<(), HostError>;
}

/// Where mode information and messages get shown to the user.
pub trait StatusDisplay {
    /// Show the current mode.
    fn update(&mut self, info: &StatusInfo);

    /// Show a transient message.
    fn notify(&mut self, level: MessageLevel, msg: &str);
}
