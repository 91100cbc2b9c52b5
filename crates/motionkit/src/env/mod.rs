//! # Modes
//!
//! ## Overview
//!
//! Every mode implements [Mode]. When a key is typed, the [Session](crate::session::Session)
//! appends it to the pending chain and hands the whole chain to the current mode's
//! [Mode::handle], which reports back through a [ModeOutcome] whether it needs more keys, is
//! done, or wants to switch to another mode.
//!
//! Most modes are [KeyMapMode]s, which resolve the chain against a
//! [KeyMap](keybindings::KeyMap) of [Command]s. The rest parse their keys themselves:
//!
//! - [VerbObjectMode] waits for a motion, and then changes, deletes or yanks what it covers.
//! - [SurroundMode] and the motion-qualified [YouSurroundMode], [ChangeSurroundMode] and
//!   [DeleteSurroundMode] edit the delimiters around selections.
//! - [SneakMode], [CharSearchMode], [GoToLineMode] and [ReplaceCharMode] take a character or
//!   a line number as their argument.
//! - [LineSelectMode] grows and shrinks whole-line selections.
//! - [InsertMode] doesn't interpret keys at all.
//!
//! [default_modes] creates the full set that a session registers on startup.
use std::sync::Arc;

use async_trait::async_trait;

use keybindings::{InputKey, ModeInfo};

use crate::config::SessionConfig;
use crate::errors::EditResult;
use crate::host::{Clipboard, CursorStyle, EditorHandle, MessageLevel, StatusDisplay};
use crate::key::Key;
use crate::motions::MotionRegistry;

mod commands;
mod keymap;
mod normal;
mod object;
mod search;
mod select;
mod surround;

pub use self::commands::{Command, CustomCommand, CustomHandler, SmartSelect};
pub use self::keymap::{KeyMapMode, NoMatchPolicy};
pub use self::normal::{match_mode, normal_mode};
pub use self::object::VerbObjectMode;
pub use self::search::{CharSearchMode, GoToLineMode, ReplaceCharMode, SneakMode};
pub use self::select::{select_mode, shared_selection_keys, smart_select_mode, LineSelectMode};
pub use self::surround::{ChangeSurroundMode, DeleteSurroundMode, SurroundMode, YouSurroundMode};

/// What a mode wants to happen after handling the pending keys.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModeOutcome {
    /// The keys are incomplete. Keep them and wait for more.
    Pending,

    /// The keys were handled. Empty the chain and stay in this mode.
    Done,

    /// The keys were handled. Switch to the named mode.
    Switch(String),
}

/// Everything a mode can use while handling keys.
pub struct ModeContext<'a> {
    /// The editor that keys are being typed into.
    pub editor: &'a mut dyn EditorHandle,

    /// Shared clipboard.
    pub clipboard: &'a mut dyn Clipboard,

    /// Where messages get shown.
    pub status: &'a mut dyn StatusDisplay,

    /// Session settings.
    pub config: &'a SessionConfig,

    /// The motions available to verb-object and selection modes.
    pub motions: &'a MotionRegistry,
}

impl<'a> ModeContext<'a> {
    /// Show an informational message.
    pub fn info(&mut self, msg: &str) {
        self.status.notify(MessageLevel::Info, msg);
    }

    /// Show a warning.
    pub fn warn(&mut self, msg: &str) {
        tracing::warn!("{}", msg);
        self.status.notify(MessageLevel::Warning, msg);
    }

    /// Show an error.
    pub fn error(&mut self, msg: &str) {
        tracing::error!("{}", msg);
        self.status.notify(MessageLevel::Error, msg);
    }

    /// Switch to the default mode.
    pub fn to_default(&self) -> ModeOutcome {
        ModeOutcome::Switch(self.config.default_mode.clone())
    }
}

/// A mode that typed keys get interpreted in.
///
/// Only [ModeInfo::name] and [ModeInfo::status_text] need to be provided. Everything else has a
/// default that does nothing.
#[async_trait(?Send)]
pub trait Mode: ModeInfo {
    /// Cursor shape to show while this mode is active.
    fn cursor_style(&self) -> CursorStyle {
        CursorStyle::Block
    }

    /// Optional color hint for the status text.
    fn color(&self) -> Option<&str> {
        None
    }

    /// Called after switching into this mode from `previous`.
    async fn enter(&self, _previous: Option<&str>, _ctx: &mut ModeContext<'_>) -> EditResult {
        Ok(())
    }

    /// Called before switching out of this mode.
    async fn exit(&self, _ctx: &mut ModeContext<'_>) -> EditResult {
        Ok(())
    }

    /// Interpret the keys typed since the chain was last emptied.
    async fn handle(&self, _keys: &[Key], _ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        Ok(ModeOutcome::Done)
    }
}

/// Mode where typed keys insert text instead of being interpreted.
#[derive(Clone, Debug, Default)]
pub struct InsertMode;

impl ModeInfo for InsertMode {
    fn name(&self) -> &str {
        "insert"
    }

    fn status_text(&self) -> &str {
        "Insert"
    }

    fn is_insert_mode(&self) -> bool {
        true
    }
}

#[async_trait(?Send)]
impl Mode for InsertMode {
    fn cursor_style(&self) -> CursorStyle {
        CursorStyle::Line
    }
}

/// The written form of some keys, for use in messages.
pub(crate) fn keys_pattern(keys: &[Key]) -> String {
    let mut out = String::new();

    for key in keys {
        key.write_pattern(&mut out);
    }

    return out;
}

/// Create every built-in mode.
pub fn default_modes(config: &SessionConfig) -> Vec<Arc<dyn Mode>> {
    let default = config.default_mode.as_str();

    vec![
        Arc::new(normal_mode()),
        Arc::new(InsertMode),
        Arc::new(select_mode()),
        Arc::new(LineSelectMode::default()),
        Arc::new(smart_select_mode()),
        Arc::new(match_mode(default)),
        Arc::new(VerbObjectMode::change()),
        Arc::new(VerbObjectMode::delete()),
        Arc::new(VerbObjectMode::yank()),
        Arc::new(SurroundMode),
        Arc::new(YouSurroundMode),
        Arc::new(ChangeSurroundMode),
        Arc::new(DeleteSurroundMode),
        Arc::new(SneakMode::forward()),
        Arc::new(SneakMode::backward()),
        Arc::new(CharSearchMode::find()),
        Arc::new(CharSearchMode::till()),
        Arc::new(GoToLineMode),
        Arc::new(ReplaceCharMode),
    ]
}
