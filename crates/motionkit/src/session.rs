//! # Editing sessions
//!
//! ## Overview
//!
//! A [Session] owns the registered modes, the pending keys and the shared clipboard, and feeds
//! typed keys through whichever mode is currently active. The host gives it the
//! [EditorHandle] to act on with each key, and renders the [StatusInfo] it publishes through
//! the [StatusDisplay].
//!
//! Keys typed in insert mode are handed back to the host as [KeyDisposition::PassThrough], so
//! that it can insert them as text. Typing the configured escape key returns to the default
//! mode from anywhere.
//!
//! ## Example
//!
//! ```
//! use motionkit::config::SessionConfig;
//! use motionkit::editing::buffer::EditBuffer;
//! use motionkit::editing::store::{MemoryClipboard, StatusLog};
//! use motionkit::session::Session;
//!
//! # tokio_test_block(async {
//! let mut buffer = EditBuffer::new("one two three");
//! let clipboard = MemoryClipboard::default();
//! let status = StatusLog::default();
//! let mut session = Session::new(SessionConfig::default(), clipboard.clone(), status).unwrap();
//!
//! session.feed("daw", &mut buffer).await.unwrap();
//!
//! assert_eq!(buffer.text(), "two three");
//! assert_eq!(clipboard.get(), "one ");
//! assert_eq!(session.mode(), "normal");
//! # });
//! # fn tokio_test_block<F: std::future::Future<Output = ()>>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
use std::sync::Arc;

use keybindings::{CommandChain, ModeInfo, ModeRegistry};

use crate::config::SessionConfig;
use crate::env::{default_modes, Mode, ModeContext, ModeOutcome};
use crate::errors::{EditError, EditResult};
use crate::host::{Clipboard, EditorHandle, MessageLevel, StatusDisplay, StatusInfo};
use crate::key::Key;
use crate::motions::MotionRegistry;

/// What the host should do with a key after the session has looked at it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyDisposition {
    /// The key was interpreted by the current mode.
    Consumed,

    /// The session is in insert mode, and the host should insert the key itself.
    PassThrough,
}

/// Modal input state for a single editor.
pub struct Session {
    config: SessionConfig,
    modes: ModeRegistry<dyn Mode, Key>,
    motions: MotionRegistry,
    clipboard: Box<dyn Clipboard>,
    status: Box<dyn StatusDisplay>,
}

impl Session {
    /// Create a session with every built-in mode registered, starting in the default mode.
    pub fn new<C, S>(config: SessionConfig, clipboard: C, status: S) -> EditResult<Self>
    where
        C: Clipboard + 'static,
        S: StatusDisplay + 'static,
    {
        let mut modes = ModeRegistry::new();

        for mode in default_modes(&config) {
            modes.register(mode)?;
        }

        modes.switch(&config.default_mode)?;

        let mut session = Session {
            config,
            modes,
            motions: MotionRegistry::default(),
            clipboard: Box::new(clipboard),
            status: Box::new(status),
        };

        session.update_status();

        Ok(session)
    }

    /// Register a mode implemented by the host.
    pub fn register_mode(&mut self, mode: Arc<dyn Mode>) -> EditResult {
        self.modes.register(mode)?;

        Ok(())
    }

    /// The motions that verb-object and selection modes look keys up in.
    pub fn motions_mut(&mut self) -> &mut MotionRegistry {
        &mut self.motions
    }

    /// The session's settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The name of the current mode.
    pub fn mode(&self) -> &str {
        self.modes.current_name().unwrap_or_default()
    }

    /// The keys typed since the current mode last finished handling a sequence.
    pub fn chain(&self) -> &CommandChain<Key> {
        self.modes.chain()
    }

    /// Discard any pending keys.
    pub fn reset_chain(&mut self) {
        self.modes.reset_chain();
        self.update_status();
    }

    /// Describe the current mode and pending keys.
    pub fn status(&self) -> StatusInfo {
        let Some(mode) = self.modes.current() else {
            return StatusInfo::default();
        };

        StatusInfo {
            mode: mode.name().to_string(),
            text: self.modes.status_line(&self.config.chain_placeholder),
            insert: mode.is_insert_mode(),
            cursor: mode.cursor_style(),
            color: mode.color().map(str::to_string),
        }
    }

    fn update_status(&mut self) {
        let info = self.status();
        self.status.update(&info);
    }

    fn notify(&mut self, level: MessageLevel, msg: &str) {
        match level {
            MessageLevel::Info => tracing::info!("{}", msg),
            MessageLevel::Warning => tracing::warn!("{}", msg),
            MessageLevel::Error => tracing::error!("{}", msg),
        }

        self.status.notify(level, msg);
    }

    /// Switch to another mode, running the exit hook of the current one and the enter hook of
    /// the new one.
    ///
    /// Failing hooks are reported, but don't stop the switch. Switching to an unknown mode is
    /// reported and leaves everything as it was.
    pub async fn change_mode(&mut self, name: &str, editor: &mut dyn EditorHandle) -> EditResult {
        let next = match self.modes.lookup(name) {
            Ok(mode) => mode,
            Err(e) => {
                self.notify(MessageLevel::Error, &e.to_string());
                return Err(e.into());
            },
        };

        let mut failures = vec![];

        if let Some(current) = self.modes.current().cloned() {
            let mut ctx = ModeContext {
                editor: &mut *editor,
                clipboard: self.clipboard.as_mut(),
                status: self.status.as_mut(),
                config: &self.config,
                motions: &self.motions,
            };

            if let Err(e) = current.exit(&mut ctx).await {
                failures.push(format!("Failed to leave {} mode: {}", current.name(), e));
            }
        }

        let previous = self.modes.switch(name)?;

        let mut ctx = ModeContext {
            editor,
            clipboard: self.clipboard.as_mut(),
            status: self.status.as_mut(),
            config: &self.config,
            motions: &self.motions,
        };

        if let Err(e) = next.enter(previous.as_deref(), &mut ctx).await {
            failures.push(format!("Failed to enter {} mode: {}", next.name(), e));
        }

        for msg in failures {
            self.notify(MessageLevel::Warning, &msg);
        }

        self.update_status();

        Ok(())
    }

    async fn to_default(&mut self, editor: &mut dyn EditorHandle) {
        let default = self.config.default_mode.clone();

        if self.mode() == default {
            self.modes.reset_chain();
            self.update_status();
        } else if self.change_mode(&default, editor).await.is_err() {
            self.modes.reset_chain();
            self.update_status();
        }
    }

    /// Process a single typed key.
    ///
    /// This returns once the key has been fully handled, including any edits and mode changes
    /// that it caused. Problems are reported through the [StatusDisplay] instead of being
    /// returned.
    pub async fn input_key(&mut self, key: Key, editor: &mut dyn EditorHandle) -> KeyDisposition {
        if key == self.config.escape_key {
            self.to_default(editor).await;

            return KeyDisposition::Consumed;
        }

        let Some(mode) = self.modes.current().cloned() else {
            return KeyDisposition::PassThrough;
        };

        if mode.is_insert_mode() {
            return KeyDisposition::PassThrough;
        }

        self.modes.push_key(key);

        let keys = self.modes.chain().keys().to_vec();

        tracing::debug!(mode = mode.name(), keys = %self.modes.chain(), "dispatching keys");

        let mut ctx = ModeContext {
            editor: &mut *editor,
            clipboard: self.clipboard.as_mut(),
            status: self.status.as_mut(),
            config: &self.config,
            motions: &self.motions,
        };

        match mode.handle(&keys, &mut ctx).await {
            Ok(ModeOutcome::Pending) => {
                self.update_status();
            },
            Ok(ModeOutcome::Done) => {
                self.modes.reset_chain();
                self.update_status();
            },
            Ok(ModeOutcome::Switch(name)) => {
                if self.change_mode(&name, editor).await.is_err() {
                    self.modes.reset_chain();
                    self.update_status();
                }
            },
            Err(e) => {
                let level = match e {
                    EditError::NoSyntaxTree => MessageLevel::Warning,
                    _ => MessageLevel::Error,
                };

                self.notify(level, &e.to_string());
                self.to_default(editor).await;
            },
        }

        return KeyDisposition::Consumed;
    }

    /// Parse a string of keys, like `"3dw"` or `"gl42<cr>"`, and process each of them.
    pub async fn feed(
        &mut self,
        keys: &str,
        editor: &mut dyn EditorHandle,
    ) -> EditResult<Vec<KeyDisposition>> {
        let mut dispositions = vec![];

        for key in Key::parse_seq(keys)? {
            dispositions.push(self.input_key(key, editor).await);
        }

        Ok(dispositions)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("mode", &self.mode())
            .field("chain", &self.modes.chain().to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::buffer::EditBuffer;
    use crate::editing::store::{MemoryClipboard, StatusLog};
    use crate::editing::syntax::tests::call_tree;
    use crate::host::CursorStyle;

    use async_trait::async_trait;
    use rand::Rng;

    macro_rules! session {
        () => {{
            let clipboard = MemoryClipboard::default();
            let status = StatusLog::default();
            let session =
                Session::new(SessionConfig::default(), clipboard.clone(), status.clone()).unwrap();

            (session, clipboard, status)
        }};
    }

    macro_rules! assert_mode {
        ($session: expr, $mode: expr) => {
            assert_eq!($session.mode(), $mode);
            assert!($session.chain().is_empty());
        };
    }

    #[tokio::test]
    async fn test_repeat_builtin() {
        let (mut session, _, _) = session!();
        let mut buf = EditBuffer::from_marked("[]a\nb\nc\nd\ne");

        session.feed("3j", &mut buf).await.unwrap();

        assert_eq!(buf.commands(), &["scrollLineDown"; 3]);
        assert_mode!(session, "normal");
    }

    #[tokio::test]
    async fn test_delete_word() {
        let (mut session, clipboard, _) = session!();
        let mut buf = EditBuffer::from_marked("[]one two");

        session.feed("d", &mut buf).await.unwrap();
        assert_mode!(session, "delete");

        session.feed("w", &mut buf).await.unwrap();
        assert_mode!(session, "normal");
        assert_eq!(buf.render(), "[]two");
        assert_eq!(clipboard.get(), "one ");
    }

    #[tokio::test]
    async fn test_unknown_keys_warn() {
        let (mut session, _, status) = session!();
        let mut buf = EditBuffer::from_marked("[]abc");

        session.feed("Q", &mut buf).await.unwrap();

        assert_mode!(session, "normal");
        assert_eq!(status.last(), Some((MessageLevel::Warning, "Unknown key sequence: Q.".into())));
    }

    #[tokio::test]
    async fn test_pending_chain_in_status() {
        let clipboard = MemoryClipboard::default();
        let status = StatusLog::default();
        let config = SessionConfig::builder().chain_placeholder("-").build();
        let mut session = Session::new(config, clipboard, status.clone()).unwrap();
        let mut buf = EditBuffer::from_marked("[]abc");

        assert_eq!(status.info().text, "Normal -");

        session.feed("2g", &mut buf).await.unwrap();
        assert_eq!(session.chain().to_string(), "2g");
        assert_eq!(status.info().text, "Normal 2g");

        session.reset_chain();
        assert_eq!(status.info().text, "Normal -");
    }

    #[tokio::test]
    async fn test_mode_change_resets_chain() {
        let (mut session, _, status) = session!();
        let mut buf = EditBuffer::from_marked("say \"h[]i\"");

        session.feed("ci", &mut buf).await.unwrap();
        assert_eq!(session.mode(), "change");
        assert_eq!(session.chain().to_string(), "i");

        session.feed("\"", &mut buf).await.unwrap();
        assert_mode!(session, "insert");
        assert_eq!(buf.render(), "say \"[]\"");

        let info = status.info();
        assert_eq!(info.mode, "insert");
        assert!(info.insert);
        assert_eq!(info.cursor, CursorStyle::Line);
    }

    #[tokio::test]
    async fn test_insert_passes_keys_through() {
        let (mut session, _, _) = session!();
        let mut buf = EditBuffer::from_marked("[]abc");

        let res = session.feed("ixy", &mut buf).await.unwrap();
        assert_eq!(res, vec![
            KeyDisposition::Consumed,
            KeyDisposition::PassThrough,
            KeyDisposition::PassThrough,
        ]);
        assert_mode!(session, "insert");

        let res = session.feed("<esc>", &mut buf).await.unwrap();
        assert_eq!(res, vec![KeyDisposition::Consumed]);
        assert_mode!(session, "normal");
    }

    #[tokio::test]
    async fn test_escape_clears_pending_keys() {
        let (mut session, _, _) = session!();
        let mut buf = EditBuffer::from_marked("[]abc");

        session.feed("3g", &mut buf).await.unwrap();
        assert!(!session.chain().is_empty());

        session.feed("<esc>", &mut buf).await.unwrap();
        assert_mode!(session, "normal");

        session.feed("y<esc>", &mut buf).await.unwrap();
        assert_mode!(session, "normal");
    }

    #[tokio::test]
    async fn test_missing_syntax_tree_is_reported() {
        let (mut session, _, status) = session!();
        let mut buf = EditBuffer::from_marked("fn f() { []}");

        session.feed("daf", &mut buf).await.unwrap();

        assert_mode!(session, "normal");
        assert_eq!(buf.text(), "fn f() { }");
        assert_eq!(
            status.last(),
            Some((MessageLevel::Warning, "No syntax tree is available for this document".into()))
        );

        let mut buf = EditBuffer::from_marked("let x = foo([]a, b);").with_syntax(call_tree());
        session.feed("daa", &mut buf).await.unwrap();
        assert_eq!(buf.text(), "let x = foo( b);");
    }

    #[derive(Debug)]
    struct Stubborn;

    impl ModeInfo for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        fn status_text(&self) -> &str {
            "Stubborn"
        }
    }

    #[async_trait(?Send)]
    impl Mode for Stubborn {
        async fn enter(&self, _: Option<&str>, _: &mut ModeContext<'_>) -> EditResult {
            Err(EditError::Failure("no entry".into()))
        }
    }

    #[tokio::test]
    async fn test_hooks_and_unknown_modes() {
        let (mut session, _, status) = session!();
        let mut buf = EditBuffer::from_marked("[]abc");

        session.register_mode(Arc::new(Stubborn)).unwrap();
        assert!(session.register_mode(Arc::new(Stubborn)).is_err());

        // A failing enter hook still completes the switch.
        session.change_mode("stubborn", &mut buf).await.unwrap();
        assert_mode!(session, "stubborn");
        assert_eq!(
            status.last(),
            Some((MessageLevel::Warning, "Failed to enter stubborn mode: Error: no entry".into()))
        );

        assert!(session.change_mode("nowhere", &mut buf).await.is_err());
        assert_mode!(session, "stubborn");
        assert_eq!(status.last().map(|(level, _)| level), Some(MessageLevel::Error));
    }

    #[tokio::test]
    async fn test_repeat_count_multiplies() {
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let lines = rng.gen_range(5..40);
            let count = rng.gen_range(1..lines);
            let text = vec!["x"; lines].join("\n");

            let (mut session, _, _) = session!();
            let mut once = EditBuffer::new(text.as_str());
            let mut repeated = EditBuffer::new(text.as_str());

            for _ in 0..count {
                session.feed("<down>", &mut once).await.unwrap();
            }

            session.feed(&format!("{count}<down>"), &mut repeated).await.unwrap();

            assert_eq!(once.render(), repeated.render());
            assert_eq!(once.commands(), repeated.commands());
            assert_eq!(repeated.commands().len(), count);
        }
    }
}
