use async_trait::async_trait;

use keybindings::{resolve, KeyDefinition, KeyMap, ModeInfo, Resolution};

use crate::editing::operation;
use crate::errors::EditResult;
use crate::host::CursorStyle;
use crate::key::Key;
use crate::motions::MotionLookup;

use super::{keys_pattern, Command, Mode, ModeContext, ModeOutcome};

/// What a [KeyMapMode] does with keys that don't match any of its bindings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NoMatchPolicy {
    /// Quietly discard the keys.
    Reset,

    /// Show a warning, and discard the keys.
    Warn,

    /// Show a warning, and switch to another mode.
    WarnAndSwitch(String),
}

/// A mode whose keys are bound to [Command]s in a [KeyMap].
///
/// A mode can also be set up to try the keys as a motion before looking at its bindings. A
/// matching motion moves every selection, and then switches to the mode given to
/// [KeyMapMode::select_motions], if any.
#[derive(Debug)]
pub struct KeyMapMode {
    name: String,
    status: String,
    cursor: CursorStyle,
    color: Option<String>,
    map: KeyMap<Command>,
    no_match: NoMatchPolicy,
    on_enter: Option<Command>,
    motions: Option<Option<String>>,
}

impl KeyMapMode {
    /// Create a mode without any bindings.
    pub fn new<N: Into<String>, S: Into<String>>(name: N, status: S) -> Self {
        KeyMapMode {
            name: name.into(),
            status: status.into(),
            cursor: CursorStyle::Block,
            color: None,
            map: KeyMap::new(),
            no_match: NoMatchPolicy::Warn,
            on_enter: None,
            motions: None,
        }
    }

    /// Add bindings.
    pub fn bind<I: IntoIterator<Item = KeyDefinition<Command>>>(mut self, defs: I) -> Self {
        self.map.extend(defs);
        self
    }

    /// Set what happens to keys that don't match any binding.
    pub fn no_match(mut self, policy: NoMatchPolicy) -> Self {
        self.no_match = policy;
        self
    }

    /// Set a command to run whenever this mode is entered.
    pub fn on_enter(mut self, cmd: Command) -> Self {
        self.on_enter = Some(cmd);
        self
    }

    /// Try keys as motions before looking at the bindings, and switch to `leave_in` afterwards.
    pub fn select_motions(mut self, leave_in: Option<String>) -> Self {
        self.motions = Some(leave_in);
        self
    }

    /// Set the cursor shape.
    pub fn with_cursor(mut self, cursor: CursorStyle) -> Self {
        self.cursor = cursor;
        self
    }

    /// Set the color hint.
    pub fn with_color<T: Into<String>>(mut self, color: T) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The bindings in this mode.
    pub fn keymap(&self) -> &KeyMap<Command> {
        &self.map
    }

    fn unmatched(&self, keys: &str, ctx: &mut ModeContext<'_>) -> ModeOutcome {
        match &self.no_match {
            NoMatchPolicy::Reset => ModeOutcome::Done,
            NoMatchPolicy::Warn => {
                ctx.warn(&format!("Unknown key sequence: {keys}."));
                ModeOutcome::Done
            },
            NoMatchPolicy::WarnAndSwitch(mode) => {
                ctx.warn(&format!("Unknown key sequence: {keys}."));
                ModeOutcome::Switch(mode.clone())
            },
        }
    }
}

impl ModeInfo for KeyMapMode {
    fn name(&self) -> &str {
        &self.name
    }

    fn status_text(&self) -> &str {
        &self.status
    }
}

#[async_trait(?Send)]
impl Mode for KeyMapMode {
    fn cursor_style(&self) -> CursorStyle {
        self.cursor
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    async fn enter(&self, _: Option<&str>, ctx: &mut ModeContext<'_>) -> EditResult {
        if let Some(cmd) = &self.on_enter {
            cmd.run(1, ctx).await?;
        }

        Ok(())
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        let pattern = keys_pattern(keys);
        let mut partial = false;

        if let Some(leave_in) = &self.motions {
            match ctx.motions.find(keys) {
                MotionLookup::Found(motion) => {
                    tracing::debug!(mode = %self.name, keys = %pattern, ?motion, "selecting with motion");
                    operation::select(&motion, ctx.editor)?;

                    return match leave_in {
                        Some(mode) => Ok(ModeOutcome::Switch(mode.clone())),
                        None => Ok(ModeOutcome::Done),
                    };
                },
                MotionLookup::Partial => partial = true,
                MotionLookup::Unknown => {},
            }
        }

        match resolve(&self.map, &pattern) {
            Resolution::Matched { def, count } => {
                let count = ctx.config.clamp_count(count);

                tracing::debug!(mode = %self.name, keys = %pattern, count, "running binding");

                let target = match &def.action {
                    Some(cmd) => cmd.run(count, ctx).await?,
                    None => None,
                };

                match target.or_else(|| def.leave_in_mode.clone()) {
                    Some(mode) => Ok(ModeOutcome::Switch(mode)),
                    None => Ok(ModeOutcome::Done),
                }
            },
            Resolution::Partial => Ok(ModeOutcome::Pending),
            Resolution::NoMatch if partial => Ok(ModeOutcome::Pending),
            Resolution::NoMatch => Ok(self.unmatched(&pattern, ctx)),
        }
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

    struct Harness {
        buf: EditBuffer,
        clip: MemoryClipboard,
        status: StatusLog,
        config: SessionConfig,
        motions: MotionRegistry,
    }

    impl Harness {
        fn new(marked: &str) -> Self {
            Harness {
                buf: EditBuffer::from_marked(marked),
                clip: MemoryClipboard::default(),
                status: StatusLog::default(),
                config: SessionConfig::default(),
                motions: MotionRegistry::default(),
            }
        }

        async fn handle(&mut self, mode: &KeyMapMode, keys: &str) -> ModeOutcome {
            let keys = Key::parse_seq(keys).unwrap();
            let mut ctx = ModeContext {
                editor: &mut self.buf,
                clipboard: &mut self.clip,
                status: &mut self.status,
                config: &self.config,
                motions: &self.motions,
            };

            mode.handle(&keys, &mut ctx).await.unwrap()
        }
    }

    fn test_mode() -> KeyMapMode {
        KeyMapMode::new("test", "Test").bind([
            KeyDefinition::new("j").action(Command::builtin("cursorDown")),
            KeyDefinition::new("gg").action(Command::builtin("cursorTop")),
            KeyDefinition::new("i").leave_in("insert"),
            KeyDefinition::new("A").action(Command::builtin("cursorEnd")).leave_in("insert"),
        ])
    }

    #[tokio::test]
    async fn test_matched_with_count() {
        let mut h = Harness::new("[]a\nb\nc\nd");
        let mode = test_mode();

        assert_eq!(h.handle(&mode, "2j").await, ModeOutcome::Done);
        assert_eq!(h.buf.render(), "a\nb\n[]c\nd");
        assert_eq!(h.handle(&mode, "i").await, ModeOutcome::Switch("insert".into()));
        assert_eq!(h.handle(&mode, "A").await, ModeOutcome::Switch("insert".into()));
        assert_eq!(h.buf.render(), "a\nb\nc[]\nd");
    }

    #[tokio::test]
    async fn test_partial() {
        let mut h = Harness::new("[]a");
        let mode = test_mode();

        assert_eq!(h.handle(&mode, "g").await, ModeOutcome::Pending);
        assert_eq!(h.handle(&mode, "12").await, ModeOutcome::Pending);
        assert!(h.status.messages().is_empty());
    }

    #[tokio::test]
    async fn test_no_match_policies() {
        let mut h = Harness::new("[]a");

        let mode = test_mode();
        assert_eq!(h.handle(&mode, "Q").await, ModeOutcome::Done);
        assert_eq!(
            h.status.last(),
            Some((MessageLevel::Warning, "Unknown key sequence: Q.".to_string()))
        );

        h.status.clear();
        let mode = test_mode().no_match(NoMatchPolicy::Reset);
        assert_eq!(h.handle(&mode, "Q").await, ModeOutcome::Done);
        assert!(h.status.messages().is_empty());

        let mode = test_mode().no_match(NoMatchPolicy::WarnAndSwitch("normal".into()));
        assert_eq!(h.handle(&mode, "gx").await, ModeOutcome::Switch("normal".into()));
        assert_eq!(h.status.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_motions_first() {
        let mut h = Harness::new("say \"hel[]lo\"");
        let mode = test_mode().select_motions(Some("normal".into()));

        // "i" is both a binding and the start of several motions.
        assert_eq!(h.handle(&mode, "i").await, ModeOutcome::Switch("insert".into()));
        assert_eq!(h.handle(&mode, "a").await, ModeOutcome::Pending);
        assert_eq!(h.handle(&mode, "i\"").await, ModeOutcome::Switch("normal".into()));
        assert_eq!(h.buf.render(), "say \"[hello]\"");
    }
}
