use async_trait::async_trait;

use keybindings::ModeInfo;

use crate::editing::operation::Operation;
use crate::errors::EditResult;
use crate::key::Key;
use crate::motions::MotionLookup;

use super::{keys_pattern, Mode, ModeContext, ModeOutcome};

/// Mode that waits for a motion, and then performs an [Operation] on what it covers.
///
/// Typing `s` instead of a motion continues on to the surround mode that matches the operation.
#[derive(Clone, Debug)]
pub struct VerbObjectMode {
    op: Operation,
    status: &'static str,
    surround: &'static str,
}

impl VerbObjectMode {
    /// Mode that replaces what a motion covers.
    pub fn change() -> Self {
        VerbObjectMode { op: Operation::Change, status: "Change", surround: "change-surround" }
    }

    /// Mode that cuts what a motion covers.
    pub fn delete() -> Self {
        VerbObjectMode { op: Operation::Delete, status: "Delete", surround: "delete-surround" }
    }

    /// Mode that copies what a motion covers.
    pub fn yank() -> Self {
        VerbObjectMode { op: Operation::Yank, status: "Yank", surround: "you-surround" }
    }

    /// The operation performed by this mode.
    pub fn operation(&self) -> Operation {
        self.op
    }
}

impl ModeInfo for VerbObjectMode {
    fn name(&self) -> &str {
        self.op.mode_name()
    }

    fn status_text(&self) -> &str {
        self.status
    }
}

#[async_trait(?Send)]
impl Mode for VerbObjectMode {
    fn color(&self) -> Option<&str> {
        Some("#e5c07b")
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        if keys == [Key::Char('s')] {
            return Ok(ModeOutcome::Switch(self.surround.to_string()));
        }

        let motion = match ctx.motions.find(keys) {
            MotionLookup::Found(motion) => motion,
            MotionLookup::Partial => return Ok(ModeOutcome::Pending),
            MotionLookup::Unknown => {
                ctx.warn(&format!("Unknown motion key sequence: {}.", keys_pattern(keys)));

                return Ok(ctx.to_default());
            },
        };

        let matched = self.op.run(&motion, ctx.editor, ctx.clipboard).await?;

        if self.op == Operation::Change && matched {
            return Ok(ModeOutcome::Switch("insert".into()));
        }

        return Ok(ctx.to_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::editing::buffer::EditBuffer;
    use crate::editing::store::{MemoryClipboard, StatusLog};
    use crate::errors::EditError;
    use crate::host::MessageLevel;
    use crate::motions::MotionRegistry;

    macro_rules! press {
        ($mode: expr, $keys: expr, $buf: expr, $clip: expr, $status: expr) => {{
            let config = SessionConfig::default();
            let motions = MotionRegistry::default();
            let keys = Key::parse_seq($keys).unwrap();
            let mut ctx = ModeContext {
                editor: &mut $buf,
                clipboard: &mut $clip,
                status: &mut $status,
                config: &config,
                motions: &motions,
            };

            $mode.handle(&keys, &mut ctx).await
        }};
    }

    #[tokio::test]
    async fn test_delete() {
        let mode = VerbObjectMode::delete();
        let mut buf = EditBuffer::from_marked("one t[]wo three");
        let mut clip = MemoryClipboard::default();
        let mut status = StatusLog::default();

        let res = press!(mode, "i", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Pending);

        let res = press!(mode, "aw", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("normal".into()));
        assert_eq!(buf.render(), "one []three");
        assert_eq!(clip.get(), "two ");
    }

    #[tokio::test]
    async fn test_change() {
        let mode = VerbObjectMode::change();
        let mut clip = MemoryClipboard::default();
        let mut status = StatusLog::default();

        let mut buf = EditBuffer::from_marked("say(\"h[]i\")");
        let res = press!(mode, "i\"", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("insert".into()));
        assert_eq!(buf.render(), "say(\"[]\")");
        assert_eq!(clip.get(), "");

        // Nothing to change, so insert mode is skipped.
        let mut buf = EditBuffer::from_marked("say[] hi");
        let res = press!(mode, "i(", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("normal".into()));
        assert_eq!(buf.render(), "say[] hi");
    }

    #[tokio::test]
    async fn test_yank() {
        let mode = VerbObjectMode::yank();
        let mut buf = EditBuffer::from_marked("[]one two\n[]three four");
        let mut clip = MemoryClipboard::default();
        let mut status = StatusLog::default();

        let res = press!(mode, "iw", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("normal".into()));
        assert_eq!(buf.text(), "one two\nthree four");
        assert_eq!(clip.get(), "one\nthree");
    }

    #[tokio::test]
    async fn test_surround_and_unknown() {
        let mut buf = EditBuffer::from_marked("[]abc");
        let mut clip = MemoryClipboard::default();
        let mut status = StatusLog::default();

        let res = press!(VerbObjectMode::yank(), "s", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("you-surround".into()));

        let res = press!(VerbObjectMode::change(), "s", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("change-surround".into()));

        let res = press!(VerbObjectMode::delete(), "Q", buf, clip, status).unwrap();
        assert_eq!(res, ModeOutcome::Switch("normal".into()));
        assert_eq!(
            status.last(),
            Some((MessageLevel::Warning, "Unknown motion key sequence: Q.".into()))
        );
    }

    #[tokio::test]
    async fn test_missing_syntax_tree() {
        let mut buf = EditBuffer::from_marked("fn f() { []}");
        let mut clip = MemoryClipboard::default();
        let mut status = StatusLog::default();

        let res = press!(VerbObjectMode::delete(), "af", buf, clip, status);
        assert!(matches!(res, Err(EditError::NoSyntaxTree)));
        assert_eq!(buf.text(), "fn f() { }");
    }
}
