use keybindings::KeyDefinition;

use crate::motions::{MotionSpec, TokenMotion, WordStyle};

use super::{Command, CustomCommand, KeyMapMode, NoMatchPolicy};

fn builtin(keys: &str, name: &str) -> KeyDefinition<Command> {
    KeyDefinition::new(keys).action(Command::builtin(name))
}

fn custom(keys: &str, cmd: CustomCommand) -> KeyDefinition<Command> {
    KeyDefinition::new(keys).action(Command::Custom(cmd))
}

fn goto(keys: &str, mode: &str) -> KeyDefinition<Command> {
    KeyDefinition::new(keys).leave_in(mode)
}

fn word(keys: &str, kind: TokenMotion) -> KeyDefinition<Command> {
    let motion = MotionSpec::Word { style: WordStyle::Little, kind };

    custom(keys, CustomCommand::SelectMotion(motion))
}

fn word_part(keys: &str, kind: TokenMotion) -> KeyDefinition<Command> {
    custom(keys, CustomCommand::SelectMotion(MotionSpec::WordPart(kind)))
}

/// The default navigation mode.
///
/// Typed keys move the carets, run host built-ins, or switch to one of the other modes. Keys
/// that aren't bound produce a warning.
pub fn normal_mode() -> KeyMapMode {
    KeyMapMode::new("normal", "Normal").bind([
        // Cursor movement.
        builtin("<up>", "cursorUp"),
        builtin("<down>", "cursorDown"),
        builtin("<left>", "cursorLeft"),
        builtin("<right>", "cursorRight"),
        builtin("^", "cursorLineStart"),
        builtin("$", "cursorLineEnd"),
        word("w", TokenMotion::Forward),
        word("b", TokenMotion::Backward),
        word_part("æ", TokenMotion::Forward),
        word_part("ø", TokenMotion::Backward),

        // Entering insert mode.
        goto("i", "insert"),
        builtin("I", "cursorHome").leave_in("insert"),
        custom("a", CustomCommand::AppendAfterCaret).leave_in("insert"),
        builtin("A", "cursorEnd").leave_in("insert"),
        builtin("o", "insertLineAfter").leave_in("insert"),
        builtin("O", "insertLineBefore").leave_in("insert"),

        // Editing.
        builtin("u", "undo"),
        builtin("U", "redo"),
        custom("p", CustomCommand::Paste),
        builtin("D", "deleteAllRight"),
        builtin("J", "joinLines"),

        // Scrolling and navigation provided by the host.
        builtin("j", "scrollLineDown"),
        builtin("k", "scrollLineUp"),
        builtin("*", "findWordAtCursor.next"),
        builtin("#", "findWordAtCursor.previous"),
        builtin("gd", "goToDeclaration"),
        builtin("gr", "findReferences"),
        builtin("gh", "showHover"),
        builtin("za", "toggleFold"),
        custom("zz", CustomCommand::RevealCaretLine),

        // Other modes.
        goto("v", "select"),
        goto("V", "line-select"),
        goto("s", "smart-select"),
        goto("m", "match"),
        goto("r", "replace-char"),
        goto("f", "find-char"),
        goto("t", "till-char"),
        goto("gs", "sneak"),
        goto("gS", "sneak-backwards"),
        goto("gl", "go-to-line"),
        goto("c", "change"),
        goto("d", "delete"),
        goto("y", "yank"),
    ])
}

/// Mode for jumping between brackets and selecting their contents.
///
/// `m` jumps to the bracket matching the one under each caret, and any other keys are tried as
/// a motion that selects what it covers. Both return to `default` afterwards, and so does
/// anything unrecognized.
pub fn match_mode(default: &str) -> KeyMapMode {
    KeyMapMode::new("match", "Match")
        .select_motions(Some(default.to_string()))
        .bind([custom("m", CustomCommand::JumpToMatchingBracket).leave_in(default)])
        .no_match(NoMatchPolicy::WarnAndSwitch(default.to_string()))
}
