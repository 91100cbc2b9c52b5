use async_trait::async_trait;

use editor_types::prelude::{MoveDir1D, Position, Selection};
use editor_types::Document;
use keybindings::{KeyDefinition, ModeInfo};

use crate::editing::operation::Operation;
use crate::errors::EditResult;
use crate::key::Key;

use super::{
    Command,
    CustomCommand,
    KeyMapMode,
    Mode,
    ModeContext,
    ModeOutcome,
    NoMatchPolicy,
    SmartSelect,
};

fn custom(cmd: CustomCommand) -> Command {
    Command::Custom(cmd)
}

/// Bindings shared by the modes that work on existing selections.
pub fn shared_selection_keys() -> Vec<KeyDefinition<Command>> {
    vec![
        KeyDefinition::new("y")
            .action(custom(CustomCommand::Operate(Operation::Yank)))
            .leave_in("normal"),
        KeyDefinition::new("d")
            .action(custom(CustomCommand::Operate(Operation::Delete)))
            .leave_in("normal"),
        KeyDefinition::new("c")
            .action(custom(CustomCommand::Operate(Operation::Change)))
            .leave_in("insert"),
        KeyDefinition::new("s").leave_in("surround"),
        KeyDefinition::new("gc").action(Command::builtin("commentLine")),
        KeyDefinition::new("zz").action(custom(CustomCommand::RevealCaretLine)),
    ]
}

/// Mode where motions extend or replace the selections.
pub fn select_mode() -> KeyMapMode {
    KeyMapMode::new("select", "Select")
        .select_motions(None)
        .on_enter(Command::builtin("cursorRightSelect"))
        .bind([
            KeyDefinition::new("<up>").action(Command::builtin("cursorUpSelect")),
            KeyDefinition::new("<down>").action(Command::builtin("cursorDownSelect")),
            KeyDefinition::new("<left>").action(Command::builtin("cursorLeftSelect")),
            KeyDefinition::new("<right>").action(Command::builtin("cursorRightSelect")),
            KeyDefinition::new("<home>").action(Command::builtin("cursorHomeSelect")),
            KeyDefinition::new("<end>").action(Command::builtin("cursorEndSelect")),
            KeyDefinition::new("<pageup>").action(Command::builtin("cursorPageUpSelect")),
            KeyDefinition::new("<pagedown>").action(Command::builtin("cursorPageDownSelect")),
            KeyDefinition::new("S").leave_in("smart-select"),
            KeyDefinition::new("V").leave_in("line-select"),
        ])
        .bind(shared_selection_keys())
        .with_color("#c678dd")
}

/// Mode for moving selections around the syntax tree.
pub fn smart_select_mode() -> KeyMapMode {
    let smart = |kind| custom(CustomCommand::SmartSelect(kind));

    KeyMapMode::new("smart-select", "Smart Select")
        .on_enter(smart(SmartSelect::Expand))
        .bind([
            KeyDefinition::new("<right>").action(smart(SmartSelect::Expand)),
            KeyDefinition::new("<left>").action(smart(SmartSelect::Shrink)),
            KeyDefinition::new("<up>").action(smart(SmartSelect::PreviousSibling)),
            KeyDefinition::new("<down>").action(smart(SmartSelect::NextSibling)),
        ])
        .bind(shared_selection_keys())
        .with_color("#c678dd")
}

/// Position just past a line, including its line break.
fn after_line(line: usize, doc: &dyn Document) -> Position {
    if line + 1 < doc.line_count() {
        Position::new(line + 1, 0)
    } else {
        doc.end()
    }
}

/// Select whole lines from `anchor` to `active`.
///
/// When `active` comes before `anchor`, the selection is reversed so that its active end stays on
/// the start of `active`.
pub(super) fn line_selection(anchor: usize, active: usize, doc: &dyn Document) -> Selection {
    if active >= anchor {
        Selection::new(Position::new(anchor, 0), after_line(active, doc))
    } else {
        Selection::new(after_line(anchor, doc), Position::new(active, 0))
    }
}

/// Recover the anchor and active lines of a selection made by [line_selection].
fn selected_lines(sel: &Selection) -> (usize, usize) {
    let (anchor, active) = (sel.anchor, sel.active);

    if sel.is_reversed() {
        let a = if anchor.column == 0 && anchor.line > active.line {
            anchor.line - 1
        } else {
            anchor.line
        };

        (a, active.line)
    } else {
        let b = if active.column == 0 && active.line > anchor.line {
            active.line - 1
        } else {
            active.line
        };

        (anchor.line, b)
    }
}

/// Move the active line of a whole-line selection by one line.
pub(super) fn grow_line_selection(sel: &Selection, dir: MoveDir1D, doc: &dyn Document) -> Selection {
    let (anchor, active) = selected_lines(sel);
    let last = doc.line_count().saturating_sub(1);

    let active = match dir {
        MoveDir1D::Next => (active + 1).min(last),
        MoveDir1D::Previous => active.saturating_sub(1),
    };

    line_selection(anchor, active, doc)
}

/// Mode where every selection covers whole lines.
///
/// Entering the mode extends each selection to the lines it touches. `<down>` and `<up>` then
/// move the active end a line at a time, and the [shared selection keys](shared_selection_keys)
/// act on the lines. Anything else is quietly ignored.
#[derive(Debug)]
pub struct LineSelectMode {
    keys: KeyMapMode,
}

impl Default for LineSelectMode {
    fn default() -> Self {
        let keys = KeyMapMode::new("line-select", "Line Select")
            .bind([
                KeyDefinition::new("<down>")
                    .action(custom(CustomCommand::GrowLines(MoveDir1D::Next))),
                KeyDefinition::new("<up>")
                    .action(custom(CustomCommand::GrowLines(MoveDir1D::Previous))),
            ])
            .bind(shared_selection_keys())
            .no_match(NoMatchPolicy::Reset)
            .with_color("#c678dd");

        LineSelectMode { keys }
    }
}

impl ModeInfo for LineSelectMode {
    fn name(&self) -> &str {
        self.keys.name()
    }

    fn status_text(&self) -> &str {
        self.keys.status_text()
    }
}

#[async_trait(?Send)]
impl Mode for LineSelectMode {
    fn color(&self) -> Option<&str> {
        self.keys.color()
    }

    async fn enter(&self, _: Option<&str>, ctx: &mut ModeContext<'_>) -> EditResult {
        let doc = ctx.editor.document();
        let selections = ctx
            .editor
            .selections()
            .into_iter()
            .map(|sel| {
                let (a, b) = selected_lines(&sel);
                line_selection(a, b, doc)
            })
            .collect();

        ctx.editor.set_selections(selections);

        Ok(())
    }

    async fn handle(&self, keys: &[Key], ctx: &mut ModeContext<'_>) -> EditResult<ModeOutcome> {
        self.keys.handle(keys, ctx).await
    }
}
