//! # Surrounding delimiters
//!
//! ## Overview
//!
//! A [SurroundMap] maps trigger characters onto the delimiter [Pair] they insert. The
//! [surround] function uses it to add, replace or delete the delimiters around every current
//! selection as a single batch of edits.
//!
//! Replacing and deleting need to know which pair is already there. Each selection is checked
//! against every configured pair, in order, by comparing the text directly outside of it with the
//! pair's delimiters. Selections that aren't surrounded by any of them are left unchanged.
use editor_types::prelude::{Pair, Position, Selection, TextEdit, TextRange};
use editor_types::Document;

use crate::errors::EditResult;
use crate::host::EditorHandle;

/// Which delimiters each trigger character stands for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurroundMap {
    pairs: Vec<(char, Pair)>,
}

impl SurroundMap {
    /// Create a map without any pairs.
    pub fn empty() -> Self {
        SurroundMap { pairs: vec![] }
    }

    /// Add a pair, or replace the one already bound to a trigger.
    pub fn insert(&mut self, trigger: char, pair: Pair) {
        match self.pairs.iter_mut().find(|(c, _)| *c == trigger) {
            Some((_, old)) => *old = pair,
            None => self.pairs.push((trigger, pair)),
        }
    }

    /// Add a pair and return the updated map.
    pub fn with(mut self, trigger: char, pair: Pair) -> Self {
        self.insert(trigger, pair);
        self
    }

    /// The pair bound to a trigger character.
    pub fn get(&self, trigger: char) -> Option<&Pair> {
        self.pairs.iter().find(|(c, _)| *c == trigger).map(|(_, p)| p)
    }

    /// Iterate over the bound pairs, in the order they're checked.
    pub fn iter(&self) -> impl Iterator<Item = &(char, Pair)> {
        self.pairs.iter()
    }

    /// Find the first pair whose delimiters sit directly outside of the character offsets
    /// `start..end`.
    pub fn flanking(&self, chars: &[char], start: usize, end: usize) -> Option<&Pair> {
        self.pairs.iter().map(|(_, p)| p).find(|p| flanks(p, chars, start, end))
    }
}

impl Default for SurroundMap {
    fn default() -> Self {
        SurroundMap::empty()
            .with('"', Pair::new("\"", "\""))
            .with('\'', Pair::new("'", "'"))
            .with('(', Pair::new("(", ")"))
            .with(')', Pair::new("(", ")"))
            .with('[', Pair::new("[", "]"))
            .with(']', Pair::new("[", "]"))
            .with('{', Pair::new("{ ", " }"))
            .with('}', Pair::new("{", "}"))
            .with('<', Pair::new("<", ">"))
            .with('>', Pair::new("<", ">"))
            .with('`', Pair::new("`", "`"))
            .with('d', Pair::new("<div>", "</div>"))
    }
}

fn flanks(pair: &Pair, chars: &[char], start: usize, end: usize) -> bool {
    let open: Vec<char> = pair.open.chars().collect();
    let close: Vec<char> = pair.close.chars().collect();

    if start < open.len() || end + close.len() > chars.len() || start > end {
        return false;
    }

    return chars[start - open.len()..start] == open[..] && chars[end..end + close.len()] == close[..];
}

/// What to do to the delimiters around each selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SurroundAction<'a> {
    /// Wrap each selection in a pair.
    Add(&'a Pair),

    /// Swap the pair around each selection for another one.
    Replace(&'a Pair),

    /// Remove the pair around each selection.
    Delete,
}

/// The edits for a surround action, and where each selection ends up afterwards.
#[derive(Debug, Default, Eq, PartialEq)]
struct SurroundPlan {
    edits: Vec<TextEdit>,

    /// (anchor, active) character offsets into the edited document.
    selections: Vec<(usize, usize)>,

    changed: usize,
}

/// Plan an action over a set of selections, only editing around those marked as targets.
///
/// Selections that aren't targets still get moved along with the edits made before them.
fn plan(
    doc: &dyn Document,
    map: &SurroundMap,
    selections: &[(Selection, bool)],
    action: SurroundAction<'_>,
) -> SurroundPlan {
    let chars: Vec<char> = doc.text().chars().collect();
    let offsets: Vec<(usize, usize)> = selections
        .iter()
        .map(|(s, _)| (doc.offset_at(s.anchor), doc.offset_at(s.active)))
        .collect();

    let mut order: Vec<usize> = (0..selections.len()).collect();
    order.sort_by_key(|i| offsets[*i].0.min(offsets[*i].1));

    let mut res = SurroundPlan { selections: offsets.clone(), ..Default::default() };
    let mut shift: isize = 0;
    let at = |off: usize| -> Position { doc.position_at(off) };

    for idx in order {
        let (anchor, active) = offsets[idx];
        let (start, end) = (anchor.min(active), anchor.max(active));

        let (old, new) = match action {
            _ if !selections[idx].1 => (None, None),
            SurroundAction::Add(pair) => (None, Some(pair)),
            SurroundAction::Replace(pair) => {
                match map.flanking(&chars, start, end) {
                    Some(old) => (Some(old), Some(pair)),
                    None => (None, None),
                }
            },
            SurroundAction::Delete => {
                match map.flanking(&chars, start, end) {
                    Some(old) => (Some(old), None),
                    None => (None, None),
                }
            },
        };

        let old_open = old.map(|p| p.open.chars().count()).unwrap_or(0);
        let old_close = old.map(|p| p.close.chars().count()).unwrap_or(0);
        let new_open = new.map(|p| p.open.chars().count()).unwrap_or(0);
        let new_close = new.map(|p| p.close.chars().count()).unwrap_or(0);

        if old.is_some() || new.is_some() {
            let open = new.map(|p| p.open.as_str()).unwrap_or_default();
            let close = new.map(|p| p.close.as_str()).unwrap_or_default();

            let before = TextRange::new(at(start - old_open), at(start));
            let after = TextRange::new(at(end), at(end + old_close));

            res.edits.push(TextEdit::replace(before, open));
            res.edits.push(TextEdit::replace(after, close));
            res.changed += 1;
        }

        let moved = |off: usize| (off as isize + shift - old_open as isize + new_open as isize) as usize;
        res.selections[idx] = (moved(anchor), moved(active));

        shift += new_open as isize - old_open as isize + new_close as isize - old_close as isize;
    }

    return res;
}

/// Add, replace or delete the delimiters around every current selection.
///
/// Every selection keeps covering the same text afterwards. Returns how many selections were
/// changed.
pub async fn surround(
    editor: &mut dyn EditorHandle,
    map: &SurroundMap,
    action: SurroundAction<'_>,
) -> EditResult<usize> {
    let targets = editor.selections().into_iter().map(|sel| (sel, true)).collect();

    surround_targets(editor, map, targets, action).await
}

/// Like [surround], but with the selections given alongside whether to act around each one.
///
/// The given selections replace the current ones. Those that aren't targets are left as they
/// are, apart from moving with the text around them.
pub async fn surround_targets(
    editor: &mut dyn EditorHandle,
    map: &SurroundMap,
    targets: Vec<(Selection, bool)>,
    action: SurroundAction<'_>,
) -> EditResult<usize> {
    let plan = plan(editor.document(), map, &targets, action);

    if plan.changed == 0 {
        return Ok(0);
    }

    editor.apply_edits(plan.edits).await?;

    let doc = editor.document();
    let selections = plan
        .selections
        .into_iter()
        .map(|(anchor, active)| Selection::new(doc.position_at(anchor), doc.position_at(active)))
        .collect();

    editor.set_selections(selections);

    tracing::debug!(?action, changed = plan.changed, "updated surrounding delimiters");

    Ok(plan.changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::buffer::EditBuffer;

    macro_rules! surround {
        ($before: expr, $action: expr) => {{
            let mut buf = EditBuffer::from_marked($before);
            let map = SurroundMap::default();
            let changed = surround(&mut buf, &map, $action).await.unwrap();
            (changed, buf.render())
        }};
    }

    fn pair(c: char) -> Pair {
        SurroundMap::default().get(c).cloned().unwrap()
    }

    #[test]
    fn test_default_map() {
        let map = SurroundMap::default();

        assert_eq!(map.get('{'), Some(&Pair::new("{ ", " }")));
        assert_eq!(map.get('}'), Some(&Pair::new("{", "}")));
        assert_eq!(map.get('d'), Some(&Pair::new("<div>", "</div>")));
        assert_eq!(map.get('x'), None);
        assert_eq!(map.iter().count(), 12);
    }

    #[test]
    fn test_flanking_order() {
        let map = SurroundMap::default();
        let chars: Vec<char> = "{ x }".chars().collect();

        assert_eq!(map.flanking(&chars, 2, 3), Some(&Pair::new("{ ", " }")));
        assert_eq!(map.flanking(&chars, 1, 4), Some(&Pair::new("{", "}")));
        assert_eq!(map.flanking(&chars, 0, 5), None);
    }

    #[tokio::test]
    async fn test_add() {
        let p = pair('(');
        let (n, text) = surround!("a [bc] d [e]f", SurroundAction::Add(&p));
        assert_eq!(n, 2);
        assert_eq!(text, "a ([bc]) d ([e])f");

        let p = pair('d');
        let (_, text) = surround!("x]yz[", SurroundAction::Add(&p));
        assert_eq!(text, "x<div>]yz[</div>");
    }

    #[tokio::test]
    async fn test_replace() {
        let p = pair('[');
        let (n, text) = surround!("f(\"[a]\", ([b]), [c])", SurroundAction::Replace(&p));
        assert_eq!(n, 2);
        assert_eq!(text, "f([[a]], [[b]], [c])");
    }

    #[tokio::test]
    async fn test_replace_multiline() {
        let p = pair('\'');
        let (_, text) = surround!("(\n[x\ny]\n)\n<[z]>", SurroundAction::Replace(&p));
        assert_eq!(text, "(\n[x\ny]\n)\n'[z]'");
    }

    #[tokio::test]
    async fn test_delete() {
        let (n, text) = surround!("<div>[hi]</div> { [x] } [y]", SurroundAction::Delete);
        assert_eq!(n, 2);
        assert_eq!(text, "[hi] [x] [y]");
    }

    #[tokio::test]
    async fn test_targets() {
        let mut buf = EditBuffer::from_marked("a [bc] d [e]f");
        let map = SurroundMap::default();
        let p = pair('"');
        let targets = buf.selections().into_iter().zip([false, true]).collect();

        let n = surround_targets(&mut buf, &map, targets, SurroundAction::Add(&p)).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(buf.render(), "a [bc] d \"[e]\"f");

        // Selections after a target move along with the inserted text.
        let mut buf = EditBuffer::from_marked("[x] y[]z");
        let targets = buf.selections().into_iter().zip([true, false]).collect();

        let n = surround_targets(&mut buf, &map, targets, SurroundAction::Add(&p)).await.unwrap();
        assert_eq!(n, 1);
        assert_eq!(buf.render(), "\"[x]\" y[]z");
    }

    #[tokio::test]
    async fn test_nothing_to_change() {
        let (n, text) = surround!("a [b] c", SurroundAction::Delete);
        assert_eq!(n, 0);
        assert_eq!(text, "a [b] c");
    }
}
