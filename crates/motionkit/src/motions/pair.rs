use editor_types::prelude::{MoveDir1D, ObjectScope, Position, Selection, TextRange};
use editor_types::Document;

use super::PairTarget;

/// Brackets that [matching_bracket] jumps between.
const BRACKETS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// Look backwards from `c` for an unmatched `open`.
fn scan_back(chars: &[char], c: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;

    for i in (0..c.min(chars.len())).rev() {
        if chars[i] == open {
            if depth == 0 {
                return Some(i);
            }

            depth -= 1;
        } else if chars[i] == close {
            depth += 1;
        }
    }

    return None;
}

/// Look forwards from `from` for an unmatched `close`.
fn scan_forward(chars: &[char], from: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;

    for (i, ch) in chars.iter().enumerate().skip(from) {
        if *ch == close {
            if depth == 0 {
                return Some(i);
            }

            depth -= 1;
        } else if *ch == open {
            depth += 1;
        }
    }

    return None;
}

/// Find the offsets of the delimiters enclosing the character offset `c`.
///
/// Symmetric delimiters can't be nested, so the closest one on each side is used. For
/// asymmetric delimiters, an opening delimiter located right at `c` counts as enclosing it.
pub(crate) fn find_pair(chars: &[char], c: usize, open: char, close: char) -> Option<(usize, usize)> {
    let c = c.min(chars.len());

    if open == close {
        let start = chars[..c].iter().rposition(|ch| *ch == open)?;
        let end = chars[c..].iter().position(|ch| *ch == close)? + c;

        return Some((start, end));
    }

    if chars.get(c) == Some(&open) {
        let end = scan_forward(chars, c + 1, open, close)?;

        return Some((c, end));
    }

    let start = scan_back(chars, c, open, close)?;
    let end = scan_forward(chars, c, open, close)?;

    return Some((start, end));
}

fn object_range(doc: &dyn Document, (start, end): (usize, usize), scope: ObjectScope) -> TextRange {
    match scope {
        ObjectScope::Inside => TextRange::new(doc.position_at(start + 1), doc.position_at(end)),
        ObjectScope::Around => TextRange::new(doc.position_at(start), doc.position_at(end + 1)),
    }
}

pub(super) fn pair_motion(
    open: char,
    close: char,
    target: PairTarget,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let chars: Vec<char> = doc.text().chars().collect();
    let c = doc.offset_at(sel.active);

    let Some((start, end)) = find_pair(&chars, c, open, close) else {
        return vec![];
    };

    let res = match target {
        PairTarget::Object(scope) => Selection::from(object_range(doc, (start, end), scope)),
        PairTarget::Direction(MoveDir1D::Next) => sel.with_active(doc.position_at(end)),
        PairTarget::Direction(MoveDir1D::Previous) => sel.with_active(doc.position_at(start)),
    };

    return vec![res];
}

/// Whether `a` is strictly narrower than `b`, comparing lines first and characters second.
fn is_narrower(a: &(TextRange, usize), b: &(TextRange, usize)) -> bool {
    (a.0.line_span(), a.1) < (b.0.line_span(), b.1)
}

pub(super) fn narrowest_pair_motion(
    pairs: &[(char, char)],
    scope: ObjectScope,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let chars: Vec<char> = doc.text().chars().collect();
    let c = doc.offset_at(sel.active);
    let mut narrowest: Option<(TextRange, usize)> = None;

    for (open, close) in pairs {
        let Some(found) = find_pair(&chars, c, *open, *close) else {
            continue;
        };

        let candidate = (object_range(doc, found, scope), found.1 - found.0);

        match &narrowest {
            Some(best) if !is_narrower(&candidate, best) => {},
            _ => narrowest = Some(candidate),
        }
    }

    narrowest.map(|(range, _)| vec![Selection::from(range)]).unwrap_or_default()
}

/// Find the bracket matching the one at a position.
///
/// When the position isn't on a bracket, this finds the closing bracket of the narrowest pair
/// enclosing it.
pub fn matching_bracket(doc: &dyn Document, pos: Position) -> Option<Position> {
    let chars: Vec<char> = doc.text().chars().collect();
    let c = doc.offset_at(pos);
    let ch = chars.get(c).copied();

    for (open, close) in BRACKETS {
        if ch == Some(open) {
            return scan_forward(&chars, c + 1, open, close).map(|o| doc.position_at(o));
        }

        if ch == Some(close) {
            return scan_back(&chars, c, open, close).map(|o| doc.position_at(o));
        }
    }

    let mut best: Option<(TextRange, usize, usize)> = None;

    for (open, close) in BRACKETS {
        let Some((start, end)) = find_pair(&chars, c, open, close) else {
            continue;
        };

        let range = TextRange::new(doc.position_at(start), doc.position_at(end));
        let key = (range.line_span(), end - start);

        match &best {
            Some((r, span, _)) if key >= (r.line_span(), *span) => {},
            _ => best = Some((range, end - start, end)),
        }
    }

    best.map(|(_, _, end)| doc.position_at(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motions::{MotionContext, MotionSpec};
    use crate::util::{parse_marked_with, render_marked_with};

    macro_rules! pair {
        ($o: expr, $c: expr, $scope: ident) => {
            MotionSpec::Pair {
                open: $o,
                close: $c,
                target: PairTarget::Object(ObjectScope::$scope),
            }
        };
        ($o: expr, $c: expr, dir $dir: ident) => {
            MotionSpec::Pair { open: $o, close: $c, target: PairTarget::Direction(MoveDir1D::$dir) }
        };
    }

    fn quotes(scope: ObjectScope) -> MotionSpec {
        MotionSpec::NarrowestPair { pairs: vec![('"', '"'), ('\'', '\''), ('`', '`')], scope }
    }

    #[test]
    fn test_around_parens() {
        let ap = pair!('(', ')', Around);

        assert_motion!(ap, "First (sec[]ond) third", Some("First [(second)] third"));
        assert_motion!(ap, "First [](second) third", Some("First [(second)] third"));
        assert_motion!(ap, "First[] (second)", None);
        assert_motion!(ap, "(second[])", Some("[(second)]"));
        assert_motion!(ap, "(second)[] third", None);
        assert_motion!(ap, "First (second\nth[]ird) fourth", Some("First [(second\nthird)] fourth"));
    }

    #[test]
    fn test_inside_parens() {
        let ip = pair!('(', ')', Inside);

        assert_motion!(ip, "First (sec[]ond) third", Some("First ([second]) third"));
        assert_motion!(ip, "First (\nsec[]ond\nthird)", Some("First ([\nsecond\nthird])"));
        assert_motion!(ip, "f(a, (b[]), c)", Some("f(a, ([b]), c)"));
        assert_motion!(ip, "f(a, (b)[], c)", Some("f([a, (b), c])"));
    }

    #[test]
    fn test_nested_skips_balanced() {
        let ip = pair!('{', '}', Inside);

        assert_motion!(ip, "{ a {b} c[] {d} }", Some("{[ a {b} c {d} ]}"));
        assert_motion!(ip, "{ a {b}[] }", Some("{[ a {b} ]}"));
    }

    #[test]
    fn test_brackets_with_other_markers() {
        let spec = pair!('[', ']', Around);
        let (text, sels) = parse_marked_with("x = [1, «»2]", '«', '»');
        let ctx = MotionContext::new(&text, None);
        let res = spec.apply(&sels[0], &ctx);

        assert_eq!(render_marked_with(&text, &res, '«', '»'), "x = «[1, 2]»");
    }

    #[test]
    fn test_directional() {
        let fwd = pair!('(', ')', dir Next);
        let bwd = pair!('(', ')', dir Previous);

        assert_motion!(fwd, "f(a[], b)", Some("f(a[, b])"));
        assert_motion!(bwd, "f(a, b[])", Some("f](a, b[)"));
        assert_motion!(fwd, "no parens[]", None);
    }

    #[test]
    fn test_quotes() {
        let iq = quotes(ObjectScope::Inside);
        let aq = quotes(ObjectScope::Around);

        assert_motion!(iq, "First \"sec[]ond\" third", Some("First \"[second]\" third"));
        assert_motion!(aq, "First 'sec[]ond' third", Some("First ['second'] third"));
        assert_motion!(iq, "no quotes[] here", None);

        // The closest quotes on either side win.
        let iq2 = pair!('"', '"', Inside);
        assert_motion!(iq2, "\"a \"b[]\" c\"", Some("\"a \"[b]\" c\""));
    }

    #[test]
    fn test_narrowest_prefers_fewer_lines() {
        let ip = MotionSpec::NarrowestPair {
            pairs: vec![('(', ')'), ('{', '}')],
            scope: ObjectScope::Inside,
        };

        assert_motion!(ip, "{\n  f(a[]b)\n}", Some("{\n  f([ab])\n}"));
        assert_motion!(ip, "({a[]b}\n)", Some("({[ab]}\n)"));
        assert_motion!(ip, "(x {a[]b} y)", Some("(x {[ab]} y)"));
    }

    #[test]
    fn test_narrowest_is_deterministic() {
        let aq = quotes(ObjectScope::Around);
        let (text, sels) = crate::util::parse_marked("say \"it's `fi[]ne`\"");
        let ctx = MotionContext::new(&text, None);

        let first = aq.apply(&sels[0], &ctx);
        for _ in 0..10 {
            assert_eq!(aq.apply(&sels[0], &ctx), first);
        }

        assert_eq!(crate::util::render_marked(&text, &first), "say \"it's [`fine`]\"");
    }

    #[test]
    fn test_matching_bracket() {
        let doc = String::from("fn f() {\n    g(x[0]);\n}");

        assert_eq!(matching_bracket(&doc, Position::new(0, 7)), Some(Position::new(2, 0)));
        assert_eq!(matching_bracket(&doc, Position::new(2, 0)), Some(Position::new(0, 7)));
        assert_eq!(matching_bracket(&doc, Position::new(1, 5)), Some(Position::new(1, 10)));
        assert_eq!(matching_bracket(&doc, Position::new(1, 8)), Some(Position::new(1, 9)));
        assert_eq!(matching_bracket(&doc, Position::new(1, 4)), Some(Position::new(2, 0)));
        assert_eq!(matching_bracket(&String::from("plain"), Position::new(0, 2)), None);
    }
}
