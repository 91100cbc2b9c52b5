use editor_types::prelude::{Position, Selection, TextRange};

/// Sort ranges and combine the ones that overlap or touch.
pub(crate) fn merge_ranges(mut ranges: Vec<TextRange>) -> Vec<TextRange> {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<TextRange> = Vec::with_capacity(ranges.len());

    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => {
                *last = last.union(&range);
            },
            _ => merged.push(range),
        }
    }

    return merged;
}

/// Remove repeated values while keeping the first occurrence of each.
pub(crate) fn dedup_stable<T: PartialEq + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = vec![];

    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }

    return out;
}

/// Split text with embedded selection markers into the plain text and the selections.
///
/// Each selection is written as an `open` marker at its anchor and a `close` marker at its
/// active end, so `"ab[]c"` is a caret after `b`, and `"a]bc["` is a reversed selection.
pub(crate) fn parse_marked_with(marked: &str, open: char, close: char) -> (String, Vec<Selection>) {
    let mut text = String::with_capacity(marked.len());
    let mut selections = vec![];
    let mut anchor = None;
    let mut active = None;
    let mut pos = Position::default();

    for c in marked.chars() {
        if c == open {
            anchor = Some(pos);
        } else if c == close {
            active = Some(pos);
        } else {
            text.push(c);

            if c == '\n' {
                pos = Position::new(pos.line + 1, 0);
            } else {
                pos = pos.right(1);
            }

            continue;
        }

        if let (Some(a), Some(b)) = (anchor, active) {
            selections.push(Selection::new(a, b));
            anchor = None;
            active = None;
        }
    }

    return (text, selections);
}

/// Insert selection markers into text, reversing [parse_marked_with].
pub(crate) fn render_marked_with(
    text: &str,
    selections: &[Selection],
    open: char,
    close: char,
) -> String {
    // (position, selection index, marker order, marker)
    let mut marks: Vec<(Position, usize, u8, char)> = vec![];

    for (idx, sel) in selections.iter().enumerate() {
        let (first, second) = if sel.is_reversed() {
            ((sel.active, close), (sel.anchor, open))
        } else {
            ((sel.anchor, open), (sel.active, close))
        };

        marks.push((first.0, idx, 0, first.1));
        marks.push((second.0, idx, 1, second.1));
    }

    marks.sort();

    let mut out = String::with_capacity(text.len() + marks.len());
    let mut marks = marks.into_iter().peekable();
    let mut pos = Position::default();

    for c in text.chars() {
        while let Some((p, _, _, m)) = marks.peek() {
            if *p > pos {
                break;
            }

            out.push(*m);
            marks.next();
        }

        out.push(c);

        if c == '\n' {
            pos = Position::new(pos.line + 1, 0);
        } else {
            pos = pos.right(1);
        }
    }

    out.extend(marks.map(|(_, _, _, m)| m));

    return out;
}

pub(crate) fn parse_marked(marked: &str) -> (String, Vec<Selection>) {
    parse_marked_with(marked, '[', ']')
}

pub(crate) fn render_marked(text: &str, selections: &[Selection]) -> String {
    render_marked_with(text, selections, '[', ']')
}

#[allow(unused_macros)]
macro_rules! pos {
    ($l: expr, $c: expr) => {
        editor_types::prelude::Position::new($l, $c)
    };
}

#[allow(unused_macros)]
macro_rules! sel {
    ($al: expr, $ac: expr, $bl: expr, $bc: expr) => {
        editor_types::prelude::Selection::new(pos!($al, $ac), pos!($bl, $bc))
    };
    ($l: expr, $c: expr) => {
        editor_types::prelude::Selection::caret(pos!($l, $c))
    };
}

/// Apply a motion to the first selection in some marked text, and compare the rendered result.
///
/// An expected value of `None` means the motion shouldn't find anything.
#[allow(unused_macros)]
macro_rules! assert_motion {
    (@run $motion: expr, $before: expr, $after: expr, $syntax: expr) => {{
        let (text, sels) = $crate::util::parse_marked($before);
        let ctx = $crate::motions::MotionContext::new(&text, $syntax);
        let res = $motion.apply(&sels[0], &ctx);
        let expected: Option<&str> = $after;

        match expected {
            Some(after) => {
                assert_eq!(res.len(), 1, "expected one result for {:?}", $before);
                assert_eq!($crate::util::render_marked(&text, &res), after, "from {:?}", $before);
            },
            None => {
                assert!(res.is_empty(), "expected no match for {:?}, got {:?}", $before, res);
            },
        }
    }};
    ($motion: expr, $before: expr, $after: expr) => {
        assert_motion!(@run $motion, $before, $after, None)
    };
    ($motion: expr, $before: expr, $after: expr, $tree: expr) => {
        assert_motion!(
            @run $motion,
            $before,
            $after,
            Some($tree as &dyn $crate::editing::syntax::SyntaxTree)
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_roundtrip() {
        let (text, sels) = parse_marked("Hello [wor]ld\n[]next");

        assert_eq!(text, "Hello world\nnext");
        assert_eq!(sels, vec![sel!(0, 6, 0, 9), sel!(1, 0)]);
        assert_eq!(render_marked(&text, &sels), "Hello [wor]ld\n[]next");
    }

    #[test]
    fn test_marked_reversed() {
        let (text, sels) = parse_marked("a]bc[d");

        assert_eq!(text, "abcd");
        assert_eq!(sels, vec![sel!(0, 3, 0, 1)]);
        assert_eq!(render_marked(&text, &sels), "a]bc[d");
    }

    #[test]
    fn test_marked_custom() {
        let (text, sels) = parse_marked_with("f([a«b»])", '«', '»');

        assert_eq!(text, "f([ab])");
        assert_eq!(sels, vec![sel!(0, 4, 0, 5)]);
        assert_eq!(render_marked_with(&text, &sels, '«', '»'), "f([a«b»])");
    }

    #[test]
    fn test_merge_ranges() {
        let ranges = vec![
            TextRange::new(pos!(0, 5), pos!(0, 8)),
            TextRange::new(pos!(0, 0), pos!(0, 2)),
            TextRange::new(pos!(0, 7), pos!(1, 0)),
            TextRange::new(pos!(0, 2), pos!(0, 3)),
        ];

        assert_eq!(merge_ranges(ranges), vec![
            TextRange::new(pos!(0, 0), pos!(0, 3)),
            TextRange::new(pos!(0, 5), pos!(1, 0)),
        ]);
    }
}
