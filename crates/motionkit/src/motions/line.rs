use editor_types::prelude::{Inclusion, MoveDir1D, ObjectScope, Position, Selection};
use editor_types::Document;

/// Find the run of lines that are indented at least as deeply as the cursor's line.
///
/// Blank lines never end the run.
pub(super) fn indentation_motion(
    scope: ObjectScope,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let cursor = sel.active.line;

    if cursor >= doc.line_count() {
        return vec![];
    }

    let indent = doc.first_non_whitespace(cursor);
    let in_scope = |line: usize| doc.first_non_whitespace(line) >= indent;

    let mut start = cursor;
    let mut end = cursor;

    for line in (0..cursor).rev() {
        if doc.is_blank(line) {
            continue;
        }

        if !in_scope(line) {
            break;
        }

        start = line;
    }

    for line in cursor + 1..doc.line_count() {
        if doc.is_blank(line) {
            continue;
        }

        if !in_scope(line) {
            break;
        }

        end = line;
    }

    let res = match scope {
        ObjectScope::Inside => Selection::new(
            Position::new(start, indent),
            Position::new(end, doc.line_len(end)),
        ),
        ObjectScope::Around => {
            let last = doc.line_count() - 1;
            let end = if end == last {
                Position::new(end, doc.line_len(end))
            } else {
                Position::new(end + 1, 0)
            };

            Selection::new(Position::new(start, 0), end)
        },
    };

    return vec![res];
}

pub(super) fn extremity_motion(dir: MoveDir1D, sel: &Selection, doc: &dyn Document) -> Vec<Selection> {
    let cursor = sel.active;

    let column = match dir {
        MoveDir1D::Previous => 0,
        MoveDir1D::Next => doc.line_len(cursor.line),
    };

    vec![sel.with_active(cursor.with_column(column))]
}

pub(super) fn char_search_motion(
    target: char,
    inclusion: Inclusion,
    dir: MoveDir1D,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let cursor = sel.active;
    let Some(line) = doc.line(cursor.line) else {
        return vec![];
    };

    let chars: Vec<char> = line.chars().collect();
    let c = cursor.column.min(chars.len());

    let column = match dir {
        MoveDir1D::Next => {
            let Some(idx) = chars[c..].iter().position(|ch| *ch == target) else {
                return vec![];
            };

            match inclusion {
                Inclusion::Inclusive => c + idx + 1,
                Inclusion::Exclusive => c + idx,
            }
        },
        MoveDir1D::Previous => {
            let Some(idx) = chars[..c].iter().rposition(|ch| *ch == target) else {
                return vec![];
            };

            match inclusion {
                Inclusion::Inclusive => idx,
                Inclusion::Exclusive => idx + 1,
            }
        },
    };

    vec![sel.with_active(cursor.with_column(column))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motions::MotionSpec;

    const PYTHON: &str = "def f():\n    if x:\n        a()\n\n        b[]()\n    return\n";

    #[test]
    fn test_indentation_inside() {
        let ii = MotionSpec::Indentation(ObjectScope::Inside);

        assert_motion!(
            ii,
            PYTHON,
            Some("def f():\n    if x:\n        [a()\n\n        b()]\n    return\n")
        );
        assert_motion!(
            ii,
            "def f():\n    i[]f x:\n        a()\n    return",
            Some("def f():\n    [if x:\n        a()\n    return]")
        );
    }

    #[test]
    fn test_indentation_around() {
        let ai = MotionSpec::Indentation(ObjectScope::Around);

        assert_motion!(
            ai,
            PYTHON,
            Some("def f():\n    if x:\n[        a()\n\n        b()\n]    return\n")
        );

        // At the end of the document, the selection stops at the end of the last line.
        assert_motion!(ai, "top\n    a[]\n    b", Some("top\n[    a\n    b]"));
    }

    #[test]
    fn test_extremity() {
        let start = MotionSpec::Extremity(MoveDir1D::Previous);
        let end = MotionSpec::Extremity(MoveDir1D::Next);

        assert_motion!(start, "one\n  tw[]o", Some("one\n]  tw[o"));
        assert_motion!(end, "one\n  tw[]o", Some("one\n  tw[o]"));
        assert_motion!(end, "[o]ne", Some("[one]"));
    }

    #[test]
    fn test_char_search() {
        let f = MotionSpec::CharSearch {
            target: ',',
            inclusion: Inclusion::Inclusive,
            dir: MoveDir1D::Next,
        };
        let t = MotionSpec::CharSearch {
            target: ',',
            inclusion: Inclusion::Exclusive,
            dir: MoveDir1D::Next,
        };
        let big_f = MotionSpec::CharSearch {
            target: '(',
            inclusion: Inclusion::Inclusive,
            dir: MoveDir1D::Previous,
        };
        let big_t = MotionSpec::CharSearch {
            target: '(',
            inclusion: Inclusion::Exclusive,
            dir: MoveDir1D::Previous,
        };

        assert_motion!(f, "f([]a, b)", Some("f([a,] b)"));
        assert_motion!(t, "f([]a, b)", Some("f([a], b)"));
        assert_motion!(big_f, "f(a, []b)", Some("f](a, [b)"));
        assert_motion!(big_t, "f(a, []b)", Some("f(]a, [b)"));

        // Searches never leave the current line.
        assert_motion!(f, "f([]a\n, b)", None);
        assert_motion!(big_f, "(\n[]x", None);
    }
}
