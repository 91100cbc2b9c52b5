use std::sync::OnceLock;

use regex::Regex;

use editor_types::prelude::{Position, Selection};
use editor_types::Document;

use super::{TokenMotion, WordStyle};

static WORD_TRAILING: OnceLock<Regex> = OnceLock::new();
static WORD: OnceLock<Regex> = OnceLock::new();
static BIG_WORD_TRAILING: OnceLock<Regex> = OnceLock::new();
static BIG_WORD: OnceLock<Regex> = OnceLock::new();

fn token_regex(style: WordStyle, trailing: bool) -> &'static Regex {
    let (cell, pattern) = match (style, trailing) {
        (WordStyle::Little, true) => (&WORD_TRAILING, r"\w+\s*"),
        (WordStyle::Little, false) => (&WORD, r"\w+"),
        (WordStyle::Big, true) => (&BIG_WORD_TRAILING, r"\S+\s*"),
        (WordStyle::Big, false) => (&BIG_WORD, r"\S+"),
    };

    cell.get_or_init(|| Regex::new(pattern).expect("token patterns are valid regexes"))
}

/// Find the character columns of every match of a regex on a line.
fn tokens(regex: &Regex, line: &str) -> Vec<(usize, usize)> {
    let mut out = vec![];
    let mut col = 0;
    let mut byte = 0;

    for m in regex.find_iter(line) {
        col += line[byte..m.start()].chars().count();
        let start = col;
        col += m.as_str().chars().count();
        byte = m.end();

        out.push((start, col));
    }

    return out;
}

pub(super) fn word_motion(
    style: WordStyle,
    kind: TokenMotion,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let cursor = sel.active;
    let Some(line) = doc.line(cursor.line) else {
        return vec![];
    };

    let trailing = !matches!(kind, TokenMotion::Inside);
    let regex = token_regex(style, trailing);

    let c = cursor.column;
    let toks = tokens(regex, &line);
    let at = |col| Position::new(cursor.line, col);

    let found = match kind {
        TokenMotion::Backward => toks.into_iter().rev().find(|(s, e)| *s < c && c <= *e),
        _ => toks.into_iter().find(|(s, e)| *s <= c && c < *e),
    };

    let Some((start, end)) = found else {
        return vec![];
    };

    let res = match kind {
        TokenMotion::Forward => sel.with_active(at(end)),
        TokenMotion::Backward => sel.with_active(at(start)),
        TokenMotion::Inside | TokenMotion::Around => Selection::new(at(start), at(end)),
    };

    return vec![res];
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a word part ends between two adjacent characters.
fn is_part_boundary(cur: char, next: char) -> bool {
    (cur.is_ascii_lowercase() && next.is_ascii_uppercase()) ||
        (is_word(cur) && next == '_') ||
        (cur == '_' && is_word(next)) ||
        (!is_letter(cur) && is_letter(next)) ||
        (is_letter(cur) && !is_letter(next))
}

pub(super) fn word_part_motion(
    kind: TokenMotion,
    sel: &Selection,
    doc: &dyn Document,
) -> Vec<Selection> {
    let cursor = sel.active;
    let Some(line) = doc.line(cursor.line) else {
        return vec![];
    };

    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let c = cursor.column;
    let at = |col| Position::new(cursor.line, col);

    let part_end = |mut end: usize| {
        while end + 1 < len && !is_part_boundary(chars[end], chars[end + 1]) {
            end += 1;
        }

        end + 1
    };

    let part_start = |mut start: usize| {
        while start > 0 && !is_part_boundary(chars[start - 1], chars[start]) {
            start -= 1;
        }

        start
    };

    match kind {
        TokenMotion::Forward => {
            if c >= len {
                return vec![];
            }

            return vec![Selection::new(at(c), at(part_end(c)))];
        },
        TokenMotion::Backward => {
            if c == 0 || c > len {
                return vec![];
            }

            return vec![Selection::new(at(c), at(part_start(c - 1)))];
        },
        TokenMotion::Inside | TokenMotion::Around => {
            if c >= len {
                return vec![];
            }

            return vec![Selection::new(at(part_start(c)), at(part_end(c)))];
        },
    }
}
