#![doc(hidden)]

pub fn is_horizontal_space(c: char) -> bool {
    return c == ' ' || c == '\t';
}

pub fn is_space_char(c: char) -> bool {
    return c.is_whitespace();
}

pub fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

pub fn is_word_char(c: char) -> bool {
    return c.is_alphanumeric() || c == '_';
}

/// Number of leading blank characters on a line.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| is_horizontal_space(*c)).count()
}

#[inline]
pub fn sort2<T>(a: T, b: T) -> (T, T)
where
    T: Ord,
{
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
