use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{anychar, char},
    combinator::{eof, map, value},
    multi::many1,
    sequence::delimited,
    IResult,
};

use super::{Key, NamedKey};

fn parse_name(input: &str) -> IResult<&str, Key> {
    alt((
        value(Key::Char('<'), tag_no_case("lt")),
        value(Key::Char('\n'), tag_no_case("cr")),
        value(Key::Char('\n'), tag_no_case("enter")),
        value(Key::Char('\t'), tag_no_case("tab")),
        value(Key::Char(' '), tag_no_case("space")),
        value(Key::Named(NamedKey::Up), tag_no_case("up")),
        value(Key::Named(NamedKey::Down), tag_no_case("down")),
        value(Key::Named(NamedKey::Left), tag_no_case("left")),
        value(Key::Named(NamedKey::Right), tag_no_case("right")),
        value(Key::Named(NamedKey::Home), tag_no_case("home")),
        value(Key::Named(NamedKey::End), tag_no_case("end")),
        value(Key::Named(NamedKey::PageUp), tag_no_case("pageup")),
        value(Key::Named(NamedKey::PageDown), tag_no_case("pagedown")),
        value(Key::Named(NamedKey::Escape), tag_no_case("esc")),
        value(Key::Named(NamedKey::Backspace), tag_no_case("bs")),
        value(Key::Named(NamedKey::Delete), tag_no_case("del")),
    ))(input)
}

pub(crate) fn parse_special(input: &str) -> IResult<&str, Key> {
    delimited(char('<'), parse_name, char('>'))(input)
}

pub(crate) fn parse_simple(input: &str) -> IResult<&str, Key> {
    map(anychar, Key::Char)(input)
}

fn parse_key(input: &str) -> IResult<&str, Key> {
    alt((parse_special, parse_simple))(input)
}

pub(crate) fn parse_key_str(input: &str) -> IResult<&str, Key> {
    let (input, key) = parse_key(input)?;
    let (input, _) = eof(input)?;

    Ok((input, key))
}

pub(crate) fn parse_keys_str(input: &str) -> IResult<&str, Vec<Key>> {
    let (input, keys) = many1(parse_key)(input)?;
    let (input, _) = eof(input)?;

    Ok((input, keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! res {
        ( $( $x: expr ),* ) => {
            Ok(("", vec![ $( $x, )* ]))
        };
    }

    macro_rules! named {
        ($n: ident) => {
            Key::Named(NamedKey::$n)
        };
    }

    #[test]
    fn test_sequence() {
        assert_eq!(parse_keys_str("gd"), res![Key::Char('g'), Key::Char('d')]);
        assert_eq!(parse_keys_str("3j"), res![Key::Char('3'), Key::Char('j')]);
        assert_eq!(
            parse_keys_str("<up><DOWN>x"),
            res![named!(Up), named!(Down), Key::Char('x')]
        );
    }

    #[test]
    fn test_angle_bracket() {
        assert_eq!(parse_keys_str("a<lt>"), res![Key::Char('a'), Key::Char('<')]);
        assert_eq!(parse_keys_str("i<"), res![Key::Char('i'), Key::Char('<')]);
        assert_eq!(parse_keys_str("<>"), res![Key::Char('<'), Key::Char('>')]);
        assert_eq!(parse_keys_str("<nope>"), res![
            Key::Char('<'),
            Key::Char('n'),
            Key::Char('o'),
            Key::Char('p'),
            Key::Char('e'),
            Key::Char('>')
        ]);
    }

    #[test]
    fn test_special_text() {
        assert_eq!(parse_keys_str("12<cr>"), res![Key::Char('1'), Key::Char('2'), Key::Char('\n')]);
        assert_eq!(parse_keys_str("<Enter>"), res![Key::Char('\n')]);
        assert_eq!(parse_keys_str("<space>"), res![Key::Char(' ')]);
        assert_eq!(parse_keys_str("æø"), res![Key::Char('æ'), Key::Char('ø')]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_keys_str("").is_err());
    }
}
