//! # Input keys
//!
//! ## Overview
//!
//! This module contains code for representing and processing keys.
//!
//! A [Key] is either a printable character or one of a handful of [NamedKey] values. Enter and
//! Tab are represented as the characters they type (`'\n'` and `'\t'`). Keys have a written
//! form that is used when matching them against key patterns: characters are written as
//! themselves, and everything else is written inside angle brackets, like `<up>`. A literal `<`
//! is written as `<lt>`.
//!
//! ## Example
//!
//! ```
//! use motionkit::key::{Key, NamedKey};
//!
//! let keys = Key::parse_seq("gd<up><lt>").unwrap();
//!
//! assert_eq!(keys, vec![
//!     Key::Char('g'),
//!     Key::Char('d'),
//!     Key::Named(NamedKey::Up),
//!     Key::Char('<'),
//! ]);
//! ```
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keybindings::InputKey;

use self::parse::{parse_key_str, parse_keys_str};

pub(crate) mod parse;

/// Errors that occur while interpreting keys.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum KeyError {
    /// Empty key string.
    #[error("Empty key string")]
    EmptyKey,

    /// Failure to interpret a key string.
    #[error("Invalid key string: {0:?}")]
    InvalidKey(String),

    /// A terminal key that has no equivalent.
    #[error("Unsupported terminal key: {0}")]
    Unsupported(String),
}

/// Keys that don't type a character.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NamedKey {
    /// The up arrow.
    Up,
    /// The down arrow.
    Down,
    /// The left arrow.
    Left,
    /// The right arrow.
    Right,
    /// The Home key.
    Home,
    /// The End key.
    End,
    /// The Page Up key.
    PageUp,
    /// The Page Down key.
    PageDown,
    /// The Escape key.
    Escape,
    /// The Backspace key.
    Backspace,
    /// The Delete key.
    Delete,
}

impl NamedKey {
    /// The name used for this key inside of angle brackets.
    pub fn name(&self) -> &'static str {
        match self {
            NamedKey::Up => "up",
            NamedKey::Down => "down",
            NamedKey::Left => "left",
            NamedKey::Right => "right",
            NamedKey::Home => "home",
            NamedKey::End => "end",
            NamedKey::PageUp => "pageup",
            NamedKey::PageDown => "pagedown",
            NamedKey::Escape => "esc",
            NamedKey::Backspace => "bs",
            NamedKey::Delete => "del",
        }
    }
}

/// A single key press.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Key {
    /// A key that types a character.
    Char(char),

    /// A key that doesn't type a character.
    Named(NamedKey),
}

impl Key {
    /// The Escape key.
    pub const ESC: Key = Key::Named(NamedKey::Escape);

    /// The Enter key.
    pub const ENTER: Key = Key::Char('\n');

    /// Parse a string containing a series of keys.
    pub fn parse_seq(input: &str) -> Result<Vec<Key>, KeyError> {
        if input.is_empty() {
            return Err(KeyError::EmptyKey);
        }

        match parse_keys_str(input) {
            Ok((_, keys)) => Ok(keys),
            Err(_) => Err(KeyError::InvalidKey(input.to_string())),
        }
    }

    /// The character this key types, if it types one.
    pub fn get_char(&self) -> Option<char> {
        match self {
            Key::Char(c) => Some(*c),
            Key::Named(_) => None,
        }
    }
}

impl InputKey for Key {
    fn write_pattern(&self, out: &mut String) {
        match self {
            Key::Char('<') => out.push_str("<lt>"),
            Key::Char('\n') => out.push_str("<cr>"),
            Key::Char('\t') => out.push_str("<tab>"),
            Key::Char(c) => out.push(*c),
            Key::Named(named) => {
                out.push('<');
                out.push_str(named.name());
                out.push('>');
            },
        }
    }

    fn get_char(&self) -> Option<char> {
        Key::get_char(self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_pattern(&mut out);
        f.write_str(&out)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Key::Char(c)
    }
}

impl From<NamedKey> for Key {
    fn from(named: NamedKey) -> Self {
        Key::Named(named)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(KeyError::EmptyKey);
        } else if let Ok((_, key)) = parse_key_str(input) {
            return Ok(key);
        } else {
            return Err(KeyError::InvalidKey(input.to_string()));
        }
    }
}

impl TryFrom<KeyEvent> for Key {
    type Error = KeyError;

    fn try_from(event: KeyEvent) -> Result<Self, Self::Error> {
        if event.kind == KeyEventKind::Release {
            return Err(KeyError::Unsupported(format!("{:?}", event.code)));
        }

        let modifiers = event.modifiers - KeyModifiers::SHIFT;

        if !modifiers.is_empty() {
            return Err(KeyError::Unsupported(format!("{:?}+{:?}", modifiers, event.code)));
        }

        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Char('\n'),
            KeyCode::Tab => Key::Char('\t'),
            KeyCode::Up => Key::Named(NamedKey::Up),
            KeyCode::Down => Key::Named(NamedKey::Down),
            KeyCode::Left => Key::Named(NamedKey::Left),
            KeyCode::Right => Key::Named(NamedKey::Right),
            KeyCode::Home => Key::Named(NamedKey::Home),
            KeyCode::End => Key::Named(NamedKey::End),
            KeyCode::PageUp => Key::Named(NamedKey::PageUp),
            KeyCode::PageDown => Key::Named(NamedKey::PageDown),
            KeyCode::Esc => Key::Named(NamedKey::Escape),
            KeyCode::Backspace => Key::Named(NamedKey::Backspace),
            KeyCode::Delete => Key::Named(NamedKey::Delete),
            code => {
                return Err(KeyError::Unsupported(format!("{:?}", code)));
            },
        };

        return Ok(key);
    }
}
