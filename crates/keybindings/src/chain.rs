//! # Command chains
//!
//! ## Overview
//!
//! A [CommandChain] holds the keys typed since the last binding was dispatched. Its written form
//! is what gets compared against [KeyMap](crate::KeyMap) patterns.
use std::fmt;

use crate::InputKey;

/// The keys accumulated since the last dispatch or reset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandChain<K> {
    keys: Vec<K>,
}

impl<K: InputKey> CommandChain<K> {
    /// Add a key to the end of the chain.
    pub fn push(&mut self, key: K) {
        self.keys.push(key);
    }

    /// Empty the chain.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Whether any keys are pending.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The number of pending keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// The pending keys, in the order they were typed.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// The most recently typed key.
    pub fn last(&self) -> Option<&K> {
        self.keys.last()
    }

    /// The written form of the chain.
    pub fn pattern(&self) -> String {
        let mut out = String::new();

        for key in self.keys.iter() {
            key.write_pattern(&mut out);
        }

        out
    }
}

impl<K> Default for CommandChain<K> {
    fn default() -> Self {
        CommandChain { keys: vec![] }
    }
}

impl<K: InputKey> fmt::Display for CommandChain<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}

impl<K: InputKey> FromIterator<K> for CommandChain<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        CommandChain { keys: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern() {
        let mut chain = CommandChain::from_iter("3g".chars());

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.pattern(), "3g");
        assert_eq!(chain.last(), Some(&'g'));

        chain.push('d');
        assert_eq!(chain.to_string(), "3gd");

        chain.clear();
        assert!(chain.is_empty());
        assert_eq!(chain.pattern(), "");
    }
}
