//! # keybindings
//!
//! ## Overview
//!
//! This crate provides environment-agnostic interfaces for tracking and resolving modal
//! keybindings.
//!
//! Each mode owns a [KeyMap], an ordered list of [KeyDefinition] values that each map a written
//! key pattern (like `"gd"` or `"<up>"`) to an action. As keys are typed, they get accumulated into
//! a [CommandChain], and the written form of the chain is passed to [resolve]. The result is
//! either a [Resolution::Matched] binding, a [Resolution::Partial] match that needs more input,
//! or [Resolution::NoMatch].
//!
//! A run of leading decimal digits is treated as a repeat count, and stripped from the chain
//! before looking up the binding.
//!
//! The [ModeRegistry] keeps track of the modes a consumer has registered, which one is
//! currently active, and the pending chain of keys. Whenever the current mode changes, the chain
//! is emptied.
//!
//! ## Example
//!
//! ```
//! use keybindings::{resolve, KeyDefinition, KeyMap, Resolution};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum ProgAction {
//!     ScrollDown,
//!     Quit,
//! }
//!
//! let map = KeyMap::from_iter([
//!     KeyDefinition::new("j").action(ProgAction::ScrollDown),
//!     KeyDefinition::new("qq").action(ProgAction::Quit),
//!     KeyDefinition::new("i").leave_in("insert"),
//! ]);
//!
//! // A single "q" needs another key before it does anything.
//! assert!(matches!(resolve(&map, "q"), Resolution::Partial));
//!
//! // A second "q" produces the Quit action.
//! match resolve(&map, "qq") {
//!     Resolution::Matched { def, count } => {
//!         assert_eq!(def.action, Some(ProgAction::Quit));
//!         assert_eq!(count, 1);
//!     },
//!     _ => panic!("expected a match"),
//! }
//!
//! // Counts get split off of the front of the keys.
//! match resolve(&map, "3j") {
//!     Resolution::Matched { def, count } => {
//!         assert_eq!(def.action, Some(ProgAction::ScrollDown));
//!         assert_eq!(count, 3);
//!     },
//!     _ => panic!("expected a match"),
//! }
//!
//! // Nothing starts with "x".
//! assert!(matches!(resolve(&map, "x"), Resolution::NoMatch));
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_to_int_with_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use radix_trie::{Trie, TrieCommon};

mod chain;

pub use self::chain::CommandChain;

/// Errors returned while looking up or registering modes.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum ModeError {
    /// Tried to switch to a mode that was never registered.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Tried to register two modes with the same name.
    #[error("A mode named {0:?} is already registered")]
    DuplicateMode(String),
}

/// Trait for keys that can be accumulated into a [CommandChain].
pub trait InputKey: Clone + Debug + Eq + Hash {
    /// Append the written form of this key to a pattern string.
    ///
    /// The written form is what [KeyDefinition::keys] patterns are compared against.
    fn write_pattern(&self, out: &mut String);

    /// Return this key's representation as a single, printable codepoint, if it exists.
    fn get_char(&self) -> Option<char>;
}

impl InputKey for char {
    fn write_pattern(&self, out: &mut String) {
        out.push(*self);
    }

    fn get_char(&self) -> Option<char> {
        Some(*self)
    }
}

/// A single binding inside of a [KeyMap].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyDefinition<A> {
    /// The written key pattern that triggers this binding.
    pub keys: String,

    /// What to do once the keys have been typed.
    pub action: Option<A>,

    /// The mode to switch into after running the action.
    pub leave_in_mode: Option<String>,
}

impl<A> KeyDefinition<A> {
    /// Create a binding for a key pattern that does nothing until given an action or mode.
    pub fn new<T: Into<String>>(keys: T) -> Self {
        KeyDefinition { keys: keys.into(), action: None, leave_in_mode: None }
    }

    /// Set the action this binding runs.
    pub fn action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the mode this binding switches into afterwards.
    pub fn leave_in<T: Into<String>>(mut self, mode: T) -> Self {
        self.leave_in_mode = Some(mode.into());
        self
    }
}

/// An ordered collection of [KeyDefinition] values scoped to one mode.
///
/// When two definitions use the same pattern, the one added first wins.
#[derive(Clone)]
pub struct KeyMap<A> {
    defs: Vec<KeyDefinition<A>>,
    index: Trie<String, usize>,
}

impl<A> KeyMap<A> {
    /// Create an empty key map.
    pub fn new() -> Self {
        KeyMap { defs: vec![], index: Trie::new() }
    }

    /// Add a definition to the end of this map.
    pub fn add(&mut self, def: KeyDefinition<A>) {
        let idx = self.defs.len();

        if self.index.get(&def.keys).is_none() {
            self.index.insert(def.keys.clone(), idx);
        }

        self.defs.push(def);
    }

    /// Add a definition and return the updated map.
    pub fn bind(mut self, def: KeyDefinition<A>) -> Self {
        self.add(def);
        self
    }

    /// Add every definition from another map after the ones already present.
    pub fn extend<I: IntoIterator<Item = KeyDefinition<A>>>(&mut self, defs: I) {
        for def in defs {
            self.add(def);
        }
    }

    /// Look up the definition whose pattern is exactly `keys`.
    pub fn get(&self, keys: &str) -> Option<&KeyDefinition<A>> {
        self.index.get(keys).and_then(|idx| self.defs.get(*idx))
    }

    /// Whether some definition has `keys` as a proper prefix of its pattern.
    pub fn is_prefix(&self, keys: &str) -> bool {
        if keys.is_empty() {
            return !self.defs.is_empty();
        }

        // The trie splits on bytes, so confirm that the prefix ends on a character boundary.
        self.index
            .get_raw_descendant(keys)
            .map(|sub| sub.keys().any(|k| k.len() > keys.len() && k.starts_with(keys)))
            .unwrap_or(false)
    }

    /// Iterate over the definitions in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &KeyDefinition<A>> {
        self.defs.iter()
    }

    /// The number of definitions in this map.
    pub fn len(&self) -> usize {
        self.defs.len()
    }
}

impl<A> Default for KeyMap<A> {
    fn default() -> Self {
        KeyMap::new()
    }
}

impl<A> FromIterator<KeyDefinition<A>> for KeyMap<A> {
    fn from_iter<I: IntoIterator<Item = KeyDefinition<A>>>(iter: I) -> Self {
        let mut map = KeyMap::new();
        map.extend(iter);
        map
    }
}

impl<A: Debug> Debug for KeyMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.defs.iter()).finish()
    }
}

/// The outcome of resolving accumulated keys against a [KeyMap].
#[derive(Debug, Eq, PartialEq)]
pub enum Resolution<'a, A> {
    /// The keys exactly match a binding.
    Matched {
        /// The binding that was matched.
        def: &'a KeyDefinition<A>,

        /// The repeat count typed before the binding, or 1.
        count: usize,
    },

    /// The keys are the start of at least one binding.
    Partial,

    /// Nothing matches the keys.
    NoMatch,
}

/// Split a leading repeat count off of some keys.
///
/// Missing counts and a count of zero are both treated as 1. Returns `None` if the count is too
/// large to represent.
pub fn parse_count(keys: &str) -> Option<(usize, &str)> {
    let split = keys.find(|c: char| !c.is_ascii_digit()).unwrap_or(keys.len());
    let (digits, rest) = keys.split_at(split);

    if digits.is_empty() {
        return Some((1, rest));
    }

    let count = digits.parse::<usize>().ok()?;

    return Some((count.max(1), rest));
}

/// Resolve accumulated keys against a [KeyMap].
pub fn resolve<'a, A>(map: &'a KeyMap<A>, keys: &str) -> Resolution<'a, A> {
    let Some((count, rest)) = parse_count(keys) else {
        return Resolution::NoMatch;
    };

    if rest.is_empty() {
        // Only a count has been typed so far.
        return Resolution::Partial;
    }

    if let Some(def) = map.get(rest) {
        return Resolution::Matched { def, count };
    }

    if map.is_prefix(rest) {
        return Resolution::Partial;
    }

    return Resolution::NoMatch;
}

/// Information the registry needs from each mode.
pub trait ModeInfo {
    /// A unique name for this mode.
    fn name(&self) -> &str;

    /// A user-friendly description of this mode to show in a status line.
    fn status_text(&self) -> &str;

    /// Whether keys typed in this mode should insert text instead of being interpreted.
    fn is_insert_mode(&self) -> bool {
        false
    }
}

/// Tracks the registered modes, the current mode, and the pending [CommandChain].
pub struct ModeRegistry<M: ?Sized, K> {
    modes: Vec<Arc<M>>,
    index: HashMap<String, usize>,
    current: Option<usize>,
    chain: CommandChain<K>,
}

impl<M, K> ModeRegistry<M, K>
where
    M: ModeInfo + ?Sized,
    K: InputKey,
{
    /// Create a registry without any modes.
    pub fn new() -> Self {
        ModeRegistry {
            modes: vec![],
            index: HashMap::new(),
            current: None,
            chain: CommandChain::default(),
        }
    }

    /// Add a new mode.
    pub fn register(&mut self, mode: Arc<M>) -> Result<(), ModeError> {
        let name = mode.name().to_string();

        if self.index.contains_key(&name) {
            return Err(ModeError::DuplicateMode(name));
        }

        self.index.insert(name, self.modes.len());
        self.modes.push(mode);

        Ok(())
    }

    /// Fetch a registered mode by name.
    pub fn lookup(&self, name: &str) -> Result<Arc<M>, ModeError> {
        self.index
            .get(name)
            .and_then(|idx| self.modes.get(*idx))
            .cloned()
            .ok_or_else(|| ModeError::UnknownMode(name.to_string()))
    }

    /// Whether a mode with this name has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Make a registered mode the current one, and empty the pending chain.
    ///
    /// Returns the name of the previously active mode, if there was one. If the target mode is
    /// unknown, nothing is changed.
    pub fn switch(&mut self, name: &str) -> Result<Option<String>, ModeError> {
        let Some(idx) = self.index.get(name).copied() else {
            return Err(ModeError::UnknownMode(name.to_string()));
        };

        let previous = self.current().map(|m| m.name().to_string());

        self.current = Some(idx);
        self.chain.clear();

        tracing::debug!(from = ?previous, to = name, "switched modes");

        Ok(previous)
    }

    /// The currently active mode.
    pub fn current(&self) -> Option<&Arc<M>> {
        self.current.and_then(|idx| self.modes.get(idx))
    }

    /// The name of the currently active mode.
    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|m| m.name())
    }

    /// The keys typed since the last dispatch or reset.
    pub fn chain(&self) -> &CommandChain<K> {
        &self.chain
    }

    /// Add a key to the pending chain.
    pub fn push_key(&mut self, key: K) {
        self.chain.push(key);
    }

    /// Discard any pending keys.
    pub fn reset_chain(&mut self) {
        self.chain.clear();
    }

    /// Iterate over the names of every registered mode, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modes.iter().map(|m| m.name())
    }

    /// Describe the current mode and pending keys for display in a status line.
    ///
    /// When no keys are pending, the placeholder is shown in their place.
    pub fn status_line(&self, placeholder: &str) -> String {
        let Some(mode) = self.current() else {
            return String::new();
        };

        let chain = if self.chain.is_empty() {
            placeholder.to_string()
        } else {
            self.chain.to_string()
        };

        if chain.is_empty() {
            return mode.status_text().to_string();
        }

        return format!("{} {}", mode.status_text(), chain);
    }
}

impl<M, K> Default for ModeRegistry<M, K>
where
    M: ModeInfo + ?Sized,
    K: InputKey,
{
    fn default() -> Self {
        ModeRegistry::new()
    }
}

impl<M: ?Sized, K> Debug for ModeRegistry<M, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.modes.len())
            .field("current", &self.current)
            .finish()
    }
}
