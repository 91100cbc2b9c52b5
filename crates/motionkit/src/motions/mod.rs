//! # Motions
//!
//! ## Overview
//!
//! A motion maps a selection and the document it belongs to onto zero or more new selections.
//! An empty result means that nothing was found, and callers should leave the selection alone.
//! Motions never fail in any other way.
//!
//! Every motion is described by a [MotionSpec], and the [MotionRegistry] maps written key
//! patterns like `"iw"` or `"a<lt>"` onto them. Character searches (`f`, `F`, `t` and `T`) take
//! the key typed after them as their target, and are built while looking them up.
//!
//! ## Example
//!
//! ```
//! use motionkit::editor_types::prelude::{Position, Selection};
//! use motionkit::key::Key;
//! use motionkit::motions::{MotionContext, MotionLookup, MotionRegistry};
//!
//! let registry = MotionRegistry::default();
//! let keys = Key::parse_seq("a(").unwrap();
//!
//! let MotionLookup::Found(motion) = registry.find(&keys) else {
//!     panic!("expected a motion");
//! };
//!
//! let text = String::from("First (second) third");
//! let ctx = MotionContext::new(&text, None);
//! let cursor = Selection::caret(Position::new(0, 9));
//!
//! let res = motion.apply(&cursor, &ctx);
//! assert_eq!(res, vec![Selection::new(Position::new(0, 6), Position::new(0, 14))]);
//! ```
use radix_trie::{Trie, TrieCommon};

use editor_types::prelude::{Inclusion, MoveDir1D, ObjectScope, Selection};
use editor_types::Document;
use keybindings::InputKey;

use crate::editing::syntax::SyntaxTree;
use crate::key::Key;

mod line;
mod pair;
mod tree;
mod word;

pub use self::pair::matching_bracket;

/// Which characters make up a word.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WordStyle {
    /// Runs of letters, digits and underscores.
    Little,

    /// Runs of anything that isn't whitespace.
    Big,
}

/// How a token motion positions the resulting selection.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenMotion {
    /// Move the active end to the end of the token under the cursor.
    Forward,

    /// Move the active end to the start of the token before the cursor.
    Backward,

    /// Select the token under the cursor.
    Inside,

    /// Select the token under the cursor and the whitespace after it.
    Around,
}

/// What a pair motion does once it finds the enclosing delimiters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PairTarget {
    /// Select the pair's contents, with or without the delimiters.
    Object(ObjectScope),

    /// Move the active end onto the opening ([MoveDir1D::Previous]) or closing
    /// ([MoveDir1D::Next]) delimiter.
    Direction(MoveDir1D),
}

/// Description of a motion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MotionSpec {
    /// Word and WORD motions.
    Word {
        /// What counts as a word.
        style: WordStyle,
        /// How to select it.
        kind: TokenMotion,
    },

    /// Motions over the parts of a `camelCase` or `snake_case` word.
    WordPart(TokenMotion),

    /// Find the delimiters enclosing the cursor.
    Pair {
        /// The opening delimiter.
        open: char,
        /// The closing delimiter.
        close: char,
        /// What to do with the delimiters once found.
        target: PairTarget,
    },

    /// Select whichever of several delimiter pairs most tightly encloses the cursor.
    NarrowestPair {
        /// Candidate (open, close) pairs.
        pairs: Vec<(char, char)>,
        /// Whether to include the delimiters.
        scope: ObjectScope,
    },

    /// The run of lines at least as indented as the cursor's line.
    Indentation(ObjectScope),

    /// Move to the start or the end of the line.
    Extremity(MoveDir1D),

    /// Search the current line for a character.
    CharSearch {
        /// The character to look for.
        target: char,
        /// Whether the found character ends up in the selection.
        inclusion: Inclusion,
        /// Which way to search.
        dir: MoveDir1D,
    },

    /// The markup element or tag under the cursor.
    Element(ObjectScope),

    /// The function definition containing the cursor.
    Function,

    /// The comment under the cursor.
    Comment,

    /// The property, parameter or argument containing the cursor.
    PropertyOrParameter(ObjectScope),

    /// The smallest named syntax node under the cursor.
    Node,
}

impl MotionSpec {
    /// Whether this motion only works when a syntax tree is available.
    pub fn requires_syntax(&self) -> bool {
        match self {
            MotionSpec::Element(_) |
            MotionSpec::Function |
            MotionSpec::Comment |
            MotionSpec::PropertyOrParameter(_) |
            MotionSpec::Node => true,
            _ => false,
        }
    }

    /// Apply this motion to a selection.
    ///
    /// Motions that need a syntax tree return nothing when the context doesn't have one.
    pub fn apply(&self, sel: &Selection, ctx: &MotionContext<'_>) -> Vec<Selection> {
        let doc = ctx.document;

        match self {
            MotionSpec::Word { style, kind } => word::word_motion(*style, *kind, sel, doc),
            MotionSpec::WordPart(kind) => word::word_part_motion(*kind, sel, doc),
            MotionSpec::Pair { open, close, target } => {
                pair::pair_motion(*open, *close, *target, sel, doc)
            },
            MotionSpec::NarrowestPair { pairs, scope } => {
                pair::narrowest_pair_motion(pairs, *scope, sel, doc)
            },
            MotionSpec::Indentation(scope) => line::indentation_motion(*scope, sel, doc),
            MotionSpec::Extremity(dir) => line::extremity_motion(*dir, sel, doc),
            MotionSpec::CharSearch { target, inclusion, dir } => {
                line::char_search_motion(*target, *inclusion, *dir, sel, doc)
            },
            MotionSpec::Element(scope) => {
                ctx.with_syntax(|tree| tree::element_motion(*scope, sel, tree))
            },
            MotionSpec::Function => ctx.with_syntax(|tree| tree::function_motion(sel, tree)),
            MotionSpec::Comment => ctx.with_syntax(|tree| tree::comment_motion(sel, doc, tree)),
            MotionSpec::PropertyOrParameter(scope) => {
                ctx.with_syntax(|tree| tree::property_or_parameter_motion(*scope, sel, doc, tree))
            },
            MotionSpec::Node => ctx.with_syntax(|tree| tree::node_motion(sel, tree)),
        }
    }
}

/// The document, and optionally its syntax tree, that motions get applied within.
#[derive(Clone, Copy)]
pub struct MotionContext<'a> {
    /// The document being searched.
    pub document: &'a dyn Document,

    /// The document's syntax tree, if the host can provide one.
    pub syntax: Option<&'a dyn SyntaxTree>,
}

impl<'a> MotionContext<'a> {
    /// Create a new context.
    pub fn new(document: &'a dyn Document, syntax: Option<&'a dyn SyntaxTree>) -> Self {
        MotionContext { document, syntax }
    }

    fn with_syntax<F>(&self, f: F) -> Vec<Selection>
    where
        F: FnOnce(&dyn SyntaxTree) -> Vec<Selection>,
    {
        match self.syntax {
            Some(tree) => f(tree),
            None => vec![],
        }
    }
}

/// The result of looking up typed keys in a [MotionRegistry].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MotionLookup {
    /// The keys name a motion.
    Found(MotionSpec),

    /// The keys are the start of at least one motion.
    Partial,

    /// No motion starts with these keys.
    Unknown,
}

/// Maps written key patterns onto motions.
#[derive(Clone)]
pub struct MotionRegistry {
    motions: Trie<String, MotionSpec>,
}

impl MotionRegistry {
    /// Create a registry without any motions.
    pub fn empty() -> Self {
        MotionRegistry { motions: Trie::new() }
    }

    /// Bind a motion to a key pattern, replacing any motion already bound to it.
    pub fn add<T: Into<String>>(&mut self, keys: T, motion: MotionSpec) {
        self.motions.insert(keys.into(), motion);
    }

    /// Fetch the motion bound to a key pattern.
    pub fn get(&self, keys: &str) -> Option<&MotionSpec> {
        self.motions.get(keys)
    }

    /// The number of bound key patterns.
    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Look up the motion named by some typed keys.
    pub fn find(&self, keys: &[Key]) -> MotionLookup {
        if let Some(lookup) = char_search(keys) {
            return lookup;
        }

        let mut pattern = String::new();

        for key in keys {
            key.write_pattern(&mut pattern);
        }

        if let Some(motion) = self.motions.get(&pattern) {
            return MotionLookup::Found(motion.clone());
        }

        let partial = self
            .motions
            .get_raw_descendant(&pattern)
            .map(|sub| sub.keys().any(|k| k.len() > pattern.len() && k.starts_with(&pattern)))
            .unwrap_or(false);

        if partial {
            return MotionLookup::Partial;
        }

        return MotionLookup::Unknown;
    }
}

impl std::fmt::Debug for MotionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.motions.iter()).finish()
    }
}

/// Build `f`, `F`, `t` and `T` searches from the key typed after them.
fn char_search(keys: &[Key]) -> Option<MotionLookup> {
    let (inclusion, dir) = match keys.first()?.get_char()? {
        'f' => (Inclusion::Inclusive, MoveDir1D::Next),
        'F' => (Inclusion::Inclusive, MoveDir1D::Previous),
        't' => (Inclusion::Exclusive, MoveDir1D::Next),
        'T' => (Inclusion::Exclusive, MoveDir1D::Previous),
        _ => return None,
    };

    let lookup = match keys {
        [_] => MotionLookup::Partial,
        [_, Key::Char(target)] => {
            MotionLookup::Found(MotionSpec::CharSearch { target: *target, inclusion, dir })
        },
        _ => MotionLookup::Unknown,
    };

    return Some(lookup);
}

const QUOTES: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('`', '`')];
const BRACKETS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

impl Default for MotionRegistry {
    fn default() -> Self {
        use MotionSpec as M;
        use ObjectScope::{Around, Inside};

        let mut reg = MotionRegistry::empty();

        let words = [
            ("w", WordStyle::Little, TokenMotion::Forward),
            ("b", WordStyle::Little, TokenMotion::Backward),
            ("iw", WordStyle::Little, TokenMotion::Inside),
            ("aw", WordStyle::Little, TokenMotion::Around),
            ("W", WordStyle::Big, TokenMotion::Forward),
            ("B", WordStyle::Big, TokenMotion::Backward),
            ("iW", WordStyle::Big, TokenMotion::Inside),
            ("aW", WordStyle::Big, TokenMotion::Around),
        ];

        for (keys, style, kind) in words {
            reg.add(keys, M::Word { style, kind });
        }

        reg.add("æ", M::WordPart(TokenMotion::Forward));
        reg.add("ø", M::WordPart(TokenMotion::Backward));
        reg.add("iæ", M::WordPart(TokenMotion::Inside));

        let object = |open, close, scope| M::Pair { open, close, target: PairTarget::Object(scope) };

        for (open, close) in QUOTES {
            reg.add(format!("i{open}"), object(open, close, Inside));
            reg.add(format!("a{open}"), object(open, close, Around));
        }

        reg.add("ib", object('`', '`', Inside));
        reg.add("ab", object('`', '`', Around));

        for (open, close) in BRACKETS {
            let mut o = String::new();
            let mut c = String::new();
            Key::Char(open).write_pattern(&mut o);
            Key::Char(close).write_pattern(&mut c);

            reg.add(format!("i{o}"), object(open, close, Inside));
            reg.add(format!("a{o}"), object(open, close, Around));
            reg.add(format!("i{c}"), object(open, close, Inside));
            reg.add(format!("a{c}"), object(open, close, Around));
        }

        for (open, close) in &BRACKETS[..3] {
            let to = |dir| M::Pair { open: *open, close: *close, target: PairTarget::Direction(dir) };

            reg.add(open.to_string(), to(MoveDir1D::Previous));
            reg.add(close.to_string(), to(MoveDir1D::Next));
        }

        reg.add("iq", M::NarrowestPair { pairs: QUOTES.to_vec(), scope: Inside });
        reg.add("aq", M::NarrowestPair { pairs: QUOTES.to_vec(), scope: Around });
        reg.add("ip", M::NarrowestPair { pairs: BRACKETS.to_vec(), scope: Inside });
        reg.add("ap", M::NarrowestPair { pairs: BRACKETS.to_vec(), scope: Around });

        reg.add("ii", M::Indentation(Inside));
        reg.add("ai", M::Indentation(Around));
        reg.add("^", M::Extremity(MoveDir1D::Previous));
        reg.add("$", M::Extremity(MoveDir1D::Next));

        reg.add("ie", M::Element(Inside));
        reg.add("ae", M::Element(Around));
        reg.add("af", M::Function);
        reg.add("ac", M::Comment);
        reg.add("ia", M::PropertyOrParameter(Inside));
        reg.add("aa", M::PropertyOrParameter(Around));
        reg.add("an", M::Node);

        return reg;
    }
}
