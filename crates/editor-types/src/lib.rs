//! # Editor Types
//!
//! ## Overview
//!
//! The types in this crate describe locations and spans of text inside of a document, without
//! tying them to any particular text storage. Consumers use them to talk about where an editing
//! operation should take place, and implement [Document] for whatever buffer they keep text in.
//!
//! ## Examples
//!
//! ```
//! use editor_types::Document;
//! use editor_types::prelude::*;
//!
//! let doc = "Hello world\nsecond line\n";
//!
//! // Place a caret on the "w" of "world".
//! let caret = Selection::caret(Position::new(0, 6));
//! assert!(caret.is_empty());
//!
//! // Select the whole second line.
//! let line = Selection::from(doc.line_range(1));
//! assert_eq!(doc.text_in(&line.range()), "second line");
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_to_int_with_if)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::needless_return)]
pub mod document;
pub mod prelude;
pub mod util;

pub use self::document::Document;
