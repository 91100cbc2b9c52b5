//! # motionkit
//!
//! ## Overview
//!
//! This crate is a modal text-editing engine. It interprets typed keys through a set of
//! [modes](mod@env), and turns them into edits, selection changes and commands that get sent to
//! a host editor through the traits in [host].
//!
//! The pieces are:
//!
//! - [session::Session], which tracks the current mode and the pending keys, and dispatches
//!   every typed [key::Key].
//! - [motions], which find text objects (words, pairs, indentation blocks, syntax nodes and
//!   more) relative to a selection.
//! - [editing], which contains the verb-object [operations](editing::operation), the
//!   [surround](editing::surround) engine, and an in-memory host for tests and embedding.
//! - [config], for the settings shared by everything above.
//!
//! ## Example
//!
//! ```
//! use motionkit::config::SessionConfig;
//! use motionkit::editing::buffer::EditBuffer;
//! use motionkit::editing::store::{MemoryClipboard, StatusLog};
//! use motionkit::session::{KeyDisposition, Session};
//!
//! # tokio_test_block(async {
//! let mut buffer = EditBuffer::from_marked("let s = \"a[]bc\";");
//! let status = StatusLog::default();
//! let mut session =
//!     Session::new(SessionConfig::default(), MemoryClipboard::default(), status.clone()).unwrap();
//!
//! // Change inside the quotes, and then hand typed text back to the host.
//! session.feed("ci\"", &mut buffer).await.unwrap();
//! assert_eq!(buffer.render(), "let s = \"[]\";");
//! assert_eq!(status.info().mode, "insert");
//!
//! let res = session.feed("x", &mut buffer).await.unwrap();
//! assert_eq!(res, vec![KeyDisposition::PassThrough]);
//! # });
//! # fn tokio_test_block<F: std::future::Future<Output = ()>>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
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

#[macro_use]
mod util;

pub mod config;
pub mod editing;
pub mod env;
pub mod errors;
pub mod host;
pub mod key;
pub mod motions;
pub mod session;

pub use crossterm;
pub use editor_types;
pub use keybindings;
