//! # Editing support
//!
//! ## Overview
//!
//! This module contains the code that acts on a document once keys have been resolved: the
//! verb-object [operations](operation), the [surround] engine, and an in-memory reference host
//! made up of an [EditRope](rope::EditRope) document, an [EditBuffer](buffer::EditBuffer) editor,
//! a [SyntaxArena](syntax::SyntaxArena) tree and the clipboard and status types in [store].
pub mod buffer;
pub mod operation;
pub mod rope;
pub mod store;
pub mod surround;
pub mod syntax;
