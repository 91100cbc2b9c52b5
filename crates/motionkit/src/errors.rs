//! # Error Types
//!
//! ## Overview
//!
//! This module contains error types that group together some of the more specific errors returned
//! by components and utilities in this crate.
//!
//! A motion that doesn't find anything is not an error: it produces no selections, and callers
//! leave the affected cursor alone.
use editor_types::prelude::TextRange;
use keybindings::ModeError;

use crate::key::KeyError;

/// Errors reported by the host editor and its collaborators.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum HostError {
    /// The host doesn't know how to run a built-in command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A built-in command ran, but failed.
    #[error("Command {name} failed: {reason}")]
    CommandFailed {
        /// The command that was run.
        name: String,

        /// Why it failed.
        reason: String,
    },

    /// Failure while reading from or writing to the clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// An edit referred to a location outside of the document.
    #[error("Invalid range: {0}")]
    InvalidRange(TextRange),

    /// Two edits in the same batch tried to change the same text.
    #[error("Edits in the same batch overlap")]
    OverlappingEdits,
}

/// Errors returned from editing operations.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EditError {
    /// Failure inside of the host editor.
    #[error("{0}")]
    Host(#[from] HostError),

    /// Failure while looking up or changing modes.
    #[error("{0}")]
    Mode(#[from] ModeError),

    /// Failure while interpreting key strings.
    #[error("{0}")]
    Key(#[from] KeyError),

    /// A motion that needs a syntax tree was used on a document without one.
    #[error("No syntax tree is available for this document")]
    NoSyntaxTree,

    /// Generic failure.
    #[error("Error: {0}")]
    Failure(String),
}

/// Common result type for editing operations.
pub type EditResult<T = ()> = Result<T, EditError>;
