//! # Shared stores
//!
//! ## Overview
//!
//! These components hold the state that is shared between the engine and its host: the
//! clipboard that text gets yanked into, and a log of what the status line should be showing.
//!
//! ## Example
//!
//! ```
//! use motionkit::editing::store::MemoryClipboard;
//!
//! let clipboard = MemoryClipboard::default();
//! let handle = clipboard.clone();
//!
//! handle.set("Hello");
//! assert_eq!(clipboard.get(), "Hello");
//! ```
use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;

use crate::errors::HostError;
use crate::host::{Clipboard, MessageLevel, StatusDisplay, StatusInfo};

#[cfg(feature = "clipboard")]
mod system;

#[cfg(feature = "clipboard")]
pub use self::system::SystemClipboard;

/// An in-process [Clipboard].
///
/// Clones share the same contents, so a host can keep a handle to inspect what was yanked.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    text: Rc<RefCell<String>>,
}

impl MemoryClipboard {
    /// The current contents.
    pub fn get(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the current contents.
    pub fn set<T: Into<String>>(&self, text: T) {
        *self.text.borrow_mut() = text.into();
    }
}

#[async_trait(?Send)]
impl Clipboard for MemoryClipboard {
    async fn read_text(&mut self) -> Result<String, HostError> {
        Ok(self.get())
    }

    async fn write_text(&mut self, text: String) -> Result<(), HostError> {
        self.set(text);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct StatusState {
    info: StatusInfo,
    messages: Vec<(MessageLevel, String)>,
}

/// A [StatusDisplay] that records everything it is asked to show.
///
/// Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct StatusLog {
    state: Rc<RefCell<StatusState>>,
}

impl StatusLog {
    /// The most recently shown mode information.
    pub fn info(&self) -> StatusInfo {
        self.state.borrow().info.clone()
    }

    /// The most recently shown message.
    pub fn last(&self) -> Option<(MessageLevel, String)> {
        self.state.borrow().messages.last().cloned()
    }

    /// Every message shown so far.
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.state.borrow().messages.clone()
    }

    /// Forget the recorded messages.
    pub fn clear(&self) {
        self.state.borrow_mut().messages.clear();
    }
}

impl StatusDisplay for StatusLog {
    fn update(&mut self, info: &StatusInfo) {
        self.state.borrow_mut().info = info.clone();
    }

    fn notify(&mut self, level: MessageLevel, msg: &str) {
        self.state.borrow_mut().messages.push((level, msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_shared() {
        let mut clipboard = MemoryClipboard::default();
        let handle = clipboard.clone();

        clipboard.write_text("yanked".into()).await.unwrap();
        assert_eq!(handle.get(), "yanked");

        handle.set("other");
        assert_eq!(clipboard.read_text().await.unwrap(), "other");
    }

    #[test]
    fn test_status_log() {
        let mut log = StatusLog::default();
        let handle = log.clone();

        assert_eq!(handle.last(), None);

        log.notify(MessageLevel::Warning, "careful");
        log.notify(MessageLevel::Error, "broken");
        log.update(&StatusInfo { mode: "normal".into(), ..Default::default() });

        assert_eq!(handle.last(), Some((MessageLevel::Error, "broken".into())));
        assert_eq!(handle.messages().len(), 2);
        assert_eq!(handle.info().mode, "normal");

        handle.clear();
        assert!(log.messages().is_empty());
    }
}
