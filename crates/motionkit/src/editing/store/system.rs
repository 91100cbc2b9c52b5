use std::cell::{RefCell, RefMut};

use arboard::{Clipboard as Arboard, Get, Set};
use async_trait::async_trait;

#[cfg(target_os = "linux")]
use arboard::{GetExtLinux, LinuxClipboardKind, SetExtLinux};

use crate::errors::HostError;
use crate::host::Clipboard;

#[cfg(target_os = "linux")]
fn get_clipboard(clipboard: &mut Arboard) -> Get<'_> {
    clipboard.get().clipboard(LinuxClipboardKind::Clipboard)
}

#[cfg(target_os = "linux")]
fn set_clipboard(clipboard: &mut Arboard) -> Set<'_> {
    clipboard.set().clipboard(LinuxClipboardKind::Clipboard)
}

#[cfg(not(target_os = "linux"))]
fn get_clipboard(clipboard: &mut Arboard) -> Get<'_> {
    clipboard.get()
}

#[cfg(not(target_os = "linux"))]
fn set_clipboard(clipboard: &mut Arboard) -> Set<'_> {
    clipboard.set()
}

/// A [Clipboard] backed by the operating system's clipboard.
pub struct SystemClipboard {
    clipboard: Option<RefCell<Arboard>>,
}

impl SystemClipboard {
    /// Connect to the system clipboard.
    ///
    /// If no clipboard is available, reads and writes will fail.
    pub fn new() -> Self {
        SystemClipboard { clipboard: Arboard::new().ok().map(RefCell::new) }
    }

    fn clipboard(&self) -> Result<RefMut<'_, Arboard>, HostError> {
        self.clipboard
            .as_ref()
            .map(RefCell::borrow_mut)
            .ok_or_else(|| HostError::Clipboard("no system clipboard available".into()))
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        SystemClipboard::new()
    }
}

#[async_trait(?Send)]
impl Clipboard for SystemClipboard {
    async fn read_text(&mut self) -> Result<String, HostError> {
        let mut clipboard = self.clipboard()?;

        get_clipboard(&mut clipboard).text().map_err(|e| HostError::Clipboard(e.to_string()))
    }

    async fn write_text(&mut self, text: String) -> Result<(), HostError> {
        let mut clipboard = self.clipboard()?;

        set_clipboard(&mut clipboard)
            .text(text)
            .map_err(|e| HostError::Clipboard(e.to_string()))
    }
}
