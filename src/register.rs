//! The implicit register and its adapter onto the external clipboard.

use log::debug;

use crate::traits::Clipboard;

/// The last yanked or deleted payload together with its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterContents {
    pub text: String,
    /// Linewise payloads paste as whole lines; charwise ones inline.
    pub linewise: bool,
}

/// Single implicit register, mirrored to the external clipboard on write.
///
/// Reads prefer the external clipboard so content copied in other
/// applications pastes naturally; the in-process value is the fallback when
/// the external store is absent or fails.
#[derive(Debug, Default, Clone)]
pub struct Registers {
    unnamed: Option<RegisterContents>,
}

impl Registers {
    /// Records a yank/delete payload and mirrors it externally.
    pub fn record<C: Clipboard>(&mut self, clipboard: &mut C, text: String, linewise: bool) {
        clipboard.set(text.clone());
        self.unnamed = Some(RegisterContents { text, linewise });
    }

    /// The payload a paste should use.
    ///
    /// External text identical to the recorded one keeps the recorded shape;
    /// otherwise the shape is inferred from a trailing newline. A failed or
    /// unavailable external read falls back to the in-process value.
    pub fn paste_source<C: Clipboard>(&mut self, clipboard: &mut C) -> Option<RegisterContents> {
        match clipboard.get() {
            Some(text) => {
                let linewise = match &self.unnamed {
                    Some(local) if local.text == text => local.linewise,
                    _ => text.ends_with('\n'),
                };
                Some(RegisterContents { text, linewise })
            }
            None => {
                debug!("external clipboard read failed, using in-process register");
                self.unnamed.clone()
            }
        }
    }
}

/// System clipboard adapter backed by `arboard`.
///
/// Best-effort: construction and I/O failures all degrade to the in-process
/// register via `None`.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            inner: arboard::Clipboard::new().ok(),
        }
    }
}

#[cfg(feature = "clipboard")]
impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        self.inner.as_mut().and_then(|c| c.get_text().ok())
    }

    fn set(&mut self, text: String) {
        if let Some(c) = self.inner.as_mut() {
            let _ = c.set_text(text);
        }
    }
}
