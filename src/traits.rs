use crate::types::Position;

/// The host's text and selection storage.
///
/// The surface owns the authoritative text; the interpreter reads fresh
/// state for every command and writes back the full new text plus selection
/// afterwards. It never assumes the surface retains history.
///
/// Offsets are linear indices into the document's grapheme-cluster sequence,
/// where each line separator counts as one grapheme. A collapsed selection
/// (`start == end`) is the cursor.
pub trait TextSurface {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);
}

/// Best-effort external clipboard store.
///
/// `get` returning `None` means the clipboard is unavailable or the read
/// failed; the interpreter falls back to its in-process register. Hosts with
/// a genuinely asynchronous clipboard should resolve the read before handing
/// the next key to the engine, queuing tokens in the meantime.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// Observational sink for status displays.
///
/// Called after every processed token with the mode name, the literal
/// contents of the pending command buffer, and the cursor position. Never
/// consulted for decisions.
pub trait StatusSink {
    fn on_update(&mut self, mode: &'static str, pending: &str, cursor: Position);
}
