/// Key codes representing individual keys on the keyboard.
///
/// This enum provides a platform-agnostic representation of keys.
/// Hosts should map their platform-specific key events to these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A character key, as produced by the key press. Hosts should deliver
    /// the shifted character directly ('D', '$', ...) rather than a SHIFT
    /// modifier plus the base key.
    Char(char),
    /// The Escape key, used to exit modes and cancel pending commands.
    Esc,
    /// The Enter/Return key.
    Enter,
    /// The Backspace key.
    Backspace,
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press event with optional modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

/// Input events that can be processed by the interpreter.
///
/// This enum distinguishes between key presses (used for commands)
/// and text input (used in insert mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press event, typically used for commands and navigation.
    Key(KeyEvent),
    /// A character received in text input mode (insert).
    /// This allows hosts to handle composed characters and IME input.
    ReceivedChar(char),
}
