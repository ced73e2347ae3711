/// A cursor position within a text buffer.
///
/// Rows are 1-based (matching how editors number lines), columns are
/// zero-based and counted in grapheme clusters, not bytes or chars. This
/// ensures correct handling of emoji and combining characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    /// One-based row number.
    pub row: u32,
    /// Zero-based column in grapheme clusters.
    pub col: u32,
}

impl Position {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A half-open range of linear grapheme offsets `[start, end)`.
///
/// Line separators count as one grapheme each, so a span can cross lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// The current mode of the interpreter.
///
/// The same keys perform different actions depending on the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal mode - for navigation and operators.
    Normal,
    /// Insert mode - for typing text.
    Insert,
    /// Visual mode - for selecting text.
    Visual(VisualKind),
}

/// The type of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualKind {
    /// Character-wise selection (v).
    CharWise,
    /// Line-wise selection (V).
    LineWise,
}

impl Mode {
    /// How far short of the line length the column is clamped in this mode.
    ///
    /// Normal and Visual keep the cursor on a character; Insert allows it one
    /// past the last character.
    pub fn clamp_offset(self) -> u32 {
        match self {
            Mode::Insert => 0,
            Mode::Normal | Mode::Visual(_) => 1,
        }
    }

    /// Status-line name of the mode.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual(VisualKind::CharWise) => "VISUAL",
            Mode::Visual(VisualKind::LineWise) => "VISUAL LINE",
        }
    }
}
