//! The motion resolver: a pure mapping from (motion, count, buffer, position)
//! to a target position with direction and range metadata.

use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::Buffer;
use crate::types::{Mode, Position};

/// Which tokenization a word motion walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// `w`/`e`/`b`: alternating runs of word characters and punctuation,
    /// separated by whitespace.
    Small,
    /// `W`/`E`/`B`: maximal non-whitespace runs.
    Big,
}

/// A cursor motion. Motions never mutate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    FirstNonBlank,
    LineEnd,
    WordForward(WordKind),
    WordEnd(WordKind),
    WordBack(WordKind),
    /// `gg`: first line, or the absolute line when a count was given.
    FirstLine,
    /// `G`: last line, or the absolute line when a count was given.
    LastLine,
    /// `f`/`t`: the count'th occurrence of a character on the current line.
    FindChar { target: char, till: bool },
}

/// A resolved motion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionOutcome {
    pub pos: Position,
    /// Inclusive motions include the character at the target offset when
    /// used as an operator range.
    pub inclusive: bool,
    /// Line-based motions always produce linewise operator ranges.
    pub linewise: bool,
}

impl MotionOutcome {
    fn charwise(pos: Position) -> Self {
        Self { pos, inclusive: false, linewise: false }
    }

    fn inclusive(pos: Position) -> Self {
        Self { pos, inclusive: true, linewise: false }
    }

    fn linewise(pos: Position) -> Self {
        Self { pos, inclusive: false, linewise: true }
    }
}

/// Resolves a motion from `pos`, which is clamped to the buffer first.
///
/// `explicit_count` distinguishes `G` (last line) from `1G` (line one).
/// `None` means the target does not exist (`f`/`t` with no such character);
/// the caller treats that as a silent no-op.
pub fn resolve(
    buf: &Buffer,
    pos: Position,
    motion: Motion,
    count: u32,
    explicit_count: bool,
    mode: Mode,
) -> Option<MotionOutcome> {
    // Vertical motions keep the caller's requested column (which may exceed
    // the current line) so a sticky column survives passing over short lines;
    // the clamp at the destination line bounds it.
    let requested_col = pos.col;
    let pos = buf.clamp(pos, mode);
    let count = count.max(1);

    let outcome = match motion {
        Motion::Left => {
            MotionOutcome::charwise(Position::new(pos.row, pos.col.saturating_sub(count)))
        }
        Motion::Right => {
            let target = Position::new(pos.row, pos.col.saturating_add(count));
            MotionOutcome::charwise(buf.clamp(target, mode))
        }
        Motion::Up => {
            let row = pos.row.saturating_sub(count).max(1);
            MotionOutcome::linewise(buf.clamp(Position::new(row, requested_col), mode))
        }
        Motion::Down => {
            let row = pos.row.saturating_add(count).min(buf.line_count());
            MotionOutcome::linewise(buf.clamp(Position::new(row, requested_col), mode))
        }
        Motion::LineStart => MotionOutcome::charwise(Position::new(pos.row, 0)),
        Motion::FirstNonBlank => {
            let col = buf.indentation_width(pos.row);
            MotionOutcome::charwise(buf.clamp(Position::new(pos.row, col), mode))
        }
        Motion::LineEnd => {
            // Conceptually an infinite column; the clamp pulls it back.
            let target = Position::new(pos.row, u32::MAX);
            MotionOutcome::inclusive(buf.clamp(target, mode))
        }
        Motion::FirstLine => {
            let row = if explicit_count { count } else { 1 };
            MotionOutcome::linewise(buf.clamp(Position::new(row, 0), mode))
        }
        Motion::LastLine => {
            let row = if explicit_count { count } else { buf.line_count() };
            MotionOutcome::linewise(buf.clamp(Position::new(row, 0), mode))
        }
        Motion::WordForward(kind) => {
            let off = word_forward(buf, pos, count, kind);
            MotionOutcome::charwise(buf.to_position(off))
        }
        Motion::WordEnd(kind) => {
            let off = word_end(buf, pos, count, kind);
            MotionOutcome::inclusive(buf.to_position(off))
        }
        Motion::WordBack(kind) => {
            let off = word_back(buf, pos, count, kind);
            MotionOutcome::charwise(buf.to_position(off))
        }
        Motion::FindChar { target, till } => {
            let col = find_in_line(buf, pos, target, till, count)?;
            return Some(MotionOutcome::inclusive(Position::new(pos.row, col)));
        }
    };
    Some(outcome)
}

/// Character class used by the word tokenizations. For `WordKind::Big`
/// everything that is not whitespace collapses into one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Whitespace,
    Word,
    Punct,
}

pub(crate) fn classify(grapheme: &str, kind: WordKind) -> CharClass {
    let c = grapheme.chars().next().unwrap_or(' ');
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if kind == WordKind::Big || c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

fn word_forward(buf: &Buffer, pos: Position, count: u32, kind: WordKind) -> usize {
    let text = buf.to_text();
    let gs: Vec<&str> = text.graphemes(true).collect();
    let len = gs.len();
    let mut i = buf.to_offset(pos, Mode::Insert).min(len);

    for _ in 0..count {
        if i >= len {
            break;
        }
        let class = classify(gs[i], kind);
        if class != CharClass::Whitespace {
            while i < len && classify(gs[i], kind) == class {
                i += 1;
            }
        }
        while i < len && classify(gs[i], kind) == CharClass::Whitespace {
            i += 1;
        }
    }
    i
}

fn word_end(buf: &Buffer, pos: Position, count: u32, kind: WordKind) -> usize {
    let text = buf.to_text();
    let gs: Vec<&str> = text.graphemes(true).collect();
    let len = gs.len();
    let mut i = buf.to_offset(pos, Mode::Insert).min(len);

    for _ in 0..count {
        // Nudge one grapheme forward so a cursor already on a word end makes
        // progress instead of stalling.
        i += 1;
        while i < len && classify(gs[i], kind) == CharClass::Whitespace {
            i += 1;
        }
        if i >= len {
            break;
        }
        let class = classify(gs[i], kind);
        while i + 1 < len && classify(gs[i + 1], kind) == class {
            i += 1;
        }
    }
    i.min(len.saturating_sub(1))
}

fn word_back(buf: &Buffer, pos: Position, count: u32, kind: WordKind) -> usize {
    let text = buf.to_text();
    let gs: Vec<&str> = text.graphemes(true).collect();
    let len = gs.len();
    let mut i = buf.to_offset(pos, Mode::Insert).min(len);

    for _ in 0..count {
        if i == 0 {
            break;
        }
        i -= 1;
        while i > 0 && classify(gs[i], kind) == CharClass::Whitespace {
            i -= 1;
        }
        if i < len && classify(gs[i], kind) != CharClass::Whitespace {
            let class = classify(gs[i], kind);
            while i > 0 && classify(gs[i - 1], kind) == class {
                i -= 1;
            }
        }
    }
    i
}

/// Column of the count'th occurrence of `target` after the cursor on the
/// current line, adjusted one left for till-style searches.
fn find_in_line(buf: &Buffer, pos: Position, target: char, till: bool, count: u32) -> Option<u32> {
    let line = buf.line(pos.row);
    let mut remaining = count;
    for (col, g) in line.graphemes(true).enumerate() {
        if col as u32 <= pos.col {
            continue;
        }
        if g.chars().next() == Some(target) {
            remaining -= 1;
            if remaining == 0 {
                let col = col as u32;
                return Some(if till { col - 1 } else { col });
            }
        }
    }
    None
}
