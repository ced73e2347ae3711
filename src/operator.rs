//! The operator engine: turns a resolved range into a buffer edit.

use crate::buffer::Buffer;
use crate::grammar::Operator;
use crate::types::{Mode, Position, Span};

/// One indent step for `>`/`<`.
pub const INDENT_UNIT: &str = "    ";

/// The range an operator applies to, as computed from a motion, text object
/// or visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRange {
    Chars(Span),
    /// Whole lines, inclusive 1-based rows.
    Lines { first: u32, last: u32 },
}

/// The effect of an operator application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpOutcome {
    /// The new buffer, when the operator mutates (`None` for yank).
    pub buffer: Option<Buffer>,
    pub cursor: Position,
    /// Payload to record in the register: (text, linewise).
    pub register: Option<(String, bool)>,
    /// Change operators transition to Insert after the edit.
    pub enter_insert: bool,
}

impl OpOutcome {
    fn noop(cursor: Position) -> Self {
        Self {
            buffer: None,
            cursor,
            register: None,
            enter_insert: false,
        }
    }
}

/// Applies an operator to a resolved range. Empty ranges are silent no-ops.
pub fn apply(op: Operator, buf: &Buffer, range: OpRange, cursor: Position) -> OpOutcome {
    match (op, normalize(buf, range)) {
        (_, None) => OpOutcome::noop(buf.clamp(cursor, Mode::Normal)),
        (Operator::Delete, Some(range)) => delete(buf, range, false),
        (Operator::Change, Some(range)) => delete(buf, range, true),
        (Operator::Yank, Some(range)) => yank(buf, range, cursor),
        (Operator::Indent, Some(range)) => reindent(buf, range, true),
        (Operator::Dedent, Some(range)) => reindent(buf, range, false),
    }
}

/// Clamps a range to the buffer and rejects empty ones.
fn normalize(buf: &Buffer, range: OpRange) -> Option<OpRange> {
    match range {
        OpRange::Chars(span) => {
            let end = span.end.min(buf.doc_len());
            let span = Span::new(span.start.min(end), end);
            (!span.is_empty()).then_some(OpRange::Chars(span))
        }
        OpRange::Lines { first, last } => {
            let first = first.clamp(1, buf.line_count());
            let last = last.clamp(first, buf.line_count());
            Some(OpRange::Lines { first, last })
        }
    }
}

fn delete(buf: &Buffer, range: OpRange, change: bool) -> OpOutcome {
    match range {
        OpRange::Chars(span) => {
            let removed = buf.slice(span);
            let (next, target) = buf.splice(span, "");
            let mode = if change { Mode::Insert } else { Mode::Normal };
            let cursor = next.clamp(next.to_position(target), mode);
            OpOutcome {
                buffer: Some(next),
                cursor,
                register: Some((removed, false)),
                enter_insert: change,
            }
        }
        OpRange::Lines { first, last } => {
            let removed = lines_text(buf, first, last);
            let count = last - first + 1;
            // A linewise change keeps one empty line to type into.
            let replacement: &[String] = if change { &[String::new()] } else { &[] };
            let (next, offset) = buf.splice_lines(first, count, replacement);
            let cursor = next.clamp(next.to_position(offset), Mode::Normal);
            OpOutcome {
                buffer: Some(next),
                cursor,
                register: Some((removed, true)),
                enter_insert: change,
            }
        }
    }
}

fn yank(buf: &Buffer, range: OpRange, cursor: Position) -> OpOutcome {
    match range {
        OpRange::Chars(span) => OpOutcome {
            buffer: None,
            cursor: buf.clamp(buf.to_position(span.start), Mode::Normal),
            register: Some((buf.slice(span), false)),
            enter_insert: false,
        },
        OpRange::Lines { first, last } => OpOutcome {
            buffer: None,
            cursor: buf.clamp(cursor, Mode::Normal),
            register: Some((lines_text(buf, first, last), true)),
            enter_insert: false,
        },
    }
}

fn reindent(buf: &Buffer, range: OpRange, deeper: bool) -> OpOutcome {
    let (first, last) = match range {
        OpRange::Lines { first, last } => (first, last),
        OpRange::Chars(span) => {
            let first = buf.to_position(span.start).row;
            let last = buf.to_position(span.end.saturating_sub(1).max(span.start)).row;
            (first, last)
        }
    };

    let replacement: Vec<String> = (first..=last)
        .map(|row| {
            let line = buf.line(row);
            if deeper {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{INDENT_UNIT}{line}")
                }
            } else {
                dedent_line(line)
            }
        })
        .collect();

    let (next, _) = buf.splice_lines(first, last - first + 1, &replacement);
    let col = next.indentation_width(first);
    let cursor = next.clamp(Position::new(first, col), Mode::Normal);
    OpOutcome {
        buffer: Some(next),
        cursor,
        register: None,
        enter_insert: false,
    }
}

/// Removes at most one indent unit of leading whitespace: a single tab, or
/// up to four spaces. Never removes more than exists.
fn dedent_line(line: &str) -> String {
    if let Some(rest) = line.strip_prefix('\t') {
        return rest.to_owned();
    }
    let leading = line.chars().take_while(|c| *c == ' ').count();
    line[leading.min(INDENT_UNIT.len())..].to_owned()
}

/// Flips ASCII letter case over the span, returning the new buffer and the
/// offset just past the flipped text.
pub fn toggle_case(buf: &Buffer, span: Span) -> (Buffer, usize) {
    let flipped: String = buf
        .slice(span)
        .chars()
        .map(|c| {
            if c.is_ascii_uppercase() {
                c.to_ascii_lowercase()
            } else if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    buf.splice(span, &flipped)
}

/// Joins `extra` following lines onto `row`, collapsing each joined line's
/// leading whitespace into a single separating space (no space when either
/// side is empty). Returns the new buffer and the cursor at the first join
/// point. `None` when there is nothing below to join.
pub fn join_lines(buf: &Buffer, row: u32, extra: u32) -> Option<(Buffer, Position)> {
    if row >= buf.line_count() {
        return None;
    }
    let extra = extra.min(buf.line_count() - row);

    let mut joined = buf.line(row).to_owned();
    let join_col = crate::buffer::grapheme_len(&joined);
    for r in row + 1..=row + extra {
        let next = buf.line(r).trim_start_matches([' ', '\t']);
        if !joined.is_empty() && !next.is_empty() {
            joined.push(' ');
        }
        joined.push_str(next);
    }

    let (next, _) = buf.splice_lines(row, extra + 1, std::slice::from_ref(&joined));
    let cursor = next.clamp(Position::new(row, join_col), Mode::Normal);
    Some((next, cursor))
}

fn lines_text(buf: &Buffer, first: u32, last: u32) -> String {
    let mut out = String::new();
    for row in first..=last {
        out.push_str(buf.line(row));
        out.push('\n');
    }
    out
}
