//! Line-based text snapshot with offset/position conversion and pure edit
//! primitives.
//!
//! A [`Buffer`] is taken from the host surface at the start of every command
//! and discarded afterwards; edits produce a new snapshot rather than
//! mutating in place.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Mode, Position, Span};

/// Grapheme-cluster length of a string.
pub fn grapheme_len(s: &str) -> u32 {
    s.graphemes(true).count() as u32
}

/// An immutable snapshot of the document as an ordered sequence of lines.
///
/// Invariant: there is always at least one line, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Buffer {
    /// Builds a snapshot from a linear string, splitting on `\n`.
    pub fn from_text(text: &str) -> Self {
        let lines = text.split('\n').map(str::to_owned).collect::<Vec<_>>();
        debug_assert!(!lines.is_empty());
        Self { lines }
    }

    /// Joins the lines back into one linear string.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// The line at the 1-based `row`, or the empty string out of range.
    pub fn line(&self, row: u32) -> &str {
        row.checked_sub(1)
            .and_then(|i| self.lines.get(i as usize))
            .map_or("", String::as_str)
    }

    /// Length of the 1-based `row` in grapheme clusters.
    pub fn line_len(&self, row: u32) -> u32 {
        self.line(row).graphemes(true).count() as u32
    }

    /// Total length of the document in grapheme clusters, counting each line
    /// separator as one.
    pub fn doc_len(&self) -> usize {
        let chars: usize = self
            .lines
            .iter()
            .map(|l| l.graphemes(true).count())
            .sum();
        chars + self.lines.len() - 1
    }

    /// Number of leading blank characters (spaces and tabs) on `row`.
    pub fn indentation_width(&self, row: u32) -> u32 {
        self.line(row)
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count() as u32
    }

    /// Clamps a position to the buffer per the mode's column rule.
    ///
    /// Rows clamp to `[1, line_count]`; columns clamp to
    /// `[0, line_len - clamp_offset]`, with empty lines always clamping to 0.
    pub fn clamp(&self, pos: Position, mode: Mode) -> Position {
        let row = pos.row.clamp(1, self.line_count());
        let max_col = self.line_len(row).saturating_sub(mode.clamp_offset());
        Position::new(row, pos.col.min(max_col))
    }

    /// Linear offset of the start of the 1-based `row` (clamped).
    pub fn row_start(&self, row: u32) -> usize {
        let row = row.clamp(1, self.line_count());
        self.lines[..(row - 1) as usize]
            .iter()
            .map(|l| l.graphemes(true).count() + 1)
            .sum()
    }

    /// Converts a linear offset to a (row, col) position.
    ///
    /// Out-of-range offsets clamp to the end of the document. The result may
    /// sit one past the last character of a line (the separator position);
    /// callers apply [`Buffer::clamp`] for mode-correct columns.
    pub fn to_position(&self, offset: usize) -> Position {
        let mut remaining = offset;
        let last = self.lines.len() - 1;
        for (i, line) in self.lines.iter().enumerate() {
            let len = line.graphemes(true).count();
            if remaining <= len || i == last {
                return Position::new(i as u32 + 1, remaining.min(len) as u32);
            }
            remaining -= len + 1;
        }
        unreachable!("buffer always has at least one line")
    }

    /// Converts a (row, col) position to a linear offset, clamping per mode.
    pub fn to_offset(&self, pos: Position, mode: Mode) -> usize {
        let pos = self.clamp(pos, mode);
        self.row_start(pos.row) + pos.col as usize
    }

    /// Extracts the text covered by a span, non-destructively.
    pub fn slice(&self, span: Span) -> String {
        let text = self.to_text();
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let start = span.start.min(graphemes.len());
        let end = span.end.clamp(start, graphemes.len());
        graphemes[start..end].concat()
    }

    /// Character splice: replaces the span with `replacement`, returning the
    /// new snapshot plus the offset just past the replacement (which is the
    /// span start for a pure deletion).
    pub fn splice(&self, span: Span, replacement: &str) -> (Buffer, usize) {
        let text = self.to_text();
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let start = span.start.min(graphemes.len());
        let end = span.end.clamp(start, graphemes.len());

        let mut out = String::with_capacity(text.len() + replacement.len());
        out.extend(graphemes[..start].iter().copied());
        out.push_str(replacement);
        out.extend(graphemes[end..].iter().copied());

        let target = start + replacement.graphemes(true).count();
        (Buffer::from_text(&out), target)
    }

    /// Line splice: removes `count` whole lines starting at the 1-based
    /// `first` (zero to insert without removing) and inserts `replacement`
    /// in their place. Returns the new snapshot plus the offset of the start
    /// of row `first` in it.
    pub fn splice_lines(&self, first: u32, count: u32, replacement: &[String]) -> (Buffer, usize) {
        let first = first.clamp(1, self.line_count() + 1) as usize;
        let removed = (count as usize).min(self.lines.len() - (first - 1));

        let mut lines = Vec::with_capacity(self.lines.len() - removed + replacement.len());
        lines.extend_from_slice(&self.lines[..first - 1]);
        lines.extend_from_slice(replacement);
        lines.extend_from_slice(&self.lines[first - 1 + removed..]);
        if lines.is_empty() {
            lines.push(String::new());
        }

        let next = Buffer { lines };
        let row = (first as u32).min(next.line_count());
        let offset = next.row_start(row);
        (next, offset)
    }
}
