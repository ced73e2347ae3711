//! Text objects: selectors for syntactic units (words, bracket pairs)
//! rather than directional steps.

use unicode_segmentation::UnicodeSegmentation;

use crate::buffer::Buffer;
use crate::motion::{CharClass, WordKind, classify};
use crate::types::{Mode, Position, Span};

/// A text object selector. Inner objects exclude delimiters, around objects
/// include them (trailing whitespace for words).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextObject {
    Word(WordKind),
    /// Normalized to the opening character of the family.
    Bracket(char),
}

/// Maps an object key (`w`, `W`, or any character of a bracket family) to a
/// selector. Unknown keys have no object.
pub fn from_key(key: char) -> Option<TextObject> {
    match key {
        'w' => Some(TextObject::Word(WordKind::Small)),
        'W' => Some(TextObject::Word(WordKind::Big)),
        '(' | ')' => Some(TextObject::Bracket('(')),
        '{' | '}' => Some(TextObject::Bracket('{')),
        '[' | ']' => Some(TextObject::Bracket('[')),
        '<' | '>' => Some(TextObject::Bracket('<')),
        _ => None,
    }
}

/// Resolves the span covered by an object at the cursor, or `None` when no
/// such object exists there.
pub fn resolve(buf: &Buffer, pos: Position, object: TextObject, around: bool) -> Option<Span> {
    match object {
        TextObject::Word(kind) => word_span(buf, pos, kind, around),
        TextObject::Bracket(open) => {
            let close = closing(open);
            bracket_span(buf, pos, open, close, around)
        }
    }
}

fn closing(open: char) -> char {
    match open {
        '(' => ')',
        '{' => '}',
        '[' => ']',
        _ => '>',
    }
}

/// The run of same-class graphemes under the cursor, bounded to the current
/// line. Around-words extend over trailing whitespace, or leading whitespace
/// when there is none trailing.
fn word_span(buf: &Buffer, pos: Position, kind: WordKind, around: bool) -> Option<Span> {
    let pos = buf.clamp(pos, Mode::Normal);
    let line = buf.line(pos.row);
    let gs: Vec<&str> = line.graphemes(true).collect();
    if gs.is_empty() {
        return None;
    }

    let col = (pos.col as usize).min(gs.len() - 1);
    let class = classify(gs[col], kind);
    let mut start = col;
    while start > 0 && classify(gs[start - 1], kind) == class {
        start -= 1;
    }
    let mut end = col + 1;
    while end < gs.len() && classify(gs[end], kind) == class {
        end += 1;
    }

    if around {
        if class == CharClass::Whitespace {
            // On whitespace the around-form swallows the following run.
            if end < gs.len() {
                let next = classify(gs[end], kind);
                while end < gs.len() && classify(gs[end], kind) == next {
                    end += 1;
                }
            }
        } else {
            let trailing = end;
            while end < gs.len() && classify(gs[end], kind) == CharClass::Whitespace {
                end += 1;
            }
            if end == trailing {
                while start > 0 && classify(gs[start - 1], kind) == CharClass::Whitespace {
                    start -= 1;
                }
            }
        }
    }

    let base = buf.row_start(pos.row);
    Some(Span::new(base + start, base + end))
}

fn bracket_span(
    buf: &Buffer,
    pos: Position,
    open: char,
    close: char,
    around: bool,
) -> Option<Span> {
    let text = buf.to_text();
    let gs: Vec<&str> = text.graphemes(true).collect();
    if gs.is_empty() {
        return None;
    }
    let off = buf.to_offset(pos, Mode::Normal).min(gs.len() - 1);

    let (o, c) = enclosing_pair(&gs, off, open, close)
        .or_else(|| forward_pair_on_line(buf, &gs, pos, off, open, close))?;

    Some(if around {
        Span::new(o, c + 1)
    } else {
        Span::new(o + 1, c)
    })
}

fn is(g: &str, ch: char) -> bool {
    g.chars().next() == Some(ch) && g.chars().count() == 1
}

/// The pair the cursor already sits inside (or on), found by scanning
/// outward with a depth-tracking stack.
fn enclosing_pair(gs: &[&str], off: usize, open: char, close: char) -> Option<(usize, usize)> {
    if is(gs[off], open) {
        return match_forward(gs, off, open, close).map(|c| (off, c));
    }
    if is(gs[off], close) {
        return match_backward(gs, off, open, close).map(|o| (o, off));
    }

    let mut depth = 0u32;
    let mut opener = None;
    for i in (0..off).rev() {
        if is(gs[i], close) {
            depth += 1;
        } else if is(gs[i], open) {
            if depth == 0 {
                opener = Some(i);
                break;
            }
            depth -= 1;
        }
    }
    let o = opener?;
    // Any closer between the opener and the cursor would have matched it in
    // the scan above, so the forward match necessarily lies past the cursor.
    match_forward(gs, o, open, close).map(|c| (o, c))
}

/// The next complete pair opening on the current line at or after the cursor.
fn forward_pair_on_line(
    buf: &Buffer,
    gs: &[&str],
    pos: Position,
    off: usize,
    open: char,
    close: char,
) -> Option<(usize, usize)> {
    let line_end = buf.row_start(pos.row) + buf.line_len(pos.row) as usize;
    for i in off..line_end.min(gs.len()) {
        if is(gs[i], open) {
            return match_forward(gs, i, open, close).map(|c| (i, c));
        }
    }
    None
}

fn match_forward(gs: &[&str], from: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0u32;
    for (i, g) in gs.iter().enumerate().skip(from) {
        if is(g, open) {
            depth += 1;
        } else if is(g, close) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn match_backward(gs: &[&str], from: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0u32;
    for i in (0..=from).rev() {
        if is(gs[i], close) {
            depth += 1;
        } else if is(gs[i], open) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
