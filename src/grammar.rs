//! The incremental command grammar.
//!
//! The parser is left-anchored over the pending token buffer: it matches the
//! longest valid prefix against a fixed command table and reports whether the
//! prefix is still incomplete, a dead end, an alias to rewrite, or a fully
//! parsed command. Grammar shape:
//!
//! ```text
//! [count1] primary [count2] secondary-or-argument
//! ```
//!
//! Counts are decimal digit runs; a bare `0` is always the line-start motion,
//! never the start of a count. Counts compose multiplicatively across an
//! operator and its motion (`3d2w` covers six words).

use std::fmt;

use crate::motion::{Motion, WordKind};
use crate::textobject::{self, TextObject};
use crate::types::{Mode, VisualKind};

/// One key token in the pending buffer. Control-modified keys are a distinct
/// variant so they match as a unit in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Char(char),
    Ctrl(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Char(c) => write!(f, "{c}"),
            Token::Ctrl(c) => write!(f, "<C-{c}>"),
        }
    }
}

/// Literal rendering of a pending buffer, for status displays.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

/// An operator awaiting a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Change,
    Yank,
    Indent,
    Dedent,
}

/// How Insert mode is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertEntry {
    /// `i`: at the cursor.
    Before,
    /// `a`: one column right of the cursor.
    After,
    /// `o`: on a fresh line below.
    OpenBelow,
    /// `O`: on a fresh line above.
    OpenAbove,
}

/// The range argument of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Motion { count: Option<u32>, motion: Motion },
    Object { object: TextObject, around: bool },
    /// The doubled-key form (`dd`, `yy`, `>>`): whole current lines.
    CurrentLine { count: Option<u32> },
}

/// A fully parsed command, ready to dispatch. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand {
    /// The leading repeat count, `None` when not given.
    pub count: Option<u32>,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion(Motion),
    Operator { op: Operator, target: Target },
    /// Operator in visual mode: consumes the selection, no target argument.
    VisualOperator(Operator),
    EnterInsert(InsertEntry),
    EnterVisual(VisualKind),
    ReplaceChar(char),
    ToggleCase,
    Join,
    PasteAfter,
    PasteBefore,
    Undo,
    Redo,
}

/// Result of matching the pending buffer against the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// A rule matches the prefix but needs more tokens.
    Incomplete,
    /// No rule matches any prefix; the pending buffer should be discarded.
    NoMatch,
    /// A command was recognized, consuming exactly `consumed` tokens.
    Matched { consumed: usize, cmd: ParsedCommand },
    /// An alias key was recognized; the caller substitutes `expansion`
    /// (prefixed by the carried count) for the consumed prefix and re-parses.
    Alias {
        consumed: usize,
        count: Option<u32>,
        expansion: &'static str,
    },
}

/// Parses the longest valid prefix of `tokens` for the given mode.
pub fn parse(tokens: &[Token], mode: Mode) -> ParseOutcome {
    let mut i = 0;
    let count1 = parse_count(tokens, &mut i);
    let Some(&token) = tokens.get(i) else {
        return ParseOutcome::Incomplete;
    };

    match mode {
        Mode::Normal => parse_normal(tokens, i, count1, token),
        Mode::Visual(_) => parse_visual(tokens, i, count1, token),
        // Insert mode consumes keys literally; the parser is never invoked.
        Mode::Insert => ParseOutcome::NoMatch,
    }
}

fn parse_normal(tokens: &[Token], i: usize, count1: Option<u32>, token: Token) -> ParseOutcome {
    let c = match token {
        Token::Ctrl('r') => return matched(i + 1, count1, Action::Redo),
        Token::Ctrl(_) => return ParseOutcome::NoMatch,
        Token::Char(c) => c,
    };

    if let Some(expansion) = alias_expansion(c) {
        return ParseOutcome::Alias {
            consumed: i + 1,
            count: count1,
            expansion,
        };
    }

    match c {
        'd' => parse_operator(tokens, i, count1, Operator::Delete, 'd'),
        'c' => parse_operator(tokens, i, count1, Operator::Change, 'c'),
        'y' => parse_operator(tokens, i, count1, Operator::Yank, 'y'),
        '>' => parse_operator(tokens, i, count1, Operator::Indent, '>'),
        '<' => parse_operator(tokens, i, count1, Operator::Dedent, '<'),
        'i' => matched(i + 1, count1, Action::EnterInsert(InsertEntry::Before)),
        'a' => matched(i + 1, count1, Action::EnterInsert(InsertEntry::After)),
        'o' => matched(i + 1, count1, Action::EnterInsert(InsertEntry::OpenBelow)),
        'O' => matched(i + 1, count1, Action::EnterInsert(InsertEntry::OpenAbove)),
        'v' => matched(i + 1, count1, Action::EnterVisual(VisualKind::CharWise)),
        'V' => matched(i + 1, count1, Action::EnterVisual(VisualKind::LineWise)),
        'u' => matched(i + 1, count1, Action::Undo),
        'p' => matched(i + 1, count1, Action::PasteAfter),
        'P' => matched(i + 1, count1, Action::PasteBefore),
        'J' => matched(i + 1, count1, Action::Join),
        '~' => matched(i + 1, count1, Action::ToggleCase),
        'r' => match tokens.get(i + 1) {
            None => ParseOutcome::Incomplete,
            Some(Token::Char(arg)) => matched(i + 2, count1, Action::ReplaceChar(*arg)),
            Some(Token::Ctrl(_)) => ParseOutcome::NoMatch,
        },
        _ => match match_motion(tokens, i) {
            MotionMatch::Incomplete => ParseOutcome::Incomplete,
            MotionMatch::None => ParseOutcome::NoMatch,
            MotionMatch::Some { next, motion } => matched(next, count1, Action::Motion(motion)),
        },
    }
}

fn parse_visual(tokens: &[Token], i: usize, count1: Option<u32>, token: Token) -> ParseOutcome {
    let c = match token {
        Token::Char(c) => c,
        Token::Ctrl(_) => return ParseOutcome::NoMatch,
    };

    let action = match c {
        'd' | 'x' => Some(Action::VisualOperator(Operator::Delete)),
        'c' | 's' => Some(Action::VisualOperator(Operator::Change)),
        'y' => Some(Action::VisualOperator(Operator::Yank)),
        '>' => Some(Action::VisualOperator(Operator::Indent)),
        '<' => Some(Action::VisualOperator(Operator::Dedent)),
        '~' => Some(Action::ToggleCase),
        'v' => Some(Action::EnterVisual(VisualKind::CharWise)),
        'V' => Some(Action::EnterVisual(VisualKind::LineWise)),
        _ => None,
    };
    if let Some(action) = action {
        return matched(i + 1, count1, action);
    }

    match match_motion(tokens, i) {
        MotionMatch::Incomplete => ParseOutcome::Incomplete,
        MotionMatch::None => ParseOutcome::NoMatch,
        MotionMatch::Some { next, motion } => matched(next, count1, Action::Motion(motion)),
    }
}

/// Parses the `[count2] secondary` tail of an operator.
fn parse_operator(
    tokens: &[Token],
    i: usize,
    count1: Option<u32>,
    op: Operator,
    op_key: char,
) -> ParseOutcome {
    let mut j = i + 1;
    let count2 = parse_count(tokens, &mut j);
    let Some(&token) = tokens.get(j) else {
        return ParseOutcome::Incomplete;
    };

    match token {
        Token::Char(c) if c == op_key => matched(
            j + 1,
            count1,
            Action::Operator {
                op,
                target: Target::CurrentLine { count: count2 },
            },
        ),
        Token::Char(prefix @ ('i' | 'a')) => match tokens.get(j + 1) {
            None => ParseOutcome::Incomplete,
            Some(Token::Char(key)) => match textobject::from_key(*key) {
                Some(object) => matched(
                    j + 2,
                    count1,
                    Action::Operator {
                        op,
                        target: Target::Object {
                            object,
                            around: prefix == 'a',
                        },
                    },
                ),
                None => ParseOutcome::NoMatch,
            },
            Some(Token::Ctrl(_)) => ParseOutcome::NoMatch,
        },
        _ => match match_motion(tokens, j) {
            MotionMatch::Incomplete => ParseOutcome::Incomplete,
            MotionMatch::None => ParseOutcome::NoMatch,
            MotionMatch::Some { next, motion } => matched(
                next,
                count1,
                Action::Operator {
                    op,
                    target: Target::Motion {
                        count: count2,
                        motion,
                    },
                },
            ),
        },
    }
}

/// Alias table. Expansions are plain key sequences substituted for the alias
/// key with the outer count carried over; the table is acyclic by
/// construction and expansion depth is additionally bounded by the caller.
fn alias_expansion(key: char) -> Option<&'static str> {
    match key {
        'D' => Some("d$"),
        'C' => Some("c$"),
        's' => Some("cl"),
        'S' => Some("ddO"),
        'I' => Some("^i"),
        'A' => Some("$a"),
        'x' => Some("dl"),
        'X' => Some("dh"),
        _ => None,
    }
}

enum MotionMatch {
    Incomplete,
    None,
    Some { next: usize, motion: Motion },
}

/// Matches a motion starting at `at`, including the two-token `gg` and the
/// argument-taking `f`/`t`.
fn match_motion(tokens: &[Token], at: usize) -> MotionMatch {
    let Some(&token) = tokens.get(at) else {
        return MotionMatch::Incomplete;
    };
    let c = match token {
        Token::Char(c) => c,
        Token::Ctrl(_) => return MotionMatch::None,
    };

    match c {
        'g' => match tokens.get(at + 1) {
            None => MotionMatch::Incomplete,
            Some(Token::Char('g')) => MotionMatch::Some {
                next: at + 2,
                motion: Motion::FirstLine,
            },
            Some(_) => MotionMatch::None,
        },
        'f' | 't' => match tokens.get(at + 1) {
            None => MotionMatch::Incomplete,
            Some(Token::Char(target)) => MotionMatch::Some {
                next: at + 2,
                motion: Motion::FindChar {
                    target: *target,
                    till: c == 't',
                },
            },
            Some(Token::Ctrl(_)) => MotionMatch::None,
        },
        _ => match simple_motion(c) {
            Some(motion) => MotionMatch::Some {
                next: at + 1,
                motion,
            },
            None => MotionMatch::None,
        },
    }
}

fn simple_motion(c: char) -> Option<Motion> {
    Some(match c {
        'h' => Motion::Left,
        'l' => Motion::Right,
        'j' => Motion::Down,
        'k' => Motion::Up,
        '0' => Motion::LineStart,
        '^' => Motion::FirstNonBlank,
        '$' => Motion::LineEnd,
        'w' => Motion::WordForward(WordKind::Small),
        'W' => Motion::WordForward(WordKind::Big),
        'e' => Motion::WordEnd(WordKind::Small),
        'E' => Motion::WordEnd(WordKind::Big),
        'b' => Motion::WordBack(WordKind::Small),
        'B' => Motion::WordBack(WordKind::Big),
        'G' => Motion::LastLine,
        _ => return None,
    })
}

/// Consumes a run of count digits. A `0` with no digits before it is left in
/// place: bare zero is the line-start motion, never a count.
fn parse_count(tokens: &[Token], i: &mut usize) -> Option<u32> {
    let mut value: Option<u32> = None;
    while let Some(Token::Char(c)) = tokens.get(*i) {
        let Some(d) = c.to_digit(10) else { break };
        if d == 0 && value.is_none() {
            break;
        }
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
        *i += 1;
    }
    value
}

fn matched(consumed: usize, count: Option<u32>, action: Action) -> ParseOutcome {
    ParseOutcome::Matched {
        consumed,
        cmd: ParsedCommand { count, action },
    }
}
