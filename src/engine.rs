//! The interpreter session: mode state machine, pending-buffer trampoline,
//! and command execution against the host surface.

use log::{debug, trace};

use crate::buffer::Buffer;
use crate::grammar::{
    self, Action, InsertEntry, Operator, ParseOutcome, ParsedCommand, Target, Token,
};
use crate::history::{Checkpoint, History};
use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers};
use crate::motion::{self, Motion};
use crate::operator::{self, OpRange};
use crate::register::Registers;
use crate::textobject;
use crate::traits::{Clipboard, StatusSink, TextSurface};
use crate::types::{Mode, Position, Span, VisualKind};

/// Upper bound on alias rewrites per drained token, guarding against table
/// cycles.
const MAX_ALIAS_EXPANSIONS: usize = 16;

/// Active visual selection: the fixed anchor and the moving end, as linear
/// offsets. The anchor lives for the duration of the visual session.
#[derive(Debug, Clone, Copy)]
struct VisualState {
    anchor: usize,
    cursor: usize,
}

/// One interpreter session.
///
/// The engine owns the mode, the pending command buffer, the history stacks
/// and the register; the host surface owns the text and selection. Every
/// command reads fresh surface state and writes the result back.
pub struct Engine {
    mode: Mode,
    pending: Vec<Token>,
    history: History,
    registers: Registers,
    visual: Option<VisualState>,
    preferred_col: Option<u32>,
    checkpointed: bool,
    sinks: Vec<Box<dyn StatusSink>>,
}

/// A read-only view of the session state, for hosts and assertions.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub mode: Mode,
    /// Literal contents of the pending command buffer.
    pub pending: String,
    pub preferred_col: Option<u32>,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

pub struct EngineBuilder {
    mode: Mode,
    undo_capacity: usize,
    sinks: Vec<Box<dyn StatusSink>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            undo_capacity: crate::history::DEFAULT_CAPACITY,
            sinks: Vec::new(),
        }
    }
}

impl EngineBuilder {
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = capacity;
        self
    }

    pub fn status_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            mode: self.mode,
            pending: Vec::new(),
            history: History::with_capacity(self.undo_capacity),
            registers: Registers::default(),
            visual: None,
            preferred_col: None,
            checkpointed: false,
            sinks: self.sinks,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::default().build()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            pending: grammar::render(&self.pending),
            preferred_col: self.preferred_col,
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        }
    }

    /// Processes one input token to completion.
    ///
    /// Returns whether the token was consumed; the host should suppress its
    /// default handling when it was.
    pub fn handle_event<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        input: InputEvent,
    ) -> bool {
        let consumed = match (self.mode, input) {
            (Mode::Insert, InputEvent::Key(ke)) => self.insert_key(surface, ke),
            (Mode::Insert, InputEvent::ReceivedChar(ch)) => {
                self.insert_char(surface, ch);
                true
            }
            (_, InputEvent::Key(ke)) => self.command_key(surface, clipboard, ke),
            // Commands arrive as key events; stray text input is not ours.
            (_, InputEvent::ReceivedChar(_)) => false,
        };
        self.notify(surface);
        consumed
    }

    // ---- token intake ----

    fn command_key<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        ke: KeyEvent,
    ) -> bool {
        match ke.code {
            KeyCode::Esc => {
                self.pending.clear();
                self.preferred_col = None;
                if matches!(self.mode, Mode::Visual(_)) {
                    self.leave_visual(surface);
                }
                true
            }
            KeyCode::Backspace => {
                // Abandons any partial command and steps left.
                self.pending.clear();
                let buffer = Buffer::from_text(&surface.text());
                let pos = self.cursor(surface, &buffer);
                self.place_cursor(surface, &buffer, Position::new(pos.row, pos.col.saturating_sub(1)));
                true
            }
            KeyCode::Enter => true,
            KeyCode::Char(c) => {
                let token = if ke.mods.contains(Modifiers::CTRL) {
                    Token::Ctrl(c)
                } else {
                    Token::Char(c)
                };
                self.pending.push(token);
                self.drain_pending(surface, clipboard);
                true
            }
        }
    }

    /// The dispatch trampoline: repeatedly matches the pending buffer until
    /// it is empty, incomplete, or a dead end. Aliases rewrite the buffer in
    /// place (carrying the outer count) rather than recursing.
    fn drain_pending<S: TextSurface, C: Clipboard>(&mut self, surface: &mut S, clipboard: &mut C) {
        self.checkpointed = false;
        let mut expansions = 0;
        while !self.pending.is_empty() {
            match grammar::parse(&self.pending, self.mode) {
                ParseOutcome::Incomplete => return,
                ParseOutcome::NoMatch => {
                    debug!("no command matches {:?}, dropping pending buffer", grammar::render(&self.pending));
                    self.pending.clear();
                    return;
                }
                ParseOutcome::Alias {
                    consumed,
                    count,
                    expansion,
                } => {
                    expansions += 1;
                    if expansions > MAX_ALIAS_EXPANSIONS {
                        self.pending.clear();
                        return;
                    }
                    trace!("alias expands to {expansion:?}");
                    let mut rewritten = Vec::with_capacity(self.pending.len() + expansion.len());
                    if let Some(n) = count {
                        rewritten.extend(n.to_string().chars().map(Token::Char));
                    }
                    rewritten.extend(expansion.chars().map(Token::Char));
                    rewritten.extend_from_slice(&self.pending[consumed..]);
                    self.pending = rewritten;
                }
                ParseOutcome::Matched { consumed, cmd } => {
                    self.pending.drain(..consumed);
                    self.execute(surface, clipboard, cmd);
                }
            }
        }
    }

    // ---- command execution ----

    fn execute<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        cmd: ParsedCommand,
    ) {
        let buffer = Buffer::from_text(&surface.text());
        let count = cmd.count.unwrap_or(1).max(1);
        let explicit = cmd.count.is_some();

        if !matches!(cmd.action, Action::Motion(Motion::Up | Motion::Down)) {
            self.preferred_col = None;
        }

        match cmd.action {
            Action::Motion(motion) => self.run_motion(surface, &buffer, motion, count, explicit),
            Action::Operator { op, target } => {
                self.run_operator(surface, clipboard, &buffer, op, target, cmd.count)
            }
            Action::VisualOperator(op) => self.run_visual_operator(surface, clipboard, &buffer, op),
            Action::EnterInsert(entry) => self.enter_insert(surface, &buffer, entry),
            Action::EnterVisual(kind) => self.enter_visual(surface, &buffer, kind),
            Action::ReplaceChar(ch) => self.replace_char(surface, &buffer, ch, count),
            Action::ToggleCase => self.toggle_case(surface, &buffer, count),
            Action::Join => self.join(surface, &buffer, count),
            Action::PasteAfter => self.paste(surface, clipboard, &buffer, count, true),
            Action::PasteBefore => self.paste(surface, clipboard, &buffer, count, false),
            Action::Undo => self.undo(surface, &buffer, count),
            Action::Redo => self.redo(surface, &buffer, count),
        }
    }

    fn run_motion<S: TextSurface>(
        &mut self,
        surface: &mut S,
        buffer: &Buffer,
        motion: Motion,
        count: u32,
        explicit: bool,
    ) {
        let pos = self.cursor(surface, buffer);
        let vertical = matches!(motion, Motion::Up | Motion::Down);
        let pos = if vertical {
            Position::new(pos.row, self.preferred_col.unwrap_or(pos.col))
        } else {
            pos
        };

        let Some(outcome) = motion::resolve(buffer, pos, motion, count, explicit, self.mode) else {
            return;
        };
        if vertical {
            self.preferred_col = Some(self.preferred_col.unwrap_or(pos.col));
        }
        self.place_cursor(surface, buffer, outcome.pos);
    }

    fn run_operator<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        buffer: &Buffer,
        op: Operator,
        target: Target,
        count1: Option<u32>,
    ) {
        let origin = self.cursor(surface, buffer);
        let range = match target {
            Target::CurrentLine { count } => {
                let n = effective(count1, count);
                let first = origin.row;
                let last = first.saturating_add(n - 1).min(buffer.line_count());
                OpRange::Lines { first, last }
            }
            Target::Object { object, around } => {
                let Some(span) = textobject::resolve(buffer, origin, object, around) else {
                    return;
                };
                OpRange::Chars(span)
            }
            Target::Motion { count, motion } => {
                let n = effective(count1, count);
                let explicit = count1.is_some() || count.is_some();
                // Operator ranges may reach one past the last character, so
                // the motion resolves under the insert-mode column rule.
                let Some(out) = motion::resolve(buffer, origin, motion, n, explicit, Mode::Insert)
                else {
                    return;
                };
                if out.linewise {
                    OpRange::Lines {
                        first: origin.row.min(out.pos.row),
                        last: origin.row.max(out.pos.row),
                    }
                } else {
                    OpRange::Chars(char_range(buffer, origin, out.pos, out.inclusive))
                }
            }
        };
        self.apply_operator(surface, clipboard, buffer, op, range, origin);
    }

    fn run_visual_operator<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        buffer: &Buffer,
        op: Operator,
    ) {
        let Some(range) = self.visual_range(buffer) else {
            return;
        };
        let origin = self.cursor(surface, buffer);
        self.visual = None;
        self.mode = Mode::Normal;
        self.apply_operator(surface, clipboard, buffer, op, range, origin);
    }

    /// Records at most one undo checkpoint per dispatched key. Aliases that
    /// expand to several mutating steps (`S` becomes `dd` then `O`) still
    /// undo as a single unit.
    fn checkpoint(&mut self, buffer: &Buffer, cursor: Position) {
        if self.checkpointed {
            return;
        }
        self.checkpointed = true;
        self.history.commit(buffer.to_text(), cursor);
    }

    fn apply_operator<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        buffer: &Buffer,
        op: Operator,
        range: OpRange,
        origin: Position,
    ) {
        let outcome = operator::apply(op, buffer, range, origin);
        if let Some((text, linewise)) = outcome.register {
            self.registers.record(clipboard, text, linewise);
        }
        match outcome.buffer {
            Some(next) => {
                self.checkpoint(buffer, origin);
                surface.set_text(&next.to_text());
                if outcome.enter_insert {
                    self.mode = Mode::Insert;
                }
                let off = next.to_offset(outcome.cursor, self.mode);
                surface.set_selection(off, off);
            }
            None => {
                let off = buffer.to_offset(outcome.cursor, self.mode);
                surface.set_selection(off, off);
            }
        }
    }

    fn enter_insert<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, entry: InsertEntry) {
        let origin = self.cursor(surface, buffer);
        self.checkpoint(buffer, origin);
        self.mode = Mode::Insert;

        match entry {
            InsertEntry::Before => {
                let off = buffer.to_offset(origin, Mode::Insert);
                surface.set_selection(off, off);
            }
            InsertEntry::After => {
                let off = buffer.to_offset(
                    Position::new(origin.row, origin.col.saturating_add(1)),
                    Mode::Insert,
                );
                surface.set_selection(off, off);
            }
            InsertEntry::OpenBelow => {
                let (next, offset) = buffer.splice_lines(origin.row + 1, 0, &[String::new()]);
                surface.set_text(&next.to_text());
                surface.set_selection(offset, offset);
            }
            InsertEntry::OpenAbove => {
                let (next, offset) = buffer.splice_lines(origin.row, 0, &[String::new()]);
                surface.set_text(&next.to_text());
                surface.set_selection(offset, offset);
            }
        }
    }

    fn enter_visual<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, kind: VisualKind) {
        if self.mode == Mode::Visual(kind) {
            // Same key again toggles back to Normal.
            self.leave_visual(surface);
            return;
        }
        match self.mode {
            Mode::Visual(_) => {
                // Switching between charwise and linewise keeps the anchor.
                self.mode = Mode::Visual(kind);
                self.sync_visual_selection(surface, buffer);
            }
            _ => {
                let origin = self.cursor(surface, buffer);
                let off = buffer.to_offset(origin, Mode::Normal);
                self.visual = Some(VisualState {
                    anchor: off,
                    cursor: off,
                });
                self.mode = Mode::Visual(kind);
                self.sync_visual_selection(surface, buffer);
            }
        }
    }

    fn leave_visual<S: TextSurface>(&mut self, surface: &mut S) {
        let buffer = Buffer::from_text(&surface.text());
        let cursor = self.cursor(surface, &buffer);
        self.visual = None;
        self.mode = Mode::Normal;
        let off = buffer.to_offset(cursor, Mode::Normal);
        surface.set_selection(off, off);
    }

    fn replace_char<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, ch: char, count: u32) {
        let origin = self.cursor(surface, buffer);
        let remaining = buffer.line_len(origin.row).saturating_sub(origin.col);
        if count > remaining || ch == '\n' {
            return;
        }

        let start = buffer.to_offset(origin, Mode::Normal);
        let span = Span::new(start, start + count as usize);
        self.checkpoint(buffer, origin);
        let replacement: String = std::iter::repeat(ch).take(span.len()).collect();
        let (next, target) = buffer.splice(span, &replacement);
        surface.set_text(&next.to_text());
        let off = next.to_offset(next.to_position(target.saturating_sub(1)), Mode::Normal);
        surface.set_selection(off, off);
    }

    fn toggle_case<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, count: u32) {
        let (span, cursor_at_start) = match self.visual_range(buffer) {
            Some(OpRange::Chars(span)) => (span, true),
            Some(OpRange::Lines { first, last }) => {
                let start = buffer.row_start(first);
                let end = buffer.row_start(last) + buffer.line_len(last) as usize;
                (Span::new(start, end), true)
            }
            None => {
                let origin = self.cursor(surface, buffer);
                let start = buffer.to_offset(origin, Mode::Normal);
                let end = buffer.to_offset(
                    Position::new(origin.row, origin.col.saturating_add(count)),
                    Mode::Insert,
                );
                (Span::new(start, end), false)
            }
        };
        if span.is_empty() {
            return;
        }

        let origin = self.cursor(surface, buffer);
        if matches!(self.mode, Mode::Visual(_)) {
            self.visual = None;
            self.mode = Mode::Normal;
        }
        self.checkpoint(buffer, origin);
        let (next, target) = operator::toggle_case(buffer, span);
        surface.set_text(&next.to_text());
        let landing = if cursor_at_start { span.start } else { target };
        let off = next.to_offset(next.to_position(landing), Mode::Normal);
        surface.set_selection(off, off);
    }

    fn join<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, count: u32) {
        let origin = self.cursor(surface, buffer);
        let extra = count.max(2) - 1;
        let Some((next, cursor)) = operator::join_lines(buffer, origin.row, extra) else {
            return;
        };
        self.checkpoint(buffer, origin);
        surface.set_text(&next.to_text());
        let off = next.to_offset(cursor, Mode::Normal);
        surface.set_selection(off, off);
    }

    fn paste<S: TextSurface, C: Clipboard>(
        &mut self,
        surface: &mut S,
        clipboard: &mut C,
        buffer: &Buffer,
        count: u32,
        after: bool,
    ) {
        let Some(reg) = self.registers.paste_source(clipboard) else {
            return;
        };
        if reg.text.is_empty() {
            return;
        }
        let origin = self.cursor(surface, buffer);
        self.checkpoint(buffer, origin);

        if reg.linewise {
            let mut lines: Vec<String> = reg.text.split('\n').map(str::to_owned).collect();
            if lines.last().is_some_and(|l| l.is_empty()) {
                lines.pop();
            }
            let repeated: Vec<String> = lines
                .iter()
                .cycle()
                .take(lines.len() * count as usize)
                .cloned()
                .collect();
            let at = if after { origin.row + 1 } else { origin.row };
            let (next, offset) = buffer.splice_lines(at, 0, &repeated);
            surface.set_text(&next.to_text());
            let off = next.to_offset(next.to_position(offset), Mode::Normal);
            surface.set_selection(off, off);
        } else {
            let base = buffer.to_offset(origin, Mode::Normal);
            let at = if after && buffer.line_len(origin.row) > 0 {
                base + 1
            } else {
                base
            };
            let payload = reg.text.repeat(count as usize);
            let (next, target) = buffer.splice(Span::new(at, at), &payload);
            surface.set_text(&next.to_text());
            let off = next.to_offset(next.to_position(target.saturating_sub(1)), Mode::Normal);
            surface.set_selection(off, off);
        }
    }

    fn undo<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, count: u32) {
        let mut current = Checkpoint {
            text: buffer.to_text(),
            cursor: self.cursor(surface, buffer),
        };
        let mut restored = None;
        for _ in 0..count {
            match self.history.undo(current.clone()) {
                Some(cp) => {
                    current = cp.clone();
                    restored = Some(cp);
                }
                None => break,
            }
        }
        if let Some(cp) = restored {
            self.restore(surface, &cp);
        }
    }

    fn redo<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, count: u32) {
        let mut current = Checkpoint {
            text: buffer.to_text(),
            cursor: self.cursor(surface, buffer),
        };
        let mut restored = None;
        for _ in 0..count {
            match self.history.redo(current.clone()) {
                Some(cp) => {
                    current = cp.clone();
                    restored = Some(cp);
                }
                None => break,
            }
        }
        if let Some(cp) = restored {
            self.restore(surface, &cp);
        }
    }

    fn restore<S: TextSurface>(&mut self, surface: &mut S, cp: &Checkpoint) {
        surface.set_text(&cp.text);
        let next = Buffer::from_text(&cp.text);
        let off = next.to_offset(cp.cursor, Mode::Normal);
        surface.set_selection(off, off);
    }

    // ---- insert mode ----

    fn insert_key<S: TextSurface>(&mut self, surface: &mut S, ke: KeyEvent) -> bool {
        match ke.code {
            KeyCode::Esc => {
                let buffer = Buffer::from_text(&surface.text());
                let pos = self.cursor(surface, &buffer);
                self.mode = Mode::Normal;
                let pos = Position::new(pos.row, pos.col.saturating_sub(1));
                let off = buffer.to_offset(pos, Mode::Normal);
                surface.set_selection(off, off);
                true
            }
            KeyCode::Enter => {
                self.insert_char(surface, '\n');
                true
            }
            KeyCode::Backspace => {
                let buffer = Buffer::from_text(&surface.text());
                let pos = self.cursor(surface, &buffer);
                let off = buffer.to_offset(pos, Mode::Insert);
                if off == 0 {
                    return true;
                }
                let (next, target) = buffer.splice(Span::new(off - 1, off), "");
                surface.set_text(&next.to_text());
                surface.set_selection(target, target);
                true
            }
            // Printable keys reach us as ReceivedChar; leave key events alone.
            KeyCode::Char(_) => false,
        }
    }

    fn insert_char<S: TextSurface>(&mut self, surface: &mut S, ch: char) {
        let buffer = Buffer::from_text(&surface.text());
        let pos = self.cursor(surface, &buffer);
        let off = buffer.to_offset(pos, Mode::Insert);
        let mut tmp = [0u8; 4];
        let (next, target) = buffer.splice(Span::new(off, off), ch.encode_utf8(&mut tmp));
        surface.set_text(&next.to_text());
        surface.set_selection(target, target);
    }

    // ---- shared helpers ----

    /// The cursor position, read fresh from the surface (or from the visual
    /// state, which owns the moving end while a selection is active).
    fn cursor<S: TextSurface>(&self, surface: &S, buffer: &Buffer) -> Position {
        let off = match (self.mode, &self.visual) {
            (Mode::Visual(_), Some(v)) => v.cursor,
            _ => surface.selection().0,
        };
        buffer.clamp(buffer.to_position(off), self.mode)
    }

    fn place_cursor<S: TextSurface>(&mut self, surface: &mut S, buffer: &Buffer, pos: Position) {
        let off = buffer.to_offset(pos, self.mode);
        if let Some(v) = &mut self.visual {
            v.cursor = off;
            self.sync_visual_selection(surface, buffer);
        } else {
            surface.set_selection(off, off);
        }
    }

    /// Projects the visual state onto the surface selection, snapping to
    /// whole lines for the linewise kind.
    fn sync_visual_selection<S: TextSurface>(&self, surface: &mut S, buffer: &Buffer) {
        let Some(v) = &self.visual else {
            return;
        };
        let (lo, hi) = (v.anchor.min(v.cursor), v.anchor.max(v.cursor));
        match self.mode {
            Mode::Visual(VisualKind::CharWise) => {
                let hi_pos = buffer.to_position(hi);
                let end = buffer.to_offset(
                    Position::new(hi_pos.row, hi_pos.col.saturating_add(1)),
                    Mode::Insert,
                );
                surface.set_selection(lo, end.max(lo));
            }
            Mode::Visual(VisualKind::LineWise) => {
                let first = buffer.to_position(lo).row;
                let last = buffer.to_position(hi).row;
                let start = buffer.row_start(first);
                let end = buffer.row_start(last) + buffer.line_len(last) as usize;
                surface.set_selection(start, end);
            }
            _ => {}
        }
    }

    /// The operator range covered by the active visual selection.
    fn visual_range(&self, buffer: &Buffer) -> Option<OpRange> {
        let v = self.visual.as_ref()?;
        let (lo, hi) = (v.anchor.min(v.cursor), v.anchor.max(v.cursor));
        match self.mode {
            Mode::Visual(VisualKind::CharWise) => {
                let hi_pos = buffer.to_position(hi);
                let end = buffer.to_offset(
                    Position::new(hi_pos.row, hi_pos.col.saturating_add(1)),
                    Mode::Insert,
                );
                Some(OpRange::Chars(Span::new(lo, end.max(lo))))
            }
            Mode::Visual(VisualKind::LineWise) => Some(OpRange::Lines {
                first: buffer.to_position(lo).row,
                last: buffer.to_position(hi).row,
            }),
            _ => None,
        }
    }

    fn notify<S: TextSurface>(&mut self, surface: &S) {
        if self.sinks.is_empty() {
            return;
        }
        let buffer = Buffer::from_text(&surface.text());
        let cursor = self.cursor(surface, &buffer);
        let pending = grammar::render(&self.pending);
        let mode = self.mode.name();
        for sink in &mut self.sinks {
            sink.on_update(mode, &pending, cursor);
        }
    }
}

/// Outer and inner counts compose multiplicatively.
fn effective(outer: Option<u32>, inner: Option<u32>) -> u32 {
    outer
        .unwrap_or(1)
        .saturating_mul(inner.unwrap_or(1))
        .max(1)
}

/// Charwise operator range between two positions, extending one grapheme
/// past the far end for inclusive motions (clamped to that line's end).
fn char_range(buffer: &Buffer, a: Position, b: Position, inclusive: bool) -> Span {
    let (lo_pos, hi_pos) = {
        let ao = buffer.to_offset(a, Mode::Insert);
        let bo = buffer.to_offset(b, Mode::Insert);
        if ao <= bo { (a, b) } else { (b, a) }
    };
    let lo = buffer.to_offset(lo_pos, Mode::Insert);
    let hi = if inclusive {
        buffer.to_offset(
            Position::new(hi_pos.row, hi_pos.col.saturating_add(1)),
            Mode::Insert,
        )
    } else {
        buffer.to_offset(hi_pos, Mode::Insert)
    };
    Span::new(lo, hi.max(lo))
}
