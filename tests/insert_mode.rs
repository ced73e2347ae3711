use modaledit::traits::TextSurface;
use modaledit::{Engine, InputEvent, KeyCode, KeyEvent, Mode, Modifiers};

mod support;
use support::mock_clipboard::MockClipboard;
use support::mock_surface::MockSurface;

fn key(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Char(c),
        mods: Modifiers::empty(),
    })
}

fn esc() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Esc,
        mods: Modifiers::empty(),
    })
}

fn enter() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Enter,
        mods: Modifiers::empty(),
    })
}

fn backspace() -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Backspace,
        mods: Modifiers::empty(),
    })
}

fn type_text(eng: &mut Engine, surface: &mut MockSurface, clipboard: &mut MockClipboard, text: &str) {
    for c in text.chars() {
        eng.handle_event(surface, clipboard, InputEvent::ReceivedChar(c));
    }
}

#[test]
fn insert_before_cursor() {
    let mut surface = MockSurface::new("world");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    assert_eq!(eng.snapshot().mode, Mode::Insert);
    type_text(&mut eng, &mut surface, &mut clipboard, "hi ");
    assert_eq!(surface.text(), "hi world");
    assert_eq!(surface.cursor(), (1, 3));

    eng.handle_event(&mut surface, &mut clipboard, esc());
    assert_eq!(eng.snapshot().mode, Mode::Normal);
    // Leaving insert steps one column left.
    assert_eq!(surface.cursor(), (1, 2));
}

#[test]
fn append_after_cursor() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('a'));
    type_text(&mut eng, &mut surface, &mut clipboard, "x");
    assert_eq!(surface.text(), "axb");
}

#[test]
fn append_at_line_end() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('A'));
    type_text(&mut eng, &mut surface, &mut clipboard, "!");
    assert_eq!(surface.text(), "ab!");
}

#[test]
fn insert_at_first_non_blank() {
    let mut surface = MockSurface::new("  ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    surface.place_cursor(1, 3);

    eng.handle_event(&mut surface, &mut clipboard, key('I'));
    type_text(&mut eng, &mut surface, &mut clipboard, "x");
    assert_eq!(surface.text(), "  xab");
}

#[test]
fn open_line_below_and_above() {
    let mut surface = MockSurface::new("one\nthree");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('o'));
    assert_eq!(eng.snapshot().mode, Mode::Insert);
    type_text(&mut eng, &mut surface, &mut clipboard, "two");
    assert_eq!(surface.text(), "one\ntwo\nthree");

    eng.handle_event(&mut surface, &mut clipboard, esc());
    eng.handle_event(&mut surface, &mut clipboard, key('O'));
    type_text(&mut eng, &mut surface, &mut clipboard, "first");
    assert_eq!(surface.text(), "one\nfirst\ntwo\nthree");
}

#[test]
fn enter_splits_the_line() {
    let mut surface = MockSurface::new("abcd");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    surface.place_cursor(1, 2);

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    eng.handle_event(&mut surface, &mut clipboard, enter());
    assert_eq!(surface.text(), "ab\ncd");
    assert_eq!(surface.cursor(), (2, 0));
}

#[test]
fn backspace_deletes_backwards() {
    let mut surface = MockSurface::new("abcd");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    surface.place_cursor(1, 2);

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    eng.handle_event(&mut surface, &mut clipboard, backspace());
    assert_eq!(surface.text(), "acd");
    assert_eq!(surface.cursor(), (1, 1));
}

#[test]
fn backspace_joins_lines() {
    let mut surface = MockSurface::new("ab\ncd");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    surface.place_cursor(2, 0);

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    eng.handle_event(&mut surface, &mut clipboard, backspace());
    assert_eq!(surface.text(), "abcd");
    assert_eq!(surface.cursor(), (1, 2));
}

#[test]
fn backspace_at_document_start_is_a_noop() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    assert!(eng.handle_event(&mut surface, &mut clipboard, backspace()));
    assert_eq!(surface.text(), "ab");
}

#[test]
fn command_keys_type_literally() {
    let mut surface = MockSurface::new("");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    type_text(&mut eng, &mut surface, &mut clipboard, "dd 3x");
    assert_eq!(surface.text(), "dd 3x");
    assert_eq!(eng.snapshot().pending, "");
}

#[test]
fn key_events_for_characters_are_not_consumed_in_insert() {
    let mut surface = MockSurface::new("");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    // The host delivers the actual text as ReceivedChar.
    assert!(!eng.handle_event(&mut surface, &mut clipboard, key('z')));
    assert_eq!(surface.text(), "");
}

#[test]
fn received_chars_are_ignored_outside_insert() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    assert!(!eng.handle_event(&mut surface, &mut clipboard, InputEvent::ReceivedChar('q')));
    assert_eq!(surface.text(), "ab");
}

#[test]
fn escape_at_column_zero_stays_put() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('i'));
    eng.handle_event(&mut surface, &mut clipboard, esc());
    assert_eq!(surface.cursor(), (1, 0));
}

#[test]
fn multibyte_text_counts_in_graphemes() {
    let mut surface = MockSurface::new("héllo");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('a'));
    type_text(&mut eng, &mut surface, &mut clipboard, "ü");
    assert_eq!(surface.text(), "hüéllo");
    assert_eq!(surface.cursor(), (1, 2));
}
