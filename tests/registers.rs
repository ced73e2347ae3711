use modaledit::traits::TextSurface;
use modaledit::{Engine, InputEvent, KeyCode, KeyEvent, Modifiers};

mod support;
use support::mock_clipboard::MockClipboard;
use support::mock_surface::MockSurface;

fn key(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent {
        code: KeyCode::Char(c),
        mods: Modifiers::empty(),
    })
}

fn feed(eng: &mut Engine, surface: &mut MockSurface, clipboard: &mut MockClipboard, keys: &str) {
    for c in keys.chars() {
        eng.handle_event(surface, clipboard, key(c));
    }
}

#[test]
fn yank_line_and_paste_below() {
    let mut surface = MockSurface::new("one\ntwo");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "yy");
    assert_eq!(clipboard.content.as_deref(), Some("one\n"));

    feed(&mut eng, &mut surface, &mut clipboard, "p");
    assert_eq!(surface.text(), "one\none\ntwo");
    assert_eq!(surface.cursor(), (2, 0));
}

#[test]
fn paste_line_above() {
    let mut surface = MockSurface::new("one\ntwo");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();
    surface.place_cursor(2, 0);

    feed(&mut eng, &mut surface, &mut clipboard, "yykP");
    assert_eq!(surface.text(), "two\none\ntwo");
    assert_eq!(surface.cursor(), (1, 0));
}

#[test]
fn yank_word_pastes_inline() {
    let mut surface = MockSurface::new("foo bar");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "yw");
    assert_eq!(clipboard.content.as_deref(), Some("foo "));

    feed(&mut eng, &mut surface, &mut clipboard, "p");
    assert_eq!(surface.text(), "ffoo oo bar");
    assert_eq!(surface.cursor(), (1, 4));
}

#[test]
fn charwise_paste_before() {
    let mut surface = MockSurface::new("bc");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "ylP");
    assert_eq!(surface.text(), "bbc");
    assert_eq!(surface.cursor(), (1, 0));
}

#[test]
fn delete_fills_the_register() {
    let mut surface = MockSurface::new("abc");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "xp");
    assert_eq!(surface.text(), "bac");
    assert_eq!(surface.cursor(), (1, 1));
}

#[test]
fn deleted_lines_paste_linewise() {
    let mut surface = MockSurface::new("one\ntwo");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "ddp");
    assert_eq!(surface.text(), "two\none");
    assert_eq!(surface.cursor(), (2, 0));
}

#[test]
fn counted_paste_repeats_the_payload() {
    let mut surface = MockSurface::new("ab");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "yl3p");
    assert_eq!(surface.text(), "aaaab");
    assert_eq!(surface.cursor(), (1, 3));

    let mut surface = MockSurface::new("x");
    let mut eng = Engine::new();
    feed(&mut eng, &mut surface, &mut clipboard, "yy2p");
    assert_eq!(surface.text(), "x\nx\nx");
}

#[test]
fn external_clipboard_wins_on_paste() {
    let mut surface = MockSurface::new("local");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "yw");
    clipboard.content = Some("ext".to_string());

    feed(&mut eng, &mut surface, &mut clipboard, "p");
    assert_eq!(surface.text(), "lextocal");
}

#[test]
fn external_text_with_trailing_newline_pastes_linewise() {
    let mut surface = MockSurface::new("one");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::with_content("ext line\n");

    eng.handle_event(&mut surface, &mut clipboard, key('p'));
    assert_eq!(surface.text(), "one\next line");
    assert_eq!(surface.cursor(), (2, 0));
}

#[test]
fn matching_external_text_keeps_the_recorded_shape() {
    // A charwise yank whose text happens to end mid-word stays charwise even
    // after the round trip through the external clipboard.
    let mut surface = MockSurface::new("ab\ncd");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "ylp");
    assert_eq!(surface.text(), "aab\ncd");
}

#[test]
fn broken_clipboard_falls_back_to_the_register() {
    let mut surface = MockSurface::new("abc");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "yl");
    clipboard.broken = true;

    feed(&mut eng, &mut surface, &mut clipboard, "p");
    assert_eq!(surface.text(), "aabc");
}

#[test]
fn paste_with_nothing_recorded_is_a_noop() {
    let mut surface = MockSurface::new("abc");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    eng.handle_event(&mut surface, &mut clipboard, key('p'));
    assert_eq!(surface.text(), "abc");
    assert_eq!(eng.snapshot().undo_depth, 0);
}

#[test]
fn paste_after_on_an_empty_line_stays_in_place() {
    let mut surface = MockSurface::new("ab\n");
    let mut eng = Engine::new();
    let mut clipboard = MockClipboard::new();

    feed(&mut eng, &mut surface, &mut clipboard, "ylj");
    assert_eq!(surface.cursor(), (2, 0));
    feed(&mut eng, &mut surface, &mut clipboard, "p");
    assert_eq!(surface.text(), "ab\na");
}
