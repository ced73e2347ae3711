use ropey::Rope;
use unicode_segmentation::UnicodeSegmentation;

use modaledit::traits::TextSurface;

/// Host-side text store for tests, backed by a rope. Offsets follow the
/// engine's convention: linear grapheme-cluster indices with each `\n`
/// counting as one.
pub struct MockSurface {
    rope: Rope,
    selection: (usize, usize),
}

impl MockSurface {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: (0, 0),
        }
    }

    /// Places the cursor at a 1-based row and 0-based grapheme column.
    pub fn place_cursor(&mut self, row: u32, col: u32) {
        let text = self.text();
        let mut offset = 0;
        for (i, line) in text.split('\n').enumerate() {
            if i as u32 + 1 == row {
                offset += (col as usize).min(line.graphemes(true).count());
                break;
            }
            offset += line.graphemes(true).count() + 1;
        }
        self.selection = (offset, offset);
    }

    /// The collapsed cursor as (row, col), for assertions.
    pub fn cursor(&self) -> (u32, u32) {
        let text = self.text();
        let mut remaining = self.selection.0;
        for (i, line) in text.split('\n').enumerate() {
            let len = line.graphemes(true).count();
            if remaining <= len {
                return (i as u32 + 1, remaining as u32);
            }
            remaining -= len + 1;
        }
        let rows = text.split('\n').count() as u32;
        (rows, 0)
    }

    /// The text covered by the current selection, for assertions.
    pub fn selected_text(&self) -> String {
        let text = self.text();
        let gs: Vec<&str> = text.graphemes(true).collect();
        let (start, end) = self.selection;
        let end = end.min(gs.len());
        gs[start.min(end)..end].concat()
    }
}

impl TextSurface for MockSurface {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = (start, end);
    }
}
