use modaledit::traits::Clipboard;

#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    pub content: Option<String>,
    /// When set, `get` reports failure regardless of content.
    pub broken: bool,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            broken: false,
        }
    }
}

impl Clipboard for MockClipboard {
    fn get(&mut self) -> Option<String> {
        if self.broken {
            return None;
        }
        self.content.clone()
    }

    fn set(&mut self, text: String) {
        self.content = Some(text);
    }
}
