pub mod buffer;
pub mod engine;
pub mod grammar;
pub mod history;
pub mod key;
pub mod motion;
pub mod operator;
pub mod register;
pub mod textobject;
pub mod traits;
pub mod types;

pub use crate::engine::{Engine, EngineBuilder, EngineSnapshot};
pub use crate::key::{InputEvent, KeyCode, KeyEvent, Modifiers};
pub use crate::motion::{Motion, WordKind};
pub use crate::register::RegisterContents;
#[cfg(feature = "clipboard")]
pub use crate::register::SystemClipboard;
pub use crate::textobject::TextObject;
pub use crate::traits::{Clipboard, StatusSink, TextSurface};
pub use crate::types::{Mode, Position, Span, VisualKind};
