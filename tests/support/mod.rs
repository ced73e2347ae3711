// Not every test binary touches every helper.
#![allow(dead_code)]

pub mod mock_clipboard;
pub mod mock_surface;
