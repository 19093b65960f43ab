//! Rope-backed source buffer for the MJML editor pane.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
