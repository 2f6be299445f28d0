//! In-place XML text editing.
//!
//! Provides a rope-backed text buffer, a cursor that steps between
//! `<...>` spans, and edits anchored on a span's text.

mod buffer;
mod cursor;
mod edit;
mod error;

pub use buffer::XmlBuffer;
pub use cursor::{Anchor, TagCursor};
pub use error::{BufferError, STREAM_PATH};
