//! Locating and editing elements by their tag text.

use tracing::debug;

use super::buffer::XmlBuffer;
use super::cursor::{Anchor, TagCursor};

impl XmlBuffer {
    /// A fresh cursor on the first span of the buffer.
    pub fn cursor(&self) -> TagCursor<'_> {
        TagCursor::new(self)
    }

    /// Find the first span containing `<name`.
    ///
    /// The match is a plain substring test, so `find("li")` also stops on
    /// `<list>`. When nothing matches the returned cursor is unlocated.
    pub fn find(&self, name: &str) -> TagCursor<'_> {
        let needle = format!("<{name}");
        let mut cursor = self.cursor();
        while cursor.is_located() {
            if cursor.span().contains(&needle) {
                debug!(
                    element = name,
                    span = cursor.span(),
                    position = cursor.position(),
                    "found element"
                );
                return cursor;
            }
            if !cursor.has_next() || !cursor.next() {
                break;
            }
        }
        cursor.clear();
        debug!(element = name, "element not found");
        cursor
    }

    /// Insert `text` right before the first occurrence of the anchor's span.
    ///
    /// Returns `false` without touching the buffer if the span text is not
    /// present. Cursors and anchors taken earlier become stale.
    pub fn add(&mut self, text: &str, anchor: &Anchor) -> bool {
        let Some(at) = self.locate(anchor.span()) else {
            debug!(span = anchor.span(), "add: anchor not found");
            return false;
        };
        self.insert_at(at, text);
        debug!(at, inserted = text.chars().count(), "add: inserted text");
        true
    }

    /// Remove the first occurrence of the anchor's span.
    ///
    /// Only the span itself goes; a matching close tag and the content
    /// between them stay. Returns `false` if the span text is not present.
    pub fn erase(&mut self, anchor: &Anchor) -> bool {
        let Some(at) = self.locate(anchor.span()) else {
            debug!(span = anchor.span(), "erase: anchor not found");
            return false;
        };
        let len = anchor.span().chars().count();
        self.remove_chars(at, len);
        debug!(at, removed = len, "erase: removed span");
        true
    }
}
