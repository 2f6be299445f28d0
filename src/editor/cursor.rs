use ropey::Rope;

use super::buffer::XmlBuffer;

/// A read-only view over an [`XmlBuffer`] that walks `<...>` spans.
///
/// The cursor borrows the buffer, so no edit can happen while it is alive.
/// To edit at the current span, take an [`Anchor`] and drop the cursor.
///
/// `next` leaves the position one past the span's `>`, while `previous`
/// leaves it on the span's `<`.
#[derive(Clone)]
pub struct TagCursor<'a> {
    buffer: &'a XmlBuffer,
    position: usize,
    span: String,
}

impl<'a> TagCursor<'a> {
    /// Create a cursor at offset 0 and move it onto the first span.
    pub fn new(buffer: &'a XmlBuffer) -> Self {
        let mut cursor = Self {
            buffer,
            position: 0,
            span: String::new(),
        };
        cursor.next();
        cursor
    }

    /// The buffer this cursor reads from.
    pub const fn buffer(&self) -> &'a XmlBuffer {
        self.buffer
    }

    /// Scan offset in chars.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The span under the cursor, or `""` when none was found.
    pub fn span(&self) -> &str {
        &self.span
    }

    /// Whether the last move landed on a span.
    pub fn is_located(&self) -> bool {
        !self.span.is_empty()
    }

    /// Whether there is unscanned text after the cursor.
    ///
    /// A `true` result does not promise that `next` will find a span.
    pub fn has_next(&self) -> bool {
        self.position < self.buffer.len_chars()
    }

    /// Whether there is text before the cursor.
    pub const fn has_previous(&self) -> bool {
        self.position > 0
    }

    /// Move onto the next span at or after the cursor.
    ///
    /// Returns `false` and clears the span if no `<` followed by a `>` remains;
    /// the position is left where it was.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let rope = self.buffer.rope();
        let Some((start, end)) = scan_forward(rope, self.position) else {
            self.span.clear();
            return false;
        };
        self.span = rope.slice(start..=end).to_string();
        self.position = end + 1;
        true
    }

    /// Move onto the nearest span starting before the cursor.
    ///
    /// On success the position is the offset of the span's `<`. Returns
    /// `false` and clears the span if nothing is found.
    pub fn previous(&mut self) -> bool {
        let rope = self.buffer.rope();
        let found = rfind_char(rope, self.position, '<')
            .and_then(|start| find_char(rope, start, '>').map(|end| (start, end)));
        let Some((start, end)) = found else {
            self.span.clear();
            return false;
        };
        self.span = rope.slice(start..=end).to_string();
        self.position = start;
        true
    }

    /// Snapshot the current span for use with [`XmlBuffer::add`] and
    /// [`XmlBuffer::erase`].
    pub fn anchor(&self) -> Anchor {
        Anchor {
            span: self.span.clone(),
            position: self.position,
            revision: self.buffer.revision(),
        }
    }

    pub(super) fn clear(&mut self) {
        self.span.clear();
    }
}

impl std::fmt::Debug for TagCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagCursor")
            .field("position", &self.position)
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}

/// Owned copy of a cursor's span, detached from the buffer borrow.
///
/// Edits relocate the anchor by searching for its span text, not by its
/// recorded position, so an anchor taken before other edits still works as
/// long as the text is present. If the same text occurs more than once the
/// first occurrence is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    span: String,
    position: usize,
    revision: u64,
}

impl Anchor {
    pub fn span(&self) -> &str {
        &self.span
    }

    /// Cursor position when the anchor was taken.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Buffer revision when the anchor was taken.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_located(&self) -> bool {
        !self.span.is_empty()
    }

    /// Whether `buffer` has changed since the anchor was taken.
    pub const fn is_stale(&self, buffer: &XmlBuffer) -> bool {
        self.revision != buffer.revision()
    }
}

fn scan_forward(rope: &Rope, from: usize) -> Option<(usize, usize)> {
    let start = find_char(rope, from, '<')?;
    let end = find_char(rope, start, '>')?;
    Some((start, end))
}

/// First `ch` at or after `from`.
fn find_char(rope: &Rope, from: usize, ch: char) -> Option<usize> {
    rope.chars_at(from)
        .position(|c| c == ch)
        .map(|offset| from + offset)
}

/// Last `ch` strictly before `before`.
fn rfind_char(rope: &Rope, before: usize, ch: char) -> Option<usize> {
    let mut chars = rope.chars_at(before);
    let mut idx = before;
    while let Some(c) = chars.prev() {
        idx -= 1;
        if c == ch {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_forward(buf: &XmlBuffer) -> Vec<String> {
        let mut cursor = TagCursor::new(buf);
        let mut spans = Vec::new();
        while cursor.is_located() {
            spans.push(cursor.span().to_string());
            cursor.next();
        }
        spans
    }

    // --- Construction ---

    #[test]
    fn test_new_locates_first_span() {
        let buf = XmlBuffer::from_text("  <a>text</a>");
        let cursor = TagCursor::new(&buf);
        assert_eq!(cursor.span(), "<a>");
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_empty_buffer_is_unlocated() {
        let buf = XmlBuffer::empty();
        let cursor = TagCursor::new(&buf);
        assert!(!cursor.is_located());
        assert_eq!(cursor.span(), "");
        assert!(!cursor.has_next());
        assert!(!cursor.has_previous());
    }

    #[test]
    fn test_text_without_tags_is_unlocated() {
        let buf = XmlBuffer::from_text("plain text");
        let cursor = TagCursor::new(&buf);
        assert!(!cursor.is_located());
        assert_eq!(cursor.position(), 0);
        assert!(cursor.has_next());
    }

    // --- Forward movement ---

    #[test]
    fn test_next_visits_every_span_in_order() {
        let buf = XmlBuffer::from_text("<ul>\n  <li>A</li>\n  <li/>\n</ul>\n");
        assert_eq!(spans_forward(&buf), ["<ul>", "<li>", "</li>", "<li/>", "</ul>"]);
    }

    #[test]
    fn test_failed_next_keeps_position() {
        let buf = XmlBuffer::from_text("<a>tail");
        let mut cursor = TagCursor::new(&buf);
        assert_eq!(cursor.position(), 3);
        assert!(!cursor.next());
        assert!(!cursor.is_located());
        assert_eq!(cursor.position(), 3);
        assert!(cursor.has_next());
    }

    #[test]
    fn test_unclosed_tag_is_not_a_span() {
        let buf = XmlBuffer::from_text("<a><b");
        let mut cursor = TagCursor::new(&buf);
        assert!(!cursor.next());
        assert_eq!(cursor.span(), "");
    }

    #[test]
    fn test_gt_inside_attribute_closes_span() {
        let buf = XmlBuffer::from_text("<a href=\"x>y\">");
        let cursor = TagCursor::new(&buf);
        assert_eq!(cursor.span(), "<a href=\"x>");
    }

    #[test]
    fn test_positions_are_char_offsets() {
        let buf = XmlBuffer::from_text("ü<é>");
        let cursor = TagCursor::new(&buf);
        assert_eq!(cursor.span(), "<é>");
        assert_eq!(cursor.position(), 4);
        assert!(!cursor.has_next());
    }

    // --- Backward movement ---

    #[test]
    fn test_previous_after_exhaustion_lands_on_span_start() {
        let buf = XmlBuffer::from_text("<a><bb><ccc>");
        let mut cursor = TagCursor::new(&buf);
        while cursor.next() {}
        assert_eq!(cursor.position(), 12);

        assert!(cursor.previous());
        assert_eq!(cursor.span(), "<ccc>");
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_previous_walks_back_to_first_span() {
        let buf = XmlBuffer::from_text("<a><bb><ccc>");
        let mut cursor = TagCursor::new(&buf);
        while cursor.next() {}

        let mut spans = Vec::new();
        while cursor.has_previous() && cursor.previous() {
            spans.push(cursor.span().to_string());
        }
        assert_eq!(spans, ["<ccc>", "<bb>", "<a>"]);
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.has_previous());
    }

    #[test]
    fn test_previous_at_start_is_unlocated() {
        let buf = XmlBuffer::from_text("<a>");
        let mut cursor = TagCursor::new(&buf);
        assert!(cursor.previous());
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.previous());
        assert!(!cursor.is_located());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_next_after_previous_returns_same_span() {
        let buf = XmlBuffer::from_text("<a><b>");
        let mut cursor = TagCursor::new(&buf);
        cursor.next();
        cursor.previous();
        assert_eq!(cursor.span(), "<b>");
        cursor.next();
        assert_eq!(cursor.span(), "<b>");
        assert_eq!(cursor.position(), 6);
    }

    // --- Anchors ---

    #[test]
    fn test_anchor_snapshots_cursor() {
        let buf = XmlBuffer::from_text("<a><b>");
        let cursor = TagCursor::new(&buf);
        let anchor = cursor.anchor();
        assert_eq!(anchor.span(), "<a>");
        assert_eq!(anchor.position(), 3);
        assert!(anchor.is_located());
        assert!(!anchor.is_stale(&buf));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn spans_are_delimited_substrings(text in "[<>a-z/ é]{0,64}") {
                let buf = XmlBuffer::from_text(&text);
                let mut cursor = TagCursor::new(&buf);
                while cursor.is_located() {
                    let span = cursor.span();
                    prop_assert!(span.starts_with('<'));
                    prop_assert!(span.ends_with('>'));
                    prop_assert!(text.contains(span));
                    prop_assert!(cursor.position() <= buf.len_chars());
                    cursor.next();
                }
            }

            #[test]
            fn forward_scan_terminates(text in "[<>a-z]{0,64}") {
                let buf = XmlBuffer::from_text(&text);
                let mut cursor = TagCursor::new(&buf);
                let mut steps = 0usize;
                while cursor.next() {
                    steps += 1;
                    prop_assert!(steps <= text.len());
                }
                prop_assert!(!cursor.is_located());
            }

            #[test]
            fn backward_position_stays_in_bounds(text in "[<>a-z]{0,64}") {
                let buf = XmlBuffer::from_text(&text);
                let mut cursor = TagCursor::new(&buf);
                while cursor.next() {}
                while cursor.has_previous() && cursor.previous() {
                    prop_assert!(cursor.position() < buf.len_chars());
                    prop_assert!(cursor.span().starts_with('<'));
                }
            }
        }
    }
}
