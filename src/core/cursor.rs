// Read position inside a borrowed text buffer
//
// A cursor never owns or mutates the buffer. End of buffer is reported by the
// column/row layers as `None` rather than as a special cursor value.

/// Position (byte offset on a char boundary) inside a borrowed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `text`.
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Cursor { text, pos: 0 }
    }

    /// Cursor at byte offset `pos`, which must fall on a char boundary.
    #[inline]
    pub fn at(text: &'a str, pos: usize) -> Self {
        debug_assert!(text.is_char_boundary(pos));
        Cursor { text, pos }
    }

    /// Byte offset into the buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The whole buffer this cursor walks.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Everything from the cursor to the end of the buffer.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Character under the cursor, `None` at end of buffer.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Character after the one under the cursor.
    #[inline]
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Character immediately before the cursor.
    #[inline]
    pub fn previous(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    /// Step over one character. Returns the character stepped over.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Jump forward `len` bytes. Callers only pass lengths of ASCII runs or
    /// offsets found by byte search for ASCII bytes.
    #[inline]
    pub(crate) fn skip_bytes(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.text.len());
        debug_assert!(self.text.is_char_boundary(self.pos));
    }

    /// Text between this cursor and a later one.
    #[inline]
    pub fn slice_to(&self, end: &Cursor<'a>) -> &'a str {
        debug_assert!(end.pos >= self.pos);
        &self.text[self.pos..end.pos]
    }
}
