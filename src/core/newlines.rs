/// Line-ending handling shared by the row parser, matrix driver, and preview.
///
/// A line ends at `\r\n` (consumed as one unit), a lone `\r`, or a lone `\n`.
use super::cursor::Cursor;
use super::scanner::is_end_of_line;

/// Returns length of the line ending at `pos`, or 0 if there is none.
#[inline]
pub fn match_newline(input: &[u8], pos: usize) -> usize {
    match input.get(pos) {
        Some(b'\r') if input.get(pos + 1) == Some(&b'\n') => 2,
        Some(b'\r') | Some(b'\n') => 1,
        _ => 0,
    }
}

/// Byte offset of the next `\r` or `\n` at or after `from`.
#[inline]
pub fn find_line_end(input: &[u8], from: usize) -> Option<usize> {
    memchr::memchr2(b'\n', b'\r', &input[from..]).map(|i| from + i)
}

/// Step over the line ending under the cursor, if any.
#[inline]
pub fn skip_line_ending(mut cursor: Cursor<'_>) -> Cursor<'_> {
    let len = match_newline(cursor.text().as_bytes(), cursor.position());
    cursor.skip_bytes(len);
    cursor
}

/// Move the cursor to the start of the next physical line.
///
/// A cursor already sitting at the start of a line is returned unchanged.
/// At end of buffer the cursor stays at the end.
pub fn next_line_start(mut cursor: Cursor<'_>) -> Cursor<'_> {
    match cursor.previous() {
        None => return cursor,
        Some(c) if is_end_of_line(c) => return cursor,
        Some(_) => {}
    }
    let bytes = cursor.text().as_bytes();
    match find_line_end(bytes, cursor.position()) {
        Some(eol) => {
            cursor.skip_bytes(eol - cursor.position());
            skip_line_ending(cursor)
        }
        None => {
            cursor.skip_bytes(bytes.len() - cursor.position());
            cursor
        }
    }
}

/// Start of the line after the one containing `cursor`, even when the cursor
/// already sits at a line start. `None` when no line ending follows.
pub fn following_line_start(mut cursor: Cursor<'_>) -> Option<Cursor<'_>> {
    let eol = find_line_end(cursor.text().as_bytes(), cursor.position())?;
    cursor.skip_bytes(eol - cursor.position());
    Some(skip_line_ending(cursor))
}
