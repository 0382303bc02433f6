// Character-level helpers for column splitting.
//
// None of these treat end of buffer specially; callers check for it first.

/// Carriage return or line feed.
#[inline]
pub fn is_end_of_line(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Whitespace, semicolon, or comma.
#[inline]
pub fn is_standard_delimiter(c: char) -> bool {
    c.is_whitespace() || c == ';' || c == ','
}

#[inline]
pub fn is_single_delimiter(c: char, delimiter: char) -> bool {
    c == delimiter
}

/// Check if a character is one of the delimiter characters
/// Optimized for common cases of 1-3 delimiters
#[inline]
pub fn is_one_of(c: char, delimiters: &[char]) -> bool {
    match delimiters.len() {
        0 => false,
        1 => c == delimiters[0],
        2 => c == delimiters[0] || c == delimiters[1],
        3 => c == delimiters[0] || c == delimiters[1] || c == delimiters[2],
        _ => delimiters.contains(&c),
    }
}
