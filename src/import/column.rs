// Column parsers and column definitions
//
// A column parser only finds where the current column ends. It never consumes
// the delimiter or line ending after the column; the row parser does that.

use crate::core::{
    find_line_end, is_end_of_line, is_one_of, is_single_delimiter, is_standard_delimiter, Cursor,
};

/// How many times a definition is applied before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Exactly(usize),
    /// Until end of line (columns) or end of buffer (rows).
    UntilTerminator,
}

impl Repeat {
    /// Whether the `iteration`-th application (0-based) is still allowed.
    #[inline]
    pub fn allows(&self, iteration: usize) -> bool {
        match *self {
            Repeat::Exactly(count) => iteration < count,
            Repeat::UntilTerminator => true,
        }
    }
}

impl From<Option<usize>> for Repeat {
    fn from(count: Option<usize>) -> Self {
        count.map_or(Repeat::UntilTerminator, Repeat::Exactly)
    }
}

/// Where a column ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnParser {
    /// Exactly `width` characters, cut short by a line ending.
    FixedWidth(usize),
    /// Whitespace, `;`, or `,`.
    StandardDelimiter,
    SingleDelimiter(char),
    /// Any one of a set of characters.
    MultipleDelimiters(Box<[char]>),
    /// The rest of the line.
    ToEndOfLine,
}

impl ColumnParser {
    pub fn fixed_width(width: usize) -> Self {
        debug_assert!(width > 0, "fixed-width column needs a non-zero width");
        ColumnParser::FixedWidth(width)
    }

    pub fn single(delimiter: char) -> Self {
        ColumnParser::SingleDelimiter(delimiter)
    }

    pub fn multiple(delimiters: impl Into<Box<[char]>>) -> Self {
        let delimiters = delimiters.into();
        debug_assert!(!delimiters.is_empty(), "delimiter set must not be empty");
        ColumnParser::MultipleDelimiters(delimiters)
    }

    /// Whether `c` separates this column from the next one.
    /// Fixed-width and to-end-of-line columns have no delimiter.
    #[inline]
    pub fn is_delimiter(&self, c: char) -> bool {
        match self {
            ColumnParser::StandardDelimiter => is_standard_delimiter(c),
            ColumnParser::SingleDelimiter(delim) => is_single_delimiter(c, *delim),
            ColumnParser::MultipleDelimiters(delims) => is_one_of(c, delims),
            ColumnParser::FixedWidth(_) | ColumnParser::ToEndOfLine => false,
        }
    }

    /// Whether a delimiter follows the column text.
    #[inline]
    pub fn is_delimited(&self) -> bool {
        matches!(
            self,
            ColumnParser::StandardDelimiter
                | ColumnParser::SingleDelimiter(_)
                | ColumnParser::MultipleDelimiters(_)
        )
    }

    /// Position right after this column's text, before any delimiter or line
    /// ending. `None` when the cursor is already at end of buffer.
    pub fn advance<'a>(&self, cursor: Cursor<'a>) -> Option<Cursor<'a>> {
        if cursor.is_at_end() {
            return None;
        }
        match self {
            ColumnParser::FixedWidth(width) => Some(advance_fixed(cursor, *width)),
            ColumnParser::ToEndOfLine => Some(advance_to_eol(cursor)),
            _ => Some(self.advance_delimited(cursor)),
        }
    }

    /// Scan to the next delimiter that is not inside an open quote.
    /// `""` is an escaped quote and does not open or close a quoted region.
    fn advance_delimited<'a>(&self, mut cursor: Cursor<'a>) -> Cursor<'a> {
        let mut quote_depth: u32 = 0;
        while let Some(c) = cursor.peek() {
            if is_end_of_line(c) || (quote_depth % 2 == 0 && self.is_delimiter(c)) {
                break;
            }
            if c == '"' {
                if cursor.peek_second() == Some('"') {
                    cursor.skip_bytes(2);
                } else {
                    cursor.skip_bytes(1);
                    quote_depth += 1;
                }
            } else {
                cursor.bump();
            }
        }
        cursor
    }
}

fn advance_fixed(mut cursor: Cursor<'_>, width: usize) -> Cursor<'_> {
    for _ in 0..width {
        match cursor.peek() {
            Some(c) if !is_end_of_line(c) => {
                cursor.bump();
            }
            _ => break,
        }
    }
    cursor
}

fn advance_to_eol(mut cursor: Cursor<'_>) -> Cursor<'_> {
    let bytes = cursor.text().as_bytes();
    let end = find_line_end(bytes, cursor.position()).unwrap_or(bytes.len());
    cursor.skip_bytes(end - cursor.position());
    cursor
}

/// A parser plus how often it repeats and whether its text is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    parser: ColumnParser,
    repeat: Repeat,
    capture: bool,
}

impl ColumnDefinition {
    /// Capturing column that repeats until end of line.
    pub fn new(parser: ColumnParser) -> Self {
        ColumnDefinition {
            parser,
            repeat: Repeat::UntilTerminator,
            capture: true,
        }
    }

    pub fn with_repeat(mut self, repeat: impl Into<Repeat>) -> Self {
        self.repeat = repeat.into();
        self
    }

    /// Step over this column's text without keeping it.
    pub fn skipped(mut self) -> Self {
        self.capture = false;
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    #[inline]
    pub fn parser(&self) -> &ColumnParser {
        &self.parser
    }

    #[inline]
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    #[inline]
    pub fn captures(&self) -> bool {
        self.capture
    }
}
