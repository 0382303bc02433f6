// Preview pass
//
// Counts lines and reads the header row without parsing any body columns.
// Row counting is a plain line-ending scan over bytes, so it stays cheap on
// large buffers; the header goes through the regular row machinery.

use std::ops::Range;

use super::column::{ColumnDefinition, ColumnParser, Repeat};
use super::row::{Destination, RowDefinition};
use crate::core::{collapse_quotes_in_place, find_line_end, match_newline, Cursor};

/// Options for [`preview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    pub header_delimiter: char,
    /// Read a run of header delimiters as one.
    pub treat_consecutive_delimiters_as_one: bool,
    /// Do not count runs of empty lines between rows.
    pub ignore_blank_lines: bool,
    /// Record the byte range of every counted line.
    pub store_line_spans: bool,
    /// Lines to step over before the header.
    pub skip_rows: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        PreviewOptions {
            header_delimiter: ',',
            treat_consecutive_delimiters_as_one: false,
            ignore_blank_lines: false,
            store_line_spans: false,
            skip_rows: 0,
        }
    }
}

impl PreviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_delimiter(mut self, delimiter: char) -> Self {
        self.header_delimiter = delimiter;
        self
    }

    pub fn treat_consecutive_delimiters_as_one(mut self, enable: bool) -> Self {
        self.treat_consecutive_delimiters_as_one = enable;
        self
    }

    pub fn ignore_blank_lines(mut self, ignore: bool) -> Self {
        self.ignore_blank_lines = ignore;
        self
    }

    pub fn store_line_spans(mut self, store: bool) -> Self {
        self.store_line_spans = store;
        self
    }

    pub fn skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }
}

/// Result of a preview pass.
///
/// `row_count` includes the header line. Line spans are byte ranges into the
/// previewed text, without their line endings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    row_count: usize,
    header_names: Vec<String>,
    line_spans: Vec<Range<usize>>,
}

impl Preview {
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn header_names(&self) -> &[String] {
        &self.header_names
    }

    pub fn into_header_names(self) -> Vec<String> {
        self.header_names
    }

    /// Empty unless the preview was asked to store them.
    pub fn line_spans(&self) -> &[Range<usize>] {
        &self.line_spans
    }

    /// The `index`-th counted line of `text`, which must be the previewed text.
    pub fn line<'a>(&self, text: &'a str, index: usize) -> Option<&'a str> {
        self.line_spans
            .get(index)
            .and_then(|span| text.get(span.clone()))
    }
}

/// Skip leading rows, read the header, and count the lines that follow.
pub fn preview(text: &str, options: &PreviewOptions) -> Preview {
    let mut result = Preview::default();
    if text.is_empty() {
        return result;
    }

    let Some(cursor) = skip_leading_rows(Cursor::new(text), options.skip_rows) else {
        tracing::trace!(skip_rows = options.skip_rows, "text ended while skipping rows");
        return result;
    };

    read_header(cursor, options, &mut result.header_names);
    count_lines(text, cursor.position(), options, &mut result);

    tracing::debug!(
        rows = result.row_count,
        columns = result.header_names.len(),
        spans = result.line_spans.len(),
        "preview complete"
    );
    result
}

/// Step over `rows` lines, blank or not. `None` if the text runs out first.
pub(crate) fn skip_leading_rows(mut cursor: Cursor<'_>, rows: usize) -> Option<Cursor<'_>> {
    if rows == 0 {
        return Some(cursor);
    }
    let skip_row =
        RowDefinition::new().with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine).skipped());
    for _ in 0..rows {
        cursor = skip_row.read(cursor, &mut Destination::Discard).next?;
    }
    Some(cursor)
}

fn read_header(cursor: Cursor<'_>, options: &PreviewOptions, names: &mut Vec<String>) {
    let header_row = RowDefinition::new()
        .with_repeat(Repeat::Exactly(1))
        .with_column(ColumnDefinition::new(ColumnParser::single(options.header_delimiter)))
        .allow_column_resizing(true)
        .treat_consecutive_delimiters_as_one(options.treat_consecutive_delimiters_as_one);
    let read = header_row.read(cursor, &mut Destination::Row(names));
    names.truncate(read.columns_read);
    // cells were already unescaped once while being read
    for name in names.iter_mut() {
        collapse_quotes_in_place(name);
    }
}

fn count_lines(text: &str, start: usize, options: &PreviewOptions, result: &mut Preview) {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < bytes.len() {
        let line_start = pos;
        let line_end = find_line_end(bytes, pos).unwrap_or(bytes.len());
        result.row_count += 1;
        if options.store_line_spans {
            result.line_spans.push(line_start..line_end);
        }
        if line_end == bytes.len() {
            break;
        }
        pos = line_end + match_newline(bytes, line_end);
        if pos == bytes.len() {
            // the empty line after a final line ending still counts
            result.row_count += 1;
            if options.store_line_spans {
                result.line_spans.push(pos..pos);
            }
            break;
        }
        if options.ignore_blank_lines {
            while matches!(bytes.get(pos), Some(b'\r' | b'\n')) {
                pos += 1;
            }
        }
    }
}
