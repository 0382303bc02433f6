// Text matrix driver
//
// Applies an ordered list of row definitions across a buffer to build either
// a matrix (one Vec<String> per row) or a flat vector (single-column mode).
// Reading stops at the requested row count or at end of buffer, whichever
// comes first; the output is then trimmed to the rows actually read.

use super::recode::MissingDataCodes;
use super::row::{Destination, RowDefinition};
use crate::core::{following_line_start, is_end_of_line, next_line_start, Cursor};

/// Output shape the driver writes into.
trait RowSink {
    fn reset(&mut self, row_count: usize);
    fn destination(&mut self, row: usize, column_count: usize) -> Destination<'_>;
    /// Drop trailing cells beyond what the last read captured.
    fn shrink_row(&mut self, row: usize, width: usize);
    fn truncate(&mut self, rows: usize);
    fn recode(&mut self, codes: &MissingDataCodes);
}

impl RowSink for Vec<Vec<String>> {
    fn reset(&mut self, row_count: usize) {
        self.clear();
        self.resize_with(row_count, Vec::new);
    }

    fn destination(&mut self, row: usize, column_count: usize) -> Destination<'_> {
        let values = &mut self[row];
        values.resize_with(column_count, String::new);
        Destination::Row(values)
    }

    fn shrink_row(&mut self, row: usize, width: usize) {
        self[row].truncate(width);
    }

    fn truncate(&mut self, rows: usize) {
        Vec::truncate(self, rows);
    }

    fn recode(&mut self, codes: &MissingDataCodes) {
        codes.recode_rows(self);
    }
}

impl RowSink for Vec<String> {
    fn reset(&mut self, row_count: usize) {
        self.clear();
        self.resize_with(row_count, String::new);
    }

    fn destination(&mut self, row: usize, _column_count: usize) -> Destination<'_> {
        Destination::Scalar(&mut self[row])
    }

    fn shrink_row(&mut self, _row: usize, _width: usize) {}

    fn truncate(&mut self, rows: usize) {
        Vec::truncate(self, rows);
    }

    fn recode(&mut self, codes: &MissingDataCodes) {
        codes.recode_cells(self);
    }
}

/// Tabular text importer built from row definitions.
#[derive(Debug, Clone, Default)]
pub struct TextMatrix {
    rows: Vec<RowDefinition>,
    missing_data_codes: Option<MissingDataCodes>,
}

impl TextMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_definition(mut self, row: RowDefinition) -> Self {
        self.rows.push(row);
        self
    }

    pub fn add_row_definition(&mut self, row: RowDefinition) {
        self.rows.push(row);
    }

    pub fn clear_row_definitions(&mut self) {
        self.rows.clear();
    }

    pub fn row_definitions(&self) -> &[RowDefinition] {
        &self.rows
    }

    /// Values to clear after reading (e.g. "NA", "NULL").
    pub fn set_missing_data_codes(&mut self, codes: Option<MissingDataCodes>) {
        self.missing_data_codes = codes;
    }

    pub fn with_missing_data_codes(mut self, codes: MissingDataCodes) -> Self {
        self.missing_data_codes = Some(codes);
        self
    }

    /// Read up to `row_count` rows into a matrix.
    ///
    /// `column_count` pre-sizes every row; rows that allow column resizing
    /// grow past it and are trimmed back to the columns actually read.
    pub fn read_matrix(
        &self,
        text: &str,
        row_count: usize,
        column_count: usize,
        ignore_blank_lines: bool,
    ) -> Vec<Vec<String>> {
        let mut matrix = Vec::new();
        self.read_into(text, row_count, column_count, ignore_blank_lines, &mut matrix);
        matrix
    }

    /// Read up to `row_count` rows, keeping the first captured column of each.
    pub fn read_column(&self, text: &str, row_count: usize, ignore_blank_lines: bool) -> Vec<String> {
        let mut cells = Vec::new();
        self.read_into(text, row_count, 1, ignore_blank_lines, &mut cells);
        cells
    }

    fn read_into<S: RowSink>(
        &self,
        text: &str,
        row_count: usize,
        column_count: usize,
        ignore_blank_lines: bool,
        out: &mut S,
    ) -> usize {
        if text.is_empty() || row_count == 0 {
            out.reset(0);
            return 0;
        }
        out.reset(row_count);
        let rows_read = self.fill(text, row_count, column_count, ignore_blank_lines, out);
        out.truncate(rows_read);
        if let Some(codes) = &self.missing_data_codes {
            out.recode(codes);
        }
        tracing::debug!(
            rows = rows_read,
            requested = row_count,
            definitions = self.rows.len(),
            "text matrix read complete"
        );
        rows_read
    }

    /// Run the row definitions. Returns the number of rows completed.
    fn fill<S: RowSink>(
        &self,
        text: &str,
        row_count: usize,
        column_count: usize,
        ignore_blank_lines: bool,
        out: &mut S,
    ) -> usize {
        let mut position = Cursor::new(text);
        let mut row_index = 0usize;

        for row in &self.rows {
            let reads_text = row.is_reading_text();
            let mut iteration = 0usize;
            while row.repeat().allows(iteration) {
                iteration += 1;
                if row_index >= row_count {
                    return row_index;
                }
                let mut dest = out.destination(row_index, column_count);

                let (next, columns_read) = if ignore_blank_lines {
                    // keep reading lines with this definition until one has text
                    let mut cursor = position;
                    loop {
                        let line_start = cursor;
                        let read = row.read(cursor, &mut dest);
                        if read.columns_read > 0 && dest.has_text() {
                            break (read.next, read.columns_read);
                        }
                        let Some(next) = read.next else {
                            tracing::trace!(rows = row_index, "end of buffer while skipping blank lines");
                            return row_index;
                        };
                        cursor = match resync(line_start, next) {
                            Some(cursor) => cursor,
                            None => return row_index,
                        };
                        // a skip-only row consumed a real line: that counts as its read
                        if !reads_text && !line_start.peek().is_some_and(is_end_of_line) {
                            break (Some(cursor), 0);
                        }
                    }
                } else {
                    let read = row.read(position, &mut dest);
                    (read.next, read.columns_read)
                };

                if reads_text {
                    if row.is_column_resizing_enabled() {
                        out.shrink_row(row_index, columns_read);
                    }
                    row_index += 1;
                }

                let Some(next) = next else {
                    if row_index < row_count {
                        tracing::trace!(rows = row_index, requested = row_count, "end of buffer");
                    }
                    return row_index;
                };
                position = match resync(position, next) {
                    Some(cursor) => cursor,
                    None => return row_index,
                };
            }
        }
        row_index
    }
}

/// Start of the line to read next. A read that left the cursor where it
/// started gives up on that line instead of reading it again.
fn resync<'a>(start: Cursor<'a>, next: Cursor<'a>) -> Option<Cursor<'a>> {
    let cursor = next_line_start(next);
    if cursor == start {
        following_line_start(cursor)
    } else {
        Some(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::column::{ColumnDefinition, ColumnParser, Repeat};

    fn comma_row() -> RowDefinition {
        RowDefinition::new().with_column(ColumnDefinition::new(ColumnParser::single(',')))
    }

    fn strings(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_reads_requested_rows() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let rows = matrix.read_matrix("a,b\nc,d\ne,f", 2, 2, false);
        assert_eq!(rows, strings(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn test_stops_at_end_of_buffer() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let rows = matrix.read_matrix("a,b\nc,d", 10, 2, false);
        assert_eq!(rows, strings(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn test_blank_lines_kept_or_skipped() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let kept = matrix.read_matrix("A\n\nB", 3, 1, false);
        assert_eq!(kept, strings(&[&["A"], &[""], &["B"]]));

        let skipped = matrix.read_matrix("A\n\nB", 2, 1, true);
        assert_eq!(skipped, strings(&[&["A"], &["B"]]));
    }

    #[test]
    fn test_trailing_line_ending_reads_one_blank_row() {
        // pairs with the preview, which counts the empty line after the final newline
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let rows = matrix.read_matrix("a\nb\n", 3, 1, false);
        assert_eq!(rows, strings(&[&["a"], &["b"], &[""]]));

        let rows = matrix.read_matrix("a\nb\n", 3, 1, true);
        assert_eq!(rows, strings(&[&["a"], &["b"]]));
    }

    #[test]
    fn test_ragged_rows_trimmed() {
        let matrix =
            TextMatrix::new().with_row_definition(comma_row().allow_column_resizing(true));
        let rows = matrix.read_matrix("a,b,c\nx", 2, 1, false);
        assert_eq!(rows, strings(&[&["a", "b", "c"], &["x"]]));
    }

    #[test]
    fn test_truncated_row_resyncs_to_next_line() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let rows = matrix.read_matrix("a,b,c\nd,e,f\r\ng,h", 3, 2, false);
        assert_eq!(rows, strings(&[&["a", "b"], &["d", "e"], &["g", "h"]]));
    }

    #[test]
    fn test_header_skip_then_data() {
        let header = RowDefinition::new()
            .with_repeat(Repeat::Exactly(1))
            .with_column(ColumnDefinition::new(ColumnParser::single(',')).skipped());
        let matrix = TextMatrix::new()
            .with_row_definition(header)
            .with_row_definition(comma_row());
        let rows = matrix.read_matrix("h1,h2\n1,2\n3,4", 3, 2, false);
        assert_eq!(rows, strings(&[&["1", "2"], &["3", "4"]]));
    }

    #[test]
    fn test_header_skip_with_blank_lines_ignored() {
        let header = RowDefinition::new()
            .with_repeat(Repeat::Exactly(1))
            .with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine).skipped());
        let matrix = TextMatrix::new()
            .with_row_definition(header)
            .with_row_definition(comma_row());
        let rows = matrix.read_matrix("\n\nh1,h2\n\n1,2\n", 5, 2, true);
        assert_eq!(rows, strings(&[&["1", "2"]]));
    }

    #[test]
    fn test_missing_data_recoded() {
        let matrix = TextMatrix::new()
            .with_row_definition(comma_row())
            .with_missing_data_codes(MissingDataCodes::new(["NA"]));
        let rows = matrix.read_matrix("NA,5\n3,NA", 2, 2, false);
        assert_eq!(rows, strings(&[&["", "5"], &["3", ""]]));
    }

    #[test]
    fn test_single_column_mode() {
        let matrix = TextMatrix::new().with_row_definition(
            RowDefinition::new().with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine)),
        );
        let cells = matrix.read_column("first line\n\n  third, line \n", 10, true);
        assert_eq!(cells, vec!["first line", "third, line"]);
    }

    #[test]
    fn test_row_definitions_applied_in_order() {
        let fixed = RowDefinition::new().with_repeat(Repeat::Exactly(1)).with_column(
            ColumnDefinition::new(ColumnParser::fixed_width(2)).with_repeat(Repeat::Exactly(2)),
        );
        let matrix = TextMatrix::new()
            .with_row_definition(fixed)
            .with_row_definition(comma_row());
        let rows = matrix.read_matrix("abcd\n1,2", 2, 2, false);
        assert_eq!(rows, strings(&[&["ab", "cd"], &["1", "2"]]));
    }

    #[test]
    fn test_empty_input_and_zero_rows() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        assert!(matrix.read_matrix("", 5, 2, false).is_empty());
        assert!(matrix.read_matrix("a,b", 0, 2, false).is_empty());
        assert!(TextMatrix::new().read_matrix("a,b", 3, 2, false).is_empty());
    }

    #[test]
    fn test_zero_width_destination_still_terminates() {
        let matrix = TextMatrix::new().with_row_definition(comma_row());
        let rows = matrix.read_matrix("a,b\nc,d", 5, 0, false);
        assert_eq!(rows, vec![Vec::<String>::new(); 2]);
        assert!(matrix.read_matrix("a,b\nc,d", 5, 0, true).is_empty());
    }
}
