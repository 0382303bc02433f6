// Delimited table import
//
// The usual recipe for a header-plus-rows file: preview for the header and
// row count, then a two-definition matrix (header skipped, data captured)
// over the same text.

use super::column::{ColumnDefinition, ColumnParser, Repeat};
use super::matrix::TextMatrix;
use super::preview::{preview, skip_leading_rows, PreviewOptions};
use super::recode::MissingDataCodes;
use super::row::RowDefinition;
use crate::core::Cursor;
use crate::error::{check_delimiter, ImportError};

/// Options for [`import_delimited`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedOptions {
    pub delimiter: char,
    /// Lines before the header to ignore (titles, notes).
    pub skip_rows: usize,
    pub ignore_blank_lines: bool,
    pub treat_consecutive_delimiters_as_one: bool,
    /// Cells equal to one of these are cleared after reading.
    pub missing_data_codes: Vec<String>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        DelimitedOptions {
            delimiter: ',',
            skip_rows: 0,
            ignore_blank_lines: false,
            treat_consecutive_delimiters_as_one: false,
            missing_data_codes: Vec::new(),
        }
    }
}

impl DelimitedOptions {
    pub fn new(delimiter: char) -> Self {
        DelimitedOptions {
            delimiter,
            ..Self::default()
        }
    }

    pub fn skip_rows(mut self, rows: usize) -> Self {
        self.skip_rows = rows;
        self
    }

    pub fn ignore_blank_lines(mut self, ignore: bool) -> Self {
        self.ignore_blank_lines = ignore;
        self
    }

    pub fn treat_consecutive_delimiters_as_one(mut self, enable: bool) -> Self {
        self.treat_consecutive_delimiters_as_one = enable;
        self
    }

    pub fn with_missing_data_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_data_codes = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        check_delimiter(self.delimiter).map(|_| ())
    }
}

/// What a column's sampled cells look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty sampled cell parses as a number.
    Numeric,
    Text,
}

/// Header names plus one row of cells per data line.
///
/// Rows are ragged: a short line yields a short row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedTable {
    pub header_names: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DelimitedTable {
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.header_names.len()
    }

    /// Guess each header column's kind from its first `preview_rows` cells.
    /// Empty and missing cells say nothing about the kind.
    pub fn column_kinds(&self, preview_rows: usize) -> Vec<ColumnKind> {
        let sample = &self.rows[..self.rows.len().min(preview_rows)];
        (0..self.header_names.len())
            .map(|column| {
                let has_text = sample
                    .iter()
                    .filter_map(|row| row.get(column))
                    .any(|cell| !cell.is_empty() && !is_number(cell));
                if has_text {
                    ColumnKind::Text
                } else {
                    ColumnKind::Numeric
                }
            })
            .collect()
    }
}

#[inline]
fn is_number(cell: &str) -> bool {
    cell.parse::<f64>().is_ok_and(|value| !value.is_nan())
}

/// Import a header-plus-rows delimited text.
pub fn import_delimited(text: &str, options: &DelimitedOptions) -> Result<DelimitedTable, ImportError> {
    options.validate()?;

    // leading blank lines would otherwise be read as the header
    let text = text.trim();
    let Some(start) = skip_leading_rows(Cursor::new(text), options.skip_rows) else {
        return Ok(DelimitedTable::default());
    };
    let body = start.rest();

    let preview = preview(
        body,
        &PreviewOptions::new()
            .with_header_delimiter(options.delimiter)
            .treat_consecutive_delimiters_as_one(options.treat_consecutive_delimiters_as_one)
            .ignore_blank_lines(options.ignore_blank_lines),
    );
    let data_rows = preview.row_count().saturating_sub(1);
    let header_names = preview.into_header_names();

    let header_row = RowDefinition::new().with_repeat(Repeat::Exactly(1)).with_column(
        ColumnDefinition::new(ColumnParser::single(options.delimiter)).skipped(),
    );
    let data_row = RowDefinition::new()
        .with_column(ColumnDefinition::new(ColumnParser::single(options.delimiter)))
        .allow_column_resizing(true)
        .treat_consecutive_delimiters_as_one(options.treat_consecutive_delimiters_as_one);

    let mut matrix = TextMatrix::new()
        .with_row_definition(header_row)
        .with_row_definition(data_row);
    if !options.missing_data_codes.is_empty() {
        matrix.set_missing_data_codes(Some(MissingDataCodes::new(
            options.missing_data_codes.iter().cloned(),
        )));
    }

    let rows = matrix.read_matrix(
        body,
        data_rows,
        header_names.len(),
        options.ignore_blank_lines,
    );
    tracing::debug!(
        rows = rows.len(),
        columns = header_names.len(),
        delimiter = %options.delimiter,
        "delimited import complete"
    );
    Ok(DelimitedTable { header_names, rows })
}
