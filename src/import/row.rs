// Row definitions: one physical line of text into one destination
//
// Every column kind goes through the same state machine:
//   capacity check -> advance -> blank-line check -> capture -> skip delimiter
// Only the delimiter skip differs between parser kinds.

use super::column::{ColumnDefinition, Repeat};
use crate::core::{assign_cell, is_end_of_line, skip_line_ending, trim_cell, Cursor};

/// Where a row's captured cells go.
#[derive(Debug)]
pub enum Destination<'d> {
    /// One cell per column. Grows only if the row allows column resizing.
    Row(&'d mut Vec<String>),
    /// Single-column mode: only the first captured column is kept.
    Scalar(&'d mut String),
    /// Read and throw away (used to skip lines).
    Discard,
}

impl Destination<'_> {
    /// Whether any destination cell holds text.
    pub fn has_text(&self) -> bool {
        match self {
            Destination::Row(values) => values.iter().any(|cell| !cell.is_empty()),
            Destination::Scalar(value) => !value.is_empty(),
            Destination::Discard => false,
        }
    }

    fn assign(&mut self, index: usize, cell: &str) {
        match self {
            Destination::Row(values) => assign_cell(&mut values[index], cell),
            Destination::Scalar(value) => assign_cell(value, cell),
            Destination::Discard => {}
        }
    }
}

/// What an empty delimited field (e.g. the middle of `a,,b`) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFields {
    /// Write an empty cell and count it as read.
    #[default]
    Write,
    /// Consume the field without writing; later fields shift left.
    Skip,
}

/// Outcome of reading one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRead<'a> {
    /// Start of the next line, or wherever reading stopped early.
    /// `None` once the end of the buffer was reached.
    pub next: Option<Cursor<'a>>,
    /// Columns captured into the destination.
    pub columns_read: usize,
}

impl<'a> RowRead<'a> {
    #[inline]
    fn new(next: Option<Cursor<'a>>, columns_read: usize) -> Self {
        RowRead { next, columns_read }
    }
}

/// Ordered column definitions describing one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDefinition {
    columns: Vec<ColumnDefinition>,
    repeat: Repeat,
    allow_column_resizing: bool,
    treat_consecutive_delimiters_as_one: bool,
    empty_fields: EmptyFields,
}

impl Default for RowDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl RowDefinition {
    /// Row that repeats until end of buffer, with a fixed destination width.
    pub fn new() -> Self {
        RowDefinition {
            columns: Vec::new(),
            repeat: Repeat::UntilTerminator,
            allow_column_resizing: false,
            treat_consecutive_delimiters_as_one: false,
            empty_fields: EmptyFields::Write,
        }
    }

    pub fn with_repeat(mut self, repeat: impl Into<Repeat>) -> Self {
        self.repeat = repeat.into();
        self
    }

    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn add_column(&mut self, column: ColumnDefinition) {
        self.columns.push(column);
    }

    /// Let the destination grow when a line has more columns than it holds.
    pub fn allow_column_resizing(mut self, allow: bool) -> Self {
        self.allow_column_resizing = allow;
        self
    }

    /// Treat a run of delimiters as one (`a,,,b` is two columns).
    pub fn treat_consecutive_delimiters_as_one(mut self, enable: bool) -> Self {
        self.treat_consecutive_delimiters_as_one = enable;
        self
    }

    pub fn with_empty_fields(mut self, empty_fields: EmptyFields) -> Self {
        self.empty_fields = empty_fields;
        self
    }

    #[inline]
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    #[inline]
    pub fn is_column_resizing_enabled(&self) -> bool {
        self.allow_column_resizing
    }

    /// False when every column only skips text, i.e. the row just eats a line.
    #[inline]
    pub fn is_reading_text(&self) -> bool {
        self.columns.iter().any(ColumnDefinition::captures)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Read one line starting at `start` into `dest`.
    ///
    /// Returns the start of the next line, or an earlier position when the
    /// destination filled up and resizing is off. A line that no column
    /// consumed is skipped to its end so the caller always makes progress.
    pub fn read<'a>(&self, start: Cursor<'a>, dest: &mut Destination<'_>) -> RowRead<'a> {
        if start.is_at_end() {
            return RowRead::new(None, 0);
        }
        let mut cursor = start;
        let mut column_index = 0usize;
        let mut columns_read = 0usize;

        for column in &self.columns {
            let parser = column.parser();
            let mut iteration = 0usize;
            while column.repeat().allows(iteration) {
                iteration += 1;

                match dest {
                    Destination::Row(values) if column_index >= values.len() => {
                        if !self.allow_column_resizing {
                            tracing::trace!(
                                width = values.len(),
                                "row destination full, stopping early"
                            );
                            return RowRead::new(Some(cursor), columns_read);
                        }
                        values.push(String::new());
                    }
                    Destination::Scalar(_) if column_index >= 1 => {
                        return RowRead::new(Some(cursor), columns_read);
                    }
                    _ => {}
                }

                let previous = cursor;
                let advanced = parser.advance(cursor);

                if let Some(next) = advanced {
                    // nothing before the line ending: blank line or trailing empty field
                    if next == previous && next.peek().is_some_and(is_end_of_line) {
                        return RowRead::new(Some(skip_line_ending(next)), columns_read);
                    }
                }

                if column.captures() {
                    match advanced {
                        None => {
                            let cell = trim_cell(previous.rest());
                            if cell.is_empty() {
                                return RowRead::new(None, columns_read);
                            }
                            dest.assign(column_index, cell);
                            return RowRead::new(None, columns_read + 1);
                        }
                        Some(next) => {
                            let cell = trim_cell(previous.slice_to(&next));
                            if !(cell.is_empty() && self.empty_fields == EmptyFields::Skip) {
                                dest.assign(column_index, cell);
                                column_index += 1;
                                columns_read += 1;
                            }
                        }
                    }
                }

                let Some(next) = advanced else {
                    return RowRead::new(None, columns_read);
                };
                cursor = next;
                match cursor.peek() {
                    None => return RowRead::new(None, columns_read),
                    Some(c) if is_end_of_line(c) => {
                        return RowRead::new(Some(skip_line_ending(cursor)), columns_read);
                    }
                    Some(_) => {}
                }

                if parser.is_delimited() {
                    if self.treat_consecutive_delimiters_as_one {
                        // whitespace delimiters must not run into the next line
                        while cursor
                            .peek()
                            .is_some_and(|c| !is_end_of_line(c) && parser.is_delimiter(c))
                        {
                            cursor.bump();
                        }
                    } else {
                        cursor.bump();
                    }
                } else if cursor == previous {
                    // a column that cannot move would repeat forever
                    break;
                }
            }
        }

        // no column consumed anything: eat the line ourselves
        if cursor == start {
            while let Some(c) = cursor.peek() {
                if is_end_of_line(c) {
                    return RowRead::new(Some(skip_line_ending(cursor)), columns_read);
                }
                cursor.bump();
            }
            return RowRead::new(None, columns_read);
        }
        RowRead::new(Some(cursor), columns_read)
    }
}
