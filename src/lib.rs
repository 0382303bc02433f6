// TextMatrix - delimited and fixed-width text import
//
// Layers:
// core:   cursor over a &str, line endings, delimiter predicates, cell trim/unescape
// import: column parsers, row definitions, matrix driver, preview, delimited tables
// NIFs:   thin wrappers below that decode options, run an import, build terms

use rustler::{Binary, Env, Error, NifResult, ResourceArc, Term};

pub mod core;
pub mod error;
pub mod import;
mod resource;
mod term;

pub use crate::core::{collapse_quotes, trim_cell, Cursor};
pub use crate::error::ImportError;
pub use crate::import::{
    import_delimited, preview, ColumnDefinition, ColumnKind, ColumnParser, DelimitedOptions,
    DelimitedTable, Destination, EmptyFields, MissingDataCodes, Preview, PreviewOptions, Repeat,
    RowDefinition, RowRead, TextMatrix,
};

use crate::error::check_delimiter;
use resource::{PreviewRef, PreviewResource};
use term::{cell_to_term, cells_to_term, rows_to_term, table_to_maps};

impl From<ImportError> for Error {
    fn from(err: ImportError) -> Self {
        Error::Term(Box::new(err.to_string()))
    }
}

/// Borrow a binary as text. Import works on decoded UTF-8 only.
fn decode_text<'a>(input: &'a Binary<'_>) -> NifResult<&'a str> {
    std::str::from_utf8(input.as_slice()).map_err(|err| ImportError::from(err).into())
}

/// A binary holding exactly one character.
fn decode_char_binary(binary: &Binary<'_>) -> NifResult<char> {
    let text = std::str::from_utf8(binary.as_slice()).map_err(ImportError::from)?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(check_delimiter(c)?),
        _ => Err(ImportError::InvalidDelimiter(text.to_string()).into()),
    }
}

/// Decode a single delimiter.
/// Accepts: codepoint 44 or binary ","
fn decode_delimiter(term: Term<'_>) -> NifResult<char> {
    if let Ok(codepoint) = term.decode::<u32>() {
        let c = char::from_u32(codepoint)
            .ok_or_else(|| ImportError::InvalidDelimiter(codepoint.to_string()))?;
        return Ok(check_delimiter(c)?);
    }
    if let Ok(binary) = term.decode::<Binary>() {
        return decode_char_binary(&binary);
    }
    Err(Error::BadArg)
}

/// Decode a column scheme.
/// Accepts: :standard, :line, codepoint 44, binary ",", or list [",", ";"]
fn decode_column_parser(term: Term<'_>) -> NifResult<ColumnParser> {
    if let Ok(name) = term.atom_to_string() {
        return match name.as_str() {
            "standard" => Ok(ColumnParser::StandardDelimiter),
            "line" => Ok(ColumnParser::ToEndOfLine),
            _ => Err(Error::BadArg),
        };
    }
    // A one-element list is a plain single delimiter.
    if let Ok(list) = term.decode::<Vec<Binary>>() {
        if list.is_empty() {
            return Err(ImportError::EmptyDelimiterSet.into());
        }
        let delimiters = list
            .iter()
            .map(decode_char_binary)
            .collect::<NifResult<Vec<char>>>()?;
        return Ok(match delimiters.as_slice() {
            [single] => ColumnParser::single(*single),
            _ => ColumnParser::multiple(delimiters),
        });
    }
    decode_delimiter(term).map(ColumnParser::single)
}

fn missing_codes(codes: Vec<String>) -> Option<MissingDataCodes> {
    (!codes.is_empty()).then(|| MissingDataCodes::new(codes))
}

/// Upper bound on the rows a text can produce: its line count.
fn line_count(text: &str, ignore_blank_lines: bool) -> usize {
    preview(text, &PreviewOptions::new().ignore_blank_lines(ignore_blank_lines)).row_count()
}

// ============================================================================
// Allocator Configuration
// ============================================================================

// When memory_tracking is enabled, wrap the allocator to track usage
#[cfg(feature = "memory_tracking")]
mod tracking {
    use std::alloc::{GlobalAlloc, Layout};
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
    pub static PEAK_ALLOCATED: AtomicUsize = AtomicUsize::new(0);

    pub struct TrackingAllocator;

    #[cfg(feature = "mimalloc")]
    static UNDERLYING: mimalloc::MiMalloc = mimalloc::MiMalloc;

    #[cfg(not(feature = "mimalloc"))]
    static UNDERLYING: std::alloc::System = std::alloc::System;

    fn record_peak(current: usize) {
        let mut peak = PEAK_ALLOCATED.load(Ordering::Relaxed);
        while current > peak {
            match PEAK_ALLOCATED.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    unsafe impl GlobalAlloc for TrackingAllocator {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let ptr = UNDERLYING.alloc(layout);
            if !ptr.is_null() {
                record_peak(ALLOCATED.fetch_add(layout.size(), Ordering::Relaxed) + layout.size());
            }
            ptr
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            ALLOCATED.fetch_sub(layout.size(), Ordering::Relaxed);
            UNDERLYING.dealloc(ptr, layout)
        }

        unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
            let new_ptr = UNDERLYING.realloc(ptr, layout, new_size);
            if !new_ptr.is_null() {
                if new_size >= layout.size() {
                    let grown = new_size - layout.size();
                    record_peak(ALLOCATED.fetch_add(grown, Ordering::Relaxed) + grown);
                } else {
                    ALLOCATED.fetch_sub(layout.size() - new_size, Ordering::Relaxed);
                }
            }
            new_ptr
        }
    }
}

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: tracking::TrackingAllocator = tracking::TrackingAllocator;

// When memory_tracking is disabled, use mimalloc directly (no overhead)
#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Memory Tracking NIFs (only available when memory_tracking feature is enabled)
// ============================================================================

#[cfg(feature = "memory_tracking")]
use std::sync::atomic::Ordering;

/// Get current Rust heap allocation in bytes (requires memory_tracking feature)
#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory() -> usize {
    tracking::ALLOCATED.load(Ordering::SeqCst)
}

/// Get peak Rust heap allocation since last reset (requires memory_tracking feature)
#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    tracking::PEAK_ALLOCATED.load(Ordering::SeqCst)
}

/// Reset memory stats (requires memory_tracking feature)
#[cfg(feature = "memory_tracking")]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    let current = tracking::ALLOCATED.load(Ordering::SeqCst);
    let peak = tracking::PEAK_ALLOCATED.swap(current, Ordering::SeqCst);
    (current, peak)
}

/// Stub: returns 0 when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory() -> usize {
    0
}

/// Stub: returns 0 when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    0
}

/// Stub: returns (0, 0) when memory_tracking is disabled
#[cfg(not(feature = "memory_tracking"))]
#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    (0, 0)
}

// ============================================================================
// Preview
// ============================================================================

/// Count rows and read the header: returns {row_count, header_names}
#[rustler::nif(schedule = "DirtyCpu", name = "preview")]
fn preview_text<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    delimiter_term: Term<'a>,
    ignore_blank_lines: bool,
    skip_rows: usize,
) -> NifResult<(usize, Term<'a>)> {
    let text = decode_text(&input)?;
    let options = PreviewOptions::new()
        .with_header_delimiter(decode_delimiter(delimiter_term)?)
        .ignore_blank_lines(ignore_blank_lines)
        .skip_rows(skip_rows);
    let result = preview(text, &options);
    Ok((result.row_count(), cells_to_term(env, result.header_names())))
}

/// Preview a text and keep it for line-by-line access
#[rustler::nif(schedule = "DirtyCpu")]
fn preview_new<'a>(
    input: Binary<'a>,
    delimiter_term: Term<'a>,
    ignore_blank_lines: bool,
    skip_rows: usize,
) -> NifResult<PreviewRef> {
    let text = decode_text(&input)?.to_string();
    let options = PreviewOptions::new()
        .with_header_delimiter(decode_delimiter(delimiter_term)?)
        .ignore_blank_lines(ignore_blank_lines)
        .skip_rows(skip_rows);
    Ok(ResourceArc::new(PreviewResource::new(text, options)))
}

#[rustler::nif]
fn preview_row_count(preview: PreviewRef) -> usize {
    preview.row_count()
}

#[rustler::nif]
fn preview_header_names<'a>(env: Env<'a>, preview: PreviewRef) -> Term<'a> {
    cells_to_term(env, preview.header_names())
}

/// Get the index-th counted line, or BadArg past the last one
#[rustler::nif]
fn preview_line<'a>(env: Env<'a>, preview: PreviewRef, index: usize) -> NifResult<Term<'a>> {
    preview
        .line(index)
        .map(|line| cell_to_term(env, line))
        .ok_or(Error::BadArg)
}

// ============================================================================
// Import
// ============================================================================

fn delimited_options(
    delimiter_term: Term<'_>,
    skip_rows: usize,
    ignore_blank_lines: bool,
    missing_data_codes: Vec<String>,
) -> NifResult<DelimitedOptions> {
    Ok(DelimitedOptions::new(decode_delimiter(delimiter_term)?)
        .skip_rows(skip_rows)
        .ignore_blank_lines(ignore_blank_lines)
        .with_missing_data_codes(missing_data_codes))
}

/// Import a header-plus-rows text: returns {header_names, rows}
#[rustler::nif(schedule = "DirtyCpu", name = "import_delimited")]
fn import_delimited_text<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    delimiter_term: Term<'a>,
    skip_rows: usize,
    ignore_blank_lines: bool,
    missing_data_codes: Vec<String>,
) -> NifResult<(Term<'a>, Term<'a>)> {
    let text = decode_text(&input)?;
    let options = delimited_options(delimiter_term, skip_rows, ignore_blank_lines, missing_data_codes)?;
    let table = import_delimited(text, &options)?;
    Ok((
        cells_to_term(env, &table.header_names),
        rows_to_term(env, &table.rows),
    ))
}

/// Import a header-plus-rows text as a list of maps keyed by header name
#[rustler::nif(schedule = "DirtyCpu")]
fn import_delimited_to_maps<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    delimiter_term: Term<'a>,
    skip_rows: usize,
    ignore_blank_lines: bool,
    missing_data_codes: Vec<String>,
) -> NifResult<Term<'a>> {
    let text = decode_text(&input)?;
    let options = delimited_options(delimiter_term, skip_rows, ignore_blank_lines, missing_data_codes)?;
    let table = import_delimited(text, &options)?;
    Ok(table_to_maps(env, &table))
}

/// Read every line with one column scheme, no header handling
#[rustler::nif(schedule = "DirtyCpu")]
fn import_text<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    scheme_term: Term<'a>,
    treat_consecutive_delimiters_as_one: bool,
    ignore_blank_lines: bool,
    missing_data_codes: Vec<String>,
) -> NifResult<Term<'a>> {
    let text = decode_text(&input)?;
    let row = RowDefinition::new()
        .with_column(ColumnDefinition::new(decode_column_parser(scheme_term)?))
        .allow_column_resizing(true)
        .treat_consecutive_delimiters_as_one(treat_consecutive_delimiters_as_one);
    let mut matrix = TextMatrix::new().with_row_definition(row);
    matrix.set_missing_data_codes(missing_codes(missing_data_codes));

    let rows = matrix.read_matrix(text, line_count(text, ignore_blank_lines), 0, ignore_blank_lines);
    Ok(rows_to_term(env, &rows))
}

/// Read fixed-width columns: one column per width, one row per line
#[rustler::nif(schedule = "DirtyCpu")]
fn read_fixed_width<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    widths: Vec<usize>,
    skip_rows: usize,
    ignore_blank_lines: bool,
) -> NifResult<Term<'a>> {
    let text = decode_text(&input)?;
    if let Some(index) = widths.iter().position(|&width| width == 0) {
        return Err(ImportError::ZeroWidthColumn { index }.into());
    }
    let row = widths.iter().fold(RowDefinition::new(), |row, &width| {
        row.with_column(
            ColumnDefinition::new(ColumnParser::fixed_width(width)).with_repeat(Repeat::Exactly(1)),
        )
    });

    let mut matrix = TextMatrix::new();
    if skip_rows > 0 {
        matrix.add_row_definition(
            RowDefinition::new()
                .with_repeat(Repeat::Exactly(skip_rows))
                .with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine).skipped()),
        );
    }
    matrix.add_row_definition(row);

    let rows = matrix.read_matrix(
        text,
        line_count(text, ignore_blank_lines),
        widths.len(),
        ignore_blank_lines,
    );
    Ok(rows_to_term(env, &rows))
}

/// Read each line as one trimmed cell
#[rustler::nif(schedule = "DirtyCpu")]
fn read_lines<'a>(env: Env<'a>, input: Binary<'a>, ignore_blank_lines: bool) -> NifResult<Term<'a>> {
    let text = decode_text(&input)?;
    let matrix = TextMatrix::new().with_row_definition(
        RowDefinition::new().with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine)),
    );
    let lines = matrix.read_column(text, line_count(text, ignore_blank_lines), ignore_blank_lines);
    Ok(cells_to_term(env, &lines))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.TextMatrix.Native");
