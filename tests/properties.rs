// Randomized checks for cell hygiene and the row state machine
//
// These complement the scenario tables in conformance.rs: instead of fixed
// inputs they assert properties that must hold for any generated text.

use proptest::prelude::*;
use textmatrix::{
    collapse_quotes, preview, trim_cell, ColumnDefinition, ColumnParser, Cursor, PreviewOptions,
    RowDefinition, TextMatrix,
};

fn delimited_matrix(delimiter: char) -> TextMatrix {
    TextMatrix::new().with_row_definition(
        RowDefinition::new()
            .with_column(ColumnDefinition::new(ColumnParser::single(delimiter)))
            .allow_column_resizing(true),
    )
}

fn grid_text(rows: &[Vec<String>], newline: &str) -> String {
    rows.iter()
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join(newline)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Trimming an unquoted cell twice changes nothing the second time.
    /// Quoted cells lose one quote layer per pass, so quotes stay out of the input.
    #[test]
    fn prop_trim_is_idempotent(cell in "[a-z ,;\t]{0,20}") {
        let once = trim_cell(&cell);
        prop_assert_eq!(trim_cell(once), once);
        prop_assert_eq!(once, cell.trim());
    }

    /// A quoted cell with content loses its quotes and padding.
    #[test]
    fn prop_trim_strips_quotes(inner in "[a-z ]{0,8}[a-z][a-z ]{0,8}") {
        let quoted = format!("\"{inner}\"");
        let trimmed = trim_cell(&quoted);
        prop_assert_eq!(trimmed, inner.trim());
        prop_assert_eq!(trim_cell(trimmed), trimmed);
    }

    /// Doubling every quote and collapsing gives the original back.
    #[test]
    fn prop_escaped_quotes_collapse(cell in "[a-z\" ]{0,30}") {
        let escaped = cell.replace('"', "\"\"");
        let collapsed = collapse_quotes(&escaped);
        prop_assert_eq!(collapsed.as_ref(), cell.as_str());
    }

    /// A delimiter inside quotes never ends the field, whichever delimiter it is.
    #[test]
    fn prop_quoted_delimiter_is_skipped(
        a in "[a-z]{1,5}",
        b in "[a-z]{1,5}",
        rest in "[a-z]{0,5}",
        delimiter in prop::sample::select(vec![',', ';', '|', '\t']),
    ) {
        let text = format!("\"{a}{delimiter}{b}\"{delimiter}{rest}");
        let end = ColumnParser::single(delimiter)
            .advance(Cursor::new(&text))
            .map(|cursor| cursor.position());
        prop_assert_eq!(end, Some(a.len() + b.len() + delimiter.len_utf8() + 2));
    }

    /// The same grid reads identically with LF and CRLF line endings.
    #[test]
    fn prop_crlf_reads_like_lf(
        rows in prop::collection::vec(prop::collection::vec("[a-z]{1,4}", 1..5), 1..8),
    ) {
        let matrix = delimited_matrix(',');
        let lf = grid_text(&rows, "\n");
        let crlf = grid_text(&rows, "\r\n");
        let from_lf = matrix.read_matrix(&lf, rows.len(), 0, false);
        let from_crlf = matrix.read_matrix(&crlf, rows.len(), 0, false);
        prop_assert_eq!(&from_lf, &rows);
        prop_assert_eq!(&from_crlf, &rows);
    }

    /// Reading always terminates and never yields more rows than lines.
    #[test]
    fn prop_never_reads_past_line_count(text in "[a-z,\n\r\" ]{0,60}") {
        let lines = preview(&text, &PreviewOptions::new()).row_count();
        let rows = delimited_matrix(',').read_matrix(&text, text.len() + 1, 0, false);
        prop_assert!(rows.len() <= lines, "{} rows from {} lines", rows.len(), lines);
    }

    /// Single-column mode reads whole lines, trimmed.
    #[test]
    fn prop_line_mode_keeps_each_line(
        lines in prop::collection::vec("[a-z][a-z ,]{0,10}[a-z]", 1..10),
    ) {
        let text = lines.join("\n");
        let matrix = TextMatrix::new().with_row_definition(
            RowDefinition::new().with_column(ColumnDefinition::new(ColumnParser::ToEndOfLine)),
        );
        let column = matrix.read_column(&text, lines.len(), false);
        prop_assert_eq!(column, lines);
    }
}
