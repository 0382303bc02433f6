// Cell hygiene: trimming quotes/whitespace and unescaping doubled quotes

use std::borrow::Cow;

/// Trim one leading quote, one trailing quote, and the whitespace inside them.
///
/// The result is a sub-slice of `span`, so nothing is copied. A span that is
/// blank after quote stripping yields the empty slice at the *end* of `span`.
///
/// The trailing quote is only removed when it is not also the first
/// non-space character left after the leading quote was removed, so `""`
/// trims to `"`.
#[inline]
pub fn trim_cell(span: &str) -> &str {
    if span.is_empty() {
        return span;
    }
    let unquoted = span.strip_prefix('"').unwrap_or(span);
    let body = unquoted.trim_start();
    if body.is_empty() {
        return &span[span.len()..];
    }
    let body = match body.strip_suffix('"') {
        Some(inner) if !inner.is_empty() => inner,
        _ => body,
    };
    body.trim_end()
}

/// Replace each `""` with `"`, scanning left to right without overlap.
/// Returns Cow::Borrowed when nothing needed unescaping.
#[inline]
pub fn collapse_quotes(cell: &str) -> Cow<'_, str> {
    if !cell.contains("\"\"") {
        return Cow::Borrowed(cell);
    }
    let mut result = String::with_capacity(cell.len());
    let mut rest = cell;
    while let Some(idx) = rest.find("\"\"") {
        result.push_str(&rest[..idx + 1]);
        rest = &rest[idx + 2..];
    }
    result.push_str(rest);
    Cow::Owned(result)
}

/// In-place form of [`collapse_quotes`] for owned cells.
pub fn collapse_quotes_in_place(cell: &mut String) {
    let collapsed = match collapse_quotes(cell) {
        Cow::Owned(collapsed) => collapsed,
        Cow::Borrowed(_) => return,
    };
    *cell = collapsed;
}

/// Overwrite `slot` with the unescaped form of `cell`, reusing its allocation.
#[inline]
pub fn assign_cell(slot: &mut String, cell: &str) {
    slot.clear();
    slot.push_str(&collapse_quotes(cell));
}
