// Missing-data recoding using Rayon
//
// Runs after parsing. Each row is independent, so rows are cleared in
// parallel with no coordination beyond rayon's final join.

use rayon::prelude::*;

/// Sentinel strings (e.g. "NA", "NULL") that become empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingDataCodes {
    codes: Vec<String>,
}

impl MissingDataCodes {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MissingDataCodes {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Exact, case-sensitive match.
    #[inline]
    pub fn matches(&self, cell: &str) -> bool {
        self.codes.iter().any(|code| code == cell)
    }

    #[inline]
    fn clear_if_missing(&self, cell: &mut String) {
        if self.matches(cell) {
            cell.clear();
        }
    }

    /// Clear every matching cell of a matrix, one row per task.
    pub fn recode_rows(&self, rows: &mut [Vec<String>]) {
        if self.is_empty() {
            return;
        }
        rows.par_iter_mut().for_each(|row| {
            for cell in row.iter_mut() {
                self.clear_if_missing(cell);
            }
        });
    }

    /// Clear every matching cell of a single-column result.
    pub fn recode_cells(&self, cells: &mut [String]) {
        if self.is_empty() {
            return;
        }
        cells
            .par_iter_mut()
            .for_each(|cell| self.clear_if_missing(cell));
    }
}
