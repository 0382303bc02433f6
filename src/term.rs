// Term building for import results
//
// Lists are built back to front and prepended, which is the cheap direction
// for BEAM cons lists.

use rustler::{Env, NewBinary, Term};

use crate::import::DelimitedTable;

/// A cell as a fresh binary.
pub fn cell_to_term<'a>(env: Env<'a>, cell: &str) -> Term<'a> {
    let mut binary = NewBinary::new(env, cell.len());
    binary.as_mut_slice().copy_from_slice(cell.as_bytes());
    binary.into()
}

/// One row as a list of binaries.
pub fn cells_to_term<'a>(env: Env<'a>, cells: &[String]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for cell in cells.iter().rev() {
        list = list.list_prepend(cell_to_term(env, cell));
    }
    list
}

/// A matrix as a list of lists of binaries.
pub fn rows_to_term<'a>(env: Env<'a>, rows: &[Vec<String>]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for row in rows.iter().rev() {
        list = list.list_prepend(cells_to_term(env, row));
    }
    list
}

/// One data row as a map keyed by the header terms. A short row only gets
/// the keys it has cells for; cells past the header are dropped.
pub fn row_to_map<'a>(env: Env<'a>, keys: &[Term<'a>], row: &[String]) -> Term<'a> {
    let count = keys.len().min(row.len());
    let values: Vec<Term<'a>> = row[..count].iter().map(|cell| cell_to_term(env, cell)).collect();
    match Term::map_from_term_arrays(env, &keys[..count], &values) {
        Ok(map) => map,
        // duplicate header names: later columns win
        Err(_) => keys[..count]
            .iter()
            .zip(values)
            .fold(Term::map_new(env), |map, (key, value)| {
                map.map_put(*key, value).unwrap_or(map)
            }),
    }
}

/// A table as a list of maps, reusing one binary per header name as the key.
pub fn table_to_maps<'a>(env: Env<'a>, table: &DelimitedTable) -> Term<'a> {
    let keys: Vec<Term<'a>> = table
        .header_names
        .iter()
        .map(|name| cell_to_term(env, name))
        .collect();
    let mut list = Term::list_new_empty(env);
    for row in table.rows.iter().rev() {
        list = list.list_prepend(row_to_map(env, &keys, row));
    }
    list
}
