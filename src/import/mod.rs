// Import engine: column parsers, row definitions, and the drivers built on them

pub mod column;
pub mod delimited;
pub mod matrix;
pub mod preview;
pub mod recode;
pub mod row;

pub use column::{ColumnDefinition, ColumnParser, Repeat};
pub use delimited::{import_delimited, ColumnKind, DelimitedOptions, DelimitedTable};
pub use matrix::TextMatrix;
pub use preview::{preview, Preview, PreviewOptions};
pub use recode::MissingDataCodes;
pub use row::{Destination, EmptyFields, RowDefinition, RowRead};
