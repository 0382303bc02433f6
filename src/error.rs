// Configuration errors
//
// Parsing itself never fails: bad input degrades to a shorter read. These
// errors only come from validating caller-supplied options.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The delimiter cannot separate columns (a quote or a line ending),
    /// or a delimiter term was not exactly one character.
    #[error("invalid delimiter {0:?}")]
    InvalidDelimiter(String),

    #[error("multiple-delimiter column needs at least one delimiter")]
    EmptyDelimiterSet,

    #[error("fixed-width column {index} has zero width")]
    ZeroWidthColumn { index: usize },

    #[error("input is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

impl ImportError {
    pub(crate) fn invalid_delimiter(delimiter: impl Into<String>) -> Self {
        ImportError::InvalidDelimiter(delimiter.into())
    }
}

impl From<std::str::Utf8Error> for ImportError {
    fn from(err: std::str::Utf8Error) -> Self {
        ImportError::InvalidUtf8 {
            offset: err.valid_up_to(),
        }
    }
}

/// Reject characters that can never act as a column delimiter.
pub fn check_delimiter(delimiter: char) -> Result<char, ImportError> {
    match delimiter {
        '"' | '\r' | '\n' => Err(ImportError::invalid_delimiter(delimiter)),
        _ => Ok(delimiter),
    }
}
