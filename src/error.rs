//! Parse failure type shared by every grammar rule.

use thiserror::Error;

/// Result type alias using [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

/// A grammar rule could not match at a given line.
///
/// `index` is 0-based into the line sequence handed to the parser; the
/// `Display` form reports it 1-based so it can be located in an editor.
/// A `fatal` failure aborts the parse even where alternatives are being tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {}: {expected}", .index + 1)]
pub struct ParseError {
    pub index: usize,
    pub expected: String,
    pub fatal: bool,
}

impl ParseError {
    pub fn new(index: usize, expected: impl Into<String>) -> Self {
        Self {
            index,
            expected: expected.into(),
            fatal: false,
        }
    }

    pub fn fatal(index: usize, expected: impl Into<String>) -> Self {
        Self {
            fatal: true,
            ..Self::new(index, expected)
        }
    }
}
