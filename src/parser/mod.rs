//! Parser module — document grammar over annotated configuration headers.

pub mod cursor;
pub mod document;
pub mod element;

use crate::error::Result;
use crate::model::Document;

/// How body dispatch treats a failure after an element header has matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// The failed element is treated as absent and the next alternative is
    /// tried. A malformed nested group therefore ends its parent's body early
    /// and the error surfaces at the parent's closing marker.
    #[default]
    Lenient,
    /// The failure is returned as-is, from the deepest rule that hit it.
    Strict,
}

/// Default cap on container nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs supplied by the caller of [`parse_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub dispatch: Dispatch,
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dispatch: Dispatch::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parse a whole document with default options.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Document> {
    parse_with(lines, &ParseOptions::default())
}

/// Parse a whole document.
///
/// `lines` must already have their line terminators stripped.
pub fn parse_with<S: AsRef<str>>(lines: &[S], options: &ParseOptions) -> Result<Document> {
    let lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
    document::parse(&lines, options)
}

/// Split `text` into lines (dropping `\n` / `\r\n`) and parse it.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Document> {
    let lines: Vec<&str> = text.lines().collect();
    document::parse(&lines, options)
}
