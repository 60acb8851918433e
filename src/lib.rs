//! sdkconfig — parse, re-emit and compare annotated SDK configuration headers.
//!
//! The headers are C preprocessor files whose `// <h>`, `// <e>`, `// <q>`,
//! `// <s>`, `// <o>`, `// <i>` and `// <N=>` comments describe a tree of
//! settings, each backed by an `#ifndef/#define/#endif` triple.
//!
//! - [`parse`] / [`parse_with`] turn lines into a [`Document`]
//! - [`Document::dump`] turns it back into lines
//! - [`Document::flatten`] reduces it to a name → value mapping

pub mod error;
pub mod model;
pub mod parser;
pub mod query;
pub mod render;

pub use error::{ParseError, Result};
pub use model::{Document, Element};
pub use parser::{parse, parse_str, parse_with, Dispatch, ParseOptions};
pub use query::Flattened;
