//! Whole-file grammar.
//!
//! Five phases in fixed order: header block comment, include-guard prefix,
//! body, footer, trailing blanks. None may be skipped.

use super::cursor::{match_line, match_literal, match_prefix, skip_blanks};
use super::element::Grammar;
use super::ParseOptions;
use crate::error::{ParseError, Result};
use crate::model::Document;
use regex::Regex;
use std::sync::LazyLock;

static RE_GUARD_IFNDEF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#ifndef\s+(\S+)$").unwrap());

static RE_GUARD_DEFINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#define\s+(\S+)$").unwrap());

static RE_GUARD_ENDIF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#endif\s*//\s*(\S+)$").unwrap());

pub const COMMENT_OPEN: &str = "/**";
pub const COMMENT_CLOSE: &str = "*/";
pub const WIZARD_BANNER: &str = "// <<< Use Configuration Wizard in Context Menu >>>";
/// Lines that pull in the application's overrides, right after the banner.
pub const APP_CONFIG_INCLUDE: [&str; 3] = ["#ifdef USE_APP_CONFIG", "#include \"app_config.h\"", "#endif"];
pub const END_BANNER: &str = "// <<< end of configuration section >>>";

pub fn parse(lines: &[&str], options: &ParseOptions) -> Result<Document> {
    let (i, comment) = parse_comment(lines, 0)?;
    let (i, guard) = parse_prefix(lines, i)?;
    let (i, body) = Grammar::new(lines, options).body(i, 0)?;
    let i = parse_footer(lines, i, &guard)?;

    let i = skip_blanks(lines, i);
    if i < lines.len() {
        return Err(ParseError::new(i, "unexpected content after end of document"));
    }

    Ok(Document { comment, guard, body })
}

/// Leading `/** ... */` block; its inner lines are kept with trailing
/// whitespace removed.
fn parse_comment(lines: &[&str], i: usize) -> Result<(usize, Vec<String>)> {
    let i = (i..lines.len())
        .find(|&j| !lines[j].trim().is_empty())
        .unwrap_or(lines.len());
    if lines.get(i).map(|line| line.trim()) != Some(COMMENT_OPEN) {
        return Err(ParseError::new(i, "expected beginning of block comment `/**`"));
    }

    let close = (i + 1..lines.len())
        .find(|&j| lines[j].trim() == COMMENT_CLOSE)
        .ok_or_else(|| ParseError::new(i, "unterminated block comment"))?;

    let comment = lines[i + 1..close]
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect();
    Ok((close + 1, comment))
}

/// Include guard, wizard banner and the `USE_APP_CONFIG` include block.
fn parse_prefix(lines: &[&str], i: usize) -> Result<(usize, String)> {
    let (i, caps) = match_line(lines, i, &RE_GUARD_IFNDEF, "`#ifndef` include guard")?;
    let guard = caps[1].to_string();

    let (i, caps) = match_line(lines, i, &RE_GUARD_DEFINE, "`#define` include guard")?;
    if caps[1] != guard {
        return Err(ParseError::new(
            i - 1,
            format!("guard macro mismatch: {} / {}", guard, &caps[1]),
        ));
    }

    // Some SDK releases follow the banner with a stray literal `\n`.
    let mut i = match_prefix(lines, i, WIZARD_BANNER)?;
    for literal in APP_CONFIG_INCLUDE {
        i = match_literal(lines, i, literal)?;
    }
    Ok((i, guard))
}

/// End banner followed by `#endif //GUARD`.
fn parse_footer(lines: &[&str], i: usize, guard: &str) -> Result<usize> {
    let i = match_prefix(lines, i, END_BANNER)?;
    let (i, caps) = match_line(lines, i, &RE_GUARD_ENDIF, "`#endif //GUARD` closing the include guard")?;
    if &caps[1] != guard {
        return Err(ParseError::new(
            i - 1,
            format!("closing guard `{}` does not match `{}`", &caps[1], guard),
        ));
    }
    Ok(i)
}
