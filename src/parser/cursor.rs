//! Line-cursor primitives.
//!
//! Every primitive takes the immutable line sequence plus a start index and
//! returns the advanced index with whatever it extracted. Nothing here mutates
//! the input. Lines are matched after trimming surrounding whitespace, so an
//! indented container body reads the same as a top-level one.

use crate::error::{ParseError, Result};
use crate::model::{NamedOption, Tag};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_INFO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^// <i>\s+(.+)$").unwrap());

// Name is the first token, description everything after one separating blank.
static RE_ELEMENT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^// <([a-z])> (\S+)(?:\s(.*))?$").unwrap());

static RE_NAMED_OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^// <(\S+)=>\s+(.+)$").unwrap());

static RE_IFNDEF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#ifndef\s+(\S+)$").unwrap());

static RE_DEFINE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#define\s+(\S+)\s+(.+)$").unwrap());

static RE_ENDIF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#endif$").unwrap());

/// Marker that starts a separator line (`//=====...`).
pub const SEPARATOR_PREFIX: &str = "//=";

// -- Primitives ---------------------------------------------------------------

fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with(SEPARATOR_PREFIX)
}

/// Advance past blank and separator lines. Returns `lines.len()` at end of input.
pub fn skip_blanks(lines: &[&str], mut i: usize) -> usize {
    while i < lines.len() && is_skippable(lines[i]) {
        i += 1;
    }
    i
}

/// Collect consecutive `// <i>` lines, tolerating blanks between them.
///
/// Stops without consuming at the first line that is neither blank nor an
/// info line. Never fails.
pub fn collect_infos(lines: &[&str], mut i: usize) -> (usize, Vec<String>) {
    let mut infos = Vec::new();
    loop {
        i = skip_blanks(lines, i);
        let Some(caps) = lines.get(i).and_then(|line| RE_INFO.captures(line.trim())) else {
            return (i, infos);
        };
        infos.push(caps[1].to_string());
        i += 1;
    }
}

/// Skip blanks, then require the current line to match `re`.
///
/// `expected` names the construct for the error message.
pub fn match_line<'a>(
    lines: &[&'a str],
    i: usize,
    re: &Regex,
    expected: &str,
) -> Result<(usize, Captures<'a>)> {
    let i = skip_blanks(lines, i);
    let Some(&line) = lines.get(i) else {
        return Err(ParseError::new(
            i,
            format!("unexpected end of input, expected {}", expected),
        ));
    };
    match re.captures(line.trim()) {
        Some(caps) => Ok((i + 1, caps)),
        None => Err(ParseError::new(i, format!("expected {}", expected))),
    }
}

/// Skip blanks, then require the current line to equal `literal` once trimmed.
pub fn match_literal(lines: &[&str], i: usize, literal: &str) -> Result<usize> {
    let i = skip_blanks(lines, i);
    match lines.get(i) {
        Some(line) if line.trim() == literal => Ok(i + 1),
        Some(_) => Err(ParseError::new(i, format!("expected `{}`", literal))),
        None => Err(ParseError::new(
            i,
            format!("unexpected end of input, expected `{}`", literal),
        )),
    }
}

/// Skip blanks, then require the current line to start with `prefix` once
/// trimmed. Anything after the prefix is ignored.
pub fn match_prefix(lines: &[&str], i: usize, prefix: &str) -> Result<usize> {
    let i = skip_blanks(lines, i);
    match lines.get(i) {
        Some(line) if line.trim().starts_with(prefix) => Ok(i + 1),
        Some(_) => Err(ParseError::new(i, format!("expected `{}`", prefix))),
        None => Err(ParseError::new(
            i,
            format!("unexpected end of input, expected `{}`", prefix),
        )),
    }
}

/// Match `#ifndef NAME` / `#define NAME VALUE` / `#endif`, absorbing any info
/// lines in front of it. Both occurrences of `NAME` must equal `name`.
///
/// Returns the macro value and the absorbed infos.
pub fn match_macro_guard(lines: &[&str], i: usize, name: &str) -> Result<(usize, String, Vec<String>)> {
    let (i, infos) = collect_infos(lines, i);

    let (next, caps) = match_line(lines, i, &RE_IFNDEF, "`#ifndef` of a macro triple")?;
    if &caps[1] != name {
        return Err(ParseError::new(
            next - 1,
            format!("macro check `{}` does not match element `{}`", &caps[1], name),
        ));
    }

    let (next, caps) = match_line(lines, next, &RE_DEFINE_VALUE, "`#define NAME VALUE`")?;
    if &caps[1] != name {
        return Err(ParseError::new(
            next - 1,
            format!("macro define `{}` does not match element `{}`", &caps[1], name),
        ));
    }
    let value = caps[2].trim().to_string();

    let (next, _) = match_line(lines, next, &RE_ENDIF, "`#endif`")?;
    Ok((next, value, infos))
}

/// An element header line together with the infos written above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHeader {
    pub name: String,
    pub description: String,
    pub infos: Vec<String>,
}

/// Absorb leading infos, then require `// <tag> NAME [DESCRIPTION]`.
pub fn match_element_header(lines: &[&str], i: usize, tag: Tag) -> Result<(usize, ElementHeader)> {
    let (i, infos) = collect_infos(lines, i);

    let caps = lines
        .get(i)
        .and_then(|line| RE_ELEMENT_HEADER.captures(line.trim()))
        .filter(|caps| Tag::from_code(&caps[1]) == Some(tag))
        .ok_or_else(|| ParseError::new(i, format!("not a `<{}>` element header", tag.as_str())))?;

    let header = ElementHeader {
        name: caps[2].to_string(),
        description: caps.get(3).map_or(String::new(), |m| m.as_str().to_string()),
        infos,
    };
    Ok((i + 1, header))
}

/// Absorb leading infos, then collect contiguous `// <CODE=> LABEL` lines.
///
/// Returns an empty option list if none follow. Never fails.
pub fn match_option_list(lines: &[&str], i: usize) -> (usize, Vec<NamedOption>, Vec<String>) {
    let (mut i, infos) = collect_infos(lines, i);

    let mut options = Vec::new();
    while let Some(caps) = lines.get(i).and_then(|line| RE_NAMED_OPTION.captures(line.trim())) {
        options.push(NamedOption::new(&caps[1], &caps[2]));
        i += 1;
    }
    (i, options, infos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_blanks_stops_at_content() {
        assert_eq!(skip_blanks(&["", "  ", "foo"], 0), 2);
    }

    #[test]
    fn skip_blanks_noop_on_content() {
        assert_eq!(skip_blanks(&["foo"], 0), 0);
    }

    #[test]
    fn skip_blanks_runs_to_end() {
        assert_eq!(skip_blanks(&[""], 0), 1);
        assert_eq!(skip_blanks(&[], 0), 0);
    }

    #[test]
    fn skip_blanks_skips_separators() {
        let lines = ["//==========================================================", "", "x"];
        assert_eq!(skip_blanks(&lines, 0), 2);
    }

    #[test]
    fn collect_infos_across_blanks() {
        let lines = [
            "",
            "// <i> some information",
            "// <i> some more",
            "",
            "// <i> even more",
            "",
            "// <s> name description",
        ];
        let (i, infos) = collect_infos(&lines, 0);
        assert_eq!(i, 6);
        assert_eq!(infos, vec!["some information", "some more", "even more"]);
    }

    #[test]
    fn collect_infos_none() {
        assert_eq!(collect_infos(&["// <s> name description"], 0), (0, vec![]));
    }

    #[test]
    fn macro_guard_absorbs_infos() {
        let lines = ["", "// <i> some info", "#ifndef FOO", "#define FOO 1", "#endif", ""];
        let (i, value, infos) = match_macro_guard(&lines, 0, "FOO").unwrap();
        assert_eq!(i, 5);
        assert_eq!(value, "1");
        assert_eq!(infos, vec!["some info"]);
    }

    #[test]
    fn macro_guard_rejects_ifndef_mismatch() {
        let lines = ["#ifndef BAR", "#define FOO 1", "#endif"];
        let err = match_macro_guard(&lines, 0, "FOO").unwrap_err();
        assert_eq!(err.index, 0);
        assert!(err.expected.contains("does not match"));
    }

    #[test]
    fn macro_guard_rejects_define_mismatch() {
        let lines = ["#ifndef FOO", "#define BAR 1", "#endif"];
        let err = match_macro_guard(&lines, 0, "FOO").unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn macro_guard_requires_value() {
        let lines = ["#ifndef FOO", "#define FOO", "#endif"];
        assert!(match_macro_guard(&lines, 0, "FOO").is_err());
    }

    #[test]
    fn macro_guard_requires_endif() {
        let lines = ["#ifndef FOO", "#define FOO 1"];
        let err = match_macro_guard(&lines, 0, "FOO").unwrap_err();
        assert_eq!(err.index, 2);
        assert!(err.expected.contains("end of input"));
    }

    #[test]
    fn element_header_rejects_other_tag() {
        let err = match_element_header(&["// <x> the_name the description"], 0, Tag::Bit).unwrap_err();
        assert_eq!(err.index, 0);
        assert_eq!(err.expected, "not a `<q>` element header");
    }

    #[test]
    fn element_header_minimal() {
        let (i, h) = match_element_header(&["// <q> the_name the description"], 0, Tag::Bit).unwrap();
        assert_eq!(i, 1);
        assert_eq!(h.name, "the_name");
        assert_eq!(h.description, "the description");
        assert!(h.infos.is_empty());
    }

    #[test]
    fn element_header_fully_loaded() {
        let lines = ["", "// <i> Some info", "", "// <h> the_name the description", ""];
        let (i, h) = match_element_header(&lines, 0, Tag::Header).unwrap();
        assert_eq!(i, 4);
        assert_eq!(h.infos, vec!["Some info"]);
    }

    #[test]
    fn element_header_without_description() {
        let (_, h) = match_element_header(&["// <s> the_name"], 0, Tag::String).unwrap();
        assert_eq!(h.description, "");
    }

    #[test]
    fn element_header_keeps_extra_description_spacing() {
        let (_, h) = match_element_header(&["// <o> NAME  - label"], 0, Tag::Option).unwrap();
        assert_eq!(h.description, " - label");
    }

    #[test]
    fn element_header_fails_without_name() {
        let err = match_element_header(&["// <i> Some info", "// <q>"], 0, Tag::Bit).unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn element_header_matches_indented_lines() {
        let (i, h) = match_element_header(&["    // <e> EN enable"], 0, Tag::Enable).unwrap();
        assert_eq!(i, 1);
        assert_eq!(h.name, "EN");
    }

    #[test]
    fn option_list_collects_until_mismatch() {
        let lines = [
            "",
            "// <i> some info",
            "// <0=> option zero",
            "// <1=> optionOne",
            "// <2=> option two",
            "",
        ];
        let (i, options, infos) = match_option_list(&lines, 0);
        assert_eq!(i, 5);
        assert_eq!(
            options,
            vec![
                NamedOption::new("0", "option zero"),
                NamedOption::new("1", "optionOne"),
                NamedOption::new("2", "option two"),
            ]
        );
        assert_eq!(infos, vec!["some info"]);
    }

    #[test]
    fn option_list_may_be_empty() {
        let (i, options, infos) = match_option_list(&["#ifndef FOO"], 0);
        assert_eq!(i, 0);
        assert!(options.is_empty());
        assert!(infos.is_empty());
    }

    #[test]
    fn match_prefix_ignores_tail() {
        let lines = ["// <<< banner >>>\\n"];
        assert_eq!(match_prefix(&lines, 0, "// <<< banner >>>").unwrap(), 1);
        assert!(match_prefix(&lines, 0, "// <<< other").is_err());
    }

    #[test]
    fn match_literal_reports_position() {
        let err = match_literal(&["", "// </h>"], 0, "// </e>").unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(match_literal(&["", "// </e>"], 0, "// </e>").unwrap(), 2);
    }
}
