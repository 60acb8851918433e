//! Dump engine: re-emit a parsed tree in the line vocabulary it came from.
//!
//! Leaves render as a blank line, their infos, the element header and the
//! macro triple. Containers put their infos first, then a blank line, the
//! header and a separator, and indent their body by four spaces per level.
//! Re-parsing the output yields the same tree once it is normalized.

use super::Renderer;
use crate::model::*;
use crate::parser::document::{
    APP_CONFIG_INCLUDE, COMMENT_CLOSE, COMMENT_OPEN, END_BANNER, WIZARD_BANNER,
};
use crate::parser::element::{ENABLE_END, HEADER_END};
use anyhow::Result;

pub const SEPARATOR: &str = "//==========================================================";

const INDENT: &str = "    ";

pub struct HeaderRenderer;

impl Renderer for HeaderRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::new();
        for line in doc.dump() {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }
}

impl Document {
    /// Render the whole document as lines without terminators.
    pub fn dump(&self) -> Vec<String> {
        let mut out = vec![COMMENT_OPEN.to_string()];
        out.extend(self.comment.iter().cloned());
        out.push(COMMENT_CLOSE.to_string());

        out.push(format!("#ifndef {}", self.guard));
        out.push(format!("#define {}", self.guard));
        out.push(WIZARD_BANNER.to_string());
        out.extend(APP_CONFIG_INCLUDE.iter().map(|s| s.to_string()));

        for element in &self.body {
            out.extend(element.dump());
        }

        out.push(String::new());
        out.push(END_BANNER.to_string());
        out.push(format!("#endif //{}", self.guard));
        out
    }
}

impl Element {
    pub fn dump(&self) -> Vec<String> {
        match self {
            Element::Bit(e) => leaf(Tag::Bit, &e.name, &e.description, &e.infos, &e.value),
            Element::String(e) => leaf(Tag::String, &e.name, &e.description, &e.infos, &e.value),
            Element::Option(e) => option(e),
            Element::Enable(e) => {
                let mut out = info_lines(&e.infos);
                out.push(String::new());
                out.push(header_line(Tag::Enable, &e.name, &e.description));
                out.push(SEPARATOR.to_string());
                out.extend(macro_triple(&e.name, &e.value));
                out.extend(indented(&e.body));
                out.push(ENABLE_END.to_string());
                out
            }
            Element::Header(e) => {
                let mut out = info_lines(&e.infos);
                out.push(String::new());
                out.push(header_line(Tag::Header, &e.name, &e.description));
                out.push(SEPARATOR.to_string());
                out.extend(indented(&e.body));
                out.push(HEADER_END.to_string());
                out
            }
        }
    }
}

fn leaf(tag: Tag, name: &str, description: &str, infos: &[String], value: &str) -> Vec<String> {
    let mut out = vec![String::new()];
    out.extend(info_lines(infos));
    out.push(header_line(tag, name, description));
    out.extend(macro_triple(name, value));
    out
}

fn option(e: &OptionSetting) -> Vec<String> {
    let mut out = vec![String::new()];
    out.extend(info_lines(&e.infos));
    out.push(header_line(Tag::Option, &e.name, &e.description));
    out.extend(info_lines(&e.option_infos));
    // Without options both slots form a single run that parses back as
    // option_infos; see OptionSetting::normalize.
    out.extend(
        e.options
            .iter()
            .map(|o| format!("// <{}=> {}", o.code, o.label)),
    );
    out.extend(info_lines(&e.macro_infos));
    out.extend(macro_triple(&e.name, &e.value));
    out
}

fn header_line(tag: Tag, name: &str, description: &str) -> String {
    if description.is_empty() {
        format!("// <{}> {}", tag.as_str(), name)
    } else {
        format!("// <{}> {} {}", tag.as_str(), name, description)
    }
}

fn info_lines(infos: &[String]) -> Vec<String> {
    infos.iter().map(|info| format!("// <i> {}", info)).collect()
}

fn macro_triple(name: &str, value: &str) -> [String; 3] {
    [
        format!("#ifndef {}", name),
        format!("#define {} {}", name, value),
        "#endif".to_string(),
    ]
}

fn indented(body: &[Element]) -> impl Iterator<Item = String> + '_ {
    body.iter()
        .flat_map(Element::dump)
        .map(|line| format!("{}{}", INDENT, line))
}
