//! Typed tree for an annotated configuration header.
//!
//! Leaves (`<q>`, `<s>`, `<o>`) are each backed by one macro triple;
//! containers (`<e>`, `<h>`) own an ordered body of further elements.

use serde::Serialize;

/// Annotation tag that introduces an element header line (`// <tag> NAME ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Header,
    Enable,
    String,
    Bit,
    Option,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Header => "h",
            Tag::Enable => "e",
            Tag::String => "s",
            Tag::Bit => "q",
            Tag::Option => "o",
        }
    }

    pub fn from_code(tag: &str) -> Option<Tag> {
        match tag {
            "h" => Some(Tag::Header),
            "e" => Some(Tag::Enable),
            "s" => Some(Tag::String),
            "q" => Some(Tag::Bit),
            "o" => Some(Tag::Option),
            _ => None,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, Tag::Header | Tag::Enable)
    }
}

/// Alternatives tried, in order, at every body position. Containers come
/// before leaves so a nested `<e>` is never claimed by a leaf rule.
pub const BODY_ORDER: [Tag; 5] = [Tag::Header, Tag::Enable, Tag::String, Tag::Bit, Tag::Option];

/// One `// <code=> label` line of an `<o>` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedOption {
    pub code: String,
    pub label: String,
}

impl NamedOption {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// `<q>` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitSetting {
    pub name: String,
    pub description: String,
    pub value: String,
    pub infos: Vec<String>,
}

/// `<s>` setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringSetting {
    pub name: String,
    pub description: String,
    pub value: String,
    pub infos: Vec<String>,
}

/// `<o>` setting.
///
/// Keeps three info slots apart: before the header, between the header and
/// the option list, and between the option list and the macro triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSetting {
    pub name: String,
    pub description: String,
    pub value: String,
    pub options: Vec<NamedOption>,
    pub infos: Vec<String>,
    pub option_infos: Vec<String>,
    pub macro_infos: Vec<String>,
}

impl OptionSetting {
    /// With no options, `option_infos` and `macro_infos` are one run of
    /// `// <i>` lines in the header text and read back as `option_infos`.
    /// Fold them together so the tree matches what a re-parse yields.
    pub fn normalize(&mut self) {
        if self.options.is_empty() {
            let trailing = std::mem::take(&mut self.macro_infos);
            self.option_infos.extend(trailing);
        }
    }
}

/// `<e>` group: a setting in its own right that also owns a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnableGroup {
    pub name: String,
    pub description: String,
    pub value: String,
    pub infos: Vec<String>,
    pub body: Vec<Element>,
}

/// `<h>` group: a pure container with no backing macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderGroup {
    pub name: String,
    pub description: String,
    pub infos: Vec<String>,
    pub body: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Bit(BitSetting),
    String(StringSetting),
    Option(OptionSetting),
    Enable(EnableGroup),
    Header(HeaderGroup),
}

impl Element {
    pub fn tag(&self) -> Tag {
        match self {
            Element::Bit(_) => Tag::Bit,
            Element::String(_) => Tag::String,
            Element::Option(_) => Tag::Option,
            Element::Enable(_) => Tag::Enable,
            Element::Header(_) => Tag::Header,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Bit(e) => &e.name,
            Element::String(e) => &e.name,
            Element::Option(e) => &e.name,
            Element::Enable(e) => &e.name,
            Element::Header(e) => &e.name,
        }
    }

    /// Macro value backing this element; `None` for `<h>` groups.
    pub fn value(&self) -> Option<&str> {
        match self {
            Element::Bit(e) => Some(&e.value),
            Element::String(e) => Some(&e.value),
            Element::Option(e) => Some(&e.value),
            Element::Enable(e) => Some(&e.value),
            Element::Header(_) => None,
        }
    }

    /// Nested elements; empty for leaves.
    pub fn body(&self) -> &[Element] {
        match self {
            Element::Enable(e) => &e.body,
            Element::Header(e) => &e.body,
            _ => &[],
        }
    }

    /// Name/value pairs of this element and everything below it, depth-first.
    pub fn key_values(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_key_values(&mut out);
        out
    }

    fn collect_key_values<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        if let Some(value) = self.value() {
            out.push((self.name(), value));
        }
        for child in self.body() {
            child.collect_key_values(out);
        }
    }

    /// Apply [`OptionSetting::normalize`] to every `<o>` at or below this element.
    pub fn normalize(&mut self) {
        match self {
            Element::Option(e) => e.normalize(),
            Element::Enable(EnableGroup { body, .. }) | Element::Header(HeaderGroup { body, .. }) => {
                body.iter_mut().for_each(Element::normalize)
            }
            Element::Bit(_) | Element::String(_) => {}
        }
    }
}

/// A whole configuration header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Lines between `/**` and `*/`, trailing whitespace removed.
    pub comment: Vec<String>,
    /// Include-guard macro name.
    pub guard: String,
    pub body: Vec<Element>,
}

impl Document {
    pub fn normalize(&mut self) {
        self.body.iter_mut().for_each(Element::normalize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(name: &str, value: &str) -> Element {
        Element::Bit(BitSetting {
            name: name.into(),
            description: String::new(),
            value: value.into(),
            infos: vec![],
        })
    }

    #[test]
    fn tag_round_trips_through_str() {
        for tag in BODY_ORDER {
            assert_eq!(Tag::from_code(tag.as_str()), Some(tag));
        }
        assert_eq!(Tag::from_code("i"), None);
    }

    #[test]
    fn key_values_include_enable_value_but_not_header() {
        let tree = Element::Header(HeaderGroup {
            name: "Group".into(),
            description: String::new(),
            infos: vec![],
            body: vec![Element::Enable(EnableGroup {
                name: "EN".into(),
                description: String::new(),
                value: "1".into(),
                infos: vec![],
                body: vec![bit("A", "0")],
            })],
        });
        assert_eq!(tree.key_values(), vec![("EN", "1"), ("A", "0")]);
    }

    #[test]
    fn normalize_folds_infos_only_without_options() {
        let mut bare = OptionSetting {
            name: "LEVEL".into(),
            description: String::new(),
            value: "3".into(),
            options: vec![],
            infos: vec!["head".into()],
            option_infos: vec!["a".into()],
            macro_infos: vec!["b".into()],
        };
        let mut listed = bare.clone();
        listed.options.push(NamedOption::new("3", "Info"));

        bare.normalize();
        assert_eq!(bare.infos, vec!["head"]);
        assert_eq!(bare.option_infos, vec!["a", "b"]);
        assert!(bare.macro_infos.is_empty());

        let before = listed.clone();
        listed.normalize();
        assert_eq!(listed, before);
    }
}
