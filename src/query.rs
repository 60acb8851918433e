//! Flattened name → value view of a parsed tree.
//!
//! Used by the comparison tooling. Macro names are unique in a well-formed
//! header; duplicates are kept and reported rather than silently dropped.

use crate::model::{Document, Element};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Name/value pairs in depth-first document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flattened {
    entries: Vec<(String, String)>,
}

/// Flatten a body. `<e>` groups contribute their own value before their
/// children; `<h>` groups contribute only their descendants.
pub fn flatten(body: &[Element]) -> Flattened {
    Flattened {
        entries: body
            .iter()
            .flat_map(Element::key_values)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    }
}

impl Document {
    pub fn flatten(&self) -> Flattened {
        flatten(&self.body)
    }
}

impl Flattened {
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value of `name`; the last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Single-valued mapping; the last occurrence of a name wins.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }

    /// Names that occur more than once, in order of their second occurrence.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut out = Vec::new();
        for (name, _) in &self.entries {
            if !seen.insert(name.as_str()) && reported.insert(name.as_str()) {
                out.push(name.as_str());
            }
        }
        out
    }

    /// Names present here but absent from `other`, sorted.
    pub fn missing_from(&self, other: &Flattened) -> Vec<&str> {
        let theirs: HashSet<&str> = other.entries.iter().map(|(n, _)| n.as_str()).collect();
        self.entries
            .iter()
            .map(|(n, _)| n.as_str())
            .filter(|n| !theirs.contains(n))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    fn bit(name: &str, value: &str) -> Element {
        Element::Bit(BitSetting {
            name: name.into(),
            description: String::new(),
            value: value.into(),
            infos: vec![],
        })
    }

    fn sample() -> Vec<Element> {
        vec![Element::Header(HeaderGroup {
            name: "Group".into(),
            description: String::new(),
            infos: vec![],
            body: vec![
                Element::Enable(EnableGroup {
                    name: "EN".into(),
                    description: String::new(),
                    value: "1".into(),
                    infos: vec![],
                    body: vec![bit("A", "0")],
                }),
                Element::Option(OptionSetting {
                    name: "LEVEL".into(),
                    description: String::new(),
                    value: "3".into(),
                    options: vec![NamedOption::new("3", "Info")],
                    infos: vec![],
                    option_infos: vec![],
                    macro_infos: vec![],
                }),
            ],
        })]
    }

    #[test]
    fn depth_first_with_enable_values() {
        let flat = flatten(&sample());
        let names: Vec<&str> = flat.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["EN", "A", "LEVEL"]);
        assert!(!flat.contains("Group"));
        assert_eq!(flat.get("LEVEL"), Some("3"));
        assert!(flat.duplicates().is_empty());
    }

    #[test]
    fn duplicates_are_reported_and_last_wins() {
        let flat = flatten(&[bit("A", "0"), bit("B", "1"), bit("A", "2"), bit("A", "3")]);
        assert_eq!(flat.len(), 4);
        assert_eq!(flat.duplicates(), vec!["A"]);
        assert_eq!(flat.get("A"), Some("3"));
        assert_eq!(flat.to_map().get("A").map(String::as_str), Some("3"));
        assert_eq!(flat.to_map().len(), 2);
    }

    #[test]
    fn missing_from_is_sorted_and_one_sided() {
        let ours = flatten(&[bit("Z", "0"), bit("A", "0"), bit("SHARED", "1")]);
        let master = flatten(&[bit("SHARED", "0"), bit("ONLY_MASTER", "1")]);
        assert_eq!(ours.missing_from(&master), vec!["A", "Z"]);
        assert_eq!(master.missing_from(&ours), vec!["ONLY_MASTER"]);
    }

    #[test]
    fn empty_body() {
        assert!(flatten(&[]).is_empty());
    }
}
