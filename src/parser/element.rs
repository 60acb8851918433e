//! Element grammar — recursive descent over the five element kinds.
//!
//! Body positions are filled by trying each kind in [`BODY_ORDER`] until one
//! matches. Whether a failure past a matched header counts as "no match" or
//! aborts the parse is decided by [`Dispatch`].

use super::cursor::{self, ElementHeader};
use super::{Dispatch, ParseOptions};
use crate::error::{ParseError, Result};
use crate::model::*;

/// Outcome of trying one alternative at a body position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Matched(usize, T),
    NoMatch,
}

/// Run a parse attempt, turning a failure into [`Attempt::NoMatch`].
///
/// Fatal failures still propagate.
pub fn try_parse<T>(attempt: impl FnOnce() -> Result<(usize, T)>) -> Result<Attempt<T>> {
    match attempt() {
        Ok((i, value)) => Ok(Attempt::Matched(i, value)),
        Err(err) if err.fatal => Err(err),
        Err(_) => Ok(Attempt::NoMatch),
    }
}

/// Grammar rules bound to one input and one set of options.
pub(crate) struct Grammar<'a, 'l> {
    lines: &'a [&'l str],
    options: &'a ParseOptions,
}

impl<'a, 'l> Grammar<'a, 'l> {
    pub(crate) fn new(lines: &'a [&'l str], options: &'a ParseOptions) -> Self {
        Self { lines, options }
    }

    /// Parse zero or more elements until no alternative matches.
    ///
    /// `depth` is the nesting level of the container owning this body.
    pub(crate) fn body(&self, mut i: usize, depth: usize) -> Result<(usize, Vec<Element>)> {
        let mut body = Vec::new();
        'positions: loop {
            for tag in BODY_ORDER {
                if let Attempt::Matched(next, element) = self.alternative(i, tag, depth)? {
                    body.push(element);
                    i = next;
                    continue 'positions;
                }
            }
            return Ok((i, body));
        }
    }

    /// Try one element kind at `i`.
    ///
    /// A header that does not match is always `NoMatch`. Past the header,
    /// lenient dispatch swallows failures while strict dispatch returns them.
    /// Exceeding the nesting cap is fatal in both modes.
    fn alternative(&self, i: usize, tag: Tag, depth: usize) -> Result<Attempt<Element>> {
        let (next, header) = match cursor::match_element_header(self.lines, i, tag) {
            Ok(matched) => matched,
            Err(_) => return Ok(Attempt::NoMatch),
        };

        if tag.is_container() && depth >= self.options.max_depth {
            return Err(ParseError::fatal(
                next - 1,
                format!("nesting deeper than {} levels", self.options.max_depth),
            ));
        }

        match self.options.dispatch {
            Dispatch::Lenient => try_parse(|| self.after_header(next, tag, header, depth)),
            Dispatch::Strict => {
                let (next, element) = self.after_header(next, tag, header, depth)?;
                Ok(Attempt::Matched(next, element))
            }
        }
    }

    fn after_header(
        &self,
        i: usize,
        tag: Tag,
        header: ElementHeader,
        depth: usize,
    ) -> Result<(usize, Element)> {
        match tag {
            Tag::Bit => self.bit(i, header).map(|(i, e)| (i, Element::Bit(e))),
            Tag::String => self.string(i, header).map(|(i, e)| (i, Element::String(e))),
            Tag::Option => self.option(i, header).map(|(i, e)| (i, Element::Option(e))),
            Tag::Enable => self.enable(i, header, depth).map(|(i, e)| (i, Element::Enable(e))),
            Tag::Header => self.header(i, header, depth).map(|(i, e)| (i, Element::Header(e))),
        }
    }

    fn bit(&self, i: usize, header: ElementHeader) -> Result<(usize, BitSetting)> {
        let (i, value, macro_infos) = cursor::match_macro_guard(self.lines, i, &header.name)?;
        let ElementHeader { name, description, mut infos } = header;
        infos.extend(macro_infos);
        Ok((i, BitSetting { name, description, value, infos }))
    }

    fn string(&self, i: usize, header: ElementHeader) -> Result<(usize, StringSetting)> {
        let (i, value, macro_infos) = cursor::match_macro_guard(self.lines, i, &header.name)?;
        let ElementHeader { name, description, mut infos } = header;
        infos.extend(macro_infos);
        Ok((i, StringSetting { name, description, value, infos }))
    }

    // Option-list infos sit between the header and the macro; keep them apart.
    fn option(&self, i: usize, header: ElementHeader) -> Result<(usize, OptionSetting)> {
        let (i, options, option_infos) = cursor::match_option_list(self.lines, i);
        let (i, value, macro_infos) = cursor::match_macro_guard(self.lines, i, &header.name)?;
        let ElementHeader { name, description, infos } = header;
        let setting = OptionSetting {
            name,
            description,
            value,
            options,
            infos,
            option_infos,
            macro_infos,
        };
        Ok((i, setting))
    }

    fn enable(&self, i: usize, header: ElementHeader, depth: usize) -> Result<(usize, EnableGroup)> {
        let (i, value, macro_infos) = cursor::match_macro_guard(self.lines, i, &header.name)?;
        let (i, body) = self.body(i, depth + 1)?;
        let i = cursor::match_literal(self.lines, i, ENABLE_END)?;
        let ElementHeader { name, description, mut infos } = header;
        infos.extend(macro_infos);
        Ok((i, EnableGroup { name, description, value, infos, body }))
    }

    fn header(&self, i: usize, header: ElementHeader, depth: usize) -> Result<(usize, HeaderGroup)> {
        let (i, body) = self.body(i, depth + 1)?;
        let i = cursor::match_literal(self.lines, i, HEADER_END)?;
        let ElementHeader { name, description, infos } = header;
        Ok((i, HeaderGroup { name, description, infos, body }))
    }
}

/// Closing marker of an `<e>` group.
pub const ENABLE_END: &str = "// </e>";
/// Closing marker of an `<h>` group.
pub const HEADER_END: &str = "// </h>";

/// Run one typed rule at `i` with default options, requiring its header.
fn parse_rule<T>(
    lines: &[&str],
    i: usize,
    tag: Tag,
    rule: impl FnOnce(&Grammar, usize, ElementHeader) -> Result<(usize, T)>,
) -> Result<(usize, T)> {
    let options = ParseOptions::default();
    let grammar = Grammar::new(lines, &options);
    let (next, header) = cursor::match_element_header(lines, i, tag)?;
    rule(&grammar, next, header)
}

/// Parse a `<q>` setting starting at `i`.
pub fn parse_bit(lines: &[&str], i: usize) -> Result<(usize, BitSetting)> {
    parse_rule(lines, i, Tag::Bit, |g, i, h| g.bit(i, h))
}

/// Parse a `<s>` setting starting at `i`.
pub fn parse_string(lines: &[&str], i: usize) -> Result<(usize, StringSetting)> {
    parse_rule(lines, i, Tag::String, |g, i, h| g.string(i, h))
}

/// Parse an `<o>` setting starting at `i`.
pub fn parse_option(lines: &[&str], i: usize) -> Result<(usize, OptionSetting)> {
    parse_rule(lines, i, Tag::Option, |g, i, h| g.option(i, h))
}

/// Parse an `<e>` group, including its body and closing marker.
pub fn parse_enable(lines: &[&str], i: usize) -> Result<(usize, EnableGroup)> {
    parse_rule(lines, i, Tag::Enable, |g, i, h| g.enable(i, h, 0))
}

/// Parse an `<h>` group, including its body and closing marker.
pub fn parse_header(lines: &[&str], i: usize) -> Result<(usize, HeaderGroup)> {
    parse_rule(lines, i, Tag::Header, |g, i, h| g.header(i, h, 0))
}
