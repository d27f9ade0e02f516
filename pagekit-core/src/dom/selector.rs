//! CSS selector subset
//!
//! Supported: type (`li`), universal (`*`), `.class`, `#id`, `[attr]`,
//! `[attr="v"]`, compound selectors, the descendant (whitespace) and child
//! (`>`) combinators, and selector lists (`a, b`).

use std::fmt;
use std::str::FromStr;

use super::document::{Document, NodeId};
use crate::error::{CoreError, CoreResult};

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

impl Selector {
    pub fn parse(input: &str) -> CoreResult<Self> {
        let invalid = || CoreError::InvalidSelector(input.to_string());
        let chars: Vec<char> = input.chars().collect();
        let mut parser = Parser { chars: &chars, pos: 0 };

        let mut alternatives = Vec::new();
        loop {
            alternatives.push(parser.complex().ok_or_else(invalid)?);
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => parser.pos += 1,
                Some(_) => return Err(invalid()),
            }
        }

        Ok(Self {
            source: input.trim().to_string(),
            alternatives,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if node == doc.root() {
            return false;
        }
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(doc, node, complex.compounds.len() - 1))
    }
}

impl FromStr for Selector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches_at(&self, doc: &Document, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        let mut cursor = doc.parent(node).filter(|p| *p != doc.root());
        match self.combinators[index - 1] {
            Combinator::Child => cursor.is_some_and(|parent| self.matches_at(doc, parent, index - 1)),
            Combinator::Descendant => {
                while let Some(ancestor) = cursor {
                    if self.matches_at(doc, ancestor, index - 1) {
                        return true;
                    }
                    cursor = doc.parent(ancestor).filter(|p| *p != doc.root());
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && doc.tag(node) != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if doc.attr(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| doc.has_class(node, class)) {
            return false;
        }
        self.attrs.iter().all(|attr| match &attr.value {
            None => doc.has_attr(node, &attr.name) || (attr.name == "class" && !doc.classes(node).is_empty()),
            Some(expected) => doc.attr(node, &attr.name) == Some(expected.as_str()),
        })
    }
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Option<Complex> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_ws => combinators.push(Combinator::Descendant),
                Some(_) => return None,
            }
            compounds.push(self.compound()?);
        }
        Some(Complex { compounds, combinators })
    }

    fn compound(&mut self) -> Option<Compound> {
        let mut compound = Compound::default();
        while let Some(c) = self.peek() {
            match c {
                '*' => {
                    self.pos += 1;
                    compound.tag = Some("*".to_string());
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                '#' => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                '[' => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                c if is_ident_char(c) => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
                _ => break,
            }
        }
        (!compound.is_empty()).then_some(compound)
    }

    fn attribute(&mut self) -> Option<AttrMatch> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        let value = match self.peek()? {
            ']' => None,
            '=' => {
                self.pos += 1;
                self.skip_ws();
                let value = match self.peek()? {
                    quote @ ('"' | '\'') => {
                        self.pos += 1;
                        let start = self.pos;
                        while self.peek()? != quote {
                            self.pos += 1;
                        }
                        let value: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(value)
            }
            _ => return None,
        };
        if self.peek()? != ']' {
            return None;
        }
        self.pos += 1;
        Some(AttrMatch { name, value })
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
