//! Small CSS selector engine.
//!
//! Supports the subset page scripts actually use: type and universal
//! selectors, `#id`, `.class`, attribute selectors (`[a]`, `[a=v]`, `[a^=v]`,
//! `[a$=v]`, `[a*=v]`, `[a~=v]`), descendant and child combinators, and
//! comma-separated lists. Pseudo-classes are rejected.

use ego_tree::NodeId;

use crate::document::Document;
use crate::error::DomError;

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` to `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Word(String),
}

impl AttrOp {
    fn matches(&self, value: &str) -> bool {
        match self {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => value == v,
            AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
            AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
            AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
            AttrOp::Word(v) => value.split_whitespace().any(|w| w == v),
        }
    }
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        Parser::new(input).parse_list()
    }

    /// Whether `node` is an element matched by this selector.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| matches_complex(doc, node, complex, complex.compounds.len() - 1))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn matches_complex(doc: &Document, node: NodeId, complex: &Complex, idx: usize) -> bool {
    if !matches_compound(doc, node, &complex.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    match complex.combinators[idx - 1] {
        Combinator::Child => doc
            .parent_element(node)
            .is_some_and(|parent| matches_complex(doc, parent, complex, idx - 1)),
        Combinator::Descendant => {
            let mut current = doc.parent_element(node);
            while let Some(ancestor) = current {
                if matches_complex(doc, ancestor, complex, idx - 1) {
                    return true;
                }
                current = doc.parent_element(ancestor);
            }
            false
        }
    }
}

fn matches_compound(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if el.tag != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if el.id() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| el.has_class(c)) {
        return false;
    }
    compound.attrs.iter().all(|m| {
        if m.name == "class" {
            let joined = el.classes().collect::<Vec<_>>().join(" ");
            return !joined.is_empty() && m.op.matches(&joined);
        }
        el.attr(&m.name).is_some_and(|value| m.op.matches(value))
    })
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(mut self) -> Result<Selector, DomError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, DomError> {
        let mut compounds = vec![self.parse_compound()?];
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
                Some(c) => return Err(self.error(format!("unexpected `{c}`"))),
            }
            compounds.push(self.parse_compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        let mut any = false;

        if self.peek() == Some('*') {
            self.pos += 1;
            any = true;
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            any = true;
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                Some(':') => return Err(self.error("pseudo-classes are not supported")),
                _ => break,
            }
            any = true;
        }

        if !any {
            return Err(if self.eof() {
                self.error("expected a selector")
            } else {
                self.error(format!("unexpected `{}`", self.chars[self.pos]))
            });
        }
        Ok(compound)
    }

    fn parse_ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attr(&mut self) -> Result<AttrMatcher, DomError> {
        self.skip_ws();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op_prefix = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatcher {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => None,
            Some(c @ ('^' | '$' | '*' | '~')) => {
                self.pos += 1;
                Some(c)
            }
            _ => return Err(self.error("malformed attribute selector")),
        };
        if self.peek() != Some('=') {
            return Err(self.error("malformed attribute selector"));
        }
        self.pos += 1;
        self.skip_ws();
        let value = self.parse_attr_value()?;
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        self.pos += 1;

        let op = match op_prefix {
            None => AttrOp::Equals(value),
            Some('^') => AttrOp::Prefix(value),
            Some('$') => AttrOp::Suffix(value),
            Some('*') => AttrOp::Contains(value),
            _ => AttrOp::Word(value),
        };
        Ok(AttrMatcher { name, op })
    }

    fn parse_attr_value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.eof() {
                    return Err(self.error("unterminated string"));
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.parse_ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
