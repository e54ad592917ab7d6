//! A compact CSS selector dialect.
//!
//! Supported grammar:
//!
//! - comma-separated groups;
//! - each group is one or more compound selectors joined by whitespace
//!   (descendant combinator);
//! - a compound is an optional tag name or `*` followed by any number of
//!   `#id`, `.class`, `[attr]`, `[attr=value]`, `[attr^=value]`,
//!   `[attr$=value]` or `[attr*=value]`. Values may be quoted.
//!
//! An empty selector is valid and matches nothing.

use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::document::Document;
use crate::node::NodeId;

/// Errors reported while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("unexpected '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("expected a name at position {position}")]
    ExpectedName { position: usize },

    #[error("unterminated attribute matcher starting at position {position}")]
    UnterminatedAttribute { position: usize },

    #[error("empty selector group at position {position}")]
    EmptyGroup { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOperator {
    Exists,
    Equals,
    StartsWith,
    EndsWith,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatcher {
    name: String,
    operator: AttributeOperator,
    value: String,
}

impl AttributeMatcher {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self.operator {
            AttributeOperator::Exists => true,
            AttributeOperator::Equals => actual == self.value,
            AttributeOperator::StartsWith => !self.value.is_empty() && actual.starts_with(&self.value),
            AttributeOperator::EndsWith => !self.value.is_empty() && actual.ends_with(&self.value),
            AttributeOperator::Contains => !self.value.is_empty() && actual.contains(&self.value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatcher>,
}

impl Compound {
    fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some(element) = document.element(node) else {
            return false;
        };
        if node == document.root() {
            return false;
        }
        if let Some(tag) = &self.tag
            && !element.tag().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        self.ids.iter().all(|id| element.attr("id") == Some(id.as_str()))
            && self.classes.iter().all(|class_name| element.has_class(class_name))
            && self.attributes.iter().all(|matcher| matcher.matches(element.attr(&matcher.name)))
    }
}

/// Compounds ordered from outermost ancestor to the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
}

impl ComplexSelector {
    fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !subject.matches(document, node) {
            return false;
        }
        let mut current = document.parent(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = document.parent(candidate);
                if compound.matches(document, candidate) {
                    break;
                }
            }
        }
        true
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<ComplexSelector>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        let mut parser = Parser::new(trimmed);
        let mut groups = Vec::new();
        if !trimmed.is_empty() {
            loop {
                groups.push(parser.parse_group()?);
                if !parser.eat(',') {
                    break;
                }
            }
        }
        Ok(Self {
            source: trimmed.to_string(),
            groups,
        })
    }

    /// Selector matching nothing.
    pub fn empty() -> Self {
        Self {
            source: String::new(),
            groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|group| group.matches(document, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn identifier_pattern() -> &'static Regex {
    static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*").expect("identifier pattern compiles"));
    &IDENTIFIER
}

fn attribute_name_pattern() -> &'static Regex {
    static ATTRIBUTE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_:][A-Za-z0-9_:.-]*").expect("attribute name pattern compiles"));
    &ATTRIBUTE_NAME
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, rest: source }
    }

    fn position(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.rest = &self.rest[expected.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn take_match(&mut self, pattern: &Regex) -> Option<&'a str> {
        let found = pattern.find(self.rest)?;
        let (matched, rest) = self.rest.split_at(found.end());
        self.rest = rest;
        Some(matched)
    }

    fn expect_name(&mut self, pattern: &Regex) -> Result<&'a str, SelectorError> {
        let position = self.position();
        self.take_match(pattern).ok_or(SelectorError::ExpectedName { position })
    }

    fn parse_group(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some(_) => compounds.push(self.parse_compound()?),
            }
        }
        if compounds.is_empty() {
            return Err(SelectorError::EmptyGroup { position: self.position() });
        }
        Ok(ComplexSelector { compounds })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.peek() == Some('*') {
            self.rest = &self.rest[1..];
        } else if let Some(tag) = self.take_match(identifier_pattern()) {
            compound.tag = Some(tag.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.rest = &self.rest[1..];
                    compound.ids.push(self.expect_name(identifier_pattern())?.to_string());
                }
                Some('.') => {
                    self.rest = &self.rest[1..];
                    compound.classes.push(self.expect_name(identifier_pattern())?.to_string());
                }
                Some('[') => compound.attributes.push(self.parse_attribute()?),
                None | Some(',') => break,
                Some(character) if character.is_whitespace() => break,
                Some(character) => {
                    return Err(SelectorError::UnexpectedCharacter {
                        character,
                        position: self.position(),
                    });
                }
            }
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttributeMatcher, SelectorError> {
        let start = self.position();
        self.rest = &self.rest[1..];
        self.skip_whitespace();
        let name = self.expect_name(attribute_name_pattern())?.to_string();
        self.skip_whitespace();

        let operator = if self.rest.starts_with(']') {
            AttributeOperator::Exists
        } else {
            let (operator, width) = match self.rest.get(..2) {
                Some("^=") => (AttributeOperator::StartsWith, 2),
                Some("$=") => (AttributeOperator::EndsWith, 2),
                Some("*=") => (AttributeOperator::Contains, 2),
                _ if self.rest.starts_with('=') => (AttributeOperator::Equals, 1),
                _ => match self.peek() {
                    Some(character) => {
                        return Err(SelectorError::UnexpectedCharacter {
                            character,
                            position: self.position(),
                        });
                    }
                    None => return Err(SelectorError::UnterminatedAttribute { position: start }),
                },
            };
            self.rest = &self.rest[width..];
            operator
        };

        let value = if operator == AttributeOperator::Exists {
            String::new()
        } else {
            self.skip_whitespace();
            self.parse_attribute_value(start)?
        };

        self.skip_whitespace();
        if !self.rest.starts_with(']') {
            return Err(SelectorError::UnterminatedAttribute { position: start });
        }
        self.rest = &self.rest[1..];
        Ok(AttributeMatcher { name, operator, value })
    }

    fn parse_attribute_value(&mut self, start: usize) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let body = &self.rest[1..];
                let end = body.find(quote).ok_or(SelectorError::UnterminatedAttribute { position: start })?;
                let value = body[..end].to_string();
                self.rest = &body[end + 1..];
                Ok(value)
            }
            _ => {
                let end = self.rest.find(']').ok_or(SelectorError::UnterminatedAttribute { position: start })?;
                let value = self.rest[..end].trim_end().to_string();
                self.rest = &self.rest[end..];
                Ok(value)
            }
        }
    }
}
