//! Terms that can appear inside triple patterns and filters
//!
//! Every constructor that accepts caller text validates it, so a rendered
//! term can never close its own token early (`?name`, `_:label`, `<iri>`,
//! `"literal"`).

use once_cell::sync::Lazy;
use oxigraph::model::NamedNode;
use regex::Regex;
use std::fmt;

use crate::errors::{Result, SbolError};
use crate::query::vocab::Prefixes;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static LANG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+(-[A-Za-z0-9]+)*$").unwrap());

/// Named placeholder. Two variables with the same name are the same variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !NAME_RE.is_match(&name) {
            return Err(SbolError::InvalidName(format!("'{}' is not a valid variable name", name)));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

/// Anonymous node, scoped to the query that allocated it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode {
    label: String,
}

impl BlankNode {
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if !NAME_RE.is_match(&label) {
            return Err(SbolError::InvalidName(format!("'{}' is not a valid blank node label", label)));
        }
        Ok(Self { label })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.label)
    }
}

/// Absolute resource identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    iri: String,
}

impl Iri {
    /// Validate and wrap an absolute identifier.
    ///
    /// Rejects anything that could not sit between `<` and `>` unescaped.
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::query::Iri;
    ///
    /// assert!(Iri::new("http://partsregistry.org/part/BBa_B0010").is_ok());
    /// assert!(Iri::new("http://x/> . ?s ?p ?o").is_err());
    /// ```
    pub fn new(iri: impl Into<String>) -> Result<Self> {
        let iri = iri.into();
        if iri.is_empty() {
            return Err(SbolError::InvalidIri("IRI cannot be empty".to_string()));
        }
        NamedNode::new(iri.as_str()).map_err(|e| SbolError::InvalidIri(format!("{:?}: {}", iri, e)))?;
        if let Some(bad) = iri
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || "<>\"{}|^`\\".contains(*c))
        {
            return Err(SbolError::InvalidIri(format!("{:?} contains forbidden character {:?}", iri, bad)));
        }
        Ok(Self { iri })
    }

    /// Vocabulary constants only; callers go through [`Iri::new`].
    pub(crate) fn trusted(iri: String) -> Self {
        debug_assert!(Iri::new(iri.clone()).is_ok(), "bad vocabulary IRI {}", iri);
        Self { iri }
    }

    pub fn as_str(&self) -> &str {
        &self.iri
    }

    /// Render as `alias:local` when a registered namespace covers it, `<iri>` otherwise
    pub fn render(&self, prefixes: &Prefixes) -> String {
        match prefixes.compact(&self.iri) {
            Some(short) => short,
            None => format!("<{}>", self.iri),
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralTag {
    Language(String),
    Datatype(Iri),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
    tag: Option<LiteralTag>,
}

impl Literal {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: None,
        }
    }

    pub fn with_language(value: impl Into<String>, language: &str) -> Result<Self> {
        if !LANG_RE.is_match(language) {
            return Err(SbolError::InvalidLanguageTag(language.to_string()));
        }
        Ok(Self {
            value: value.into(),
            tag: Some(LiteralTag::Language(language.to_string())),
        })
    }

    pub fn with_datatype(value: impl Into<String>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            tag: Some(LiteralTag::Datatype(datatype)),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn tag(&self) -> Option<&LiteralTag> {
        self.tag.as_ref()
    }

    pub fn render(&self, prefixes: &Prefixes) -> String {
        let mut out = quote(&self.value);
        match &self.tag {
            Some(LiteralTag::Language(lang)) => {
                out.push('@');
                out.push_str(lang);
            }
            Some(LiteralTag::Datatype(datatype)) => {
                out.push_str("^^");
                out.push_str(&datatype.render(prefixes));
            }
            None => {}
        }
        out
    }
}

/// Double-quote a string, escaping everything that could end the literal
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(Variable),
    BlankNode(BlankNode),
    Resource(Iri),
    Literal(Literal),
}

impl Term {
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new(value))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn render(&self, prefixes: &Prefixes) -> String {
        match self {
            Term::Variable(v) => v.to_string(),
            Term::BlankNode(b) => b.to_string(),
            Term::Resource(iri) => iri.render(prefixes),
            Term::Literal(lit) => lit.render(prefixes),
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<&Variable> for Term {
    fn from(v: &Variable) -> Self {
        Term::Variable(v.clone())
    }
}

impl From<BlankNode> for Term {
    fn from(b: BlankNode) -> Self {
        Term::BlankNode(b)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Resource(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}
