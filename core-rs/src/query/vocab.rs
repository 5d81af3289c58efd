//! Namespaces and the SBOL vocabulary used by the canned patterns

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SbolError};
use crate::query::term::Iri;

static ALIAS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());
static LOCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_.-]*[A-Za-z0-9_-])?$").unwrap());

/// A namespace root and its conventional alias
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub alias: &'static str,
    pub iri: &'static str,
}

impl Namespace {
    /// IRI of a term in this namespace; `local` is validated
    pub fn iri(&self, local: &str) -> Result<Iri> {
        Iri::new(format!("{}{}", self.iri, local))
    }

    pub(crate) fn known(&self, local: &'static str) -> Iri {
        Iri::trusted(format!("{}{}", self.iri, local))
    }
}

pub const RDF: Namespace = Namespace {
    alias: "rdf",
    iri: "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
};

pub const RDFS: Namespace = Namespace {
    alias: "rdfs",
    iri: "http://www.w3.org/2000/01/rdf-schema#",
};

pub const XSD: Namespace = Namespace {
    alias: "xsd",
    iri: "http://www.w3.org/2001/XMLSchema#",
};

/// SBOL 1.1 core vocabulary
pub const SBOL: Namespace = Namespace {
    alias: "sbol",
    iri: "http://sbols.org/v1#",
};

/// Parts Registry categories (cds, rbs, promoter, ...)
pub const REGISTRY: Namespace = Namespace {
    alias: "pr",
    iri: "http://partsregistry.org/#",
};

pub mod rdf {
    use super::*;

    pub fn type_() -> Iri {
        RDF.known("type")
    }
}

pub mod rdfs {
    use super::*;

    pub fn label() -> Iri {
        RDFS.known("label")
    }
}

pub mod sbol {
    use super::*;

    pub fn dna_component() -> Iri {
        SBOL.known("DnaComponent")
    }

    pub fn display_id() -> Iri {
        SBOL.known("displayId")
    }

    pub fn name() -> Iri {
        SBOL.known("name")
    }

    pub fn description() -> Iri {
        SBOL.known("description")
    }

    pub fn annotation() -> Iri {
        SBOL.known("annotation")
    }

    pub fn sub_component() -> Iri {
        SBOL.known("subComponent")
    }

    pub fn precedes() -> Iri {
        SBOL.known("precedes")
    }

    pub fn dna_sequence() -> Iri {
        SBOL.known("dnaSequence")
    }

    pub fn nucleotides() -> Iri {
        SBOL.known("nucleotides")
    }
}

/// Ordered alias → namespace table used to compact IRIs in compiled text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefixes(IndexMap<String, String>);

impl Prefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias`. Re-registering an alias replaces its namespace in place.
    pub fn insert(&mut self, alias: &str, namespace: &str) -> Result<()> {
        if !ALIAS_RE.is_match(alias) {
            return Err(SbolError::InvalidName(format!("'{}' is not a valid prefix alias", alias)));
        }
        let namespace = Iri::new(namespace)?;
        self.0.insert(alias.to_string(), namespace.as_str().to_string());
        Ok(())
    }

    pub(crate) fn insert_namespace(&mut self, ns: Namespace) {
        self.0
            .entry(ns.alias.to_string())
            .or_insert_with(|| ns.iri.to_string());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(a, ns)| (a.as_str(), ns.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `alias:local` for the longest registered namespace that covers `iri`
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.iter()
            .filter_map(|(alias, ns)| {
                let local = iri.strip_prefix(ns)?;
                LOCAL_RE.is_match(local).then(|| (ns.len(), alias, local))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, alias, local)| format!("{}:{}", alias, local))
    }
}
