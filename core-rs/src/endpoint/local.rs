//! LocalEndpoint backed by an in-memory oxigraph store
//!
//! Runs the same compiled query text as a remote endpoint, against triples
//! loaded from Turtle. Used for offline work and for tests.

use std::fs;
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::{Subject, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::errors::{Result, SbolError};
use crate::results::Row;

#[derive(Clone)]
pub struct LocalEndpoint {
    store: Store,
}

impl LocalEndpoint {
    /// Create an empty store
    pub fn new() -> Result<Self> {
        let store = Store::new()
            .map_err(|e| SbolError::Unreachable(format!("Failed to create in-memory store: {}", e)))?;
        Ok(Self { store })
    }

    /// Store pre-loaded with a Turtle document
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::endpoint::{Endpoint, LocalEndpoint};
    ///
    /// let endpoint = LocalEndpoint::from_turtle(
    ///     "<http://x/B0010> <http://sbols.org/v1#displayId> \"B0010\" .",
    /// ).unwrap();
    /// let rows = endpoint.ask("SELECT ?id WHERE { ?s <http://sbols.org/v1#displayId> ?id }").unwrap();
    /// assert_eq!(rows[0].get("id"), Some("B0010"));
    /// ```
    pub fn from_turtle(content: &str) -> Result<Self> {
        let endpoint = Self::new()?;
        endpoint.load_turtle(content)?;
        Ok(endpoint)
    }

    /// Add the triples of a Turtle document to the store
    pub fn load_turtle(&self, content: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfFormat::Turtle, content.as_bytes())
            .map_err(|e| SbolError::ParseError(format!("Failed to load Turtle: {}", e)))
    }

    /// Add the triples of a Turtle file to the store
    pub fn load_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(SbolError::FileNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        self.load_turtle(&content)
    }

    pub fn len(&self) -> Result<usize> {
        self.store
            .len()
            .map_err(|e| SbolError::Unreachable(format!("Failed to read store: {}", e)))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Endpoint for LocalEndpoint {
    fn ask(&self, query: &str) -> Result<Vec<Row>> {
        let rejected = |e: &dyn std::fmt::Display| SbolError::QueryRejected {
            status: 400,
            message: e.to_string(),
        };

        let results = self.store.query(query).map_err(|e| rejected(&e))?;

        let rows = match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| rejected(&e))?;
                    let mut row = Row::new();
                    for (var, term) in solution.iter() {
                        row.insert(var.as_str(), term_text(term));
                    }
                    rows.push(row);
                }
                rows
            }
            QueryResults::Boolean(answer) => {
                vec![[("boolean", answer.to_string())].into_iter().collect()]
            }
            QueryResults::Graph(triples) => {
                let mut rows = Vec::new();
                for triple in triples {
                    let triple = triple.map_err(|e| rejected(&e))?;
                    let mut row = Row::new();
                    row.insert("subject", subject_text(&triple.subject));
                    row.insert("predicate", triple.predicate.as_str());
                    row.insert("object", term_text(&triple.object));
                    rows.push(row);
                }
                rows
            }
        };

        debug!(rows = rows.len(), "local query answered");
        Ok(rows)
    }
}

fn term_text(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_string(),
        Term::BlankNode(node) => node.as_str().to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}

fn subject_text(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(node) => node.as_str().to_string(),
        Subject::BlankNode(node) => node.as_str().to_string(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}
