//! SbolClient - runs queries against an endpoint and shapes the answers
//!
//! Ties the pieces together: a [`Query`] is checked and compiled, the text
//! is sent to an [`Endpoint`], and the rows come back as [`ResultRecord`]s
//! or, for composite parts, as an ordered list of sub-components.

use std::thread;

use tracing::{debug, info};

use crate::chain::{self, Edge};
use crate::endpoint::Endpoint;
use crate::errors::{ChainDefect, Result, SbolError};
use crate::query::{Iri, Query};
use crate::results::{map_rows, ResultRecord, Row};
use crate::search::SearchRequest;

pub struct SbolClient<E: Endpoint> {
    endpoint: E,
}

impl<E: Endpoint> SbolClient<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Execute `query` and map each row to a record.
    ///
    /// A query that projects or filters on a variable no pattern binds is
    /// refused with [`SbolError::UnboundVariable`] before the endpoint is
    /// contacted. Zero matches is an empty vector.
    pub fn execute(&self, query: &Query) -> Result<Vec<ResultRecord>> {
        let rows = self.rows(query)?;
        Ok(map_rows(rows, query.identity_field()))
    }

    /// Execute `query` and return the raw rows
    pub fn rows(&self, query: &Query) -> Result<Vec<Row>> {
        if let Some(variable) = query.unbound_variables().into_iter().next() {
            return Err(SbolError::UnboundVariable(variable.name().to_string()));
        }

        let text = query.compile();
        debug!(query = %text, "executing query");
        let rows = self.endpoint.ask(&text)?;
        info!(rows = rows.len(), "query answered");
        Ok(rows)
    }

    pub fn search(&self, request: &SearchRequest) -> Result<Vec<ResultRecord>> {
        self.execute(&request.build()?)
    }

    /// Name, description and sequence of one part; `None` if unknown
    pub fn fetch(&self, part: &Iri) -> Result<Option<ResultRecord>> {
        let mut query = Query::new_query();
        query.add_name()?;
        query.add_description()?;
        query.add_sequence()?;
        query.add_exact_identity(part.clone());
        query.set_limit(Some(1));
        Ok(self.execute(&query)?.into_iter().next())
    }

    /// Every statement about `part`, as `subject`/`predicate`/`object` rows
    pub fn describe(&self, part: &Iri) -> Result<Vec<Row>> {
        self.rows(&Query::with_result(part.clone()))
    }

    pub fn precedes_edges(&self, part: &Iri) -> Result<Vec<Edge>> {
        let rows = self.rows(&chain::precedes_query(part))?;
        chain::edges_from_rows(&rows)
    }

    /// Direct sub-components of `part` in sequence order; empty for a basic part
    pub fn subcomponents(&self, part: &Iri) -> Result<Vec<String>> {
        chain::reconstruct(&self.precedes_edges(part)?)
    }

    pub fn is_composite(&self, part: &Iri) -> Result<bool> {
        Ok(chain::is_composite(&self.precedes_edges(part)?))
    }

    /// Basic parts of `part` in sequence order, expanding nested composites.
    ///
    /// A basic part flattens to itself. The sub-components of each composite
    /// are looked up concurrently.
    pub fn flatten(&self, part: &Iri) -> Result<Vec<String>> {
        let edges = self.precedes_edges(part)?;
        let mut path = vec![part.as_str().to_string()];
        self.expand(part.as_str(), &edges, &mut path)
    }

    fn expand(&self, part: &str, edges: &[Edge], path: &mut Vec<String>) -> Result<Vec<String>> {
        let children = chain::reconstruct(edges)?;
        if children.is_empty() {
            return Ok(vec![part.to_string()]);
        }

        let child_edges = self.edges_of_all(&children)?;
        let mut leaves = Vec::with_capacity(children.len());
        for (child, edges) in children.iter().zip(child_edges) {
            if path.contains(child) {
                return Err(SbolError::MalformedChain(ChainDefect::SelfContaining(child.clone())));
            }
            if edges.is_empty() {
                leaves.push(child.clone());
                continue;
            }
            path.push(child.clone());
            leaves.extend(self.expand(child, &edges, path)?);
            path.pop();
        }
        Ok(leaves)
    }

    /// Precedes edges of each part, looked up on one thread per part
    fn edges_of_all(&self, parts: &[String]) -> Result<Vec<Vec<Edge>>> {
        let iris = parts
            .iter()
            .map(|part| Iri::new(part.as_str()))
            .collect::<Result<Vec<_>>>()?;

        debug!(parts = iris.len(), "looking up sub-components");
        thread::scope(|scope| {
            let handles: Vec<_> = iris
                .iter()
                .map(|iri| scope.spawn(move || self.precedes_edges(iri)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}
