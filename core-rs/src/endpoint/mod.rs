//! Endpoint module for executing query text
//!
//! Provides the `Endpoint` capability and its implementations:
//! - HttpEndpoint: remote SPARQL protocol endpoint (e.g. a Sesame repository)
//! - LocalEndpoint: in-memory RDF store loaded from Turtle

mod http;
mod local;

pub use http::{parse_response, HttpEndpoint, ACCEPT_TYPES, RDF_JSON, SPARQL_RESULTS_JSON};
pub use local::LocalEndpoint;

use crate::errors::Result;
use crate::results::Row;

/// Something that answers compiled query text with rows.
///
/// Each row maps projected field names to the string form of the bound
/// value; an optional field that did not match is simply absent. A query
/// with no matches is `Ok(vec![])`, never an error.
pub trait Endpoint: Send + Sync {
    fn ask(&self, query: &str) -> Result<Vec<Row>>;
}

impl<E: Endpoint + ?Sized> Endpoint for &E {
    fn ask(&self, query: &str) -> Result<Vec<Row>> {
        (**self).ask(query)
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Box<E> {
    fn ask(&self, query: &str) -> Result<Vec<Row>> {
        (**self).ask(query)
    }
}
