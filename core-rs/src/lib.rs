//! # sbolq core - SBOL part queries over SPARQL
//!
//! Builds SPARQL queries for SBOL 1.1 DNA components, sends them to a
//! SPARQL endpoint (a remote repository or an in-memory store), maps the
//! answers to part records, and rebuilds the sub-component order of
//! composite parts from their `precedes` links.
//!
//! ## Key Features
//!
//! - Incremental query builder with a fixed, deterministic text layout
//! - Keyword, type, category and identity restrictions for part searches
//! - Result mapping that tolerates missing optional fields
//! - Chain reconstruction with typed defects for malformed composites
//!
//! ## Architecture
//!
//! ```text
//! SearchRequest ──► Query ──compile──► text ──► Endpoint ──► rows
//!                                                              │
//!                        Vec<ResultRecord> ◄── map_rows ◄──────┤
//!                        Vec<String>       ◄── reconstruct ◄───┘
//! ```

pub mod chain;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod query;
pub mod results;
pub mod search;

pub use chain::{edges_from_rows, is_composite, precedes_query, reconstruct, Edge};
pub use client::SbolClient;
pub use config::{EndpointConfig, SbolqConfig, SearchConfig};
pub use endpoint::{Endpoint, HttpEndpoint, LocalEndpoint};
pub use errors::{ChainDefect, SbolError};
pub use query::{compile, compile_pretty, pretty, FilterExpression, Iri, Query, Term, Variable};
pub use results::{map_rows, FieldMap, ResultRecord, Row};
pub use search::SearchRequest;

/// Version of the sbolq core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
