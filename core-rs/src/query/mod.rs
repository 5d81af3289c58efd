/**
 * query module
 *
 * - term: variables, blank nodes, IRIs, literals
 * - vocab: namespaces, prefix table, SBOL vocabulary
 * - pattern: triple patterns, pattern groups, filter expressions
 * - builder: the Query aggregate and its builder operations
 * - compiler: query text generation and the pretty pass
 */

pub mod builder;
pub mod compiler;
pub mod pattern;
pub mod term;
pub mod vocab;

pub use builder::{Direction, Presence, Query, QueryForm, DISPLAY_ID_FIELD, RESULT_FIELD};
pub use compiler::{compile, compile_pretty, pretty};
pub use pattern::{escape_regex, FilterExpression, Pattern, PatternGroup, TriplePattern};
pub use term::{BlankNode, Iri, Literal, LiteralTag, Term, Variable};
pub use vocab::{Namespace, Prefixes, RDF, RDFS, REGISTRY, SBOL, XSD};
