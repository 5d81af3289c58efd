//! Chain reconstruction
//!
//! A composite part lists its sub-components through annotations linked by
//! `sbol:precedes`. The endpoint returns those links as unordered
//! upstream/downstream pairs; `reconstruct` turns them back into the
//! sub-component order.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::errors::{ChainDefect, Result, SbolError};
use crate::query::{vocab, Iri, Presence, Query, TriplePattern, Variable};
use crate::results::Row;

/// Row field naming the upstream part of a precedes link
pub const UPSTREAM_FIELD: &str = "upstream";

/// Row field naming the downstream part of a precedes link
pub const DOWNSTREAM_FIELD: &str = "downstream";

/// `upstream` immediately precedes `downstream` inside one composite
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub upstream: String,
    pub downstream: String,
}

impl Edge {
    pub fn new(upstream: impl Into<String>, downstream: impl Into<String>) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
        }
    }
}

/// Order the parts of a precedes chain from head to tail.
///
/// Identical edges count once. Anything other than a single simple path
/// (a cycle, a fork, two heads, a detached loop) is a
/// [`SbolError::MalformedChain`].
///
/// # Example
///
/// ```
/// use sbolq_core::chain::{reconstruct, Edge};
///
/// let edges = vec![Edge::new("B", "C"), Edge::new("A", "B"), Edge::new("C", "D")];
/// assert_eq!(reconstruct(&edges).unwrap(), vec!["A", "B", "C", "D"]);
/// ```
pub fn reconstruct(edges: &[Edge]) -> Result<Vec<String>> {
    let unique: BTreeSet<&Edge> = edges.iter().collect();
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let mut successor: BTreeMap<&str, &str> = BTreeMap::new();
    let mut predecessor: BTreeMap<&str, &str> = BTreeMap::new();
    let mut parts: BTreeSet<&str> = BTreeSet::new();

    for edge in &unique {
        let (up, down) = (edge.upstream.as_str(), edge.downstream.as_str());
        parts.insert(up);
        parts.insert(down);
        if successor.insert(up, down).is_some() {
            return Err(defect(ChainDefect::Branch(up.to_string())));
        }
        if predecessor.insert(down, up).is_some() {
            return Err(defect(ChainDefect::Merge(down.to_string())));
        }
    }

    let heads: Vec<&str> = parts
        .iter()
        .copied()
        .filter(|part| !predecessor.contains_key(part))
        .collect();
    let head = match heads.as_slice() {
        [] => return Err(defect(ChainDefect::NoHead)),
        [head] => *head,
        _ => {
            let heads = heads.iter().map(|h| h.to_string()).collect();
            return Err(defect(ChainDefect::MultipleHeads(heads)));
        }
    };

    let mut order = Vec::with_capacity(parts.len());
    let mut current = Some(head);
    while let Some(part) = current {
        order.push(part.to_string());
        current = successor.get(part).copied();
    }

    if order.len() != parts.len() {
        return Err(defect(ChainDefect::Disconnected {
            reached: order.len(),
            total: parts.len(),
        }));
    }
    Ok(order)
}

fn defect(defect: ChainDefect) -> SbolError {
    warn!(%defect, "precedes edges do not form a chain");
    SbolError::MalformedChain(defect)
}

/// A part is composite exactly when it has at least one precedes link
pub fn is_composite(edges: &[Edge]) -> bool {
    !edges.is_empty()
}

/// Query for the precedes links between the sub-components of `container`
pub fn precedes_query(container: &Iri) -> Query {
    let upstream_annotation = var("upstreamAnnotation");
    let downstream_annotation = var("downstreamAnnotation");
    let upstream = var(UPSTREAM_FIELD);
    let downstream = var(DOWNSTREAM_FIELD);

    let mut query = Query::with_result(container.clone());
    query.add_namespace(vocab::SBOL);
    for triple in [
        TriplePattern::new(container.clone(), vocab::sbol::annotation(), &upstream_annotation),
        TriplePattern::new(&upstream_annotation, vocab::sbol::sub_component(), &upstream),
        TriplePattern::new(&upstream_annotation, vocab::sbol::precedes(), &downstream_annotation),
        TriplePattern::new(&downstream_annotation, vocab::sbol::sub_component(), &downstream),
    ] {
        query.add_pattern(triple, Presence::Required);
    }
    query.select(upstream);
    query.select(downstream);
    query.set_distinct(true);
    query
}

fn var(name: &'static str) -> Variable {
    Variable::new(name).expect("constant variable name")
}

/// Read `upstream`/`downstream` pairs out of rows returned for [`precedes_query`]
pub fn edges_from_rows(rows: &[Row]) -> Result<Vec<Edge>> {
    rows.iter()
        .map(|row| {
            let field = |name: &str| {
                row.get(name).map(str::to_string).ok_or_else(|| {
                    SbolError::MalformedResponse(format!("precedes row without '{}' field", name))
                })
            };
            Ok(Edge {
                upstream: field(UPSTREAM_FIELD)?,
                downstream: field(DOWNSTREAM_FIELD)?,
            })
        })
        .collect()
}
