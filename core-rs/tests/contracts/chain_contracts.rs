// Chain and Result Mapping Contract Tests
//
// A wrong part order is a correctness hazard for the assembled DNA, not a
// cosmetic problem. These tests pin down when an order is returned and
// when reconstruction must refuse.

use sbolq_core::{is_composite, map_rows, reconstruct, ChainDefect, Edge, Row, SbolError};

fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
    pairs.iter().map(|(u, d)| Edge::new(*u, *d)).collect()
}

/// WHY: Edges in any order reconstruct the same chain
/// REASON: Endpoints return rows in no particular order
/// BREAKS: Sub-component order of every composite part
/// SACRIFICES: If this fails, order depends on endpoint row order
#[test]
fn any_edge_order_gives_same_chain() {
    let pairs = [("A", "B"), ("B", "C"), ("C", "D")];
    let orders: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    for order in orders {
        let shuffled: Vec<(&str, &str)> = order.iter().map(|i| pairs[*i]).collect();
        assert_eq!(reconstruct(&edges(&shuffled)).unwrap(), vec!["A", "B", "C", "D"]);
    }
}

/// WHY: No edges means no order and not composite
/// REASON: Basic parts have no precedes links at all
/// BREAKS: Basic/composite classification
/// SACRIFICES: If this fails, basic parts look malformed
#[test]
fn empty_edges_is_basic_part() {
    assert!(reconstruct(&[]).unwrap().is_empty());
    assert!(!is_composite(&[]));
}

/// WHY: Two heads raise MalformedChain
/// REASON: Either partial order would be a guess
/// BREAKS: Correctness of reported part order
/// SACRIFICES: If this fails, a truncated order is returned as if complete
#[test]
fn two_heads_is_malformed() {
    match reconstruct(&edges(&[("A", "B"), ("C", "D")])) {
        Err(SbolError::MalformedChain(ChainDefect::MultipleHeads(heads))) => {
            assert_eq!(heads, vec!["A".to_string(), "C".to_string()]);
        }
        other => panic!("expected MultipleHeads, got {:?}", other),
    }
}

/// WHY: Cycles and forks raise MalformedChain, never loop or truncate
/// REASON: The walk must terminate and cover every part
/// BREAKS: Termination (cycles) and completeness (forks)
/// SACRIFICES: If this fails, reconstruction can hang or drop parts
#[test]
fn cycles_and_forks_are_malformed() {
    for bad in [
        edges(&[("A", "B"), ("B", "A")]),
        edges(&[("A", "B"), ("A", "C")]),
        edges(&[("A", "C"), ("B", "C")]),
        edges(&[("A", "B"), ("C", "D"), ("D", "C")]),
    ] {
        assert!(matches!(reconstruct(&bad), Err(SbolError::MalformedChain(_))), "{:?}", bad);
    }
}

/// WHY: The identity field becomes the record identity, everything else an attribute
/// REASON: Records are addressed by IRI; the IRI is not a display attribute
/// BREAKS: Record identity for every search result
/// SACRIFICES: If this fails, callers cannot tell which part a record is
#[test]
fn mapper_promotes_identity() {
    let rows: Vec<Row> = vec![[("displayId", "B0010"), ("uri", "http://x/B0010")].into_iter().collect()];
    let records = map_rows(rows, Some("uri"));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity(), Some("http://x/B0010"));
    assert_eq!(records[0].get("displayId"), Some("B0010"));
    assert_eq!(records[0].attributes().len(), 1);
}

/// WHY: Output record order mirrors input row order
/// REASON: ORDER BY is applied by the endpoint
/// BREAKS: Sorted search results
/// SACRIFICES: If this fails, the mapper is re-sorting
#[test]
fn mapper_keeps_row_order() {
    let rows: Vec<Row> = ["z", "a", "m"]
        .iter()
        .map(|id| [("uri", *id)].into_iter().collect())
        .collect();
    let ids: Vec<_> = map_rows(rows, Some("uri"))
        .iter()
        .map(|r| r.identity().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}
