//! Integration tests for the client workflow
//!
//! Uses a scripted endpoint to check what the client sends and how it
//! shapes what comes back:
//! - Compiled text reaches the endpoint unchanged
//! - Zero matches versus an unreachable endpoint
//! - Dangling variables refused before sending
//! - Config driving endpoint construction

use std::sync::Mutex;

use sbolq_core::query::{Direction, Presence, TriplePattern, Variable};
use sbolq_core::{
    Endpoint, HttpEndpoint, Query, Row, SbolClient, SbolError, SbolqConfig, SearchRequest,
};
use tempfile::TempDir;

/// Replays canned answers in order and records every query it is sent
struct Scripted {
    answers: Mutex<Vec<sbolq_core::errors::Result<Vec<Row>>>>,
    sent: Mutex<Vec<String>>,
}

impl Scripted {
    fn new(answers: Vec<sbolq_core::errors::Result<Vec<Row>>>) -> Self {
        Self {
            answers: Mutex::new(answers),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Endpoint for Scripted {
    fn ask(&self, query: &str) -> sbolq_core::errors::Result<Vec<Row>> {
        self.sent.lock().unwrap().push(query.to_string());
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            return Ok(Vec::new());
        }
        answers.remove(0)
    }
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().copied().collect()
}

#[test]
fn test_search_sends_compiled_text() {
    let endpoint = Scripted::new(vec![Ok(vec![row(&[
        ("uri", "http://partsregistry.org/part/BBa_C0040"),
        ("displayId", "BBa_C0040"),
        ("name", "tetR"),
    ])])]);
    let client = SbolClient::new(&endpoint);
    let request = SearchRequest::new().keyword("tetR").category("cds");

    let records = client.search(&request).unwrap();

    assert_eq!(endpoint.sent(), vec![request.build().unwrap().compile()]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity(), Some("http://partsregistry.org/part/BBa_C0040"));
    assert_eq!(records[0].get("name"), Some("tetR"));
    assert_eq!(records[0].get("description"), None);
}

/// Test: no results and no endpoint are different outcomes
#[test]
fn test_zero_matches_versus_unreachable() {
    let endpoint = Scripted::new(vec![
        Ok(Vec::new()),
        Err(SbolError::Unreachable("connection refused".to_string())),
    ]);
    let client = SbolClient::new(&endpoint);
    let query = Query::new_query();

    assert!(client.execute(&query).unwrap().is_empty());
    assert!(matches!(client.execute(&query), Err(SbolError::Unreachable(_))));
}

#[test]
fn test_rejection_is_propagated() {
    let endpoint = Scripted::new(vec![Err(SbolError::QueryRejected {
        status: 400,
        message: "MALFORMED QUERY".to_string(),
    })]);
    let client = SbolClient::new(&endpoint);

    let err = client.execute(&Query::new_query()).unwrap_err();
    assert!(matches!(err, SbolError::QueryRejected { status: 400, .. }));
    assert!(!err.is_transport());
}

#[test]
fn test_dangling_order_key_refused() {
    let endpoint = Scripted::new(Vec::new());
    let client = SbolClient::new(&endpoint);

    let mut query = Query::new_query();
    query.order_by(Variable::new("length").unwrap(), Direction::Descending);

    match client.execute(&query) {
        Err(SbolError::UnboundVariable(name)) => assert_eq!(name, "length"),
        other => panic!("expected UnboundVariable, got {:?}", other),
    }
    assert!(endpoint.sent().is_empty());
}

/// Test: a variable selected after a caller-built pattern binds it is accepted
#[test]
fn test_selected_variable_bound_by_pattern() {
    let endpoint = Scripted::new(vec![Ok(vec![row(&[
        ("uri", "http://x/1"),
        ("displayId", "one"),
        ("seq", "_:b9"),
    ])])]);
    let client = SbolClient::new(&endpoint);

    let mut query = Query::new_query();
    let seq = Variable::new("seq").unwrap();
    query.add_pattern(
        TriplePattern::new(
            Variable::new("uri").unwrap(),
            sbolq_core::query::vocab::sbol::dna_sequence(),
            seq.clone(),
        ),
        Presence::Optional,
    );
    query.select(seq);

    let records = client.execute(&query).unwrap();
    assert_eq!(records[0].get("seq"), Some("_:b9"));
    assert!(endpoint.sent()[0].contains("SELECT ?uri ?displayId ?seq WHERE"));
}

#[test]
fn test_malformed_precedes_rows() {
    let endpoint = Scripted::new(vec![Ok(vec![row(&[("upstream", "http://x/a")])])]);
    let client = SbolClient::new(&endpoint);
    let part = sbolq_core::Iri::new("http://x/device").unwrap();

    let err = client.subcomponents(&part).unwrap_err();
    assert!(matches!(err, SbolError::MalformedResponse(_)));
}

#[test]
fn test_multiple_heads_from_endpoint() {
    let endpoint = Scripted::new(vec![Ok(vec![
        row(&[("upstream", "http://x/a"), ("downstream", "http://x/b")]),
        row(&[("upstream", "http://x/c"), ("downstream", "http://x/d")]),
    ])]);
    let client = SbolClient::new(&endpoint);
    let part = sbolq_core::Iri::new("http://x/device").unwrap();

    let err = client.subcomponents(&part).unwrap_err();
    assert!(matches!(err, SbolError::MalformedChain(_)));
    assert!(endpoint.sent()[0].contains("<http://x/device> sbol:annotation ?upstreamAnnotation"));
}

#[test]
fn test_endpoint_from_config_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("sbolq.yaml");
    std::fs::write(
        &path,
        "endpoint:\n  url: http://localhost:7200/repositories/parts\n  username: reader\n  password: secret\n  timeoutSecs: 3\nsearch:\n  defaultLimit: 25\n",
    )
    .unwrap();

    let config = SbolqConfig::load(&path).unwrap();
    let endpoint = HttpEndpoint::from_config(&config.endpoint).unwrap();

    assert_eq!(endpoint.url(), "http://localhost:7200/repositories/parts");
    let request = SearchRequest::new().limit(config.search.default_limit);
    assert!(request.build().unwrap().compile().ends_with("LIMIT 25"));
}
