//! HttpEndpoint for remote SPARQL protocol services
//!
//! Query text is POSTed as an urlencoded `query` form field. SELECT and ASK
//! answers come back as SPARQL JSON results; DESCRIBE answers as RDF/JSON.
//! The response `Content-Type` decides which of the two shapes is expected.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use crate::config::EndpointConfig;
use crate::endpoint::Endpoint;
use crate::errors::{Result, SbolError};
use crate::results::Row;

/// SPARQL 1.1 JSON results (SELECT, ASK)
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// RDF/JSON graphs (DESCRIBE)
pub const RDF_JSON: &str = "application/rdf+json";

/// Result formats requested from the endpoint
pub const ACCEPT_TYPES: &str = "application/sparql-results+json, application/rdf+json";

/// Longest rejection message kept from an error body
const MAX_MESSAGE_LEN: usize = 512;

/// Remote SPARQL endpoint
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    url: String,
    credentials: Option<(String, String)>,
    client: Client,
}

impl HttpEndpoint {
    /// Create new HttpEndpoint
    ///
    /// # Example
    ///
    /// ```
    /// use sbolq_core::endpoint::HttpEndpoint;
    /// use std::time::Duration;
    ///
    /// let endpoint = HttpEndpoint::new("http://localhost:8080/sparql", Duration::from_secs(5)).unwrap();
    /// assert_eq!(endpoint.url(), "http://localhost:8080/sparql");
    /// ```
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SbolError::ValidationError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            credentials: None,
            client,
        })
    }

    /// Add HTTP basic authentication
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Endpoint described by the `endpoint` section of the config file
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        let endpoint = Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))?;
        Ok(match &config.username {
            Some(user) => endpoint.with_auth(user.clone(), config.password.clone().unwrap_or_default()),
            None => endpoint,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Endpoint for HttpEndpoint {
    fn ask(&self, query: &str) -> Result<Vec<Row>> {
        debug!(url = %self.url, "sending query");

        let mut request = self
            .client
            .post(&self.url)
            .header(ACCEPT, ACCEPT_TYPES)
            .form(&[("query", query)]);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .map_err(|e| SbolError::Unreachable(format!("{}: {}", self.url, e)))?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .text()
            .map_err(|e| SbolError::Unreachable(format!("{}: {}", self.url, e)))?;

        if !status.is_success() {
            let mut message = body.trim().to_string();
            if message.len() > MAX_MESSAGE_LEN {
                let cut = (0..=MAX_MESSAGE_LEN).rev().find(|i| message.is_char_boundary(*i)).unwrap_or(0);
                message.truncate(cut);
            }
            return Err(SbolError::QueryRejected {
                status: status.as_u16(),
                message,
            });
        }

        parse_response(&content_type, &body)
    }
}

/// SPARQL JSON results: a solution table or a boolean, never both
#[derive(Deserialize)]
struct ResultsDocument {
    head: Head,
    results: Option<Bindings>,
    boolean: Option<bool>,
}

#[derive(Deserialize)]
struct Head {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct Bindings {
    bindings: Vec<BTreeMap<String, Value>>,
}

/// RDF/JSON: subject → predicate → objects
type GraphDocument = BTreeMap<String, BTreeMap<String, Vec<Value>>>;

#[derive(Deserialize)]
struct Value {
    #[serde(rename = "type")]
    kind: ValueKind,
    value: String,
}

#[derive(Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum ValueKind {
    Uri,
    Literal,
    TypedLiteral,
    Bnode,
}

impl Value {
    fn into_text(self) -> String {
        if self.kind == ValueKind::Bnode {
            return blank_label(&self.value).to_string();
        }
        self.value
    }
}

fn blank_label(value: &str) -> &str {
    value.strip_prefix("_:").unwrap_or(value)
}

fn malformed(message: impl std::fmt::Display) -> SbolError {
    SbolError::MalformedResponse(message.to_string())
}

/// Media type without parameters, lower-cased
fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Parse an endpoint answer into rows, using `content_type` to pick the format.
///
/// SPARQL JSON solution rows follow the column order of `head.vars`;
/// unbound columns are absent, and a boolean answer becomes a single
/// `boolean` row. An RDF/JSON graph becomes one
/// `subject`/`predicate`/`object` row per triple. A body that does not have
/// the shape its content type promises is a
/// [`SbolError::MalformedResponse`], never an empty answer.
///
/// # Example
///
/// ```
/// use sbolq_core::endpoint::{parse_response, SPARQL_RESULTS_JSON};
///
/// let body = r#"{"head":{"vars":["uri","name"]},
///     "results":{"bindings":[{"uri":{"type":"uri","value":"http://x/1"}}]}}"#;
/// let rows = parse_response(SPARQL_RESULTS_JSON, body).unwrap();
/// assert_eq!(rows[0].get("uri"), Some("http://x/1"));
/// assert_eq!(rows[0].get("name"), None);
///
/// assert!(parse_response(SPARQL_RESULTS_JSON, "{}").is_err());
/// ```
pub fn parse_response(content_type: &str, body: &str) -> Result<Vec<Row>> {
    match media_type(content_type).as_str() {
        SPARQL_RESULTS_JSON | "application/json" => parse_results(body),
        RDF_JSON => parse_graph(body),
        other => Err(malformed(format!("unexpected content type '{}'", other))),
    }
}

fn parse_results(body: &str) -> Result<Vec<Row>> {
    let document: ResultsDocument =
        serde_json::from_str(body).map_err(|e| malformed(format!("Failed to parse results: {}", e)))?;

    match (document.results, document.boolean) {
        (Some(results), None) => Ok(results
            .bindings
            .into_iter()
            .map(|mut binding| {
                let mut row = Row::new();
                for var in &document.head.vars {
                    if let Some(value) = binding.remove(var) {
                        row.insert(var.clone(), value.into_text());
                    }
                }
                // Bindings outside head.vars are kept after the declared columns
                for (var, value) in binding {
                    row.insert(var, value.into_text());
                }
                row
            })
            .collect()),
        (None, Some(boolean)) => Ok(vec![[("boolean", boolean.to_string())].into_iter().collect()]),
        (Some(_), Some(_)) => Err(malformed("results document carries both bindings and a boolean")),
        (None, None) => Err(malformed("results document carries neither bindings nor a boolean")),
    }
}

fn parse_graph(body: &str) -> Result<Vec<Row>> {
    let graph: GraphDocument =
        serde_json::from_str(body).map_err(|e| malformed(format!("Failed to parse graph: {}", e)))?;

    let mut rows = Vec::new();
    for (subject, predicates) in graph {
        if predicates.is_empty() {
            return Err(malformed(format!("graph subject '{}' has no predicates", subject)));
        }
        for (predicate, objects) in predicates {
            if objects.is_empty() {
                return Err(malformed(format!("graph predicate '{}' has no objects", predicate)));
            }
            for object in objects {
                let mut row = Row::new();
                row.insert("subject", blank_label(&subject));
                row.insert("predicate", predicate.clone());
                row.insert("object", object.into_text());
                rows.push(row);
            }
        }
    }
    Ok(rows)
}
