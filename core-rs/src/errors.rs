//! Error types for the SBOL query core

use thiserror::Error;

/// Why a set of precedes edges cannot be read as a single ordered chain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainDefect {
    #[error("no head part (every part has a predecessor, the edges form a cycle)")]
    NoHead,

    #[error("more than one head part: {}", .0.join(", "))]
    MultipleHeads(Vec<String>),

    #[error("part {0} precedes more than one part")]
    Branch(String),

    #[error("part {0} is preceded by more than one part")]
    Merge(String),

    #[error("walk reached {reached} of {total} parts (detached cycle)")]
    Disconnected { reached: usize, total: usize },

    #[error("part {0} contains itself")]
    SelfContaining(String),
}

#[derive(Error, Debug)]
pub enum SbolError {
    #[error("Unbound variable: ?{0} is projected or filtered but never bound by a pattern")]
    UnboundVariable(String),

    #[error("Endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Query rejected by endpoint (status {status}): {message}")]
    QueryRejected { status: u16, message: String },

    #[error("Malformed chain: {0}")]
    MalformedChain(ChainDefect),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ChainDefect> for SbolError {
    fn from(defect: ChainDefect) -> Self {
        SbolError::MalformedChain(defect)
    }
}

impl SbolError {
    /// True for failures of the transport itself (as opposed to the query or its data)
    pub fn is_transport(&self) -> bool {
        matches!(self, SbolError::Unreachable(_) | SbolError::MalformedResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, SbolError>;
