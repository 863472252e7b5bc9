//! Workspace-wide error taxonomy
//!
//! Four families of failure, matching what callers can actually do about them:
//! - Validation: malformed input caught before any external call
//! - Transport: timeout / connection refused / non-2xx, never retried here
//! - NotImplemented: a declared but unbuilt provider branch
//! - everything else: subsystem errors carried as strings

use thiserror::Error;

/// Transport failure cause, kept distinct so callers can pattern-match
/// on category (timeout vs connection vs HTTP status).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input rejected before any external call
    #[error("validation error: {0}")]
    Validation(String),

    /// Outbound call failed at the transport level
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Provider tag outside the known set for a strict factory
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Declared provider branch that has not been built
    #[error("provider not implemented: {0}")]
    NotImplemented(String),

    /// Backend constructor failed (bad options, unreadable model path)
    #[error("construction failed: {0}")]
    Construction(String),

    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Entity already exists (e.g. create_collection on an existing name)
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("llm error: {0}")]
    Llm(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("vector store error: {0}")]
    Store(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the caller can fix the failure by correcting input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// True when the failure is a deployment gap, not a bug
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Error::NotImplemented(_))
    }

    /// True when the entity already exists
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// True when the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Convenience alias used across all crates
pub type Result<T> = std::result::Result<T, Error>;
