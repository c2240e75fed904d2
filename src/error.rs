//! Unified SDK error types.

use std::fmt;

use thiserror::Error;

use crate::graphql::GraphqlError;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("GraphQL error: {0}")]
    Graphql(#[from] GraphqlErrors),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Per-endpoint failures when every endpoint was unreachable.
    pub fn transport_failures(&self) -> Option<&[TransportFailure]> {
        match self {
            SdkError::Http(HttpError::AllEndpointsUnreachable { failures }) => Some(failures),
            _ => None,
        }
    }

    pub fn is_authentication_required(&self) -> bool {
        matches!(self, SdkError::Auth(AuthError::AuthenticationRequired))
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error(
        "All {} endpoints unreachable: {}",
        .failures.len(),
        summarize(.failures)
    )]
    AllEndpointsUnreachable { failures: Vec<TransportFailure> },

    #[error("Invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[cfg(feature = "http")]
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

fn summarize(failures: &[TransportFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication required: no auth token available")]
    AuthenticationRequired,
}

/// A single endpoint attempt that failed before a usable reply came back.
///
/// These never surface on their own; the fallback loop collects them into
/// [`HttpError::AllEndpointsUnreachable`] once every endpoint has been tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub endpoint: String,
    /// One-based attempt number: the endpoint's position in the list plus one.
    /// Logs use the same numbering.
    pub attempt: usize,
    pub kind: TransportFailureKind,
    pub message: String,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.attempt, self.endpoint, self.kind, self.message
        )
    }
}

/// Why an endpoint attempt counted as a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// Connection refused, DNS failure, TLS handshake failure.
    Connect,
    Timeout,
    /// The request could not be sent for another reason.
    Request,
    /// The response body could not be read.
    Body,
    /// The response body was not JSON.
    InvalidJson,
}

impl TransportFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
            Self::Body => "body",
            Self::InvalidJson => "invalid_json",
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// GraphQL-level errors promoted to a failure by
/// [`GraphqlResponse::into_result`](crate::graphql::GraphqlResponse::into_result).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", messages(.0))]
pub struct GraphqlErrors(pub Vec<GraphqlError>);

fn messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl GraphqlErrors {
    pub fn first_message(&self) -> Option<&str> {
        self.0.first().map(|e| e.message.as_str())
    }
}
