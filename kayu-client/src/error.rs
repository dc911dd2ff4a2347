//! Request error types.

use kayu_core::DecodeError;
use thiserror::Error;

use crate::GraphQLResponseError;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Everything that can go wrong while performing an operation.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The response body was not a GraphQL response, or its data did not
    /// match the selection.
    #[error("Bad payload: {0}")]
    BadPayload(#[from] DecodeError),

    /// The server answered with a non-success status code.
    #[error("Bad status: {status}")]
    BadStatus { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server returned GraphQL errors.
    #[error("GraphQL errors: {}", format_errors(.0))]
    GraphQL(Vec<GraphQLResponseError>),

    /// Invalid client or request configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RequestError {
    /// Check if this is a network error.
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if the response failed to decode.
    pub fn is_bad_payload(&self) -> bool {
        matches!(self, Self::BadPayload(_))
    }

    /// Check if this is a non-success status.
    pub fn is_bad_status(&self) -> bool {
        matches!(self, Self::BadStatus { .. })
    }

    /// Check if this is a GraphQL error (server-side).
    pub fn is_graphql_error(&self) -> bool {
        matches!(self, Self::GraphQL(_))
    }

    /// HTTP status code, if the server answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get GraphQL errors if this is a GraphQL error.
    pub fn graphql_errors(&self) -> Option<&[GraphQLResponseError]> {
        match self {
            Self::GraphQL(errors) => Some(errors),
            _ => None,
        }
    }
}

fn format_errors(errors: &[GraphQLResponseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
