//! Decoding error types.

use thiserror::Error;

/// Result type for selection and decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// A response fragment did not match the selection that requested it.
///
/// Every variant is a bad-payload condition: the server answered, but not in
/// the shape the selection describes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// An aliased key was missing from a response object.
    #[error("Missing field `{key}` in response")]
    MissingField { key: String },

    /// A value required to be non-null was null.
    #[error("Expected non-null value")]
    UnexpectedNull,

    /// The `__typename` of a fragment matched none of the offered types.
    #[error("Unknown type `{typename}`, expected one of {expected:?}")]
    UnknownVariant {
        typename: String,
        expected: Vec<String>,
    },

    /// A fragment that needs narrowing carried no `__typename`.
    #[error("Missing `__typename` in response")]
    MissingTypename,

    /// A union selection offered no concrete types.
    #[error("Fragment selection offers no types")]
    NoVariants,

    /// A value had the wrong JSON type.
    #[error("Invalid value: expected {expected}, found {found}")]
    InvalidValue {
        expected: &'static str,
        found: String,
    },

    /// Typed conversion through serde failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    /// Build an [`DecodeError::InvalidValue`] describing the offending JSON.
    pub fn invalid(expected: &'static str, found: &serde_json::Value) -> Self {
        Self::InvalidValue {
            expected,
            found: found.to_string(),
        }
    }

    /// Check if this is a bad-payload error. Every decode failure is.
    pub fn is_bad_payload(&self) -> bool {
        true
    }

    /// Check if this error came from union or interface narrowing.
    pub fn is_variant_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownVariant { .. } | Self::MissingTypename | Self::NoVariants
        )
    }
}
