//! Error types for viewdex.

use crate::types::ValueShape;
use alloc::string::{String, ToString};

/// Result type alias for viewdex operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for viewdex operations.
///
/// Incomplete documents are never errors: map functions skip them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document body is not an object or has no usable id.
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },
    /// The input text is not valid JSON.
    #[error("Malformed JSON: {message}")]
    Json { message: String },
    /// The configured reducer cannot aggregate what the map function emits.
    #[error("View {view}: reducer {reducer} cannot aggregate {shape} values")]
    ReduceShapeMismatch {
        view: String,
        reducer: String,
        shape: ValueShape,
    },
    /// A reduce query was issued against a view without a reducer.
    #[error("View {view} has no reduce function")]
    NoReducer { view: String },
    /// Invalid view configuration.
    #[error("Invalid view configuration: {message}")]
    InvalidConfig { message: String },
    /// Invalid combination of query options.
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },
}

impl Error {
    /// Creates an invalid document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Error::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a JSON error from any displayable parser error.
    pub fn json(err: impl core::fmt::Display) -> Self {
        Error::Json {
            message: err.to_string(),
        }
    }

    /// Creates a reduce shape mismatch error.
    pub fn reduce_shape_mismatch(
        view: impl Into<String>,
        reducer: impl Into<String>,
        shape: ValueShape,
    ) -> Self {
        Error::ReduceShapeMismatch {
            view: view.into(),
            reducer: reducer.into(),
            shape,
        }
    }

    /// Creates a missing reducer error.
    pub fn no_reducer(view: impl Into<String>) -> Self {
        Error::NoReducer { view: view.into() }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Error::InvalidQuery {
            message: message.into(),
        }
    }

    /// Returns true for errors that are raised while configuring a view
    /// rather than while serving it.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ReduceShapeMismatch { .. } | Error::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::reduce_shape_mismatch("latest", "max", ValueShape::Document);
        let text = err.to_string();
        assert!(text.contains("latest"));
        assert!(text.contains("max"));
        assert!(text.contains("document"));

        let err = Error::no_reducer("byFingerprint");
        assert!(err.to_string().contains("byFingerprint"));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::invalid_config("shards must be at least 1").is_configuration());
        assert!(Error::reduce_shape_mismatch("v", "max", ValueShape::Any).is_configuration());
        assert!(!Error::invalid_query("group requires reduce").is_configuration());
        match Error::invalid_document("not an object") {
            Error::InvalidDocument { message } => assert_eq!(message, "not an object"),
            _ => panic!("Wrong error type"),
        }
    }
}
