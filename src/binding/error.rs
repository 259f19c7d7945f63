//! Error types for parameter binding.

use thiserror::Error;

/// Why a request could not be bound to a handler's parameters.
///
/// Every variant names the offending parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required parameter is absent from the request.
    #[error("Required parameter '{0}' is missing")]
    MissingParameter(String),

    /// A value is present but cannot be coerced to the declared type.
    #[error("Parameter '{parameter}' expected {expected} but got {raw:?}")]
    TypeMismatch {
        parameter: String,
        raw: String,
        expected: &'static str,
    },

    /// The request body is empty or does not decode into the declared entity.
    #[error("Malformed body for parameter '{parameter}': {reason}")]
    MalformedBody { parameter: String, reason: String },
}

impl BindError {
    /// Name of the parameter that failed to bind.
    pub fn parameter(&self) -> &str {
        match self {
            BindError::MissingParameter(name) => name,
            BindError::TypeMismatch { parameter, .. } => parameter,
            BindError::MalformedBody { parameter, .. } => parameter,
        }
    }
}
