//! Handler function types.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::binding::BoundParameters;
use crate::dispatch::result::HandlerResult;

/// Type alias for a boxed future that returns a handler result.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<HandlerResult, HandlerError>> + Send>>;

/// Type alias for a handler function that takes the bound parameters and returns a HandlerFuture.
pub type HandlerFn = Arc<dyn Fn(BoundParameters) -> HandlerFuture + Send + Sync>;

/// A failure raised by handler logic.
///
/// The dispatcher logs the details and answers with a generic 500; nothing
/// from this error reaches the client.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Application-level failure.
    #[error("{0}")]
    Message(String),

    /// A bound parameter was read with the wrong accessor or type.
    #[error("Parameter '{name}' unavailable: {reason}")]
    Parameter { name: String, reason: String },

    /// JSON serialization error while building the result.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn message(message: impl Into<String>) -> Self {
        HandlerError::Message(message.into())
    }

    pub(crate) fn parameter(name: &str, reason: impl Into<String>) -> Self {
        HandlerError::Parameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
