//! Per-request errors and their responses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::BindError;
use crate::codec;
use crate::routing::ResolveError;
use crate::server::{HttpResponse, StatusCode};

/// Why a request did not reach a successful response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route, or no route for this method.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The request did not bind to the handler's parameters.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The handler returned an error or panicked.
    #[error("Handler failed: {0}")]
    HandlerFailure(String),

    /// The handler's result could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The handler set a header that cannot be written as a single header line.
    #[error("Invalid response header {0:?}")]
    InvalidHeader(String),
}

impl DispatchError {
    /// The status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::Resolve(ResolveError::RouteNotFound { .. }) => StatusCode::NOT_FOUND,
            DispatchError::Resolve(ResolveError::MethodNotAllowed { .. }) => StatusCode::METHOD_NOT_ALLOWED,
            DispatchError::Bind(_) => StatusCode::BAD_REQUEST,
            DispatchError::HandlerFailure(_)
            | DispatchError::Serialization(_)
            | DispatchError::InvalidHeader(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind, sent as `error` in the body.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Resolve(ResolveError::RouteNotFound { .. }) => "route_not_found",
            DispatchError::Resolve(ResolveError::MethodNotAllowed { .. }) => "method_not_allowed",
            DispatchError::Bind(BindError::MissingParameter(_)) => "missing_parameter",
            DispatchError::Bind(BindError::TypeMismatch { .. }) => "type_mismatch",
            DispatchError::Bind(BindError::MalformedBody { .. }) => "malformed_body",
            DispatchError::HandlerFailure(_) => "handler_failure",
            DispatchError::Serialization(_) => "serialization_failure",
            DispatchError::InvalidHeader(_) => "invalid_header",
        }
    }

    /// The client-facing body. Server errors get a generic message.
    pub fn body(&self) -> ErrorBody {
        let message = if self.status().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        ErrorBody {
            error: self.kind().to_string(),
            message,
            parameter: match self {
                DispatchError::Bind(err) => Some(err.parameter().to_string()),
                _ => None,
            },
        }
    }

    /// Render the error response, with an `Allow` header for 405.
    pub fn into_response(self) -> HttpResponse {
        // ErrorBody holds only strings, so encoding cannot fail in practice
        let body = codec::encode(&self.body()).unwrap_or_default();
        let response = HttpResponse::new(self.status())
            .with_content_type(codec::CONTENT_TYPE)
            .with_body_bytes(body);

        match self {
            DispatchError::Resolve(ResolveError::MethodNotAllowed { allowed, .. }) => {
                let allowed: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
                response.with_header("Allow", allowed.join(", "))
            }
            _ => response,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind, e.g. `type_mismatch`.
    pub error: String,
    pub message: String,
    /// The offending parameter, for binding errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}
