//! What handlers return.

use std::collections::HashMap;

use serde::Serialize;

use crate::codec;
use crate::dispatch::handler::HandlerError;
use crate::server::StatusCode;

/// A response body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// An entity or collection, sent as JSON.
    Json(serde_json::Value),
    /// Plain text, sent as-is.
    Text(String),
}

impl Entity {
    /// Capture any serializable value, including collections.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        Ok(Entity::Json(serde_json::to_value(value)?))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Entity::Text(text.into())
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Entity::Json(_) => codec::CONTENT_TYPE,
            Entity::Text(_) => "text/plain; charset=utf-8",
        }
    }

    /// Encode the body.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Entity::Json(value) => codec::encode(value),
            Entity::Text(text) => Ok(text.as_bytes().to_vec()),
        }
    }
}

/// An explicit response: status, extra headers and body.
///
/// ```
/// use microroute_rs::{Entity, ResponseSpec, StatusCode};
///
/// let spec = ResponseSpec::ok(Entity::text("saved"))
///     .with_header("custom-header", "Alexandru");
/// assert_eq!(spec.status, StatusCode::OK);
/// assert_eq!(spec.headers["custom-header"], "Alexandru");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Entity,
}

impl ResponseSpec {
    pub fn new(status: StatusCode, body: Entity) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// A 200 response.
    pub fn ok(body: Entity) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The value a handler produces.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResult {
    /// Sent with the route's success status.
    Bare(Entity),
    /// Sent with the status and headers it carries.
    Wrapped(ResponseSpec),
}

impl HandlerResult {
    /// A bare JSON entity.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, HandlerError> {
        Entity::json(value).map(HandlerResult::Bare)
    }

    /// A bare text entity.
    pub fn text(text: impl Into<String>) -> Self {
        HandlerResult::Bare(Entity::text(text))
    }
}

impl From<Entity> for HandlerResult {
    fn from(entity: Entity) -> Self {
        HandlerResult::Bare(entity)
    }
}

impl From<ResponseSpec> for HandlerResult {
    fn from(spec: ResponseSpec) -> Self {
        HandlerResult::Wrapped(spec)
    }
}
