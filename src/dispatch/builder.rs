//! Turning handler results into responses.

use std::collections::HashMap;

use crate::dispatch::error::DispatchError;
use crate::dispatch::result::{Entity, HandlerResult};
use crate::server::{HttpResponse, StatusCode};

/// Build the response for a handler result.
///
/// A bare entity is sent with `success_status` and only a `Content-Type`
/// header. A [`ResponseSpec`](crate::dispatch::ResponseSpec) supplies its own
/// status, and its headers are laid over the default `Content-Type`, winning
/// on a case-insensitive name collision.
///
/// # Errors
///
/// [`DispatchError::Serialization`] if the body cannot be encoded, and
/// [`DispatchError::InvalidHeader`] if a header name is not a token or a
/// value contains CR, LF or NUL.
pub fn build(result: HandlerResult, success_status: StatusCode) -> Result<HttpResponse, DispatchError> {
    match result {
        HandlerResult::Bare(entity) => render(success_status, &entity, HashMap::new()),
        HandlerResult::Wrapped(spec) => render(spec.status, &spec.body, spec.headers),
    }
}

fn render(
    status: StatusCode,
    entity: &Entity,
    headers: HashMap<String, String>,
) -> Result<HttpResponse, DispatchError> {
    let body = entity.encode()?;

    let response = headers.into_iter().fold(
        HttpResponse::new(status).with_content_type(entity.content_type()),
        |response, (name, value)| response.with_header(name, value),
    );

    if let Some(name) = response.invalid_header() {
        return Err(DispatchError::InvalidHeader(name.to_string()));
    }

    Ok(response.with_body_bytes(body))
}
