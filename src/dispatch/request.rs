//! The request as seen by the dispatcher.

use std::collections::HashMap;

use crate::parser::{HttpRequest, Method};

/// A transport-independent request.
///
/// The transport has already split the query string off `path` and decoded
/// it into `query_params`.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    pub query_params: HashMap<String, Vec<String>>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl IncomingRequest {
    /// A request with no query parameters, headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: HashMap::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Append a value to a query parameter.
    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.entry(name.into()).or_default().push(value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of a query parameter, in request order.
    pub fn query_values(&self, name: &str) -> &[String] {
        self.query_params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get a header value, ignoring the case of `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
    }
}

impl From<HttpRequest> for IncomingRequest {
    fn from(request: HttpRequest) -> Self {
        Self {
            method: request.method,
            path: request.path,
            query_params: request.query_params,
            headers: request.headers,
            body: request.body,
        }
    }
}
