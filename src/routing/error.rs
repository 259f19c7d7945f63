//! Error types for route registration and lookup.

use thiserror::Error;

use crate::parser::Method;

/// Errors raised while building the route table. All of them are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The path pattern could not be parsed.
    #[error("Malformed route template {pattern:?}: {reason}")]
    MalformedTemplate { pattern: String, reason: String },

    /// A route with the same method and template shape is already registered.
    ///
    /// Variable names are ignored when comparing templates: `students/{id}`
    /// and `students/{sid}` accept the same paths and conflict.
    #[error("Duplicate route: {method} {pattern}")]
    DuplicateRoute { method: Method, pattern: String },

    /// The declared parameter list does not fit the route.
    #[error("Invalid parameters for {method} {pattern}: {reason}")]
    InvalidParameters {
        method: Method,
        pattern: String,
        reason: String,
    },
}

/// Outcome of a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No route matches the path under any method.
    #[error("No route found for {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// The path matches routes, but only under other methods.
    #[error("Method {method} not allowed for path: {path}")]
    MethodNotAllowed {
        method: Method,
        path: String,
        allowed: Vec<Method>,
    },
}
