//! HTTP/1.1 transport for the dispatcher.
//!
//! This module accepts TCP connections, parses each request with the
//! microroute-rs parser, hands it to a [`Dispatcher`](crate::Dispatcher) and
//! writes the response back.

mod response;
mod config;
mod error;
mod http_server;

// Re-export public items
pub use response::{is_valid_header, HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
