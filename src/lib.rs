//! A minimal HTTP routing and parameter binding engine.
//!
//! Handlers are registered against route templates such as `students/{id}`,
//! each with a declarative list of the parameters it needs. For every request
//! the [`Dispatcher`] finds the most specific matching route, binds path
//! variables, query parameters and the JSON body to the declared types, runs
//! the handler and builds the response from what it returns.
//!
//! # Features
//!
//! - Path templates with literal and `{variable}` segments
//! - Specificity-based route selection: `students/query` beats `students/{id}`
//! - Distinct 404 and 405 outcomes, with an `Allow` header on 405
//! - Typed path and query parameters with precise 400 errors
//! - JSON request bodies decoded into `serde` types
//! - Bare entities or explicit responses with status and headers
//! - Handler failures and panics contained as 500 responses
//! - A small tokio-based HTTP/1.1 server to run it all
//!
//! # Examples
//!
//! ## Routing and binding
//!
//! ```
//! use microroute_rs::{
//!     Dispatcher, HandlerResult, IncomingRequest, Method, ParamSpec, ParamType, RouteTable, StatusCode,
//! };
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Student {
//!     id: i64,
//!     name: String,
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut routes = RouteTable::builder();
//! routes.register(
//!     Method::GET,
//!     "students/{id}",
//!     vec![ParamSpec::path("id", ParamType::Integer)],
//!     StatusCode::OK,
//!     |params| async move {
//!         let student = Student { id: params.integer("id")?, name: "Valentin".to_string() };
//!         HandlerResult::json(&student)
//!     },
//! )?;
//!
//! let dispatcher = Dispatcher::new(routes.seal());
//!
//! let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/7")).await;
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(response.body, br#"{"id":7,"name":"Valentin"}"#.to_vec());
//!
//! let response = dispatcher.handle(IncomingRequest::new(Method::GET, "/students/seven")).await;
//! assert_eq!(response.status, StatusCode::BAD_REQUEST);
//! # Ok(())
//! # }
//! ```
//!
//! ## Serving over HTTP
//!
//! ```no_run
//! use microroute_rs::{Dispatcher, HttpServer, RouteTable, ServerConfig};
//!
//! # async fn run(routes: RouteTable) -> Result<(), microroute_rs::ServerError> {
//! let server = HttpServer::new(ServerConfig::default(), Dispatcher::new(routes));
//! server.start().await
//! # }
//! ```
//!
//! See `demos/student_service.rs` for a complete service.

pub mod binding;
pub mod codec;
pub mod dispatch;
pub mod parser;
pub mod routing;
pub mod server;

// Re-export commonly used items for convenience
pub use binding::{BindError, BoundParameters, ParamSource, ParamSpec, ParamType};
pub use dispatch::{
    DispatchError, Dispatcher, Entity, ErrorBody, HandlerError, HandlerResult, IncomingRequest, ResponseSpec,
};
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use routing::{PathTemplate, ResolveError, RouteError, RouteTable, RouteTableBuilder};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
