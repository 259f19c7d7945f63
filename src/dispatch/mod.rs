//! Request dispatch: resolve, bind, invoke, build.
//!
//! [`Dispatcher::handle`] drives one request through the four phases and
//! always produces an [`HttpResponse`](crate::server::HttpResponse); failures
//! in any phase are translated into a structured error response.

mod builder;
mod dispatcher;
mod error;
mod handler;
mod request;
mod result;
mod tests;

pub use builder::build;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, ErrorBody};
pub use handler::{HandlerError, HandlerFn, HandlerFuture};
pub use request::IncomingRequest;
pub use result::{Entity, HandlerResult, ResponseSpec};
