//! HTTP/1.x request parsing.
//!
//! This is the transport side of the engine: it turns raw bytes read from a
//! socket into an [`HttpRequest`] whose path, query string and body are
//! already separated, ready to be handed to the dispatcher.

mod request;
mod method;
mod error;
mod tests;

// Re-export public items
pub use request::{HttpRequest, HttpVersion};
pub use method::Method;
pub use error::Error;

pub use request::{content_length, find_header_end, parse_query, parse_request};
