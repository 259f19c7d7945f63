//! Parameter binding.
//!
//! A handler declares its inputs as a list of [`ParamSpec`]s. Before the
//! handler runs, [`bind`] pulls each value out of the path variables, the
//! query string or the body, coerces it to the declared [`ParamType`], and
//! collects the results into [`BoundParameters`].

mod binder;
mod error;
mod spec;

pub use binder::bind;
pub use error::BindError;
pub use spec::{BoundParameters, BoundValue, EntityDecoder, ParamSource, ParamSpec, ParamType};

pub(crate) use spec::validate;
