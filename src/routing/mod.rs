//! Route templates and the sealed route table.
//!
//! Routes are registered on a [`RouteTableBuilder`] during startup and then
//! sealed into a [`RouteTable`], which has no mutating API and can be shared
//! between workers without locking.

mod error;
mod table;
mod template;

pub use error::{ResolveError, RouteError};
pub use table::{Route, RouteMatch, RouteTable, RouteTableBuilder};
pub use template::{PathTemplate, PathVariables, Segment};
