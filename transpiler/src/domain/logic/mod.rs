//! JSON-Logic expression model
//!
//! Provides the decoded expression tree and the paths used to point at nodes
//! in diagnostics.

mod node;
mod path;

pub(crate) use node::single_entry;
pub use node::{Node, Primitive};
pub use path::JsonPath;
