//! Optional field schema
//!
//! When a schema is attached to a transpiler, field references are checked
//! for existence, enum comparisons against their allowed values, numeric
//! operators against numeric fields, and `!!` picks a type-specific
//! truthiness test.

mod json_schema;
mod provider;

pub use json_schema::{FieldSchema, Schema};
pub use provider::{FieldType, SchemaError, SchemaProvider};
