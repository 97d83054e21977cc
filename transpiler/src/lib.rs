//! Compile JSON-Logic expressions into SQL `WHERE` clauses
//!
//! Supported targets are BigQuery, Spanner, PostgreSQL, DuckDB and
//! ClickHouse. A [`Transpiler`] is configured once with a dialect, an
//! optional field [`Schema`] and a registry of custom operators, then
//! shared freely across threads.
//!
//! ```no_run
//! use jsonlogic_sql::{Dialect, Transpiler};
//!
//! let transpiler = Transpiler::new(Dialect::PostgreSQL);
//! let sql = transpiler.compile(r#"{"<": [0, {"var": "x"}, 100]}"#)?;
//! assert_eq!(sql, "WHERE (0 < x AND x < 100)");
//! # Ok::<(), jsonlogic_sql::TranspileError>(())
//! ```

pub mod app;
pub mod core;
pub mod domain;
pub mod sql;
pub mod utils;

pub use domain::custom::{
    CustomOperator, CustomOperatorRegistry, DialectAwareOperatorHandler, OperatorHandler,
    RegistryError,
};
pub use domain::logic::{JsonPath, Node, Primitive};
pub use domain::schema::{FieldSchema, FieldType, Schema, SchemaError, SchemaProvider};
pub use domain::transpiler::{
    BoxError, DEFAULT_MAX_DEPTH, ErrorKind, TranspileError, Transpiler, TranspilerBuilder,
};
pub use sql::{Dialect, DialectError, SqlDialect};
