//! SQL abstraction layer for multi-dialect code generation
//!
//! This module provides the closed set of target dialects and the
//! [`SqlDialect`] trait that hides engine-specific syntax (array iteration,
//! string search, literal quoting) from the operator compilers.

mod bigquery_dialect;
mod clickhouse_dialect;
mod dialect;
mod duckdb_dialect;
mod postgres_dialect;
mod spanner_dialect;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bigquery_dialect::BigqueryDialect;
pub use clickhouse_dialect::ClickhouseDialect;
pub use dialect::{ACCUMULATOR_ALIAS, ArrayAggregate, ELEMENT_ALIAS, ReduceStrategy, SqlDialect};
pub use duckdb_dialect::DuckdbDialect;
pub use postgres_dialect::PostgresDialect;
pub use spanner_dialect::SpannerDialect;

use crate::utils::sql::quote_ansi;

/// Error raised when a dialect cannot be used for code generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialectError {
    #[error(
        "dialect '{0}' is not a supported SQL target (expected one of: bigquery, spanner, postgresql, duckdb, clickhouse)"
    )]
    Unsupported(String),
}

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(alias = "bq")]
    BigQuery,
    Spanner,
    #[serde(alias = "postgres")]
    PostgreSQL,
    DuckDB,
    ClickHouse,
    Unspecified,
}

impl Dialect {
    /// The five dialects code can be generated for
    pub const SUPPORTED: [Dialect; 5] = [
        Dialect::BigQuery,
        Dialect::Spanner,
        Dialect::PostgreSQL,
        Dialect::DuckDB,
        Dialect::ClickHouse,
    ];

    /// Get the dialect name
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::BigQuery => "bigquery",
            Dialect::Spanner => "spanner",
            Dialect::PostgreSQL => "postgresql",
            Dialect::DuckDB => "duckdb",
            Dialect::ClickHouse => "clickhouse",
            Dialect::Unspecified => "unspecified",
        }
    }

    /// Get the SQL generator for this dialect, if it is a concrete one
    pub fn sql(&self) -> Option<&'static dyn SqlDialect> {
        match self {
            Dialect::BigQuery => Some(&BigqueryDialect),
            Dialect::Spanner => Some(&SpannerDialect),
            Dialect::PostgreSQL => Some(&PostgresDialect),
            Dialect::DuckDB => Some(&DuckdbDialect),
            Dialect::ClickHouse => Some(&ClickhouseDialect),
            Dialect::Unspecified => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.sql().is_some()
    }

    /// Check that code can be generated for this dialect
    ///
    /// Returns the SQL generator on success so callers validate and resolve
    /// in one step.
    pub fn validate(&self) -> Result<&'static dyn SqlDialect, DialectError> {
        self.sql()
            .ok_or_else(|| DialectError::Unsupported(self.name().to_string()))
    }

    /// Quote a string literal for this dialect
    ///
    /// Falls back to ANSI quote doubling when no dialect is selected; literal
    /// quoting never requires a concrete target.
    pub fn quote_string(&self, value: &str) -> String {
        match self.sql() {
            Some(sql) => sql.quote_string(value),
            None => quote_ansi(value),
        }
    }

    /// Whether this dialect's string literals use backslash escapes
    pub fn backslash_escapes(&self) -> bool {
        self.sql().is_some_and(|sql| sql.backslash_escapes())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bigquery" | "bq" => Ok(Dialect::BigQuery),
            "spanner" => Ok(Dialect::Spanner),
            "postgresql" | "postgres" => Ok(Dialect::PostgreSQL),
            "duckdb" => Ok(Dialect::DuckDB),
            "clickhouse" => Ok(Dialect::ClickHouse),
            _ => Err(DialectError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_dialects_are_valid() {
        for dialect in Dialect::SUPPORTED {
            assert!(dialect.is_valid(), "{} should be valid", dialect);
            assert_eq!(dialect.validate().unwrap().name(), dialect.name());
        }
    }

    #[test]
    fn test_unspecified_is_invalid() {
        assert!(!Dialect::Unspecified.is_valid());
        let err = Dialect::Unspecified.validate().err().unwrap();
        assert!(err.to_string().contains("'unspecified'"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("BigQuery".parse::<Dialect>().unwrap(), Dialect::BigQuery);
        assert_eq!("postgres".parse::<Dialect>().unwrap(), Dialect::PostgreSQL);
        assert_eq!(" duckdb ".parse::<Dialect>().unwrap(), Dialect::DuckDB);
        assert!("oracle".parse::<Dialect>().is_err());
        // Unspecified is never produced by parsing
        assert!("unspecified".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_serde() {
        let dialect: Dialect = serde_json::from_str(r#""clickhouse""#).unwrap();
        assert_eq!(dialect, Dialect::ClickHouse);
        let dialect: Dialect = serde_json::from_str(r#""postgres""#).unwrap();
        assert_eq!(dialect, Dialect::PostgreSQL);
        assert_eq!(serde_json::to_string(&Dialect::BigQuery).unwrap(), r#""bigquery""#);
    }

    #[test]
    fn test_quote_string_fallback() {
        assert_eq!(Dialect::Unspecified.quote_string("it's"), "'it''s'");
        assert_eq!(Dialect::PostgreSQL.quote_string("it's"), "'it''s'");
        assert_eq!(Dialect::BigQuery.quote_string("it's"), r"'it\'s'");
    }
}
