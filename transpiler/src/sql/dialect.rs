//! SQL dialect trait for multi-engine code generation
//!
//! This trait defines the interface for generating engine-specific SQL syntax.
//! Default method bodies produce the correlated `UNNEST` subquery forms shared
//! by BigQuery, Spanner, PostgreSQL and DuckDB; ClickHouse overrides the array
//! hooks with its native lambda functions.

use crate::utils::sql::{enclose, quote_ansi};

/// Canonical identifier bound to the current array element
pub const ELEMENT_ALIAS: &str = "elem";

/// Identifier bound to the running accumulator inside a native fold
pub const ACCUMULATOR_ALIAS: &str = "acc";

/// Aggregates recognised by the `reduce` fast path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayAggregate {
    Sum,
    Min,
    Max,
}

impl ArrayAggregate {
    /// SQL aggregate function name
    pub fn function(&self) -> &'static str {
        match self {
            ArrayAggregate::Sum => "SUM",
            ArrayAggregate::Min => "MIN",
            ArrayAggregate::Max => "MAX",
        }
    }
}

/// How a general (non-aggregate) `reduce` is lowered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceStrategy {
    /// Single-row subquery with the accumulator replaced by the initial value.
    /// Not a true fold: only correct for arrays with at most one element.
    SingleRow,
    /// Native left fold with the accumulator bound to [`ACCUMULATOR_ALIAS`]
    Fold,
}

/// SQL dialect trait for generating engine-specific SQL
///
/// Different engines have different syntax for:
/// - String literal escaping
/// - Array literals and array iteration
/// - Substring search and array length
/// - Numeric casts and modulo
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Quote a string literal
    ///
    /// - PostgreSQL/DuckDB: `'it''s'`
    /// - BigQuery/Spanner/ClickHouse: `'it\'s'`
    fn quote_string(&self, value: &str) -> String {
        quote_ansi(value)
    }

    /// Whether string literals produced by [`Self::quote_string`] use
    /// backslash escapes
    fn backslash_escapes(&self) -> bool {
        false
    }

    /// Render an array literal from already-rendered elements
    ///
    /// - Most: `[1, 2, 3]`
    /// - PostgreSQL: `ARRAY[1, 2, 3]`
    fn array_literal(&self, elements: &[String]) -> String {
        format!("[{}]", elements.join(", "))
    }

    /// 1-based position of `needle` inside `haystack`, 0 when absent
    ///
    /// - BigQuery/Spanner: `STRPOS(haystack, needle)`
    /// - PostgreSQL/DuckDB: `POSITION(needle IN haystack)`
    /// - ClickHouse: `position(haystack, needle)`
    fn string_position(&self, haystack: &str, needle: &str) -> String;

    /// Number of elements in an array
    ///
    /// - BigQuery/Spanner: `ARRAY_LENGTH(col)`
    /// - PostgreSQL: `CARDINALITY(col)`
    /// - DuckDB/ClickHouse: `length(col)`
    fn array_length(&self, array: &str) -> String;

    /// Cast an expression to a numeric type (unary `+`)
    fn numeric_cast(&self, expr: &str) -> String {
        format!("CAST({} AS NUMERIC)", expr)
    }

    /// Remainder of `left / right`
    fn modulo(&self, left: &str, right: &str) -> String {
        format!("{} % {}", left, right)
    }

    /// Concatenate one or more arrays
    fn array_concat(&self, arrays: &[String]) -> String {
        format!("ARRAY_CONCAT({})", arrays.join(", "))
    }

    /// Transform every element (`map`)
    fn array_map(&self, source: &str, transform: &str) -> String {
        format!("ARRAY(SELECT {} FROM {})", transform, unnest(source))
    }

    /// Keep the elements matching a predicate (`filter`)
    fn array_filter(&self, source: &str, predicate: &str) -> String {
        format!(
            "ARRAY(SELECT {} FROM {} WHERE {})",
            ELEMENT_ALIAS,
            unnest(source),
            predicate
        )
    }

    /// True when every element matches (`all`)
    fn array_all(&self, source: &str, predicate: &str) -> String {
        format!(
            "NOT EXISTS (SELECT 1 FROM {} WHERE NOT {})",
            unnest(source),
            enclose(predicate.to_string(), self.backslash_escapes())
        )
    }

    /// True when at least one element matches (`some`)
    fn array_some(&self, source: &str, predicate: &str) -> String {
        format!("EXISTS (SELECT 1 FROM {} WHERE {})", unnest(source), predicate)
    }

    /// True when no element matches (`none`)
    fn array_none(&self, source: &str, predicate: &str) -> String {
        format!(
            "NOT EXISTS (SELECT 1 FROM {} WHERE {})",
            unnest(source),
            predicate
        )
    }

    /// Combine `initial` with an aggregate over all elements (`reduce` fast path)
    ///
    /// Only `Sum` adds `initial`; `Min` and `Max` fold it in with `LEAST` and
    /// `GREATEST`, since `initial + MIN(..)` is not the value a left fold over
    /// `min`/`max` produces. An empty array yields `initial`.
    fn reduce_aggregate(&self, aggregate: ArrayAggregate, source: &str, initial: &str) -> String {
        let subquery = format!(
            "(SELECT {}({}) FROM {})",
            aggregate.function(),
            ELEMENT_ALIAS,
            unnest(source)
        );
        match aggregate {
            ArrayAggregate::Sum => format!("{} + COALESCE({}, 0)", initial, subquery),
            ArrayAggregate::Min => {
                format!("LEAST({}, COALESCE({}, {}))", initial, subquery, initial)
            }
            ArrayAggregate::Max => {
                format!("GREATEST({}, COALESCE({}, {}))", initial, subquery, initial)
            }
        }
    }

    /// Strategy used for a general `reduce`
    fn reduce_strategy(&self) -> ReduceStrategy {
        ReduceStrategy::SingleRow
    }

    /// Lower a general `reduce` whose body was compiled for [`Self::reduce_strategy`]
    fn array_reduce(&self, source: &str, body: &str, _initial: &str) -> String {
        format!("(SELECT {} FROM {})", body, unnest(source))
    }
}

/// `UNNEST(source) AS elem`
fn unnest(source: &str) -> String {
    format!("UNNEST({}) AS {}", source, ELEMENT_ALIAS)
}
