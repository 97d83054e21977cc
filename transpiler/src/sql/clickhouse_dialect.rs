//! ClickHouse SQL dialect implementation
//!
//! ClickHouse has no correlated `UNNEST` subqueries; array operators lower to
//! its higher-order functions (`arrayMap`, `arrayFilter`, `arrayFold`, ...).

use super::{ACCUMULATOR_ALIAS, ArrayAggregate, ELEMENT_ALIAS, ReduceStrategy, SqlDialect};
use crate::utils::sql::quote_backslash_escaped;

/// ClickHouse SQL dialect
pub struct ClickhouseDialect;

impl ClickhouseDialect {
    fn lambda(function: &str, source: &str, body: &str) -> String {
        format!("{}({} -> {}, {})", function, ELEMENT_ALIAS, body, source)
    }
}

impl SqlDialect for ClickhouseDialect {
    fn name(&self) -> &'static str {
        "clickhouse"
    }

    fn quote_string(&self, value: &str) -> String {
        quote_backslash_escaped(value)
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    fn string_position(&self, haystack: &str, needle: &str) -> String {
        format!("position({}, {})", haystack, needle)
    }

    fn array_length(&self, array: &str) -> String {
        format!("length({})", array)
    }

    fn numeric_cast(&self, expr: &str) -> String {
        format!("toFloat64({})", expr)
    }

    fn array_concat(&self, arrays: &[String]) -> String {
        format!("arrayConcat({})", arrays.join(", "))
    }

    fn array_map(&self, source: &str, transform: &str) -> String {
        Self::lambda("arrayMap", source, transform)
    }

    fn array_filter(&self, source: &str, predicate: &str) -> String {
        Self::lambda("arrayFilter", source, predicate)
    }

    fn array_all(&self, source: &str, predicate: &str) -> String {
        Self::lambda("arrayAll", source, predicate)
    }

    fn array_some(&self, source: &str, predicate: &str) -> String {
        Self::lambda("arrayExists", source, predicate)
    }

    fn array_none(&self, source: &str, predicate: &str) -> String {
        format!("NOT {}", Self::lambda("arrayExists", source, predicate))
    }

    fn reduce_aggregate(&self, aggregate: ArrayAggregate, source: &str, initial: &str) -> String {
        match aggregate {
            ArrayAggregate::Sum => format!("{} + arraySum({})", initial, source),
            ArrayAggregate::Min => format!(
                "if(empty({src}), {init}, least({init}, arrayMin({src})))",
                src = source,
                init = initial
            ),
            ArrayAggregate::Max => format!(
                "if(empty({src}), {init}, greatest({init}, arrayMax({src})))",
                src = source,
                init = initial
            ),
        }
    }

    fn reduce_strategy(&self) -> ReduceStrategy {
        ReduceStrategy::Fold
    }

    fn array_reduce(&self, source: &str, body: &str, initial: &str) -> String {
        format!(
            "arrayFold(({}, {}) -> {}, {}, {})",
            ACCUMULATOR_ALIAS, ELEMENT_ALIAS, body, source, initial
        )
    }
}
