//! BigQuery SQL dialect implementation

use super::SqlDialect;
use crate::utils::sql::quote_backslash_escaped;

/// BigQuery (GoogleSQL) dialect
pub struct BigqueryDialect;

impl SqlDialect for BigqueryDialect {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn quote_string(&self, value: &str) -> String {
        quote_backslash_escaped(value)
    }

    fn backslash_escapes(&self) -> bool {
        true
    }

    fn string_position(&self, haystack: &str, needle: &str) -> String {
        format!("STRPOS({}, {})", haystack, needle)
    }

    fn array_length(&self, array: &str) -> String {
        format!("ARRAY_LENGTH({})", array)
    }

    fn modulo(&self, left: &str, right: &str) -> String {
        // BigQuery has no % operator
        format!("MOD({}, {})", left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::ArrayAggregate;

    #[test]
    fn test_quote_string() {
        let dialect = BigqueryDialect;
        assert_eq!(dialect.quote_string("plain"), "'plain'");
        assert_eq!(dialect.quote_string("it's"), r"'it\'s'");
        assert_eq!(dialect.quote_string(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_string_position() {
        let dialect = BigqueryDialect;
        assert_eq!(dialect.string_position("name", "'bob'"), "STRPOS(name, 'bob')");
    }

    #[test]
    fn test_array_some() {
        let dialect = BigqueryDialect;
        assert_eq!(
            dialect.array_some("tags", "elem = 'a'"),
            "EXISTS (SELECT 1 FROM UNNEST(tags) AS elem WHERE elem = 'a')"
        );
    }

    #[test]
    fn test_reduce_aggregate_sum() {
        let dialect = BigqueryDialect;
        assert_eq!(
            dialect.reduce_aggregate(ArrayAggregate::Sum, "[1, 2, 3, 4]", "0"),
            "0 + COALESCE((SELECT SUM(elem) FROM UNNEST([1, 2, 3, 4]) AS elem), 0)"
        );
    }

    #[test]
    fn test_modulo() {
        let dialect = BigqueryDialect;
        assert_eq!(dialect.modulo("a", "2"), "MOD(a, 2)");
    }
}
