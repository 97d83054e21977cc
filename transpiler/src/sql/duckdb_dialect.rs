//! DuckDB SQL dialect implementation

use super::SqlDialect;

/// DuckDB SQL dialect
pub struct DuckdbDialect;

impl SqlDialect for DuckdbDialect {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn string_position(&self, haystack: &str, needle: &str) -> String {
        format!("POSITION({} IN {})", needle, haystack)
    }

    fn array_length(&self, array: &str) -> String {
        format!("length({})", array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_length() {
        let dialect = DuckdbDialect;
        assert_eq!(dialect.array_length("tags"), "length(tags)");
    }

    #[test]
    fn test_array_filter() {
        let dialect = DuckdbDialect;
        assert_eq!(
            dialect.array_filter("[1, 2, 3]", "elem > 1"),
            "ARRAY(SELECT elem FROM UNNEST([1, 2, 3]) AS elem WHERE elem > 1)"
        );
    }

    #[test]
    fn test_modulo() {
        let dialect = DuckdbDialect;
        assert_eq!(dialect.modulo("a", "3"), "a % 3");
    }
}
