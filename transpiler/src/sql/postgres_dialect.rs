//! PostgreSQL SQL dialect implementation

use super::SqlDialect;

/// PostgreSQL SQL dialect
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn array_literal(&self, elements: &[String]) -> String {
        format!("ARRAY[{}]", elements.join(", "))
    }

    fn string_position(&self, haystack: &str, needle: &str) -> String {
        format!("POSITION({} IN {})", needle, haystack)
    }

    fn array_length(&self, array: &str) -> String {
        format!("CARDINALITY({})", array)
    }

    fn array_concat(&self, arrays: &[String]) -> String {
        if arrays.len() == 1 {
            return arrays[0].clone();
        }
        format!("({})", arrays.join(" || "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_literal() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.array_literal(&["1".to_string(), "2".to_string()]),
            "ARRAY[1, 2]"
        );
    }

    #[test]
    fn test_string_position() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.string_position("name", "'bob'"),
            "POSITION('bob' IN name)"
        );
    }

    #[test]
    fn test_array_concat() {
        let dialect = PostgresDialect;
        assert_eq!(dialect.array_concat(&["a".to_string()]), "a");
        assert_eq!(
            dialect.array_concat(&["a".to_string(), "b".to_string(), "c".to_string()]),
            "(a || b || c)"
        );
    }

    #[test]
    fn test_array_all() {
        let dialect = PostgresDialect;
        assert_eq!(
            dialect.array_all("scores", "elem > 0"),
            "NOT EXISTS (SELECT 1 FROM UNNEST(scores) AS elem WHERE NOT (elem > 0))"
        );
        assert_eq!(
            dialect.array_all("scores", "(elem > 0 AND elem < 10)"),
            "NOT EXISTS (SELECT 1 FROM UNNEST(scores) AS elem WHERE NOT (elem > 0 AND elem < 10))"
        );
    }
}
