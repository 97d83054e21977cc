//! Spanner SQL dialect implementation

use super::SqlDialect;
use crate::utils::sql::quote_backslash_escaped;

/// Cloud Spanner (GoogleSQL) dialect
pub struct SpannerDialect;

impl SqlDialect for SpannerDialect {
    fn name(&self) -> &'static str {
        "spanner"
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
        format!("MOD({}, {})", left, right)
    }
}
