//! Compiled operand values

use crate::domain::logic::Primitive;
use crate::sql::Dialect;
use crate::utils::sql::group;

/// Result of compiling a node in operand position
///
/// Literals stay unrendered so operators can inspect them (null checks,
/// constant folding) before choosing a SQL shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedValue {
    Sql(String),
    Literal(Primitive),
}

impl ProcessedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ProcessedValue::Literal(Primitive::Null))
    }

    /// Render as a standalone SQL fragment
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            ProcessedValue::Sql(sql) => sql.clone(),
            ProcessedValue::Literal(p) => p.render(dialect),
        }
    }

    /// Render for embedding next to a binary operator
    ///
    /// Compound SQL is parenthesised; atoms and literals are left bare.
    pub fn render_operand(&self, dialect: Dialect) -> String {
        match self {
            ProcessedValue::Sql(sql) => group(sql.clone(), dialect.backslash_escapes()),
            ProcessedValue::Literal(p) => p.render(dialect),
        }
    }
}
