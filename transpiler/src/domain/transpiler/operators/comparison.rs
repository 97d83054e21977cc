//! Comparison operators: `==`, `===`, `!=`, `!==`, `>`, `>=`, `<`, `<=`, `in`

use super::{Signature, expect_arity, render_operands};
use crate::domain::logic::{Node, Primitive};
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    StrictEqual,
    NotEqual,
    StrictNotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    In,
}

impl ComparisonOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "==" => Some(Self::Equal),
            "===" => Some(Self::StrictEqual),
            "!=" => Some(Self::NotEqual),
            "!==" => Some(Self::StrictNotEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Greater | Self::GreaterOrEqual | Self::Less | Self::LessOrEqual => {
                Signature::args(2, None)
            }
            _ => Signature::args(2, Some(2)),
        }
    }

    /// SQL binary operator; strict and loose equality are the same in SQL
    fn sql_operator(&self) -> &'static str {
        match self {
            Self::Equal | Self::StrictEqual => "=",
            Self::NotEqual | Self::StrictNotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::In => "IN",
        }
    }

    fn is_negated(&self) -> bool {
        matches!(self, Self::NotEqual | Self::StrictNotEqual)
    }

    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        match self {
            Self::In => compile_in(compiler, args, frame),
            Self::Greater | Self::GreaterOrEqual | Self::Less | Self::LessOrEqual => {
                self.compile_chain(compiler, args, frame)
            }
            _ => self.compile_equality(compiler, args, frame),
        }
    }

    fn compile_equality(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        expect_arity(args, 2, Some(2), frame)?;
        check_enum_literal(compiler, &args[0], &args[1], frame)?;
        check_enum_literal(compiler, &args[1], &args[0], frame)?;

        let left = compiler.compile_operand(&args[0], &frame.arg(0))?;
        let right = compiler.compile_operand(&args[1], &frame.arg(1))?;
        let null_check = if self.is_negated() {
            "IS NOT NULL"
        } else {
            "IS NULL"
        };

        if right.is_null() {
            Ok(format!("{} {}", compiler.render_operand(&left), null_check))
        } else if left.is_null() {
            Ok(format!("{} {}", compiler.render_operand(&right), null_check))
        } else {
            Ok(format!(
                "{} {} {}",
                compiler.render_operand(&left),
                self.sql_operator(),
                compiler.render_operand(&right)
            ))
        }
    }

    /// `a < b < c` becomes `(a < b AND b < c)`
    fn compile_chain(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        expect_arity(args, 2, None, frame)?;
        let operands = render_operands(compiler, args, frame)?;
        let comparisons: Vec<String> = operands
            .windows(2)
            .map(|pair| format!("{} {} {}", pair[0], self.sql_operator(), pair[1]))
            .collect();
        if comparisons.len() == 1 {
            Ok(comparisons.join(""))
        } else {
            Ok(format!("({})", comparisons.join(" AND ")))
        }
    }
}

/// Membership in an array column, a literal list, or a substring test
fn compile_in(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 2, Some(2), frame)?;
    let (needle, haystack) = (&args[0], &args[1]);
    let needle_value = compiler.compile_operand(needle, &frame.arg(0))?;
    let needle_sql = compiler.render_operand(&needle_value);

    if haystack.is_operator("var") {
        let column = compiler.compile_expression(haystack, &frame.arg(1))?;
        return Ok(format!("{} IN {}", needle_sql, column));
    }

    match haystack {
        Node::List(items) => {
            if items.is_empty() {
                return Err(frame
                    .arg(1)
                    .invalid_argument("'in' requires a non-empty array of candidates"));
            }
            for item in items {
                check_enum_literal(compiler, needle, item, frame)?;
            }
            let candidates = render_operands(compiler, items, &frame.arg(1))?;
            Ok(format!("{} IN ({})", needle_sql, candidates.join(", ")))
        }
        _ => {
            let sql = compiler.sql_dialect(frame)?;
            let haystack = compiler.compile_operand(haystack, &frame.arg(1))?;
            let position =
                sql.string_position(&compiler.render(&haystack), &compiler.render(&needle_value));
            Ok(format!("{} > 0", position))
        }
    }
}

/// Reject string literals outside an enum field's allowed values
fn check_enum_literal(
    compiler: &dyn ExpressionCompiler,
    field: &Node,
    literal: &Node,
    frame: &Frame,
) -> Result<(), TranspileError> {
    let Some(schema) = compiler.schema() else {
        return Ok(());
    };
    if frame.in_loop() {
        return Ok(());
    }
    let (Some(name), Some(Primitive::String(value))) = (field.var_name(), literal.as_primitive())
    else {
        return Ok(());
    };
    if !schema.is_enum_type(&name) {
        return Ok(());
    }
    schema
        .validate_enum_value(&name, value)
        .map_err(|e| frame.invalid_argument(e.to_string()).with_cause(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(
            ComparisonOperator::from_name("==="),
            Some(ComparisonOperator::StrictEqual)
        );
        assert_eq!(ComparisonOperator::from_name("<>"), None);
    }

    #[test]
    fn test_strict_and_loose_share_sql() {
        assert_eq!(
            ComparisonOperator::Equal.sql_operator(),
            ComparisonOperator::StrictEqual.sql_operator()
        );
        assert_eq!(
            ComparisonOperator::NotEqual.sql_operator(),
            ComparisonOperator::StrictNotEqual.sql_operator()
        );
    }
}
