//! Logical operators: `and`, `or`, `!`, `!!`, `if`

use super::{Signature, expect_arity, render_all};
use crate::domain::logic::Node;
use crate::domain::schema::FieldType;
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::Frame;
use crate::utils::sql::enclose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
    Truthy,
    If,
}

impl LogicalOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            "!" => Some(Self::Not),
            "!!" => Some(Self::Truthy),
            "if" => Some(Self::If),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::And | Self::Or => Signature::args(1, None),
            Self::Not | Self::Truthy => Signature::args(1, Some(1)),
            Self::If => Signature::args(2, None),
        }
    }

    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        match self {
            Self::And => compile_junction(compiler, args, frame, "AND"),
            Self::Or => compile_junction(compiler, args, frame, "OR"),
            Self::Not => {
                expect_arity(args, 1, Some(1), frame)?;
                let operand = compiler.compile_operand(&args[0], &frame.arg(0))?;
                let condition = enclose(
                    compiler.render(&operand),
                    compiler.dialect().backslash_escapes(),
                );
                Ok(format!("NOT {}", condition))
            }
            Self::Truthy => compile_truthy(compiler, args, frame),
            Self::If => compile_if(compiler, args, frame),
        }
    }
}

fn compile_junction(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
    keyword: &str,
) -> Result<String, TranspileError> {
    if args.is_empty() {
        return Err(frame.invalid_argument("expected at least one condition"));
    }
    let conditions = render_all(compiler, args, frame)?;
    if conditions.len() == 1 {
        Ok(conditions.join(""))
    } else {
        Ok(format!("({})", conditions.join(&format!(" {} ", keyword))))
    }
}

/// `[c1, v1, c2, v2, ..., else]` becomes a searched `CASE`
fn compile_if(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 2, None, frame)?;
    let parts = render_all(compiler, args, frame)?;

    let mut sql = String::from("CASE");
    let mut pairs = parts.chunks_exact(2);
    for pair in pairs.by_ref() {
        sql.push_str(&format!(" WHEN {} THEN {}", pair[0], pair[1]));
    }
    let otherwise = pairs.remainder().first().map_or("NULL", String::as_str);
    sql.push_str(&format!(" ELSE {} END", otherwise));
    Ok(sql)
}

/// JavaScript-style truthiness
///
/// With a schema, a field reference gets a test matching its declared type;
/// otherwise every falsy representation is excluded.
fn compile_truthy(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 1, Some(1), frame)?;
    let arg = &args[0];
    let operand = compiler.compile_operand(arg, &frame.arg(0))?;
    let value = compiler.render_operand(&operand);

    let field_type = match (compiler.schema(), arg.var_name()) {
        (Some(schema), Some(name)) if !frame.in_loop() => schema.field_type(&name),
        _ => None,
    };

    match field_type {
        Some(FieldType::Boolean) => Ok(format!("{} IS TRUE", value)),
        Some(FieldType::String | FieldType::Enum) => {
            Ok(format!("({v} IS NOT NULL AND {v} != '')", v = value))
        }
        Some(FieldType::Integer | FieldType::Number) => {
            Ok(format!("({v} IS NOT NULL AND {v} != 0)", v = value))
        }
        Some(FieldType::Array) => {
            let sql = compiler.sql_dialect(frame)?;
            Ok(format!(
                "({} IS NOT NULL AND {} > 0)",
                value,
                sql.array_length(&compiler.render(&operand))
            ))
        }
        Some(FieldType::Object) | None => Ok(format!(
            "({v} IS NOT NULL AND {v} != FALSE AND {v} != 0 AND {v} != '')",
            v = value
        )),
    }
}
