//! Arithmetic operators: `+`, `-`, `*`, `/`, `%`, `max`, `min`

use super::{Signature, expect_arity, render_all, render_operands};
use crate::domain::logic::Node;
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Max,
    Min,
}

impl NumericOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "%" => Some(Self::Modulo),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Add | Self::Subtract => Signature::args(1, None),
            Self::Modulo => Signature::args(2, Some(2)),
            Self::Multiply | Self::Divide | Self::Max | Self::Min => Signature::args(2, None),
        }
    }

    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        self.check_operand_types(compiler, args, frame)?;
        match self {
            Self::Add if args.len() == 1 => {
                let sql = compiler.sql_dialect(frame)?;
                let operand = render_all(compiler, args, frame)?;
                Ok(sql.numeric_cast(&operand[0]))
            }
            Self::Subtract if args.len() == 1 => {
                let operand = render_operands(compiler, args, frame)?;
                // `--` opens a line comment
                let separator = if operand[0].starts_with('-') { " " } else { "" };
                Ok(format!("(-{}{})", separator, operand[0]))
            }
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => {
                let min = if matches!(self, Self::Add | Self::Subtract) { 1 } else { 2 };
                expect_arity(args, min, None, frame)?;
                let operands = render_operands(compiler, args, frame)?;
                Ok(format!(
                    "({})",
                    operands.join(&format!(" {} ", self.name()))
                ))
            }
            Self::Modulo => {
                expect_arity(args, 2, Some(2), frame)?;
                let sql = compiler.sql_dialect(frame)?;
                let operands = render_operands(compiler, args, frame)?;
                Ok(sql.modulo(&operands[0], &operands[1]))
            }
            Self::Max | Self::Min => {
                expect_arity(args, 2, None, frame)?;
                let function = if *self == Self::Max { "GREATEST" } else { "LEAST" };
                let operands = render_all(compiler, args, frame)?;
                Ok(format!("{}({})", function, operands.join(", ")))
            }
        }
    }

    /// With a schema, field operands must be numeric
    fn check_operand_types(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<(), TranspileError> {
        let Some(schema) = compiler.schema() else {
            return Ok(());
        };
        if frame.in_loop() {
            return Ok(());
        }
        for (i, arg) in args.iter().enumerate() {
            let Some(name) = arg.var_name() else {
                continue;
            };
            if let Some(field_type) = schema.field_type(&name)
                && !field_type.is_numeric()
            {
                return Err(frame.arg(i).invalid_argument(format!(
                    "field '{}' has type {} and cannot be used with '{}'",
                    name,
                    field_type,
                    self.name()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for name in ["+", "-", "*", "/", "%", "max", "min"] {
            assert_eq!(NumericOperator::from_name(name).unwrap().name(), name);
        }
    }
}
