//! Built-in JSON-Logic operators
//!
//! Operators are grouped by category; each category enum knows its names,
//! its argument signature and how to lower itself to SQL.

mod array;
mod comparison;
mod data;
mod logical;
mod numeric;
mod string;

use serde_json::Value;

pub use array::ArrayOperator;
pub use comparison::ComparisonOperator;
pub use data::DataOperator;
pub use logical::LogicalOperator;
pub use numeric::NumericOperator;
pub use string::StringOperator;

use super::context::ExpressionCompiler;
use super::error::TranspileError;
use super::frame::Frame;
use crate::domain::logic::Node;

/// Every built-in operator name; none can be registered as a custom operator
pub const RESERVED_OPERATORS: [&str; 33] = [
    "var",
    "missing",
    "missing_some",
    "==",
    "===",
    "!=",
    "!==",
    ">",
    ">=",
    "<",
    "<=",
    "in",
    "and",
    "or",
    "!",
    "!!",
    "if",
    "+",
    "-",
    "*",
    "/",
    "%",
    "max",
    "min",
    "cat",
    "substr",
    "map",
    "filter",
    "reduce",
    "all",
    "some",
    "none",
    "merge",
];

pub fn is_reserved_operator(name: &str) -> bool {
    BuiltinOperator::from_name(name).is_some()
}

/// Expected JSON shape of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Any,
    Number,
    String,
    Array,
}

impl ArgKind {
    /// Operator objects are accepted for every kind; their type is only
    /// known once compiled.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ArgKind::Any => true,
            ArgKind::Number => value.is_number() || value.is_object(),
            ArgKind::String => value.is_string() || value.is_object(),
            ArgKind::Array => value.is_array() || value.is_object(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ArgKind::Any => "any value",
            ArgKind::Number => "a number or an expression",
            ArgKind::String => "a string or an expression",
            ArgKind::Array => "an array or an expression",
        }
    }
}

/// Argument rules checked before compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// Counted arguments with optional positional kinds
    Args {
        min: usize,
        max: Option<usize>,
        kinds: &'static [ArgKind],
    },
    /// `"name"`, `0`, `["name"]` or `["name", default]`
    Var,
    /// `"name"` or a non-empty array of names
    Missing,
    /// `[count, ["name", ...]]`
    MissingSome,
}

impl Signature {
    pub const fn args(min: usize, max: Option<usize>) -> Self {
        Signature::Args {
            min,
            max,
            kinds: &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOperator {
    Data(DataOperator),
    Comparison(ComparisonOperator),
    Logical(LogicalOperator),
    Numeric(NumericOperator),
    String(StringOperator),
    Array(ArrayOperator),
}

impl BuiltinOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        DataOperator::from_name(name)
            .map(Self::Data)
            .or_else(|| ComparisonOperator::from_name(name).map(Self::Comparison))
            .or_else(|| LogicalOperator::from_name(name).map(Self::Logical))
            .or_else(|| NumericOperator::from_name(name).map(Self::Numeric))
            .or_else(|| StringOperator::from_name(name).map(Self::String))
            .or_else(|| ArrayOperator::from_name(name).map(Self::Array))
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Data(op) => op.signature(),
            Self::Comparison(op) => op.signature(),
            Self::Logical(op) => op.signature(),
            Self::Numeric(op) => op.signature(),
            Self::String(op) => op.signature(),
            Self::Array(op) => op.signature(),
        }
    }

    /// Lower the operator whose arguments are `args`
    ///
    /// `frame` is already positioned on the operator.
    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &Node,
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        match self {
            Self::Data(op) => op.compile(compiler, args, frame),
            Self::Comparison(op) => op.compile(compiler, args.as_arguments(), frame),
            Self::Logical(op) => op.compile(compiler, args.as_arguments(), frame),
            Self::Numeric(op) => op.compile(compiler, args.as_arguments(), frame),
            Self::String(op) => op.compile(compiler, args.as_arguments(), frame),
            Self::Array(op) => op.compile(compiler, args.as_arguments(), frame),
        }
    }
}

/// Fail unless `args` has between `min` and `max` elements
///
/// Validation normally rejects bad arity first; this guards direct callers.
fn expect_arity(
    args: &[Node],
    min: usize,
    max: Option<usize>,
    frame: &Frame,
) -> Result<(), TranspileError> {
    let n = args.len();
    if n < min || max.is_some_and(|max| n > max) {
        let expected = match max {
            Some(max) if max == min => format!("{}", min),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        return Err(frame.invalid_argument(format!(
            "expected {} argument(s), got {}",
            expected, n
        )));
    }
    Ok(())
}

/// Render every argument as an operand
fn render_operands(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<Vec<String>, TranspileError> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            let value = compiler.compile_operand(arg, &frame.arg(i))?;
            Ok(compiler.render_operand(&value))
        })
        .collect()
}

/// Render every argument as a standalone fragment (function arguments)
fn render_all(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<Vec<String>, TranspileError> {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            let value = compiler.compile_operand(arg, &frame.arg(i))?;
            Ok(compiler.render(&value))
        })
        .collect()
}
