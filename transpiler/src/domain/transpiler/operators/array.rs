//! Array operators: `map`, `filter`, `reduce`, `all`, `some`, `none`, `merge`
//!
//! Every array operator is dialect-sensitive: iteration is lowered to
//! `UNNEST` subqueries or, on ClickHouse, to higher-order functions.

use super::{ArgKind, Signature, expect_arity};
use crate::domain::logic::Node;
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::{Frame, Scope};
use crate::sql::{ACCUMULATOR_ALIAS, ArrayAggregate, ReduceStrategy, SqlDialect};

const ITERATION_KINDS: &[ArgKind] = &[ArgKind::Array, ArgKind::Any];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOperator {
    Map,
    Filter,
    Reduce,
    All,
    Any,
    NoneMatch,
    Merge,
}

impl ArrayOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "map" => Some(Self::Map),
            "filter" => Some(Self::Filter),
            "reduce" => Some(Self::Reduce),
            "all" => Some(Self::All),
            "some" => Some(Self::Any),
            "none" => Some(Self::NoneMatch),
            "merge" => Some(Self::Merge),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Map | Self::Filter | Self::All | Self::Any | Self::NoneMatch => Signature::Args {
                min: 2,
                max: Some(2),
                kinds: ITERATION_KINDS,
            },
            Self::Reduce => Signature::Args {
                min: 3,
                max: Some(3),
                kinds: &[ArgKind::Array, ArgKind::Any, ArgKind::Any],
            },
            Self::Merge => Signature::args(1, None),
        }
    }

    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        let sql = compiler.sql_dialect(frame)?;
        match self {
            Self::Merge => compile_merge(compiler, sql, args, frame),
            Self::Reduce => compile_reduce(compiler, sql, args, frame),
            _ => {
                expect_arity(args, 2, Some(2), frame)?;
                let source = compile_source(compiler, sql, &args[0], &frame.arg(0))?;
                let body_frame = frame.arg(1).with_scope(Scope::Element);
                let body = compiler.render(&compiler.compile_operand(&args[1], &body_frame)?);
                Ok(match self {
                    Self::Map => sql.array_map(&source, &body),
                    Self::Filter => sql.array_filter(&source, &body),
                    Self::All => sql.array_all(&source, &body),
                    Self::Any => sql.array_some(&source, &body),
                    _ => sql.array_none(&source, &body),
                })
            }
        }
    }
}

/// Array being iterated, compiled in the enclosing scope
fn compile_source(
    compiler: &dyn ExpressionCompiler,
    sql: &dyn SqlDialect,
    node: &Node,
    frame: &Frame,
) -> Result<String, TranspileError> {
    match node {
        Node::List(items) => {
            let elements = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let value = compiler.compile_operand(item, &frame.arg(i))?;
                    Ok(compiler.render(&value))
                })
                .collect::<Result<Vec<_>, TranspileError>>()?;
            Ok(sql.array_literal(&elements))
        }
        Node::Operator { .. } => compiler.compile_expression(node, frame),
        Node::Primitive(p) => Err(frame.invalid_argument(format!(
            "expected an array or an expression, got {}",
            p.kind()
        ))),
    }
}

fn compile_reduce(
    compiler: &dyn ExpressionCompiler,
    sql: &dyn SqlDialect,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 3, Some(3), frame)?;
    let source = compile_source(compiler, sql, &args[0], &frame.arg(0))?;
    let initial = compiler.render_operand(&compiler.compile_operand(&args[2], &frame.arg(2))?);

    if let Some(aggregate) = aggregate_shape(&args[1]) {
        return Ok(sql.reduce_aggregate(aggregate, &source, &initial));
    }

    let accumulator = match sql.reduce_strategy() {
        ReduceStrategy::SingleRow => initial.clone(),
        ReduceStrategy::Fold => ACCUMULATOR_ALIAS.to_string(),
    };
    let body_frame = frame.arg(1).with_scope(Scope::Reduce { accumulator });
    let body = compiler.render(&compiler.compile_operand(&args[1], &body_frame)?);
    Ok(sql.array_reduce(&source, &body, &initial))
}

/// Recognise `accumulator + current` and `min`/`max` of the two, in either order
fn aggregate_shape(body: &Node) -> Option<ArrayAggregate> {
    let Node::Operator { name, args } = body else {
        return None;
    };
    let aggregate = match name.as_str() {
        "+" => ArrayAggregate::Sum,
        "min" => ArrayAggregate::Min,
        "max" => ArrayAggregate::Max,
        _ => return None,
    };
    match args.as_arguments() {
        [a, b]
            if (a.is_plain_var("accumulator") && b.is_plain_var("current"))
                || (a.is_plain_var("current") && b.is_plain_var("accumulator")) =>
        {
            Some(aggregate)
        }
        _ => None,
    }
}

/// Scalars are wrapped as one-element arrays before concatenation
fn compile_merge(
    compiler: &dyn ExpressionCompiler,
    sql: &dyn SqlDialect,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 1, None, frame)?;
    let arrays = args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let arg_frame = frame.arg(i);
            match arg {
                Node::Primitive(p) => Ok(sql.array_literal(&[p.render(compiler.dialect())])),
                _ => compile_source(compiler, sql, arg, &arg_frame),
            }
        })
        .collect::<Result<Vec<_>, TranspileError>>()?;
    Ok(sql.array_concat(&arrays))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::logic::JsonPath;

    fn node(value: serde_json::Value) -> Node {
        Node::from_value(&value, &JsonPath::root()).unwrap()
    }

    #[test]
    fn test_aggregate_shape() {
        assert_eq!(
            aggregate_shape(&node(json!({"+": [{"var": "accumulator"}, {"var": "current"}]}))),
            Some(ArrayAggregate::Sum)
        );
        assert_eq!(
            aggregate_shape(&node(json!({"max": [{"var": "current"}, {"var": "accumulator"}]}))),
            Some(ArrayAggregate::Max)
        );
        assert_eq!(
            aggregate_shape(&node(json!({"*": [{"var": "accumulator"}, {"var": "current"}]}))),
            None
        );
        assert_eq!(
            aggregate_shape(&node(
                json!({"+": [{"var": "accumulator"}, {"var": "current"}, 1]})
            )),
            None
        );
    }
}
