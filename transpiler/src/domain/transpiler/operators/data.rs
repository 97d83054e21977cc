//! Data access: `var`, `missing`, `missing_some`

use super::Signature;
use crate::domain::logic::{Node, Primitive};
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::{Frame, Scope};
use crate::sql::ELEMENT_ALIAS;

/// Names bound to the current element inside `map`/`filter`/`all`/`some`/`none`
const ELEMENT_NAMES: [&str; 3] = ["", "item", "current"];

/// Names bound to the current element inside a `reduce` body
const REDUCE_ELEMENT_NAMES: [&str; 1] = ["current"];

const ACCUMULATOR_NAME: &str = "accumulator";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOperator {
    Var,
    Missing,
    MissingSome,
}

impl DataOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "var" => Some(Self::Var),
            "missing" => Some(Self::Missing),
            "missing_some" => Some(Self::MissingSome),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Var => Signature::Var,
            Self::Missing => Signature::Missing,
            Self::MissingSome => Signature::MissingSome,
        }
    }

    /// `args` is the raw argument node; `var` distinguishes `"a"` from `["a"]`
    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &Node,
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        match self {
            Self::Var => compile_var(compiler, args, frame),
            Self::Missing => compile_missing(compiler, args, frame),
            Self::MissingSome => compile_missing_some(compiler, args, frame),
        }
    }
}

fn compile_var(
    compiler: &dyn ExpressionCompiler,
    args: &Node,
    frame: &Frame,
) -> Result<String, TranspileError> {
    let (target, default) = match args {
        Node::List(items) => match items.as_slice() {
            [target] => (target, None),
            [target, default] => (target, Some(default)),
            _ => {
                return Err(frame.invalid_argument(format!(
                    "var takes a name and an optional default, got {} arguments",
                    items.len()
                )));
            }
        },
        other => (other, None),
    };

    let name = match target.as_primitive() {
        Some(Primitive::String(s)) => s.clone(),
        Some(Primitive::Number(n)) => n.to_string(),
        _ => return Err(frame.invalid_argument("var name must be a string or a number")),
    };
    let reference = resolve_reference(compiler, &name, frame)?;

    match default {
        None => Ok(reference),
        Some(default) => {
            let default = compiler.compile_operand(default, &frame.arg(1))?;
            Ok(format!("COALESCE({}, {})", reference, compiler.render(&default)))
        }
    }
}

/// Map a variable name to SQL, honouring loop bindings and the schema
fn resolve_reference(
    compiler: &dyn ExpressionCompiler,
    name: &str,
    frame: &Frame,
) -> Result<String, TranspileError> {
    let bound = match frame.scope() {
        Scope::Root => None,
        Scope::Element => loop_reference(name, &ELEMENT_NAMES),
        Scope::Reduce { accumulator } if name == ACCUMULATOR_NAME => Some(accumulator.clone()),
        Scope::Reduce { .. } => loop_reference(name, &REDUCE_ELEMENT_NAMES),
    };
    if let Some(bound) = bound {
        return Ok(bound);
    }
    if name.is_empty() {
        return Err(frame.invalid_argument(
            "empty var name is only valid inside an array operator",
        ));
    }

    // Inside loops a name may refer to an element property unknown to the schema
    if !frame.in_loop()
        && let Some(schema) = compiler.schema()
    {
        schema
            .validate_field(name)
            .map_err(|e| frame.invalid_argument(e.to_string()).with_cause(e))?;
    }
    Ok(name.to_string())
}

/// `current` → `elem`, `current.price` → `elem.price`
fn loop_reference(name: &str, bindings: &[&str]) -> Option<String> {
    bindings.iter().find_map(|binding| {
        if name == *binding {
            Some(ELEMENT_ALIAS.to_string())
        } else if !binding.is_empty() {
            name.strip_prefix(binding)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|rest| format!("{}.{}", ELEMENT_ALIAS, rest))
        } else {
            None
        }
    })
}

/// Names listed by `missing` / `missing_some`: a single string or an array of strings
fn field_names(node: &Node, frame: &Frame) -> Result<Vec<String>, TranspileError> {
    let names: Option<Vec<String>> = node
        .as_arguments()
        .iter()
        .map(|n| n.as_primitive().and_then(Primitive::as_str).map(str::to_string))
        .collect();
    match names {
        Some(names) if !names.is_empty() => Ok(names),
        Some(_) => Err(frame.invalid_argument("expected at least one field name")),
        None => Err(frame.invalid_argument("field names must be strings")),
    }
}

fn compile_missing(
    compiler: &dyn ExpressionCompiler,
    args: &Node,
    frame: &Frame,
) -> Result<String, TranspileError> {
    let checks = field_names(args, frame)?
        .iter()
        .map(|name| Ok(format!("{} IS NULL", resolve_reference(compiler, name, frame)?)))
        .collect::<Result<Vec<_>, TranspileError>>()?;
    if checks.len() == 1 {
        Ok(checks.join(""))
    } else {
        Ok(format!("({})", checks.join(" OR ")))
    }
}

fn compile_missing_some(
    compiler: &dyn ExpressionCompiler,
    args: &Node,
    frame: &Frame,
) -> Result<String, TranspileError> {
    let [count, names] = args.as_arguments() else {
        return Err(frame.invalid_argument(
            "missing_some takes a minimum count and an array of field names",
        ));
    };
    let count = match count.as_primitive() {
        Some(Primitive::Number(n)) => n.as_u64(),
        _ => None,
    }
    .ok_or_else(|| frame.arg(0).invalid_argument("minimum count must be a non-negative integer"))?;

    let names_frame = frame.arg(1);
    let terms = field_names(names, &names_frame)?
        .iter()
        .map(|name| {
            Ok(format!(
                "CASE WHEN {} IS NULL THEN 1 ELSE 0 END",
                resolve_reference(compiler, name, &names_frame)?
            ))
        })
        .collect::<Result<Vec<_>, TranspileError>>()?;
    Ok(format!("({}) >= {}", terms.join(" + "), count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_reference() {
        assert_eq!(loop_reference("", &ELEMENT_NAMES).as_deref(), Some("elem"));
        assert_eq!(loop_reference("item", &ELEMENT_NAMES).as_deref(), Some("elem"));
        assert_eq!(
            loop_reference("current.price", &ELEMENT_NAMES).as_deref(),
            Some("elem.price")
        );
        assert_eq!(loop_reference("items", &ELEMENT_NAMES), None);
        assert_eq!(loop_reference("price", &ELEMENT_NAMES), None);
        assert_eq!(loop_reference("item", &REDUCE_ELEMENT_NAMES), None);
    }
}
