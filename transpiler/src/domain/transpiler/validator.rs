//! Structural validation of raw JSON before compilation

use serde_json::Value;

use super::error::TranspileError;
use super::operators::{BuiltinOperator, Signature};
use crate::domain::logic::{JsonPath, single_entry};

/// Checks operator names, arity and argument shapes over the whole tree
///
/// Runs before any SQL is generated so that a malformed expression never
/// yields partial output.
pub struct Validator<'a> {
    is_custom: &'a dyn Fn(&str) -> bool,
    max_depth: usize,
}

impl<'a> Validator<'a> {
    pub fn new(is_custom: &'a dyn Fn(&str) -> bool, max_depth: usize) -> Self {
        Self {
            is_custom,
            max_depth,
        }
    }

    pub fn validate(&self, value: &Value) -> Result<(), TranspileError> {
        self.walk(value, &JsonPath::root(), 0)
    }

    fn walk(&self, value: &Value, path: &JsonPath, depth: usize) -> Result<(), TranspileError> {
        if depth > self.max_depth {
            return Err(TranspileError::recursion_limit(path, self.max_depth));
        }
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.walk(item, &path.index(i), depth + 1)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                let (name, args) = single_entry(map, path)?;
                let args_path = path.operator(name);
                self.check_operator(name, args, &args_path)?;
                self.walk(args, &args_path, depth + 1)
            }
            _ => Ok(()),
        }
    }

    fn check_operator(
        &self,
        name: &str,
        args: &Value,
        path: &JsonPath,
    ) -> Result<(), TranspileError> {
        let Some(operator) = BuiltinOperator::from_name(name) else {
            if (self.is_custom)(name) {
                return Ok(());
            }
            return Err(TranspileError::unsupported_operator(path, name));
        };

        match operator.signature() {
            Signature::Var => check_var(name, args, path),
            Signature::Missing => check_missing(name, args, path),
            Signature::MissingSome => check_missing_some(name, args, path),
            Signature::Args { min, max, kinds } => {
                let list = arguments(args);
                let n = list.len();
                if n < min {
                    return Err(TranspileError::validation(
                        path,
                        name,
                        format!(
                            "operator '{}' requires at least {} argument(s), got {}",
                            name, min, n
                        ),
                    ));
                }
                if let Some(max) = max
                    && n > max
                {
                    return Err(TranspileError::validation(
                        path,
                        name,
                        format!(
                            "operator '{}' accepts at most {} argument(s), got {}",
                            name, max, n
                        ),
                    ));
                }
                for (i, (arg, kind)) in list.iter().zip(kinds).enumerate() {
                    if !kind.accepts(arg) {
                        return Err(TranspileError::validation(
                            &path.index(i),
                            name,
                            format!(
                                "argument {} of '{}' must be {}",
                                i,
                                name,
                                kind.describe()
                            ),
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Normalised argument list, as in [`crate::domain::logic::Node::as_arguments`]
fn arguments(args: &Value) -> &[Value] {
    match args {
        Value::Array(items) => items,
        other => std::slice::from_ref(other),
    }
}

fn is_var_name(value: &Value) -> bool {
    value.is_string() || value.is_number()
}

fn check_var(name: &str, args: &Value, path: &JsonPath) -> Result<(), TranspileError> {
    let valid = match args {
        Value::Array(items) => {
            matches!(items.as_slice(), [target] | [target, _] if is_var_name(target))
        }
        other => is_var_name(other),
    };
    if valid {
        Ok(())
    } else {
        Err(TranspileError::validation(
            path,
            name,
            "var expects a name (string or number) or [name, default]",
        ))
    }
}

fn check_missing(name: &str, args: &Value, path: &JsonPath) -> Result<(), TranspileError> {
    let valid = match args {
        Value::String(_) => true,
        Value::Array(items) => !items.is_empty() && items.iter().all(Value::is_string),
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(TranspileError::validation(
            path,
            name,
            "missing expects a field name or a non-empty array of field names",
        ))
    }
}

fn check_missing_some(name: &str, args: &Value, path: &JsonPath) -> Result<(), TranspileError> {
    let valid = match arguments(args) {
        [Value::Number(count), Value::Array(fields)] => {
            count.as_u64().is_some() && !fields.is_empty() && fields.iter().all(Value::is_string)
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(TranspileError::validation(
            path,
            name,
            "missing_some expects [minimum count, [field names...]]",
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::transpiler::ErrorKind;

    fn validate(value: Value) -> Result<(), TranspileError> {
        let is_custom = |name: &str| name == "regex";
        Validator::new(&is_custom, 10).validate(&value)
    }

    #[test]
    fn test_accepts_well_formed() {
        assert!(validate(json!({"and": [{"==": [{"var": "a"}, 1]}, {"!": {"var": "b"}}]})).is_ok());
        assert!(validate(json!({"substr": [{"var": "s"}, 1, 2]})).is_ok());
        assert!(validate(json!({"missing_some": [1, ["a", "b"]]})).is_ok());
        assert!(validate(json!({"regex": [{"var": "s"}, "^a"]})).is_ok());
    }

    #[test]
    fn test_arity() {
        let err = validate(json!({"and": []})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.path(), "$.and");

        let err = validate(json!({"==": [1, 2, 3]})).unwrap_err();
        assert!(err.message().contains("at most 2"));

        let err = validate(json!({"or": [{"var": "a"}, {"!": [1, 2]}]})).unwrap_err();
        assert_eq!(err.path(), "$.or[1].!");
    }

    #[test]
    fn test_argument_kinds() {
        let err = validate(json!({"map": ["abc", {"var": ""}]})).unwrap_err();
        assert_eq!(err.path(), "$.map[0]");
        let err = validate(json!({"substr": [{"var": "s"}, "1"]})).unwrap_err();
        assert_eq!(err.path(), "$.substr[1]");
    }

    #[test]
    fn test_data_operator_shapes() {
        assert!(validate(json!({"var": ["a", 1, 2]})).is_err());
        assert!(validate(json!({"var": {"cat": ["a"]}})).is_err());
        assert!(validate(json!({"missing": []})).is_err());
        assert!(validate(json!({"missing": [1]})).is_err());
        assert!(validate(json!({"missing_some": [-1, ["a"]]})).is_err());
        assert!(validate(json!({"missing_some": [1, []]})).is_err());
    }

    #[test]
    fn test_unsupported_operator() {
        let err = validate(json!({"and": [{"frobnicate": [1]}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
        assert_eq!(err.operator(), Some("frobnicate"));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!({"var": "x"});
        for _ in 0..20 {
            value = json!({"!": value});
        }
        let err = validate(value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RecursionLimit);
    }
}
