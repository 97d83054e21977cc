//! JSON-Logic expression tree
//!
//! Decoded once from `serde_json::Value` so operator compilers match on a
//! closed set of shapes instead of probing dynamic JSON.

use serde_json::{Map, Number, Value};

use super::path::JsonPath;
use crate::domain::transpiler::TranspileError;
use crate::sql::Dialect;

/// Scalar leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Primitive {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value, if this is an integral number
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Primitive::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Human-readable kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool(_) => "boolean",
            Primitive::Number(_) => "number",
            Primitive::String(_) => "string",
        }
    }

    /// Render as a SQL literal for the given dialect
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            Primitive::Null => "NULL".to_string(),
            Primitive::Bool(true) => "TRUE".to_string(),
            Primitive::Bool(false) => "FALSE".to_string(),
            Primitive::Number(n) => n.to_string(),
            Primitive::String(s) => dialect.quote_string(s),
        }
    }
}

/// JSON-Logic expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Primitive(Primitive),
    List(Vec<Node>),
    /// Single-key object: `{"<name>": <args>}`
    Operator { name: String, args: Box<Node> },
}

impl Node {
    /// Decode a JSON value, rejecting objects that are not single-key
    pub fn from_value(value: &Value, path: &JsonPath) -> Result<Self, TranspileError> {
        match value {
            Value::Null => Ok(Node::Primitive(Primitive::Null)),
            Value::Bool(b) => Ok(Node::Primitive(Primitive::Bool(*b))),
            Value::Number(n) => Ok(Node::Primitive(Primitive::Number(n.clone()))),
            Value::String(s) => Ok(Node::Primitive(Primitive::String(s.clone()))),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Node::from_value(item, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::List),
            Value::Object(map) => {
                let (name, args) = single_entry(map, path)?;
                let args = Node::from_value(args, &path.operator(name))?;
                Ok(Node::Operator {
                    name: name.clone(),
                    args: Box::new(args),
                })
            }
        }
    }

    /// Normalised operator argument list
    ///
    /// JSON-Logic allows a single argument to be written without the
    /// surrounding array: `{"!": true}` is `{"!": [true]}`.
    pub fn as_arguments(&self) -> &[Node] {
        match self {
            Node::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Node::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        matches!(self, Node::Operator { name, .. } if name == operator)
    }

    /// Field name referenced by a `var` node, with or without a default
    pub fn var_name(&self) -> Option<String> {
        let Node::Operator { name, args } = self else {
            return None;
        };
        if name != "var" {
            return None;
        }
        let target = match args.as_ref() {
            Node::List(items) => items.first()?,
            other => other,
        };
        match target {
            Node::Primitive(Primitive::String(s)) => Some(s.clone()),
            Node::Primitive(Primitive::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// True for `{"var": "<name>"}` / `{"var": ["<name>"]}` without a default
    pub fn is_plain_var(&self, field: &str) -> bool {
        let Node::Operator { name, args } = self else {
            return false;
        };
        if name != "var" {
            return false;
        }
        match args.as_ref() {
            Node::Primitive(Primitive::String(s)) => s == field,
            Node::List(items) => {
                matches!(items.as_slice(), [Node::Primitive(Primitive::String(s))] if s == field)
            }
            _ => false,
        }
    }
}

/// Extract the single `(name, args)` entry of an operator object
pub(crate) fn single_entry<'a>(
    map: &'a Map<String, Value>,
    path: &JsonPath,
) -> Result<(&'a String, &'a Value), TranspileError> {
    let mut entries = map.iter();
    match (entries.next(), map.len()) {
        (Some(entry), 1) => Ok(entry),
        (None, _) => Err(TranspileError::empty_operator_object(path)),
        _ => Err(TranspileError::multiple_keys(
            path,
            map.keys().map(String::as_str).collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::transpiler::ErrorKind;

    fn decode(value: Value) -> Result<Node, TranspileError> {
        Node::from_value(&value, &JsonPath::root())
    }

    #[test]
    fn test_decode_operator() {
        let node = decode(json!({"==": [{"var": "a"}, 1]})).unwrap();
        let Node::Operator { name, args } = node else {
            panic!("expected operator");
        };
        assert_eq!(name, "==");
        assert_eq!(args.as_arguments().len(), 2);
        assert_eq!(args.as_arguments()[0].var_name().as_deref(), Some("a"));
    }

    #[test]
    fn test_decode_rejects_multiple_keys() {
        let err = decode(json!({"and": [{"var": "a"}, {"==": [1, 1], "!=": [1, 2]}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MultipleKeys);
        assert_eq!(err.path(), "$.and[1]");
    }

    #[test]
    fn test_decode_rejects_empty_object() {
        let err = decode(json!({})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOperatorObject);
        assert_eq!(err.path(), "$");
    }

    #[test]
    fn test_single_argument_normalisation() {
        let node = decode(json!(true)).unwrap();
        assert_eq!(node.as_arguments(), &[Node::Primitive(Primitive::Bool(true))]);
    }

    #[test]
    fn test_var_name() {
        assert_eq!(
            decode(json!({"var": ["age", 18]})).unwrap().var_name().as_deref(),
            Some("age")
        );
        assert_eq!(decode(json!({"var": 2})).unwrap().var_name().as_deref(), Some("2"));
        assert_eq!(decode(json!({"cat": ["a"]})).unwrap().var_name(), None);
    }

    #[test]
    fn test_is_plain_var() {
        assert!(decode(json!({"var": "current"})).unwrap().is_plain_var("current"));
        assert!(decode(json!({"var": ["current"]})).unwrap().is_plain_var("current"));
        assert!(!decode(json!({"var": ["current", 0]})).unwrap().is_plain_var("current"));
        assert!(!decode(json!({"var": "other"})).unwrap().is_plain_var("current"));
    }

    #[test]
    fn test_render_literals() {
        assert_eq!(Primitive::Null.render(Dialect::BigQuery), "NULL");
        assert_eq!(Primitive::Bool(true).render(Dialect::BigQuery), "TRUE");
        assert_eq!(
            Primitive::Number(Number::from_f64(2.5).unwrap()).render(Dialect::DuckDB),
            "2.5"
        );
        assert_eq!(
            Primitive::String("o'k".to_string()).render(Dialect::PostgreSQL),
            "'o''k'"
        );
    }
}
