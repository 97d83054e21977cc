//! Compilation errors

use std::fmt;

use thiserror::Error;

use crate::domain::logic::JsonPath;

/// Boxed error returned by custom operator handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a compilation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural or arity check failed before compilation
    Validation,
    /// Operator object with more than one key
    MultipleKeys,
    /// Operator object with no keys
    EmptyOperatorObject,
    /// Well-formed operator with an unusable argument
    InvalidArgument,
    UnsupportedOperator,
    CustomOperatorFailed,
    /// Dialect-sensitive operator used without a concrete dialect
    Dialect,
    /// Input is not a JSON-Logic expression
    InvalidExpression,
    RecursionLimit,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation error",
            ErrorKind::MultipleKeys => "multiple keys in operator object",
            ErrorKind::EmptyOperatorObject => "empty operator object",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::UnsupportedOperator => "unsupported operator",
            ErrorKind::CustomOperatorFailed => "custom operator failed",
            ErrorKind::Dialect => "dialect error",
            ErrorKind::InvalidExpression => "invalid expression",
            ErrorKind::RecursionLimit => "recursion limit exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compilation error with the location of the offending node
#[derive(Error, Debug)]
#[error("{kind} at {path}: {message}")]
pub struct TranspileError {
    kind: ErrorKind,
    operator: Option<String>,
    path: String,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl TranspileError {
    pub fn new(kind: ErrorKind, path: &JsonPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            operator: None,
            path: path.to_string(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn validation(path: &JsonPath, operator: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, path, message).with_operator(operator)
    }

    pub fn multiple_keys(path: &JsonPath, keys: Vec<&str>) -> Self {
        Self::new(
            ErrorKind::MultipleKeys,
            path,
            format!(
                "operator objects must have exactly one key, found {}: {}",
                keys.len(),
                keys.join(", ")
            ),
        )
    }

    pub fn empty_operator_object(path: &JsonPath) -> Self {
        Self::new(
            ErrorKind::EmptyOperatorObject,
            path,
            "operator objects must have exactly one key, found none",
        )
    }

    pub fn unsupported_operator(path: &JsonPath, operator: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperator,
            path,
            format!("unsupported operator '{}'", operator),
        )
        .with_operator(operator)
    }

    pub fn invalid_expression(path: &JsonPath, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidExpression, path, message)
    }

    pub fn recursion_limit(path: &JsonPath, limit: usize) -> Self {
        Self::new(
            ErrorKind::RecursionLimit,
            path,
            format!("expression nesting exceeds the maximum depth of {}", limit),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Operator being compiled when the error occurred
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True for errors raised before any SQL was generated
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Validation
                | ErrorKind::MultipleKeys
                | ErrorKind::EmptyOperatorObject
                | ErrorKind::UnsupportedOperator
                | ErrorKind::RecursionLimit
        )
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display() {
        let path = JsonPath::root().operator("and");
        let err = TranspileError::validation(&path, "and", "requires at least 1 argument");
        assert_eq!(
            err.to_string(),
            "validation error at $.and: requires at least 1 argument"
        );
        assert_eq!(err.operator(), Some("and"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_cause_is_exposed_as_source() {
        let err = TranspileError::new(
            ErrorKind::CustomOperatorFailed,
            &JsonPath::root(),
            "handler failed",
        )
        .with_cause("boom");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("boom"));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_multiple_keys_message() {
        let err = TranspileError::multiple_keys(&JsonPath::root(), vec!["==", "!="]);
        assert_eq!(err.kind(), ErrorKind::MultipleKeys);
        assert!(err.message().contains("==, !="));
    }
}
