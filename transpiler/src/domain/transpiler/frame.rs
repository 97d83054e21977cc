//! Per-node compilation state

use super::error::{ErrorKind, TranspileError};
use crate::domain::logic::JsonPath;

/// Variable scope in effect for a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Top-level row: `var` names are columns
    Root,
    /// Body of `map`/`filter`/`all`/`some`/`none`: the element is bound
    Element,
    /// Body of a general `reduce`: element and accumulator are bound
    Reduce { accumulator: String },
}

/// Location, depth and scope of the node being compiled
#[derive(Debug, Clone)]
pub struct Frame {
    path: JsonPath,
    depth: usize,
    scope: Scope,
    operator: Option<String>,
}

impl Frame {
    pub fn root() -> Self {
        Self {
            path: JsonPath::root(),
            depth: 0,
            scope: Scope::Root,
            operator: None,
        }
    }

    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Number of enclosing operators
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn in_loop(&self) -> bool {
        self.scope != Scope::Root
    }

    /// Innermost operator being compiled
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// Frame for the arguments of `operator`
    pub fn enter(&self, operator: &str) -> Self {
        Self {
            path: self.path.operator(operator),
            depth: self.depth + 1,
            scope: self.scope.clone(),
            operator: Some(operator.to_string()),
        }
    }

    /// Frame for argument `index`
    pub fn arg(&self, index: usize) -> Self {
        Self {
            path: self.path.index(index),
            ..self.clone()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Error located at this frame and attributed to its operator
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> TranspileError {
        let err = TranspileError::new(kind, &self.path, message);
        match &self.operator {
            Some(operator) => err.with_operator(operator.clone()),
            None => err,
        }
    }

    pub fn invalid_argument(&self, message: impl Into<String>) -> TranspileError {
        self.error(ErrorKind::InvalidArgument, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_arg() {
        let frame = Frame::root().enter("and").arg(1).enter("map");
        assert_eq!(frame.path().as_str(), "$.and[1].map");
        assert_eq!(frame.depth(), 2);
        assert_eq!(frame.operator(), Some("map"));
        assert!(!frame.in_loop());
    }

    #[test]
    fn test_scope_is_inherited() {
        let frame = Frame::root()
            .enter("map")
            .arg(1)
            .with_scope(Scope::Element)
            .enter("*");
        assert_eq!(frame.scope(), &Scope::Element);
        assert!(frame.in_loop());
    }

    #[test]
    fn test_error_carries_location() {
        let err = Frame::root().enter("substr").arg(2).invalid_argument("negative length");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.path(), "$.substr[2]");
        assert_eq!(err.operator(), Some("substr"));
    }
}
