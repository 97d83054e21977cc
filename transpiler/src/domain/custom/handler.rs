//! Custom operator handler traits

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::transpiler::BoxError;
use crate::sql::Dialect;

/// Handler producing SQL from already-rendered argument fragments
pub trait OperatorHandler: Send + Sync {
    fn to_sql(&self, operator: &str, args: &[String]) -> Result<String, BoxError>;
}

/// Handler that also receives the transpiler's target dialect
pub trait DialectAwareOperatorHandler: Send + Sync {
    fn to_sql_with_dialect(
        &self,
        operator: &str,
        args: &[String],
        dialect: Dialect,
    ) -> Result<String, BoxError>;
}

impl<F> OperatorHandler for F
where
    F: Fn(&str, &[String]) -> Result<String, BoxError> + Send + Sync,
{
    fn to_sql(&self, operator: &str, args: &[String]) -> Result<String, BoxError> {
        self(operator, args)
    }
}

impl<F> DialectAwareOperatorHandler for F
where
    F: Fn(&str, &[String], Dialect) -> Result<String, BoxError> + Send + Sync,
{
    fn to_sql_with_dialect(
        &self,
        operator: &str,
        args: &[String],
        dialect: Dialect,
    ) -> Result<String, BoxError> {
        self(operator, args, dialect)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("custom operator name must not be empty")]
    EmptyName,

    #[error("'{0}' is a built-in operator and cannot be registered")]
    Reserved(String),

    #[error("operator '{operator}' has a {actual} handler but was invoked as {expected}")]
    HandlerShapeMismatch {
        operator: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// A registered handler of either shape
#[derive(Clone)]
pub enum CustomOperator {
    Plain(Arc<dyn OperatorHandler>),
    DialectAware(Arc<dyn DialectAwareOperatorHandler>),
}

impl CustomOperator {
    pub fn is_dialect_aware(&self) -> bool {
        matches!(self, CustomOperator::DialectAware(_))
    }

    fn shape(&self) -> &'static str {
        if self.is_dialect_aware() {
            "dialect-aware"
        } else {
            "plain"
        }
    }

    fn mismatch(&self, operator: &str, expected: &'static str) -> BoxError {
        Box::new(RegistryError::HandlerShapeMismatch {
            operator: operator.to_string(),
            expected,
            actual: self.shape(),
        })
    }

    /// Invoke a plain handler
    pub fn call(&self, operator: &str, args: &[String]) -> Result<String, BoxError> {
        match self {
            CustomOperator::Plain(handler) => handler.to_sql(operator, args),
            CustomOperator::DialectAware(_) => Err(self.mismatch(operator, "plain")),
        }
    }

    /// Invoke a dialect-aware handler
    pub fn call_with_dialect(
        &self,
        operator: &str,
        args: &[String],
        dialect: Dialect,
    ) -> Result<String, BoxError> {
        match self {
            CustomOperator::DialectAware(handler) => {
                handler.to_sql_with_dialect(operator, args, dialect)
            }
            CustomOperator::Plain(_) => Err(self.mismatch(operator, "dialect-aware")),
        }
    }

    /// Invoke whichever shape is registered
    pub fn invoke(
        &self,
        operator: &str,
        args: &[String],
        dialect: Dialect,
    ) -> Result<String, BoxError> {
        match self {
            CustomOperator::Plain(_) => self.call(operator, args),
            CustomOperator::DialectAware(_) => self.call_with_dialect(operator, args, dialect),
        }
    }
}

impl fmt::Debug for CustomOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CustomOperator({})", self.shape())
    }
}
