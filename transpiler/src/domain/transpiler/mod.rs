//! JSON-Logic to SQL compiler
//!
//! Compilation runs in three phases over an immutable expression:
//! 1. structural validation of the raw JSON ([`Validator`])
//! 2. decoding into the [`Node`] tree
//! 3. recursive lowering, dispatching each operator to its category
//!    compiler or to a registered custom handler
//!
//! A transpiler holds no per-call state, so one instance can be shared
//! across threads once configured.

mod context;
mod error;
mod frame;
pub mod operators;
mod validator;
mod value;


use std::sync::Arc;

use serde_json::Value;

pub use context::ExpressionCompiler;
pub use error::{BoxError, ErrorKind, TranspileError};
pub use frame::{Frame, Scope};
pub use operators::{RESERVED_OPERATORS, is_reserved_operator};
pub use validator::Validator;
pub use value::ProcessedValue;

use crate::domain::custom::{CustomOperatorRegistry, OperatorHandler, RegistryError};
use crate::domain::logic::{JsonPath, Node};
use crate::domain::schema::SchemaProvider;
use crate::sql::Dialect;
use operators::BuiltinOperator;

/// Default limit on expression nesting
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Builder for [`Transpiler`]
pub struct TranspilerBuilder {
    dialect: Dialect,
    schema: Option<Arc<dyn SchemaProvider>>,
    registry: Arc<CustomOperatorRegistry>,
    max_depth: usize,
}

impl TranspilerBuilder {
    pub fn schema(mut self, schema: impl SchemaProvider + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    pub fn shared_schema(mut self, schema: Arc<dyn SchemaProvider>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Use an existing registry; it may be shared with other transpilers
    pub fn registry(mut self, registry: impl Into<Arc<CustomOperatorRegistry>>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn build(self) -> Transpiler {
        if !self.dialect.is_valid() {
            tracing::warn!(
                dialect = %self.dialect,
                "No SQL dialect selected; dialect-sensitive operators will fail to compile"
            );
        }
        Transpiler {
            dialect: self.dialect,
            schema: self.schema,
            registry: self.registry,
            max_depth: self.max_depth,
        }
    }
}

/// Compiles JSON-Logic expressions into SQL `WHERE` clauses
pub struct Transpiler {
    dialect: Dialect,
    schema: Option<Arc<dyn SchemaProvider>>,
    registry: Arc<CustomOperatorRegistry>,
    max_depth: usize,
}

impl Transpiler {
    pub fn new(dialect: Dialect) -> Self {
        Self::builder(dialect).build()
    }

    pub fn builder(dialect: Dialect) -> TranspilerBuilder {
        TranspilerBuilder {
            dialect,
            schema: None,
            registry: Arc::new(CustomOperatorRegistry::new()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Transpiler for another dialect sharing this one's schema and registry
    pub fn with_dialect(&self, dialect: Dialect) -> Transpiler {
        let mut builder = Self::builder(dialect)
            .registry(Arc::clone(&self.registry))
            .max_depth(self.max_depth);
        if let Some(schema) = &self.schema {
            builder = builder.shared_schema(Arc::clone(schema));
        }
        builder.build()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_schema(&mut self, schema: Arc<dyn SchemaProvider>) {
        self.schema = Some(schema);
    }

    pub fn clear_schema(&mut self) {
        self.schema = None;
    }

    pub fn registry(&self) -> &CustomOperatorRegistry {
        &self.registry
    }

    /// Shorthand for registering a plain handler on this transpiler's registry
    pub fn register_operator(
        &self,
        name: &str,
        handler: impl OperatorHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.registry.register(name, handler)
    }

    /// Compile JSON text into `WHERE <condition>`
    pub fn compile(&self, json: &str) -> Result<String, TranspileError> {
        Ok(format!("WHERE {}", self.compile_condition(json)?))
    }

    /// Compile a parsed value into `WHERE <condition>`
    pub fn compile_value(&self, value: &Value) -> Result<String, TranspileError> {
        Ok(format!("WHERE {}", self.compile_condition_value(value)?))
    }

    /// Compile JSON text into a bare condition
    pub fn compile_condition(&self, json: &str) -> Result<String, TranspileError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            TranspileError::invalid_expression(&JsonPath::root(), format!("invalid JSON: {}", e))
                .with_cause(e)
        })?;
        self.compile_condition_value(&value)
    }

    /// Compile a parsed value into a bare condition
    pub fn compile_condition_value(&self, value: &Value) -> Result<String, TranspileError> {
        let is_custom = |name: &str| self.registry.has(name);
        Validator::new(&is_custom, self.max_depth).validate(value)?;

        let root = Node::from_value(value, &JsonPath::root())?;
        let sql = self.compile_expression(&root, &Frame::root())?;
        tracing::debug!(dialect = %self.dialect, sql = %sql, "Compiled expression");
        Ok(sql)
    }

    fn compile_operator(
        &self,
        name: &str,
        args: &Node,
        parent: &Frame,
    ) -> Result<String, TranspileError> {
        let frame = parent.enter(name);
        if frame.depth() > self.max_depth {
            return Err(TranspileError::recursion_limit(frame.path(), self.max_depth));
        }

        if let Some(custom) = self.registry.get(name) {
            let rendered = args
                .as_arguments()
                .iter()
                .enumerate()
                .map(|(i, arg)| {
                    let value = self.compile_operand(arg, &frame.arg(i))?;
                    Ok(self.render(&value))
                })
                .collect::<Result<Vec<_>, TranspileError>>()?;
            tracing::trace!(operator = name, args = rendered.len(), "Invoking custom operator");
            return custom.invoke(name, &rendered, self.dialect).map_err(|e| {
                frame
                    .error(
                        ErrorKind::CustomOperatorFailed,
                        format!("custom operator '{}' failed: {}", name, e),
                    )
                    .with_cause(e)
            });
        }

        match BuiltinOperator::from_name(name) {
            Some(operator) => operator.compile(self, args, &frame),
            None => Err(TranspileError::unsupported_operator(frame.path(), name)),
        }
    }
}

impl ExpressionCompiler for Transpiler {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn schema(&self) -> Option<&dyn SchemaProvider> {
        self.schema.as_deref()
    }

    fn compile_expression(&self, node: &Node, frame: &Frame) -> Result<String, TranspileError> {
        match node {
            Node::Operator { name, args } => self.compile_operator(name, args, frame),
            Node::Primitive(p) => Err(TranspileError::invalid_expression(
                frame.path(),
                format!("expected an operator object, got a {} literal", p.kind()),
            )),
            Node::List(_) => Err(TranspileError::invalid_expression(
                frame.path(),
                "expected an operator object, got an array",
            )),
        }
    }

    fn compile_operand(&self, node: &Node, frame: &Frame) -> Result<ProcessedValue, TranspileError> {
        match node {
            Node::Primitive(p) => Ok(ProcessedValue::Literal(p.clone())),
            Node::Operator { name, args } => {
                self.compile_operator(name, args, frame).map(ProcessedValue::Sql)
            }
            Node::List(items) => {
                let sql = self.sql_dialect(frame)?;
                let elements = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let value = self.compile_operand(item, &frame.arg(i))?;
                        Ok(self.render(&value))
                    })
                    .collect::<Result<Vec<_>, TranspileError>>()?;
                Ok(ProcessedValue::Sql(sql.array_literal(&elements)))
            }
        }
    }
}

impl std::fmt::Debug for Transpiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transpiler")
            .field("dialect", &self.dialect)
            .field("has_schema", &self.schema.is_some())
            .field("registry", &self.registry)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
