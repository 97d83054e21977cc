//! Interface between the orchestrator and the operator compilers

use super::error::{ErrorKind, TranspileError};
use super::frame::Frame;
use super::value::ProcessedValue;
use crate::domain::logic::Node;
use crate::domain::schema::SchemaProvider;
use crate::sql::{Dialect, SqlDialect};

/// Recursive compilation entry points handed to each operator
pub trait ExpressionCompiler {
    fn dialect(&self) -> Dialect;

    fn schema(&self) -> Option<&dyn SchemaProvider>;

    /// Compile a node that must produce SQL (an operator)
    fn compile_expression(&self, node: &Node, frame: &Frame) -> Result<String, TranspileError>;

    /// Compile a node used as an operand; literals stay unrendered
    fn compile_operand(&self, node: &Node, frame: &Frame) -> Result<ProcessedValue, TranspileError>;

    /// SQL generator for a dialect-sensitive construct
    ///
    /// Fails with [`ErrorKind::Dialect`] naming the frame's operator when no
    /// concrete dialect is configured.
    fn sql_dialect(&self, frame: &Frame) -> Result<&'static dyn SqlDialect, TranspileError> {
        self.dialect().validate().map_err(|e| {
            let construct = frame.operator().unwrap_or("array literal");
            frame
                .error(
                    ErrorKind::Dialect,
                    format!("operator '{}' requires a concrete SQL dialect", construct),
                )
                .with_cause(e)
        })
    }

    fn render(&self, value: &ProcessedValue) -> String {
        value.render(self.dialect())
    }

    fn render_operand(&self, value: &ProcessedValue) -> String {
        value.render_operand(self.dialect())
    }
}
