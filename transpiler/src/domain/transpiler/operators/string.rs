//! String operators: `cat`, `substr`

use super::{ArgKind, Signature, expect_arity, render_all};
use crate::domain::logic::Node;
use crate::domain::transpiler::context::ExpressionCompiler;
use crate::domain::transpiler::error::TranspileError;
use crate::domain::transpiler::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOperator {
    Concat,
    Substring,
}

impl StringOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cat" => Some(Self::Concat),
            "substr" => Some(Self::Substring),
            _ => None,
        }
    }

    pub fn signature(&self) -> Signature {
        match self {
            Self::Concat => Signature::args(1, None),
            Self::Substring => Signature::Args {
                min: 2,
                max: Some(3),
                kinds: &[ArgKind::Any, ArgKind::Number, ArgKind::Number],
            },
        }
    }

    pub(crate) fn compile(
        &self,
        compiler: &dyn ExpressionCompiler,
        args: &[Node],
        frame: &Frame,
    ) -> Result<String, TranspileError> {
        match self {
            Self::Concat => {
                expect_arity(args, 1, None, frame)?;
                let parts = render_all(compiler, args, frame)?;
                Ok(format!("CONCAT({})", parts.join(", ")))
            }
            Self::Substring => compile_substr(compiler, args, frame),
        }
    }
}

/// JSON-Logic offsets are 0-based and may count from the end; SQL `SUBSTR`
/// is 1-based.
fn compile_substr(
    compiler: &dyn ExpressionCompiler,
    args: &[Node],
    frame: &Frame,
) -> Result<String, TranspileError> {
    expect_arity(args, 2, Some(3), frame)?;
    let source = compiler.render(&compiler.compile_operand(&args[0], &frame.arg(0))?);

    let start_frame = frame.arg(1);
    let start = match args[1].as_primitive() {
        Some(literal) => match literal.as_i64() {
            Some(offset) if offset >= 0 => offset.saturating_add(1).to_string(),
            Some(-1) => format!("LENGTH({})", source),
            Some(offset) => format!("LENGTH({}) - {}", source, offset.unsigned_abs() - 1),
            None => return Err(start_frame.invalid_argument("start offset must be an integer")),
        },
        None => {
            let start = compiler.compile_operand(&args[1], &start_frame)?;
            format!("({} + 1)", compiler.render_operand(&start))
        }
    };

    let Some(length) = args.get(2) else {
        return Ok(format!("SUBSTR({}, {})", source, start));
    };
    let length_frame = frame.arg(2);
    let length = match length.as_primitive() {
        Some(literal) => match literal.as_i64() {
            Some(n) if n >= 0 => n.to_string(),
            Some(_) => {
                return Err(length_frame.invalid_argument(
                    "negative substring lengths are not supported",
                ));
            }
            None => return Err(length_frame.invalid_argument("length must be an integer")),
        },
        None => compiler.render(&compiler.compile_operand(length, &length_frame)?),
    };
    Ok(format!("SUBSTR({}, {}, {})", source, start, length))
}
