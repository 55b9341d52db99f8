use arbor_ir::{Expression, UnaryOp};

use super::numeric_operand;
use crate::errors::{unary_type_mismatch, EvalResult};
use crate::{EvaluationContext, Value};

pub(super) fn evaluate_unary(
    op: UnaryOp,
    operand: &Expression,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let value = ctx.evaluate(operand)?;
    match op {
        UnaryOp::Negate => {
            let kind = ctx.number_kind();
            match numeric_operand(&value, kind)? {
                Some(raw) => Ok(Value::Number(kind.create(raw)?.negate(kind)?)),
                None => Err(unary_type_mismatch(op.as_symbol(), &value)),
            }
        }
        UnaryOp::Not => Ok(Value::Bool(!ctx.is_truthy(&value)?)),
    }
}
