//! Binary operator evaluation.
//!
//! Numeric operands go to the `arbor_num` reducer. The remaining rules
//! cover text concatenation, generic ordering and truthiness.

use arbor_ir::{BinaryOp, Expression, OpGroup, ValueType};
use arbor_num::{ArithmeticOp, Number, Relation};

use super::numeric_operand;
use crate::errors::{type_mismatch, EvalError, EvalResult};
use crate::{EvaluationContext, Value};

/// Both operands are always evaluated, left first. Logical operators do
/// not short-circuit.
pub(super) fn evaluate_binary(
    op: BinaryOp,
    left: &Expression,
    right: &Expression,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let left = ctx.evaluate(left)?;
    let right = ctx.evaluate(right)?;
    match op.group() {
        OpGroup::Arithmetic(arithmetic) => eval_arithmetic(op, arithmetic, &left, &right, ctx),
        OpGroup::Comparison(relation) => eval_comparison(op, relation, &left, &right, ctx),
        OpGroup::Logical(bitwise) => eval_logical(bitwise, &left, &right, ctx),
    }
}

fn numeric_operands(
    left: &Value,
    right: &Value,
    ctx: &dyn EvaluationContext,
) -> Result<Option<(Number, Number)>, EvalError> {
    let kind = ctx.number_kind();
    match (numeric_operand(left, kind)?, numeric_operand(right, kind)?) {
        (Some(l), Some(r)) => Ok(Some((l, r))),
        _ => Ok(None),
    }
}

fn eval_arithmetic(
    op: BinaryOp,
    arithmetic: ArithmeticOp,
    left: &Value,
    right: &Value,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    if let Some((l, r)) = numeric_operands(left, right, ctx)? {
        let result = arbor_num::apply(arithmetic, l, r, ctx.number_kind(), &ctx.math_context())?;
        return Ok(Value::Number(result));
    }
    match (op, left, right) {
        (BinaryOp::Add, Value::Text(_), _) | (BinaryOp::Add, _, Value::Text(_)) => {
            concatenate(left, right, ctx).map_err(|_| type_mismatch(op.as_symbol(), left, right))
        }
        _ => Err(type_mismatch(op.as_symbol(), left, right)),
    }
}

fn concatenate(left: &Value, right: &Value, ctx: &dyn EvaluationContext) -> EvalResult {
    let left = ctx.convert(left.clone(), ValueType::Text)?;
    let right = ctx.convert(right.clone(), ValueType::Text)?;
    Ok(Value::text(format!("{left}{right}")))
}

fn eval_comparison(
    op: BinaryOp,
    relation: Relation,
    left: &Value,
    right: &Value,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    if let Some((l, r)) = numeric_operands(left, right, ctx)? {
        let result = arbor_num::compare(relation, l, r, &ctx.math_context())?;
        return Ok(Value::Bool(result));
    }
    match ctx.compare(left, right) {
        Some(ordering) => Ok(Value::Bool(relation.test(Some(ordering)))),
        None => Err(type_mismatch(op.as_symbol(), left, right)),
    }
}

/// Booleans on either side select boolean algebra over truthiness; two
/// numbers select the bitwise reducer.
fn eval_logical(
    bitwise: ArithmeticOp,
    left: &Value,
    right: &Value,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let has_bool = matches!(left, Value::Bool(_)) || matches!(right, Value::Bool(_));
    if !has_bool {
        if let Some((l, r)) = numeric_operands(left, right, ctx)? {
            let result = arbor_num::apply(bitwise, l, r, ctx.number_kind(), &ctx.math_context())?;
            return Ok(Value::Number(result));
        }
    }
    let l = ctx.is_truthy(left)?;
    let r = ctx.is_truthy(right)?;
    Ok(Value::Bool(match bitwise {
        ArithmeticOp::And => l && r,
        ArithmeticOp::Or => l || r,
        _ => l != r,
    }))
}
