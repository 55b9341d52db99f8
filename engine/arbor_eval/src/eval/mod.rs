//! Tree evaluation.
//!
//! [`evaluate`] handles one node and evaluates children through
//! `ctx.evaluate`, so a context layered over another (a lambda scope, a
//! host wrapper) sees every nested node.

mod binary;
mod call;
mod unary;

use std::sync::Arc;

use arbor_ir::{Expression, Literal, Node, ValueType};
use arbor_num::{ExprNumber, Number, NumberKind};

use crate::errors::{conversion_error, unknown_reference, EvalError, EvalResult};
use crate::function::LambdaFunction;
use crate::{EvaluationContext, Value};

/// Evaluate `expr` in `ctx`.
pub fn evaluate(expr: &Expression, ctx: &dyn EvaluationContext) -> EvalResult {
    match expr.node() {
        Node::Value(literal) => literal_value(literal, ctx.number_kind()),
        Node::Reference(reference) => {
            let value = ctx
                .reference(&reference)?
                .ok_or_else(|| unknown_reference(&reference))?;
            match value {
                Value::Expression(stored) => ctx.evaluate(&stored),
                value => Ok(value),
            }
        }
        Node::Unary { op, operand } => unary::evaluate_unary(op, &operand, ctx),
        Node::Binary { op, left, right } => binary::evaluate_binary(op, &left, &right, ctx),
        Node::Call { function, args } => call::evaluate_call(&function, &args, ctx),
        Node::Lambda { params, body } => Ok(Value::function(LambdaFunction::new(params, body))),
    }
}

/// Number literals take the context's kind.
fn literal_value(literal: Literal, kind: NumberKind) -> EvalResult {
    Ok(match literal {
        Literal::Bool(b) => Value::Bool(b),
        Literal::Text(s) => Value::Text(s),
        Literal::Number(n) => Value::Number(n.set_kind(kind)?),
    })
}

/// Reducer operand for a numeric value, `None` otherwise. Numbers are
/// switched to `kind` first.
fn numeric_operand(value: &Value, kind: NumberKind) -> Result<Option<Number>, EvalError> {
    Ok(match value {
        Value::Number(n) => Some(n.clone().set_kind(kind)?.to_number()),
        other => other.as_raw_number(),
    })
}

/// Typed projections of an expression's value.
pub trait Evaluate {
    fn to_value(&self, ctx: &dyn EvaluationContext) -> EvalResult;

    /// A reference node yields the reference itself instead of its value,
    /// unless `resolve` forces resolution. Other nodes are evaluated.
    fn to_reference_or_value(&self, ctx: &dyn EvaluationContext, resolve: bool) -> EvalResult;

    fn to_boolean(&self, ctx: &dyn EvaluationContext) -> Result<bool, EvalError>;

    fn to_number(&self, ctx: &dyn EvaluationContext) -> Result<ExprNumber, EvalError>;

    fn to_text(&self, ctx: &dyn EvaluationContext) -> Result<Arc<str>, EvalError>;
}

impl Evaluate for Expression {
    fn to_value(&self, ctx: &dyn EvaluationContext) -> EvalResult {
        ctx.evaluate(self)
    }

    fn to_reference_or_value(&self, ctx: &dyn EvaluationContext, resolve: bool) -> EvalResult {
        match self.as_reference() {
            Some(reference) if !resolve => Ok(Value::Reference(reference)),
            _ => ctx.evaluate(self),
        }
    }

    fn to_boolean(&self, ctx: &dyn EvaluationContext) -> Result<bool, EvalError> {
        match project(self, ValueType::Bool, ctx)? {
            Value::Bool(b) => Ok(b),
            other => Err(projection_error(&other, ValueType::Bool)),
        }
    }

    fn to_number(&self, ctx: &dyn EvaluationContext) -> Result<ExprNumber, EvalError> {
        match project(self, ValueType::Number, ctx)? {
            Value::Number(n) => Ok(n),
            other => Err(projection_error(&other, ValueType::Number)),
        }
    }

    fn to_text(&self, ctx: &dyn EvaluationContext) -> Result<Arc<str>, EvalError> {
        match project(self, ValueType::Text, ctx)? {
            Value::Text(s) => Ok(s),
            other => Err(projection_error(&other, ValueType::Text)),
        }
    }
}

fn project(expr: &Expression, target: ValueType, ctx: &dyn EvaluationContext) -> EvalResult {
    let value = ctx.evaluate(expr)?;
    ctx.convert(value, target)
}

/// A converter returned a value of the wrong type.
#[cold]
fn projection_error(value: &Value, target: ValueType) -> EvalError {
    conversion_error(&value.to_string(), target.name())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
