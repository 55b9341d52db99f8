//! Argument preparation.

use arbor_ir::{Expression, Parameter, ValueType};

use super::{display_name, parameter_at, ExpressionFunction};
use crate::errors::{parameter_type_error, unknown_reference, EvalError, EvalResult};
use crate::{EvaluationContext, Value};

/// Prepare `args` for `function`.
///
/// For each argument and its parameter:
/// - a bare reference to a `RESOLVE_REFERENCES` parameter is replaced by
///   its value (`UnknownReference` when absent)
/// - an `UNEVALUATED` parameter receives the expression itself
/// - any other bare reference is passed as `Value::Reference`
/// - everything else is evaluated
///
/// Evaluated values are then converted to the declared type. A reference
/// passed to a parameter that wants neither a reference nor an expression
/// is resolved first.
///
/// Returns a fresh vector; `args` is not modified.
pub fn prepare_parameters<F: ExpressionFunction + ?Sized>(
    function: &F,
    args: &[Expression],
    ctx: &dyn EvaluationContext,
) -> Result<Vec<Value>, EvalError> {
    let parameters = function.parameters(args.len());
    args.iter()
        .enumerate()
        .map(|(index, arg)| match parameter_at(&parameters, index) {
            Some(parameter) => prepare_argument(display_name(function), parameter, arg, ctx),
            None => ctx.evaluate(arg),
        })
        .collect()
}

fn prepare_argument(
    function: &str,
    parameter: &Parameter,
    arg: &Expression,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let value = match arg.as_reference() {
        Some(reference) if parameter.resolves_references() => ctx
            .reference(&reference)?
            .ok_or_else(|| unknown_reference(&reference))?,
        _ if parameter.is_unevaluated() => return Ok(Value::Expression(arg.clone())),
        Some(reference) => Value::Reference(reference),
        None => ctx.evaluate(arg)?,
    };
    convert_parameter(function, parameter, value, ctx)
}

fn convert_parameter(
    function: &str,
    parameter: &Parameter,
    value: Value,
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let value = match value {
        Value::Reference(reference)
            if !matches!(
                parameter.ty,
                ValueType::Any | ValueType::Reference | ValueType::Expression
            ) =>
        {
            ctx.reference(&reference)?
                .ok_or_else(|| unknown_reference(&reference))?
        }
        value => value,
    };
    if parameter.ty == ValueType::Any || value.value_type() == parameter.ty {
        return Ok(value);
    }
    ctx.convert(value.clone(), parameter.ty).map_err(|_| {
        parameter_type_error(function, parameter.name.as_str(), &value, parameter.ty)
    })
}
