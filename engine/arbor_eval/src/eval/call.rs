use arbor_ir::{Expression, FunctionName};

use crate::errors::{EvalNote, EvalResult};
use crate::EvaluationContext;

/// Resolve, check arity, prepare arguments, apply.
#[tracing::instrument(level = "trace", skip_all, fields(function = %name, args = args.len()))]
pub(super) fn evaluate_call(
    name: &FunctionName,
    args: &[Expression],
    ctx: &dyn EvaluationContext,
) -> EvalResult {
    let function = ctx.function(name)?;
    function.check_parameter_count(args.len())?;
    let values = function.prepare_parameters(args, ctx)?;
    function
        .apply(&values, ctx)
        .map_err(|error| error.with_note(EvalNote::new(format!("in call to `{name}`"))))
}
