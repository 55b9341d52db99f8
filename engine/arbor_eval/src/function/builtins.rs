//! Functions registered by [`FunctionRegistry::with_builtins`](crate::FunctionRegistry::with_builtins).

use std::borrow::Cow;
use std::sync::LazyLock;

use arbor_ir::{FunctionName, Parameter, ParameterFlags, ValueType};

use super::ExpressionFunction;
use crate::errors::{EvalError, EvalResult};
use crate::{EvaluationContext, Value};

static FALSE: LazyLock<FunctionName> = LazyLock::new(|| FunctionName::new("false"));
static STARTS_WITH: LazyLock<FunctionName> = LazyLock::new(|| FunctionName::new("starts-with"));

static STARTS_WITH_PARAMETERS: LazyLock<[Parameter; 2]> = LazyLock::new(|| {
    [
        Parameter::required("text", ValueType::Text),
        Parameter::required("prefix", ValueType::Text),
    ]
    .map(|p| p.with_flags(ParameterFlags::RESOLVE_REFERENCES))
});

/// `false()`: always `false`.
#[derive(Copy, Clone, Debug, Default)]
pub struct FalseFunction;

impl ExpressionFunction for FalseFunction {
    fn name(&self) -> Option<&FunctionName> {
        Some(&FALSE)
    }

    fn parameters(&self, _count: usize) -> Cow<'_, [Parameter]> {
        Cow::Borrowed(&[])
    }

    fn is_pure(&self, _ctx: &dyn EvaluationContext) -> bool {
        true
    }

    fn return_type(&self) -> ValueType {
        ValueType::Bool
    }

    fn apply(&self, _args: &[Value], _ctx: &dyn EvaluationContext) -> EvalResult {
        Ok(Value::Bool(false))
    }
}

/// `starts-with(text, prefix)`: whether `text` begins with `prefix`.
///
/// Both arguments resolve bare references to their values.
#[derive(Copy, Clone, Debug, Default)]
pub struct StartsWithFunction;

impl ExpressionFunction for StartsWithFunction {
    fn name(&self) -> Option<&FunctionName> {
        Some(&STARTS_WITH)
    }

    fn parameters(&self, _count: usize) -> Cow<'_, [Parameter]> {
        Cow::Borrowed(&STARTS_WITH_PARAMETERS[..])
    }

    fn is_pure(&self, _ctx: &dyn EvaluationContext) -> bool {
        true
    }

    fn return_type(&self) -> ValueType {
        ValueType::Bool
    }

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        self.check_parameter_count(args.len())?;
        let text = text_argument(&args[0], ctx)?;
        let prefix = text_argument(&args[1], ctx)?;
        Ok(Value::Bool(text.starts_with(&*prefix)))
    }
}

/// Arguments arrive as text after preparation; direct `apply` callers may
/// pass anything convertible.
fn text_argument(value: &Value, ctx: &dyn EvaluationContext) -> Result<String, EvalError> {
    match value {
        Value::Text(s) => Ok(s.to_string()),
        other => ctx.convert(other.clone(), ValueType::Text).map(|v| v.to_string()),
    }
}
