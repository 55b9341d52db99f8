use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use arbor_ir::{FunctionName, Parameter, ValueType};

use super::ExpressionFunction;
use crate::errors::EvalResult;
use crate::{EvaluationContext, Value};

type Body = dyn Fn(&[Value], &dyn EvaluationContext) -> EvalResult + Send + Sync;

/// A named function backed by a closure, for hosts registering their own
/// functions.
///
/// Pure unless marked with [`BasicFunction::impure`].
#[derive(Clone)]
pub struct BasicFunction {
    name: FunctionName,
    parameters: Vec<Parameter>,
    return_type: ValueType,
    pure: bool,
    body: Arc<Body>,
}

impl BasicFunction {
    pub fn new<B>(name: impl Into<FunctionName>, parameters: Vec<Parameter>, body: B) -> Self
    where
        B: Fn(&[Value], &dyn EvaluationContext) -> EvalResult + Send + Sync + 'static,
    {
        BasicFunction {
            name: name.into(),
            parameters,
            return_type: ValueType::Any,
            pure: true,
            body: Arc::new(body),
        }
    }

    #[must_use]
    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: ValueType) -> Self {
        self.return_type = ty;
        self
    }
}

impl fmt::Debug for BasicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicFunction")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

impl ExpressionFunction for BasicFunction {
    fn name(&self) -> Option<&FunctionName> {
        Some(&self.name)
    }

    fn parameters(&self, _count: usize) -> Cow<'_, [Parameter]> {
        Cow::Borrowed(&self.parameters)
    }

    fn is_pure(&self, _ctx: &dyn EvaluationContext) -> bool {
        self.pure
    }

    fn return_type(&self) -> ValueType {
        self.return_type
    }

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        (self.body)(args, ctx)
    }
}
