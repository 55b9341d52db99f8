//! Wrappers built by [`FunctionExt`](super::FunctionExt).
//!
//! Each wrapper delegates everything it does not change to the inner
//! function.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use arbor_ir::{Expression, FunctionName, Parameter, ValueType};

use super::ExpressionFunction;
use crate::errors::{EvalError, EvalResult};
use crate::{EvaluationContext, Value};

/// Forwards parameters, preparation, purity and return type to `self.inner`.
/// Arity checks use the defaults so diagnostics carry the wrapper's name.
macro_rules! delegate_function {
    () => {
        fn parameters(&self, count: usize) -> Cow<'_, [Parameter]> {
            self.inner.parameters(count)
        }

        fn prepare_parameters(
            &self,
            args: &[Expression],
            ctx: &dyn EvaluationContext,
        ) -> Result<Vec<Value>, EvalError> {
            self.inner.prepare_parameters(args, ctx)
        }

        fn is_pure(&self, ctx: &dyn EvaluationContext) -> bool {
            self.inner.is_pure(ctx)
        }

        fn return_type(&self) -> ValueType {
            self.inner.return_type()
        }
    };
}

/// A function under a different name.
#[derive(Clone, Debug)]
pub struct NamedFunction {
    name: FunctionName,
    inner: Arc<dyn ExpressionFunction>,
}

impl NamedFunction {
    pub fn new(name: impl Into<FunctionName>, inner: impl ExpressionFunction + 'static) -> Self {
        NamedFunction {
            name: name.into(),
            inner: Arc::new(inner),
        }
    }
}

impl ExpressionFunction for NamedFunction {
    fn name(&self) -> Option<&FunctionName> {
        Some(&self.name)
    }

    delegate_function!();

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        self.inner.apply(args, ctx)
    }
}

type Mapper =
    dyn Fn(&[Value], &dyn EvaluationContext) -> Result<Vec<Value>, EvalError> + Send + Sync;

/// Rewrites prepared arguments before the inner `apply`.
#[derive(Clone)]
pub struct MappedParameters {
    inner: Arc<dyn ExpressionFunction>,
    mapper: Arc<Mapper>,
}

impl MappedParameters {
    pub fn new<M>(inner: impl ExpressionFunction + 'static, mapper: M) -> Self
    where
        M: Fn(&[Value], &dyn EvaluationContext) -> Result<Vec<Value>, EvalError>
            + Send
            + Sync
            + 'static,
    {
        MappedParameters {
            inner: Arc::new(inner),
            mapper: Arc::new(mapper),
        }
    }
}

impl fmt::Debug for MappedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MappedParameters").field(&self.inner).finish()
    }
}

impl ExpressionFunction for MappedParameters {
    fn name(&self) -> Option<&FunctionName> {
        self.inner.name()
    }

    delegate_function!();

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        let mapped = (self.mapper)(args, ctx)?;
        self.inner.apply(&mapped, ctx)
    }
}

type Filter = dyn Fn(&Value, &dyn EvaluationContext) -> bool + Send + Sync;

/// Keeps only prepared arguments matching a predicate.
#[derive(Clone)]
pub struct FilteredParameters {
    inner: Arc<dyn ExpressionFunction>,
    filter: Arc<Filter>,
}

impl FilteredParameters {
    pub fn new<P>(inner: impl ExpressionFunction + 'static, filter: P) -> Self
    where
        P: Fn(&Value, &dyn EvaluationContext) -> bool + Send + Sync + 'static,
    {
        FilteredParameters {
            inner: Arc::new(inner),
            filter: Arc::new(filter),
        }
    }
}

impl fmt::Debug for FilteredParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilteredParameters").field(&self.inner).finish()
    }
}

impl ExpressionFunction for FilteredParameters {
    fn name(&self) -> Option<&FunctionName> {
        self.inner.name()
    }

    delegate_function!();

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        let kept: Vec<Value> = args
            .iter()
            .filter(|value| (self.filter)(*value, ctx))
            .cloned()
            .collect();
        self.inner.apply(&kept, ctx)
    }
}
