//! The function contract.
//!
//! Every callable, host-provided or lambda, implements [`ExpressionFunction`].
//! A call node resolves its function through the context and then runs
//! the same sequence for every callee:
//!
//! 1. [`ExpressionFunction::check_parameter_count`]
//! 2. [`ExpressionFunction::prepare_parameters`] turns argument expressions
//!    into values according to each parameter's flags and declared type
//! 3. [`ExpressionFunction::apply`]
//!
//! [`FunctionExt`] wraps an existing function to rename it or rewrite its
//! arguments before `apply`.

mod adapters;
mod basic;
pub mod builtins;
mod lambda;
mod prepare;

use std::borrow::Cow;
use std::fmt;

use arbor_ir::{Arity, Cardinality, Expression, FunctionName, Parameter, ValueType};

use crate::errors::{arity_error, invalid_parameters, EvalError, EvalResult};
use crate::{EvaluationContext, Value};

pub use adapters::{FilteredParameters, MappedParameters, NamedFunction};
pub use basic::BasicFunction;
pub use lambda::{LambdaFunction, ScopedContext};
pub use prepare::prepare_parameters;

pub trait ExpressionFunction: Send + Sync + fmt::Debug {
    /// `None` for anonymous functions such as lambdas.
    fn name(&self) -> Option<&FunctionName>;

    /// Declared parameters for a call with `count` arguments.
    fn parameters(&self, count: usize) -> Cow<'_, [Parameter]>;

    /// The parameter receiving argument `index`. Arguments past the end of
    /// the list reuse a trailing variable parameter.
    fn parameter(&self, index: usize) -> Option<Parameter> {
        parameter_at(&self.parameters(index + 1), index).cloned()
    }

    /// Fails with `Arity` outside the declared bounds, and with
    /// `InvalidParameters` when a variable parameter is not last.
    fn check_parameter_count(&self, count: usize) -> Result<(), EvalError> {
        let name = self.name().map_or("", FunctionName::as_str);
        let arity =
            Arity::of(&self.parameters(count)).map_err(|e| invalid_parameters(name, &e))?;
        if arity.accepts(count) {
            Ok(())
        } else {
            Err(arity_error(name, count, arity.min, arity.max))
        }
    }

    /// Turn argument expressions into values. The default follows each
    /// parameter's flags; see [`prepare_parameters`].
    fn prepare_parameters(
        &self,
        args: &[Expression],
        ctx: &dyn EvaluationContext,
    ) -> Result<Vec<Value>, EvalError> {
        prepare_parameters(self, args, ctx)
    }

    /// Advisory: whether repeated calls with equal arguments give equal
    /// results without side effects.
    fn is_pure(&self, ctx: &dyn EvaluationContext) -> bool;

    fn return_type(&self) -> ValueType {
        ValueType::Any
    }

    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult;
}

/// Parameter for argument `index`, falling back to a trailing variable one.
pub(crate) fn parameter_at(parameters: &[Parameter], index: usize) -> Option<&Parameter> {
    parameters.get(index).or_else(|| {
        parameters
            .last()
            .filter(|p| p.cardinality == Cardinality::Variable)
    })
}

/// Name used in diagnostics.
pub(crate) fn display_name<F: ExpressionFunction + ?Sized>(function: &F) -> &str {
    function.name().map_or("<lambda>", FunctionName::as_str)
}

/// Combinators over any [`ExpressionFunction`].
pub trait FunctionExt: ExpressionFunction + Sized + 'static {
    /// The same function under another name.
    fn with_name(self, name: impl Into<FunctionName>) -> NamedFunction {
        NamedFunction::new(name, self)
    }

    /// Rewrite the prepared argument list before `apply`.
    fn map_parameters<M>(self, mapper: M) -> MappedParameters
    where
        M: Fn(&[Value], &dyn EvaluationContext) -> Result<Vec<Value>, EvalError>
            + Send
            + Sync
            + 'static,
    {
        MappedParameters::new(self, mapper)
    }

    /// Drop prepared arguments that fail `filter` before `apply`.
    fn filter_parameters<P>(self, filter: P) -> FilteredParameters
    where
        P: Fn(&Value, &dyn EvaluationContext) -> bool + Send + Sync + 'static,
    {
        FilteredParameters::new(self, filter)
    }
}

impl<F: ExpressionFunction + 'static> FunctionExt for F {}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
