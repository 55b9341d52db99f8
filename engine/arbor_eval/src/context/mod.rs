//! Evaluation contexts.
//!
//! [`EvaluationContext`] is the seam between the evaluator and its host.
//! [`BasicContext`] is a table-driven implementation configured through
//! [`BasicContext::builder`]; lambdas evaluate their bodies in a
//! [`ScopedContext`](crate::function::ScopedContext) layered on top.

mod config;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use arbor_ir::{Expression, FunctionName, Reference, ValueType};
use arbor_num::{MathContext, NumberKind};
use rustc_hash::FxHashMap;

use crate::errors::{unknown_function, unknown_reference, EvalError, EvalResult};
use crate::{BasicConverter, Converter, ExpressionFunction, FunctionRegistry, Value};

pub use config::ContextConfig;

/// Everything an evaluation needs from its host.
///
/// Implementations provide `evaluate` by calling [`crate::evaluate`] with
/// themselves, so nested nodes see the same context:
///
/// ```text
/// fn evaluate(&self, expr: &Expression) -> EvalResult {
///     arbor_eval::evaluate(expr, self)
/// }
/// ```
pub trait EvaluationContext {
    fn evaluate(&self, expr: &Expression) -> EvalResult;

    /// Look up a function by name. Fails with `UnknownFunction`.
    fn function(&self, name: &FunctionName) -> Result<Arc<dyn ExpressionFunction>, EvalError>;

    /// Resolve a reference. `Ok(None)` means "not found"; callers that
    /// need a value raise `UnknownReference`.
    fn reference(&self, reference: &Reference) -> Result<Option<Value>, EvalError>;

    fn number_kind(&self) -> NumberKind;

    fn math_context(&self) -> MathContext;

    fn convert(&self, value: Value, target: ValueType) -> EvalResult;

    /// Whether calls to `name` are free of side effects. Advisory.
    fn is_pure(&self, name: &FunctionName) -> bool;

    /// Whether `value` counts as true in logical operators.
    fn is_truthy(&self, value: &Value) -> Result<bool, EvalError> {
        default_truthiness(self, value)
    }

    /// Ordering for non-numeric operands of comparison operators.
    fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        default_ordering(left, right)
    }
}

/// Numeric zero, empty text and `false` are false. References are resolved
/// and unevaluated expressions evaluated first.
pub fn default_truthiness<C: EvaluationContext + ?Sized>(
    ctx: &C,
    value: &Value,
) -> Result<bool, EvalError> {
    Ok(match value {
        Value::Bool(b) => *b,
        Value::Number(n) => !n.is_zero(),
        Value::Integer(i) => *i != 0,
        Value::BigInteger(i) => i.bits() != 0,
        Value::Text(s) => !s.is_empty(),
        Value::Reference(r) => {
            let resolved = ctx.reference(r)?.ok_or_else(|| unknown_reference(r))?;
            ctx.is_truthy(&resolved)?
        }
        Value::Expression(e) => ctx.is_truthy(&ctx.evaluate(e)?)?,
        Value::Function(_) => true,
    })
}

/// Text and booleans order among themselves.
pub fn default_ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Reference(a), Value::Reference(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

type Truthiness = fn(&Value) -> bool;

/// Table-driven context: registered functions, a reference table, a
/// converter and the numeric settings.
#[derive(Clone)]
pub struct BasicContext {
    functions: FunctionRegistry,
    references: FxHashMap<Reference, Value>,
    config: ContextConfig,
    converter: Arc<dyn Converter>,
    truthiness: Option<Truthiness>,
}

impl BasicContext {
    pub fn builder() -> BasicContextBuilder {
        BasicContextBuilder::default()
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn config(&self) -> ContextConfig {
        self.config
    }
}

impl fmt::Debug for BasicContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicContext")
            .field("functions", &self.functions.len())
            .field("references", &self.references.len())
            .field("config", &self.config)
            .field("converter", &self.converter)
            .finish_non_exhaustive()
    }
}

impl EvaluationContext for BasicContext {
    fn evaluate(&self, expr: &Expression) -> EvalResult {
        crate::evaluate(expr, self)
    }

    fn function(&self, name: &FunctionName) -> Result<Arc<dyn ExpressionFunction>, EvalError> {
        if let Some(function) = self.functions.lookup(name) {
            return Ok(function);
        }
        // Function values stored in the reference table are callable by name.
        match self.references.get(name.as_str()) {
            Some(Value::Function(function)) => Ok(Arc::clone(function)),
            _ => Err(unknown_function(name.as_str())),
        }
    }

    fn reference(&self, reference: &Reference) -> Result<Option<Value>, EvalError> {
        let found = self.references.get(reference).cloned();
        tracing::trace!(%reference, found = found.is_some(), "resolved reference");
        Ok(found)
    }

    fn number_kind(&self) -> NumberKind {
        self.config.number_kind
    }

    fn math_context(&self) -> MathContext {
        self.config.math_context
    }

    fn convert(&self, value: Value, target: ValueType) -> EvalResult {
        Ok(self
            .converter
            .convert(value, target, self.config.number_kind)?)
    }

    fn is_pure(&self, name: &FunctionName) -> bool {
        self.functions
            .lookup(name)
            .is_some_and(|function| function.is_pure(self))
    }

    fn is_truthy(&self, value: &Value) -> Result<bool, EvalError> {
        match self.truthiness {
            Some(rule) => Ok(rule(value)),
            None => default_truthiness(self, value),
        }
    }
}

/// Configures a [`BasicContext`].
#[derive(Clone, Default)]
pub struct BasicContextBuilder {
    functions: FunctionRegistry,
    references: FxHashMap<Reference, Value>,
    config: ContextConfig,
    converter: Option<Arc<dyn Converter>>,
    truthiness: Option<Truthiness>,
}

impl BasicContextBuilder {
    #[must_use]
    pub fn number_kind(mut self, kind: NumberKind) -> Self {
        self.config.number_kind = kind;
        self
    }

    #[must_use]
    pub fn math_context(mut self, math_context: MathContext) -> Self {
        self.config.math_context = math_context;
        self
    }

    /// Number kind and math context together, e.g. from [`ContextConfig::from_env`].
    #[must_use]
    pub fn config(mut self, config: ContextConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the function registry.
    #[must_use]
    pub fn functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// Register one function under `name`.
    #[must_use]
    pub fn function(
        mut self,
        name: impl Into<FunctionName>,
        function: impl ExpressionFunction + 'static,
    ) -> Self {
        self.functions.register(name, Arc::new(function));
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<Reference>, value: Value) -> Self {
        self.references.insert(reference.into(), value);
        self
    }

    #[must_use]
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Replace the truthiness rule used by logical operators.
    #[must_use]
    pub fn truthiness(mut self, rule: fn(&Value) -> bool) -> Self {
        self.truthiness = Some(rule);
        self
    }

    pub fn build(self) -> BasicContext {
        BasicContext {
            functions: self.functions,
            references: self.references,
            config: self.config,
            converter: self
                .converter
                .unwrap_or_else(|| Arc::new(BasicConverter)),
            truthiness: self.truthiness,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
