//! Anonymous functions and the scope their bodies run in.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use arbor_ir::visitor::{Visiting, Visitor};
use arbor_ir::{Expression, FunctionName, Parameter, Reference, ValueType};
use arbor_num::{MathContext, NumberKind};
use rustc_hash::FxHashMap;

use super::ExpressionFunction;
use crate::context::default_truthiness;
use crate::errors::{EvalError, EvalResult};
use crate::{EvaluationContext, Value};

/// The value of a lambda node.
///
/// `apply` binds each parameter name to its argument in a [`ScopedContext`]
/// and evaluates the body there. References in the body that match a
/// parameter name see the argument; everything else goes to the calling
/// context.
#[derive(Clone, Debug)]
pub struct LambdaFunction {
    parameters: Vec<Parameter>,
    body: Expression,
}

impl LambdaFunction {
    pub fn new(parameters: Vec<Parameter>, body: Expression) -> Self {
        LambdaFunction { parameters, body }
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }
}

/// Names of every function called in a subtree.
#[derive(Default)]
struct CalledFunctions(Vec<FunctionName>);

impl Visitor for CalledFunctions {
    fn start_visit_call(&mut self, function: &FunctionName, _expr: &Expression) -> Visiting {
        self.0.push(function.clone());
        Visiting::Continue
    }
}

impl ExpressionFunction for LambdaFunction {
    fn name(&self) -> Option<&FunctionName> {
        None
    }

    fn parameters(&self, _count: usize) -> Cow<'_, [Parameter]> {
        Cow::Borrowed(&self.parameters)
    }

    /// Pure when every function the body calls is pure in `ctx`.
    fn is_pure(&self, ctx: &dyn EvaluationContext) -> bool {
        let mut calls = CalledFunctions::default();
        self.body.accept(&mut calls);
        calls.0.iter().all(|name| ctx.is_pure(name))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(arity = args.len()))]
    fn apply(&self, args: &[Value], ctx: &dyn EvaluationContext) -> EvalResult {
        self.check_parameter_count(args.len())?;
        let bindings = self
            .parameters
            .iter()
            .zip(args)
            .map(|(parameter, value)| (Reference::from(&parameter.name), value.clone()));
        let scope = ScopedContext::new(ctx, bindings);
        scope.evaluate(&self.body)
    }
}

/// A context with local bindings layered over a parent.
///
/// A binding holding `Value::Reference` is resolved against the parent, so
/// a reference passed as an argument is looked up where the call was made.
/// A binding holding `Value::Function` is also callable by name.
pub struct ScopedContext<'a> {
    parent: &'a dyn EvaluationContext,
    bindings: FxHashMap<Reference, Value>,
}

impl<'a> ScopedContext<'a> {
    pub fn new(
        parent: &'a dyn EvaluationContext,
        bindings: impl IntoIterator<Item = (Reference, Value)>,
    ) -> Self {
        ScopedContext {
            parent,
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn bind(&mut self, reference: impl Into<Reference>, value: Value) {
        self.bindings.insert(reference.into(), value);
    }
}

impl fmt::Debug for ScopedContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedContext")
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

impl EvaluationContext for ScopedContext<'_> {
    fn evaluate(&self, expr: &Expression) -> EvalResult {
        crate::evaluate(expr, self)
    }

    fn function(&self, name: &FunctionName) -> Result<Arc<dyn ExpressionFunction>, EvalError> {
        match self.bindings.get(name.as_str()) {
            Some(Value::Function(function)) => Ok(Arc::clone(function)),
            _ => self.parent.function(name),
        }
    }

    fn reference(&self, reference: &Reference) -> Result<Option<Value>, EvalError> {
        match self.bindings.get(reference) {
            Some(Value::Reference(outer)) => self.parent.reference(outer),
            Some(value) => Ok(Some(value.clone())),
            None => self.parent.reference(reference),
        }
    }

    fn number_kind(&self) -> NumberKind {
        self.parent.number_kind()
    }

    fn math_context(&self) -> MathContext {
        self.parent.math_context()
    }

    fn convert(&self, value: Value, target: ValueType) -> EvalResult {
        self.parent.convert(value, target)
    }

    fn is_pure(&self, name: &FunctionName) -> bool {
        match self.bindings.get(name.as_str()) {
            Some(Value::Function(function)) => function.is_pure(self),
            _ => self.parent.is_pure(name),
        }
    }

    fn is_truthy(&self, value: &Value) -> Result<bool, EvalError> {
        // References and expressions must see the local bindings.
        match value {
            Value::Reference(_) | Value::Expression(_) => default_truthiness(self, value),
            other => self.parent.is_truthy(other),
        }
    }

    fn compare(&self, left: &Value, right: &Value) -> Option<Ordering> {
        self.parent.compare(left, right)
    }
}
