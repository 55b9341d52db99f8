//! Arbor Eval - evaluating expression trees.
//!
//! # Architecture
//!
//! - [`EvaluationContext`]: everything an evaluation needs from its host
//!   (functions, references, number kind, conversion, truthiness)
//! - [`evaluate`]: the recursive walk; operator nodes hand numbers to the
//!   `arbor_num` reducer, call nodes go through the function contract
//! - [`ExpressionFunction`]: arity, parameter preparation, purity and apply
//! - [`Evaluate`]: typed projections (`to_boolean`, `to_number`, ...) on
//!   `Expression`
//!
//! Evaluation is synchronous and keeps no state between calls beyond what
//! the context holds.

#![allow(
    clippy::result_large_err,
    reason = "EvalError carries owned diagnostic strings; boxing every error path adds noise"
)]

mod context;
mod converter;
pub mod errors;
mod eval;
pub mod function;
mod registry;
mod value;

pub use context::{
    default_ordering, default_truthiness, BasicContext, BasicContextBuilder, ContextConfig,
    EvaluationContext,
};
pub use converter::{BasicConverter, ConversionError, Converter};
pub use errors::{EvalError, EvalErrorKind, EvalNote, EvalResult};
pub use eval::{evaluate, Evaluate};
pub use function::{
    BasicFunction, ExpressionFunction, FunctionExt, LambdaFunction, ScopedContext,
};
pub use registry::FunctionRegistry;
pub use value::Value;

pub use arbor_ir::{
    BinaryOp, Cardinality, Expression, FunctionName, Literal, Parameter, ParameterFlags,
    ParameterName, Reference, TreeBuilder, UnaryOp, ValueType,
};
pub use arbor_num::{ExprNumber, MathContext, NumberKind, RoundingMode};
