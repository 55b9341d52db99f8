//! Arbor numeric core.
//!
//! Numbers flowing through an Arbor evaluation come in two layers:
//!
//! - [`Number`]: the raw operand of a single binary step. One of four
//!   representations (`i64`, `f64`, `BigInt`, `BigDecimal`).
//! - [`ExprNumber`]: the value stored in trees and returned to callers.
//!   Either a `f64` or a `BigDecimal`, selected by [`NumberKind`].
//!
//! The [`reduce`] dispatcher promotes two raw operands to a common
//! representation and hands them to a [`NumberStrategy`]. Arithmetic,
//! bitwise and comparison operators are strategies; [`apply`] and
//! [`compare`] are the facades the evaluator uses.

#![allow(
    clippy::cast_precision_loss,
    reason = "i64 -> f64 promotion is the documented floating behaviour"
)]

mod errors;
mod expr_number;
mod kind;
mod math_context;
mod number;
mod reducer;

pub use errors::NumberError;
pub use expr_number::ExprNumber;
pub use kind::NumberKind;
pub use math_context::MathContext;
pub use number::{Number, Representation};
pub use reducer::{apply, compare, reduce, ArithmeticOp, NumberStrategy, Relation};

/// Re-exported so callers can name rounding modes without a direct dependency.
pub use bigdecimal::{BigDecimal, RoundingMode};
pub use num_bigint::BigInt;
