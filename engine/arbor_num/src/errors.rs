//! Numeric failures.

use thiserror::Error;

/// Failure raised while creating, converting or reducing numbers.
///
/// The evaluator maps each variant onto its own error kind, so the
/// variants stay coarse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("division by zero in {operation}")]
    DivisionByZero { operation: &'static str },

    #[error("{operation} produced a non-integral result: {value}")]
    InexactResult {
        operation: &'static str,
        value: String,
    },

    #[error("{value} cannot be represented as {target}")]
    NotRepresentable { value: String, target: &'static str },

    #[error("precision must be greater than zero, got {0}")]
    InvalidPrecision(u64),

    #[error("unknown number kind `{0}`")]
    UnknownKind(String),
}

impl NumberError {
    #[cold]
    pub(crate) fn division_by_zero(operation: &'static str) -> Self {
        Self::DivisionByZero { operation }
    }

    #[cold]
    pub(crate) fn not_representable(value: impl ToString, target: &'static str) -> Self {
        Self::NotRepresentable {
            value: value.to_string(),
            target,
        }
    }
}
