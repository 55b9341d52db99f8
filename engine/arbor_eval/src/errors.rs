//! Evaluation errors.
//!
//! `EvalErrorKind` is the structured category; the factory functions
//! (`unknown_function()`, `division_by_zero()`, ...) are the public way to
//! build an [`EvalError`] and fill both `kind` and `message`.
//!
//! Every error propagates unchanged to the caller of the evaluation. The
//! core never retries or substitutes a default.

use std::fmt;

use arbor_ir::{MisplacedVariable, Reference, TreeError, ValueType};
use arbor_num::NumberError;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Function contract
    Arity {
        function: String,
        got: usize,
        min: usize,
        max: Option<usize>,
    },
    UnknownFunction {
        name: String,
    },
    /// A declared parameter list no call can satisfy.
    InvalidParameters {
        function: String,
        message: String,
    },
    ParameterType {
        function: String,
        parameter: String,
        value: String,
        target: ValueType,
    },

    // Context
    UnknownReference {
        reference: String,
    },
    Conversion {
        value: String,
        target: String,
    },
    InvalidConfig {
        key: String,
        value: String,
    },

    // Arithmetic
    DivisionByZero {
        operation: String,
    },
    InexactResult {
        operation: String,
        value: String,
    },

    // Operators
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: Option<&'static str>,
    },

    InvalidTree {
        message: String,
    },

    /// Failures raised by host functions.
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity {
                function,
                got,
                min,
                max,
            } => {
                if !function.is_empty() {
                    write!(f, "{function}: ")?;
                }
                if got < min {
                    write!(f, "Missing parameters, got {got} expected {min}")
                } else {
                    let max = max.unwrap_or(*min);
                    write!(f, "Too many parameters, got {got} expected {max}")
                }
            }
            Self::UnknownFunction { name } => write!(f, "unknown function: {name}"),
            Self::InvalidParameters { function, message } => write!(f, "{function}: {message}"),
            Self::ParameterType {
                function,
                parameter,
                value,
                target,
            } => write!(
                f,
                "{function}: parameter {parameter} expected {target}, got `{value}`"
            ),
            Self::UnknownReference { reference } => write!(f, "unknown reference: {reference}"),
            Self::Conversion { value, target } => {
                write!(f, "cannot convert `{value}` to {target}")
            }
            Self::InvalidConfig { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
            Self::DivisionByZero { operation } => write!(f, "division by zero in {operation}"),
            Self::InexactResult { operation, value } => {
                write!(f, "{operation} produced a non-integral result: {value}")
            }
            Self::TypeMismatch {
                operator,
                left,
                right: Some(right),
            } => write!(f, "operator `{operator}` cannot be applied to {left} and {right}"),
            Self::TypeMismatch {
                operator,
                left,
                right: None,
            } => write!(f, "operator `{operator}` cannot be applied to {left}"),
            Self::InvalidTree { message } | Self::Custom { message } => f.write_str(message),
        }
    }
}

/// Secondary information attached to an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalNote {
    pub message: String,
}

impl EvalNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory-built errors.
    pub message: String,
    pub notes: Vec<EvalNote>,
}

impl EvalError {
    /// Create an error with just a message, for host functions.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            notes: Vec::new(),
        }
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: EvalNote) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {}", note.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<NumberError> for EvalError {
    fn from(error: NumberError) -> Self {
        match error {
            NumberError::DivisionByZero { operation } => division_by_zero(operation),
            NumberError::InexactResult { operation, value } => inexact_result(operation, &value),
            NumberError::NotRepresentable { value, target } => conversion_error(&value, target),
            NumberError::InvalidPrecision(precision) => {
                invalid_config("precision", &precision.to_string())
            }
            NumberError::UnknownKind(kind) => invalid_config("number kind", &kind),
        }
    }
}

impl From<TreeError> for EvalError {
    fn from(error: TreeError) -> Self {
        EvalError::from_kind(EvalErrorKind::InvalidTree {
            message: error.to_string(),
        })
    }
}

// Function contract

/// Argument count outside the declared bounds.
#[cold]
pub fn arity_error(function: &str, got: usize, min: usize, max: Option<usize>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Arity {
        function: function.to_string(),
        got,
        min,
        max,
    })
}

#[cold]
pub fn invalid_parameters(function: &str, error: &MisplacedVariable) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidParameters {
        function: function.to_string(),
        message: error.to_string(),
    })
}

#[cold]
pub fn unknown_function(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownFunction {
        name: name.to_string(),
    })
}

/// An argument that could not be converted to its parameter's type.
#[cold]
pub fn parameter_type_error(
    function: &str,
    parameter: &str,
    value: &Value,
    target: ValueType,
) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ParameterType {
        function: function.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        target,
    })
}

// Context

#[cold]
pub fn unknown_reference(reference: &Reference) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownReference {
        reference: reference.to_string(),
    })
}

#[cold]
pub fn conversion_error(value: &str, target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Conversion {
        value: value.to_string(),
        target: target.to_string(),
    })
}

#[cold]
pub fn invalid_config(key: &str, value: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// Arithmetic

#[cold]
pub fn division_by_zero(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn inexact_result(operation: &str, value: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InexactResult {
        operation: operation.to_string(),
        value: value.to_string(),
    })
}

// Operators

/// Binary operator applied to operands it has no rule for.
#[cold]
pub fn type_mismatch(operator: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        operator: operator.to_string(),
        left: left.type_name(),
        right: Some(right.type_name()),
    })
}

#[cold]
pub fn unary_type_mismatch(operator: &str, operand: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        operator: operator.to_string(),
        left: operand.type_name(),
        right: None,
    })
}
