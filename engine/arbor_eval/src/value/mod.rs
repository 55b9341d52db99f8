//! Runtime values.

use std::fmt;
use std::sync::Arc;

use arbor_ir::{Expression, Reference, ValueType};
use arbor_num::{BigInt, ExprNumber, Number};

use crate::ExpressionFunction;

/// A value produced or consumed by evaluation.
///
/// Use the factory methods (`Value::text`, `Value::number`, ...) rather than
/// building the `Arc`-backed variants by hand.
#[derive(Clone, Debug)]
pub enum Value {
    Bool(bool),
    Text(Arc<str>),
    Number(ExprNumber),
    /// Fixed-width integer, produced by conversion to `ValueType::Integer`.
    Integer(i64),
    BigInteger(BigInt),
    /// An unresolved reference, passed to functions that want the key.
    Reference(Reference),
    /// An unevaluated argument expression.
    Expression(Expression),
    Function(Arc<dyn ExpressionFunction>),
}

impl Value {
    #[inline]
    pub fn boolean(value: bool) -> Self {
        Value::Bool(value)
    }

    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Value::Text(value.into())
    }

    pub fn number(value: impl Into<ExprNumber>) -> Self {
        Value::Number(value.into())
    }

    #[inline]
    pub fn integer(value: i64) -> Self {
        Value::Integer(value)
    }

    pub fn function(function: impl ExpressionFunction + 'static) -> Self {
        Value::Function(Arc::new(function))
    }

    /// The declared type this value already satisfies.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Text(_) => ValueType::Text,
            Value::Number(_) => ValueType::Number,
            Value::Integer(_) => ValueType::Integer,
            Value::BigInteger(_) => ValueType::BigInteger,
            Value::Reference(_) => ValueType::Reference,
            Value::Expression(_) => ValueType::Expression,
            Value::Function(_) => ValueType::Function,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Number(_) | Value::Integer(_) | Value::BigInteger(_)
        )
    }

    /// Raw reducer operand for numeric values.
    pub fn as_raw_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(n.to_number()),
            Value::Integer(i) => Some(Number::Integer(*i)),
            Value::BigInteger(i) => Some(Number::BigInteger(i.clone())),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::BigInteger(a), Value::BigInteger(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Expression(a), Value::Expression(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{n}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::BigInteger(i) => write!(f, "{i}"),
            Value::Reference(r) => write!(f, "{r}"),
            Value::Expression(e) => write!(f, "<expression {}>", e.kind().label()),
            Value::Function(function) => match function.name() {
                Some(name) => write!(f, "<function {name}>"),
                None => f.write_str("<lambda>"),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<ExprNumber> for Value {
    fn from(value: ExprNumber) -> Self {
        Value::Number(value)
    }
}
