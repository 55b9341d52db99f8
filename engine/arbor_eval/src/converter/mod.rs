//! Value conversion.
//!
//! The evaluator only depends on [`Converter`]; [`BasicConverter`] is the
//! default implementation installed by `BasicContext`.

use std::fmt;
use std::str::FromStr;

use arbor_ir::{Reference, ValueType};
use arbor_num::{BigDecimal, BigInt, ExprNumber, Number, NumberKind};

use crate::errors::{conversion_error, EvalError};
use crate::Value;

/// A value that could not be converted to `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionError {
    pub value: Value,
    pub target: ValueType,
}

impl ConversionError {
    pub fn new(value: Value, target: ValueType) -> Self {
        Self { value, target }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot convert {} `{}` to {}",
            self.value.type_name(),
            self.value,
            self.target
        )
    }
}

impl std::error::Error for ConversionError {}

impl From<ConversionError> for EvalError {
    fn from(error: ConversionError) -> Self {
        conversion_error(&error.value.to_string(), error.target.name())
    }
}

/// Converts values to declared types.
///
/// `kind` is the context's number kind; conversions to `ValueType::Number`
/// produce numbers of that kind.
pub trait Converter: Send + Sync + fmt::Debug {
    fn convert(
        &self,
        value: Value,
        target: ValueType,
        kind: NumberKind,
    ) -> Result<Value, ConversionError>;
}

/// Identity, text parsing and formatting, exact numeric narrowing, and
/// booleans as `1`/`0`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BasicConverter;

impl Converter for BasicConverter {
    fn convert(
        &self,
        value: Value,
        target: ValueType,
        kind: NumberKind,
    ) -> Result<Value, ConversionError> {
        let converted = match target {
            ValueType::Any => Some(value.clone()),
            ValueType::Bool => to_bool(&value).map(Value::Bool),
            ValueType::Text => match &value {
                Value::Text(_) => Some(value.clone()),
                Value::Expression(_) | Value::Function(_) => None,
                other => Some(Value::text(other.to_string())),
            },
            ValueType::Number => to_number(&value, kind).map(Value::Number),
            ValueType::Integer => to_big_integer(&value)
                .and_then(|i| i64::try_from(i).ok())
                .map(Value::Integer),
            ValueType::BigInteger => to_big_integer(&value).map(Value::BigInteger),
            ValueType::Reference => match &value {
                Value::Reference(_) => Some(value.clone()),
                Value::Text(s) => Some(Value::Reference(Reference::new(&**s))),
                _ => None,
            },
            ValueType::Expression => {
                matches!(value, Value::Expression(_)).then(|| value.clone())
            }
            ValueType::Function => matches!(value, Value::Function(_)).then(|| value.clone()),
        };
        converted.ok_or_else(|| ConversionError::new(value, target))
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(!n.is_zero()),
        Value::Integer(i) => Some(*i != 0),
        Value::BigInteger(i) => Some(*i != BigInt::from(0)),
        Value::Text(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn to_number(value: &Value, kind: NumberKind) -> Option<ExprNumber> {
    let raw = match value {
        Value::Number(n) => return n.clone().set_kind(kind).ok(),
        Value::Integer(i) => Number::Integer(*i),
        Value::BigInteger(i) => Number::BigInteger(i.clone()),
        Value::Bool(b) => Number::Integer(i64::from(*b)),
        Value::Text(s) => {
            let s = s.trim();
            match kind {
                NumberKind::Floating => Number::Float(f64::from_str(s).ok()?),
                NumberKind::ArbitraryPrecision => Number::BigDecimal(BigDecimal::from_str(s).ok()?),
            }
        }
        _ => return None,
    };
    kind.create(raw).ok()
}

/// Exact integer value; fractional numbers do not convert.
fn to_big_integer(value: &Value) -> Option<BigInt> {
    match value {
        Value::Integer(i) => Some(BigInt::from(*i)),
        Value::BigInteger(i) => Some(i.clone()),
        Value::Bool(b) => Some(BigInt::from(u8::from(*b))),
        Value::Number(n) if n.is_integral() => n.to_number().to_big_integer().ok(),
        Value::Text(s) => {
            let s = s.trim();
            BigInt::from_str(s).ok().or_else(|| {
                let decimal = BigDecimal::from_str(s).ok()?;
                let number = ExprNumber::ArbitraryPrecision(decimal);
                if number.is_integral() {
                    number.to_number().to_big_integer().ok()
                } else {
                    None
                }
            })
        }
        _ => None,
    }
}
