//! Raw numeric operands.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

use crate::NumberError;

/// One operand of a binary numeric step, in its native representation.
#[derive(Clone, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
}

/// Tag of a [`Number`] variant, ordered by promotion rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Representation {
    Integer,
    Float,
    BigInteger,
    BigDecimal,
}

impl Representation {
    /// The representation both operands are promoted to.
    ///
    /// Pairings involving `BigDecimal` stay decimal. `Float` with `BigInteger`
    /// also lands on `BigDecimal` so neither side loses digits.
    pub fn common(self, other: Self) -> Self {
        use Representation::{BigDecimal, BigInteger, Float};
        match (self, other) {
            (Float, BigInteger) | (BigInteger, Float) => BigDecimal,
            (a, b) => a.max(b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Representation::Integer => "integer",
            Representation::Float => "float",
            Representation::BigInteger => "big integer",
            Representation::BigDecimal => "big decimal",
        }
    }
}

impl Number {
    #[inline]
    pub fn representation(&self) -> Representation {
        match self {
            Number::Integer(_) => Representation::Integer,
            Number::Float(_) => Representation::Float,
            Number::BigInteger(_) => Representation::BigInteger,
            Number::BigDecimal(_) => Representation::BigDecimal,
        }
    }

    /// Convert to `target`. Promotion to a lower rank truncates.
    pub fn promote(self, target: Representation) -> Result<Number, NumberError> {
        if self.representation() == target {
            return Ok(self);
        }
        Ok(match target {
            Representation::Integer => Number::Integer(self.to_i64()?),
            Representation::Float => Number::Float(self.to_f64()),
            Representation::BigInteger => Number::BigInteger(self.to_big_integer()?),
            Representation::BigDecimal => Number::BigDecimal(self.to_big_decimal()?),
        })
    }

    /// Nearest `f64`. Values beyond the float range become infinite.
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
            Number::BigInteger(i) => i.to_f64().unwrap_or(f64::NAN),
            Number::BigDecimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    pub fn to_big_decimal(&self) -> Result<BigDecimal, NumberError> {
        match self {
            Number::Integer(i) => Ok(BigDecimal::from(*i)),
            Number::Float(f) => float_to_decimal(*f),
            Number::BigInteger(i) => Ok(BigDecimal::new(i.clone(), 0)),
            Number::BigDecimal(d) => Ok(d.clone()),
        }
    }

    /// Integer part, truncated toward zero.
    pub fn to_big_integer(&self) -> Result<BigInt, NumberError> {
        match self {
            Number::Integer(i) => Ok(BigInt::from(*i)),
            Number::Float(f) => BigInt::from_f64(f.trunc())
                .ok_or_else(|| NumberError::not_representable(f, "big integer")),
            Number::BigInteger(i) => Ok(i.clone()),
            Number::BigDecimal(d) => Ok(truncate(d)),
        }
    }

    /// Integer part as `i64`; fails when out of range or non-finite.
    pub fn to_i64(&self) -> Result<i64, NumberError> {
        match self {
            Number::Integer(i) => Ok(*i),
            other => other
                .to_big_integer()?
                .to_i64()
                .ok_or_else(|| NumberError::not_representable(other, "integer")),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(i) => *i == 0,
            Number::Float(f) => *f == 0.0,
            Number::BigInteger(i) => i.is_zero(),
            Number::BigDecimal(d) => d.is_zero(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
            Number::BigInteger(i) => write!(f, "{i}"),
            Number::BigDecimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::BigInteger(value)
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Number::BigDecimal(value)
    }
}

/// Exact decimal for the shortest round-tripping rendering of `value`.
pub(crate) fn float_to_decimal(value: f64) -> Result<BigDecimal, NumberError> {
    if !value.is_finite() {
        return Err(NumberError::not_representable(value, "big decimal"));
    }
    BigDecimal::from_str(&value.to_string())
        .map_err(|_| NumberError::not_representable(value, "big decimal"))
}

/// Drop the fractional digits of `value`.
pub(crate) fn truncate(value: &BigDecimal) -> BigInt {
    value.with_scale(0).as_bigint_and_exponent().0
}

/// `value` as a `BigInt` when it has no fractional part.
pub(crate) fn exact_integer(
    value: &BigDecimal,
    operation: &'static str,
) -> Result<BigInt, NumberError> {
    if value.is_integer() {
        Ok(truncate(value))
    } else {
        Err(NumberError::InexactResult {
            operation,
            value: value.to_string(),
        })
    }
}
