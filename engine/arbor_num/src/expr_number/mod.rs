//! The numeric value stored in expression trees.

use std::cmp::Ordering;
use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::{ToPrimitive, Zero};

use crate::number::float_to_decimal;
use crate::{Number, NumberError, NumberKind};

/// A number tagged with the kind that produced it.
///
/// Equality and ordering compare numeric values, so `Floating(2.0)` equals
/// `ArbitraryPrecision(2)`. `NaN` is unordered and unequal to everything.
#[derive(Clone, Debug)]
pub enum ExprNumber {
    Floating(f64),
    ArbitraryPrecision(BigDecimal),
}

impl ExprNumber {
    #[inline]
    pub fn kind(&self) -> NumberKind {
        match self {
            ExprNumber::Floating(_) => NumberKind::Floating,
            ExprNumber::ArbitraryPrecision(_) => NumberKind::ArbitraryPrecision,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            ExprNumber::Floating(f) => *f,
            ExprNumber::ArbitraryPrecision(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    pub fn to_big_decimal(&self) -> Result<BigDecimal, NumberError> {
        match self {
            ExprNumber::Floating(f) => float_to_decimal(*f),
            ExprNumber::ArbitraryPrecision(d) => Ok(d.clone()),
        }
    }

    /// The raw operand fed to the reducer.
    pub fn to_number(&self) -> Number {
        match self {
            ExprNumber::Floating(f) => Number::Float(*f),
            ExprNumber::ArbitraryPrecision(d) => Number::BigDecimal(d.clone()),
        }
    }

    /// Re-express in `kind`. A no-op when the kind already matches.
    pub fn set_kind(self, kind: NumberKind) -> Result<ExprNumber, NumberError> {
        if self.kind() == kind {
            return Ok(self);
        }
        kind.create(self.to_number())
    }

    pub fn is_zero(&self) -> bool {
        match self {
            ExprNumber::Floating(f) => *f == 0.0,
            ExprNumber::ArbitraryPrecision(d) => d.is_zero(),
        }
    }

    /// Finite with no fractional part.
    pub fn is_integral(&self) -> bool {
        match self {
            ExprNumber::Floating(f) => f.is_finite() && f.fract() == 0.0,
            ExprNumber::ArbitraryPrecision(d) => d.is_integer(),
        }
    }

    /// Arithmetic negation, produced in `kind`.
    pub fn negate(&self, kind: NumberKind) -> Result<ExprNumber, NumberError> {
        let negated = match self {
            ExprNumber::Floating(f) => ExprNumber::Floating(-f),
            ExprNumber::ArbitraryPrecision(d) => ExprNumber::ArbitraryPrecision(-d),
        };
        negated.set_kind(kind)
    }
}

impl PartialEq for ExprNumber {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for ExprNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (ExprNumber::Floating(a), ExprNumber::Floating(b)) => a.partial_cmp(b),
            (ExprNumber::ArbitraryPrecision(a), ExprNumber::ArbitraryPrecision(b)) => {
                Some(a.cmp(b))
            }
            (ExprNumber::Floating(a), ExprNumber::ArbitraryPrecision(b)) => {
                float_against_decimal(*a, b)
            }
            (ExprNumber::ArbitraryPrecision(a), ExprNumber::Floating(b)) => {
                float_against_decimal(*b, a).map(Ordering::reverse)
            }
        }
    }
}

fn float_against_decimal(float: f64, decimal: &BigDecimal) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    if float.is_infinite() {
        return Some(if float > 0.0 {
            Ordering::Greater
        } else {
            Ordering::Less
        });
    }
    float_to_decimal(float).ok().map(|f| f.cmp(decimal))
}

impl fmt::Display for ExprNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNumber::Floating(x) => write!(f, "{x}"),
            ExprNumber::ArbitraryPrecision(d) => write!(f, "{d}"),
        }
    }
}

impl From<f64> for ExprNumber {
    fn from(value: f64) -> Self {
        ExprNumber::Floating(value)
    }
}

impl From<BigDecimal> for ExprNumber {
    fn from(value: BigDecimal) -> Self {
        ExprNumber::ArbitraryPrecision(value)
    }
}
