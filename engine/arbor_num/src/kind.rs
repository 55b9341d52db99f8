//! Runtime selection between floating and arbitrary-precision numbers.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};

use crate::{ExprNumber, Number, NumberError};

/// Which representation an evaluation produces for numeric results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// IEEE 754 `f64`.
    #[default]
    Floating,
    /// `BigDecimal`, rounded by the active `MathContext`.
    ArbitraryPrecision,
}

impl NumberKind {
    pub fn name(self) -> &'static str {
        match self {
            NumberKind::Floating => "floating",
            NumberKind::ArbitraryPrecision => "arbitrary-precision",
        }
    }

    /// Wrap a raw number in this kind.
    ///
    /// Converting a non-finite float to `ArbitraryPrecision` fails with
    /// [`NumberError::NotRepresentable`].
    pub fn create(self, number: Number) -> Result<ExprNumber, NumberError> {
        Ok(match self {
            NumberKind::Floating => ExprNumber::Floating(number.to_f64()),
            NumberKind::ArbitraryPrecision => ExprNumber::ArbitraryPrecision(number.to_big_decimal()?),
        })
    }

    #[inline]
    pub fn zero(self) -> ExprNumber {
        match self {
            NumberKind::Floating => ExprNumber::Floating(0.0),
            NumberKind::ArbitraryPrecision => ExprNumber::ArbitraryPrecision(BigDecimal::zero()),
        }
    }

    #[inline]
    pub fn one(self) -> ExprNumber {
        match self {
            NumberKind::Floating => ExprNumber::Floating(1.0),
            NumberKind::ArbitraryPrecision => ExprNumber::ArbitraryPrecision(BigDecimal::one()),
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumberKind {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floating" | "double" | "f64" => Ok(NumberKind::Floating),
            "arbitrary-precision" | "arbitrary_precision" | "big-decimal" | "bigdecimal"
            | "decimal" => Ok(NumberKind::ArbitraryPrecision),
            _ => Err(NumberError::UnknownKind(s.to_string())),
        }
    }
}
