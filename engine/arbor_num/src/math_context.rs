//! Precision and rounding for arbitrary-precision arithmetic.

use std::num::NonZeroU64;

use bigdecimal::{BigDecimal, RoundingMode};

use crate::NumberError;

/// Extra digits carried by intermediate results before the final rounding.
const GUARD_DIGITS: u64 = 4;

/// Digit budget and rounding rule applied to decimal results.
///
/// `precision` counts significant digits. [`MathContext::UNLIMITED`] disables
/// rounding except for division and fractional powers, which fall back to
/// [`MathContext::UNLIMITED_DIVISION_DIGITS`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MathContext {
    precision: u64,
    rounding: RoundingMode,
}

impl MathContext {
    /// IEEE 754 decimal32: 7 digits, half-even.
    pub const DECIMAL32: Self = Self::preset(7);
    /// IEEE 754 decimal64: 16 digits, half-even.
    pub const DECIMAL64: Self = Self::preset(16);
    /// IEEE 754 decimal128: 34 digits, half-even.
    pub const DECIMAL128: Self = Self::preset(34);
    /// No rounding on exact operations.
    pub const UNLIMITED: Self = Self {
        precision: 0,
        rounding: RoundingMode::HalfUp,
    };

    /// Digits kept by a non-terminating division under [`MathContext::UNLIMITED`].
    pub const UNLIMITED_DIVISION_DIGITS: u64 = 100;

    const fn preset(precision: u64) -> Self {
        Self {
            precision,
            rounding: RoundingMode::HalfEven,
        }
    }

    /// Create a context with a positive digit budget.
    pub fn new(precision: u64, rounding: RoundingMode) -> Result<Self, NumberError> {
        if precision == 0 {
            return Err(NumberError::InvalidPrecision(precision));
        }
        Ok(Self {
            precision,
            rounding,
        })
    }

    /// Significant digits kept, `0` when unlimited.
    #[inline]
    pub fn precision(&self) -> u64 {
        self.precision
    }

    #[inline]
    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.precision == 0
    }

    /// Same rounding rule with guard digits, for intermediate steps.
    #[must_use]
    pub fn working(&self) -> Self {
        Self {
            precision: self.digits() + GUARD_DIGITS,
            rounding: self.rounding,
        }
    }

    /// Round `value` to this context. Unlimited contexts return it unchanged.
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        round_to(value, self.precision, self.rounding)
    }

    /// Digit budget for operations that cannot be exact.
    pub(crate) fn digits(&self) -> u64 {
        if self.is_unlimited() {
            Self::UNLIMITED_DIVISION_DIGITS
        } else {
            self.precision
        }
    }

    /// Round an inexact result, applying the division budget when unlimited.
    pub(crate) fn round_inexact(&self, value: &BigDecimal) -> BigDecimal {
        round_to(value, self.digits(), self.rounding)
    }
}

/// Values that already fit are returned as-is, without zero padding.
fn round_to(value: &BigDecimal, precision: u64, rounding: RoundingMode) -> BigDecimal {
    match NonZeroU64::new(precision) {
        Some(digits) if value.digits() > precision => value.with_precision_round(digits, rounding),
        _ => value.clone(),
    }
}

impl Default for MathContext {
    fn default() -> Self {
        Self::DECIMAL128
    }
}
