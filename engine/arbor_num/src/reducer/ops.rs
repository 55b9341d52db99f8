//! Arithmetic and bitwise operators.

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::NumberStrategy;
use crate::number::{exact_integer, float_to_decimal, truncate};
use crate::{MathContext, Number, NumberError};

/// Operators whose result is a number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    And,
    Or,
    Xor,
}

impl ArithmeticOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
            ArithmeticOp::Power => "**",
            ArithmeticOp::And => "&",
            ArithmeticOp::Or => "|",
            ArithmeticOp::Xor => "^",
        }
    }

    #[inline]
    pub fn is_bitwise(self) -> bool {
        matches!(self, ArithmeticOp::And | ArithmeticOp::Or | ArithmeticOp::Xor)
    }

    fn label(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Subtract => "subtract",
            ArithmeticOp::Multiply => "multiply",
            ArithmeticOp::Divide => "divide",
            ArithmeticOp::Modulo => "modulo",
            ArithmeticOp::Power => "power",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Xor => "xor",
        }
    }

    fn bitwise(self, left: &BigInt, right: &BigInt) -> BigInt {
        match self {
            ArithmeticOp::And => left & right,
            ArithmeticOp::Or => left | right,
            _ => left ^ right,
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl NumberStrategy for ArithmeticOp {
    type Output = Number;

    fn name(&self) -> &'static str {
        self.label()
    }

    fn integer(&self, left: i64, right: i64, ctx: &MathContext) -> Result<Number, NumberError> {
        let value = match self {
            ArithmeticOp::Add => left.wrapping_add(right),
            ArithmeticOp::Subtract => left.wrapping_sub(right),
            ArithmeticOp::Multiply => left.wrapping_mul(right),
            ArithmeticOp::Divide | ArithmeticOp::Modulo if right == 0 => {
                return Err(NumberError::division_by_zero(self.label()));
            }
            ArithmeticOp::Divide => left.wrapping_div(right),
            ArithmeticOp::Modulo => left.wrapping_rem(right),
            ArithmeticOp::Power => {
                let value = integer_power(&BigInt::from(left), &BigInt::from(right), ctx)?;
                return Ok(Number::BigInteger(value));
            }
            ArithmeticOp::And => left & right,
            ArithmeticOp::Or => left | right,
            ArithmeticOp::Xor => left ^ right,
        };
        Ok(Number::Integer(value))
    }

    fn float(&self, left: f64, right: f64, ctx: &MathContext) -> Result<Number, NumberError> {
        let value = match self {
            ArithmeticOp::Add => left + right,
            ArithmeticOp::Subtract => left - right,
            ArithmeticOp::Multiply => left * right,
            ArithmeticOp::Divide => left / right,
            ArithmeticOp::Modulo => left % right,
            ArithmeticOp::Power => left.powf(right),
            ArithmeticOp::And | ArithmeticOp::Or | ArithmeticOp::Xor => {
                let l = Number::Float(left).to_big_integer()?;
                let r = Number::Float(right).to_big_integer()?;
                return self.big_integer(&l, &r, ctx);
            }
        };
        Ok(Number::Float(value))
    }

    fn big_integer(
        &self,
        left: &BigInt,
        right: &BigInt,
        ctx: &MathContext,
    ) -> Result<Number, NumberError> {
        let value = match self {
            ArithmeticOp::Add => left + right,
            ArithmeticOp::Subtract => left - right,
            ArithmeticOp::Multiply => left * right,
            ArithmeticOp::Divide | ArithmeticOp::Modulo if right.is_zero() => {
                return Err(NumberError::division_by_zero(self.label()));
            }
            ArithmeticOp::Divide => left / right,
            ArithmeticOp::Modulo => left % right,
            ArithmeticOp::Power => integer_power(left, right, ctx)?,
            ArithmeticOp::And | ArithmeticOp::Or | ArithmeticOp::Xor => self.bitwise(left, right),
        };
        Ok(Number::BigInteger(value))
    }

    fn big_decimal(
        &self,
        left: &BigDecimal,
        right: &BigDecimal,
        ctx: &MathContext,
    ) -> Result<Number, NumberError> {
        let value = match self {
            ArithmeticOp::Add => ctx.round(&(left + right)),
            ArithmeticOp::Subtract => ctx.round(&(left - right)),
            ArithmeticOp::Multiply => ctx.round(&(left * right)),
            ArithmeticOp::Divide | ArithmeticOp::Modulo if right.is_zero() => {
                return Err(NumberError::division_by_zero(self.label()));
            }
            ArithmeticOp::Divide => ctx.round_inexact(&(left / right)),
            ArithmeticOp::Modulo => ctx.round(&(left % right)),
            ArithmeticOp::Power => decimal_power(left, right, ctx)?,
            ArithmeticOp::And | ArithmeticOp::Or | ArithmeticOp::Xor => {
                return Ok(Number::BigInteger(
                    self.bitwise(&truncate(left), &truncate(right)),
                ));
            }
        };
        Ok(Number::BigDecimal(value))
    }
}

/// Exact integer power. Integer operands never wrap: the result is
/// always a `BigInt`.
///
/// Negative exponents go through [`decimal_power`] and fail with
/// `InexactResult` unless the result is integral. Positive exponents past
/// `u32::MAX` are only representable for bases `0`, `1` and `-1`.
fn integer_power(
    base: &BigInt,
    exponent: &BigInt,
    ctx: &MathContext,
) -> Result<BigInt, NumberError> {
    if let Some(exponent) = exponent.to_u32() {
        return Ok(base.pow(exponent));
    }
    if exponent.is_negative() {
        let l = BigDecimal::new(base.clone(), 0);
        let r = BigDecimal::new(exponent.clone(), 0);
        return exact_integer(&decimal_power(&l, &r, ctx)?, "power");
    }
    if base.is_zero() || base.is_one() {
        Ok(base.clone())
    } else if *base == -BigInt::one() {
        Ok(if exponent.is_even() { BigInt::one() } else { -BigInt::one() })
    } else {
        Err(NumberError::not_representable(
            format!("{base} ** {exponent}"),
            "big integer",
        ))
    }
}

/// `base` raised to `exponent`, rounded to `ctx`.
///
/// Integral exponents use exact square-and-multiply with guard digits on
/// the intermediates. Fractional exponents are computed in `f64` and
/// converted back, so they carry at most 17 significant digits.
fn decimal_power(
    base: &BigDecimal,
    exponent: &BigDecimal,
    ctx: &MathContext,
) -> Result<BigDecimal, NumberError> {
    if !exponent.is_integer() {
        let value = base.to_f64().unwrap_or(f64::NAN).powf(exponent.to_f64().unwrap_or(f64::NAN));
        return Ok(ctx.round_inexact(&float_to_decimal(value)?));
    }

    let mut remaining = truncate(exponent);
    let negative = remaining.is_negative();
    if negative && base.is_zero() {
        return Err(NumberError::division_by_zero("power"));
    }
    remaining = remaining.abs();

    let working = ctx.working();
    let step = |value: BigDecimal| if ctx.is_unlimited() { value } else { working.round(&value) };

    let two = BigInt::from(2);
    let mut result = BigDecimal::one();
    let mut square = base.clone();
    while !remaining.is_zero() {
        let (half, bit) = remaining.div_rem(&two);
        if bit.is_one() {
            result = step(&result * &square);
        }
        remaining = half;
        if !remaining.is_zero() {
            square = step(&square * &square);
        }
    }

    if negative {
        Ok(ctx.round_inexact(&(BigDecimal::one() / result)))
    } else {
        Ok(ctx.round(&result))
    }
}
