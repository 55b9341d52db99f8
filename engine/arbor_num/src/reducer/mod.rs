//! Binary numeric reduction.
//!
//! [`reduce`] is the single dispatcher: operands sharing a representation go
//! straight to the strategy hook for that representation, anything else is
//! promoted to [`Representation::common`] first. Operators only implement
//! the four per-representation hooks of [`NumberStrategy`].

mod ops;

use std::cmp::Ordering;
use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{ExprNumber, MathContext, Number, NumberError, NumberKind};

pub use ops::ArithmeticOp;

/// A binary operation expressed once per representation.
pub trait NumberStrategy {
    type Output;

    /// Name used in traces and error messages.
    fn name(&self) -> &'static str;

    fn integer(&self, left: i64, right: i64, ctx: &MathContext)
        -> Result<Self::Output, NumberError>;

    fn float(&self, left: f64, right: f64, ctx: &MathContext) -> Result<Self::Output, NumberError>;

    fn big_integer(
        &self,
        left: &BigInt,
        right: &BigInt,
        ctx: &MathContext,
    ) -> Result<Self::Output, NumberError>;

    fn big_decimal(
        &self,
        left: &BigDecimal,
        right: &BigDecimal,
        ctx: &MathContext,
    ) -> Result<Self::Output, NumberError>;
}

/// Promote `left` and `right` to a shared representation and apply `strategy`.
pub fn reduce<S: NumberStrategy + ?Sized>(
    strategy: &S,
    left: Number,
    right: Number,
    ctx: &MathContext,
) -> Result<S::Output, NumberError> {
    match (left, right) {
        (Number::Integer(l), Number::Integer(r)) => strategy.integer(l, r, ctx),
        (Number::Float(l), Number::Float(r)) => strategy.float(l, r, ctx),
        (Number::BigInteger(l), Number::BigInteger(r)) => strategy.big_integer(&l, &r, ctx),
        (Number::BigDecimal(l), Number::BigDecimal(r)) => strategy.big_decimal(&l, &r, ctx),
        (l, r) => {
            let target = l.representation().common(r.representation());
            tracing::trace!(
                strategy = strategy.name(),
                left = l.representation().name(),
                right = r.representation().name(),
                target = target.name(),
                "promoting operands"
            );
            reduce(strategy, l.promote(target)?, r.promote(target)?, ctx)
        }
    }
}

/// Evaluate `op` and wrap the result in `kind`.
pub fn apply(
    op: ArithmeticOp,
    left: Number,
    right: Number,
    kind: NumberKind,
    ctx: &MathContext,
) -> Result<ExprNumber, NumberError> {
    kind.create(reduce(&op, left, right, ctx)?)
}

/// Evaluate `relation` over two numbers of any representation.
pub fn compare(
    relation: Relation,
    left: Number,
    right: Number,
    ctx: &MathContext,
) -> Result<bool, NumberError> {
    reduce(&relation, left, right, ctx)
}

/// The six numeric comparisons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Relation {
    /// Whether an ordering satisfies this relation. Unordered operands
    /// (`NaN`) only satisfy `Ne`.
    pub fn test(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return self == Relation::Ne;
        };
        match self {
            Relation::Eq => ordering == Ordering::Equal,
            Relation::Ne => ordering != Ordering::Equal,
            Relation::Gt => ordering == Ordering::Greater,
            Relation::Ge => ordering != Ordering::Less,
            Relation::Lt => ordering == Ordering::Less,
            Relation::Le => ordering != Ordering::Greater,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "==",
            Relation::Ne => "!=",
            Relation::Gt => ">",
            Relation::Ge => ">=",
            Relation::Lt => "<",
            Relation::Le => "<=",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl NumberStrategy for Relation {
    type Output = bool;

    fn name(&self) -> &'static str {
        self.symbol()
    }

    fn integer(&self, left: i64, right: i64, _: &MathContext) -> Result<bool, NumberError> {
        Ok(self.test(Some(left.cmp(&right))))
    }

    fn float(&self, left: f64, right: f64, _: &MathContext) -> Result<bool, NumberError> {
        Ok(self.test(left.partial_cmp(&right)))
    }

    fn big_integer(&self, left: &BigInt, right: &BigInt, _: &MathContext) -> Result<bool, NumberError> {
        Ok(self.test(Some(left.cmp(right))))
    }

    fn big_decimal(
        &self,
        left: &BigDecimal,
        right: &BigDecimal,
        _: &MathContext,
    ) -> Result<bool, NumberError> {
        Ok(self.test(Some(left.cmp(right))))
    }
}
