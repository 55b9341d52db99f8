//! Node kinds.

mod operators;

use std::fmt;
use std::sync::Arc;

use arbor_num::ExprNumber;

use crate::{ExprId, ExprRange, FunctionName, ParamRange, Reference};

pub use operators::{BinaryOp, OpGroup, UnaryOp};

/// Constant stored in a value node.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Text(Arc<str>),
    Number(ExprNumber),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Text(s) => write!(f, "{s:?}"),
            Literal::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Node kind as stored in the arena.
///
/// Child ids refer to the arena the node lives in.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Value(Literal),
    Reference(Reference),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Call {
        function: FunctionName,
        args: ExprRange,
    },
    Lambda {
        params: ParamRange,
        body: ExprId,
    },
}

impl ExprKind {
    /// Fixed child count, or `None` for calls.
    pub fn arity(&self) -> Option<usize> {
        match self {
            ExprKind::Value(_) | ExprKind::Reference(_) => Some(0),
            ExprKind::Unary { .. } | ExprKind::Lambda { .. } => Some(1),
            ExprKind::Binary { .. } => Some(2),
            ExprKind::Call { .. } => None,
        }
    }

    /// Short label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            ExprKind::Value(_) => "value",
            ExprKind::Reference(_) => "reference",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Call { .. } => "call",
            ExprKind::Lambda { .. } => "lambda",
        }
    }
}
