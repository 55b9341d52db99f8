//! Operator enums.

use std::fmt;

use arbor_num::{ArithmeticOp, Relation};

/// Binary operators, grouped by how their operands are reduced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,

    // Comparison
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,

    // Logical
    And,
    Or,
    Xor,
}

/// The reduction family a [`BinaryOp`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpGroup {
    Arithmetic(ArithmeticOp),
    Comparison(Relation),
    /// Boolean algebra on booleans, bitwise arithmetic on numbers.
    Logical(ArithmeticOp),
}

impl BinaryOp {
    pub fn group(self) -> OpGroup {
        match self {
            BinaryOp::Add => OpGroup::Arithmetic(ArithmeticOp::Add),
            BinaryOp::Subtract => OpGroup::Arithmetic(ArithmeticOp::Subtract),
            BinaryOp::Multiply => OpGroup::Arithmetic(ArithmeticOp::Multiply),
            BinaryOp::Divide => OpGroup::Arithmetic(ArithmeticOp::Divide),
            BinaryOp::Modulo => OpGroup::Arithmetic(ArithmeticOp::Modulo),
            BinaryOp::Power => OpGroup::Arithmetic(ArithmeticOp::Power),
            BinaryOp::Eq => OpGroup::Comparison(Relation::Eq),
            BinaryOp::Ne => OpGroup::Comparison(Relation::Ne),
            BinaryOp::Gt => OpGroup::Comparison(Relation::Gt),
            BinaryOp::Ge => OpGroup::Comparison(Relation::Ge),
            BinaryOp::Lt => OpGroup::Comparison(Relation::Lt),
            BinaryOp::Le => OpGroup::Comparison(Relation::Le),
            BinaryOp::And => OpGroup::Logical(ArithmeticOp::And),
            BinaryOp::Or => OpGroup::Logical(ArithmeticOp::Or),
            BinaryOp::Xor => OpGroup::Logical(ArithmeticOp::Xor),
        }
    }

    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}
