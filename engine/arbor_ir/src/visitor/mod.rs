//! Tree visitor.
//!
//! Every node gets the generic [`Visitor::start_visit`] and
//! [`Visitor::end_visit`] hooks around a variant-specific hook. Operator,
//! call and lambda nodes have start/end pairs around their children; value
//! and reference leaves have a single hook.
//!
//! Returning [`Visiting::Skip`] from a start hook skips everything inside
//! it. The matching end hooks still run.
//!
//! # Example
//!
//! ```text
//! struct CountReferences(usize);
//!
//! impl Visitor for CountReferences {
//!     fn visit_reference(&mut self, _: &Reference, _: &Expression) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use crate::{BinaryOp, Expression, FunctionName, Literal, Node, Parameter, Reference, UnaryOp};

/// Whether to descend into a node's children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Visiting {
    Continue,
    Skip,
}

pub trait Visitor {
    fn start_visit(&mut self, _expr: &Expression) -> Visiting {
        Visiting::Continue
    }

    fn end_visit(&mut self, _expr: &Expression) {}

    fn start_visit_unary(&mut self, _op: UnaryOp, _expr: &Expression) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_unary(&mut self, _op: UnaryOp, _expr: &Expression) {}

    fn start_visit_binary(&mut self, _op: BinaryOp, _expr: &Expression) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_binary(&mut self, _op: BinaryOp, _expr: &Expression) {}

    fn start_visit_call(&mut self, _function: &FunctionName, _expr: &Expression) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_call(&mut self, _function: &FunctionName, _expr: &Expression) {}

    fn start_visit_lambda(&mut self, _params: &[Parameter], _expr: &Expression) -> Visiting {
        Visiting::Continue
    }

    fn end_visit_lambda(&mut self, _params: &[Parameter], _expr: &Expression) {}

    fn visit_value(&mut self, _literal: &Literal, _expr: &Expression) {}

    fn visit_reference(&mut self, _reference: &Reference, _expr: &Expression) {}

    /// Entry point for one node. Override to intercept whole subtrees.
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

/// Walk `expr` and its children in order.
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expression) {
    if visitor.start_visit(expr) == Visiting::Continue {
        match expr.node() {
            Node::Value(literal) => visitor.visit_value(&literal, expr),
            Node::Reference(reference) => visitor.visit_reference(&reference, expr),
            Node::Unary { op, operand } => {
                if visitor.start_visit_unary(op, expr) == Visiting::Continue {
                    visitor.visit_expression(&operand);
                }
                visitor.end_visit_unary(op, expr);
            }
            Node::Binary { op, left, right } => {
                if visitor.start_visit_binary(op, expr) == Visiting::Continue {
                    visitor.visit_expression(&left);
                    visitor.visit_expression(&right);
                }
                visitor.end_visit_binary(op, expr);
            }
            Node::Call { function, args } => {
                if visitor.start_visit_call(&function, expr) == Visiting::Continue {
                    for arg in &args {
                        visitor.visit_expression(arg);
                    }
                }
                visitor.end_visit_call(&function, expr);
            }
            Node::Lambda { params, body } => {
                if visitor.start_visit_lambda(&params, expr) == Visiting::Continue {
                    visitor.visit_expression(&body);
                }
                visitor.end_visit_lambda(&params, expr);
            }
        }
    }
    visitor.end_visit(expr);
}

impl Expression {
    /// Walk this subtree with `visitor`.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_expression(self);
    }
}
