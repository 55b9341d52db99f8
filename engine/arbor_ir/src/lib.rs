//! Arbor IR - expression trees.
//!
//! Trees are stored flat: every node lives in an append-only [`ExprArena`]
//! and refers to its children by [`ExprId`]. Nodes never change once
//! allocated, so a tree can be shared freely between threads and edits
//! are cheap.
//!
//! An [`Expression`] is a handle onto one node. Besides the node id it
//! records the path of ancestors it was reached through, which gives it a
//! parent and an index without the nodes storing back pointers. Editing
//! through a handle allocates the new node plus one fresh copy of every
//! ancestor; all other nodes are shared with the old tree.
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId` indices
//! - **Closed node set**: [`ExprKind`] is an enum, helpers are free functions
//! - **Structural sharing**: old trees stay valid after every edit

mod arena;
mod ast;
mod errors;
mod expr_id;
mod expression;
mod name;
mod params;
pub mod visitor;

pub use arena::{ExprArena, SharedArena};
pub use ast::{BinaryOp, ExprKind, Literal, OpGroup, UnaryOp};
pub use errors::{MisplacedVariable, TreeError};
pub use expr_id::{ExprId, ExprRange, ParamRange};
pub use expression::{Expression, Node, TreeBuilder};
pub use name::{FunctionName, ParameterName, Reference};
pub use params::{set_flags, Arity, Cardinality, Parameter, ParameterFlags, ValueType};
pub use visitor::{Visiting, Visitor};
