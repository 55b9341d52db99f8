//! Append-only node storage.
//!
//! # Index Spaces
//!
//! - `kinds`: indexed by [`ExprId`]
//! - `expr_lists`: flat `Vec<ExprId>` indexed by [`ExprRange`] (call arguments)
//! - `params`: flat `Vec<Parameter>` indexed by [`ParamRange`] (lambda parameters)
//!
//! Nothing is ever removed or overwritten, so an id stays valid for the
//! lifetime of its arena.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    BinaryOp, ExprId, ExprKind, ExprRange, FunctionName, Literal, ParamRange, Parameter,
    Reference, UnaryOp,
};

/// Child ids of one node. Only calls ever exceed four.
pub(crate) type ChildIds = SmallVec<[ExprId; 4]>;

#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(n) => n,
        Err(_) => panic!("arena capacity exceeded: too many {what}"),
    }
}

#[inline]
fn to_u16(len: usize, what: &str) -> u16 {
    match u16::try_from(len) {
        Ok(n) => n,
        Err(_) => panic!("too many {what}: {len} exceeds {}", u16::MAX),
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
    params: Vec<Parameter>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node.
    ///
    /// # Panics
    /// If the arena already holds `u32::MAX` nodes.
    pub fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        id
    }

    /// Store a child list, returning its range.
    ///
    /// # Panics
    /// If `ids` holds more than `u16::MAX` entries.
    pub fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u16(ids.len(), "call arguments"))
    }

    pub fn push_params(&mut self, params: &[Parameter]) -> ParamRange {
        let start = to_u32(self.params.len(), "parameters");
        self.params.extend_from_slice(params);
        ParamRange::new(start, to_u16(params.len(), "lambda parameters"))
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.as_range()]
    }

    #[inline]
    pub fn get_params(&self, range: ParamRange) -> &[Parameter] {
        &self.params[range.as_range()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Children of `id`, left to right.
    pub(crate) fn children(&self, id: ExprId) -> ChildIds {
        match self.kind(id) {
            ExprKind::Value(_) | ExprKind::Reference(_) => ChildIds::new(),
            ExprKind::Unary { operand, .. } => smallvec::smallvec![*operand],
            ExprKind::Binary { left, right, .. } => smallvec::smallvec![*left, *right],
            ExprKind::Call { args, .. } => self.get_expr_list(*args).iter().copied().collect(),
            ExprKind::Lambda { body, .. } => smallvec::smallvec![*body],
        }
    }

    /// Allocate a copy of `id` with `children` in place of its own.
    ///
    /// The caller has checked `children` against the node's arity.
    pub(crate) fn rebuild(&mut self, id: ExprId, children: &[ExprId]) -> ExprId {
        let kind = match self.kind(id) {
            ExprKind::Value(literal) => ExprKind::Value(literal.clone()),
            ExprKind::Reference(reference) => ExprKind::Reference(reference.clone()),
            ExprKind::Unary { op, .. } => ExprKind::Unary {
                op: *op,
                operand: children[0],
            },
            ExprKind::Binary { op, .. } => ExprKind::Binary {
                op: *op,
                left: children[0],
                right: children[1],
            },
            ExprKind::Call { function, .. } => {
                let function = function.clone();
                ExprKind::Call {
                    function,
                    args: self.push_expr_list(children),
                }
            }
            ExprKind::Lambda { params, .. } => ExprKind::Lambda {
                params: *params,
                body: children[0],
            },
        };
        self.push(kind)
    }

    /// Arena-independent copy of the subtree under `root`.
    ///
    /// Shared subtrees are copied once.
    pub(crate) fn detach(&self, root: ExprId) -> Detached {
        let mut detached = Detached { nodes: Vec::new() };
        let mut seen = FxHashMap::default();
        self.detach_into(root, &mut detached, &mut seen);
        detached
    }

    fn detach_into(
        &self,
        id: ExprId,
        out: &mut Detached,
        seen: &mut FxHashMap<ExprId, usize>,
    ) -> usize {
        if let Some(&slot) = seen.get(&id) {
            return slot;
        }
        let children = self
            .children(id)
            .into_iter()
            .map(|child| self.detach_into(child, out, seen))
            .collect();
        let shape = match self.kind(id) {
            ExprKind::Value(literal) => Shape::Value(literal.clone()),
            ExprKind::Reference(reference) => Shape::Reference(reference.clone()),
            ExprKind::Unary { op, .. } => Shape::Unary(*op),
            ExprKind::Binary { op, .. } => Shape::Binary(*op),
            ExprKind::Call { function, .. } => Shape::Call(function.clone()),
            ExprKind::Lambda { params, .. } => Shape::Lambda(self.get_params(*params).to_vec()),
        };
        out.nodes.push(DetachedNode { shape, children });
        let slot = out.nodes.len() - 1;
        seen.insert(id, slot);
        slot
    }

    /// Allocate every node of `detached`, returning the new root id.
    pub(crate) fn attach(&mut self, detached: &Detached) -> ExprId {
        let mut ids: Vec<ExprId> = Vec::with_capacity(detached.nodes.len());
        for node in &detached.nodes {
            let children: ChildIds = node.children.iter().map(|&slot| ids[slot]).collect();
            let kind = match &node.shape {
                Shape::Value(literal) => ExprKind::Value(literal.clone()),
                Shape::Reference(reference) => ExprKind::Reference(reference.clone()),
                Shape::Unary(op) => ExprKind::Unary {
                    op: *op,
                    operand: children[0],
                },
                Shape::Binary(op) => ExprKind::Binary {
                    op: *op,
                    left: children[0],
                    right: children[1],
                },
                Shape::Call(function) => ExprKind::Call {
                    function: function.clone(),
                    args: self.push_expr_list(&children),
                },
                Shape::Lambda(params) => ExprKind::Lambda {
                    params: self.push_params(params),
                    body: children[0],
                },
            };
            ids.push(self.push(kind));
        }
        ids.last().copied().unwrap_or(ExprId::INVALID)
    }
}

/// A node without its arena: child ids are replaced by slots in
/// [`Detached::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Shape {
    Value(Literal),
    Reference(Reference),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Call(FunctionName),
    Lambda(Vec<Parameter>),
}

#[derive(Clone, Debug)]
pub(crate) struct DetachedNode {
    shape: Shape,
    children: SmallVec<[usize; 4]>,
}

/// Post-order copy of a subtree; the root is the last node.
#[derive(Clone, Debug)]
pub(crate) struct Detached {
    nodes: Vec<DetachedNode>,
}

impl Detached {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Same shapes in the same positions, ignoring how subtrees are shared.
    pub(crate) fn structurally_eq(&self, other: &Detached) -> bool {
        match (self.nodes.len().checked_sub(1), other.nodes.len().checked_sub(1)) {
            (Some(a), Some(b)) => self.node_eq(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn node_eq(&self, slot: usize, other: &Detached, other_slot: usize) -> bool {
        let a = &self.nodes[slot];
        let b = &other.nodes[other_slot];
        a.shape == b.shape
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.node_eq(x, other, y))
    }
}

/// An arena shared between every tree allocated in it.
#[derive(Clone, Default)]
pub struct SharedArena(Arc<RwLock<ExprArena>>);

impl SharedArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, ExprArena> {
        self.0.read()
    }

    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, ExprArena> {
        self.0.write()
    }

    /// Whether both handles point at the same arena.
    #[inline]
    pub fn same_arena(&self, other: &SharedArena) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedArena({} nodes)", self.read().len())
    }
}
