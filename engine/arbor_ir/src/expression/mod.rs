//! Positioned handles onto arena nodes, and the structural-edit protocol.

use std::fmt;
use std::sync::Arc;

use arbor_num::ExprNumber;
use smallvec::SmallVec;

use crate::arena::ChildIds;
use crate::{
    BinaryOp, ExprId, ExprKind, FunctionName, Literal, Parameter, Reference, SharedArena,
    TreeError, UnaryOp,
};

/// One ancestor on the path from the root to a handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Step {
    /// The ancestor node.
    node: ExprId,
    /// Index of the next node on the path among the ancestor's children.
    index: u32,
}

type Path = SmallVec<[Step; 8]>;

/// A node together with the ancestors it was reached through.
///
/// Handles are cheap to clone. Two handles onto the same node reached by
/// different paths are different positions: they share [`Expression::same_node`]
/// but report different parents.
#[derive(Clone)]
pub struct Expression {
    arena: SharedArena,
    id: ExprId,
    /// Root first; the last step is the parent.
    path: Path,
}

/// Read view of a node with positioned child handles.
#[derive(Clone, Debug)]
pub enum Node {
    Value(Literal),
    Reference(Reference),
    Unary {
        op: UnaryOp,
        operand: Expression,
    },
    Binary {
        op: BinaryOp,
        left: Expression,
        right: Expression,
    },
    Call {
        function: FunctionName,
        args: Vec<Expression>,
    },
    Lambda {
        params: Vec<Parameter>,
        body: Expression,
    },
}

impl Expression {
    fn root_handle(arena: SharedArena, id: ExprId) -> Self {
        Expression {
            arena,
            id,
            path: Path::new(),
        }
    }

    fn child_handle(&self, id: ExprId, index: usize) -> Expression {
        let mut path = self.path.clone();
        path.push(Step {
            node: self.id,
            index: u32::try_from(index).unwrap_or(u32::MAX),
        });
        Expression {
            arena: self.arena.clone(),
            id,
            path,
        }
    }

    #[inline]
    pub fn id(&self) -> ExprId {
        self.id
    }

    #[inline]
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    /// The stored node kind.
    pub fn kind(&self) -> ExprKind {
        self.arena.read().kind(self.id).clone()
    }

    /// The node with child handles positioned under `self`.
    pub fn node(&self) -> Node {
        let arena = self.arena.read();
        match arena.kind(self.id) {
            ExprKind::Value(literal) => Node::Value(literal.clone()),
            ExprKind::Reference(reference) => Node::Reference(reference.clone()),
            ExprKind::Unary { op, operand } => Node::Unary {
                op: *op,
                operand: self.child_handle(*operand, 0),
            },
            ExprKind::Binary { op, left, right } => Node::Binary {
                op: *op,
                left: self.child_handle(*left, 0),
                right: self.child_handle(*right, 1),
            },
            ExprKind::Call { function, args } => Node::Call {
                function: function.clone(),
                args: arena
                    .get_expr_list(*args)
                    .iter()
                    .enumerate()
                    .map(|(i, &id)| self.child_handle(id, i))
                    .collect(),
            },
            ExprKind::Lambda { params, body } => Node::Lambda {
                params: arena.get_params(*params).to_vec(),
                body: self.child_handle(*body, 0),
            },
        }
    }

    /// Shortcut for reference nodes.
    pub fn as_reference(&self) -> Option<Reference> {
        match self.arena.read().kind(self.id) {
            ExprKind::Reference(reference) => Some(reference.clone()),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<Expression> {
        let ids = self.arena.read().children(self.id);
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| self.child_handle(id, i))
            .collect()
    }

    pub fn parent(&self) -> Option<Expression> {
        let (last, rest) = self.path.split_last()?;
        Some(Expression {
            arena: self.arena.clone(),
            id: last.node,
            path: rest.iter().copied().collect(),
        })
    }

    /// Position among the parent's children, `None` for a root.
    pub fn index(&self) -> Option<usize> {
        self.path.last().map(|step| step.index as usize)
    }

    pub fn root(&self) -> Expression {
        match self.path.first() {
            Some(step) => Expression::root_handle(self.arena.clone(), step.node),
            None => self.clone(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// The same node as a root of its own tree.
    #[must_use]
    pub fn remove_parent(&self) -> Expression {
        Expression::root_handle(self.arena.clone(), self.id)
    }

    /// Identity: same arena, same node.
    pub fn same_node(&self, other: &Expression) -> bool {
        self.id == other.id && self.arena.same_arena(&other.arena)
    }

    /// Replace every child of this node.
    ///
    /// Returns the new node positioned in the new tree: when `self` has a
    /// parent, each ancestor up to the root is reallocated with the new
    /// child in place. Untouched subtrees are shared with the old tree.
    /// Children from other arenas are copied into this one.
    pub fn set_children(&self, children: &[Expression]) -> Result<Expression, TreeError> {
        let (label, arity) = {
            let arena = self.arena.read();
            let kind = arena.kind(self.id);
            (kind.label(), kind.arity())
        };
        if let Some(expected) = arity {
            if expected != children.len() {
                return Err(TreeError::Arity {
                    node: label,
                    expected,
                    got: children.len(),
                });
            }
        }

        let ids: ChildIds = children.iter().map(|child| adopt(&self.arena, child)).collect();

        let mut arena = self.arena.write();
        let edited = arena.rebuild(self.id, &ids);
        let mut current = edited;
        let mut path = self.path.clone();
        for (depth, step) in self.path.iter().enumerate().rev() {
            let mut siblings = arena.children(step.node);
            siblings[step.index as usize] = current;
            current = arena.rebuild(step.node, &siblings);
            path[depth].node = current;
        }
        tracing::debug!(
            node = label,
            children = children.len(),
            ancestors = self.path.len(),
            "rebuilt tree for edit"
        );

        Ok(Expression {
            arena: self.arena.clone(),
            id: edited,
            path,
        })
    }

    /// Replace the child at `index`, keeping its siblings.
    pub fn replace_child(&self, index: usize, child: &Expression) -> Result<Expression, TreeError> {
        let mut children = self.children();
        let len = children.len();
        let slot = children
            .get_mut(index)
            .ok_or(TreeError::ChildIndex { index, len })?;
        *slot = child.clone();
        self.set_children(&children)
    }
}

/// Id of `child` in `arena`, copying it in when it lives elsewhere.
fn adopt(arena: &SharedArena, child: &Expression) -> ExprId {
    if child.arena.same_arena(arena) {
        return child.id;
    }
    // Copy out under the foreign read lock, then release it before writing.
    let detached = child.arena.read().detach(child.id);
    tracing::debug!(nodes = detached.len(), "importing subtree from another arena");
    arena.write().attach(&detached)
}

impl PartialEq for Expression {
    /// Structural equality: same node kinds, literals and parameters in the
    /// same shape, regardless of arena or position.
    fn eq(&self, other: &Self) -> bool {
        if self.same_node(other) {
            return true;
        }
        let left = self.arena.read().detach(self.id);
        let right = other.arena.read().detach(other.id);
        left.structurally_eq(&right)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("id", &self.id)
            .field("kind", self.arena.read().kind(self.id))
            .field("depth", &self.path.len())
            .finish()
    }
}

/// Allocates trees in one shared arena.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    arena: SharedArena,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder allocating into an existing arena.
    pub fn with_arena(arena: SharedArena) -> Self {
        TreeBuilder { arena }
    }

    #[inline]
    pub fn arena(&self) -> &SharedArena {
        &self.arena
    }

    fn alloc(&self, kind: ExprKind) -> Expression {
        let id = self.arena.write().push(kind);
        Expression::root_handle(self.arena.clone(), id)
    }

    fn adopt(&self, child: &Expression) -> ExprId {
        adopt(&self.arena, child)
    }

    pub fn value(&self, literal: Literal) -> Expression {
        self.alloc(ExprKind::Value(literal))
    }

    pub fn boolean(&self, value: bool) -> Expression {
        self.value(Literal::Bool(value))
    }

    pub fn text(&self, value: impl Into<Arc<str>>) -> Expression {
        self.value(Literal::Text(value.into()))
    }

    pub fn number(&self, value: impl Into<ExprNumber>) -> Expression {
        self.value(Literal::Number(value.into()))
    }

    pub fn reference(&self, reference: impl Into<Reference>) -> Expression {
        self.alloc(ExprKind::Reference(reference.into()))
    }

    pub fn unary(&self, op: UnaryOp, operand: &Expression) -> Expression {
        let operand = self.adopt(operand);
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn binary(&self, op: BinaryOp, left: &Expression, right: &Expression) -> Expression {
        let left = self.adopt(left);
        let right = self.adopt(right);
        self.alloc(ExprKind::Binary { op, left, right })
    }

    /// A call node.
    ///
    /// # Panics
    /// If `args` holds more than `u16::MAX` arguments.
    pub fn call(&self, function: impl Into<FunctionName>, args: &[Expression]) -> Expression {
        let ids: ChildIds = args.iter().map(|arg| self.adopt(arg)).collect();
        let args = self.arena.write().push_expr_list(&ids);
        self.alloc(ExprKind::Call {
            function: function.into(),
            args,
        })
    }

    pub fn lambda(&self, params: &[Parameter], body: &Expression) -> Expression {
        let body = self.adopt(body);
        let params = self.arena.write().push_params(params);
        self.alloc(ExprKind::Lambda { params, body })
    }
}
