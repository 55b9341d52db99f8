//! Tree edit and parameter list failures.

use thiserror::Error;

use crate::ParameterName;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A fixed-arity node was given the wrong number of children.
    #[error("{node} node expects {expected} children, got {got}")]
    Arity {
        node: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("child index {index} out of bounds for {len} children")]
    ChildIndex { index: usize, len: usize },
}

/// A variable parameter that is followed by other parameters.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("variable parameter `{parameter}` must be the last parameter")]
pub struct MisplacedVariable {
    pub parameter: ParameterName,
}
