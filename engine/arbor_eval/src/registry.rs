//! Function registry.
//!
//! Maps function names to shared function objects. `BasicContext` looks
//! call targets up here.

use std::fmt;
use std::sync::Arc;

use arbor_ir::FunctionName;
use rustc_hash::FxHashMap;

use crate::function::builtins::{FalseFunction, StartsWithFunction};
use crate::ExpressionFunction;

#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<FunctionName, Arc<dyn ExpressionFunction>>,
}

impl FunctionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `false` and `starts-with`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("false", Arc::new(FalseFunction));
        registry.register("starts-with", Arc::new(StartsWithFunction));
        registry
    }

    /// Register `function` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<FunctionName>,
        function: Arc<dyn ExpressionFunction>,
    ) -> Option<Arc<dyn ExpressionFunction>> {
        let name = name.into();
        tracing::trace!(%name, "registering function");
        self.functions.insert(name, function)
    }

    pub fn lookup(&self, name: &FunctionName) -> Option<Arc<dyn ExpressionFunction>> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &FunctionName> + '_ {
        self.functions.keys()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().map(FunctionName::as_str).collect();
        names.sort_unstable();
        f.debug_struct("FunctionRegistry")
            .field("functions", &names)
            .finish()
    }
}
