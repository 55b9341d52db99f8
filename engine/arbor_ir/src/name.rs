//! Names used by tree nodes: function names, references and parameter names.
//!
//! All three are cheap to clone (`Arc<str>`) and compare by content.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(text: impl Into<Arc<str>>) -> Self {
                $name(text.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), &*self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                $name::new(text)
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                $name::new(text)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name! {
    /// Name a call node uses to look up its function.
    FunctionName
}

define_name! {
    /// Opaque lookup key resolved by the evaluation context.
    Reference
}

define_name! {
    /// Declared name of a function parameter.
    ParameterName
}

impl From<&ParameterName> for Reference {
    /// Lambda bodies refer to their parameters by name.
    fn from(name: &ParameterName) -> Self {
        Reference(Arc::clone(&name.0))
    }
}
