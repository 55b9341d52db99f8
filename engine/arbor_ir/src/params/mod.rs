//! Function parameter declarations.
//!
//! Parameters live in the IR because lambda nodes declare them; the
//! function contract in `arbor_eval` consumes the same types.

use std::fmt;

use bitflags::bitflags;

use crate::errors::MisplacedVariable;
use crate::ParameterName;

/// The declared type of a parameter or function result.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Accepts every value unchanged.
    #[default]
    Any,
    Bool,
    Text,
    /// An `ExprNumber` of the context's kind.
    Number,
    Integer,
    BigInteger,
    Reference,
    Expression,
    Function,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::Bool => "boolean",
            ValueType::Text => "text",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::BigInteger => "big integer",
            ValueType::Reference => "reference",
            ValueType::Expression => "expression",
            ValueType::Function => "function",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How many arguments a parameter consumes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Required,
    Optional,
    /// Zero or more trailing arguments. Only meaningful in last position.
    Variable,
}

bitflags! {
    /// Argument preparation switches.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ParameterFlags: u8 {
        /// Pass the argument expression itself instead of its value.
        const UNEVALUATED = 1 << 0;
        /// Resolve a bare reference argument to the value it names.
        const RESOLVE_REFERENCES = 1 << 1;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: ParameterName,
    pub ty: ValueType,
    pub cardinality: Cardinality,
    pub flags: ParameterFlags,
}

impl Parameter {
    pub fn new(name: impl Into<ParameterName>, ty: ValueType, cardinality: Cardinality) -> Self {
        Parameter {
            name: name.into(),
            ty,
            cardinality,
            flags: ParameterFlags::empty(),
        }
    }

    pub fn required(name: impl Into<ParameterName>, ty: ValueType) -> Self {
        Self::new(name, ty, Cardinality::Required)
    }

    pub fn optional(name: impl Into<ParameterName>, ty: ValueType) -> Self {
        Self::new(name, ty, Cardinality::Optional)
    }

    pub fn variable(name: impl Into<ParameterName>, ty: ValueType) -> Self {
        Self::new(name, ty, Cardinality::Variable)
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn is_unevaluated(&self) -> bool {
        self.flags.contains(ParameterFlags::UNEVALUATED)
    }

    #[inline]
    pub fn resolves_references(&self) -> bool {
        self.flags.contains(ParameterFlags::RESOLVE_REFERENCES)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.cardinality {
            Cardinality::Required => "",
            Cardinality::Optional => "?",
            Cardinality::Variable => "...",
        };
        write!(f, "{}{suffix}: {}", self.name, self.ty)
    }
}

/// Copy of `parameters` with `flags` replacing every parameter's flags.
pub fn set_flags(parameters: &[Parameter], flags: ParameterFlags) -> Vec<Parameter> {
    parameters
        .iter()
        .map(|p| p.clone().with_flags(flags))
        .collect()
}

/// Accepted argument counts for a parameter list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    /// `None` when a trailing variable parameter accepts any number.
    pub max: Option<usize>,
}

impl Arity {
    /// Required parameters count toward `min`; required and optional toward
    /// `max`. A trailing variable parameter removes the upper bound.
    ///
    /// A variable parameter anywhere but last is rejected.
    pub fn of(parameters: &[Parameter]) -> Result<Self, MisplacedVariable> {
        let mut min = 0;
        let mut max = 0;
        let mut unbounded = false;
        for (index, p) in parameters.iter().enumerate() {
            match p.cardinality {
                Cardinality::Required => {
                    min += 1;
                    max += 1;
                }
                Cardinality::Optional => max += 1,
                Cardinality::Variable if index + 1 == parameters.len() => unbounded = true,
                Cardinality::Variable => {
                    return Err(MisplacedVariable {
                        parameter: p.name.clone(),
                    });
                }
            }
        }
        Ok(Arity {
            min,
            max: if unbounded { None } else { Some(max) },
        })
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}
