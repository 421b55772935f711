//! Host type descriptors
//!
//! Tagged-variant model of the host's type-description facility:
//! [`TypeDescriptor`] for target shapes handed to the bridge, and
//! [`Bound`] for the declared bound structure of generic parameters.
//!
//! The reifier only needs read access to this model; it never touches
//! host reflection directly.

use crate::shape::RawKind;
use serde::{Deserialize, Serialize};

/// Description of a (possibly generic) target type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// A plain non-generic type
    Concrete(RawKind),

    /// A collection with an optional known element type
    Collection {
        /// Collection kind (List, Set, ...)
        kind: RawKind,
        /// Element type, if known
        element: Option<Box<TypeDescriptor>>,
    },

    /// A native array with an optional known element type
    Array {
        /// Element type, if known
        element: Option<Box<TypeDescriptor>>,
    },

    /// A key-value mapping with optional known key/value types
    Map {
        /// Mapping kind
        kind: RawKind,
        /// Key type, if known
        key: Option<Box<TypeDescriptor>>,
        /// Value type, if known
        value: Option<Box<TypeDescriptor>>,
    },

    /// A plain generic type with declared type parameters
    Generic {
        /// Raw generic kind
        kind: RawKind,
        /// Declared type parameters, in declaration order
        parameters: Vec<TypeParameter>,
    },
}

impl TypeDescriptor {
    /// Describe a plain concrete type
    #[inline]
    #[must_use]
    pub fn concrete(kind: impl Into<RawKind>) -> Self {
        Self::Concrete(kind.into())
    }

    /// Describe a list with a known element type
    #[inline]
    #[must_use]
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::Collection {
            kind: RawKind::LIST,
            element: Some(Box::new(element)),
        }
    }

    /// Describe a list with an unknown element type
    #[inline]
    #[must_use]
    pub fn raw_list() -> Self {
        Self::Collection {
            kind: RawKind::LIST,
            element: None,
        }
    }

    /// Describe a map with known key and value types
    #[inline]
    #[must_use]
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::Map {
            kind: RawKind::MAP,
            key: Some(Box::new(key)),
            value: Some(Box::new(value)),
        }
    }

    /// Describe a generic type with declared parameters
    #[inline]
    #[must_use]
    pub fn generic(kind: impl Into<RawKind>, parameters: Vec<TypeParameter>) -> Self {
        Self::Generic {
            kind: kind.into(),
            parameters,
        }
    }

    /// Raw kind identity of the described type
    #[must_use]
    pub fn raw_kind(&self) -> &RawKind {
        static ARRAY_KIND: RawKind = RawKind::ARRAY;
        match self {
            Self::Concrete(kind)
            | Self::Collection { kind, .. }
            | Self::Map { kind, .. }
            | Self::Generic { kind, .. } => kind,
            Self::Array { .. } => &ARRAY_KIND,
        }
    }

    /// Check if this descriptor denotes a collection, array, or map
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Collection { .. } | Self::Array { .. } | Self::Map { .. }
        )
    }
}

/// A declared generic type parameter with its bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameter {
    /// Parameter name (e.g. "T")
    pub name: String,
    /// Declared bound structure
    pub bound: Bound,
}

impl TypeParameter {
    /// Create a parameter with a bound
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, bound: Bound) -> Self {
        Self {
            name: name.into(),
            bound,
        }
    }

    /// Create an unbounded parameter (bound is the top type)
    #[inline]
    #[must_use]
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, Bound::Concrete(RawKind::OBJECT))
    }
}

/// Declared bound structure of a generic parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    /// A concrete type bound
    Concrete(RawKind),

    /// A generic type applied to further type arguments
    Parameterized {
        /// Raw generic kind
        raw: RawKind,
        /// Actual type arguments
        arguments: Vec<Bound>,
    },

    /// A wildcard with optional lower and zero or more upper bounds
    Wildcard {
        /// Lower ("super") bound, if declared
        lower: Option<Box<Bound>>,
        /// Upper ("extends") bounds
        upper: Vec<Bound>,
    },

    /// A type variable with its own declared bound
    Variable {
        /// Variable name (e.g. "T")
        name: String,
        /// The variable's declared bound
        bound: Box<Bound>,
    },

    /// An array of a possibly-generic component
    ArrayOf(Box<Bound>),
}

impl Bound {
    /// Concrete bound shorthand
    #[inline]
    #[must_use]
    pub fn concrete(kind: impl Into<RawKind>) -> Self {
        Self::Concrete(kind.into())
    }

    /// Type-variable bound shorthand
    #[inline]
    #[must_use]
    pub fn variable(name: impl Into<String>, bound: Bound) -> Self {
        Self::Variable {
            name: name.into(),
            bound: Box::new(bound),
        }
    }
}
