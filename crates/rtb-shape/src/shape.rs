//! Reified type shapes
//!
//! Provides [`RawKind`] for concrete type identity and [`ReifiedType`],
//! the immutable, inspectable description of a possibly-generic type.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identity of a concrete type in the host type system
///
/// A `RawKind` is an interned name ("String", "List", "Map", ...). The
/// bridge never inspects host types reflectively; kinds are opaque
/// identities compared for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawKind(Cow<'static, str>);

impl RawKind {
    /// The top type; canonical identity of the unresolved sentinel
    pub const OBJECT: RawKind = RawKind(Cow::Borrowed("Object"));

    /// Character string
    pub const STRING: RawKind = RawKind(Cow::Borrowed("String"));

    /// Boolean
    pub const BOOLEAN: RawKind = RawKind(Cow::Borrowed("Boolean"));

    /// Signed integer
    pub const INTEGER: RawKind = RawKind(Cow::Borrowed("Integer"));

    /// Floating point number
    pub const FLOAT: RawKind = RawKind(Cow::Borrowed("Float"));

    /// Ordered collection
    pub const LIST: RawKind = RawKind(Cow::Borrowed("List"));

    /// Unordered collection
    pub const SET: RawKind = RawKind(Cow::Borrowed("Set"));

    /// Key-value mapping
    pub const MAP: RawKind = RawKind(Cow::Borrowed("Map"));

    /// Native array
    pub const ARRAY: RawKind = RawKind(Cow::Borrowed("Array"));

    /// Create a kind from a name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Kind name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Check if this is the top type
    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        *self == Self::OBJECT
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for RawKind {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

/// Immutable description of a possibly-generic type
///
/// A raw kind plus zero or more ordered type-argument shapes. Built once
/// per conversion attempt from a [`TypeDescriptor`](crate::TypeDescriptor),
/// inspected by converters, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReifiedType {
    raw: RawKind,
    arguments: Vec<ReifiedType>,
}

/// Shared unresolved sentinel; handed out by reference wherever an
/// argument shape cannot be determined.
static UNRESOLVED: ReifiedType = ReifiedType::unresolved();

impl ReifiedType {
    /// Create a shape with type arguments
    #[inline]
    #[must_use]
    pub fn new(raw: RawKind, arguments: Vec<ReifiedType>) -> Self {
        Self { raw, arguments }
    }

    /// Create a leaf shape with no type arguments
    #[inline]
    #[must_use]
    pub const fn leaf(raw: RawKind) -> Self {
        Self {
            raw,
            arguments: Vec::new(),
        }
    }

    /// The canonical unresolved ("top") shape
    #[inline]
    #[must_use]
    pub const fn unresolved() -> Self {
        Self::leaf(RawKind::OBJECT)
    }

    /// Borrow the shared unresolved sentinel
    #[inline]
    #[must_use]
    pub fn unresolved_ref() -> &'static ReifiedType {
        &UNRESOLVED
    }

    /// Concrete kind of this shape
    #[inline]
    #[must_use]
    pub fn raw_kind(&self) -> &RawKind {
        &self.raw
    }

    /// Ordered type arguments
    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[ReifiedType] {
        &self.arguments
    }

    /// Number of type arguments
    #[inline]
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Type argument at `index`
    ///
    /// Never fails: an out-of-range index degrades to argument 0 if any
    /// argument exists, otherwise to the unresolved sentinel.
    #[must_use]
    pub fn argument(&self, index: usize) -> &ReifiedType {
        match self.arguments.get(index) {
            Some(arg) => arg,
            None => self.arguments.first().unwrap_or(&UNRESOLVED),
        }
    }

    /// Check if this is the unresolved sentinel shape
    #[inline]
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.raw.is_object() && self.arguments.is_empty()
    }
}

impl fmt::Display for ReifiedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}
