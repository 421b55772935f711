//! RTB Shape - Reified type shapes
//!
//! Explicit, inspectable descriptions of possibly-generic types:
//!
//! - [`RawKind`]: interned identity of a concrete type
//! - [`ReifiedType`]: immutable shape tree (kind + ordered type arguments)
//! - [`TypeDescriptor`] / [`Bound`]: the host type-description model
//! - [`reify`]: descriptor-to-shape resolution with cycle protection
//!
//! # Example
//!
//! ```rust
//! use rtb_shape::{reify, RawKind, TypeDescriptor};
//!
//! let target = TypeDescriptor::map_of(
//!     TypeDescriptor::concrete(RawKind::STRING),
//!     TypeDescriptor::concrete(RawKind::INTEGER),
//! );
//! let shape = reify(&target);
//!
//! assert_eq!(shape.arity(), 2);
//! assert_eq!(shape.argument(0).raw_kind(), &RawKind::STRING);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod descriptor;
mod reify;
mod shape;

// Re-exports
pub use descriptor::{Bound, TypeDescriptor, TypeParameter};
pub use reify::reify;
pub use shape::{RawKind, ReifiedType};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with type shapes
    pub use crate::{reify, Bound, RawKind, ReifiedType, TypeDescriptor, TypeParameter};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
