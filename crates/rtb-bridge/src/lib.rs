//! RTB Bridge - Conversion dispatch
//!
//! The conversion bridge that:
//! - Reifies generic target shapes through [`rtb_shape`]
//! - Dispatches to pluggable [`Converter`]s in registration order
//! - Validates generic resolvability when no converter claims the work
//! - Falls back to a legacy [`DelegateConverter`], then to simple value
//!   coercion seeded from a backing [`ComponentRegistry`]
//!
//! # Example
//!
//! ```rust
//! use rtb_bridge::{BridgeConfig, ConversionBridge};
//! use rtb_shape::{RawKind, TypeDescriptor};
//!
//! # fn example() -> Result<(), rtb_bridge::ConversionError> {
//! let bridge = ConversionBridge::new(BridgeConfig::new());
//!
//! let target = TypeDescriptor::concrete(RawKind::INTEGER);
//! let value = bridge.convert(&serde_json::json!("42"), None, Some(&target))?;
//!
//! assert_eq!(value, serde_json::json!(42));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod bridge;
mod coercion;
mod converter;
mod error;
mod registry;
mod scope;

// Re-exports
pub use bridge::{BridgeConfig, ConversionBridge, DelegateConverter};
pub use coercion::{baseline_rules, CoercionEngine, CoercionRule, ComponentRegistry};
pub use converter::Converter;
pub use error::{BoxError, CoercionError, ConversionError};
pub use registry::ConverterRegistry;
pub use scope::{AuthorityScope, DirectScope};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the conversion bridge
    pub use crate::{
        BridgeConfig, CoercionRule, ComponentRegistry, ConversionBridge, ConversionError,
        Converter, DelegateConverter,
    };
    pub use rtb_shape::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
