//! Converter capability trait
//!
//! Provides the [`Converter`] trait for pluggable conversion strategies.
//! Converters are registered with the bridge and consulted in
//! registration order; the first one that claims a source/target pair
//! performs the conversion.

use crate::error::BoxError;
use rtb_shape::ReifiedType;
use serde_json::Value;
use std::fmt;

/// A pluggable conversion strategy
///
/// Converters are stateless from the bridge's point of view and must be
/// safe to consult from multiple threads.
///
/// # Contract
/// - `can_convert` must be cheap; it runs under the registry lock.
/// - A `convert` failure is fatal to the enclosing conversion attempt:
///   the bridge never falls through to other converters or fallback
///   tiers after a claiming converter fails.
pub trait Converter: Send + Sync + fmt::Debug {
    /// Check whether this converter handles the source value for the
    /// reified target shape
    fn can_convert(&self, source: &Value, target: &ReifiedType) -> bool;

    /// Perform the conversion
    ///
    /// # Returns
    /// - `Ok(Some(value))` if conversion produced a value
    /// - `Ok(None)` if claimed but produced nothing; the scan continues
    ///   with the next registered converter
    ///
    /// # Errors
    /// Any error is wrapped by the bridge and propagated immediately.
    fn convert(&self, source: &Value, target: &ReifiedType) -> Result<Option<Value>, BoxError>;

    /// Converter name (for diagnostics)
    fn name(&self) -> &'static str;
}
