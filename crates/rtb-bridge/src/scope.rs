//! Authority scope
//!
//! Provides [`AuthorityScope`], the pluggable privileged-execution
//! strategy the bridge runs its converter and fallback tiers under.
//! Hosts that enforce a per-module access-control boundary supply their
//! own implementation; everywhere else [`DirectScope`] collapses the
//! wrapping to a direct call.

use crate::error::ConversionError;
use serde_json::Value;
use std::fmt;

/// Ambient-authority execution scope
pub trait AuthorityScope: Send + Sync + fmt::Debug {
    /// Run the conversion body under this scope's authority
    ///
    /// # Errors
    /// Propagates whatever the body returns.
    fn run(
        &self,
        body: &mut dyn FnMut() -> Result<Value, ConversionError>,
    ) -> Result<Value, ConversionError>;
}

/// The no-op scope: invokes the body directly
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectScope;

impl AuthorityScope for DirectScope {
    fn run(
        &self,
        body: &mut dyn FnMut() -> Result<Value, ConversionError>,
    ) -> Result<Value, ConversionError> {
        body()
    }
}
