//! Error types for the conversion bridge
//!
//! Covers the three failure kinds of a conversion attempt:
//! - A claiming converter failed while converting
//! - The reified target carries generic structure the bridge cannot resolve
//! - The last-resort coercion engine could not produce a value
//!
//! All three are terminal for the current `convert` call; nothing is
//! retried and no partial result is ever returned.

use rtb_shape::RawKind;

/// Boxed converter-reported failure cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main conversion error type
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// A converter that claimed the work failed while performing it
    #[error("converter '{converter}' failed converting to {target}")]
    ConverterFailed {
        /// Name of the failing converter
        converter: &'static str,
        /// Display form of the reified target shape
        target: String,
        /// Original failure cause
        #[source]
        cause: BoxError,
    },

    /// No converter claimed the work and the target has unresolved,
    /// non-default generic structure the bridge cannot safely guess at
    #[error("unresolvable generic target {target}: type argument {argument} is not resolvable")]
    UnresolvableTarget {
        /// Display form of the reified target shape
        target: String,
        /// Display form of the offending type argument
        argument: String,
    },

    /// The legacy delegate reported a failure
    #[error("delegate conversion failed: {0}")]
    Delegate(String),

    /// The simple coercion fallback could not produce a value
    #[error("coercion failed: {0}")]
    CoercionFailed(#[from] CoercionError),
}

/// Simple value-coercion errors
#[derive(Debug, thiserror::Error)]
pub enum CoercionError {
    /// No rule is registered for the target kind
    #[error("no coercion rule for kind '{kind}'")]
    NoRule {
        /// Target kind with no rule
        kind: RawKind,
    },

    /// A rule exists but the value cannot be coerced
    #[error("cannot coerce {value} into '{kind}'")]
    Unsupported {
        /// Target kind
        kind: RawKind,
        /// Display form of the rejected value
        value: String,
    },
}
