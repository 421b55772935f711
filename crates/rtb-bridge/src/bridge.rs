//! Conversion bridge
//!
//! The central orchestrator that:
//! - Reifies the requested target shape
//! - Consults registered converters in registration order
//! - Validates generic resolvability on a total miss
//! - Falls back to the legacy delegate, then to simple value coercion
//!
//! One bridge is constructed at module startup and lives for the process
//! lifetime of that module; the coercion engine inside it is built at
//! most once, on first demand.

use crate::coercion::{baseline_rules, CoercionEngine, ComponentRegistry};
use crate::converter::Converter;
use crate::error::ConversionError;
use crate::registry::ConverterRegistry;
use crate::scope::{AuthorityScope, DirectScope};
use once_cell::sync::OnceCell;
use rtb_shape::{reify, ReifiedType, TypeDescriptor};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Legacy conversion-service delegate
///
/// A previously-existing, broader conversion mechanism consulted after
/// all registered converters have passed.
pub trait DelegateConverter: Send + Sync + fmt::Debug {
    /// Attempt the legacy conversion
    ///
    /// # Errors
    /// Delegate failures propagate and end the conversion attempt.
    fn convert(
        &self,
        source: &Value,
        source_hint: Option<&TypeDescriptor>,
        target: &TypeDescriptor,
    ) -> Result<Value, ConversionError>;
}

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Legacy conversion-service delegate, if any
    pub delegate: Option<Arc<dyn DelegateConverter>>,
    /// Privileged-execution scope for the conversion body
    pub scope: Arc<dyn AuthorityScope>,
    /// Backing component registry seeding the coercion engine
    pub components: Option<Arc<dyn ComponentRegistry>>,
    /// Whether to register the baseline coercion set
    pub baseline_coercions: bool,
}

impl BridgeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a legacy delegate
    #[inline]
    #[must_use]
    pub fn with_delegate(mut self, delegate: Arc<dyn DelegateConverter>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// With a privileged-execution scope
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: Arc<dyn AuthorityScope>) -> Self {
        self.scope = scope;
        self
    }

    /// With a backing component registry
    #[inline]
    #[must_use]
    pub fn with_component_registry(mut self, components: Arc<dyn ComponentRegistry>) -> Self {
        self.components = Some(components);
        self
    }

    /// Toggle the baseline coercion set
    #[inline]
    #[must_use]
    pub fn with_baseline_coercions(mut self, enabled: bool) -> Self {
        self.baseline_coercions = enabled;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            delegate: None,
            scope: Arc::new(DirectScope),
            components: None,
            baseline_coercions: true,
        }
    }
}

/// The conversion bridge
///
/// Owns the converter registry and the fallback chain. Converter
/// precedence is strictly registration order; a claiming converter's
/// failure ends the attempt without consulting any fallback tier.
#[derive(Debug)]
pub struct ConversionBridge {
    /// Ordered converter registry
    registry: ConverterRegistry,
    /// Bridge configuration
    config: BridgeConfig,
    /// Lazily-built coercion engine
    coercion: OnceCell<CoercionEngine>,
}

impl ConversionBridge {
    /// Create a bridge with configuration
    #[inline]
    #[must_use]
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            registry: ConverterRegistry::new(),
            config,
            coercion: OnceCell::new(),
        }
    }

    /// Register a converter
    ///
    /// Callable at any time during the bridge's lifetime; registration
    /// order is precedence order.
    pub fn add(&self, converter: Arc<dyn Converter>) {
        self.registry.add(converter);
    }

    /// Register several converters atomically
    pub fn add_all<I>(&self, converters: I)
    where
        I: IntoIterator<Item = Arc<dyn Converter>>,
    {
        self.registry.add_all(converters);
    }

    /// Number of registered converters
    #[must_use]
    pub fn converter_count(&self) -> usize {
        self.registry.len()
    }

    /// Check whether a conversion could be attempted
    ///
    /// Always permissive; the real decision happens inside
    /// [`convert`](Self::convert).
    #[inline]
    #[must_use]
    pub fn can_convert(
        &self,
        _source_hint: Option<&TypeDescriptor>,
        _target_hint: Option<&TypeDescriptor>,
    ) -> bool {
        true
    }

    /// Convert a source value into the requested target shape
    ///
    /// With no target hint the value is returned unchanged: callers that
    /// don't know or care about a target type get the value untouched.
    ///
    /// # Errors
    /// - [`ConversionError::ConverterFailed`] when a claiming converter
    ///   fails; no further converters or fallback tiers are consulted
    /// - [`ConversionError::UnresolvableTarget`] when no converter claims
    ///   a non-container target whose generic arguments are resolved to
    ///   something the bridge does not understand
    /// - [`ConversionError::CoercionFailed`] when the last-resort
    ///   coercion cannot produce a value
    pub fn convert(
        &self,
        source: &Value,
        source_hint: Option<&TypeDescriptor>,
        target_hint: Option<&TypeDescriptor>,
    ) -> Result<Value, ConversionError> {
        let Some(target) = target_hint else {
            tracing::debug!("no target shape requested, returning source unchanged");
            return Ok(source.clone());
        };

        let shape = reify(target);
        tracing::debug!(%shape, "reified conversion target");

        let scope = Arc::clone(&self.config.scope);
        scope.run(&mut || self.convert_reified(source, source_hint, target, &shape))
    }

    /// Steps 4-7: registry scan, resolvability check, delegate, coercion
    fn convert_reified(
        &self,
        source: &Value,
        source_hint: Option<&TypeDescriptor>,
        target: &TypeDescriptor,
        shape: &ReifiedType,
    ) -> Result<Value, ConversionError> {
        if let Some(value) = self.registry.try_convert(source, shape)? {
            return Ok(value);
        }

        // No converter produced a value. A non-container target whose
        // arguments resolved to anything but the sentinel is a type the
        // bridge cannot safely guess a converter for.
        if !target.is_container() {
            if let Some(argument) = shape.arguments().iter().find(|arg| !arg.is_unresolved()) {
                return Err(ConversionError::UnresolvableTarget {
                    target: shape.to_string(),
                    argument: argument.to_string(),
                });
            }
        }

        if let Some(delegate) = &self.config.delegate {
            tracing::debug!(%shape, "falling back to legacy delegate");
            // The delegate's successful result is discarded deliberately;
            // the attempt always proceeds to simple coercion.
            let _ = delegate.convert(source, source_hint, target)?;
        }

        tracing::debug!(kind = %target.raw_kind(), "falling back to simple coercion");
        let engine = self.coercion_engine();
        Ok(engine.coerce(source, target.raw_kind())?)
    }

    /// Build-once access to the coercion engine
    ///
    /// The first caller seeds the engine from the backing component
    /// registry and the baseline set; everyone after that gets a
    /// lock-free read of the built engine.
    fn coercion_engine(&self) -> &CoercionEngine {
        self.coercion.get_or_init(|| {
            tracing::debug!("building coercion engine");
            let mut engine = CoercionEngine::new();
            if let Some(components) = &self.config.components {
                for rule in components.custom_coercions() {
                    engine.register(rule);
                }
            }
            if self.config.baseline_coercions {
                for rule in baseline_rules() {
                    engine.register_default(rule);
                }
            }
            engine
        })
    }
}

impl Default for ConversionBridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::CoercionRule;
    use crate::error::BoxError;
    use rtb_shape::{Bound, RawKind, TypeParameter};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct ClaimAll {
        output: Option<Value>,
    }

    impl Converter for ClaimAll {
        fn can_convert(&self, _source: &Value, _target: &ReifiedType) -> bool {
            true
        }
        fn convert(
            &self,
            _source: &Value,
            _target: &ReifiedType,
        ) -> Result<Option<Value>, BoxError> {
            Ok(self.output.clone())
        }
        fn name(&self) -> &'static str {
            "claim-all"
        }
    }

    #[derive(Debug)]
    struct FailAll;

    impl Converter for FailAll {
        fn can_convert(&self, _source: &Value, _target: &ReifiedType) -> bool {
            true
        }
        fn convert(
            &self,
            _source: &Value,
            _target: &ReifiedType,
        ) -> Result<Option<Value>, BoxError> {
            Err("deliberate failure".into())
        }
        fn name(&self) -> &'static str {
            "fail-all"
        }
    }

    #[derive(Debug)]
    struct RecordingDelegate {
        invoked: Arc<AtomicBool>,
        output: Value,
    }

    impl DelegateConverter for RecordingDelegate {
        fn convert(
            &self,
            _source: &Value,
            _source_hint: Option<&TypeDescriptor>,
            _target: &TypeDescriptor,
        ) -> Result<Value, ConversionError> {
            self.invoked.store(true, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    #[derive(Debug)]
    struct CountingComponents {
        builds: Arc<AtomicUsize>,
    }

    impl ComponentRegistry for CountingComponents {
        fn custom_coercions(&self) -> Vec<CoercionRule> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }
    }

    fn string_target() -> TypeDescriptor {
        TypeDescriptor::concrete(RawKind::STRING)
    }

    #[test]
    fn absent_target_is_identity() {
        let bridge = ConversionBridge::default();
        let source = serde_json::json!({"nested": [1, 2, {"deep": true}]});
        let out = bridge.convert(&source, None, None).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn claiming_converter_result_returned() {
        let bridge = ConversionBridge::default();
        assert_eq!(bridge.converter_count(), 0);
        bridge.add(Arc::new(ClaimAll {
            output: Some(Value::from("converted")),
        }));
        assert_eq!(bridge.converter_count(), 1);
        let out = bridge
            .convert(&Value::from("x"), None, Some(&string_target()))
            .unwrap();
        assert_eq!(out, Value::from("converted"));
    }

    #[test]
    fn converter_failure_skips_all_fallbacks() {
        let delegate_invoked = Arc::new(AtomicBool::new(false));
        let builds = Arc::new(AtomicUsize::new(0));
        let bridge = ConversionBridge::new(
            BridgeConfig::new()
                .with_delegate(Arc::new(RecordingDelegate {
                    invoked: Arc::clone(&delegate_invoked),
                    output: Value::Null,
                }))
                .with_component_registry(Arc::new(CountingComponents {
                    builds: Arc::clone(&builds),
                })),
        );
        bridge.add(Arc::new(FailAll));

        let err = bridge
            .convert(&Value::from("x"), None, Some(&string_target()))
            .unwrap_err();
        assert!(matches!(err, ConversionError::ConverterFailed { .. }));
        assert!(!delegate_invoked.load(Ordering::SeqCst));
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unresolvable_generic_target_rejected() {
        let bridge = ConversionBridge::default();
        let target = TypeDescriptor::generic(
            "Holder",
            vec![TypeParameter::new(
                "T",
                Bound::concrete(RawKind::new("Account")),
            )],
        );
        let err = bridge
            .convert(&Value::from("x"), None, Some(&target))
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnresolvableTarget { .. }));
        assert!(err.to_string().contains("Account"));
    }

    #[test]
    fn unbounded_generic_target_falls_through_to_coercion() {
        // Holder<T> with T unbounded reifies to the sentinel, so the
        // bridge proceeds to coercion instead of rejecting.
        let bridge = ConversionBridge::default();
        let target = TypeDescriptor::generic("Holder", vec![TypeParameter::unbounded("T")]);
        let err = bridge
            .convert(&Value::from("x"), None, Some(&target))
            .unwrap_err();
        // No rule for "Holder"; the attempt reached the coercion tier.
        assert!(matches!(err, ConversionError::CoercionFailed(_)));
    }

    #[test]
    fn delegate_result_is_discarded_before_coercion() {
        // The delegate runs but its successful result is thrown away;
        // coercion decides the outcome.
        let delegate_invoked = Arc::new(AtomicBool::new(false));
        let bridge = ConversionBridge::new(BridgeConfig::new().with_delegate(Arc::new(
            RecordingDelegate {
                invoked: Arc::clone(&delegate_invoked),
                output: Value::from("delegate result"),
            },
        )));

        let target = TypeDescriptor::concrete(RawKind::INTEGER);
        let out = bridge
            .convert(&Value::from("42"), None, Some(&target))
            .unwrap();

        assert!(delegate_invoked.load(Ordering::SeqCst));
        assert_eq!(out, Value::from(42));
    }

    #[test]
    fn coercion_fallback_string_to_integer() {
        let bridge = ConversionBridge::default();
        let target = TypeDescriptor::concrete(RawKind::INTEGER);
        let out = bridge
            .convert(&Value::from("42"), None, Some(&target))
            .unwrap();
        assert_eq!(out, Value::from(42));
    }

    #[test]
    fn coercion_engine_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let bridge = ConversionBridge::new(BridgeConfig::new().with_component_registry(
            Arc::new(CountingComponents {
                builds: Arc::clone(&builds),
            }),
        ));
        let target = TypeDescriptor::concrete(RawKind::INTEGER);

        bridge
            .convert(&Value::from("1"), None, Some(&target))
            .unwrap();
        bridge
            .convert(&Value::from("2"), None, Some(&target))
            .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_scope_wraps_conversion() {
        #[derive(Debug)]
        struct CountingScope {
            entered: Arc<AtomicUsize>,
        }

        impl AuthorityScope for CountingScope {
            fn run(
                &self,
                body: &mut dyn FnMut() -> Result<Value, ConversionError>,
            ) -> Result<Value, ConversionError> {
                self.entered.fetch_add(1, Ordering::SeqCst);
                body()
            }
        }

        let entered = Arc::new(AtomicUsize::new(0));
        let bridge = ConversionBridge::new(BridgeConfig::new().with_scope(Arc::new(
            CountingScope {
                entered: Arc::clone(&entered),
            },
        )));

        // Identity conversion never enters the scope.
        bridge.convert(&Value::from("x"), None, None).unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 0);

        bridge
            .convert(&Value::from("x"), None, Some(&string_target()))
            .unwrap();
        assert_eq!(entered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn can_convert_is_always_permissive() {
        let bridge = ConversionBridge::default();
        assert!(bridge.can_convert(None, None));
        assert!(bridge.can_convert(None, Some(&string_target())));
    }

    #[test]
    fn baseline_coercions_can_be_disabled() {
        let bridge =
            ConversionBridge::new(BridgeConfig::new().with_baseline_coercions(false));
        let target = TypeDescriptor::concrete(RawKind::INTEGER);
        let err = bridge
            .convert(&Value::from("42"), None, Some(&target))
            .unwrap_err();
        assert!(matches!(
            err,
            ConversionError::CoercionFailed(crate::error::CoercionError::NoRule { .. })
        ));
    }
}
