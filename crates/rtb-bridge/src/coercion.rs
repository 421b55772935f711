//! Simple value coercion
//!
//! The conversion mechanism of last resort: property-editor style rules
//! keyed by target [`RawKind`]. The bridge builds one [`CoercionEngine`]
//! lazily on first demand, seeding it from the backing
//! [`ComponentRegistry`] and then from the baseline rule set.

use crate::error::CoercionError;
use rtb_shape::RawKind;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Coercion function for one target kind
type ApplyFn = dyn Fn(&Value) -> Result<Value, CoercionError> + Send + Sync;

/// A single value-coercion rule
///
/// Coerces arbitrary source values into one target kind.
#[derive(Clone)]
pub struct CoercionRule {
    target: RawKind,
    apply: Arc<ApplyFn>,
}

impl CoercionRule {
    /// Create a rule for a target kind
    #[must_use]
    pub fn new<F>(target: RawKind, apply: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoercionError> + Send + Sync + 'static,
    {
        Self {
            target,
            apply: Arc::new(apply),
        }
    }

    /// Target kind this rule produces
    #[inline]
    #[must_use]
    pub fn target(&self) -> &RawKind {
        &self.target
    }

    /// Apply the rule to a value
    ///
    /// # Errors
    /// Returns [`CoercionError::Unsupported`] when the value cannot be
    /// coerced into the target kind.
    pub fn apply(&self, value: &Value) -> Result<Value, CoercionError> {
        (self.apply)(value)
    }
}

impl fmt::Debug for CoercionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoercionRule")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Backing component registry
///
/// Enumerates the simple coercion rules already registered with the
/// surrounding container. Consulted exactly once, when the engine is
/// first built.
pub trait ComponentRegistry: Send + Sync + fmt::Debug {
    /// Already-registered custom coercion rules
    fn custom_coercions(&self) -> Vec<CoercionRule>;
}

/// Simple, non-generic value-coercion engine
///
/// One rule per target kind; registering a second rule for a kind
/// replaces the first. Values that already match the target kind pass
/// through unchanged without consulting any rule.
#[derive(Debug, Default)]
pub struct CoercionEngine {
    rules: HashMap<RawKind, CoercionRule>,
}

impl CoercionEngine {
    /// Create an empty engine
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any existing rule for its kind
    pub fn register(&mut self, rule: CoercionRule) {
        self.rules.insert(rule.target().clone(), rule);
    }

    /// Register a rule only if its kind has none yet
    pub fn register_default(&mut self, rule: CoercionRule) {
        self.rules.entry(rule.target().clone()).or_insert(rule);
    }

    /// Check if a rule exists for a kind
    #[must_use]
    pub fn has_rule(&self, kind: &RawKind) -> bool {
        self.rules.contains_key(kind)
    }

    /// Coerce a value into a target kind
    ///
    /// # Errors
    /// - [`CoercionError::NoRule`] when the value does not already match
    ///   the kind and no rule is registered for it
    /// - [`CoercionError::Unsupported`] when the rule rejects the value
    pub fn coerce(&self, value: &Value, kind: &RawKind) -> Result<Value, CoercionError> {
        if value_matches_kind(value, kind) {
            return Ok(value.clone());
        }
        match self.rules.get(kind) {
            Some(rule) => rule.apply(value),
            None => Err(CoercionError::NoRule { kind: kind.clone() }),
        }
    }
}

/// Check whether a value already is an instance of a kind
fn value_matches_kind(value: &Value, kind: &RawKind) -> bool {
    match kind {
        k if *k == RawKind::OBJECT => true,
        k if *k == RawKind::STRING => value.is_string(),
        k if *k == RawKind::BOOLEAN => value.is_boolean(),
        k if *k == RawKind::INTEGER => value.is_i64() || value.is_u64(),
        k if *k == RawKind::FLOAT => value.is_f64(),
        k if *k == RawKind::LIST || *k == RawKind::SET || *k == RawKind::ARRAY => value.is_array(),
        k if *k == RawKind::MAP => value.is_object(),
        _ => false,
    }
}

fn unsupported(kind: &RawKind, value: &Value) -> CoercionError {
    CoercionError::Unsupported {
        kind: kind.clone(),
        value: value.to_string(),
    }
}

/// Baseline coercion rule set
///
/// String-to-number, string-to-boolean, scalar-to-string, and the two
/// numeric widenings. Registered after any custom rules so custom rules
/// win for kinds they cover.
#[must_use]
pub fn baseline_rules() -> Vec<CoercionRule> {
    vec![
        CoercionRule::new(RawKind::INTEGER, |value| match value {
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| unsupported(&RawKind::INTEGER, value)),
            Value::Number(n) => n
                .as_i64()
                .map(Value::from)
                .or_else(|| match n.as_f64() {
                    // -2^63 is exactly representable; 2^63 is not an i64,
                    // so the upper comparison must be strict.
                    Some(f)
                        if f.fract() == 0.0
                            && f >= i64::MIN as f64
                            && f < i64::MAX as f64 =>
                    {
                        Some(Value::from(f as i64))
                    }
                    _ => None,
                })
                .ok_or_else(|| unsupported(&RawKind::INTEGER, value)),
            _ => Err(unsupported(&RawKind::INTEGER, value)),
        }),
        CoercionRule::new(RawKind::FLOAT, |value| match value {
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .map_err(|_| unsupported(&RawKind::FLOAT, value)),
            Value::Number(n) => n
                .as_f64()
                .map(Value::from)
                .ok_or_else(|| unsupported(&RawKind::FLOAT, value)),
            _ => Err(unsupported(&RawKind::FLOAT, value)),
        }),
        CoercionRule::new(RawKind::BOOLEAN, |value| match value {
            Value::String(s) => match s.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(unsupported(&RawKind::BOOLEAN, value)),
            },
            _ => Err(unsupported(&RawKind::BOOLEAN, value)),
        }),
        CoercionRule::new(RawKind::STRING, |value| match value {
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(unsupported(&RawKind::STRING, value)),
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_baselines() -> CoercionEngine {
        let mut engine = CoercionEngine::new();
        for rule in baseline_rules() {
            engine.register_default(rule);
        }
        engine
    }

    #[test]
    fn string_to_integer() {
        let engine = engine_with_baselines();
        let out = engine
            .coerce(&Value::from("42"), &RawKind::INTEGER)
            .unwrap();
        assert_eq!(out, Value::from(42));
    }

    #[test]
    fn string_to_integer_trims_whitespace() {
        let engine = engine_with_baselines();
        let out = engine
            .coerce(&Value::from("  -7 "), &RawKind::INTEGER)
            .unwrap();
        assert_eq!(out, Value::from(-7));
    }

    #[test]
    fn integral_float_to_integer() {
        let engine = engine_with_baselines();
        let out = engine
            .coerce(&Value::from(3.0), &RawKind::INTEGER)
            .unwrap();
        assert_eq!(out, Value::from(3));
    }

    #[test]
    fn out_of_range_integral_float_rejected() {
        let engine = engine_with_baselines();
        let err = engine
            .coerce(&Value::from(1e20), &RawKind::INTEGER)
            .unwrap_err();
        assert!(matches!(err, CoercionError::Unsupported { .. }));

        let err = engine
            .coerce(&Value::from(-1e20), &RawKind::INTEGER)
            .unwrap_err();
        assert!(matches!(err, CoercionError::Unsupported { .. }));
    }

    #[test]
    fn baselines_cover_expected_kinds() {
        let engine = engine_with_baselines();
        assert!(engine.has_rule(&RawKind::INTEGER));
        assert!(engine.has_rule(&RawKind::FLOAT));
        assert!(engine.has_rule(&RawKind::BOOLEAN));
        assert!(engine.has_rule(&RawKind::STRING));
        assert!(!engine.has_rule(&RawKind::MAP));
    }

    #[test]
    fn fractional_float_to_integer_rejected() {
        let engine = engine_with_baselines();
        let err = engine
            .coerce(&Value::from(3.5), &RawKind::INTEGER)
            .unwrap_err();
        assert!(matches!(err, CoercionError::Unsupported { .. }));
    }

    #[test]
    fn string_to_float_and_integer_widening() {
        let engine = engine_with_baselines();
        assert_eq!(
            engine.coerce(&Value::from("2.5"), &RawKind::FLOAT).unwrap(),
            Value::from(2.5)
        );
        assert_eq!(
            engine.coerce(&Value::from(2), &RawKind::FLOAT).unwrap(),
            Value::from(2.0)
        );
    }

    #[test]
    fn string_to_boolean() {
        let engine = engine_with_baselines();
        assert_eq!(
            engine
                .coerce(&Value::from("true"), &RawKind::BOOLEAN)
                .unwrap(),
            Value::Bool(true)
        );
        assert!(engine
            .coerce(&Value::from("yes"), &RawKind::BOOLEAN)
            .is_err());
    }

    #[test]
    fn scalar_to_string() {
        let engine = engine_with_baselines();
        assert_eq!(
            engine.coerce(&Value::from(7), &RawKind::STRING).unwrap(),
            Value::from("7")
        );
        assert_eq!(
            engine.coerce(&Value::Bool(true), &RawKind::STRING).unwrap(),
            Value::from("true")
        );
    }

    #[test]
    fn matching_value_passes_through() {
        let engine = CoercionEngine::new();
        let value = Value::from("already a string");
        assert_eq!(
            engine.coerce(&value, &RawKind::STRING).unwrap(),
            value
        );
    }

    #[test]
    fn object_kind_accepts_anything() {
        let engine = CoercionEngine::new();
        let value = serde_json::json!({"a": [1, 2]});
        assert_eq!(engine.coerce(&value, &RawKind::OBJECT).unwrap(), value);
    }

    #[test]
    fn missing_rule_is_no_rule_error() {
        let engine = CoercionEngine::new();
        let err = engine
            .coerce(&Value::from("x"), &RawKind::new("Account"))
            .unwrap_err();
        assert!(matches!(err, CoercionError::NoRule { .. }));
    }

    #[test]
    fn custom_rule_wins_over_default() {
        let mut engine = CoercionEngine::new();
        engine.register(CoercionRule::new(RawKind::INTEGER, |_| Ok(Value::from(99))));
        for rule in baseline_rules() {
            engine.register_default(rule);
        }
        let out = engine
            .coerce(&Value::from("42"), &RawKind::INTEGER)
            .unwrap();
        assert_eq!(out, Value::from(99));
    }
}
