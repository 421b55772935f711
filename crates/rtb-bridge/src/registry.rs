//! Converter registry
//!
//! Provides [`ConverterRegistry`], the ordered, internally-synchronized
//! list of registered converters. Insertion order is precedence order:
//! the first registered converter is the first consulted.

use crate::converter::Converter;
use crate::error::ConversionError;
use parking_lot::Mutex;
use rtb_shape::ReifiedType;
use serde_json::Value;
use std::sync::Arc;

/// Ordered registry of pluggable converters
///
/// One mutex guards both mutation and the scan performed during a
/// conversion attempt, so an `add` completes before or after a whole
/// scan, never mid-element. Registries are small and append-mostly;
/// serialized iteration is a deliberate simplicity trade-off.
///
/// Raw iteration is never exposed; callers go through
/// [`try_convert`](Self::try_convert).
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    converters: Mutex<Vec<Arc<dyn Converter>>>,
}

impl ConverterRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a converter
    ///
    /// Safe under concurrent calls; insertion order is preserved.
    pub fn add(&self, converter: Arc<dyn Converter>) {
        self.converters.lock().push(converter);
    }

    /// Append several converters inside one critical section
    ///
    /// Never interleaves partially with a concurrent single [`add`](Self::add).
    pub fn add_all<I>(&self, converters: I)
    where
        I: IntoIterator<Item = Arc<dyn Converter>>,
    {
        self.converters.lock().extend(converters);
    }

    /// Scan converters in registration order for one that claims and
    /// performs the conversion
    ///
    /// The lock is held for the whole scan. The first converter whose
    /// `can_convert` returns true is invoked; a produced value ends the
    /// scan, `None` continues it.
    ///
    /// # Errors
    /// A claiming converter's failure is wrapped with its name and the
    /// target shape and propagated immediately; later converters are
    /// never consulted.
    pub fn try_convert(
        &self,
        source: &Value,
        target: &ReifiedType,
    ) -> Result<Option<Value>, ConversionError> {
        let converters = self.converters.lock();
        for converter in converters.iter() {
            if !converter.can_convert(source, target) {
                continue;
            }
            tracing::debug!(converter = converter.name(), shape = %target, "converter claimed target");
            match converter.convert(source, target) {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {
                    tracing::debug!(converter = converter.name(), "converter produced nothing");
                }
                Err(cause) => {
                    return Err(ConversionError::ConverterFailed {
                        converter: converter.name(),
                        target: target.to_string(),
                        cause,
                    });
                }
            }
        }
        Ok(None)
    }

    /// Number of registered converters
    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.lock().len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.lock().is_empty()
    }
}
