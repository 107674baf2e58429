//! Keyed converter pipeline
//!
//! Converters are registered under a typed [`ConverterKey`]. Converting
//! folds every converter of the key in registration order: each stage gets
//! the source and the previous stage's target (`None` for the first stage).

use crate::error::ConversionError;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// One stage of a conversion
pub trait Converter<S, T>: Send + Sync {
    /// Convert `source`, refining `target` when a previous stage produced one
    ///
    /// # Errors
    /// `ConversionError::Failed` when the source cannot be converted.
    fn convert(&self, source: &S, target: Option<T>) -> Result<T, ConversionError>;
}

impl<S, T, F> Converter<S, T> for F
where
    F: Fn(&S, Option<T>) -> Result<T, ConversionError> + Send + Sync,
{
    fn convert(&self, source: &S, target: Option<T>) -> Result<T, ConversionError> {
        self(source, target)
    }
}

/// Typed name of a conversion pipeline
pub struct ConverterKey<S, T> {
    name: &'static str,
    _types: PhantomData<fn(&S) -> T>,
}

impl<S, T> ConverterKey<S, T> {
    /// Key with a unique name
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _types: PhantomData,
        }
    }

    /// Key name
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<S, T> Clone for ConverterKey<S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, T> Copy for ConverterKey<S, T> {}

impl<S, T> fmt::Debug for ConverterKey<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConverterKey").field(&self.name).finish()
    }
}

type ErasedConverter = Arc<dyn Any + Send + Sync>;

/// Registry and runner of converter pipelines
#[derive(Default)]
pub struct ConverterService {
    converters: RwLock<HashMap<&'static str, Vec<ErasedConverter>>>,
}

impl ConverterService {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the pipeline of `key`
    pub fn register<S, T, C>(&self, key: ConverterKey<S, T>, converter: C)
    where
        S: 'static,
        T: 'static,
        C: Converter<S, T> + 'static,
    {
        let stage: Arc<dyn Converter<S, T>> = Arc::new(converter);
        let erased: ErasedConverter = Arc::new(stage);
        tracing::debug!(key = key.name(), "Registering converter");
        self.converters
            .write()
            .entry(key.name())
            .or_default()
            .push(erased);
    }

    /// Whether any stage is registered for `key`
    #[must_use]
    pub fn has_converter<S, T>(&self, key: ConverterKey<S, T>) -> bool {
        self.converters
            .read()
            .get(key.name())
            .is_some_and(|stages| !stages.is_empty())
    }

    /// Number of stages registered for `key`
    #[must_use]
    pub fn stage_count<S, T>(&self, key: ConverterKey<S, T>) -> usize {
        self.converters.read().get(key.name()).map_or(0, Vec::len)
    }

    /// Run the pipeline of `key` over `source`
    ///
    /// # Errors
    /// - `ConversionError::NoConverter` if nothing is registered
    /// - `ConversionError::TypeMismatch` if a stage was registered with other types
    /// - the first failing stage's error
    pub fn convert<S, T>(&self, source: &S, key: ConverterKey<S, T>) -> Result<T, ConversionError>
    where
        S: 'static,
        T: 'static,
    {
        let stages = self.stages(key)?;
        let mut target = None;
        for stage in stages {
            target = Some(stage.convert(source, target)?);
        }
        target.ok_or(ConversionError::NoConverter(key.name()))
    }

    /// Run the pipeline of `key` over every source
    ///
    /// # Errors
    /// Same as [`Self::convert`], for the first failing source.
    pub fn convert_many<S, T>(&self, sources: &[S], key: ConverterKey<S, T>) -> Result<Vec<T>, ConversionError>
    where
        S: 'static,
        T: 'static,
    {
        sources.iter().map(|source| self.convert(source, key)).collect()
    }

    fn stages<S, T>(&self, key: ConverterKey<S, T>) -> Result<Vec<Arc<dyn Converter<S, T>>>, ConversionError>
    where
        S: 'static,
        T: 'static,
    {
        // stages are cloned out so no lock is held while converting
        let registry = self.converters.read();
        let erased = registry
            .get(key.name())
            .filter(|stages| !stages.is_empty())
            .ok_or(ConversionError::NoConverter(key.name()))?;

        erased
            .iter()
            .map(|stage| {
                stage
                    .downcast_ref::<Arc<dyn Converter<S, T>>>()
                    .cloned()
                    .ok_or(ConversionError::TypeMismatch(key.name()))
            })
            .collect()
    }
}

impl fmt::Debug for ConverterService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.converters.read();
        let mut keys: Vec<_> = registry.iter().map(|(k, v)| (*k, v.len())).collect();
        keys.sort_unstable();
        f.debug_struct("ConverterService").field("keys", &keys).finish()
    }
}
