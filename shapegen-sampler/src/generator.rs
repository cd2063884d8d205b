//! Core generator infrastructure: the `Generator` trait and type-erased handles.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::GeneratorConfig;
use crate::error::SampleError;

/// Core generator trait for creating random values
pub trait Generator<T> {
    /// Generate a random value of type T using the provided RNG and configuration
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError>;
}

/// A clonable, type-erased generator handle
///
/// Cloning is cheap: every clone shares the same underlying generator, which
/// makes it possible to hand one generator to several combinators.
pub struct BoxedGenerator<T> {
    generator: Arc<dyn Generator<T> + Send + Sync>,
}

impl<T> BoxedGenerator<T> {
    /// Create a new boxed generator
    pub fn new<G: Generator<T> + Send + Sync + 'static>(generator: G) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

impl<T> Clone for BoxedGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<T> std::fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedGenerator").finish_non_exhaustive()
    }
}

impl<T: 'static> Generator<T> for BoxedGenerator<T> {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        self.generator.generate(rng, config)
    }
}

/// A generator backed by a closure
pub struct FnGenerator<T, F> {
    function: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, F> FnGenerator<T, F>
where
    F: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> Result<T, SampleError>,
{
    /// Create a generator that delegates to `function`
    pub fn new(function: F) -> Self {
        Self {
            function,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> Generator<T> for FnGenerator<T, F>
where
    F: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> Result<T, SampleError>,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        (self.function)(rng, config)
    }
}

/// Create a boxed generator from a closure
pub fn from_fn<T, F>(function: F) -> BoxedGenerator<T>
where
    T: 'static,
    F: Fn(&mut dyn rand::RngCore, &GeneratorConfig) -> Result<T, SampleError>
        + Send
        + Sync
        + 'static,
{
    BoxedGenerator::new(FnGenerator::new(function))
}

/// A simple generator that always produces the same value
#[derive(Debug, Clone)]
pub struct ConstantGenerator<T> {
    value: T,
}

impl<T: Clone> ConstantGenerator<T> {
    /// Create a new constant generator
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Generator<T> for ConstantGenerator<T> {
    fn generate(
        &self,
        _rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        Ok(self.value.clone())
    }
}

/// A generator that chooses randomly from a collection of values
#[derive(Debug, Clone)]
pub struct OneOfGenerator<T> {
    values: Vec<T>,
}

impl<T: Clone> OneOfGenerator<T> {
    /// Create a new one-of generator
    pub fn new(values: Vec<T>) -> Self {
        if values.is_empty() {
            panic!("OneOfGenerator cannot be created with empty values");
        }
        Self { values }
    }
}

impl<T: Clone + 'static> Generator<T> for OneOfGenerator<T> {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        use rand::Rng;
        let index = rng.gen_range(0..self.values.len());
        Ok(self.values[index].clone())
    }
}

/// Create a generator that always produces `value`
pub fn constant<T>(value: T) -> BoxedGenerator<T>
where
    T: Clone + Send + Sync + 'static,
{
    BoxedGenerator::new(ConstantGenerator::new(value))
}

/// Create a generator that picks uniformly among `values`
///
/// # Panics
///
/// Panics if `values` is empty.
pub fn one_of<T>(values: Vec<T>) -> BoxedGenerator<T>
where
    T: Clone + Send + Sync + 'static,
{
    BoxedGenerator::new(OneOfGenerator::new(values))
}
