//! Combinators for composing generators.
//!
//! Every combinator works on [`Generator`] values and can be boxed, so
//! generators built at runtime (for example from a schema) compose the same
//! way as generators written out by hand.

use std::marker::PhantomData;
use std::sync::Arc;

use rand::Rng;

use crate::config::GeneratorConfig;
use crate::error::SampleError;
use crate::generator::{BoxedGenerator, Generator};

/// Extension methods available on every generator
pub trait GeneratorExt<T>: Generator<T> + Sized {
    /// Map generated values to a different type
    fn map<F, U>(self, mapper: F) -> Map<Self, F, T>
    where
        F: Fn(T) -> U,
    {
        Map {
            generator: self,
            mapper,
            _phantom: PhantomData,
        }
    }

    /// Map generated values with a mapper that may abort sampling
    fn try_map<F, U>(self, mapper: F) -> TryMap<Self, F, T>
    where
        F: Fn(T) -> Result<U, SampleError>,
    {
        TryMap {
            generator: self,
            mapper,
            _phantom: PhantomData,
        }
    }

    /// Keep only values accepted by `predicate`
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&T) -> bool,
    {
        Filter {
            generator: self,
            predicate,
        }
    }

    /// Keep only values accepted by a predicate that may abort sampling
    fn try_filter<F>(self, predicate: F) -> TryFilter<Self, F>
    where
        F: Fn(&T) -> Result<bool, SampleError>,
    {
        TryFilter {
            generator: self,
            predicate,
        }
    }

    /// Erase the concrete generator type
    fn boxed(self) -> BoxedGenerator<T>
    where
        Self: Send + Sync + 'static,
    {
        BoxedGenerator::new(self)
    }
}

impl<T, G: Generator<T>> GeneratorExt<T> for G {}

/// A generator that maps values from one type to another
pub struct Map<G, F, T> {
    generator: G,
    mapper: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<G, F, T, U> Generator<U> for Map<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> U,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<U, SampleError> {
        let value = self.generator.generate(rng, config)?;
        Ok((self.mapper)(value))
    }
}

/// A generator whose mapper may fail
pub struct TryMap<G, F, T> {
    generator: G,
    mapper: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<G, F, T, U> Generator<U> for TryMap<G, F, T>
where
    G: Generator<T>,
    F: Fn(T) -> Result<U, SampleError>,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<U, SampleError> {
        let value = self.generator.generate(rng, config)?;
        (self.mapper)(value)
    }
}

/// A generator that filters values based on a predicate
pub struct Filter<G, F> {
    generator: G,
    predicate: F,
}

impl<G, F, T> Generator<T> for Filter<G, F>
where
    G: Generator<T>,
    F: Fn(&T) -> bool,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        for _ in 0..config.max_filter_attempts {
            let value = self.generator.generate(rng, config)?;
            if (self.predicate)(&value) {
                return Ok(value);
            }
        }
        Err(SampleError::FilterExhausted {
            attempts: config.max_filter_attempts,
        })
    }
}

/// A generator that filters values with a fallible predicate
///
/// An `Err` from the predicate stops sampling immediately and is returned to
/// the caller unchanged.
pub struct TryFilter<G, F> {
    generator: G,
    predicate: F,
}

impl<G, F, T> Generator<T> for TryFilter<G, F>
where
    G: Generator<T>,
    F: Fn(&T) -> Result<bool, SampleError>,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        for _ in 0..config.max_filter_attempts {
            let value = self.generator.generate(rng, config)?;
            if (self.predicate)(&value)? {
                return Ok(value);
            }
        }
        Err(SampleError::FilterExhausted {
            attempts: config.max_filter_attempts,
        })
    }
}

/// Uniform choice among several generators
pub struct Choose<T> {
    options: Vec<BoxedGenerator<T>>,
}

impl<T> Generator<T> for Choose<T>
where
    T: 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        let index = rng.gen_range(0..self.options.len());
        self.options[index].generate(rng, config)
    }
}

/// Create a generator that picks one of `options` uniformly, then samples it
///
/// The order of `options` is kept so that a given seed always selects the
/// same branch.
///
/// # Panics
///
/// Panics if `options` is empty.
pub fn choose<T: 'static>(options: Vec<BoxedGenerator<T>>) -> BoxedGenerator<T> {
    if options.is_empty() {
        panic!("choose requires at least one generator");
    }
    BoxedGenerator::new(Choose { options })
}

/// Weighted choice among several generators
pub struct Weighted<T> {
    choices: Vec<(u32, BoxedGenerator<T>)>,
    total_weight: u32,
}

impl<T> Generator<T> for Weighted<T>
where
    T: 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        let mut roll = rng.gen_range(0..self.total_weight);
        for (weight, generator) in &self.choices {
            if roll < *weight {
                return generator.generate(rng, config);
            }
            roll -= weight;
        }
        // Unreachable while the weights sum to `total_weight`
        self.choices[self.choices.len() - 1].1.generate(rng, config)
    }
}

/// Create a generator that picks a branch with probability proportional to its weight
///
/// # Panics
///
/// Panics if `choices` is empty or every weight is zero.
pub fn weighted<T: 'static>(choices: Vec<(u32, BoxedGenerator<T>)>) -> BoxedGenerator<T> {
    let total_weight: u32 = choices.iter().map(|(weight, _)| weight).sum();
    if total_weight == 0 {
        panic!("weighted requires at least one choice with a positive weight");
    }
    BoxedGenerator::new(Weighted {
        choices,
        total_weight,
    })
}

/// Fixed-arity composition: one value per generator, in order
pub struct Sequence<T> {
    generators: Vec<BoxedGenerator<T>>,
}

impl<T> Generator<Vec<T>> for Sequence<T>
where
    T: 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<Vec<T>, SampleError> {
        self.generators
            .iter()
            .map(|generator| generator.generate(rng, config))
            .collect()
    }
}

/// Create a generator producing one value from each generator, in order
pub fn sequence<T: 'static>(generators: Vec<BoxedGenerator<T>>) -> BoxedGenerator<Vec<T>> {
    BoxedGenerator::new(Sequence { generators })
}

/// Pick a collection length in `[min, max]`, or `[min, min + size_hint]` when open
fn pick_length(
    rng: &mut dyn rand::RngCore,
    config: &GeneratorConfig,
    min: usize,
    max: Option<usize>,
) -> usize {
    let max = max.unwrap_or(min + config.size_hint);
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Generator for variable-length vectors
pub struct VecOf<T> {
    element_generator: BoxedGenerator<T>,
    min_length: usize,
    max_length: Option<usize>,
}

impl<T> Generator<Vec<T>> for VecOf<T>
where
    T: Clone + 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<Vec<T>, SampleError> {
        let length = pick_length(rng, config, self.min_length, self.max_length);
        (0..length)
            .map(|_| self.element_generator.generate(rng, config))
            .collect()
    }
}

/// Create a generator for vectors whose length lies in `[min_length, max_length]`
pub fn vec_of<T: Clone + 'static>(
    element_generator: BoxedGenerator<T>,
    min_length: usize,
    max_length: Option<usize>,
) -> BoxedGenerator<Vec<T>> {
    BoxedGenerator::new(VecOf {
        element_generator,
        min_length,
        max_length,
    })
}

/// Equality used to decide whether two elements collide
pub type Equality<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Generator for vectors with unique elements (no duplicates)
///
/// Uniqueness is enforced while generating: colliding candidates are dropped
/// and redrawn. When the element space is too small to reach the minimum
/// length the generator fails instead of returning a short vector.
pub struct UniqueVecOf<T> {
    element_generator: BoxedGenerator<T>,
    min_length: usize,
    max_length: Option<usize>,
    equality: Equality<T>,
}

impl<T> Generator<Vec<T>> for UniqueVecOf<T>
where
    T: Clone + 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<Vec<T>, SampleError> {
        let target_length = pick_length(rng, config, self.min_length, self.max_length);
        let mut values: Vec<T> = Vec::with_capacity(target_length);

        let max_attempts = target_length * 10 + 10;
        let mut attempts = 0;

        while values.len() < target_length && attempts < max_attempts {
            let candidate = self.element_generator.generate(rng, config)?;
            if !values
                .iter()
                .any(|existing| (self.equality)(existing, &candidate))
            {
                values.push(candidate);
            }
            attempts += 1;
        }

        if values.len() < self.min_length {
            return Err(SampleError::UniqueExhausted {
                wanted: self.min_length,
                produced: values.len(),
            });
        }
        Ok(values)
    }
}

/// Create a generator for vectors whose elements are pairwise distinct under `equality`
pub fn unique_vec_of<T, E>(
    element_generator: BoxedGenerator<T>,
    min_length: usize,
    max_length: Option<usize>,
    equality: E,
) -> BoxedGenerator<Vec<T>>
where
    T: Clone + 'static,
    E: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    BoxedGenerator::new(UniqueVecOf {
        element_generator,
        min_length,
        max_length,
        equality: Arc::new(equality),
    })
}
