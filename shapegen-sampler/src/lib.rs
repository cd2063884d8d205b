//! # shapegen-sampler - Composable random value generators
//!
//! The sampling layer used by `shapegen`: a [`Generator`] trait whose
//! `generate` can fail, clonable [`BoxedGenerator`] handles, primitive
//! samplers, combinators and generators for common string formats.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapegen_sampler::{Generator, GeneratorConfig, GeneratorExt, IntGenerator};
//! use rand::thread_rng;
//!
//! let generator = IntGenerator::new(1, 100).map(|x| x * 2).filter(|x| x % 3 == 0);
//! let mut rng = thread_rng();
//! let config = GeneratorConfig::default();
//!
//! let value = generator.generate(&mut rng, &config).unwrap();
//! assert!(value % 6 == 0);
//! ```

pub mod combinators;
pub mod config;
pub mod error;
pub mod formats;
pub mod generator;
pub mod primitives;
pub mod rng;

pub use combinators::{
    Equality, GeneratorExt, choose, sequence, unique_vec_of, vec_of, weighted,
};
pub use config::{ConfigError, GeneratorConfig};
pub use error::SampleError;
pub use formats::{EmailGenerator, UrlGenerator, UuidV4Generator};
pub use generator::{
    BoxedGenerator, ConstantGenerator, FnGenerator, Generator, OneOfGenerator, constant, from_fn,
    one_of,
};
pub use primitives::{
    BoolGenerator, CharGenerator, DateGenerator, FloatGenerator, IntGenerator, StringGenerator,
};
pub use rng::{create_rng, create_seeded_rng};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_composition() {
        let generator = sequence(vec![
            constant(42).boxed(),
            IntGenerator::new(1, 10).boxed(),
        ]);
        let mut rng = create_seeded_rng(7);
        let config = GeneratorConfig::default();

        let values = generator.generate(&mut rng, &config).unwrap();
        assert_eq!(values[0], 42);
        assert!((1..=10).contains(&values[1]));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let generator = vec_of(StringGenerator::printable(0, 8).boxed(), 0, Some(5));
        let config = GeneratorConfig::default();

        let first = generator
            .generate(&mut create_seeded_rng(99), &config)
            .unwrap();
        let second = generator
            .generate(&mut create_seeded_rng(99), &config)
            .unwrap();
        assert_eq!(first, second);
    }
}
