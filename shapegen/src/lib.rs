//! # shapegen - Schema-driven value generators for property-based testing
//!
//! `shapegen` compiles a schema from [`shapegen_schema`] into a
//! [`BoxedGenerator`] of [`Value`]s the schema accepts. Constraint pipelines
//! are folded into closed-form samplers wherever possible; constraints that
//! cannot be expressed that way are enforced by a fallback filter that fails
//! loudly when it rejects almost everything.
//!
//! ## Quick Start
//!
//! ```rust
//! use shapegen::{SchemaGen, samples};
//! use shapegen_sampler::{GeneratorConfig, create_seeded_rng};
//! use shapegen_schema::{array, email, is_valid, max_length, number, object, optional, string};
//! use shapegen_schema::{integer, min_value};
//!
//! let schema = object([
//!     ("email", string().pipe([email()])),
//!     ("nickname", optional(string().pipe([max_length(12)]))),
//!     ("scores", array(number().pipe([integer(), min_value(0)]))),
//! ]);
//!
//! let generator = SchemaGen::new().input_of(&schema).unwrap();
//! let mut rng = create_seeded_rng(7);
//! let values = samples(&generator, 50, &mut rng, &GeneratorConfig::default()).unwrap();
//! assert!(values.iter().all(|value| is_valid(&schema, value)));
//! ```
//!
//! ## Overrides
//!
//! When a schema carries a predicate the compiler cannot satisfy efficiently,
//! generation fails with [`Error::GenerationFailure`] naming the path. Register
//! a generator for that schema node with [`SchemaGen::with_override`].

pub mod builder;
pub mod config;
pub mod error;

mod guard;
mod path;
mod strategies;

pub use builder::{Factory, Override, SchemaGen};
pub use config::{BuilderConfig, GuardPolicy};
pub use error::Error;

pub use shapegen_sampler::{BoxedGenerator, Generator, GeneratorConfig};
pub use shapegen_schema::{Schema, Value};

use rand::RngCore;

/// Draw one value, translating sampler errors into [`Error`]
pub fn sample<G>(
    generator: &G,
    rng: &mut dyn RngCore,
    config: &GeneratorConfig,
) -> Result<Value, Error>
where
    G: Generator<Value> + ?Sized,
{
    Ok(generator.generate(rng, config)?)
}

/// Draw `count` values, stopping at the first failure
pub fn samples<G>(
    generator: &G,
    count: usize,
    rng: &mut dyn RngCore,
    config: &GeneratorConfig,
) -> Result<Vec<Value>, Error>
where
    G: Generator<Value> + ?Sized,
{
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(sample(generator, &mut *rng, config)?);
    }
    Ok(values)
}

/// Input generator for `schema` with a default builder
pub fn input_of(schema: &Schema) -> Result<BoxedGenerator<Value>, Error> {
    SchemaGen::new().input_of(schema)
}

/// Output generator for `schema` with a default builder
pub fn output_of(schema: &Schema) -> Result<BoxedGenerator<Value>, Error> {
    SchemaGen::new().output_of(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_sampler::create_seeded_rng;
    use shapegen_schema::{custom, is_valid, literal, object};

    #[test]
    fn test_sample_translates_errors() {
        let generator = input_of(&literal("ok")).unwrap();
        let mut rng = create_seeded_rng(1);
        let value = sample(&generator, &mut rng, &GeneratorConfig::default()).unwrap();
        assert_eq!(value, Value::from("ok"));
    }

    #[test]
    fn test_samples_count() {
        let schema = object([("flag", shapegen_schema::boolean())]);
        let generator = input_of(&schema).unwrap();
        let mut rng = create_seeded_rng(2);
        let values = samples(&generator, 25, &mut rng, &GeneratorConfig::default()).unwrap();
        assert_eq!(values.len(), 25);
        assert!(values.iter().all(|value| is_valid(&schema, value)));
    }

    #[test]
    fn test_unsupported_root() {
        match input_of(&custom("opaque")) {
            Err(Error::UnsupportedSchemaType { type_name, path }) => {
                assert_eq!(type_name, "opaque");
                assert_eq!(path, ".");
            }
            other => panic!("expected UnsupportedSchemaType, got {:?}", other.map(|_| ())),
        }
    }
}
