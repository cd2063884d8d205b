//! Generators for primitive values: booleans, numbers, characters, strings and dates.

use chrono::{DateTime, Utc};
use num_traits::{Float, PrimInt};
use rand::Rng;
use rand::distributions::uniform::SampleUniform;

use crate::config::GeneratorConfig;
use crate::error::SampleError;
use crate::generator::Generator;

/// Generator for boolean values
#[derive(Debug, Clone)]
pub struct BoolGenerator;

impl Generator<bool> for BoolGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<bool, SampleError> {
        Ok(rng.gen_bool(0.5))
    }
}

/// Generator for integers in an inclusive range
#[derive(Debug, Clone)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: PrimInt,
{
    /// Create a new integer generator over `[min, max]`
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Create a generator for the full range of the type
    pub fn full_range() -> Self {
        Self::new(T::min_value(), T::max_value())
    }
}

impl<T> Generator<T> for IntGenerator<T>
where
    T: PrimInt + SampleUniform + 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        Ok(rng.gen_range(self.min..=self.max))
    }
}

/// Generator for floating-point values in an inclusive range
#[derive(Debug, Clone)]
pub struct FloatGenerator<T> {
    min: T,
    max: T,
}

impl<T> FloatGenerator<T>
where
    T: Float,
{
    /// Create a new float generator over `[min, max]`; both bounds must be finite
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T> Generator<T> for FloatGenerator<T>
where
    T: Float + SampleUniform + 'static,
{
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<T, SampleError> {
        let two = T::one() + T::one();
        let width = self.max - self.min;
        if width.is_finite() && width < T::max_value() / two {
            return Ok(rng.gen_range(self.min..=self.max));
        }
        // Uniform sampling divides the width by `1 - ε`, which overflows near `MAX`;
        // sample a quarter-scale range and scale back up
        let four = two * two;
        let scaled = rng.gen_range(self.min / four..=self.max / four) * four;
        Ok(scaled.max(self.min).min(self.max))
    }
}

/// Generator for character values
#[derive(Debug, Clone)]
pub struct CharGenerator {
    /// Character ranges to generate from
    ranges: Vec<(char, char)>,
}

impl CharGenerator {
    /// ASCII printable characters plus accented Latin letters
    pub fn printable() -> Self {
        Self {
            ranges: vec![(' ', '~'), (' ', '~'), ('\u{c0}', '\u{17f}')],
        }
    }

    /// Printable characters without any whitespace
    pub fn visible() -> Self {
        Self {
            ranges: vec![('!', '~'), ('!', '~'), ('\u{c0}', '\u{17f}')],
        }
    }

    /// ASCII alphanumeric characters
    pub fn ascii_alphanumeric() -> Self {
        Self {
            ranges: vec![('0', '9'), ('A', 'Z'), ('a', 'z')],
        }
    }
}

impl Generator<char> for CharGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<char, SampleError> {
        if self.ranges.is_empty() {
            return Ok('a');
        }

        let (start, end) = self.ranges[rng.gen_range(0..self.ranges.len())];
        let code = rng.gen_range(start as u32..=end as u32);

        // Ranges never straddle the surrogate block, so this only falls back on misuse
        Ok(char::from_u32(code).unwrap_or(start))
    }
}

/// Generator for string values
///
/// Lengths are counted in `char`s.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    char_generator: CharGenerator,
    min_length: usize,
    max_length: usize,
}

impl StringGenerator {
    /// Create a new string generator with printable characters
    pub fn printable(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::printable(), min_length, max_length)
    }

    /// Create a new string generator with ASCII alphanumeric characters
    pub fn ascii_alphanumeric(min_length: usize, max_length: usize) -> Self {
        Self::with_char_generator(CharGenerator::ascii_alphanumeric(), min_length, max_length)
    }

    /// Create a new string generator with a custom character generator
    pub fn with_char_generator(
        char_generator: CharGenerator,
        min_length: usize,
        max_length: usize,
    ) -> Self {
        Self {
            char_generator,
            min_length,
            max_length,
        }
    }
}

impl Generator<String> for StringGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        config: &GeneratorConfig,
    ) -> Result<String, SampleError> {
        let length = if self.min_length >= self.max_length {
            self.min_length
        } else {
            rng.gen_range(self.min_length..=self.max_length)
        };

        (0..length)
            .map(|_| self.char_generator.generate(rng, config))
            .collect()
    }
}

/// Generator for UTC instants between two epoch-millisecond bounds (inclusive)
#[derive(Debug, Clone)]
pub struct DateGenerator {
    min_millis: i64,
    max_millis: i64,
}

impl DateGenerator {
    /// Earliest instant produced by [`DateGenerator::full_range`]: 0001-01-01T00:00:00Z
    pub const MIN_MILLIS: i64 = -62_135_596_800_000;
    /// Latest instant produced by [`DateGenerator::full_range`]: 9999-12-31T23:59:59.999Z
    pub const MAX_MILLIS: i64 = 253_402_300_799_999;

    /// Create a date generator over `[min_millis, max_millis]`
    pub fn new(min_millis: i64, max_millis: i64) -> Self {
        Self {
            min_millis,
            max_millis,
        }
    }

    /// Dates with four-digit years
    pub fn full_range() -> Self {
        Self::new(Self::MIN_MILLIS, Self::MAX_MILLIS)
    }
}

impl Generator<DateTime<Utc>> for DateGenerator {
    fn generate(
        &self,
        rng: &mut dyn rand::RngCore,
        _config: &GeneratorConfig,
    ) -> Result<DateTime<Utc>, SampleError> {
        let millis = rng.gen_range(self.min_millis..=self.max_millis);
        DateTime::from_timestamp_millis(millis).ok_or_else(|| {
            SampleError::aborted(format!("timestamp {}ms is outside the supported range", millis))
        })
    }
}
