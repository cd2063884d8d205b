//! Array, tuple, set and map strategies.

use shapegen_sampler::{
    BoxedGenerator, Generator, GeneratorExt, SampleError, from_fn, sequence, unique_vec_of, vec_of,
};
use shapegen_schema::{Action, Schema, Validation, Value};

use super::{guard_if_needed, validation_tags};
use crate::builder::Context;
use crate::error::Error;
use crate::path;

/// Which family of validations sizes the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Measure {
    /// `min_length`, `max_length`, `length`, `non_empty`
    Length,
    /// `min_size`, `max_size`, `size`
    Size,
}

/// Collection size constraints resolved from a pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SizeBounds {
    pub min: usize,
    pub max: Option<usize>,
    pub unrecognized: Vec<String>,
}

impl SizeBounds {
    pub fn from_pipeline(actions: &[Action], measure: Measure) -> Self {
        actions
            .iter()
            .fold(Self::default(), |bounds, action| bounds.apply(action, measure))
    }

    fn apply(mut self, action: &Action, measure: Measure) -> Self {
        match (measure, action.as_validation()) {
            (Measure::Length, Some(Validation::MinLength(n)))
            | (Measure::Size, Some(Validation::MinSize(n))) => self.min = self.min.max(*n),
            (Measure::Length, Some(Validation::MaxLength(n)))
            | (Measure::Size, Some(Validation::MaxSize(n))) => self.cap(*n),
            (Measure::Length, Some(Validation::Length(n)))
            | (Measure::Size, Some(Validation::Size(n))) => {
                self.min = self.min.max(*n);
                self.cap(*n);
            }
            (Measure::Length, Some(Validation::NonEmpty)) => self.min = self.min.max(1),
            _ => self.unrecognized.push(action.type_tag().to_string()),
        }
        self
    }

    fn cap(&mut self, n: usize) {
        self.max = Some(self.max.map_or(n, |max| max.min(n)));
    }

    /// True if the pipeline sized the collection at all
    pub fn declared(&self) -> bool {
        self.min > 0 || self.max.is_some()
    }

    /// Inclusive size range; an undeclared maximum is `default_max`, widened to the minimum
    pub fn range(&self, default_max: usize) -> Option<(usize, usize)> {
        let max = self.max.unwrap_or(default_max.max(self.min));
        (self.min <= max).then_some((self.min, max))
    }

    fn reasons(&self) -> Vec<String> {
        self.unrecognized
            .iter()
            .map(|tag| format!("unrecognized constraint {}", tag))
            .collect()
    }
}

/// Resolve the size range, recording a reason when it is empty
fn size_range(
    bounds: &SizeBounds,
    default_max: usize,
    reasons: &mut Vec<String>,
) -> (usize, usize) {
    bounds.range(default_max).unwrap_or_else(|| {
        reasons.push("size bounds admit no collection".to_string());
        (bounds.min, bounds.min)
    })
}

pub(crate) fn array(
    schema: &Schema,
    item: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let items = cx.recurse(item, &path::item(at))?;
    let bounds = SizeBounds::from_pipeline(schema.pipeline(), Measure::Length);
    let mut reasons = bounds.reasons();
    let (min, max) = size_range(&bounds, cx.config().array_max_length, &mut reasons);

    let generator = vec_of(items, min, Some(max)).map(Value::Array).boxed();
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}

pub(crate) fn tuple(
    schema: &Schema,
    positions: &[Schema],
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let generators = positions
        .iter()
        .enumerate()
        .map(|(i, position)| cx.recurse(position, &path::index(at, i)))
        .collect::<Result<Vec<_>, Error>>()?;

    let generator = sequence(generators).map(Value::Array).boxed();
    Ok(guard_if_needed(
        generator,
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}

pub(crate) fn set(
    schema: &Schema,
    item: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let members = cx.recurse(item, &path::item(at))?;
    let bounds = SizeBounds::from_pipeline(schema.pipeline(), Measure::Size);
    let mut reasons = bounds.reasons();
    let (min, max) = size_range(&bounds, cx.config().array_max_length, &mut reasons);

    let generator = unique_vec_of(members, min, Some(max), |a: &Value, b: &Value| a == b)
        .map(Value::Set)
        .boxed();
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}

pub(crate) fn map(
    schema: &Schema,
    key: &Schema,
    value: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let keys = cx.recurse(key, &path::key(at))?;
    let values = cx.recurse(value, &path::value(at))?;
    let bounds = SizeBounds::from_pipeline(schema.pipeline(), Measure::Size);
    let mut reasons = bounds.reasons();
    let (min, max) = size_range(&bounds, cx.config().array_max_length, &mut reasons);

    // Distinct keys keep the folded size equal to the drawn size
    let keys = if bounds.declared() {
        unique_vec_of(keys, min, Some(max), |a: &Value, b: &Value| a == b)
    } else {
        vec_of(keys, min, Some(max))
    };

    let generator = from_fn(move |rng, config| {
        let mut entries = Vec::new();
        for key in keys.generate(rng, config)? {
            let value = values.generate(rng, config)?;
            entries.push((key, value));
        }
        Ok::<Value, SampleError>(Value::map(entries))
    });
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}
