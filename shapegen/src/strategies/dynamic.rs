//! Strategies for any, unknown, function and symbol schemas.

use shapegen_sampler::{
    BoolGenerator, BoxedGenerator, FloatGenerator, Generator, GeneratorExt, IntGenerator,
    StringGenerator, constant, from_fn, weighted,
};
use shapegen_schema::{FunctionValue, Schema, SymbolValue, Value};

use super::{guard_if_needed, validation_tags};
use crate::builder::Context;
use crate::error::Error;

/// A broad mix of absent markers, booleans, numbers and strings
pub(crate) fn loose_values() -> BoxedGenerator<Value> {
    weighted(vec![
        (1, constant(Value::Undefined)),
        (1, constant(Value::Null)),
        (2, BoolGenerator.map(Value::Bool).boxed()),
        (
            3,
            IntGenerator::new(-1000i64, 1000)
                .map(|n| Value::Number(n as f64))
                .boxed(),
        ),
        (2, FloatGenerator::new(-1e6, 1e6).map(Value::Number).boxed()),
        (3, StringGenerator::printable(0, 10).map(Value::String).boxed()),
    ])
}

pub(crate) fn any(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    Ok(guard_if_needed(
        loose_values(),
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}

/// Functions that ignore their arguments and return a value drawn when the function was made
pub(crate) fn function(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let results = loose_values();
    let generator = from_fn(move |rng, config| {
        let result = results.generate(rng, config)?;
        Ok(Value::Function(FunctionValue::new(move |_| result.clone())))
    });
    Ok(guard_if_needed(
        generator,
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}

pub(crate) fn symbol(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let descriptions = StringGenerator::ascii_alphanumeric(1, 8);
    let generator = from_fn(move |rng, config| {
        let description = descriptions.generate(rng, config)?;
        Ok(Value::Symbol(SymbolValue::new(Some(description))))
    });
    Ok(guard_if_needed(
        generator,
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}
