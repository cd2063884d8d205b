//! Union, optional, nullable and nullish strategies.

use shapegen_sampler::{BoxedGenerator, choose, constant, weighted};
use shapegen_schema::{Schema, Value};

use super::{guard_if_needed, validation_tags};
use crate::builder::Context;
use crate::error::Error;

pub(crate) fn union(
    schema: &Schema,
    options: &[Schema],
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    if options.is_empty() {
        return Ok(cx.guard(
            constant(Value::Undefined),
            schema,
            at,
            &["union without options".to_string()],
        ));
    }

    let branches = options
        .iter()
        .map(|option| cx.recurse(option, at))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(guard_if_needed(
        choose(branches),
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}

/// The wrapped generator against one or more absent markers, weighted
fn with_absent(
    schema: &Schema,
    wrapped: &Schema,
    present_weight: u32,
    absent: &[Value],
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let mut branches = vec![(present_weight, cx.recurse(wrapped, at)?)];
    branches.extend(absent.iter().map(|marker| (1, constant(marker.clone()))));
    Ok(guard_if_needed(
        weighted(branches),
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}

pub(crate) fn optional(
    schema: &Schema,
    wrapped: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let weight = cx.config().optional_weight;
    with_absent(schema, wrapped, weight, &[Value::Undefined], at, cx)
}

pub(crate) fn nullable(
    schema: &Schema,
    wrapped: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let weight = cx.config().optional_weight;
    with_absent(schema, wrapped, weight, &[Value::Null], at, cx)
}

pub(crate) fn nullish(
    schema: &Schema,
    wrapped: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let weight = cx.config().nullish_weight;
    with_absent(
        schema,
        wrapped,
        weight,
        &[Value::Undefined, Value::Null],
        at,
        cx,
    )
}
