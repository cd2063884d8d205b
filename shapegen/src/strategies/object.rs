//! Object strategy: one generator per declared field.

use std::collections::BTreeMap;

use shapegen_sampler::{BoxedGenerator, Generator, from_fn};
use shapegen_schema::{Schema, Value};

use super::{guard_if_needed, validation_tags};
use crate::builder::Context;
use crate::error::Error;
use crate::path;

pub(crate) fn build(
    schema: &Schema,
    entries: &[(String, Schema)],
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let fields = entries
        .iter()
        .map(|(name, field)| Ok((name.clone(), cx.recurse(field, &path::field(at, name))?)))
        .collect::<Result<Vec<(String, BoxedGenerator<Value>)>, Error>>()?;

    // Absent optional fields are left out rather than stored as undefined
    let generator = from_fn(move |rng, config| {
        let mut object = BTreeMap::new();
        for (name, field) in &fields {
            let value = field.generate(rng, config)?;
            if !value.is_undefined() {
                object.insert(name.clone(), value);
            }
        }
        Ok(Value::Object(object))
    });

    Ok(guard_if_needed(
        generator,
        schema,
        at,
        &validation_tags(schema),
        cx,
    ))
}
