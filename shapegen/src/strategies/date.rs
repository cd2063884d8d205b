//! Date strategy: bounds in epoch milliseconds.

use chrono::{DateTime, Utc};
use shapegen_sampler::{BoxedGenerator, DateGenerator, GeneratorExt, constant};
use shapegen_schema::{Action, Schema, Validation, Value};

use super::{choice, guard_if_needed, restrict_choices};
use crate::builder::Context;
use crate::error::Error;

/// Epoch milliseconds rounded up, so the result is never before `date`
fn ceil_millis(date: &DateTime<Utc>) -> i64 {
    let millis = date.timestamp_millis();
    if date.timestamp_subsec_nanos() % 1_000_000 == 0 {
        millis
    } else {
        millis.saturating_add(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DateBounds {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
    pub choices: Option<Vec<Value>>,
    pub unrecognized: Vec<String>,
}

impl DateBounds {
    pub fn from_pipeline(actions: &[Action]) -> Self {
        actions.iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, action: &Action) -> Self {
        let Action::Validation(validation) = action else {
            self.unrecognized.push(action.type_tag().to_string());
            return self;
        };
        match validation {
            Validation::MinValue(Value::Date(d)) => self.raise_lower(ceil_millis(d)),
            Validation::GtValue(Value::Date(d)) => {
                self.raise_lower(d.timestamp_millis().saturating_add(1))
            }
            Validation::MaxValue(Value::Date(d)) => self.lower_upper(d.timestamp_millis()),
            Validation::LtValue(Value::Date(d)) => {
                self.lower_upper(d.timestamp_millis().saturating_sub(1))
            }
            Validation::Value(value) => {
                restrict_choices(&mut self.choices, std::slice::from_ref(value))
            }
            Validation::Values(values) => restrict_choices(&mut self.choices, values),
            other => self.unrecognized.push(other.type_tag().to_string()),
        }
        self
    }

    fn raise_lower(&mut self, millis: i64) {
        self.lower = Some(self.lower.map_or(millis, |current| current.max(millis)));
    }

    fn lower_upper(&mut self, millis: i64) {
        self.upper = Some(self.upper.map_or(millis, |current| current.min(millis)));
    }

    /// Inclusive millisecond range, defaulting to years 0001 through 9999
    pub fn range(&self) -> Option<(i64, i64)> {
        let earliest = DateTime::<Utc>::MIN_UTC.timestamp_millis();
        let latest = DateTime::<Utc>::MAX_UTC.timestamp_millis();

        let default_hi = if self.lower.is_some_and(|n| n > DateGenerator::MAX_MILLIS) {
            latest
        } else {
            DateGenerator::MAX_MILLIS
        };
        let default_lo = if self.upper.is_some_and(|n| n < DateGenerator::MIN_MILLIS) {
            earliest
        } else {
            DateGenerator::MIN_MILLIS
        };

        let lo = self.lower.unwrap_or(default_lo).max(earliest);
        let hi = self.upper.unwrap_or(default_hi).min(latest);
        (lo <= hi).then_some((lo, hi))
    }
}

pub(crate) fn build(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let bounds = DateBounds::from_pipeline(schema.pipeline());
    if let Some(choices) = &bounds.choices {
        return Ok(choice(schema, choices.clone(), at, cx));
    }

    let mut reasons: Vec<String> = bounds
        .unrecognized
        .iter()
        .map(|tag| format!("unrecognized constraint {}", tag))
        .collect();
    let generator = match bounds.range() {
        Some((lo, hi)) => DateGenerator::new(lo, hi).map(Value::Date).boxed(),
        None => {
            reasons.push("no date satisfies the bounds".to_string());
            constant(Value::Date(DateTime::<Utc>::MIN_UTC))
        }
    };
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}
