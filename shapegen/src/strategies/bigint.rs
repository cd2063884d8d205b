//! BigInt strategy.

use shapegen_sampler::{BoxedGenerator, GeneratorExt, IntGenerator, constant};
use shapegen_schema::{Action, Schema, Validation, Value};

use super::{choice, guard_if_needed, restrict_choices};
use crate::builder::Context;
use crate::error::Error;

/// BigInt constraints resolved from a pipeline; bounds are inclusive
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BigIntBounds {
    pub lower: Option<i128>,
    pub upper: Option<i128>,
    /// A strict bound sits at the edge of the `i128` range
    pub unsatisfiable: bool,
    pub choices: Option<Vec<Value>>,
    pub unrecognized: Vec<String>,
}

impl BigIntBounds {
    pub fn from_pipeline(actions: &[Action]) -> Self {
        actions.iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, action: &Action) -> Self {
        let Action::Validation(validation) = action else {
            self.unrecognized.push(action.type_tag().to_string());
            return self;
        };
        match validation {
            Validation::MinValue(Value::BigInt(n)) => self.raise_lower(Some(*n)),
            Validation::GtValue(Value::BigInt(n)) => self.raise_lower(n.checked_add(1)),
            Validation::MaxValue(Value::BigInt(n)) => self.lower_upper(Some(*n)),
            Validation::LtValue(Value::BigInt(n)) => self.lower_upper(n.checked_sub(1)),
            Validation::Value(value) => {
                restrict_choices(&mut self.choices, std::slice::from_ref(value))
            }
            Validation::Values(values) => restrict_choices(&mut self.choices, values),
            other => self.unrecognized.push(other.type_tag().to_string()),
        }
        self
    }

    fn raise_lower(&mut self, bound: Option<i128>) {
        match bound {
            Some(n) => self.lower = Some(self.lower.map_or(n, |current| current.max(n))),
            None => self.unsatisfiable = true,
        }
    }

    fn lower_upper(&mut self, bound: Option<i128>) {
        match bound {
            Some(n) => self.upper = Some(self.upper.map_or(n, |current| current.min(n))),
            None => self.unsatisfiable = true,
        }
    }

    /// The inclusive sampling range, or `None` when it is empty
    ///
    /// Defaults to the `i64` range; a bound beyond it widens the opposite
    /// default to the `i128` range.
    pub fn range(&self) -> Option<(i128, i128)> {
        if self.unsatisfiable {
            return None;
        }
        let wide_hi = self.lower.is_some_and(|n| n > i64::MAX as i128);
        let wide_lo = self.upper.is_some_and(|n| n < i64::MIN as i128);
        let lo = self.lower.unwrap_or(if wide_lo {
            i128::MIN
        } else {
            i64::MIN as i128
        });
        let hi = self.upper.unwrap_or(if wide_hi {
            i128::MAX
        } else {
            i64::MAX as i128
        });
        (lo <= hi).then_some((lo, hi))
    }
}

pub(crate) fn build(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let bounds = BigIntBounds::from_pipeline(schema.pipeline());
    if let Some(choices) = &bounds.choices {
        return Ok(choice(schema, choices.clone(), at, cx));
    }

    let mut reasons: Vec<String> = bounds
        .unrecognized
        .iter()
        .map(|tag| format!("unrecognized constraint {}", tag))
        .collect();
    let generator = match bounds.range() {
        Some((lo, hi)) => IntGenerator::new(lo, hi).map(Value::BigInt).boxed(),
        None => {
            reasons.push("no bigint satisfies the bounds".to_string());
            constant(Value::BigInt(0))
        }
    };
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}
