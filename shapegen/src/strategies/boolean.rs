//! Boolean strategy.

use shapegen_sampler::{BoolGenerator, BoxedGenerator, GeneratorExt, constant};
use shapegen_schema::{Action, Schema, Validation, Value};

use super::guard_if_needed;
use crate::builder::Context;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BooleanBounds {
    /// Booleans the literal constraints still admit
    pub allowed: Vec<bool>,
    pub unrecognized: Vec<String>,
}

impl Default for BooleanBounds {
    fn default() -> Self {
        Self {
            allowed: vec![false, true],
            unrecognized: Vec::new(),
        }
    }
}

impl BooleanBounds {
    pub fn from_pipeline(actions: &[Action]) -> Self {
        actions.iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, action: &Action) -> Self {
        match action.as_validation() {
            Some(Validation::Value(value)) => self.allowed.retain(|b| Value::Bool(*b) == *value),
            Some(Validation::Values(values)) => {
                self.allowed.retain(|b| values.contains(&Value::Bool(*b)))
            }
            Some(Validation::NotValue(value)) => {
                self.allowed.retain(|b| Value::Bool(*b) != *value)
            }
            Some(Validation::NotValues(values)) => {
                self.allowed.retain(|b| !values.contains(&Value::Bool(*b)))
            }
            _ => self.unrecognized.push(action.type_tag().to_string()),
        }
        self
    }
}

pub(crate) fn build(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let bounds = BooleanBounds::from_pipeline(schema.pipeline());
    let mut reasons: Vec<String> = bounds
        .unrecognized
        .iter()
        .map(|tag| format!("unrecognized constraint {}", tag))
        .collect();

    let generator = match bounds.allowed.as_slice() {
        [only] => constant(Value::Bool(*only)),
        [] => {
            reasons.push("no boolean satisfies the constraints".to_string());
            BoolGenerator.map(Value::Bool).boxed()
        }
        _ => BoolGenerator.map(Value::Bool).boxed(),
    };
    Ok(guard_if_needed(generator, schema, at, &reasons, cx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_schema::{not_value, trim, value, values};

    #[test]
    fn test_unconstrained() {
        assert_eq!(BooleanBounds::from_pipeline(&[]).allowed, vec![false, true]);
    }

    #[test]
    fn test_literal_constraints() {
        assert_eq!(
            BooleanBounds::from_pipeline(&[value(true)]).allowed,
            vec![true]
        );
        assert_eq!(
            BooleanBounds::from_pipeline(&[not_value(true)]).allowed,
            vec![false]
        );
        assert_eq!(
            BooleanBounds::from_pipeline(&[values([true, false]), not_value(false)]).allowed,
            vec![true]
        );
        assert!(
            BooleanBounds::from_pipeline(&[value(true), value(false)])
                .allowed
                .is_empty()
        );
    }

    #[test]
    fn test_other_actions_are_unrecognized() {
        let bounds = BooleanBounds::from_pipeline(&[trim()]);
        assert_eq!(bounds.unrecognized, vec!["trim".to_string()]);
    }
}
