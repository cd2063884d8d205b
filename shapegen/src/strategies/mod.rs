//! Per-kind generation strategies.
//!
//! Scalar strategies fold the schema's pipeline into a resolved bounds record
//! and derive a closed-form generator from it. Anything a record cannot
//! express is handed to the fallback filter through [`Context::guard`].

pub(crate) mod bigint;
pub(crate) mod boolean;
pub(crate) mod collections;
pub(crate) mod date;
pub(crate) mod dynamic;
pub(crate) mod number;
pub(crate) mod object;
pub(crate) mod string;
pub(crate) mod wrappers;

use shapegen_sampler::{BoxedGenerator, constant, one_of};
use shapegen_schema::{Action, Schema, Value, is_valid};

use crate::builder::Context;

/// An inclusive or strict bound on an ordered domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bound<T> {
    pub value: T,
    pub strict: bool,
}

impl<T: PartialOrd + Copy> Bound<T> {
    pub fn inclusive(value: T) -> Self {
        Self {
            value,
            strict: false,
        }
    }

    pub fn strict(value: T) -> Self {
        Self {
            value,
            strict: true,
        }
    }

    /// The tighter of two lower bounds
    pub fn max_lower(current: Option<Self>, next: Self) -> Option<Self> {
        match current {
            Some(current)
                if current.value > next.value
                    || (current.value == next.value && current.strict) =>
            {
                Some(current)
            }
            _ => Some(next),
        }
    }

    /// The tighter of two upper bounds
    pub fn min_upper(current: Option<Self>, next: Self) -> Option<Self> {
        match current {
            Some(current)
                if current.value < next.value
                    || (current.value == next.value && current.strict) =>
            {
                Some(current)
            }
            _ => Some(next),
        }
    }
}

/// Keep `choices` to the members also in `allowed`; the first restriction sets them
pub(crate) fn restrict_choices(choices: &mut Option<Vec<Value>>, allowed: &[Value]) {
    match choices {
        Some(current) => current.retain(|value| allowed.contains(value)),
        None => *choices = Some(allowed.to_vec()),
    }
}

/// Uniform choice over the candidates the schema accepts
///
/// Candidates are checked once, here. When none passes, the choice is
/// handed to the fallback filter so that sampling fails loudly.
pub(crate) fn choice(
    schema: &Schema,
    candidates: Vec<Value>,
    at: &str,
    cx: &Context<'_>,
) -> BoxedGenerator<Value> {
    let accepted: Vec<Value> = candidates
        .iter()
        .filter(|candidate| is_valid(schema, candidate))
        .cloned()
        .collect();
    match accepted.len() {
        0 => {
            let fallback = if candidates.is_empty() {
                constant(Value::Undefined)
            } else {
                one_of(candidates)
            };
            cx.guard(
                fallback,
                schema,
                at,
                &["no candidate value satisfies the schema".to_string()],
            )
        }
        1 => constant(accepted[0].clone()),
        _ => one_of(accepted),
    }
}

/// Tags of every validation in the pipeline, for composites that handle none of them
pub(crate) fn validation_tags(schema: &Schema) -> Vec<String> {
    schema
        .pipeline()
        .iter()
        .filter_map(Action::as_validation)
        .map(|validation| format!("unhandled constraint {}", validation.type_tag()))
        .collect()
}

/// Guard `generator` when there are reasons to, otherwise return it as is
pub(crate) fn guard_if_needed(
    generator: BoxedGenerator<Value>,
    schema: &Schema,
    at: &str,
    reasons: &[String],
    cx: &Context<'_>,
) -> BoxedGenerator<Value> {
    if reasons.is_empty() {
        generator
    } else {
        cx.guard(generator, schema, at, reasons)
    }
}
