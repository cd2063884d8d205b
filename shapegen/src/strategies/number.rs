//! Number strategy.
//!
//! Bounds fold into [`NumberBounds`], which resolves into a [`NumberPlan`]:
//! the finite domain to sample plus the infinities allowed on either side.

use shapegen_sampler::{BoxedGenerator, FloatGenerator, GeneratorExt, IntGenerator, constant, weighted};
use shapegen_schema::{Action, MAX_SAFE_INTEGER, Schema, Validation, Value};

use super::{Bound, choice, guard_if_needed, restrict_choices};
use crate::builder::Context;
use crate::error::Error;

/// Integral ranges within this magnitude are sampled as `i64`
const I64_SAMPLING_LIMIT: f64 = 4_611_686_018_427_387_904.0;

const FINITE_WEIGHT: u32 = 18;
const INFINITY_WEIGHT: u32 = 1;

/// The next representable float above `x`
pub(crate) fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// The next representable float below `x`
pub(crate) fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

/// Number constraints resolved from a pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NumberBounds {
    pub lower: Option<Bound<f64>>,
    pub upper: Option<Bound<f64>>,
    pub factor: Option<f64>,
    pub integer: bool,
    pub safe_integer: bool,
    pub finite: bool,
    pub choices: Option<Vec<Value>>,
    pub unrecognized: Vec<String>,
}

/// The set of finite values a plan samples from
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NumberDomain {
    Empty,
    Integers { lo: f64, hi: f64 },
    Reals { lo: f64, hi: f64 },
    /// `k * factor` for integral `k` in `[lo, hi]`
    Multiples { factor: f64, lo: f64, hi: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NumberPlan {
    pub domain: NumberDomain,
    pub negative_infinity: bool,
    pub positive_infinity: bool,
    pub reasons: Vec<String>,
}

impl NumberBounds {
    pub fn from_pipeline(actions: &[Action]) -> Self {
        actions.iter().fold(Self::default(), Self::apply)
    }

    fn apply(mut self, action: &Action) -> Self {
        let Action::Validation(validation) = action else {
            self.unrecognized.push(action.type_tag().to_string());
            return self;
        };
        match validation {
            Validation::MinValue(Value::Number(x)) if !x.is_nan() => {
                self.lower = Bound::max_lower(self.lower, Bound::inclusive(*x))
            }
            Validation::GtValue(Value::Number(x)) if !x.is_nan() => {
                self.lower = Bound::max_lower(self.lower, Bound::strict(*x))
            }
            Validation::MaxValue(Value::Number(x)) if !x.is_nan() => {
                self.upper = Bound::min_upper(self.upper, Bound::inclusive(*x))
            }
            Validation::LtValue(Value::Number(x)) if !x.is_nan() => {
                self.upper = Bound::min_upper(self.upper, Bound::strict(*x))
            }
            Validation::MultipleOf(f) if f.is_finite() && *f != 0.0 => {
                self.factor = Some(self.factor.map_or(f.abs(), |current| current * f.abs()))
            }
            Validation::Integer => self.integer = true,
            Validation::SafeInteger => self.safe_integer = true,
            Validation::Finite => self.finite = true,
            Validation::Value(value) => {
                restrict_choices(&mut self.choices, std::slice::from_ref(value))
            }
            Validation::Values(values) => restrict_choices(&mut self.choices, values),
            other => self.unrecognized.push(other.type_tag().to_string()),
        }
        self
    }

    fn integral(&self) -> bool {
        self.integer || self.safe_integer
    }

    pub fn resolve(&self) -> NumberPlan {
        let integral = self.integral();
        let finite_only = self.finite || integral || self.factor.is_some();
        let mut reasons: Vec<String> = self
            .unrecognized
            .iter()
            .map(|tag| format!("unrecognized constraint {}", tag))
            .collect();

        let negative_infinity = !finite_only
            && self
                .lower
                .is_none_or(|b| b.value == f64::NEG_INFINITY && !b.strict);
        let positive_infinity = !finite_only
            && self
                .upper
                .is_none_or(|b| b.value == f64::INFINITY && !b.strict);

        // A bound past the safe range pulls the opposite default out to the float range
        let mut default_lo = -MAX_SAFE_INTEGER;
        let mut default_hi = MAX_SAFE_INTEGER;
        if !self.safe_integer {
            if self.lower.is_some_and(|b| b.value > MAX_SAFE_INTEGER) {
                default_hi = f64::MAX;
            }
            if self.upper.is_some_and(|b| b.value < -MAX_SAFE_INTEGER) {
                default_lo = -f64::MAX;
            }
        }

        let mut lo = lower_edge(self.lower, default_lo, integral).max(-f64::MAX);
        let mut hi = upper_edge(self.upper, default_hi, integral).min(f64::MAX);
        if self.safe_integer {
            lo = lo.max(-MAX_SAFE_INTEGER);
            hi = hi.min(MAX_SAFE_INTEGER);
        }

        let domain = match self.factor {
            _ if lo > hi => NumberDomain::Empty,
            Some(factor) => {
                if factor.fract() != 0.0 {
                    reasons.push(format!("fractional factor {}", factor));
                }
                let k_lo = (lo / factor).ceil();
                let k_hi = (hi / factor).floor();
                if k_lo > k_hi {
                    NumberDomain::Empty
                } else if integral && factor.fract() != 0.0 {
                    NumberDomain::Integers { lo, hi }
                } else {
                    NumberDomain::Multiples {
                        factor,
                        lo: k_lo,
                        hi: k_hi,
                    }
                }
            }
            None if integral => NumberDomain::Integers { lo, hi },
            None => NumberDomain::Reals { lo, hi },
        };

        if domain == NumberDomain::Empty && !negative_infinity && !positive_infinity {
            reasons.push("no number satisfies the bounds".to_string());
        }

        NumberPlan {
            domain,
            negative_infinity,
            positive_infinity,
            reasons,
        }
    }
}

fn lower_edge(bound: Option<Bound<f64>>, default: f64, integral: bool) -> f64 {
    let Some(Bound { value, strict }) = bound else {
        return default;
    };
    match (integral, strict) {
        (true, true) => {
            let candidate = value.floor() + 1.0;
            if candidate > value {
                candidate
            } else {
                next_up(value)
            }
        }
        (true, false) => value.ceil(),
        (false, true) => next_up(value),
        (false, false) => value,
    }
}

fn upper_edge(bound: Option<Bound<f64>>, default: f64, integral: bool) -> f64 {
    let Some(Bound { value, strict }) = bound else {
        return default;
    };
    match (integral, strict) {
        (true, true) => {
            let candidate = value.ceil() - 1.0;
            if candidate < value {
                candidate
            } else {
                next_down(value)
            }
        }
        (true, false) => value.floor(),
        (false, true) => next_down(value),
        (false, false) => value,
    }
}

/// Integral floats in `[lo, hi]`; both ends must be integral
fn integral_values(lo: f64, hi: f64) -> BoxedGenerator<f64> {
    if lo >= -I64_SAMPLING_LIMIT && hi <= I64_SAMPLING_LIMIT {
        IntGenerator::new(lo as i64, hi as i64)
            .map(|n| n as f64)
            .boxed()
    } else {
        FloatGenerator::new(lo, hi)
            .map(move |x: f64| x.round().clamp(lo, hi))
            .boxed()
    }
}

fn domain_generator(domain: &NumberDomain) -> Option<BoxedGenerator<Value>> {
    let generator = match *domain {
        NumberDomain::Empty => return None,
        NumberDomain::Integers { lo, hi } => integral_values(lo, hi).map(Value::Number).boxed(),
        NumberDomain::Reals { lo, hi } => FloatGenerator::new(lo, hi).map(Value::Number).boxed(),
        NumberDomain::Multiples { factor, lo, hi } => integral_values(lo, hi)
            .map(move |k| Value::Number(k * factor))
            .boxed(),
    };
    Some(generator)
}

pub(crate) fn build(
    schema: &Schema,
    at: &str,
    cx: &Context<'_>,
) -> Result<BoxedGenerator<Value>, Error> {
    let bounds = NumberBounds::from_pipeline(schema.pipeline());
    if let Some(choices) = &bounds.choices {
        return Ok(choice(schema, choices.clone(), at, cx));
    }

    let plan = bounds.resolve();
    let mut branches: Vec<(u32, BoxedGenerator<Value>)> = Vec::new();
    if let Some(finite) = domain_generator(&plan.domain) {
        branches.push((FINITE_WEIGHT, finite));
    }
    if plan.negative_infinity {
        branches.push((INFINITY_WEIGHT, constant(Value::Number(f64::NEG_INFINITY))));
    }
    if plan.positive_infinity {
        branches.push((INFINITY_WEIGHT, constant(Value::Number(f64::INFINITY))));
    }

    let generator = match branches.len() {
        0 => constant(Value::Number(0.0)),
        1 => branches.remove(0).1,
        _ => weighted(branches),
    };
    Ok(guard_if_needed(generator, schema, at, &plan.reasons, cx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapegen_schema::{
        finite, gt_value, integer, lt_value, max_value, min_value, multiple_of, safe_integer,
        to_upper_case, values,
    };

    fn resolved(actions: &[Action]) -> NumberPlan {
        NumberBounds::from_pipeline(actions).resolve()
    }

    #[test]
    fn test_next_up_and_down() {
        assert!(next_up(50.0) > 50.0);
        assert!(next_down(50.0) < 50.0);
        assert_eq!(next_up(0.0), f64::from_bits(1));
        assert_eq!(next_up(-0.0), f64::from_bits(1));
        assert_eq!(next_up(f64::NEG_INFINITY), -f64::MAX);
        assert_eq!(next_down(f64::INFINITY), f64::MAX);
        // A fixed epsilon would be absorbed at this magnitude
        assert!(next_up(1e17) > 1e17);
    }

    #[test]
    fn test_inclusive_range() {
        let plan = resolved(&[min_value(10), max_value(90)]);
        assert_eq!(plan.domain, NumberDomain::Reals { lo: 10.0, hi: 90.0 });
        assert!(!plan.negative_infinity && !plan.positive_infinity);
        assert!(plan.reasons.is_empty());
    }

    #[test]
    fn test_strict_real_bound_moves_one_ulp() {
        let plan = resolved(&[gt_value(50)]);
        assert_eq!(
            plan.domain,
            NumberDomain::Reals {
                lo: next_up(50.0),
                hi: MAX_SAFE_INTEGER
            }
        );
        assert!(!plan.negative_infinity);
        assert!(plan.positive_infinity);
    }

    #[test]
    fn test_strict_integer_bounds_move_by_one() {
        let plan = resolved(&[integer(), gt_value(50), lt_value(60)]);
        assert_eq!(plan.domain, NumberDomain::Integers { lo: 51.0, hi: 59.0 });

        let plan = resolved(&[integer(), gt_value(50.5), lt_value(59.5)]);
        assert_eq!(plan.domain, NumberDomain::Integers { lo: 51.0, hi: 59.0 });
    }

    #[test]
    fn test_multiple_of_range() {
        let plan = resolved(&[min_value(67), max_value(99), multiple_of(10.0)]);
        assert_eq!(
            plan.domain,
            NumberDomain::Multiples {
                factor: 10.0,
                lo: 7.0,
                hi: 9.0
            }
        );
        assert!(!plan.negative_infinity && !plan.positive_infinity);
    }

    #[test]
    fn test_factors_multiply() {
        let bounds = NumberBounds::from_pipeline(&[multiple_of(2.0), multiple_of(-3.0)]);
        assert_eq!(bounds.factor, Some(6.0));
    }

    #[test]
    fn test_empty_domains() {
        let plan = resolved(&[min_value(5), max_value(1)]);
        assert_eq!(plan.domain, NumberDomain::Empty);
        assert!(!plan.reasons.is_empty());

        let plan = resolved(&[min_value(61), max_value(69), multiple_of(10.0)]);
        assert_eq!(plan.domain, NumberDomain::Empty);

        let plan = resolved(&[integer(), gt_value(1), lt_value(2)]);
        assert_eq!(plan.domain, NumberDomain::Empty);
    }

    #[test]
    fn test_infinities() {
        let unconstrained = resolved(&[]);
        assert!(unconstrained.negative_infinity && unconstrained.positive_infinity);
        assert_eq!(
            unconstrained.domain,
            NumberDomain::Reals {
                lo: -MAX_SAFE_INTEGER,
                hi: MAX_SAFE_INTEGER
            }
        );

        let plan = resolved(&[finite()]);
        assert!(!plan.negative_infinity && !plan.positive_infinity);

        let plan = resolved(&[max_value(f64::INFINITY)]);
        assert!(plan.positive_infinity);

        let plan = resolved(&[lt_value(f64::INFINITY)]);
        assert!(!plan.positive_infinity);
    }

    #[test]
    fn test_bound_past_safe_range_widens_default() {
        let plan = resolved(&[min_value(1e20)]);
        assert_eq!(plan.domain, NumberDomain::Reals { lo: 1e20, hi: f64::MAX });

        let plan = resolved(&[safe_integer(), min_value(1e20)]);
        assert_eq!(plan.domain, NumberDomain::Empty);
    }

    #[test]
    fn test_integer_with_fractional_factor_is_guarded() {
        let plan = resolved(&[integer(), multiple_of(0.5), min_value(0), max_value(10)]);
        assert_eq!(plan.domain, NumberDomain::Integers { lo: 0.0, hi: 10.0 });
        assert!(!plan.reasons.is_empty());
    }

    #[test]
    fn test_non_numeric_requirements_are_unrecognized() {
        let bounds = NumberBounds::from_pipeline(&[min_value("a"), to_upper_case()]);
        assert_eq!(bounds.lower, None);
        assert_eq!(
            bounds.unrecognized,
            vec!["min_value".to_string(), "to_upper_case".to_string()]
        );
    }

    #[test]
    fn test_choices() {
        let bounds = NumberBounds::from_pipeline(&[values([10, 20, 30])]);
        assert_eq!(
            bounds.choices,
            Some(vec![Value::from(10), Value::from(20), Value::from(30)])
        );
    }
}
