//! Constraint pipelines: validations and transformations attached to a schema.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::value::Value;

/// Predicate used by `check` validations and `custom` schemas
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Mapping used by `transform` transformations
pub type Mapper = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// One step of a schema's pipeline
#[derive(Clone)]
pub enum Action {
    Validation(Validation),
    Transformation(Transformation),
}

impl Action {
    /// `"validation"` or `"transformation"`
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Validation(_) => "validation",
            Action::Transformation(_) => "transformation",
        }
    }

    pub fn type_tag(&self) -> &str {
        match self {
            Action::Validation(validation) => validation.type_tag(),
            Action::Transformation(transformation) => transformation.type_tag(),
        }
    }

    pub fn as_validation(&self) -> Option<&Validation> {
        match self {
            Action::Validation(validation) => Some(validation),
            Action::Transformation(_) => None,
        }
    }

    pub fn as_transformation(&self) -> Option<&Transformation> {
        match self {
            Action::Validation(_) => None,
            Action::Transformation(transformation) => Some(transformation),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Validation(validation) => validation.fmt(f),
            Action::Transformation(transformation) => transformation.fmt(f),
        }
    }
}

/// A check on the current value that does not change it
#[derive(Clone)]
pub enum Validation {
    MinLength(usize),
    MaxLength(usize),
    Length(usize),
    NonEmpty,
    MinSize(usize),
    MaxSize(usize),
    Size(usize),
    StartsWith(String),
    EndsWith(String),
    Includes(String),
    Regex(Regex),
    Email,
    Url,
    Uuid,
    MinValue(Value),
    MaxValue(Value),
    GtValue(Value),
    LtValue(Value),
    Value(Value),
    Values(Vec<Value>),
    NotValue(Value),
    NotValues(Vec<Value>),
    MultipleOf(f64),
    Integer,
    SafeInteger,
    Finite,
    Check { name: String, predicate: Predicate },
}

impl Validation {
    pub fn type_tag(&self) -> &str {
        match self {
            Validation::MinLength(_) => "min_length",
            Validation::MaxLength(_) => "max_length",
            Validation::Length(_) => "length",
            Validation::NonEmpty => "non_empty",
            Validation::MinSize(_) => "min_size",
            Validation::MaxSize(_) => "max_size",
            Validation::Size(_) => "size",
            Validation::StartsWith(_) => "starts_with",
            Validation::EndsWith(_) => "ends_with",
            Validation::Includes(_) => "includes",
            Validation::Regex(_) => "regex",
            Validation::Email => "email",
            Validation::Url => "url",
            Validation::Uuid => "uuid",
            Validation::MinValue(_) => "min_value",
            Validation::MaxValue(_) => "max_value",
            Validation::GtValue(_) => "gt_value",
            Validation::LtValue(_) => "lt_value",
            Validation::Value(_) => "value",
            Validation::Values(_) => "values",
            Validation::NotValue(_) => "not_value",
            Validation::NotValues(_) => "not_values",
            Validation::MultipleOf(_) => "multiple_of",
            Validation::Integer => "integer",
            Validation::SafeInteger => "safe_integer",
            Validation::Finite => "finite",
            Validation::Check { .. } => "check",
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::MinLength(n)
            | Validation::MaxLength(n)
            | Validation::Length(n)
            | Validation::MinSize(n)
            | Validation::MaxSize(n)
            | Validation::Size(n) => write!(f, "{}({})", self.type_tag(), n),
            Validation::StartsWith(s) | Validation::EndsWith(s) | Validation::Includes(s) => {
                write!(f, "{}({:?})", self.type_tag(), s)
            }
            Validation::Regex(pattern) => write!(f, "regex(/{}/)", pattern.as_str()),
            Validation::MinValue(v)
            | Validation::MaxValue(v)
            | Validation::GtValue(v)
            | Validation::LtValue(v)
            | Validation::Value(v)
            | Validation::NotValue(v) => write!(f, "{}({})", self.type_tag(), v),
            Validation::Values(vs) | Validation::NotValues(vs) => {
                write!(f, "{}({})", self.type_tag(), Value::Array(vs.clone()))
            }
            Validation::MultipleOf(factor) => write!(f, "multiple_of({})", factor),
            Validation::Check { name, .. } => write!(f, "check({})", name),
            _ => f.write_str(self.type_tag()),
        }
    }
}

/// A step that replaces the current value
#[derive(Clone)]
pub enum Transformation {
    Trim,
    TrimStart,
    TrimEnd,
    ToLowerCase,
    ToUpperCase,
    Transform { name: String, mapper: Mapper },
}

impl Transformation {
    pub fn type_tag(&self) -> &str {
        match self {
            Transformation::Trim => "trim",
            Transformation::TrimStart => "trim_start",
            Transformation::TrimEnd => "trim_end",
            Transformation::ToLowerCase => "to_lower_case",
            Transformation::ToUpperCase => "to_upper_case",
            Transformation::Transform { .. } => "transform",
        }
    }

    /// True for the trim family, which only strips edge whitespace
    pub fn is_trim(&self) -> bool {
        matches!(
            self,
            Transformation::Trim | Transformation::TrimStart | Transformation::TrimEnd
        )
    }

    /// Apply the transformation; string transformations leave other values untouched
    pub fn apply(&self, value: Value) -> Value {
        match (self, value) {
            (Transformation::Transform { mapper, .. }, value) => mapper(value),
            (Transformation::Trim, Value::String(s)) => Value::String(s.trim().to_string()),
            (Transformation::TrimStart, Value::String(s)) => {
                Value::String(s.trim_start().to_string())
            }
            (Transformation::TrimEnd, Value::String(s)) => Value::String(s.trim_end().to_string()),
            (Transformation::ToLowerCase, Value::String(s)) => Value::String(s.to_lowercase()),
            (Transformation::ToUpperCase, Value::String(s)) => Value::String(s.to_uppercase()),
            (_, value) => value,
        }
    }
}

impl fmt::Debug for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformation::Transform { name, .. } => write!(f, "transform({})", name),
            _ => f.write_str(self.type_tag()),
        }
    }
}

// Constructors, named after the constraint they build

pub fn min_length(n: usize) -> Action {
    Action::Validation(Validation::MinLength(n))
}

pub fn max_length(n: usize) -> Action {
    Action::Validation(Validation::MaxLength(n))
}

pub fn length(n: usize) -> Action {
    Action::Validation(Validation::Length(n))
}

pub fn non_empty() -> Action {
    Action::Validation(Validation::NonEmpty)
}

pub fn min_size(n: usize) -> Action {
    Action::Validation(Validation::MinSize(n))
}

pub fn max_size(n: usize) -> Action {
    Action::Validation(Validation::MaxSize(n))
}

pub fn size(n: usize) -> Action {
    Action::Validation(Validation::Size(n))
}

pub fn starts_with(prefix: impl Into<String>) -> Action {
    Action::Validation(Validation::StartsWith(prefix.into()))
}

pub fn ends_with(suffix: impl Into<String>) -> Action {
    Action::Validation(Validation::EndsWith(suffix.into()))
}

pub fn includes(needle: impl Into<String>) -> Action {
    Action::Validation(Validation::Includes(needle.into()))
}

pub fn regex(pattern: Regex) -> Action {
    Action::Validation(Validation::Regex(pattern))
}

pub fn email() -> Action {
    Action::Validation(Validation::Email)
}

pub fn url() -> Action {
    Action::Validation(Validation::Url)
}

pub fn uuid() -> Action {
    Action::Validation(Validation::Uuid)
}

pub fn min_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::MinValue(requirement.into()))
}

pub fn max_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::MaxValue(requirement.into()))
}

pub fn gt_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::GtValue(requirement.into()))
}

pub fn lt_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::LtValue(requirement.into()))
}

pub fn value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::Value(requirement.into()))
}

pub fn values<V, I>(requirements: I) -> Action
where
    V: Into<Value>,
    I: IntoIterator<Item = V>,
{
    Action::Validation(Validation::Values(
        requirements.into_iter().map(Into::into).collect(),
    ))
}

pub fn not_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(Validation::NotValue(requirement.into()))
}

pub fn not_values<V, I>(requirements: I) -> Action
where
    V: Into<Value>,
    I: IntoIterator<Item = V>,
{
    Action::Validation(Validation::NotValues(
        requirements.into_iter().map(Into::into).collect(),
    ))
}

pub fn multiple_of(factor: f64) -> Action {
    Action::Validation(Validation::MultipleOf(factor))
}

pub fn integer() -> Action {
    Action::Validation(Validation::Integer)
}

pub fn safe_integer() -> Action {
    Action::Validation(Validation::SafeInteger)
}

pub fn finite() -> Action {
    Action::Validation(Validation::Finite)
}

/// A named custom predicate
pub fn check<F>(name: impl Into<String>, predicate: F) -> Action
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Action::Validation(Validation::Check {
        name: name.into(),
        predicate: Arc::new(predicate),
    })
}

pub fn trim() -> Action {
    Action::Transformation(Transformation::Trim)
}

pub fn trim_start() -> Action {
    Action::Transformation(Transformation::TrimStart)
}

pub fn trim_end() -> Action {
    Action::Transformation(Transformation::TrimEnd)
}

pub fn to_lower_case() -> Action {
    Action::Transformation(Transformation::ToLowerCase)
}

pub fn to_upper_case() -> Action {
    Action::Transformation(Transformation::ToUpperCase)
}

/// A named custom mapping
pub fn transform<F>(name: impl Into<String>, mapper: F) -> Action
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    Action::Transformation(Transformation::Transform {
        name: name.into(),
        mapper: Arc::new(mapper),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_tags() {
        assert_eq!(min_length(3).kind(), "validation");
        assert_eq!(min_length(3).type_tag(), "min_length");
        assert_eq!(trim().kind(), "transformation");
        assert_eq!(trim().type_tag(), "trim");
        assert_eq!(check("even", |_| true).type_tag(), "check");
        assert_eq!(gt_value(5).type_tag(), "gt_value");
    }

    #[test]
    fn test_string_transformations() {
        let input = Value::from("  Hello ");
        assert_eq!(
            Transformation::Trim.apply(input.clone()),
            Value::from("Hello")
        );
        assert_eq!(
            Transformation::TrimStart.apply(input.clone()),
            Value::from("Hello ")
        );
        assert_eq!(
            Transformation::TrimEnd.apply(input.clone()),
            Value::from("  Hello")
        );
        assert_eq!(
            Transformation::ToUpperCase.apply(input),
            Value::from("  HELLO ")
        );
    }

    #[test]
    fn test_string_transformations_ignore_other_values() {
        assert_eq!(Transformation::Trim.apply(Value::from(4)), Value::from(4));
    }

    #[test]
    fn test_custom_transform() {
        let action = transform("double", |v| match v {
            Value::Number(n) => Value::Number(n * 2.0),
            other => other,
        });
        let transformation = action.as_transformation().unwrap();
        assert_eq!(transformation.apply(Value::from(21)), Value::from(42));
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", min_length(2)), "min_length(2)");
        assert_eq!(format!("{:?}", starts_with("ab")), "starts_with(\"ab\")");
        assert_eq!(format!("{:?}", email()), "email");
        assert_eq!(format!("{:?}", to_lower_case()), "to_lower_case");
    }
}
