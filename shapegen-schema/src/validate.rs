//! Parsing values against schemas.
//!
//! [`parse`] type-checks a value against the schema kind, then runs the
//! pipeline in order. Validations inspect the current value and
//! transformations replace it, so the output can differ from the input.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::action::{Action, Validation};
use crate::error::{Issue, ValidationError};
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;

/// Largest integer a double represents exactly, 2^53 - 1
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const EMAIL_PATTERN: &str = r"^[\w+-]+(?:\.[\w+-]+)*@[\da-z]+(?:[.-][\da-z]+)*\.[a-z]{2,}$";
const URL_PATTERN: &str = r"^[a-z][a-z0-9+.-]*://[^\s/?#]+(?:[/?#]\S*)?$";
const UUID_PATTERN: &str = r"^[\da-f]{8}(?:-[\da-f]{4}){3}-[\da-f]{12}$";

fn format_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("built-in format pattern is valid")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    format_regex(&EMAIL, EMAIL_PATTERN)
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    format_regex(&URL, URL_PATTERN)
}

fn uuid_regex() -> &'static Regex {
    static UUID: OnceLock<Regex> = OnceLock::new();
    format_regex(&UUID, UUID_PATTERN)
}

/// Parse `input` against `schema`, returning the output value
pub fn parse(schema: &Schema, input: &Value) -> Result<Value, ValidationError> {
    let mut issues = Vec::new();
    match parse_at(schema, input, "", &mut issues) {
        Some(output) if issues.is_empty() => Ok(output),
        _ => Err(ValidationError::new(issues)),
    }
}

/// True if `input` parses against `schema`
pub fn is_valid(schema: &Schema, input: &Value) -> bool {
    parse(schema, input).is_ok()
}

fn parse_at(schema: &Schema, input: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<Value> {
    let typed = parse_kind(schema, input, path, issues)?;
    run_pipeline(schema.pipeline(), typed, path, issues)
}

fn type_issue(expected: &str, input: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<Value> {
    issues.push(Issue::new(
        path,
        format!(
            "Invalid type: Expected {} but received {}",
            expected,
            describe(input)
        ),
    ));
    None
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_) => {
            value.type_name().to_string()
        }
        _ => value.to_string(),
    }
}

fn accept_if(
    accepted: bool,
    expected: &str,
    input: &Value,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    if accepted {
        Some(input.clone())
    } else {
        type_issue(expected, input, path, issues)
    }
}

fn parse_kind(
    schema: &Schema,
    input: &Value,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    match schema.kind() {
        SchemaKind::String => accept_if(matches!(input, Value::String(_)), "string", input, path, issues),
        SchemaKind::Number => accept_if(
            matches!(input, Value::Number(n) if !n.is_nan()),
            "number",
            input,
            path,
            issues,
        ),
        SchemaKind::BigInt => accept_if(matches!(input, Value::BigInt(_)), "bigint", input, path, issues),
        SchemaKind::Boolean => accept_if(matches!(input, Value::Bool(_)), "boolean", input, path, issues),
        SchemaKind::Date => accept_if(matches!(input, Value::Date(_)), "date", input, path, issues),
        SchemaKind::Null => accept_if(input.is_null(), "null", input, path, issues),
        SchemaKind::Undefined => accept_if(input.is_undefined(), "undefined", input, path, issues),
        SchemaKind::Any | SchemaKind::Unknown => Some(input.clone()),
        SchemaKind::Function => accept_if(
            matches!(input, Value::Function(_)),
            "function",
            input,
            path,
            issues,
        ),
        SchemaKind::Symbol => accept_if(matches!(input, Value::Symbol(_)), "symbol", input, path, issues),
        SchemaKind::Literal(literal) => {
            accept_if(input == literal, &literal.to_string(), input, path, issues)
        }
        SchemaKind::Enum(options) => {
            let expected = Value::Array(options.clone()).to_string();
            accept_if(options.contains(input), &expected, input, path, issues)
        }
        SchemaKind::Picklist(options) => {
            let accepted = input
                .as_str()
                .is_some_and(|s| options.iter().any(|option| option == s));
            accept_if(accepted, &format!("{:?}", options), input, path, issues)
        }
        SchemaKind::Object(entries) => {
            let Value::Object(fields) = input else {
                return type_issue("object", input, path, issues);
            };
            let mut output = BTreeMap::new();
            let mut ok = true;
            for (key, field) in entries {
                let present = fields.get(key);
                let child = present.unwrap_or(&Value::Undefined);
                match parse_at(field, child, &format!("{}.{}", path, key), issues) {
                    Some(value) if present.is_none() && value.is_undefined() => {}
                    Some(value) => {
                        output.insert(key.clone(), value);
                    }
                    None => ok = false,
                }
            }
            ok.then_some(Value::Object(output))
        }
        SchemaKind::Array(item) => {
            let Value::Array(items) = input else {
                return type_issue("array", input, path, issues);
            };
            parse_items(items.iter().map(|v| (item, v)), path, issues).map(Value::Array)
        }
        SchemaKind::Tuple(positions) => {
            let Value::Array(items) = input else {
                return type_issue("tuple", input, path, issues);
            };
            if items.len() < positions.len() {
                issues.push(Issue::new(
                    path,
                    format!(
                        "Invalid length: Expected {} items but received {}",
                        positions.len(),
                        items.len()
                    ),
                ));
                return None;
            }
            parse_items(positions.iter().zip(items.iter()), path, issues).map(Value::Array)
        }
        SchemaKind::Set(member) => {
            let Value::Set(members) = input else {
                return type_issue("set", input, path, issues);
            };
            parse_items(members.iter().map(|v| (member, v)), path, issues).map(Value::set)
        }
        SchemaKind::Map { key, value } => {
            let Value::Map(entries) = input else {
                return type_issue("map", input, path, issues);
            };
            let mut output = Vec::with_capacity(entries.len());
            let mut ok = true;
            for (k, v) in entries {
                let parsed_key = parse_at(key, k, &format!("{}.(key)", path), issues);
                let parsed_value = parse_at(value, v, &format!("{}.(value)", path), issues);
                match (parsed_key, parsed_value) {
                    (Some(k), Some(v)) => output.push((k, v)),
                    _ => ok = false,
                }
            }
            ok.then(|| Value::map(output))
        }
        SchemaKind::Union(options) => {
            for option in options {
                let mut scratch = Vec::new();
                if let Some(output) = parse_at(option, input, path, &mut scratch) {
                    if scratch.is_empty() {
                        return Some(output);
                    }
                }
            }
            issues.push(Issue::new(
                path,
                format!(
                    "Invalid type: {} matches none of the {} union options",
                    describe(input),
                    options.len()
                ),
            ));
            None
        }
        SchemaKind::Optional { wrapped, default } => {
            if input.is_undefined() {
                Some(default.clone().unwrap_or(Value::Undefined))
            } else {
                parse_at(wrapped, input, path, issues)
            }
        }
        SchemaKind::Nullable { wrapped, default } => {
            if input.is_null() {
                Some(default.clone().unwrap_or(Value::Null))
            } else {
                parse_at(wrapped, input, path, issues)
            }
        }
        SchemaKind::Nullish { wrapped, default } => {
            if input.is_null() || input.is_undefined() {
                Some(default.clone().unwrap_or_else(|| input.clone()))
            } else {
                parse_at(wrapped, input, path, issues)
            }
        }
        SchemaKind::Custom { type_name, check } => {
            let accepted = check.as_ref().is_none_or(|check| check(input));
            accept_if(accepted, type_name, input, path, issues)
        }
    }
}

fn parse_items<'a, I>(pairs: I, path: &str, issues: &mut Vec<Issue>) -> Option<Vec<Value>>
where
    I: Iterator<Item = (&'a Schema, &'a Value)>,
{
    let mut output = Vec::new();
    let mut ok = true;
    for (index, (schema, value)) in pairs.enumerate() {
        match parse_at(schema, value, &format!("{}[{}]", path, index), issues) {
            Some(parsed) => output.push(parsed),
            None => ok = false,
        }
    }
    ok.then_some(output)
}

fn run_pipeline(
    actions: &[Action],
    mut value: Value,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    for action in actions {
        match action {
            Action::Validation(validation) => {
                if let Err(message) = check_validation(validation, &value) {
                    issues.push(Issue::new(path, message));
                    return None;
                }
            }
            Action::Transformation(transformation) => value = transformation.apply(value),
        }
    }
    Some(value)
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn size_of(value: &Value) -> Option<usize> {
    match value {
        Value::Set(members) => Some(members.len()),
        Value::Map(entries) => Some(entries.len()),
        _ => None,
    }
}

fn measure(
    measured: Option<usize>,
    label: &str,
    expected: &str,
    accepts: impl Fn(usize) -> bool,
) -> Result<(), String> {
    match measured {
        Some(n) if accepts(n) => Ok(()),
        Some(n) => Err(format!(
            "Invalid {}: Expected {} but received {}",
            label, expected, n
        )),
        None => Err(format!("Invalid {}: value has no {}", label, label)),
    }
}

fn string_check(value: &Value, label: &str, accepts: impl Fn(&str) -> bool) -> Result<(), String> {
    match value.as_str() {
        Some(s) if accepts(s) => Ok(()),
        Some(s) => Err(format!("Invalid {}: Received {:?}", label, s)),
        None => Err(format!("Invalid {}: Expected a string", label)),
    }
}

fn ordered(
    value: &Value,
    requirement: &Value,
    label: &str,
    accepts: impl Fn(Ordering) -> bool,
) -> Result<(), String> {
    match value.compare(requirement) {
        Some(ordering) if accepts(ordering) => Ok(()),
        _ => Err(format!(
            "Invalid {}: Expected {} but received {}",
            label,
            requirement,
            describe(value)
        )),
    }
}

/// True if `value` is an integral multiple of `factor` in floating point
pub fn is_multiple_of(value: f64, factor: f64) -> bool {
    let quotient = value / factor;
    quotient.is_finite() && (value % factor == 0.0 || quotient.round() * factor == value)
}

fn check_validation(validation: &Validation, value: &Value) -> Result<(), String> {
    match validation {
        Validation::MinLength(min) => {
            measure(length_of(value), "length", &format!(">={}", min), |n| n >= *min)
        }
        Validation::MaxLength(max) => {
            measure(length_of(value), "length", &format!("<={}", max), |n| n <= *max)
        }
        Validation::Length(exact) => {
            measure(length_of(value), "length", &exact.to_string(), |n| n == *exact)
        }
        Validation::NonEmpty => measure(length_of(value), "length", "!0", |n| n > 0),
        Validation::MinSize(min) => {
            measure(size_of(value), "size", &format!(">={}", min), |n| n >= *min)
        }
        Validation::MaxSize(max) => {
            measure(size_of(value), "size", &format!("<={}", max), |n| n <= *max)
        }
        Validation::Size(exact) => {
            measure(size_of(value), "size", &exact.to_string(), |n| n == *exact)
        }
        Validation::StartsWith(prefix) => {
            string_check(value, "start", |s| s.starts_with(prefix.as_str()))
        }
        Validation::EndsWith(suffix) => string_check(value, "end", |s| s.ends_with(suffix.as_str())),
        Validation::Includes(needle) => {
            string_check(value, "content", |s| s.contains(needle.as_str()))
        }
        Validation::Regex(pattern) => string_check(value, "format", |s| pattern.is_match(s)),
        Validation::Email => string_check(value, "email", |s| email_regex().is_match(s)),
        Validation::Url => string_check(value, "URL", |s| url_regex().is_match(s)),
        Validation::Uuid => string_check(value, "UUID", |s| uuid_regex().is_match(s)),
        Validation::MinValue(requirement) => {
            ordered(value, requirement, "value", |o| o != Ordering::Less)
        }
        Validation::MaxValue(requirement) => {
            ordered(value, requirement, "value", |o| o != Ordering::Greater)
        }
        Validation::GtValue(requirement) => {
            ordered(value, requirement, "value", |o| o == Ordering::Greater)
        }
        Validation::LtValue(requirement) => {
            ordered(value, requirement, "value", |o| o == Ordering::Less)
        }
        Validation::Value(requirement) => {
            if value == requirement {
                Ok(())
            } else {
                Err(format!(
                    "Invalid value: Expected {} but received {}",
                    requirement,
                    describe(value)
                ))
            }
        }
        Validation::Values(requirements) => {
            if requirements.contains(value) {
                Ok(())
            } else {
                Err(format!(
                    "Invalid value: Expected one of {} but received {}",
                    Value::Array(requirements.clone()),
                    describe(value)
                ))
            }
        }
        Validation::NotValue(requirement) => {
            if value != requirement {
                Ok(())
            } else {
                Err(format!("Invalid value: Expected !{}", requirement))
            }
        }
        Validation::NotValues(requirements) => {
            if !requirements.contains(value) {
                Ok(())
            } else {
                Err(format!(
                    "Invalid value: Expected none of {} but received {}",
                    Value::Array(requirements.clone()),
                    describe(value)
                ))
            }
        }
        Validation::MultipleOf(factor) => match value {
            Value::Number(n) if is_multiple_of(*n, *factor) => Ok(()),
            Value::BigInt(n)
                if factor.fract() == 0.0 && *factor != 0.0 && n % (*factor as i128) == 0 =>
            {
                Ok(())
            }
            _ => Err(format!(
                "Invalid multiple: Expected %{} but received {}",
                factor,
                describe(value)
            )),
        },
        Validation::Integer => match value {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(()),
            _ => Err(format!("Invalid integer: Received {}", describe(value))),
        },
        Validation::SafeInteger => match value {
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Ok(())
            }
            _ => Err(format!("Invalid safe integer: Received {}", describe(value))),
        },
        Validation::Finite => match value {
            Value::Number(n) if n.is_finite() => Ok(()),
            _ => Err(format!("Invalid finite number: Received {}", describe(value))),
        },
        Validation::Check { name, predicate } => {
            if predicate(value) {
                Ok(())
            } else {
                Err(format!("Check {} failed for {}", name, describe(value)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::*;
    use crate::schema::*;

    #[test]
    fn test_string_lengths_count_chars() {
        let schema = string().pipe([min_length(2), max_length(3)]);
        assert!(is_valid(&schema, &Value::from("éé")));
        assert!(is_valid(&schema, &Value::from("日本語")));
        assert!(!is_valid(&schema, &Value::from("a")));
        assert!(!is_valid(&schema, &Value::from("abcd")));
    }

    #[test]
    fn test_type_mismatch_reports_root_path() {
        let error = parse(&string(), &Value::from(3)).unwrap_err();
        assert_eq!(error.issues.len(), 1);
        assert_eq!(error.issues[0].path, "");
        assert!(error.issues[0].message.contains("Expected string"));
    }

    #[test]
    fn test_nested_paths() {
        let schema = object([(
            "tags",
            array(map(string(), set(number()))),
        )]);
        let input = Value::object([(
            "tags",
            Value::Array(vec![Value::map([(
                Value::from("k"),
                Value::Set(vec![Value::from("oops")]),
            )])]),
        )]);
        let error = parse(&schema, &input).unwrap_err();
        assert_eq!(error.issues[0].path, ".tags[0].(value)[0]");
    }

    #[test]
    fn test_object_strips_unknown_keys_and_omits_absent_optionals() {
        let schema = object([("a", number()), ("b", optional(string()))]);
        let input = Value::object([("a", Value::from(1)), ("extra", Value::from(true))]);
        assert_eq!(
            parse(&schema, &input).unwrap(),
            Value::object([("a", Value::from(1))])
        );
    }

    #[test]
    fn test_missing_required_field_fails() {
        let schema = object([("a", number())]);
        let error = parse(&schema, &Value::object(Vec::<(String, Value)>::new())).unwrap_err();
        assert_eq!(error.issues[0].path, ".a");
    }

    #[test]
    fn test_defaults_substitute_absent_markers() {
        let schema = optional_with_default(string(), "fallback");
        assert_eq!(
            parse(&schema, &Value::Undefined).unwrap(),
            Value::from("fallback")
        );

        let schema = nullish_with_default(number(), 7);
        assert_eq!(parse(&schema, &Value::Null).unwrap(), Value::from(7));
        assert_eq!(parse(&schema, &Value::Undefined).unwrap(), Value::from(7));

        let schema = nullable(number());
        assert_eq!(parse(&schema, &Value::Null).unwrap(), Value::Null);
        assert!(!is_valid(&schema, &Value::Undefined));
    }

    #[test]
    fn test_transformations_replace_value() {
        let schema = string().pipe([trim(), to_upper_case(), min_length(2)]);
        assert_eq!(
            parse(&schema, &Value::from("  ab ")).unwrap(),
            Value::from("AB")
        );
        assert!(!is_valid(&schema, &Value::from("  a  ")));
    }

    #[test]
    fn test_number_bounds() {
        let schema = number().pipe([gt_value(50), lt_value(60)]);
        assert!(!is_valid(&schema, &Value::from(50)));
        assert!(is_valid(&schema, &Value::from(50.5)));
        assert!(!is_valid(&schema, &Value::from(60)));
        assert!(!is_valid(&schema, &Value::from("55")));
    }

    #[test]
    fn test_nan_is_not_a_number() {
        assert!(!is_valid(&number(), &Value::from(f64::NAN)));
        assert!(is_valid(&number(), &Value::from(f64::INFINITY)));
        assert!(!is_valid(&number().pipe([finite()]), &Value::from(f64::INFINITY)));
    }

    #[test]
    fn test_multiple_of() {
        assert!(is_multiple_of(90.0, 10.0));
        assert!(is_multiple_of(0.75, 0.25));
        assert!(is_multiple_of(-4.0, 2.0));
        assert!(!is_multiple_of(5.0, 2.0));
        assert!(!is_multiple_of(1.0, 0.0));

        let schema = bigint().pipe([multiple_of(3.0)]);
        assert!(is_valid(&schema, &Value::from(9i128)));
        assert!(!is_valid(&schema, &Value::from(10i128)));
    }

    #[test]
    fn test_integer_and_safe_integer() {
        assert!(is_valid(&number().pipe([integer()]), &Value::from(3)));
        assert!(!is_valid(&number().pipe([integer()]), &Value::from(3.5)));
        assert!(!is_valid(
            &number().pipe([safe_integer()]),
            &Value::from(MAX_SAFE_INTEGER + 2.0)
        ));
    }

    #[test]
    fn test_formats() {
        assert!(is_valid(&string().pipe([email()]), &Value::from("a.b+c@ex-ample.com")));
        assert!(!is_valid(&string().pipe([email()]), &Value::from("not an email")));
        assert!(is_valid(&string().pipe([url()]), &Value::from("https://example.com/a?b=c")));
        assert!(!is_valid(&string().pipe([url()]), &Value::from("example.com")));
        assert!(is_valid(
            &string().pipe([uuid()]),
            &Value::from("123e4567-e89b-42d3-a456-426614174000")
        ));
        assert!(!is_valid(&string().pipe([uuid()]), &Value::from("123e4567")));
    }

    #[test]
    fn test_union_returns_first_match() {
        let schema = union(vec![
            string().pipe([to_upper_case()]),
            string(),
            number(),
        ]);
        assert_eq!(parse(&schema, &Value::from("ab")).unwrap(), Value::from("AB"));
        assert_eq!(parse(&schema, &Value::from(1)).unwrap(), Value::from(1));
        assert!(!is_valid(&schema, &Value::Null));
    }

    #[test]
    fn test_set_and_map_sizes() {
        let schema = set(number()).pipe([min_size(2), max_size(3)]);
        assert!(is_valid(&schema, &Value::set([Value::from(1), Value::from(2)])));
        assert!(!is_valid(&schema, &Value::set([Value::from(1)])));

        let schema = map(string(), number()).pipe([size(1)]);
        assert!(is_valid(
            &schema,
            &Value::map([(Value::from("a"), Value::from(1))])
        ));
    }

    #[test]
    fn test_enum_picklist_literal() {
        assert!(is_valid(&enumeration([1, 2]), &Value::from(2)));
        assert!(!is_valid(&enumeration([1, 2]), &Value::from(3)));
        assert!(is_valid(&picklist(["x", "y"]), &Value::from("y")));
        assert!(!is_valid(&picklist(["x", "y"]), &Value::from(1)));
        assert!(is_valid(&literal("on"), &Value::from("on")));
    }

    #[test]
    fn test_custom_schema_uses_check() {
        assert!(is_valid(&custom("anything"), &Value::from(1)));
        let even = custom_with_check("even", |v| v.as_f64().is_some_and(|n| n % 2.0 == 0.0));
        assert!(is_valid(&even, &Value::from(4)));
        assert!(!is_valid(&even, &Value::from(5)));
    }

    #[test]
    fn test_check_validation_names_predicate() {
        let schema = number().pipe([check("is_42", |v| *v == Value::from(42))]);
        let error = parse(&schema, &Value::from(1)).unwrap_err();
        assert!(error.issues[0].message.contains("is_42"));
    }

    #[test]
    fn test_date_bounds() {
        use chrono::{TimeZone, Utc};

        let lower = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let schema = date().pipe([gt_value(lower)]);
        assert!(!is_valid(&schema, &Value::from(lower)));
        assert!(is_valid(
            &schema,
            &Value::from(lower + chrono::Duration::milliseconds(1))
        ));
    }
}
