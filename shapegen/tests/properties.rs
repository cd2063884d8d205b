//! Validity and distribution laws of generated values.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rand::thread_rng;
use shapegen::{Error, GeneratorConfig, SchemaGen, Value, input_of, samples};
use shapegen_sampler::create_seeded_rng;
use shapegen_schema::{
    Schema, array, bigint, boolean, date, email, ends_with, enumeration, gt_value, includes,
    integer, is_valid, literal, lt_value, map, max_length, max_size, max_value, min_length,
    min_size, min_value, multiple_of, not_values, nullish, number, object, optional, picklist, set,
    starts_with, string, symbol, tuple, union, url, uuid, values,
};

const DRAWS: usize = 1000;

fn draw(schema: &Schema, count: usize, seed: u64) -> Vec<Value> {
    let generator = input_of(schema).unwrap();
    let mut rng = create_seeded_rng(seed);
    samples(&generator, count, &mut rng, &GeneratorConfig::default()).unwrap()
}

fn assert_all_valid(schema: &Schema, seed: u64) -> Vec<Value> {
    let drawn = draw(schema, DRAWS, seed);
    for value in &drawn {
        assert!(is_valid(schema, value), "invalid value generated: {}", value);
    }
    drawn
}

fn numbers(drawn: &[Value]) -> Vec<f64> {
    drawn.iter().map(|value| value.as_f64().unwrap()).collect()
}

#[test]
fn test_number_range() {
    let schema = number().pipe([min_value(10), max_value(90)]);
    for n in numbers(&assert_all_valid(&schema, 1)) {
        assert!((10.0..=90.0).contains(&n));
    }
}

#[test]
fn test_integer_multiples_in_range() {
    let schema = number().pipe([integer(), multiple_of(10.0), min_value(67), max_value(99)]);
    let seen: BTreeSet<i64> = numbers(&assert_all_valid(&schema, 2))
        .into_iter()
        .map(|n| n as i64)
        .collect();
    assert_eq!(seen, BTreeSet::from([70, 80, 90]));
}

#[test]
fn test_multiples_in_range() {
    let schema = number().pipe([multiple_of(10.0), min_value(67), max_value(99)]);
    let seen: BTreeSet<i64> = numbers(&assert_all_valid(&schema, 23))
        .into_iter()
        .map(|n| n as i64)
        .collect();
    assert_eq!(seen, BTreeSet::from([70, 80, 90]));
}

#[test]
fn test_strict_lower_bound() {
    let schema = number().pipe([integer(), gt_value(50), max_value(52)]);
    let seen: BTreeSet<i64> = numbers(&assert_all_valid(&schema, 3))
        .into_iter()
        .map(|n| n as i64)
        .collect();
    assert_eq!(seen, BTreeSet::from([51, 52]));
}

#[test]
fn test_strict_lower_bound_without_upper_bound() {
    let schema = number().pipe([gt_value(50)]);
    for n in numbers(&assert_all_valid(&schema, 24)) {
        assert!(n > 50.0, "{} is not above 50", n);
    }
}

#[test]
fn test_infinite_bounds_cover_the_float_range() {
    let schema = number().pipe([min_value(f64::NEG_INFINITY), max_value(f64::INFINITY)]);
    let drawn = numbers(&assert_all_valid(&schema, 25));
    assert!(drawn.iter().any(|n| n.is_finite()));
    assert!(drawn.iter().any(|n| n.is_infinite()));
    assert!(drawn.iter().any(|n| n.abs() > 1e300));
}

#[test]
fn test_strict_real_bounds() {
    let schema = number().pipe([gt_value(0), lt_value(1)]);
    for n in numbers(&assert_all_valid(&schema, 4)) {
        assert!(n > 0.0 && n < 1.0);
    }
}

#[test]
fn test_number_values() {
    let schema = number().pipe([values([10, 20, 30])]);
    let seen: BTreeSet<i64> = numbers(&assert_all_valid(&schema, 5))
        .into_iter()
        .map(|n| n as i64)
        .collect();
    assert_eq!(seen, BTreeSet::from([10, 20, 30]));
}

#[test]
fn test_string_length() {
    let schema = string().pipe([min_length(5), max_length(10)]);
    for value in assert_all_valid(&schema, 6) {
        let length = value.as_str().unwrap().chars().count();
        assert!((5..=10).contains(&length));
    }
}

#[test]
fn test_string_affixes() {
    let schema = string().pipe([starts_with("id-"), ends_with(".json"), includes("__")]);
    for value in assert_all_valid(&schema, 7) {
        let text = value.as_str().unwrap();
        assert!(text.starts_with("id-") && text.ends_with(".json") && text.contains("__"));
    }
}

#[test]
fn test_string_formats() {
    assert_all_valid(&string().pipe([email()]), 8);
    assert_all_valid(&string().pipe([url()]), 9);
    assert_all_valid(&string().pipe([uuid()]), 10);
}

#[test]
fn test_set_members_are_distinct() {
    let schema = set(number().pipe([integer(), min_value(0), max_value(5)]))
        .pipe([min_size(3), max_size(4)]);
    for value in assert_all_valid(&schema, 11) {
        let Value::Set(members) = value else {
            panic!("expected a set, got {}", value);
        };
        assert!((3..=4).contains(&members.len()));
        for (i, a) in members.iter().enumerate() {
            assert!(members[i + 1..].iter().all(|b| a != b));
        }
    }
}

#[test]
fn test_map_with_declared_size() {
    let schema = map(string().pipe([min_length(1)]), number()).pipe([min_size(2), max_size(3)]);
    for value in assert_all_valid(&schema, 12) {
        let Value::Map(entries) = value else {
            panic!("expected a map, got {}", value);
        };
        assert!((2..=3).contains(&entries.len()));
    }
}

#[test]
fn test_array_defaults_to_bounded_length() {
    let schema = array(boolean());
    for value in assert_all_valid(&schema, 13) {
        assert!(value.as_array().unwrap().len() <= 10);
    }
}

#[test]
fn test_optional_presence_ratio() {
    let schema = optional(string());
    let drawn = assert_all_valid(&schema, 14);
    let present = drawn.iter().filter(|value| !value.is_undefined()).count();
    let ratio = present as f64 / drawn.len() as f64;
    assert!((0.7..=0.9).contains(&ratio), "presence ratio {}", ratio);
}

#[test]
fn test_nullish_produces_both_markers() {
    let drawn = assert_all_valid(&nullish(string()), 15);
    assert!(drawn.iter().any(Value::is_null));
    assert!(drawn.iter().any(Value::is_undefined));
}

#[test]
fn test_bigint_strict_bounds() {
    let schema = bigint().pipe([gt_value(5i128), lt_value(8i128)]);
    let seen: BTreeSet<i128> = assert_all_valid(&schema, 16)
        .iter()
        .map(|value| value.as_i128().unwrap())
        .collect();
    assert_eq!(seen, BTreeSet::from([6, 7]));
}

#[test]
fn test_date_strict_bounds() {
    let start = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
    let end = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_003).unwrap();
    let schema = date().pipe([gt_value(start), lt_value(end)]);
    let seen: BTreeSet<i64> = assert_all_valid(&schema, 17)
        .iter()
        .map(|value| value.as_date().unwrap().timestamp_millis())
        .collect();
    assert_eq!(seen, BTreeSet::from([1_700_000_000_001, 1_700_000_000_002]));
}

#[test]
fn test_exact_kinds() {
    let drawn = assert_all_valid(&picklist(["red", "green"]), 18);
    assert!(drawn.contains(&Value::from("red")) && drawn.contains(&Value::from("green")));

    let schema = enumeration([1, 2, 3]).pipe([not_values([2])]);
    let seen: BTreeSet<i64> = numbers(&assert_all_valid(&schema, 19))
        .into_iter()
        .map(|n| n as i64)
        .collect();
    assert_eq!(seen, BTreeSet::from([1, 3]));

    for value in assert_all_valid(&literal(true), 20) {
        assert_eq!(value, Value::Bool(true));
    }
}

#[test]
fn test_nested_composites() {
    let schema = object([
        ("id", string().pipe([uuid()])),
        ("tags", array(string().pipe([min_length(1), max_length(8)]))),
        ("point", tuple(vec![number(), number()])),
        ("label", union(vec![string(), number().pipe([integer()])])),
        ("note", optional(string())),
        ("handle", symbol()),
    ]);
    let drawn = assert_all_valid(&schema, 21);
    assert!(drawn.iter().any(|value| !value.as_object().unwrap().contains_key("note")));
}

#[test]
fn test_exploratory_sampling_with_thread_rng() {
    let schema = object([
        ("count", number().pipe([integer(), min_value(0), max_value(3)])),
        ("name", string().pipe([min_length(1)])),
    ]);
    let generator = input_of(&schema).unwrap();
    let mut rng = thread_rng();
    let drawn = samples(&generator, DRAWS, &mut rng, &GeneratorConfig::default()).unwrap();
    assert!(drawn.iter().all(|value| is_valid(&schema, value)));
}

#[test]
fn test_contradicting_bounds_fail_on_sampling() {
    let schema = number().pipe([min_value(10), max_value(5)]);
    let generator = SchemaGen::new().input_of(&schema).unwrap();
    let mut rng = create_seeded_rng(22);
    match samples(&generator, 1, &mut rng, &GeneratorConfig::default()) {
        Err(Error::GenerationFailure { path, .. }) => assert_eq!(path, "."),
        other => panic!("expected GenerationFailure, got {:?}", other),
    }
}
