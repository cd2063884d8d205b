//! Dynamic values produced by generators and checked by schemas.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, SecondsFormat, Utc};

/// A dynamically typed value
///
/// `Undefined` and `Null` are distinct absent markers. Maps and sets keep
/// insertion order and hold members that are unique under `==`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    Function(FunctionValue),
    Symbol(SymbolValue),
}

impl Value {
    /// Name of the value's runtime type, used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Function(_) => "function",
            Value::Symbol(_) => "symbol",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Order two scalars of the same type
    ///
    /// Numbers, bigints, dates, strings and booleans are ordered; anything
    /// else, including values of different types, is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Build an object from `(key, value)` pairs
    pub fn object<K, I>(fields: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a map from `(key, value)` pairs; a later duplicate key replaces the earlier entry
    pub fn map<I>(entries: I) -> Value
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut folded: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match folded.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => folded.push((key, value)),
            }
        }
        Value::Map(folded)
    }

    /// Build a set from members; duplicates after the first occurrence are dropped
    pub fn set<I>(members: I) -> Value
    where
        I: IntoIterator<Item = Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        Value::Set(unique)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i128> for Value {
    fn from(value: i128) -> Self {
        Value::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}n", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Map(entries) => {
                write!(f, "Map {{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Set(members) => {
                write!(f, "Set {{")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "}}")
            }
            Value::Function(_) => write!(f, "[Function]"),
            Value::Symbol(symbol) => write!(
                f,
                "Symbol({})",
                symbol.description.as_deref().unwrap_or_default()
            ),
        }
    }
}

type FunctionBody = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A callable value; two function values are equal only if they share a body
#[derive(Clone)]
pub struct FunctionValue {
    body: Arc<FunctionBody>,
}

impl FunctionValue {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            body: Arc::new(body),
        }
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FunctionValue")
    }
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique symbol; every call to [`SymbolValue::new`] yields a distinct symbol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolValue {
    id: u64,
    pub description: Option<String>,
}

impl SymbolValue {
    pub fn new(description: Option<String>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, AtomicOrdering::Relaxed),
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::from(1.5).type_name(), "number");
        assert_eq!(Value::from(7i128).type_name(), "bigint");
        assert_eq!(Value::from("x").type_name(), "string");
    }

    #[test]
    fn test_compare_same_type_only() {
        assert_eq!(
            Value::from(1).compare(&Value::from(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from(3i128).compare(&Value::from(3i128)),
            Some(Ordering::Equal)
        );
        assert_eq!(Value::from(1).compare(&Value::from(1i128)), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
    }

    #[test]
    fn test_map_later_keys_overwrite() {
        let map = Value::map(vec![
            (Value::from("a"), Value::from(1)),
            (Value::from("b"), Value::from(2)),
            (Value::from("a"), Value::from(3)),
        ]);
        assert_eq!(
            map,
            Value::Map(vec![
                (Value::from("a"), Value::from(3)),
                (Value::from("b"), Value::from(2)),
            ])
        );
    }

    #[test]
    fn test_set_drops_duplicates() {
        let set = Value::set(vec![Value::from(1), Value::from(1), Value::from(2)]);
        assert_eq!(set, Value::Set(vec![Value::from(1), Value::from(2)]));
    }

    #[test]
    fn test_function_equality_is_identity() {
        let f = FunctionValue::new(|_| Value::Null);
        let g = FunctionValue::new(|_| Value::Null);
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
        assert_eq!(f.call(&[]), Value::Null);
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = SymbolValue::new(Some("tag".to_string()));
        let b = SymbolValue::new(Some("tag".to_string()));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_display() {
        let value = Value::object(vec![
            ("n", Value::from(f64::INFINITY)),
            ("s", Value::from("hi")),
        ]);
        assert_eq!(value.to_string(), "{n: Infinity, s: \"hi\"}");
        assert_eq!(Value::from(5i128).to_string(), "5n");
    }
}
