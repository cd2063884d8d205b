//! Schema nodes and the constructors used to build them.
//!
//! A [`Schema`] is a cheap handle to an immutable node. Clones share the node
//! and therefore its [`SchemaId`]; building a schema twice, or adding a
//! pipeline with [`Schema::pipe`], yields a new identity.

use std::fmt;
use std::sync::Arc;

use crate::action::{Action, Predicate};
use crate::value::Value;

/// Identity of a schema node, stable for as long as a handle to it is alive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SchemaId(usize);

/// The structural kind of a schema node
#[derive(Clone)]
pub enum SchemaKind {
    String,
    Number,
    BigInt,
    Boolean,
    Date,
    Null,
    Undefined,
    Any,
    Unknown,
    Function,
    Symbol,
    Literal(Value),
    Enum(Vec<Value>),
    Picklist(Vec<String>),
    Object(Vec<(String, Schema)>),
    Array(Schema),
    Tuple(Vec<Schema>),
    Set(Schema),
    Map { key: Schema, value: Schema },
    Union(Vec<Schema>),
    Optional { wrapped: Schema, default: Option<Value> },
    Nullable { wrapped: Schema, default: Option<Value> },
    Nullish { wrapped: Schema, default: Option<Value> },
    /// A schema type the compiler has no strategy for
    Custom {
        type_name: String,
        check: Option<Predicate>,
    },
}

impl SchemaKind {
    pub fn type_name(&self) -> &str {
        match self {
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::BigInt => "bigint",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Date => "date",
            SchemaKind::Null => "null",
            SchemaKind::Undefined => "undefined",
            SchemaKind::Any => "any",
            SchemaKind::Unknown => "unknown",
            SchemaKind::Function => "function",
            SchemaKind::Symbol => "symbol",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Enum(_) => "enum",
            SchemaKind::Picklist(_) => "picklist",
            SchemaKind::Object(_) => "object",
            SchemaKind::Array(_) => "array",
            SchemaKind::Tuple(_) => "tuple",
            SchemaKind::Set(_) => "set",
            SchemaKind::Map { .. } => "map",
            SchemaKind::Union(_) => "union",
            SchemaKind::Optional { .. } => "optional",
            SchemaKind::Nullable { .. } => "nullable",
            SchemaKind::Nullish { .. } => "nullish",
            SchemaKind::Custom { type_name, .. } => type_name,
        }
    }

    /// True for kinds whose values have no children
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            SchemaKind::String
                | SchemaKind::Number
                | SchemaKind::BigInt
                | SchemaKind::Boolean
                | SchemaKind::Date
                | SchemaKind::Null
                | SchemaKind::Undefined
                | SchemaKind::Literal(_)
                | SchemaKind::Enum(_)
                | SchemaKind::Picklist(_)
                | SchemaKind::Symbol
        )
    }
}

struct SchemaNode {
    kind: SchemaKind,
    pipeline: Vec<Action>,
}

/// A shared, immutable schema node
#[derive(Clone)]
pub struct Schema {
    node: Arc<SchemaNode>,
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self::with_pipeline(kind, Vec::new())
    }

    fn with_pipeline(kind: SchemaKind, pipeline: Vec<Action>) -> Self {
        Self {
            node: Arc::new(SchemaNode { kind, pipeline }),
        }
    }

    pub fn id(&self) -> SchemaId {
        SchemaId(Arc::as_ptr(&self.node) as usize)
    }

    pub fn kind(&self) -> &SchemaKind {
        &self.node.kind
    }

    pub fn type_name(&self) -> &str {
        self.node.kind.type_name()
    }

    pub fn pipeline(&self) -> &[Action] {
        &self.node.pipeline
    }

    /// Append actions to the pipeline, returning a schema with a new identity
    pub fn pipe<I>(&self, actions: I) -> Schema
    where
        I: IntoIterator<Item = Action>,
    {
        let mut pipeline = self.node.pipeline.clone();
        pipeline.extend(actions);
        Self::with_pipeline(self.node.kind.clone(), pipeline)
    }

    /// True if the pipeline contains at least one transformation
    pub fn has_transformations(&self) -> bool {
        self.node
            .pipeline
            .iter()
            .any(|action| matches!(action, Action::Transformation(_)))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type", &self.type_name())
            .field("pipeline", &self.node.pipeline)
            .finish()
    }
}

pub fn string() -> Schema {
    Schema::new(SchemaKind::String)
}

pub fn number() -> Schema {
    Schema::new(SchemaKind::Number)
}

pub fn bigint() -> Schema {
    Schema::new(SchemaKind::BigInt)
}

pub fn boolean() -> Schema {
    Schema::new(SchemaKind::Boolean)
}

pub fn date() -> Schema {
    Schema::new(SchemaKind::Date)
}

pub fn null() -> Schema {
    Schema::new(SchemaKind::Null)
}

pub fn undefined() -> Schema {
    Schema::new(SchemaKind::Undefined)
}

pub fn any() -> Schema {
    Schema::new(SchemaKind::Any)
}

pub fn unknown() -> Schema {
    Schema::new(SchemaKind::Unknown)
}

pub fn function() -> Schema {
    Schema::new(SchemaKind::Function)
}

pub fn symbol() -> Schema {
    Schema::new(SchemaKind::Symbol)
}

pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::new(SchemaKind::Literal(value.into()))
}

pub fn enumeration<V, I>(options: I) -> Schema
where
    V: Into<Value>,
    I: IntoIterator<Item = V>,
{
    Schema::new(SchemaKind::Enum(options.into_iter().map(Into::into).collect()))
}

pub fn picklist<S, I>(options: I) -> Schema
where
    S: Into<String>,
    I: IntoIterator<Item = S>,
{
    Schema::new(SchemaKind::Picklist(
        options.into_iter().map(Into::into).collect(),
    ))
}

/// An object schema; fields keep their declaration order
pub fn object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    Schema::new(SchemaKind::Object(
        entries
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
    ))
}

pub fn array(item: Schema) -> Schema {
    Schema::new(SchemaKind::Array(item))
}

pub fn tuple(items: Vec<Schema>) -> Schema {
    Schema::new(SchemaKind::Tuple(items))
}

pub fn set(value: Schema) -> Schema {
    Schema::new(SchemaKind::Set(value))
}

pub fn map(key: Schema, value: Schema) -> Schema {
    Schema::new(SchemaKind::Map { key, value })
}

pub fn union(options: Vec<Schema>) -> Schema {
    Schema::new(SchemaKind::Union(options))
}

pub fn optional(wrapped: Schema) -> Schema {
    Schema::new(SchemaKind::Optional {
        wrapped,
        default: None,
    })
}

/// An optional schema that parses an absent value as `default`
pub fn optional_with_default(wrapped: Schema, default: impl Into<Value>) -> Schema {
    Schema::new(SchemaKind::Optional {
        wrapped,
        default: Some(default.into()),
    })
}

pub fn nullable(wrapped: Schema) -> Schema {
    Schema::new(SchemaKind::Nullable {
        wrapped,
        default: None,
    })
}

pub fn nullable_with_default(wrapped: Schema, default: impl Into<Value>) -> Schema {
    Schema::new(SchemaKind::Nullable {
        wrapped,
        default: Some(default.into()),
    })
}

pub fn nullish(wrapped: Schema) -> Schema {
    Schema::new(SchemaKind::Nullish {
        wrapped,
        default: None,
    })
}

pub fn nullish_with_default(wrapped: Schema, default: impl Into<Value>) -> Schema {
    Schema::new(SchemaKind::Nullish {
        wrapped,
        default: Some(default.into()),
    })
}

/// A schema of a type the compiler does not know
///
/// Values are accepted when `check` is absent or returns true.
pub fn custom(type_name: impl Into<String>) -> Schema {
    Schema::new(SchemaKind::Custom {
        type_name: type_name.into(),
        check: None,
    })
}

pub fn custom_with_check<F>(type_name: impl Into<String>, check: F) -> Schema
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Schema::new(SchemaKind::Custom {
        type_name: type_name.into(),
        check: Some(Arc::new(check)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{min_length, trim};

    #[test]
    fn test_clones_share_identity() {
        let schema = string();
        assert_eq!(schema.id(), schema.clone().id());
    }

    #[test]
    fn test_equal_structure_has_distinct_identity() {
        assert_ne!(string().id(), string().id());
    }

    #[test]
    fn test_pipe_creates_new_identity() {
        let base = string();
        let piped = base.pipe([min_length(3)]);
        assert_ne!(base.id(), piped.id());
        assert!(base.pipeline().is_empty());
        assert_eq!(piped.pipeline().len(), 1);

        let again = piped.pipe([trim()]);
        assert_eq!(again.pipeline().len(), 2);
        assert!(again.has_transformations());
        assert!(!piped.has_transformations());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(string().type_name(), "string");
        assert_eq!(optional(number()).type_name(), "optional");
        assert_eq!(picklist(["a", "b"]).type_name(), "picklist");
        assert_eq!(custom("totally_custom").type_name(), "totally_custom");
        assert_eq!(map(string(), number()).type_name(), "map");
    }

    #[test]
    fn test_object_keeps_declaration_order() {
        let schema = object([("b", string()), ("a", number())]);
        match schema.kind() {
            SchemaKind::Object(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["b", "a"]);
            }
            _ => panic!("expected an object schema"),
        }
    }

    #[test]
    fn test_debug_lists_pipeline() {
        let schema = string().pipe([min_length(1)]);
        assert_eq!(
            format!("{:?}", schema),
            "Schema { type: \"string\", pipeline: [min_length(1)] }"
        );
    }
}
