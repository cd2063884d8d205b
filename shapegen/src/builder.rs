//! The schema compiler: dispatch, overrides and output projection.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use shapegen_sampler::{BoxedGenerator, Generator, GeneratorExt, SampleError};
use shapegen_schema::{Schema, SchemaId, SchemaKind, Value, parse};
use tracing::{debug, trace};

use crate::config::BuilderConfig;
use crate::error::Error;
use crate::guard;
use crate::path;
use crate::strategies;

/// Builds a generator for the builder it is registered on
pub type Factory =
    Arc<dyn Fn(&SchemaGen) -> Result<BoxedGenerator<Value>, Error> + Send + Sync>;

/// A replacement for the generator the compiler would derive for a schema
#[derive(Clone)]
pub enum Override {
    Generator(BoxedGenerator<Value>),
    Factory(Factory),
}

#[derive(Clone)]
struct Registration {
    // Holding the schema keeps its identity from being reused
    _schema: Schema,
    replacement: Override,
}

/// Compiles schemas into generators
///
/// A builder is immutable once made: [`with_override`](SchemaGen::with_override)
/// and [`with_override_fn`](SchemaGen::with_override_fn) return a new builder
/// and leave the receiver as it was.
///
/// ```rust
/// use shapegen::SchemaGen;
/// use shapegen_sampler::{Generator, GeneratorConfig, create_seeded_rng};
/// use shapegen_schema::{integer, is_valid, max_value, min_value, number, object, string, min_length};
///
/// let schema = object([
///     ("name", string().pipe([min_length(3)])),
///     ("age", number().pipe([integer(), min_value(0), max_value(120)])),
/// ]);
///
/// let generator = SchemaGen::new().input_of(&schema).unwrap();
/// let mut rng = create_seeded_rng(42);
/// let value = generator.generate(&mut rng, &GeneratorConfig::default()).unwrap();
/// assert!(is_valid(&schema, &value));
/// ```
#[derive(Clone, Default)]
pub struct SchemaGen {
    config: BuilderConfig,
    overrides: HashMap<SchemaId, Registration>,
}

impl fmt::Debug for SchemaGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGen")
            .field("config", &self.config)
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

impl SchemaGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a custom configuration
    pub fn with_config(config: BuilderConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            overrides: HashMap::new(),
        })
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Use `generator` for `schema` (and only that node) in the returned builder
    pub fn with_override<G>(&self, schema: &Schema, generator: G) -> SchemaGen
    where
        G: Generator<Value> + Send + Sync + 'static,
    {
        self.register(schema, Override::Generator(BoxedGenerator::new(generator)))
    }

    /// Register a factory invoked with the builder each time `schema` is compiled
    ///
    /// The factory can call back into the builder, for instance to derive
    /// the default generator of a child schema and post-process it.
    pub fn with_override_fn<F>(&self, schema: &Schema, factory: F) -> SchemaGen
    where
        F: Fn(&SchemaGen) -> Result<BoxedGenerator<Value>, Error> + Send + Sync + 'static,
    {
        self.register(schema, Override::Factory(Arc::new(factory)))
    }

    fn register(&self, schema: &Schema, replacement: Override) -> SchemaGen {
        let mut next = self.clone();
        next.overrides.insert(
            schema.id(),
            Registration {
                _schema: schema.clone(),
                replacement,
            },
        );
        next
    }

    /// True if an override is registered for `schema`
    pub fn has_override(&self, schema: &Schema) -> bool {
        self.overrides.contains_key(&schema.id())
    }

    /// Generator of values `schema` accepts as input
    pub fn input_of(&self, schema: &Schema) -> Result<BoxedGenerator<Value>, Error> {
        self.build(schema, "")
    }

    /// Generator of values `schema` produces as output
    ///
    /// Input values are parsed, so transformations and defaults are applied.
    pub fn output_of(&self, schema: &Schema) -> Result<BoxedGenerator<Value>, Error> {
        let input = self.input_of(schema)?;
        Ok(project(schema, input))
    }

    /// Compile `schema`, found at `at` within the root being built
    pub(crate) fn build(&self, schema: &Schema, at: &str) -> Result<BoxedGenerator<Value>, Error> {
        trace!(path = %path::display(at), schema_type = schema.type_name(), "dispatching schema");

        if let Some(registration) = self.overrides.get(&schema.id()) {
            debug!(path = %path::display(at), schema_type = schema.type_name(), "using registered override");
            return match &registration.replacement {
                Override::Generator(generator) => Ok(generator.clone()),
                Override::Factory(factory) => factory(self),
            };
        }

        let cx = Context { builder: self };
        match schema.kind() {
            SchemaKind::Custom { type_name, .. } => Err(Error::UnsupportedSchemaType {
                type_name: type_name.clone(),
                path: path::display(at),
            }),
            SchemaKind::String => strategies::string::build(schema, at, &cx),
            SchemaKind::Number => strategies::number::build(schema, at, &cx),
            SchemaKind::BigInt => strategies::bigint::build(schema, at, &cx),
            SchemaKind::Date => strategies::date::build(schema, at, &cx),
            SchemaKind::Boolean => strategies::boolean::build(schema, at, &cx),
            SchemaKind::Object(entries) => strategies::object::build(schema, entries, at, &cx),
            SchemaKind::Array(item) => strategies::collections::array(schema, item, at, &cx),
            SchemaKind::Tuple(items) => strategies::collections::tuple(schema, items, at, &cx),
            SchemaKind::Set(item) => strategies::collections::set(schema, item, at, &cx),
            SchemaKind::Map { key, value } => {
                strategies::collections::map(schema, key, value, at, &cx)
            }
            SchemaKind::Union(options) => strategies::wrappers::union(schema, options, at, &cx),
            SchemaKind::Optional { wrapped, .. } => {
                strategies::wrappers::optional(schema, wrapped, at, &cx)
            }
            SchemaKind::Nullable { wrapped, .. } => {
                strategies::wrappers::nullable(schema, wrapped, at, &cx)
            }
            SchemaKind::Nullish { wrapped, .. } => {
                strategies::wrappers::nullish(schema, wrapped, at, &cx)
            }
            SchemaKind::Literal(literal) => {
                Ok(strategies::choice(schema, vec![literal.clone()], at, &cx))
            }
            SchemaKind::Enum(options) => Ok(strategies::choice(schema, options.clone(), at, &cx)),
            SchemaKind::Picklist(options) => Ok(strategies::choice(
                schema,
                options.iter().cloned().map(Value::String).collect(),
                at,
                &cx,
            )),
            SchemaKind::Null => Ok(strategies::choice(schema, vec![Value::Null], at, &cx)),
            SchemaKind::Undefined => Ok(strategies::choice(schema, vec![Value::Undefined], at, &cx)),
            SchemaKind::Any | SchemaKind::Unknown => strategies::dynamic::any(schema, at, &cx),
            SchemaKind::Function => strategies::dynamic::function(schema, at, &cx),
            SchemaKind::Symbol => strategies::dynamic::symbol(schema, at, &cx),
        }
    }
}

/// What a strategy may ask of the builder that invoked it
pub(crate) struct Context<'a> {
    builder: &'a SchemaGen,
}

impl Context<'_> {
    /// Compile a child schema found at `at`
    pub(crate) fn recurse(&self, schema: &Schema, at: &str) -> Result<BoxedGenerator<Value>, Error> {
        self.builder.build(schema, at)
    }

    /// Route `generator` through the fallback filter for `schema`
    pub(crate) fn guard(
        &self,
        generator: BoxedGenerator<Value>,
        schema: &Schema,
        at: &str,
        reasons: &[String],
    ) -> BoxedGenerator<Value> {
        debug!(
            path = %path::display(at),
            schema_type = schema.type_name(),
            reasons = ?reasons,
            "attaching fallback filter"
        );
        guard::guarded(generator, schema, at, self.builder.config.guard)
    }

    pub(crate) fn config(&self) -> &BuilderConfig {
        &self.builder.config
    }
}

/// Map input values through `parse`, unless parsing cannot change them
fn project(schema: &Schema, input: BoxedGenerator<Value>) -> BoxedGenerator<Value> {
    if schema.kind().is_scalar() && !schema.has_transformations() {
        debug!(schema_type = schema.type_name(), "output equals input");
        return input;
    }

    debug!(schema_type = schema.type_name(), "projecting output through parse");
    let schema = schema.clone();
    input
        .try_map(move |value| {
            parse(&schema, &value).map_err(|error| SampleError::aborted(Error::Validation(error)))
        })
        .boxed()
}
