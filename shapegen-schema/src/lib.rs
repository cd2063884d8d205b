//! # shapegen-schema - Schemas and validation
//!
//! Describes values with a [`Schema`]: a structural kind plus an ordered
//! pipeline of validations and transformations. [`parse`] checks a
//! [`Value`] against a schema and returns the transformed output.
//!
//! ```rust
//! use shapegen_schema::{Value, is_valid, min_length, object, optional, string, number, gt_value};
//!
//! let user = object([
//!     ("name", string().pipe([min_length(1)])),
//!     ("age", optional(number().pipe([gt_value(0)]))),
//! ]);
//!
//! assert!(is_valid(&user, &Value::object([("name", Value::from("Ada"))])));
//! assert!(!is_valid(&user, &Value::object([("name", Value::from(""))])));
//! ```

pub mod action;
pub mod error;
pub mod schema;
pub mod validate;
pub mod value;

pub use action::{
    Action, Mapper, Predicate, Transformation, Validation, check, email, ends_with, finite,
    gt_value, includes, integer, length, lt_value, max_length, max_size, max_value, min_length,
    min_size, min_value, multiple_of, non_empty, not_value, not_values, regex, safe_integer, size,
    starts_with, to_lower_case, to_upper_case, transform, trim, trim_end, trim_start, url, uuid,
    value, values,
};
pub use error::{Issue, ValidationError};
pub use schema::{
    Schema, SchemaId, SchemaKind, any, array, bigint, boolean, custom, custom_with_check, date,
    enumeration, function, literal, map, null, nullable, nullable_with_default, nullish,
    nullish_with_default, number, object, optional, optional_with_default, picklist, set, string,
    symbol, tuple, undefined, union, unknown,
};
pub use validate::{MAX_SAFE_INTEGER, is_multiple_of, is_valid, parse};
pub use value::{FunctionValue, SymbolValue, Value};
