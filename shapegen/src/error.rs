//! Error type for schema compilation and sampling.

use std::fmt;

use shapegen_sampler::SampleError;
use shapegen_schema::ValidationError;

/// Everything that can go wrong while building a generator or drawing from it
#[derive(Debug)]
pub enum Error {
    /// The schema (or one nested inside it) has a type with no strategy
    UnsupportedSchemaType { type_name: String, path: String },

    /// The fallback filter accepted too few candidates to keep going
    GenerationFailure {
        path: String,
        evaluations: u64,
        successes: u64,
    },

    /// A generated value failed to parse during output projection
    Validation(ValidationError),

    /// The sampler gave up for a reason of its own
    Sampling(SampleError),

    /// Builder configuration is invalid
    Config {
        message: String,
        field: Option<String>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedSchemaType { type_name, path } => write!(
                f,
                "Unsupported schema type \"{}\" at {}. Register an override for this schema with SchemaGen::with_override",
                type_name, path
            ),
            Error::GenerationFailure {
                path,
                evaluations,
                successes,
            } => write!(
                f,
                "Unable to generate valid values at {}: only {} of {} candidates satisfied the schema. \
                 Register an override for this schema with SchemaGen::with_override",
                path, successes, evaluations
            ),
            Error::Validation(error) => write!(f, "Output projection failed: {}", error),
            Error::Sampling(error) => write!(f, "Sampling failed: {}", error),
            Error::Config { message, field } => {
                write!(f, "Configuration error: {}", message)?;
                if let Some(field) = field {
                    write!(f, " (field: {})", field)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(error) => Some(error),
            Error::Sampling(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Error::Validation(error)
    }
}

impl From<SampleError> for Error {
    /// Recover an [`Error`] that travelled through the sampler as an aborted cause
    fn from(error: SampleError) -> Self {
        match error.into_aborted() {
            Ok(cause) => match cause.downcast::<Error>() {
                Ok(error) => *error,
                Err(other) => match other.downcast::<ValidationError>() {
                    Ok(error) => Error::Validation(*error),
                    Err(other) => Error::Sampling(SampleError::Aborted(other)),
                },
            },
            Err(error) => Error::Sampling(error),
        }
    }
}

impl Error {
    pub(crate) fn config(message: impl Into<String>, field: &str) -> Self {
        Error::Config {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// The diagnostic path carried by the error, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::UnsupportedSchemaType { path, .. } | Error::GenerationFailure { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}
