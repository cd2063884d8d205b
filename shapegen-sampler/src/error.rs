//! Error types raised while sampling values.

use std::error::Error;
use std::fmt;

/// Error raised by a generator when it cannot produce a value
#[derive(Debug)]
pub enum SampleError {
    /// A filter rejected every candidate within its attempt budget
    FilterExhausted { attempts: usize },

    /// A uniqueness-constrained collection could not reach its minimum size
    UniqueExhausted { wanted: usize, produced: usize },

    /// A predicate or mapper aborted sampling with its own error
    Aborted(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::FilterExhausted { attempts } => {
                write!(
                    f,
                    "Filter rejected every candidate after {} attempts",
                    attempts
                )
            }
            SampleError::UniqueExhausted { wanted, produced } => {
                write!(
                    f,
                    "Could only produce {} unique elements out of the {} required",
                    produced, wanted
                )
            }
            SampleError::Aborted(source) => write!(f, "Sampling aborted: {}", source),
        }
    }
}

impl Error for SampleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SampleError::Aborted(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl SampleError {
    /// Wrap an arbitrary error raised from inside a predicate or mapper
    pub fn aborted<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        SampleError::Aborted(error.into())
    }

    /// Unwrap the error carried by [`SampleError::Aborted`], if any
    pub fn into_aborted(self) -> Result<Box<dyn Error + Send + Sync>, SampleError> {
        match self {
            SampleError::Aborted(source) => Ok(source),
            other => Err(other),
        }
    }
}
