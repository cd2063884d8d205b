//! The fallback filter: generate, validate, and give up when validation
//! almost never passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shapegen_sampler::{BoxedGenerator, GeneratorExt, SampleError};
use shapegen_schema::{Schema, Value, is_valid};
use tracing::warn;

use crate::config::GuardPolicy;
use crate::error::Error;
use crate::path;

/// Evaluation and success counters shared by every sample of one guarded generator
#[derive(Debug, Default)]
pub(crate) struct Monitor {
    evaluations: AtomicU64,
    successes: AtomicU64,
}

impl Monitor {
    /// Record one evaluation, returning the updated `(evaluations, successes)`
    pub(crate) fn record(&self, success: bool) -> (u64, u64) {
        let evaluations = self.evaluations.fetch_add(1, Ordering::Relaxed) + 1;
        let successes = if success {
            self.successes.fetch_add(1, Ordering::Relaxed) + 1
        } else {
            self.successes.load(Ordering::Relaxed)
        };
        (evaluations, successes)
    }
}

/// Keep only values `schema` accepts, aborting once the success rate falls below `policy`
pub(crate) fn guarded(
    generator: BoxedGenerator<Value>,
    schema: &Schema,
    at: &str,
    policy: GuardPolicy,
) -> BoxedGenerator<Value> {
    let monitor = Arc::new(Monitor::default());
    let schema = schema.clone();
    let at = path::display(at);

    generator
        .try_filter(move |value| {
            let valid = is_valid(&schema, value);
            let (evaluations, successes) = monitor.record(valid);
            if !valid && policy.should_abort(evaluations, successes) {
                warn!(
                    path = %at,
                    schema_type = schema.type_name(),
                    evaluations,
                    successes,
                    "fallback filter success rate too low, giving up"
                );
                return Err(SampleError::aborted(Error::GenerationFailure {
                    path: at.clone(),
                    evaluations,
                    successes,
                }));
            }
            Ok(valid)
        })
        .boxed()
}
