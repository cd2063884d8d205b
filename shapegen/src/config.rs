//! Builder configuration.

use crate::error::Error;

/// When the fallback filter gives up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardPolicy {
    /// Evaluations to observe before the success rate is judged
    pub warmup_evaluations: u64,
    /// Lowest acceptable share of candidates that pass validation
    pub min_success_rate: f64,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            warmup_evaluations: 1000,
            min_success_rate: 0.01,
        }
    }
}

impl GuardPolicy {
    /// True once enough evaluations have been seen and too few of them passed
    pub fn should_abort(&self, evaluations: u64, successes: u64) -> bool {
        evaluations >= self.warmup_evaluations
            && (successes as f64) < self.min_success_rate * evaluations as f64
    }
}

/// Shape of the values a [`SchemaGen`](crate::SchemaGen) generates when
/// constraints leave them open
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    pub guard: GuardPolicy,
    /// Longest array, set or map generated when no maximum is declared
    pub array_max_length: usize,
    /// Default maximum string length is `2 * min_length + string_slack`
    pub string_slack: usize,
    /// Weight of the present branch against the absent one for optional and nullable
    pub optional_weight: u32,
    /// Weight of the present branch for nullish; null and undefined weigh one each
    pub nullish_weight: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            guard: GuardPolicy::default(),
            array_max_length: 10,
            string_slack: 10,
            optional_weight: 4,
            nullish_weight: 8,
        }
    }
}

impl BuilderConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let rate = self.guard.min_success_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::config(
                format!("success rate must lie in [0, 1], got {}", rate),
                "guard.min_success_rate",
            ));
        }
        if self.guard.warmup_evaluations == 0 {
            return Err(Error::config(
                "warm-up must cover at least one evaluation",
                "guard.warmup_evaluations",
            ));
        }
        if self.optional_weight == 0 {
            return Err(Error::config(
                "present branch needs a positive weight",
                "optional_weight",
            ));
        }
        if self.nullish_weight == 0 {
            return Err(Error::config(
                "present branch needs a positive weight",
                "nullish_weight",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BuilderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.guard.warmup_evaluations, 1000);
        assert_eq!(config.guard.min_success_rate, 0.01);
    }

    #[test]
    fn test_invalid_success_rate() {
        let mut config = BuilderConfig::default();
        config.guard.min_success_rate = 1.5;
        assert!(matches!(
            config.validate(),
            Err(Error::Config { field: Some(field), .. }) if field == "guard.min_success_rate"
        ));

        config.guard.min_success_rate = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let config = BuilderConfig {
            optional_weight: 0,
            ..BuilderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_should_abort_waits_for_warmup() {
        let policy = GuardPolicy::default();
        assert!(!policy.should_abort(999, 0));
        assert!(policy.should_abort(1000, 0));
        assert!(policy.should_abort(1000, 9));
        assert!(!policy.should_abort(1000, 10));
    }
}
