//! Configuration types for controlling generation parameters.

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid size hint (must be > 0)
    InvalidSizeHint(usize),
    /// Invalid filter attempt budget (must be > 0)
    InvalidFilterAttempts(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidSizeHint(n) => {
                write!(f, "Invalid size hint: {} (must be > 0)", n)
            }
            ConfigError::InvalidFilterAttempts(n) => {
                write!(f, "Invalid filter attempts: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration for generators
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Hint for the size of collections whose upper bound is left open
    pub size_hint: usize,
    /// How many candidates a filter may reject before giving up
    pub max_filter_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size_hint: 10,
            max_filter_attempts: 10_000,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator configuration with validation
    pub fn new(size_hint: usize, max_filter_attempts: usize) -> Result<Self, ConfigError> {
        let config = Self {
            size_hint,
            max_filter_attempts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the generator configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_hint == 0 {
            return Err(ConfigError::InvalidSizeHint(self.size_hint));
        }
        if self.max_filter_attempts == 0 {
            return Err(ConfigError::InvalidFilterAttempts(
                self.max_filter_attempts,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.size_hint, 10);
        assert_eq!(config.max_filter_attempts, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_config_validation() {
        assert_eq!(
            GeneratorConfig::new(0, 10),
            Err(ConfigError::InvalidSizeHint(0))
        );
        assert_eq!(
            GeneratorConfig::new(5, 0),
            Err(ConfigError::InvalidFilterAttempts(0))
        );

        let config = GeneratorConfig::new(3, 7).unwrap();
        assert_eq!(config.size_hint, 3);
        assert_eq!(config.max_filter_attempts, 7);
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidSizeHint(0).to_string(),
            "Invalid size hint: 0 (must be > 0)"
        );
    }
}
