//! Validation errors.

use std::fmt;

/// A single problem found while parsing a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Location of the offending value, empty for the root
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path as shown to users; the root renders as `.`
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "."
        } else {
            &self.path
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

/// Error returned by [`parse`](crate::parse) when a value does not match its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => write!(f, "Validation failed"),
            [issue] => write!(f, "Validation failed at {}", issue),
            [first, rest @ ..] => write!(
                f,
                "Validation failed at {} (and {} more issue{})",
                first,
                rest.len(),
                if rest.len() == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_renders_as_dot() {
        let issue = Issue::new("", "Expected string but received number");
        assert_eq!(issue.to_string(), ".: Expected string but received number");
    }

    #[test]
    fn test_display_counts_extra_issues() {
        let error = ValidationError::new(vec![
            Issue::new(".a", "too short"),
            Issue::new(".b", "too long"),
            Issue::new(".c", "missing"),
        ]);
        assert_eq!(
            error.to_string(),
            "Validation failed at .a: too short (and 2 more issues)"
        );
    }
}
