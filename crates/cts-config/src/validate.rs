//! Semantic validation of harness configuration.

use thiserror::Error;

use crate::harness::{HarnessConfig, MIN_THREAD_STACK_SIZE};

/// Result of validating a configuration.
pub type ValidationResult = Result<(), ValidationError>;

/// Errors from loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl From<ValidationError> for cts_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Invalid(_) => cts_common::Error::InvalidConfig(err.to_string()),
            other => cts_common::Error::Config(other.to_string()),
        }
    }
}

impl HarnessConfig {
    /// Check every field and report all problems at once.
    pub fn validate(&self) -> ValidationResult {
        let mut problems = Vec::new();

        if self.default_wait_timeout_ms == 0 {
            problems.push("default_wait_timeout_ms must be greater than zero".to_string());
        }

        if self.thread_name_prefix.is_empty() {
            problems.push("thread_name_prefix must not be empty".to_string());
        } else if self.thread_name_prefix.contains('\0') {
            // std::thread::Builder::spawn panics on interior NULs.
            problems.push("thread_name_prefix must not contain NUL bytes".to_string());
        }

        if let Some(size) = self.thread_stack_size {
            if size < MIN_THREAD_STACK_SIZE {
                problems.push(format!(
                    "thread_stack_size must be at least {} bytes, got {}",
                    MIN_THREAD_STACK_SIZE, size
                ));
            }
        }

        if self.log.filter.trim().is_empty() {
            problems.push("log.filter must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(HarnessConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = HarnessConfig {
            default_wait_timeout_ms: 0,
            ..HarnessConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_wait_timeout_ms"));
    }

    #[test]
    fn all_problems_reported() {
        let mut config = HarnessConfig {
            default_wait_timeout_ms: 0,
            thread_name_prefix: String::new(),
            thread_stack_size: Some(1024),
            ..HarnessConfig::default()
        };
        config.log.filter = "  ".to_string();
        match config.validate() {
            Err(ValidationError::Invalid(problems)) => assert_eq!(problems.len(), 4),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn nul_in_prefix_rejected() {
        let config = HarnessConfig {
            thread_name_prefix: "cts\0action".to_string(),
            ..HarnessConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn converts_into_common_error() {
        let invalid: cts_common::Error = ValidationError::Invalid(vec!["x".into()]).into();
        assert_eq!(invalid.code(), 11);
        let io: cts_common::Error = ValidationError::IoError("denied".into()).into();
        assert_eq!(io.code(), 10);
    }
}
