use std::time::Duration;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("error reading armored key ring: {message}")]
    KeyParse { message: String },

    #[error("expected 1 openpgp entity, got {count}")]
    IdentityCount { count: usize },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Timed out after {timeout_ms}ms: {operation}")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn key_parse(message: impl Into<String>) -> Self {
        Self::KeyParse {
            message: message.into(),
        }
    }

    pub fn identity_count(count: usize) -> Self {
        Self::IdentityCount { count }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Team 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Team 'abc' not found");
    }

    #[test]
    fn test_identity_count_error() {
        let error = DomainError::identity_count(2);
        assert_eq!(error.to_string(), "expected 1 openpgp entity, got 2");
    }

    #[test]
    fn test_key_parse_error() {
        let error = DomainError::key_parse("no armored block found");
        assert_eq!(
            error.to_string(),
            "error reading armored key ring: no armored block found"
        );
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("provision team", Duration::from_secs(10));
        assert_eq!(error.to_string(), "Timed out after 10000ms: provision team");
    }

    #[test]
    fn test_timeout_error_keeps_sub_second_deadline() {
        let error = DomainError::timeout("provision team", Duration::from_millis(500));
        assert_eq!(error.to_string(), "Timed out after 500ms: provision team");
    }
}
