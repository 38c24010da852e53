//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown parameter field: {0}")]
    UnknownField(String),

    #[error("Unknown validation policy: {0}")]
    UnknownPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_display() {
        let error = DomainError::UnknownField("speed".to_string());
        assert_eq!(error.to_string(), "Unknown parameter field: speed");
    }

    #[test]
    fn test_unknown_policy_display() {
        let error = DomainError::UnknownPolicy("lenient".to_string());
        assert_eq!(error.to_string(), "Unknown validation policy: lenient");
    }
}
