//! Request validation policy

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How the invoker treats out-of-domain parameter values.
///
/// The collector never range-checks; this policy decides whether the
/// invoker does so before handing a request to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Reject requests with issues before the solver is called (default)
    #[default]
    Strict,
    /// Forward every request unchanged; the solver rejects or clamps
    Passthrough,
}

impl ValidationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPolicy::Strict => "strict",
            ValidationPolicy::Passthrough => "passthrough",
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, ValidationPolicy::Strict)
    }
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ValidationPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "passthrough" | "pass-through" => Ok(Self::Passthrough),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert!(ValidationPolicy::default().is_strict());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "Passthrough".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Passthrough
        );
        assert_eq!(
            "pass-through".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Passthrough
        );
        assert!(matches!(
            "lenient".parse::<ValidationPolicy>(),
            Err(DomainError::UnknownPolicy(_))
        ));
    }
}
