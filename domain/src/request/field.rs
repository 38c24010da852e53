//! Parameter fields and their kinds.
//!
//! The collector validates edits only by field kind: an integer field takes
//! integers, a real field takes reals, a boolean field takes booleans.
//! Range checks belong to [`super::validation`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the seven solver parameters, in positional call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    Iterations,
    Tolerance,
    AdaptiveMuStrategy,
    HessianApproximation,
    SparseForward,
    SparseReverse,
    PrintLevel,
}

/// The kind of input a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Real,
    Boolean,
}

/// A typed field value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i32),
    Real(f64),
    Boolean(bool),
}

/// Errors from parsing user text into a field value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("'{input}' is not an integer")]
    NotAnInteger { input: String },

    #[error("'{input}' is not a real number")]
    NotAReal { input: String },

    #[error("'{input}' is not a boolean (use true/false, yes/no, on/off or 1/0)")]
    NotABoolean { input: String },
}

impl ParameterField {
    /// All fields in the order the external solver receives them.
    pub const ALL: [ParameterField; 7] = [
        ParameterField::Iterations,
        ParameterField::Tolerance,
        ParameterField::AdaptiveMuStrategy,
        ParameterField::HessianApproximation,
        ParameterField::SparseForward,
        ParameterField::SparseReverse,
        ParameterField::PrintLevel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParameterField::Iterations => "iterations",
            ParameterField::Tolerance => "tolerance",
            ParameterField::AdaptiveMuStrategy => "adaptive_mu_strategy",
            ParameterField::HessianApproximation => "hessian_approximation",
            ParameterField::SparseForward => "sparse_forward",
            ParameterField::SparseReverse => "sparse_reverse",
            ParameterField::PrintLevel => "print_level",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ParameterField::Iterations | ParameterField::PrintLevel => FieldKind::Integer,
            ParameterField::Tolerance => FieldKind::Real,
            ParameterField::AdaptiveMuStrategy
            | ParameterField::HessianApproximation
            | ParameterField::SparseForward
            | ParameterField::SparseReverse => FieldKind::Boolean,
        }
    }

    /// Parse user text according to this field's kind.
    pub fn parse_value(&self, input: &str) -> Result<FieldValue, FieldParseError> {
        self.kind().parse(input)
    }
}

impl std::fmt::Display for ParameterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ParameterField {
    type Err = DomainError;

    /// Accepts the snake_case name, or the same name with dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ParameterField::ALL
            .iter()
            .find(|field| field.name() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownField(s.to_string()))
    }
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Real => "real",
            FieldKind::Boolean => "boolean",
        }
    }

    pub fn parse(&self, input: &str) -> Result<FieldValue, FieldParseError> {
        let trimmed = input.trim();
        match self {
            FieldKind::Integer => trimmed
                .parse::<i32>()
                .map(FieldValue::Integer)
                .map_err(|_| FieldParseError::NotAnInteger {
                    input: input.to_string(),
                }),
            FieldKind::Real => trimmed
                .parse::<f64>()
                .map(FieldValue::Real)
                .map_err(|_| FieldParseError::NotAReal {
                    input: input.to_string(),
                }),
            FieldKind::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(FieldValue::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(FieldValue::Boolean(false)),
                _ => Err(FieldParseError::NotABoolean {
                    input: input.to_string(),
                }),
            },
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Real(_) => FieldKind::Real,
            FieldValue::Boolean(_) => FieldKind::Boolean,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str() {
        assert_eq!(
            "sparse_forward".parse::<ParameterField>().unwrap(),
            ParameterField::SparseForward
        );
        assert_eq!(
            "Print-Level".parse::<ParameterField>().unwrap(),
            ParameterField::PrintLevel
        );
        assert!(matches!(
            "max_iter".parse::<ParameterField>(),
            Err(DomainError::UnknownField(_))
        ));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ParameterField::Iterations.kind(), FieldKind::Integer);
        assert_eq!(ParameterField::Tolerance.kind(), FieldKind::Real);
        assert_eq!(ParameterField::SparseReverse.kind(), FieldKind::Boolean);
        assert_eq!(ParameterField::PrintLevel.kind(), FieldKind::Integer);
    }

    #[test]
    fn test_integer_parse() {
        assert_eq!(
            ParameterField::Iterations.parse_value(" 50 "),
            Ok(FieldValue::Integer(50))
        );
        // Negative values are not the collector's concern
        assert_eq!(
            ParameterField::Iterations.parse_value("-3"),
            Ok(FieldValue::Integer(-3))
        );
        assert!(matches!(
            ParameterField::Iterations.parse_value("1.5"),
            Err(FieldParseError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn test_real_parse() {
        assert_eq!(
            ParameterField::Tolerance.parse_value("1e-4"),
            Ok(FieldValue::Real(1e-4))
        );
        assert!(matches!(
            ParameterField::Tolerance.parse_value("abc"),
            Err(FieldParseError::NotAReal { .. })
        ));
    }

    #[test]
    fn test_boolean_parse() {
        for input in ["true", "YES", "on", "1"] {
            assert_eq!(FieldKind::Boolean.parse(input), Ok(FieldValue::Boolean(true)));
        }
        for input in ["false", "No", "off", "0"] {
            assert_eq!(FieldKind::Boolean.parse(input), Ok(FieldValue::Boolean(false)));
        }
        assert!(matches!(
            FieldKind::Boolean.parse("maybe"),
            Err(FieldParseError::NotABoolean { .. })
        ));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(FieldValue::Integer(100).to_string(), "100");
        assert_eq!(FieldValue::Real(1e-3).to_string(), "0.001");
        assert_eq!(FieldValue::Boolean(false).to_string(), "false");
    }
}
