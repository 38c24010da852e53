//! Parameter form
//!
//! Holds the values the user is editing. Edits are parsed per field kind and
//! never validated against solver ranges; that happens when a solve is
//! triggered.

use std::sync::{PoisonError, RwLock};
use trajopt_application::ParameterSource;
use trajopt_domain::{FieldParseError, FieldValue, OptimizationRequest, ParameterField};

/// Editable parameter state
#[derive(Debug)]
pub struct ParameterForm {
    values: RwLock<OptimizationRequest>,
    defaults: OptimizationRequest,
}

impl ParameterForm {
    /// Create a form whose initial and reset values are `defaults`.
    pub fn new(defaults: OptimizationRequest) -> Self {
        Self {
            values: RwLock::new(defaults),
            defaults,
        }
    }

    /// Parse `input` for `field` and store it.
    ///
    /// On a parse error the previous value is kept.
    pub fn set(&self, field: ParameterField, input: &str) -> Result<FieldValue, FieldParseError> {
        let value = field.parse_value(input)?;
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(field, value);
        Ok(value)
    }

    pub fn get(&self, field: ParameterField) -> FieldValue {
        self.snapshot().get(field)
    }

    /// Restore every field to its default.
    pub fn reset(&self) {
        *self.values.write().unwrap_or_else(PoisonError::into_inner) = self.defaults;
    }

    pub fn defaults(&self) -> &OptimizationRequest {
        &self.defaults
    }
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self::new(OptimizationRequest::default())
    }
}

impl ParameterSource for ParameterForm {
    fn snapshot(&self) -> OptimizationRequest {
        *self.values.read().unwrap_or_else(PoisonError::into_inner)
    }
}
