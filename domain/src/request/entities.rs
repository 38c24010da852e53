//! Optimization request value object

use super::field::{FieldValue, ParameterField};
use super::validation::{RequestIssue, RequestIssueCode};
use serde::{Deserialize, Serialize};

/// Highest verbosity level IPOPT accepts for `print_level`.
pub const MAX_PRINT_LEVEL: i32 = 12;

/// Solver parameters for one invocation (Value Object)
///
/// Built fresh each time the user triggers a recalculation, consumed by
/// exactly one solver call and then discarded. Field order matches the
/// positional order of the external solver call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationRequest {
    /// Solver iteration cap
    pub iterations: i32,
    /// Convergence tolerance
    pub tolerance: f64,
    /// Use the adaptive barrier parameter strategy
    pub adaptive_mu_strategy: bool,
    /// Use a limited-memory Hessian approximation
    pub hessian_approximation: bool,
    /// Forward-mode sparse derivatives
    pub sparse_forward: bool,
    /// Reverse-mode sparse derivatives
    pub sparse_reverse: bool,
    /// Solver verbosity
    pub print_level: i32,
}

impl Default for OptimizationRequest {
    fn default() -> Self {
        Self {
            iterations: 100,
            tolerance: 1e-3,
            adaptive_mu_strategy: true,
            hessian_approximation: true,
            sparse_forward: true,
            sparse_reverse: true,
            print_level: 0,
        }
    }
}

impl OptimizationRequest {
    // ==================== Builder Methods ====================

    pub fn with_iterations(mut self, iterations: i32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_adaptive_mu_strategy(mut self, enabled: bool) -> Self {
        self.adaptive_mu_strategy = enabled;
        self
    }

    pub fn with_hessian_approximation(mut self, enabled: bool) -> Self {
        self.hessian_approximation = enabled;
        self
    }

    pub fn with_sparse_forward(mut self, enabled: bool) -> Self {
        self.sparse_forward = enabled;
        self
    }

    pub fn with_sparse_reverse(mut self, enabled: bool) -> Self {
        self.sparse_reverse = enabled;
        self
    }

    pub fn with_print_level(mut self, level: i32) -> Self {
        self.print_level = level;
        self
    }

    // ==================== Field Access ====================

    /// Read one field as a typed value.
    pub fn get(&self, field: ParameterField) -> FieldValue {
        match field {
            ParameterField::Iterations => FieldValue::Integer(self.iterations),
            ParameterField::Tolerance => FieldValue::Real(self.tolerance),
            ParameterField::AdaptiveMuStrategy => FieldValue::Boolean(self.adaptive_mu_strategy),
            ParameterField::HessianApproximation => {
                FieldValue::Boolean(self.hessian_approximation)
            }
            ParameterField::SparseForward => FieldValue::Boolean(self.sparse_forward),
            ParameterField::SparseReverse => FieldValue::Boolean(self.sparse_reverse),
            ParameterField::PrintLevel => FieldValue::Integer(self.print_level),
        }
    }

    /// Write one field. Returns `false` (and changes nothing) when the
    /// value's kind does not match the field's kind.
    pub fn set(&mut self, field: ParameterField, value: FieldValue) -> bool {
        match (field, value) {
            (ParameterField::Iterations, FieldValue::Integer(v)) => self.iterations = v,
            (ParameterField::Tolerance, FieldValue::Real(v)) => self.tolerance = v,
            (ParameterField::AdaptiveMuStrategy, FieldValue::Boolean(v)) => {
                self.adaptive_mu_strategy = v
            }
            (ParameterField::HessianApproximation, FieldValue::Boolean(v)) => {
                self.hessian_approximation = v
            }
            (ParameterField::SparseForward, FieldValue::Boolean(v)) => self.sparse_forward = v,
            (ParameterField::SparseReverse, FieldValue::Boolean(v)) => self.sparse_reverse = v,
            (ParameterField::PrintLevel, FieldValue::Integer(v)) => self.print_level = v,
            _ => return false,
        }
        true
    }

    /// All fields paired with their current values, in call order.
    pub fn fields(&self) -> impl Iterator<Item = (ParameterField, FieldValue)> + '_ {
        ParameterField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    // ==================== Validation ====================

    /// Out-of-domain values the solver would have to reject or clamp.
    ///
    /// Empty when the request is within the solver's documented ranges.
    pub fn issues(&self) -> Vec<RequestIssue> {
        let mut issues = Vec::new();

        if self.iterations <= 0 {
            issues.push(RequestIssue::new(
                RequestIssueCode::NonPositiveIterations,
                format!("iterations must be positive (got {})", self.iterations),
            ));
        }

        if !self.tolerance.is_finite() {
            issues.push(RequestIssue::new(
                RequestIssueCode::NonFiniteTolerance,
                format!("tolerance must be finite (got {})", self.tolerance),
            ));
        } else if self.tolerance <= 0.0 {
            issues.push(RequestIssue::new(
                RequestIssueCode::NonPositiveTolerance,
                format!("tolerance must be positive (got {})", self.tolerance),
            ));
        }

        if !(0..=MAX_PRINT_LEVEL).contains(&self.print_level) {
            issues.push(RequestIssue::new(
                RequestIssueCode::PrintLevelOutOfRange,
                format!(
                    "print_level must be between 0 and {} (got {})",
                    MAX_PRINT_LEVEL, self.print_level
                ),
            ));
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }
}
