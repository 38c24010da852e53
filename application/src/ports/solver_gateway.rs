//! Solver Gateway port
//!
//! Defines the single call into the external trajectory optimizer.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use trajopt_domain::{OptimizationRequest, SolverReport};

/// Errors that can occur during a solver call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to launch solver: {0}")]
    Launch(String),

    #[error("Solver exited with {}: {stderr}", describe_exit(.code))]
    Exited { code: Option<i32>, stderr: String },

    #[error("Solver produced invalid output: {0}")]
    InvalidOutput(String),

    #[error("Solver call cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Gateway to the external optimization routine
///
/// `solve` blocks for as long as the solver runs; the invoker calls it on a
/// dedicated blocking worker. The seven request fields are handed over in
/// positional order: iterations, tolerance, adaptive_mu_strategy,
/// hessian_approximation, sparse_forward, sparse_reverse, print_level.
///
/// Implementations should poll `cancellation` where they can and return
/// [`SolverError::Cancelled`] once it fires.
pub trait SolverGateway: Send + Sync {
    /// Short human-readable name used in logs
    fn name(&self) -> &str;

    /// Run one solve and return the solver's text unmodified
    fn solve(
        &self,
        request: &OptimizationRequest,
        cancellation: &CancellationToken,
    ) -> Result<SolverReport, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_display() {
        let err = SolverError::Exited {
            code: Some(2),
            stderr: "bad option".to_string(),
        };
        assert_eq!(err.to_string(), "Solver exited with code 2: bad option");

        let err = SolverError::Exited {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(err.to_string(), "Solver exited with a signal: ");
    }
}
