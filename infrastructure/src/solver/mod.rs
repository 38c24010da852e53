//! Solver gateway adapters
//!
//! - [`process::ProcessSolverGateway`] — runs an external solver executable
//! - [`dry_run::DryRunSolverGateway`] — shows what would be sent, runs nothing

pub mod dry_run;
pub mod process;

use trajopt_domain::OptimizationRequest;

/// Environment variable carrying the rendered IPOPT options to a solver process
pub const OPTIONS_ENV_VAR: &str = "TRAJOPT_IPOPT_OPTIONS";

/// The seven request fields as command-line arguments, in call order.
pub fn positional_args(request: &OptimizationRequest) -> [String; 7] {
    [
        request.iterations.to_string(),
        request.tolerance.to_string(),
        request.adaptive_mu_strategy.to_string(),
        request.hessian_approximation.to_string(),
        request.sparse_forward.to_string(),
        request.sparse_reverse.to_string(),
        request.print_level.to_string(),
    ]
}
