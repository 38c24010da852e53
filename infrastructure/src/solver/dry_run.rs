//! Dry-run solver: renders the call instead of making it.

use super::positional_args;
use tokio_util::sync::CancellationToken;
use trajopt_application::{SolverError, SolverGateway};
use trajopt_domain::{IpoptOptions, OptimizationRequest, SolverReport};

/// Reports the positional call and the IPOPT options a real solver would get.
pub struct DryRunSolverGateway;

impl SolverGateway for DryRunSolverGateway {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn solve(
        &self,
        request: &OptimizationRequest,
        cancellation: &CancellationToken,
    ) -> Result<SolverReport, SolverError> {
        if cancellation.is_cancelled() {
            return Err(SolverError::Cancelled);
        }

        let mut text = String::from("Dry run: no solver was executed\n\n");
        text.push_str(&format!("call: {}\n\n", positional_args(request).join(" ")));
        text.push_str(&IpoptOptions::from_request(request).render());
        Ok(SolverReport::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_report() {
        let report = DryRunSolverGateway
            .solve(&OptimizationRequest::default(), &CancellationToken::new())
            .unwrap();

        assert!(report.text().starts_with("Dry run"));
        assert!(report.text().contains("call: 100 0.001 true true true true 0\n"));
        assert!(report.text().contains("Integer max_iter     100\n"));
        assert_eq!(report.cost(), None);
    }

    #[test]
    fn test_dry_run_honors_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            DryRunSolverGateway
                .solve(&OptimizationRequest::default(), &token)
                .unwrap_err(),
            SolverError::Cancelled
        );
    }
}
