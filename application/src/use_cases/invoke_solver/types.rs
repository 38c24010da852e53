//! Types for the InvokeSolver use case.

use crate::ports::solver_gateway::SolverError;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use trajopt_domain::{OptimizationRequest, RequestIssue, SolverReport};

/// Sequence number of an invocation within one invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvocationId(pub u64);

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors that can occur when triggering or running an invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvokeError {
    #[error("A solve is already in progress")]
    Busy,

    #[error("Invalid request: {}", join_issues(.0))]
    InvalidRequest(Vec<RequestIssue>),

    #[error("Solver failed: {0}")]
    Solver(SolverError),

    #[error("Solve timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Solve cancelled")]
    Cancelled,

    #[error("Solver worker panicked: {0}")]
    WorkerPanicked(String),
}

fn join_issues(issues: &[RequestIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<SolverError> for InvokeError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::Cancelled => InvokeError::Cancelled,
            other => InvokeError::Solver(other),
        }
    }
}

impl InvokeError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }
}

/// A finished, successful invocation
#[derive(Debug, Clone)]
pub struct InvocationOutput {
    pub id: InvocationId,
    pub request: OptimizationRequest,
    pub report: SolverReport,
    pub elapsed: Duration,
}

pub type InvocationResult = Result<InvocationOutput, InvokeError>;

/// Handle to an in-flight invocation.
///
/// Holds the receiving end of a single-slot result channel. Dropping the
/// handle is how a display says it is gone: the worker's send then fails
/// and the result is discarded.
#[derive(Debug)]
pub struct Invocation {
    id: InvocationId,
    request: OptimizationRequest,
    cancellation: CancellationToken,
    receiver: oneshot::Receiver<InvocationResult>,
}

impl Invocation {
    pub(crate) fn new(
        id: InvocationId,
        request: OptimizationRequest,
        cancellation: CancellationToken,
        receiver: oneshot::Receiver<InvocationResult>,
    ) -> Self {
        Self {
            id,
            request,
            cancellation,
            receiver,
        }
    }

    pub fn id(&self) -> InvocationId {
        self.id
    }

    /// The snapshot this invocation was started with
    pub fn request(&self) -> &OptimizationRequest {
        &self.request
    }

    /// Request cancellation. The outcome becomes [`InvokeError::Cancelled`]
    /// once the gateway has returned.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Wait for the result.
    pub async fn outcome(self) -> InvocationResult {
        // A worker dropped without sending only happens when the runtime
        // tears it down.
        self.receiver.await.unwrap_or(Err(InvokeError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajopt_domain::RequestIssueCode;

    #[test]
    fn test_id_display() {
        assert_eq!(InvocationId(3).to_string(), "#3");
    }

    #[test]
    fn test_solver_cancel_maps_to_cancelled() {
        let err: InvokeError = SolverError::Cancelled.into();
        assert!(err.is_cancelled());

        let err: InvokeError = SolverError::Launch("no such file".to_string()).into();
        assert_eq!(
            err,
            InvokeError::Solver(SolverError::Launch("no such file".to_string()))
        );
    }

    #[test]
    fn test_invalid_request_display() {
        let err = InvokeError::InvalidRequest(vec![RequestIssue::new(
            RequestIssueCode::NonPositiveTolerance,
            "tolerance must be positive (got 0)",
        )]);
        assert_eq!(
            err.to_string(),
            "Invalid request: tolerance must be positive (got 0)"
        );
    }
}
