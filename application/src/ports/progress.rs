//! Progress notification port
//!
//! Defines the interface for reporting solver progress while a call is in flight.

use crate::use_cases::invoke_solver::types::InvocationId;
use std::time::Duration;
use trajopt_domain::OptimizationRequest;

/// Callback for progress updates during an invocation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, status line, etc.)
pub trait InvocationProgress: Send + Sync {
    /// Called on the interaction thread right after the control is disabled
    fn on_solve_start(&self, id: InvocationId, request: &OptimizationRequest);

    /// Called on the worker once the solver call has returned
    fn on_solve_complete(&self, id: InvocationId, success: bool, elapsed: Duration);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl InvocationProgress for NoProgress {
    fn on_solve_start(&self, _id: InvocationId, _request: &OptimizationRequest) {}
    fn on_solve_complete(&self, _id: InvocationId, _success: bool, _elapsed: Duration) {}
}
