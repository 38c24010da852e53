//! Display surface port
//!
//! Where invocation results end up. The presentation layer owns the surface
//! and decides how long it lives; the invoker never holds it.

use trajopt_domain::{OptimizationRequest, SolverReport};

/// A surface that shows the state of the most recent invocation.
pub trait DisplaySurface: Send + Sync {
    /// An invocation has started with this request.
    fn show_pending(&self, request: &OptimizationRequest);

    /// The solver returned this report. Implementations show the text as is.
    fn show_report(&self, report: &SolverReport);

    /// The invocation failed.
    fn show_failure(&self, message: &str);
}
