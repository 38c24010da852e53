//! Parameter source port
//!
//! The configuration collector: whatever holds the user's current field
//! values exposes them as one immutable snapshot.

use trajopt_domain::OptimizationRequest;

/// Read access to the current solver parameters.
///
/// `snapshot` is total and side-effect free: every field always has a value.
pub trait ParameterSource: Send + Sync {
    fn snapshot(&self) -> OptimizationRequest;
}

/// A fixed request is its own snapshot.
impl ParameterSource for OptimizationRequest {
    fn snapshot(&self) -> OptimizationRequest {
        *self
    }
}
