//! Invoker parameters: how a solve is admitted and bounded.
//!
//! [`InvokerConfig`] groups the static parameters that control
//! [`SolverInvoker`](crate::use_cases::invoke_solver::SolverInvoker).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use trajopt_domain::ValidationPolicy;

/// Invocation control parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Whether out-of-domain requests are rejected before the solver runs.
    pub validation: ValidationPolicy,
    /// Upper bound on a single solve. `None` waits as long as the solver does.
    pub timeout: Option<Duration>,
}

impl InvokerConfig {
    // ==================== Builder Methods ====================

    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a config with a timeout specified in seconds.
    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        self.with_timeout(Some(Duration::from_secs(seconds)))
    }
}
