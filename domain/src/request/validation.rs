//! Range checks for optimization requests.
//!
//! The collector forwards whatever the fields hold. These issues let the
//! invoker reject a request eagerly instead of leaving it to the solver.

use serde::Serialize;

/// Identifies a specific out-of-domain parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestIssueCode {
    /// `iterations` is zero or negative.
    NonPositiveIterations,
    /// `tolerance` is zero or negative.
    NonPositiveTolerance,
    /// `tolerance` is NaN or infinite.
    NonFiniteTolerance,
    /// `print_level` is outside IPOPT's 0..=12.
    PrintLevelOutOfRange,
}

/// A detected issue in a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestIssue {
    pub code: RequestIssueCode,
    pub message: String,
}

impl RequestIssue {
    pub fn new(code: RequestIssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RequestIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
