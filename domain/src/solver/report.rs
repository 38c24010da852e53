//! Solver report value object

use serde::{Deserialize, Serialize};

/// The text a solver returned (Value Object)
///
/// The format belongs to the solver. The panel stores and displays it
/// byte-for-byte; [`SolverReport::cost`] is a read-only convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverReport {
    text: String,
}

impl SolverReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The objective value from a `Cost = <number>` line, if the solver
    /// printed one.
    pub fn cost(&self) -> Option<f64> {
        self.text.lines().find_map(|line| {
            let rest = line.trim().strip_prefix("Cost")?;
            let value = rest.trim_start().strip_prefix('=')?;
            value.trim().parse().ok()
        })
    }
}

impl std::fmt::Display for SolverReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<String> for SolverReport {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SolverReport {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
