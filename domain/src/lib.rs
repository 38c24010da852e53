//! Domain layer for trajopt-panel
//!
//! This crate contains the value objects that cross the solver boundary.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Optimization Request
//!
//! The seven solver parameters, captured as an immutable snapshot at the
//! moment the user triggers a recalculation:
//!
//! - **iterations** / **tolerance**: iteration cap and convergence tolerance
//! - **adaptive_mu_strategy** / **hessian_approximation**: IPOPT strategy flags
//! - **sparse_forward** / **sparse_reverse**: CppAD sparsity modes
//! - **print_level**: solver verbosity
//!
//! ## Solver Report
//!
//! The opaque text the external solver returns. The panel never rewrites it.

pub mod config;
pub mod core;
pub mod request;
pub mod solver;

// Re-export commonly used types
pub use config::{OutputFormat, ValidationPolicy};
pub use core::error::DomainError;
pub use request::{
    entities::OptimizationRequest,
    field::{FieldKind, FieldParseError, FieldValue, ParameterField},
    validation::{RequestIssue, RequestIssueCode},
};
pub use solver::{options::IpoptOptions, report::SolverReport};
