//! Optimization request subdomain.
//!
//! - [`entities::OptimizationRequest`] — the seven-parameter snapshot
//! - [`field::ParameterField`] — named, typed fields and their text parsing
//! - [`validation::RequestIssue`] — out-of-domain values detected before a solve

pub mod entities;
pub mod field;
pub mod validation;
