//! Use cases (application services)
//!
//! - [`invoke_solver`] — gate, run and deliver one solver call

pub mod invoke_solver;
