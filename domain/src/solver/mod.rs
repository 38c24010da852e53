//! Solver boundary value objects.
//!
//! - [`options::IpoptOptions`] — the options text derived from a request
//! - [`report::SolverReport`] — the opaque text a solver returns

pub mod options;
pub mod report;
