//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod display;
pub mod invocation_logger;
pub mod parameter_source;
pub mod progress;
pub mod solver_gateway;
