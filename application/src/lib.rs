//! Application layer for trajopt-panel
//!
//! This crate contains the solver invocation use case, port definitions,
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::InvokerConfig;
pub use ports::{
    display::DisplaySurface,
    invocation_logger::{InvocationEvent, InvocationLogger, NoInvocationLogger},
    parameter_source::ParameterSource,
    progress::{InvocationProgress, NoProgress},
    solver_gateway::{SolverError, SolverGateway},
};
pub use use_cases::invoke_solver::{
    SolverInvoker,
    gate::{GateGuard, TriggerGate},
    types::{Invocation, InvocationId, InvocationOutput, InvocationResult, InvokeError},
};
