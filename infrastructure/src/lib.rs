//! Infrastructure layer for trajopt-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod solver;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileSolverConfig,
};
pub use logging::JsonlInvocationLogger;
pub use solver::{
    OPTIONS_ENV_VAR, dry_run::DryRunSolverGateway, positional_args,
    process::ProcessSolverGateway,
};
