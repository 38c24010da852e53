//! Configuration file loading for trajopt-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRAJOPT_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./trajopt.toml` or `./.trajopt.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/trajopt-panel/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig, FileReplConfig,
    FileSolverConfig,
};
pub use loader::ConfigLoader;
