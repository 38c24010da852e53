//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use trajopt_application::InvokerConfig;
use trajopt_domain::{OptimizationRequest, OutputFormat, ValidationPolicy};

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("solver.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("solver.command cannot be empty")]
    EmptySolverCommand,

    #[error("solver.validation must be \"strict\" or \"passthrough\" (got \"{0}\")")]
    UnknownValidationPolicy(String),
}

/// Raw solver configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSolverConfig {
    /// Solver executable (name on PATH or a path). Unset means dry run.
    pub command: Option<String>,
    /// Arguments placed before the seven positional parameters
    pub args: Vec<String>,
    /// Upper bound on a single solve
    pub timeout_seconds: Option<u64>,
    /// "strict" or "passthrough"
    pub validation: String,
}

impl Default for FileSolverConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_seconds: None,
            validation: ValidationPolicy::default().as_str().to_string(),
        }
    }
}

impl FileSolverConfig {
    pub fn parse_validation(&self) -> Result<ValidationPolicy, ConfigValidationError> {
        self.validation
            .parse()
            .map_err(|_| ConfigValidationError::UnknownValidationPolicy(self.validation.clone()))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

/// Raw interactive panel configuration from TOML (`[repl]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show progress while a solve is running
    pub show_progress: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file that receives one record per invocation event
    pub invocation_log: Option<PathBuf>,
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Initial values for the seven panel fields
    pub parameters: OptimizationRequest,
    /// External solver settings
    pub solver: FileSolverConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Interactive panel settings
    pub repl: FileReplConfig,
    /// Structured logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.solver.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if let Some(command) = &self.solver.command
            && command.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptySolverCommand);
        }

        self.solver.parse_validation()?;

        Ok(())
    }

    /// Build the invoker configuration from the `[solver]` section
    pub fn invoker_config(&self) -> Result<InvokerConfig, ConfigValidationError> {
        Ok(InvokerConfig::default()
            .with_validation(self.solver.parse_validation()?)
            .with_timeout(self.solver.timeout()))
    }
}
