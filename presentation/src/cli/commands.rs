//! CLI command definitions

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use trajopt_domain::{FieldKind, FieldValue, OptimizationRequest, ValidationPolicy};

/// Output format for solver reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// The report exactly as the solver returned it
    Text,
    /// JSON object with request, report and timing
    Json,
}

impl From<OutputFormat> for trajopt_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => trajopt_domain::OutputFormat::Text,
            OutputFormat::Json => trajopt_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for trajopt-panel
#[derive(Parser, Debug)]
#[command(name = "trajopt-panel")]
#[command(author, version, about = "Control panel for an external trajectory-optimization solver")]
#[command(long_about = r#"
trajopt-panel collects seven solver parameters, runs the external trajectory
optimizer once with them, and prints the text it returns.

The solver is called as:
  <solver> [--solver-arg ...] <iterations> <tolerance> <adaptive_mu_strategy>
           <hessian_approximation> <sparse_forward> <sparse_reverse> <print_level>

Without a solver the call is shown as a dry run.

Configuration files are loaded from (in priority order):
1. TRAJOPT_* environment variables (e.g. TRAJOPT_SOLVER__COMMAND)
2. --config <path>     Explicit config file
3. ./trajopt.toml      Project-level config
4. ~/.config/trajopt-panel/config.toml   Global config

Example:
  trajopt-panel --solver trajopt-solver --iterations 50 --tolerance 1e-4
  trajopt-panel --dry-run --adaptive-mu-strategy false -o json
  trajopt-panel -i
"#)]
pub struct Cli {
    /// Solver iteration cap
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub iterations: Option<i32>,

    /// Convergence tolerance
    #[arg(long, value_name = "X", allow_hyphen_values = true)]
    pub tolerance: Option<f64>,

    /// Adaptive barrier parameter strategy
    #[arg(long, value_name = "BOOL", value_parser = parse_flag)]
    pub adaptive_mu_strategy: Option<bool>,

    /// Limited-memory Hessian approximation
    #[arg(long, value_name = "BOOL", value_parser = parse_flag)]
    pub hessian_approximation: Option<bool>,

    /// Forward-mode sparse derivatives
    #[arg(long, value_name = "BOOL", value_parser = parse_flag)]
    pub sparse_forward: Option<bool>,

    /// Reverse-mode sparse derivatives
    #[arg(long, value_name = "BOOL", value_parser = parse_flag)]
    pub sparse_reverse: Option<bool>,

    /// Solver verbosity
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub print_level: Option<i32>,

    /// Solver executable (overrides solver.command)
    #[arg(long, value_name = "CMD")]
    pub solver: Option<String>,

    /// Argument passed to the solver before the parameters (repeatable)
    #[arg(long = "solver-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,

    /// Give up on a solve after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Show the call without running a solver
    #[arg(long)]
    pub dry_run: bool,

    /// Reject out-of-range parameters before calling the solver
    #[arg(long, conflicts_with = "passthrough")]
    pub strict: bool,

    /// Send parameters to the solver unchecked
    #[arg(long)]
    pub passthrough: bool,

    /// Open the interactive panel
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and effective parameters, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Append one JSON line per invocation event to this file
    #[arg(long, value_name = "PATH")]
    pub invocation_log: Option<PathBuf>,
}

impl Cli {
    /// Overlay parameters given on the command line onto `request`.
    pub fn apply_overrides(&self, request: &mut OptimizationRequest) {
        if let Some(v) = self.iterations {
            request.iterations = v;
        }
        if let Some(v) = self.tolerance {
            request.tolerance = v;
        }
        if let Some(v) = self.adaptive_mu_strategy {
            request.adaptive_mu_strategy = v;
        }
        if let Some(v) = self.hessian_approximation {
            request.hessian_approximation = v;
        }
        if let Some(v) = self.sparse_forward {
            request.sparse_forward = v;
        }
        if let Some(v) = self.sparse_reverse {
            request.sparse_reverse = v;
        }
        if let Some(v) = self.print_level {
            request.print_level = v;
        }
    }

    /// Validation policy chosen on the command line, if any
    pub fn validation_override(&self) -> Option<ValidationPolicy> {
        if self.strict {
            Some(ValidationPolicy::Strict)
        } else if self.passthrough {
            Some(ValidationPolicy::Passthrough)
        } else {
            None
        }
    }
}

fn parse_flag(input: &str) -> Result<bool, String> {
    match FieldKind::Boolean.parse(input) {
        Ok(FieldValue::Boolean(value)) => Ok(value),
        Ok(_) => Err(format!("'{}' is not a boolean", input)),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["trajopt-panel"]).unwrap();
        let mut request = OptimizationRequest::default();
        cli.apply_overrides(&mut request);
        assert_eq!(request, OptimizationRequest::default());
        assert!(cli.validation_override().is_none());
        assert!(!cli.interactive);
    }

    #[test]
    fn test_parameter_overrides() {
        let cli = Cli::try_parse_from([
            "trajopt-panel",
            "--iterations",
            "50",
            "--tolerance",
            "1e-4",
            "--adaptive-mu-strategy",
            "false",
            "--sparse-reverse",
            "off",
            "--print-level",
            "1",
        ])
        .unwrap();

        let mut request = OptimizationRequest::default();
        cli.apply_overrides(&mut request);

        assert_eq!(
            request,
            OptimizationRequest {
                iterations: 50,
                tolerance: 1e-4,
                adaptive_mu_strategy: false,
                hessian_approximation: true,
                sparse_forward: true,
                sparse_reverse: false,
                print_level: 1,
            }
        );
    }

    #[test]
    fn test_negative_values_are_accepted() {
        let cli = Cli::try_parse_from(["trajopt-panel", "--iterations", "-5", "--passthrough"])
            .unwrap();
        assert_eq!(cli.iterations, Some(-5));
        assert_eq!(
            cli.validation_override(),
            Some(ValidationPolicy::Passthrough)
        );
    }

    #[test]
    fn test_bad_flag_value_is_rejected() {
        assert!(Cli::try_parse_from(["trajopt-panel", "--sparse-forward", "maybe"]).is_err());
    }

    #[test]
    fn test_strict_conflicts_with_passthrough() {
        assert!(Cli::try_parse_from(["trajopt-panel", "--strict", "--passthrough"]).is_err());
    }

    #[test]
    fn test_solver_args_repeat() {
        let cli = Cli::try_parse_from([
            "trajopt-panel",
            "--solver",
            "trajopt-solver",
            "--solver-arg",
            "--problem",
            "--solver-arg",
            "quadrotor",
            "-o",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.solver.as_deref(), Some("trajopt-solver"));
        assert_eq!(cli.solver_args, vec!["--problem", "quadrotor"]);
        assert!(matches!(cli.output, Some(OutputFormat::Json)));
    }
}
