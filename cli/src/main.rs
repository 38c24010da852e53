//! CLI entrypoint for trajopt-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use trajopt_application::{
    InvocationLogger, InvocationProgress, InvocationResult, InvokeError, NoInvocationLogger,
    NoProgress, SolverGateway, SolverInvoker,
};
use trajopt_domain::{OptimizationRequest, OutputFormat};
use trajopt_infrastructure::{
    ConfigLoader, DryRunSolverGateway, JsonlInvocationLogger, ProcessSolverGateway,
};
use trajopt_presentation::{
    Cli, ConsoleFormatter, ConsoleSurface, ControlPanel, PanelRepl, ParameterForm,
    ProgressReporter, ReplConfig, SimpleProgress,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_logging(&cli)?;

    info!("Starting trajopt-panel");

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        let mut request = config.parameters;
        cli.apply_overrides(&mut request);
        println!("Effective parameters:");
        print!("{}", ConsoleFormatter::format_request(&request));
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;
    ConsoleFormatter::set_color(config.output.color);

    let mut request = config.parameters;
    cli.apply_overrides(&mut request);

    let mut invoker_config = config.invoker_config()?;
    if let Some(policy) = cli.validation_override() {
        invoker_config = invoker_config.with_validation(policy);
    }
    if let Some(seconds) = cli.timeout {
        if seconds == 0 {
            bail!("--timeout must be at least 1 second");
        }
        invoker_config = invoker_config.with_timeout_seconds(seconds);
    }

    let format = cli
        .output
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    // === Dependency Injection ===
    let gateway: Arc<dyn SolverGateway> = if cli.dry_run {
        Arc::new(DryRunSolverGateway)
    } else {
        match cli.solver.as_ref().or(config.solver.command.as_ref()) {
            Some(command) => {
                let args = if cli.solver_args.is_empty() {
                    config.solver.args.clone()
                } else {
                    cli.solver_args.clone()
                };
                let gateway = ProcessSolverGateway::new(command)?.with_args(args);
                info!("Resolved solver '{}' to {}", command, gateway.program().display());
                Arc::new(gateway)
            }
            None => {
                warn!("No solver configured (use --solver or solver.command); doing a dry run");
                Arc::new(DryRunSolverGateway)
            }
        }
    };
    info!("Using solver '{}'", gateway.name());

    let logger: Arc<dyn InvocationLogger> = match cli
        .invocation_log
        .as_ref()
        .or(config.logging.invocation_log.as_ref())
    {
        Some(path) => match JsonlInvocationLogger::new(path) {
            Some(logger) => Arc::new(logger),
            None => Arc::new(NoInvocationLogger),
        },
        None => Arc::new(NoInvocationLogger),
    };

    let repl_config = ReplConfig::default()
        .with_show_progress(config.repl.show_progress)
        .with_history_file(config.repl.history_file.clone());
    let progress = select_progress(&cli, format, &repl_config);

    let invoker = Arc::new(
        SolverInvoker::new(gateway)
            .with_config(invoker_config)
            .with_logger(logger)
            .with_progress(progress),
    );

    // Interactive panel
    if cli.interactive {
        let panel = ControlPanel::new(
            Arc::new(ParameterForm::new(request)),
            Arc::clone(&invoker),
            Arc::new(ConsoleSurface::new()),
        );
        let repl = PanelRepl::new(panel).with_history_file(repl_config.history_file.clone());
        let result = repl.run().await;
        invoker.shutdown().await;
        result?;
        return Ok(());
    }

    // Single solve
    let result = run_once(&invoker, request).await;
    invoker.shutdown().await;

    print!("{}", ConsoleFormatter::format_result(&result, format));
    match result {
        Ok(output) => {
            if format == OutputFormat::Text && !cli.quiet {
                eprintln!("{}", ConsoleFormatter::format_summary(&output));
            }
            Ok(())
        }
        Err(e) => Err(exit_error(e)),
    }
}

/// Run one solve to completion. Ctrl-C cancels it.
///
/// Rejections (invalid request, busy control) come back as the result so
/// every failure is reported the same way.
async fn run_once(
    invoker: &SolverInvoker<dyn SolverGateway>,
    request: OptimizationRequest,
) -> InvocationResult {
    let invocation = invoker.invoke(request)?;
    let token = invocation.cancellation_token();
    let outcome = invocation.outcome();
    tokio::pin!(outcome);

    tokio::select! {
        result = &mut outcome => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling solve");
            token.cancel();
            outcome.await
        }
    }
}

/// Spinner on a terminal, plain lines otherwise, nothing for JSON or `-q`.
fn select_progress(
    cli: &Cli,
    format: OutputFormat,
    repl_config: &ReplConfig,
) -> Arc<dyn InvocationProgress> {
    if cli.quiet {
        Arc::new(NoProgress)
    } else if cli.interactive {
        // A spinner would fight the line editor for the terminal.
        if repl_config.show_progress {
            Arc::new(SimpleProgress)
        } else {
            Arc::new(NoProgress)
        }
    } else if format == OutputFormat::Json {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    }
}

fn exit_error(error: InvokeError) -> anyhow::Error {
    anyhow::Error::new(error).context("Solve did not complete")
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr, or to `--log-file` through a non-blocking writer whose
/// guard must be held until exit.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_run_invoker() -> SolverInvoker<dyn SolverGateway> {
        let gateway: Arc<dyn SolverGateway> = Arc::new(DryRunSolverGateway);
        SolverInvoker::new(gateway)
    }

    #[tokio::test]
    async fn test_run_once_returns_report() {
        let invoker = dry_run_invoker();
        let output = run_once(&invoker, OptimizationRequest::default())
            .await
            .unwrap();
        assert!(output.report.text().contains("Numeric tol"));
        invoker.shutdown().await;
    }

    #[tokio::test]
    async fn test_rejected_request_is_reported_as_json() {
        let invoker = dry_run_invoker();
        let request = OptimizationRequest::default().with_iterations(-1);

        let result = run_once(&invoker, request).await;
        assert!(matches!(result, Err(InvokeError::InvalidRequest(_))));

        let value: serde_json::Value = serde_json::from_str(&ConsoleFormatter::format_result(
            &result,
            OutputFormat::Json,
        ))
        .unwrap();
        assert_eq!(
            value["issues"][0]["message"],
            "iterations must be positive (got -1)"
        );
        assert_eq!(value["cancelled"], false);
        invoker.shutdown().await;
    }
}
