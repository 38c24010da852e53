//! Console output formatter for solver invocations

use colored::Colorize;
use serde_json::json;
use trajopt_application::{InvocationOutput, InvocationResult, InvokeError};
use trajopt_domain::{IpoptOptions, OptimizationRequest, OutputFormat};

/// Text shown while a solve is running
pub const PENDING_TEXT: &str = "Recalculating";

/// Formats requests, reports and errors for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Enable or disable ANSI colors for everything this formatter produces
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// The report exactly as the solver returned it
    pub fn format_text(output: &InvocationOutput) -> String {
        output.report.text().to_string()
    }

    /// What a single solve prints on stdout.
    ///
    /// Text output carries only the report; failures go to stderr. JSON
    /// output always yields one object, for failures too.
    pub fn format_result(result: &InvocationResult, format: OutputFormat) -> String {
        match (result, format) {
            (Ok(output), OutputFormat::Text) => Self::format_text(output),
            (Err(_), OutputFormat::Text) => String::new(),
            (Ok(output), OutputFormat::Json) => format!("{}\n", Self::format_json(output)),
            (Err(e), OutputFormat::Json) => format!("{}\n", Self::format_error_json(e)),
        }
    }

    /// One-line summary of a finished invocation
    pub fn format_summary(output: &InvocationOutput) -> String {
        let mut line = format!(
            "{} Invocation {} finished in {:.2}s",
            "v".green().bold(),
            output.id,
            output.elapsed.as_secs_f64()
        );
        if let Some(cost) = output.report.cost() {
            line.push_str(&format!(" {}", format!("(cost {})", cost).dimmed()));
        }
        line
    }

    /// Format a finished invocation as JSON
    pub fn format_json(output: &InvocationOutput) -> String {
        let value = json!({
            "id": output.id.0,
            "request": output.request,
            "report": output.report.text(),
            "cost": output.report.cost(),
            "elapsed_ms": output.elapsed.as_millis() as u64,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format a failed invocation as JSON
    pub fn format_error_json(error: &InvokeError) -> String {
        let mut value = json!({
            "error": error.to_string(),
            "cancelled": error.is_cancelled(),
        });
        if let InvokeError::InvalidRequest(issues) = error {
            value["issues"] = json!(issues);
        }
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format an error message
    pub fn format_error(error: &str) -> String {
        format!("{} {}", "Error:".red().bold(), error)
    }

    /// Text shown on the display while a solve is running
    pub fn format_pending(request: &OptimizationRequest) -> String {
        format!(
            "{}... {}",
            PENDING_TEXT.yellow().bold(),
            format!(
                "(iterations={}, tolerance={})",
                request.iterations, request.tolerance
            )
            .dimmed()
        )
    }

    /// Table of the seven parameters with their kinds
    pub fn format_request(request: &OptimizationRequest) -> String {
        let mut output = String::new();
        for (field, value) in request.fields() {
            output.push_str(&format!(
                "  {:<24} {:<8} {}\n",
                field.name().cyan(),
                field.kind().as_str().dimmed(),
                value
            ));
        }

        let issues = request.issues();
        if !issues.is_empty() {
            output.push('\n');
            for issue in issues {
                output.push_str(&format!("  {} {}\n", "!".yellow().bold(), issue.message));
            }
        }

        output
    }

    /// The options block the solver receives for this request
    pub fn format_options(request: &OptimizationRequest) -> String {
        IpoptOptions::from_request(request).render()
    }

    /// Format a header line
    pub fn header(title: &str) -> String {
        let line = "=".repeat(50);
        format!("{}\n{}\n{}", line.blue(), title.bold(), line.blue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use trajopt_application::{InvocationId, SolverError};
    use trajopt_domain::{RequestIssue, RequestIssueCode, SolverReport};

    fn output(text: &str) -> InvocationOutput {
        InvocationOutput {
            id: InvocationId(2),
            request: OptimizationRequest::default(),
            report: SolverReport::new(text),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_text_is_unmodified() {
        let text = "Elapsed seconds: 0.5\n\nCost = 3.5\n\n\u{7}";
        assert_eq!(ConsoleFormatter::format_text(&output(text)), text);
    }

    #[test]
    fn test_summary_mentions_cost() {
        colored::control::set_override(false);
        let summary = ConsoleFormatter::format_summary(&output("Cost = 3.5\n"));
        assert!(summary.contains("#2"));
        assert!(summary.contains("1.50s"));
        assert!(summary.contains("cost 3.5"));
    }

    #[test]
    fn test_json_output() {
        let json = ConsoleFormatter::format_json(&output("Cost = 3.5\n"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], 2);
        assert_eq!(value["report"], "Cost = 3.5\n");
        assert_eq!(value["cost"], 3.5);
        assert_eq!(value["elapsed_ms"], 1500);
        assert_eq!(value["request"]["iterations"], 100);
        assert_eq!(value["request"]["sparse_reverse"], true);
    }

    #[test]
    fn test_error_json_lists_issues() {
        let err = InvokeError::InvalidRequest(vec![RequestIssue::new(
            RequestIssueCode::NonPositiveIterations,
            "iterations must be positive (got 0)",
        )]);
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_error_json(&err)).unwrap();

        assert_eq!(value["cancelled"], false);
        assert_eq!(value["issues"][0]["message"], "iterations must be positive (got 0)");

        let err = InvokeError::Solver(SolverError::Launch("denied".to_string()));
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_error_json(&err)).unwrap();
        assert!(value.get("issues").is_none());
    }

    #[test]
    fn test_result_per_format() {
        let ok: InvocationResult = Ok(output("Cost = 3.5\n"));
        assert_eq!(
            ConsoleFormatter::format_result(&ok, OutputFormat::Text),
            "Cost = 3.5\n"
        );
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_result(&ok, OutputFormat::Json))
                .unwrap();
        assert_eq!(value["report"], "Cost = 3.5\n");

        let err: InvocationResult = Err(InvokeError::Busy);
        assert_eq!(ConsoleFormatter::format_result(&err, OutputFormat::Text), "");
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_result(&err, OutputFormat::Json))
                .unwrap();
        assert_eq!(value["error"], "A solve is already in progress");
    }

    #[test]
    fn test_request_table_lists_every_field() {
        colored::control::set_override(false);
        let table = ConsoleFormatter::format_request(&OptimizationRequest::default());
        for name in [
            "iterations",
            "tolerance",
            "adaptive_mu_strategy",
            "hessian_approximation",
            "sparse_forward",
            "sparse_reverse",
            "print_level",
        ] {
            assert!(table.contains(name), "missing {}", name);
        }
        assert!(!table.contains('!'));

        let table =
            ConsoleFormatter::format_request(&OptimizationRequest::default().with_iterations(0));
        assert!(table.contains("iterations must be positive"));
    }

    #[test]
    fn test_pending_text() {
        colored::control::set_override(false);
        let pending = ConsoleFormatter::format_pending(&OptimizationRequest::default());
        assert!(pending.starts_with("Recalculating..."));
    }
}
