//! Progress reporting for solver invocations

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use trajopt_application::{InvocationId, InvocationProgress};
use trajopt_domain::OptimizationRequest;

/// Reports progress with a spinner per in-flight solve
pub struct ProgressReporter {
    bars: Mutex<HashMap<InvocationId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dimmed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn describe(request: &OptimizationRequest) -> String {
        format!(
            "iterations={} tolerance={} print_level={}",
            request.iterations, request.tolerance, request.print_level
        )
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl InvocationProgress for ProgressReporter {
    fn on_solve_start(&self, id: InvocationId, request: &OptimizationRequest) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Solving {}", id));
        pb.set_message(Self::describe(request));
        pb.enable_steady_tick(Duration::from_millis(100));

        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, pb);
    }

    fn on_solve_complete(&self, id: InvocationId, success: bool, elapsed: Duration) {
        let bar = self
            .bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        if let Some(pb) = bar {
            let status = if success {
                format!("{} done in {:.2}s", "v".green(), elapsed.as_secs_f64())
            } else {
                format!("{} failed after {:.2}s", "x".red(), elapsed.as_secs_f64())
            };
            pb.finish_with_message(status);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl InvocationProgress for SimpleProgress {
    fn on_solve_start(&self, id: InvocationId, request: &OptimizationRequest) {
        eprintln!(
            "{} {} ({})",
            "->".cyan(),
            format!("Solving {}", id).bold(),
            ProgressReporter::describe(request)
        );
    }

    fn on_solve_complete(&self, id: InvocationId, success: bool, elapsed: Duration) {
        if success {
            eprintln!("  {} {} ({:.2}s)", "v".green(), id, elapsed.as_secs_f64());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), id);
        }
    }
}
