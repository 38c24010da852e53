//! Invoke Solver use case
//!
//! Runs one solver call per trigger, off the interaction thread.
//!
//! # Discipline
//!
//! ```text
//! trigger ──▶ snapshot ──▶ validate ──▶ disable gate ──▶ spawn worker
//!                                                            │
//!                                        spawn_blocking(gateway.solve)
//!                                                            │
//!                          re-enable gate ◀── solver returns ┘
//!                                │
//!                                └──▶ send result (dropped if nobody listens)
//! ```
//!
//! The gate is disabled synchronously inside [`SolverInvoker::invoke`], before
//! the worker exists, and re-enabled by a guard owned by the worker. The guard
//! is released before the result is sent, so whoever receives a result sees
//! the control enabled again.

pub mod gate;
pub mod types;

use crate::config::InvokerConfig;
use crate::ports::invocation_logger::{InvocationEvent, InvocationLogger, NoInvocationLogger};
use crate::ports::parameter_source::ParameterSource;
use crate::ports::progress::{InvocationProgress, NoProgress};
use crate::ports::solver_gateway::SolverGateway;
use gate::{GateGuard, TriggerGate};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use trajopt_domain::{OptimizationRequest, SolverReport};
use types::{Invocation, InvocationId, InvocationOutput, InvocationResult, InvokeError};

/// Use case for invoking the external solver
pub struct SolverInvoker<G: SolverGateway + ?Sized + 'static> {
    gateway: Arc<G>,
    gate: Arc<TriggerGate>,
    config: InvokerConfig,
    logger: Arc<dyn InvocationLogger>,
    progress: Arc<dyn InvocationProgress>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    next_id: AtomicU64,
}

impl<G: SolverGateway + ?Sized + 'static> SolverInvoker<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            gate: Arc::new(TriggerGate::new()),
            config: InvokerConfig::default(),
            logger: Arc::new(NoInvocationLogger),
            progress: Arc::new(NoProgress),
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_config(mut self, config: InvokerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn InvocationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn InvocationProgress>) -> Self {
        self.progress = progress;
        self
    }

    /// Share a gate with another surface (e.g. a second button bound to the same solve).
    pub fn with_gate(mut self, gate: Arc<TriggerGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn gate(&self) -> &Arc<TriggerGate> {
        &self.gate
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Number of workers that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Snapshot the collector and start one invocation.
    pub fn trigger(&self, source: &dyn ParameterSource) -> Result<Invocation, InvokeError> {
        self.invoke(source.snapshot())
    }

    /// Start one invocation with an explicit request.
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// gate is already disabled when this returns `Ok`.
    pub fn invoke(&self, request: OptimizationRequest) -> Result<Invocation, InvokeError> {
        if self.shutdown.is_cancelled() {
            return Err(InvokeError::Cancelled);
        }

        if self.config.validation.is_strict() {
            let issues = request.issues();
            if !issues.is_empty() {
                warn!("Rejecting request with {} issue(s)", issues.len());
                self.logger.log(InvocationEvent::new(
                    "invocation_rejected",
                    json!({
                        "request": request,
                        "issues": issues,
                    }),
                ));
                return Err(InvokeError::InvalidRequest(issues));
            }
        }

        let guard = self.gate.try_acquire().ok_or_else(|| {
            debug!("Trigger ignored: control is disabled");
            InvokeError::Busy
        })?;

        let id = InvocationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let cancellation = self.shutdown.child_token();
        let (sender, receiver) = oneshot::channel();

        info!(
            "Invocation {} started with {} (iterations={}, tolerance={}, print_level={})",
            id,
            self.gateway.name(),
            request.iterations,
            request.tolerance,
            request.print_level
        );
        self.logger.log(InvocationEvent::new(
            "invocation_started",
            json!({
                "id": id.0,
                "solver": self.gateway.name(),
                "request": request,
            }),
        ));
        self.progress.on_solve_start(id, &request);

        let worker = Worker {
            id,
            request,
            gateway: Arc::clone(&self.gateway),
            timeout: self.config.timeout,
            cancellation: cancellation.clone(),
            logger: Arc::clone(&self.logger),
            progress: Arc::clone(&self.progress),
        };
        self.tracker.spawn(worker.run(guard, sender));

        Ok(Invocation::new(id, request, cancellation, receiver))
    }

    /// Cancel every outstanding invocation and wait for their workers.
    ///
    /// After this returns, further triggers fail with [`InvokeError::Cancelled`].
    pub async fn shutdown(&self) {
        info!("Shutting down invoker ({} in flight)", self.tracker.len());
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Everything one worker needs, moved onto the task.
struct Worker<G: SolverGateway + ?Sized + 'static> {
    id: InvocationId,
    request: OptimizationRequest,
    gateway: Arc<G>,
    timeout: Option<Duration>,
    cancellation: CancellationToken,
    logger: Arc<dyn InvocationLogger>,
    progress: Arc<dyn InvocationProgress>,
}

impl<G: SolverGateway + ?Sized + 'static> Worker<G> {
    async fn run(self, guard: GateGuard, sender: oneshot::Sender<InvocationResult>) {
        let started = Instant::now();
        let outcome = self.solve().await;
        let elapsed = started.elapsed();

        self.record(&outcome, elapsed);

        // The control comes back before anyone can observe the result.
        drop(guard);

        let result = outcome.map(|report| InvocationOutput {
            id: self.id,
            request: self.request,
            report,
            elapsed,
        });

        if sender.send(result).is_err() {
            debug!(
                "Invocation {} finished after its display was torn down; dropping result",
                self.id
            );
        }
    }

    async fn solve(&self) -> Result<SolverReport, InvokeError> {
        let gateway = Arc::clone(&self.gateway);
        let request = self.request;
        let token = self.cancellation.clone();
        let mut call = tokio::task::spawn_blocking(move || gateway.solve(&request, &token));

        let timeout = self.timeout;
        let deadline = async move {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            joined = &mut call => flatten(joined),
            _ = self.cancellation.cancelled() => {
                // The blocking call cannot be aborted; hold the gate until it returns.
                let _ = call.await;
                Err(InvokeError::Cancelled)
            }
            _ = deadline => {
                warn!("Invocation {} exceeded its deadline, cancelling", self.id);
                self.cancellation.cancel();
                let _ = call.await;
                Err(InvokeError::TimedOut(timeout.unwrap_or_default()))
            }
        }
    }

    fn record(&self, outcome: &Result<SolverReport, InvokeError>, elapsed: Duration) {
        match outcome {
            Ok(report) => {
                info!(
                    "Invocation {} completed in {:.3}s ({} bytes)",
                    self.id,
                    elapsed.as_secs_f64(),
                    report.text().len()
                );
                self.logger.log(InvocationEvent::new(
                    "invocation_completed",
                    json!({
                        "id": self.id.0,
                        "elapsed_ms": elapsed.as_millis() as u64,
                        "cost": report.cost(),
                        "report_bytes": report.text().len(),
                    }),
                ));
            }
            Err(e) => {
                warn!("Invocation {} failed: {}", self.id, e);
                self.logger.log(InvocationEvent::new(
                    "invocation_failed",
                    json!({
                        "id": self.id.0,
                        "elapsed_ms": elapsed.as_millis() as u64,
                        "error": e.to_string(),
                    }),
                ));
            }
        }
        self.progress
            .on_solve_complete(self.id, outcome.is_ok(), elapsed);
    }
}

fn flatten(
    joined: Result<Result<SolverReport, crate::ports::solver_gateway::SolverError>, tokio::task::JoinError>,
) -> Result<SolverReport, InvokeError> {
    match joined {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(e)) => Err(e.into()),
        Err(e) if e.is_panic() => Err(InvokeError::WorkerPanicked(panic_message(e))),
        Err(_) => Err(InvokeError::Cancelled),
    }
}

fn panic_message(err: tokio::task::JoinError) -> String {
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
