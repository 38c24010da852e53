//! External solver process adapter
//!
//! Runs the solver as a child process:
//!
//! ```text
//! <program> [args...] <iterations> <tolerance> <adaptive_mu_strategy>
//!           <hessian_approximation> <sparse_forward> <sparse_reverse> <print_level>
//! ```
//!
//! stdout is the report. The rendered IPOPT options are also exported in
//! [`OPTIONS_ENV_VAR`] for solvers that prefer an options string.
//!
//! On Unix the child leads its own process group. Cancellation kills the
//! whole group, so helpers the solver left behind cannot keep its pipes open.

use super::{OPTIONS_ENV_VAR, positional_args};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use trajopt_application::{SolverError, SolverGateway};
use trajopt_domain::{IpoptOptions, OptimizationRequest, SolverReport};

/// How often the child is polled for exit and cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Maximum stderr kept for error messages (64 KB)
const MAX_STDERR_SIZE: usize = 64 * 1024;

/// Gateway that runs an external solver executable per solve
#[derive(Debug, Clone)]
pub struct ProcessSolverGateway {
    program: PathBuf,
    args: Vec<String>,
    name: String,
}

impl ProcessSolverGateway {
    /// Resolve `command` on `PATH` (or as a path) and build a gateway for it.
    pub fn new(command: &str) -> Result<Self, SolverError> {
        let program = which::which(command)
            .map_err(|e| SolverError::Unavailable(format!("{}: {}", command, e)))?;

        Ok(Self {
            name: command.to_string(),
            program,
            args: Vec::new(),
        })
    }

    /// Arguments placed before the positional parameters
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument list for a request (without the program).
    pub fn arguments(&self, request: &OptimizationRequest) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend(positional_args(request));
        args
    }

    fn command(&self, request: &OptimizationRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.arguments(request))
            .env(OPTIONS_ENV_VAR, IpoptOptions::from_request(request).render())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            use std::os::unix::process::CommandExt;
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        cmd
    }
}

impl SolverGateway for ProcessSolverGateway {
    fn name(&self) -> &str {
        &self.name
    }

    fn solve(
        &self,
        request: &OptimizationRequest,
        cancellation: &CancellationToken,
    ) -> Result<SolverReport, SolverError> {
        if cancellation.is_cancelled() {
            return Err(SolverError::Cancelled);
        }

        debug!(
            "Spawning solver: {} {}",
            self.program.display(),
            self.arguments(request).join(" ")
        );

        let mut child = self
            .command(request)
            .spawn()
            .map_err(|e| SolverError::Launch(format!("{}: {}", self.program.display(), e)))?;

        // Drain both pipes concurrently so a chatty solver cannot fill one and stall.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_or_cancel(&mut child, cancellation)?;
        await_drains(child.id(), [&stdout, &stderr], cancellation)?;

        let stdout = join_drain(stdout);
        let mut stderr = String::from_utf8_lossy(&join_drain(stderr)).trim().to_string();
        if stderr.len() > MAX_STDERR_SIZE {
            let mut cut = MAX_STDERR_SIZE;
            while !stderr.is_char_boundary(cut) {
                cut -= 1;
            }
            stderr.truncate(cut);
            stderr.push_str("\n... (stderr truncated)");
        }

        if !status.success() {
            return Err(SolverError::Exited {
                code: status.code(),
                stderr,
            });
        }

        if !stderr.is_empty() {
            debug!("Solver stderr: {}", stderr);
        }

        String::from_utf8(stdout)
            .map(SolverReport::new)
            .map_err(|e| SolverError::InvalidOutput(format!("stdout is not UTF-8: {}", e)))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_drain(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

/// Wait until both pipes reach EOF.
///
/// A descendant of the solver may still hold them after the solver exits. On
/// cancellation the process group is killed and the drain threads are left
/// to finish on their own.
fn await_drains(
    pid: u32,
    drains: [&Option<JoinHandle<Vec<u8>>>; 2],
    cancellation: &CancellationToken,
) -> Result<(), SolverError> {
    loop {
        if drains.iter().all(|drain| match drain {
            Some(handle) => handle.is_finished(),
            None => true,
        }) {
            return Ok(());
        }
        if cancellation.is_cancelled() {
            warn!(
                "Solver process {} exited but its output is still open, killing its process group",
                pid
            );
            kill_group(pid);
            return Err(SolverError::Cancelled);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Kill every process in the group led by `pid`.
#[cfg(unix)]
fn kill_group(pid: u32) {
    // SAFETY: kill(2) with a negative pid only signals; it touches no memory.
    unsafe {
        libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: u32) {}

/// Wait for the child to exit, killing its group if cancellation fires first.
fn wait_or_cancel(
    child: &mut Child,
    cancellation: &CancellationToken,
) -> Result<ExitStatus, SolverError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if cancellation.is_cancelled() {
                    warn!("Killing solver process {} after cancellation", child.id());
                    kill_group(child.id());
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SolverError::Cancelled);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(SolverError::Other(format!(
                    "Failed to wait for solver process: {}",
                    e
                )));
            }
        }
    }
}
