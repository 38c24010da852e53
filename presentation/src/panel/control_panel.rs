//! Control panel wiring: form, trigger and display
//!
//! Pressing the trigger snapshots the form, disables the trigger and shows the
//! pending text. A delivery task then waits for the result and writes it to
//! the display, unless the panel has been torn down in the meantime. In that
//! case the delivery task drops its handle, the worker's send fails and the
//! result is discarded.

use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;
use trajopt_application::{
    DisplaySurface, InvocationId, InvokeError, SolverGateway, SolverInvoker,
};

use super::form::ParameterForm;

/// A parameter form, one trigger and one display
pub struct ControlPanel<G: SolverGateway + ?Sized + 'static> {
    form: Arc<ParameterForm>,
    invoker: Arc<SolverInvoker<G>>,
    surface: Arc<dyn DisplaySurface>,
    liveness: CancellationToken,
    current: Mutex<Option<CancellationToken>>,
    deliveries: TaskTracker,
}

impl<G: SolverGateway + ?Sized + 'static> ControlPanel<G> {
    pub fn new(
        form: Arc<ParameterForm>,
        invoker: Arc<SolverInvoker<G>>,
        surface: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            form,
            invoker,
            surface,
            liveness: CancellationToken::new(),
            current: Mutex::new(None),
            deliveries: TaskTracker::new(),
        }
    }

    pub fn form(&self) -> &Arc<ParameterForm> {
        &self.form
    }

    pub fn invoker(&self) -> &Arc<SolverInvoker<G>> {
        &self.invoker
    }

    /// Whether the trigger can be pressed
    pub fn is_enabled(&self) -> bool {
        self.invoker.gate().is_enabled()
    }

    pub fn is_torn_down(&self) -> bool {
        self.liveness.is_cancelled()
    }

    /// Press the trigger.
    ///
    /// Must be called from within a tokio runtime. Returns
    /// [`InvokeError::Busy`] while a solve is running; an invalid request is
    /// also shown on the display.
    pub fn recalculate(&self) -> Result<InvocationId, InvokeError> {
        if self.is_torn_down() {
            return Err(InvokeError::Cancelled);
        }

        let invocation = match self.invoker.trigger(self.form.as_ref()) {
            Ok(invocation) => invocation,
            Err(e @ InvokeError::InvalidRequest(_)) => {
                self.surface.show_failure(&e.to_string());
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let id = invocation.id();
        self.surface.show_pending(invocation.request());
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(invocation.cancellation_token());

        let surface = Arc::clone(&self.surface);
        let liveness = self.liveness.clone();
        self.deliveries.spawn(async move {
            tokio::select! {
                biased;
                _ = liveness.cancelled() => {
                    debug!("Panel torn down, abandoning result of {}", id);
                }
                outcome = invocation.outcome() => match outcome {
                    Ok(output) => surface.show_report(&output.report),
                    Err(e) => surface.show_failure(&e.to_string()),
                },
            }
        });

        Ok(id)
    }

    /// Cancel the running solve, if any. Returns whether one was running.
    pub fn cancel(&self) -> bool {
        if self.is_enabled() {
            return false;
        }
        match self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Wait until every pending result has reached the display or been dropped.
    pub async fn settle(&self) {
        self.deliveries.close();
        self.deliveries.wait().await;
        self.deliveries.reopen();
    }

    /// Tear the panel down. Results that arrive afterwards are discarded.
    pub fn teardown(&self) {
        self.liveness.cancel();
    }
}

impl<G: SolverGateway + ?Sized + 'static> Drop for ControlPanel<G> {
    fn drop(&mut self) {
        self.liveness.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::surface::{PanelText, TextSurface};
    use std::sync::mpsc;
    use std::time::Duration;
    use trajopt_application::SolverError;
    use trajopt_domain::{OptimizationRequest, ParameterField, SolverReport};

    /// Gateway that blocks until released, then echoes the iteration count
    struct HeldGateway {
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl HeldGateway {
        fn new() -> (Arc<Self>, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            (
                Arc::new(Self {
                    release: Mutex::new(rx),
                }),
                tx,
            )
        }
    }

    impl SolverGateway for HeldGateway {
        fn name(&self) -> &str {
            "held"
        }

        fn solve(
            &self,
            request: &OptimizationRequest,
            cancellation: &CancellationToken,
        ) -> Result<SolverReport, SolverError> {
            let release = self.release.lock().unwrap();
            loop {
                if cancellation.is_cancelled() {
                    return Err(SolverError::Cancelled);
                }
                if release.recv_timeout(Duration::from_millis(5)).is_ok() {
                    return Ok(SolverReport::new(format!(
                        "Cost = {}\n",
                        request.iterations
                    )));
                }
            }
        }
    }

    fn panel(
        gateway: Arc<HeldGateway>,
    ) -> (ControlPanel<HeldGateway>, Arc<TextSurface>) {
        let surface = Arc::new(TextSurface::new());
        let invoker = Arc::new(SolverInvoker::new(gateway));
        let panel = ControlPanel::new(
            Arc::new(ParameterForm::default()),
            invoker,
            surface.clone(),
        );
        (panel, surface)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_recalculate_shows_pending_then_report() {
        let (gateway, release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);
        panel.form().set(ParameterField::Iterations, "7").unwrap();

        panel.recalculate().unwrap();
        assert!(!panel.is_enabled());
        assert!(matches!(surface.content(), PanelText::Pending(r) if r.iterations == 7));

        release.send(()).unwrap();
        panel.settle().await;

        assert_eq!(surface.content(), PanelText::Report("Cost = 7\n".to_string()));
        assert!(panel.is_enabled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_second_press_while_running_is_busy() {
        let (gateway, release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);

        panel.recalculate().unwrap();
        assert_eq!(panel.recalculate(), Err(InvokeError::Busy));
        assert_eq!(surface.updates(), 1);

        release.send(()).unwrap();
        panel.settle().await;
        assert_eq!(surface.updates(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_edits_after_press_do_not_affect_running_solve() {
        let (gateway, release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);

        panel.recalculate().unwrap();
        panel.form().set(ParameterField::Iterations, "5").unwrap();

        release.send(()).unwrap();
        panel.settle().await;
        assert_eq!(
            surface.content(),
            PanelText::Report("Cost = 100\n".to_string())
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_request_is_shown_and_trigger_stays_enabled() {
        let (gateway, _release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);
        panel.form().set(ParameterField::Tolerance, "-1").unwrap();

        let err = panel.recalculate().unwrap_err();

        assert!(matches!(err, InvokeError::InvalidRequest(_)));
        assert!(panel.is_enabled());
        assert!(matches!(surface.content(), PanelText::Failure(m) if m.contains("tolerance")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_teardown_discards_late_result() {
        let (gateway, release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);

        panel.recalculate().unwrap();
        panel.teardown();
        panel.settle().await;

        release.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), panel.invoker().gate().wait_enabled())
            .await
            .unwrap();

        assert!(matches!(surface.content(), PanelText::Pending(_)));
        assert_eq!(panel.recalculate(), Err(InvokeError::Cancelled));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_running_solve() {
        let (gateway, _release) = HeldGateway::new();
        let (panel, surface) = panel(gateway);

        assert!(!panel.cancel());
        panel.recalculate().unwrap();
        assert!(panel.cancel());
        panel.settle().await;

        assert_eq!(surface.content(), PanelText::Failure("Solve cancelled".to_string()));
        assert!(panel.is_enabled());
    }
}
