//! The triggering control.
//!
//! A [`TriggerGate`] is enabled while no invocation is in flight. Acquiring
//! it flips it to disabled in one step and hands back a [`GateGuard`]; the
//! guard re-enables the gate when dropped, whatever path drops it.

use std::sync::Arc;
use tokio::sync::watch;

/// Enabled/disabled state of the control that starts an invocation.
#[derive(Debug)]
pub struct TriggerGate {
    state: watch::Sender<bool>,
}

impl TriggerGate {
    pub fn new() -> Self {
        let (state, _) = watch::channel(true);
        Self { state }
    }

    pub fn is_enabled(&self) -> bool {
        *self.state.borrow()
    }

    /// Disable the gate if it is enabled.
    ///
    /// Returns `None` when it is already disabled, so at most one guard
    /// exists at a time.
    pub fn try_acquire(self: &Arc<Self>) -> Option<GateGuard> {
        let acquired = self.state.send_if_modified(|enabled| {
            if *enabled {
                *enabled = false;
                true
            } else {
                false
            }
        });

        acquired.then(|| GateGuard {
            gate: Arc::clone(self),
        })
    }

    /// Observe enable/disable transitions (e.g. to redraw a button).
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }

    /// Resolve once the gate is enabled.
    pub async fn wait_enabled(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|enabled| *enabled).await;
    }

    fn release(&self) {
        self.state.send_modify(|enabled| *enabled = true);
    }
}

impl Default for TriggerGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the gate disabled for as long as it lives.
#[derive(Debug)]
pub struct GateGuard {
    gate: Arc<TriggerGate>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_enabled() {
        assert!(TriggerGate::new().is_enabled());
    }

    #[test]
    fn test_acquire_disables_until_guard_drops() {
        let gate = Arc::new(TriggerGate::new());

        let guard = gate.try_acquire().expect("gate should be free");
        assert!(!gate.is_enabled());
        assert!(gate.try_acquire().is_none());

        drop(guard);
        assert!(gate.is_enabled());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_subscribers_see_transitions() {
        let gate = Arc::new(TriggerGate::new());
        let mut rx = gate.subscribe();
        assert!(*rx.borrow_and_update());

        let guard = gate.try_acquire().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());

        drop(guard);
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[tokio::test]
    async fn test_wait_enabled_resolves_after_release() {
        let gate = Arc::new(TriggerGate::new());
        let guard = gate.try_acquire().unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.wait_enabled().await })
        };

        drop(guard);
        waiter.await.unwrap();
        assert!(gate.is_enabled());
    }
}
