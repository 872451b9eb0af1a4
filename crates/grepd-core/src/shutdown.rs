//! Draining state machine for graceful shutdown.
//!
//! The gate moves `Running → Draining → Terminated`, monotonically and
//! exactly once per process. A termination signal flips the draining flag
//! immediately — every request handler polls [`ShutdownGate::is_draining`]
//! before doing any work — and starts a one-shot grace timer. When the
//! grace period elapses the termination watch fires and the server loop's
//! graceful shutdown resolves. In-flight work is never cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

/// Observable lifecycle state of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Running,
    Draining,
    Terminated,
}

/// Process-wide shutdown gate.
///
/// Shared via `Arc` between the signal watcher and the request handlers.
pub struct ShutdownGate {
    draining: AtomicBool,
    grace: Duration,
    terminated_tx: watch::Sender<bool>,
    // Keeps the channel open even when no server loop is subscribed yet.
    _terminated_rx: watch::Receiver<bool>,
}

impl ShutdownGate {
    /// Create a gate with the given grace period.
    pub fn new(grace: Duration) -> Self {
        let (terminated_tx, _terminated_rx) = watch::channel(false);
        Self {
            draining: AtomicBool::new(false),
            grace,
            terminated_tx,
            _terminated_rx,
        }
    }

    /// The configured grace period.
    pub fn grace_period(&self) -> Duration {
        self.grace
    }

    /// Whether the process is draining (or already terminated).
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GateState {
        if *self.terminated_tx.borrow() {
            GateState::Terminated
        } else if self.is_draining() {
            GateState::Draining
        } else {
            GateState::Running
        }
    }

    /// Begin draining: flip the flag and start the grace timer.
    ///
    /// Only the first call performs the transition; it returns `true`.
    /// Subsequent calls are no-ops returning `false`. Must be called from
    /// within a tokio runtime.
    pub fn begin_drain(&self) -> bool {
        if self.draining.swap(true, Ordering::SeqCst) {
            return false;
        }

        info!(grace_secs = self.grace.as_secs_f64(), "draining started, refusing new requests");

        let tx = self.terminated_tx.clone();
        let grace = self.grace;
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            info!("grace period elapsed, terminating");
            let _ = tx.send(true);
        });
        true
    }

    /// Resolve once the grace period has elapsed after [`begin_drain`].
    ///
    /// [`begin_drain`]: ShutdownGate::begin_drain
    pub async fn terminated(&self) {
        let mut rx = self.terminated_tx.subscribe();
        // Err only if the sender is gone, which means the gate itself was
        // dropped; treat that as terminated.
        let _ = rx.wait_for(|t| *t).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_new_gate_is_running() {
        let gate = ShutdownGate::new(Duration::from_secs(15));
        assert!(!gate.is_draining());
        assert_eq!(gate.state(), GateState::Running);
    }

    #[test_log::test(tokio::test)]
    async fn test_begin_drain_transitions_once() {
        let gate = ShutdownGate::new(Duration::from_secs(60));
        assert!(gate.begin_drain());
        assert!(gate.is_draining());
        assert_eq!(gate.state(), GateState::Draining);

        // Second signal is a no-op, the flag never resets.
        assert!(!gate.begin_drain());
        assert!(gate.is_draining());
    }

    #[test_log::test(tokio::test)]
    async fn test_terminated_resolves_after_grace() {
        let gate = ShutdownGate::new(Duration::from_millis(20));
        gate.begin_drain();

        tokio::time::timeout(Duration::from_secs(2), gate.terminated())
            .await
            .expect("terminated should resolve once the grace period elapses");
        assert_eq!(gate.state(), GateState::Terminated);
    }

    #[tokio::test]
    async fn test_terminated_pending_before_grace_elapses() {
        let gate = ShutdownGate::new(Duration::from_secs(60));
        gate.begin_drain();

        let result = tokio::time::timeout(Duration::from_millis(20), gate.terminated()).await;
        assert!(result.is_err(), "must stay alive for the whole grace period");
        assert_eq!(gate.state(), GateState::Draining);
    }

    #[tokio::test]
    async fn test_draining_observed_across_tasks() {
        let gate = Arc::new(ShutdownGate::new(Duration::from_secs(60)));
        gate.begin_drain();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move { gate.is_draining() }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
    }
}
