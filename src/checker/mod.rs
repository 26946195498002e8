//! Debounced availability checking.
//!
//! Every input change bumps a session-scoped sequence counter. A qualifying
//! change opens a debounce window anchored at the change and spawns a task
//! that sleeps until it closes, re-reads the counter, and no-ops if another
//! change superseded it, so a burst of edits issues exactly one probe call,
//! for the final value. In-flight calls are never cancelled; their outcomes
//! carry the sequence number they were spawned under and are discarded at
//! apply time when that number is no longer current.

use crate::config::AvailabilityConfig;
use crate::error::CheckError;
use crate::remote::{AvailabilityProbe, AvailabilityVerdict};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const OUTCOME_BUFFER: usize = 32;

/// Canonical state of the availability aspect. The surface renders from
/// this, never the other way around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckState {
    Idle,
    Pending { seq: u64 },
    Resolved { available: bool, message: String },
    Failed(CheckError),
}

/// Result of one probe call, tagged with the input-change sequence current
/// when it was scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub seq: u64,
    pub value: String,
    pub result: Result<AvailabilityVerdict, CheckError>,
}

/// Owns the debounce timer, the sequence counter, and the canonical
/// [`CheckState`]. All mutation goes through `&mut self`.
pub struct DebouncedChecker {
    probe: Arc<dyn AvailabilityProbe>,
    seq: Arc<AtomicU64>,
    state: CheckState,
    outcomes_tx: mpsc::Sender<CheckOutcome>,
    outcomes_rx: mpsc::Receiver<CheckOutcome>,
    debounce: Duration,
    min_query_chars: usize,
    enabled: bool,
    latest_task: Option<JoinHandle<()>>,
}

impl DebouncedChecker {
    #[must_use]
    pub fn new(config: &AvailabilityConfig, probe: Arc<dyn AvailabilityProbe>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::channel(OUTCOME_BUFFER);
        Self {
            probe,
            seq: Arc::new(AtomicU64::new(0)),
            state: CheckState::Idle,
            outcomes_tx,
            outcomes_rx,
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_chars: config.min_query_chars,
            enabled: config.enabled,
            latest_task: None,
        }
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Register an input change. Must be called from within a Tokio runtime.
    ///
    /// The counter bumps on every change, qualifying or not; that is what
    /// invalidates in-flight work for older values. Sub-threshold input
    /// clears the check state without issuing anything.
    pub fn input_changed(&mut self, value: &str) {
        let trimmed = value.trim();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.enabled {
            return;
        }

        if trimmed.chars().count() < self.min_query_chars {
            self.state = CheckState::Idle;
            debug!(seq, "input below query threshold; check state cleared");
            return;
        }

        self.state = CheckState::Pending { seq };
        let probe = Arc::clone(&self.probe);
        let counter = Arc::clone(&self.seq);
        let tx = self.outcomes_tx.clone();
        let value = trimmed.to_string();
        // The window is anchored here, not at the task's first poll.
        let deadline = tokio::time::Instant::now() + self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if counter.load(Ordering::SeqCst) != seq {
                debug!(seq, "debounce superseded before firing");
                return;
            }
            debug!(seq, value = %value, "issuing availability check");
            let result = probe.check(&value).await;
            let _ = tx.send(CheckOutcome { seq, value, result }).await;
        });

        // Older tasks are left to finish on their own: a sleeping one no-ops
        // on the counter check, an in-flight call completes and its outcome
        // is discarded on apply. Only the newest task can still match the
        // counter, so that is the one Drop has to abort.
        self.latest_task = Some(handle);
    }

    /// Wait for the next probe outcome. This does not apply it; callers
    /// pass the outcome through [`DebouncedChecker::apply`].
    pub async fn next_outcome(&mut self) -> Option<CheckOutcome> {
        self.outcomes_rx.recv().await
    }

    /// Non-blocking variant of [`DebouncedChecker::next_outcome`].
    pub fn poll_outcome(&mut self) -> Option<CheckOutcome> {
        self.outcomes_rx.try_recv().ok()
    }

    /// Apply an outcome iff its sequence number is still current. Returns
    /// whether the state changed; stale outcomes are dropped.
    pub fn apply(&mut self, outcome: CheckOutcome) -> bool {
        let current = self.seq.load(Ordering::SeqCst);
        if outcome.seq != current {
            debug!(
                outcome_seq = outcome.seq,
                current,
                value = %outcome.value,
                "discarding stale check outcome"
            );
            return false;
        }
        self.state = match outcome.result {
            Ok(AvailabilityVerdict { available, message }) => {
                CheckState::Resolved { available, message }
            }
            Err(error) => {
                warn!(%error, value = %outcome.value, "availability check failed");
                CheckState::Failed(error)
            }
        };
        true
    }
}

impl Drop for DebouncedChecker {
    fn drop(&mut self) {
        if let Some(handle) = self.latest_task.take() {
            handle.abort();
        }
    }
}
