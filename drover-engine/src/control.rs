//! Run control shared between a job and its workers
//!
//! The job flips a single watched [`RunState`]; workers observe it at their
//! checkpoints (before every attempt and during every delay).

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Desired state of every worker of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Cancelled,
}

/// Writer side, owned by the job
#[derive(Debug, Clone)]
pub struct RunControl {
    tx: Arc<watch::Sender<RunState>>,
}

impl RunControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunState::Running);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> RunState {
        *self.tx.borrow()
    }

    /// Returns `true` if the state changed
    pub fn pause(&self) -> bool {
        self.transition(RunState::Running, RunState::Paused)
    }

    /// Returns `true` if the state changed
    pub fn resume(&self) -> bool {
        self.transition(RunState::Paused, RunState::Running)
    }

    /// Returns `true` if the state changed; cancellation is final
    pub fn cancel(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == RunState::Cancelled {
                false
            } else {
                *state = RunState::Cancelled;
                true
            }
        })
    }

    /// Creates a reader for one worker
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            rx: self.tx.subscribe(),
        }
    }

    fn transition(&self, from: RunState, to: RunState) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        })
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader side, owned by one worker
pub struct Checkpoint {
    rx: watch::Receiver<RunState>,
}

impl Checkpoint {
    pub fn state(&self) -> RunState {
        *self.rx.borrow()
    }

    /// Waits while paused; returns `false` once the job is cancelled
    pub async fn proceed(&mut self) -> bool {
        match self.rx.wait_for(|state| *state != RunState::Paused).await {
            Ok(state) => *state == RunState::Running,
            Err(_) => false,
        }
    }

    /// Sleeps for `duration`, honouring pause and cancel
    ///
    /// The deadline is fixed up front: time spent paused counts towards it,
    /// and whatever remains after a resume is still slept. Returns `false`
    /// when cancelled.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;

        loop {
            if !self.proceed().await {
                return false;
            }

            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return true,
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
            }
        }
    }
}
