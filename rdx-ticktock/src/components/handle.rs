//! Spawning and supervising a single clock task.
//!
//! A task is split in two halves: the `TaskHandle` kept by the coordinator and
//! the `TaskControl` moved into the task's future. The handle can raise the
//! cooperative stop flag, deliver a cancellation signal, watch the task's
//! state and join it. The control half checks the flag, publishes state
//! changes and performs the interruptible wait between iterations.

use crate::common::{Priority, TaskKind, TaskState};
use crate::error::ClockError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument};

/// How an interruptible wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// The full period elapsed.
    Elapsed,
    /// A cancellation signal arrived during the wait.
    Cancelled,
}

/// The task-side half of a spawned clock task.
pub struct TaskControl {
    kind: TaskKind,
    priority: Priority,
    stop_requested: Arc<AtomicBool>,
    shutdown_rx: broadcast::Receiver<()>,
    state_tx: Arc<watch::Sender<TaskState>>,
}

impl TaskControl {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns `true` once the owner has called `request_stop`.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Publishes `state`. A pending stop request is never overwritten by
    /// `Running`, so a stop raised before the task first runs stays visible.
    pub fn set_state(&self, state: TaskState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state
                || (state == TaskState::Running && *current == TaskState::StopRequested)
            {
                return false;
            }
            *current = state;
            true
        });
    }

    /// Sleeps for `period` unless a cancellation signal arrives first.
    ///
    /// A signal sent before the wait begins is still observed, so a cancel
    /// that races the loop body is not lost.
    pub async fn pause(&mut self, period: Duration) -> Pause {
        tokio::select! {
            biased;
            // Any outcome, including a closed or lagged channel, means stop.
            _ = self.shutdown_rx.recv() => Pause::Cancelled,
            _ = tokio::time::sleep(period) => Pause::Elapsed,
        }
    }
}

/// The coordinator-side half of a spawned clock task.
pub struct TaskHandle<T> {
    kind: TaskKind,
    priority: Priority,
    stop_requested: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    state_tx: Arc<watch::Sender<TaskState>>,
    state_rx: watch::Receiver<TaskState>,
    join: JoinHandle<T>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Spawns `task` on the runtime, handing it the control half.
    ///
    /// The priority hint is recorded on the handle and on the task's tracing
    /// span; tokio has no task priorities, so it does not affect scheduling.
    pub fn spawn<F, Fut>(kind: TaskKind, priority: Priority, task: F) -> Self
    where
        F: FnOnce(TaskControl) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (state_tx, state_rx) = watch::channel(TaskState::Created);
        let state_tx = Arc::new(state_tx);
        let stop_requested = Arc::new(AtomicBool::new(false));

        let control = TaskControl {
            kind,
            priority,
            stop_requested: stop_requested.clone(),
            shutdown_rx,
            state_tx: state_tx.clone(),
        };
        let span = info_span!("task", name = %kind, priority = priority.get());
        let join = tokio::spawn(task(control).instrument(span));
        debug!("Spawned {} task with priority hint {}", kind, priority);

        Self {
            kind,
            priority,
            stop_requested,
            shutdown_tx,
            state_tx,
            state_rx,
            join,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The task's most recently published state.
    pub fn state(&self) -> TaskState {
        *self.state_rx.borrow()
    }

    /// A receiver that outlives the handle, for observing the final state.
    pub fn state_watch(&self) -> watch::Receiver<TaskState> {
        self.state_rx.clone()
    }

    /// Moves a live task to `StopRequested`; terminal states are kept.
    fn mark_stop_requested(&self) {
        self.state_tx.send_if_modified(|current| match current {
            TaskState::Created | TaskState::Running => {
                *current = TaskState::StopRequested;
                true
            }
            _ => false,
        });
    }

    /// Raises the cooperative stop flag. Idempotent.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.mark_stop_requested();
    }

    /// Interrupts the task's current or next `pause`.
    pub fn cancel(&self) {
        self.mark_stop_requested();
        // No receiver means the task has already returned.
        self.shutdown_tx.send(()).ok();
    }

    /// Waits for the task without a bound.
    pub async fn join(self) -> Result<T, ClockError> {
        let task = self.kind;
        self.join
            .await
            .map_err(|source| ClockError::TaskFailed { task, source })
    }

    /// Waits up to `limit` for the task. On timeout the task is aborted
    /// best-effort and `Ok(None)` is returned.
    pub async fn join_timeout(mut self, limit: Duration) -> Result<Option<T>, ClockError> {
        let outcome = tokio::time::timeout(limit, &mut self.join).await;
        match outcome {
            Ok(Ok(output)) => Ok(Some(output)),
            Ok(Err(source)) => Err(ClockError::TaskFailed {
                task: self.kind,
                source,
            }),
            Err(_) => {
                warn!(
                    "{} task did not stop within {:?}; abandoning it",
                    self.kind, limit
                );
                self.join.abort();
                Ok(None)
            }
        }
    }
}
