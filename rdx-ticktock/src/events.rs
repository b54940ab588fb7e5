//! Lifecycle events broadcast by the coordinator.
//!
//! Subscribers receive these through `ClockCoordinator::subscribe_events`.
//! They mirror what the coordinator prints, in a form tests and embedding
//! applications can match on.

use crate::common::{Priority, TaskKind, TaskState};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum ClockEvent {
    /// Fired when a task has been spawned with its priority hint.
    TaskStarted {
        task: TaskKind,
        priority: Priority,
        timestamp: Instant,
    },
    /// Fired once the display has returned, by either completion path.
    DisplayCompleted { shown: u32 },
    /// Fired when the updater exits within the join timeout.
    UpdaterStopped { updates: u64, state: TaskState },
    /// Fired when the updater missed the join timeout and was abandoned.
    UpdaterJoinTimedOut,
    /// Fired last, just before `run` returns.
    Shutdown,
}
