//! The periodic writer that keeps the shared clock value fresh.

use crate::common::{Priority, TaskKind, TaskState};
use crate::components::handle::{Pause, TaskControl, TaskHandle};
use crate::output::OutputSink;
use crate::state::SharedClockState;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the updater did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdaterReport {
    pub updates: u64,
    pub failures: u64,
}

/// Recomputes the shared value once per `interval` until stopped.
pub struct Updater {
    state: SharedClockState,
    sink: OutputSink,
    interval: Duration,
}

impl Updater {
    pub fn new(state: SharedClockState, sink: OutputSink, interval: Duration) -> Self {
        Self {
            state,
            sink,
            interval,
        }
    }

    /// Spawns the update loop as its own task.
    pub fn spawn(self, priority: Priority) -> TaskHandle<UpdaterReport> {
        TaskHandle::spawn(TaskKind::Updater, priority, move |control| self.run(control))
    }

    async fn run(self, mut control: TaskControl) -> UpdaterReport {
        control.set_state(TaskState::Running);
        let banner = format!("Time Updater Thread started (Priority: {})", control.priority());
        if let Err(e) = self.sink.line(&banner) {
            warn!("Failed to write to output: {}", e);
        }

        let mut report = UpdaterReport::default();
        loop {
            if control.stop_requested() {
                debug!("Stop flag observed; leaving update loop");
                break;
            }
            // A failed update has already been logged; the next tick retries.
            match self.state.update().await {
                Ok(()) => report.updates += 1,
                Err(_) => report.failures += 1,
            }
            if control.pause(self.interval).await == Pause::Cancelled {
                info!("Time updater thread interrupted");
                break;
            }
        }

        debug!(
            "Updater finished after {} updates ({} failed)",
            report.updates, report.failures
        );
        control.set_state(TaskState::Stopped);
        report
    }
}
