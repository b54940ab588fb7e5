//! The bounded periodic reader that prints the shared clock value.

use crate::common::{Priority, TaskKind, TaskState};
use crate::components::handle::{Pause, TaskControl, TaskHandle};
use crate::output::OutputSink;
use crate::state::SharedClockState;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SEPARATOR: &str = "=============================================================";

/// What the display did before it completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayReport {
    /// Iterations performed; this is the total reported in the summary line.
    pub shown: u32,
    /// Iterations whose line could not be written to the sink.
    pub failed: u32,
}

/// Reads and prints the shared value once per `interval`, `max_displays` times.
pub struct Display {
    state: SharedClockState,
    sink: OutputSink,
    interval: Duration,
    max_displays: u32,
}

impl Display {
    pub fn new(
        state: SharedClockState,
        sink: OutputSink,
        interval: Duration,
        max_displays: u32,
    ) -> Self {
        Self {
            state,
            sink,
            interval,
            max_displays,
        }
    }

    /// Spawns the display loop as its own task.
    pub fn spawn(self, priority: Priority) -> TaskHandle<DisplayReport> {
        TaskHandle::spawn(TaskKind::Display, priority, move |control| self.run(control))
    }

    fn emit(&self, text: &str) {
        if let Err(e) = self.sink.line(text) {
            warn!("Error displaying time: {}", e);
        }
    }

    async fn run(self, mut control: TaskControl) -> DisplayReport {
        control.set_state(TaskState::Running);
        self.emit(&format!(
            "Time Display Thread started (Priority: {})",
            control.priority()
        ));
        self.emit(SEPARATOR);

        let mut report = DisplayReport::default();
        while report.shown < self.max_displays {
            if control.stop_requested() {
                info!("Display stop requested after {} updates", report.shown);
                break;
            }

            let text = self.state.read().await;
            let line = format!(
                "[{:>width$}/{}] Current Time: {}",
                report.shown + 1,
                self.max_displays,
                text,
                width = digits(self.max_displays)
            );
            // The iteration counts either way so the loop stays bounded.
            if let Err(e) = self.sink.line(&line) {
                warn!("Error displaying time: {}", e);
                report.failed += 1;
            }
            report.shown += 1;

            if control.pause(self.interval).await == Pause::Cancelled {
                info!("Display thread interrupted");
                break;
            }
        }

        self.emit(SEPARATOR);
        self.emit(&format!(
            "Clock display completed. Total updates shown: {}",
            report.shown
        ));
        debug!("Display finished: {:?}", report);
        control.set_state(TaskState::Completed);
        report
    }
}

fn digits(n: u32) -> usize {
    n.to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemoryWriter;
    use crate::state::tests::{new_year_2024, SteppingSource};
    use crate::state::{ClockFormat, PLACEHOLDER};
    use std::io::{self, Write};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn fresh_state() -> SharedClockState {
        SharedClockState::new(
            Arc::new(SteppingSource::new(new_year_2024(), 1)),
            ClockFormat::default(),
        )
    }

    fn time_lines(memory: &MemoryWriter) -> Vec<String> {
        memory
            .lines()
            .into_iter()
            .filter(|line| line.contains("Current Time: "))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_max_reads_without_an_updater() {
        let memory = MemoryWriter::new();
        let started = Instant::now();
        let handle = Display::new(
            fresh_state(),
            OutputSink::from_writer(memory.clone()),
            Duration::from_secs(1),
            10,
        )
        .spawn(Priority::MAX);
        let mut watch = handle.state_watch();

        let report = handle.join().await.unwrap();

        assert_eq!(report, DisplayReport { shown: 10, failed: 0 });
        assert_eq!(*watch.borrow_and_update(), TaskState::Completed);
        assert_eq!(started.elapsed(), Duration::from_secs(10));

        let lines = time_lines(&memory);
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], format!("[ 1/10] Current Time: {PLACEHOLDER}"));
        assert_eq!(lines[9], format!("[10/10] Current Time: {PLACEHOLDER}"));
        assert_eq!(
            memory.lines().last().unwrap(),
            "Clock display completed. Total updates shown: 10"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shows_values_written_between_reads() {
        let state = fresh_state();
        let memory = MemoryWriter::new();
        state.update().await.unwrap();
        let handle = Display::new(
            state.clone(),
            OutputSink::from_writer(memory.clone()),
            Duration::from_secs(1),
            2,
        )
        .spawn(Priority::MAX);

        tokio::time::sleep(Duration::from_millis(500)).await;
        state.update().await.unwrap();
        handle.join().await.unwrap();

        assert_eq!(
            time_lines(&memory),
            vec![
                "[1/2] Current Time: 10:00:00 01-01-2024",
                "[2/2] Current Time: 10:00:01 01-01-2024",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn early_stop_reports_the_partial_count() {
        let memory = MemoryWriter::new();
        let handle = Display::new(
            fresh_state(),
            OutputSink::from_writer(memory.clone()),
            Duration::from_secs(1),
            10,
        )
        .spawn(Priority::MAX);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.request_stop();
        let report = handle.join().await.unwrap();

        assert!(report.shown >= 1 && report.shown < 10);
        assert_eq!(time_lines(&memory).len() as u32, report.shown);
        assert_eq!(
            memory.lines().last().cloned(),
            Some(format!(
                "Clock display completed. Total updates shown: {}",
                report.shown
            ))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_the_wait_ends_cleanly() {
        let memory = MemoryWriter::new();
        let handle = Display::new(
            fresh_state(),
            OutputSink::from_writer(memory.clone()),
            Duration::from_secs(60),
            10,
        )
        .spawn(Priority::MAX);

        tokio::task::yield_now().await;
        handle.cancel();
        let report = handle.join().await.unwrap();
        assert_eq!(report.shown, 1);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn write_failures_do_not_stop_the_loop() {
        let handle = Display::new(
            fresh_state(),
            OutputSink::from_writer(BrokenPipe),
            Duration::from_secs(1),
            3,
        )
        .spawn(Priority::MAX);
        let report = handle.join().await.unwrap();
        assert_eq!(report, DisplayReport { shown: 3, failed: 3 });
    }
}
