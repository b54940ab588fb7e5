//! The coordinator that owns a clock run from startup to shutdown.

use crate::common::TaskState;
use crate::components::display::{Display, DisplayReport};
use crate::components::handle::TaskHandle;
use crate::components::updater::{Updater, UpdaterReport};
use crate::config::ClockConfig;
use crate::error::ClockError;
use crate::events::ClockEvent;
use crate::output::OutputSink;
use crate::state::{SharedClockState, SystemTimeSource, TimeSource};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const BANNER_RULE: &str =
    "==================================================================";

/// The outcome of one complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub display: DisplayReport,
    /// `None` when the updater missed its join timeout.
    pub updater: Option<UpdaterReport>,
    /// The updater's last published state after the join attempt.
    pub updater_state: TaskState,
}

impl RunSummary {
    pub fn updater_stopped_in_time(&self) -> bool {
        self.updater.is_some()
    }
}

/// Starts the updater and the display over one shared value, waits for the
/// display to finish, then stops the updater with a bounded wait.
///
/// The coordinator is cheap to clone; clones share the configuration, the
/// output sink and the event channel.
#[derive(Clone)]
pub struct ClockCoordinator {
    config: Arc<ClockConfig>,
    source: Arc<dyn TimeSource>,
    sink: OutputSink,
    event_sender: broadcast::Sender<ClockEvent>,
}

impl ClockCoordinator {
    /// Creates a coordinator writing to stdout with the system time source.
    pub fn new(config: ClockConfig) -> Result<Self, ClockError> {
        config.validate()?;
        let (event_sender, _) = broadcast::channel(64);
        Ok(Self {
            source: Arc::new(SystemTimeSource::new(config.timezone)),
            config: Arc::new(config),
            sink: OutputSink::stdout(),
            event_sender,
        })
    }

    /// Replaces the source of "now".
    pub fn with_time_source(mut self, source: Arc<dyn TimeSource>) -> Self {
        self.source = source;
        self
    }

    /// Replaces the output sink.
    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// Subscribes to the `ClockEvent` stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClockEvent> {
        self.event_sender.subscribe()
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.sink.line(text) {
            warn!("Failed to write to output: {}", e);
        }
    }

    fn publish(&self, event: ClockEvent) {
        // Having no subscribers is fine.
        self.event_sender.send(event).ok();
    }

    fn started<T: Send + 'static>(&self, handle: &TaskHandle<T>) {
        info!(
            "{} task started with priority hint {}",
            handle.kind(),
            handle.priority()
        );
        self.publish(ClockEvent::TaskStarted {
            task: handle.kind(),
            priority: handle.priority(),
            timestamp: Instant::now(),
        });
    }

    /// Runs the clock to completion.
    ///
    /// This method will:
    /// 1. Print the banner and the priority configuration.
    /// 2. Spawn the updater, then the display.
    /// 3. Wait for the display without a bound.
    /// 4. Stop and cancel the updater, waiting at most the configured timeout.
    pub async fn run(&self) -> Result<RunSummary, ClockError> {
        let config = &self.config;
        info!("ClockCoordinator starting up...");

        let state = SharedClockState::new(self.source.clone(), config.clock_format());
        let updater = Updater::new(state.clone(), self.sink.clone(), config.tick_interval());
        let display = Display::new(
            state,
            self.sink.clone(),
            config.tick_interval(),
            config.max_displays,
        );

        self.say("Starting Simple Clock Application");
        self.say(BANNER_RULE);
        self.say("Thread Configuration:");
        self.say(&format!("- Display Thread Priority: {}", config.display_priority));
        self.say(&format!("- Updater Thread Priority: {}", config.updater_priority));
        self.say("");

        // The updater goes first so the display's first read is likely fresh.
        let updater = updater.spawn(config.updater_priority);
        self.started(&updater);
        let display = display.spawn(config.display_priority);
        self.started(&display);

        let display_outcome = display.join().await;
        if let Ok(report) = &display_outcome {
            self.publish(ClockEvent::DisplayCompleted {
                shown: report.shown,
            });
        }

        debug!("Display finished; stopping updater");
        updater.request_stop();
        updater.cancel();
        let updater_state = updater.state_watch();
        let updater_report = updater
            .join_timeout(config.updater_join_timeout())
            .await?;
        let updater_state = *updater_state.borrow();

        match updater_report {
            Some(report) => self.publish(ClockEvent::UpdaterStopped {
                updates: report.updates,
                state: updater_state,
            }),
            None => self.publish(ClockEvent::UpdaterJoinTimedOut),
        }

        let display_report = display_outcome?;

        self.say(BANNER_RULE);
        self.say("Clock application stopped successfully");
        self.publish(ClockEvent::Shutdown);
        info!(
            "ClockCoordinator has shut down ({} displays, updater {:?}).",
            display_report.shown, updater_state
        );

        Ok(RunSummary {
            display: display_report,
            updater: updater_report,
            updater_state,
        })
    }
}
