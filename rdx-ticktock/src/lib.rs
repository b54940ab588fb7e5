//! # Ticktock
//!
//! A two-task clock built on tokio.
//!
//! One task, the **updater**, recomputes the current time and date once per
//! tick and stores it in a shared value. A second task, the **display**,
//! reads that value once per tick and prints it, completing on its own after a
//! fixed number of prints. A **coordinator** starts both, waits for the
//! display, then stops the updater with a bounded wait.
//!
//! ## Core Concepts
//!
//! - **SharedClockState**: the only shared mutable value. Every update
//!   replaces the whole reading under a lock, so a read never sees half of
//!   one update and half of another.
//! - **Interruptible waits**: both tasks sleep between iterations in a
//!   `tokio::select!` against a cancellation signal, so a stop takes effect
//!   promptly instead of after a full tick.
//! - **Priority hints**: each task is started with an advisory priority that
//!   is reported and traced but never relied on for ordering.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ticktock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClockConfig {
//!         max_displays: 3,
//!         ..Default::default()
//!     };
//!     let coordinator = ClockCoordinator::new(config)?;
//!     let summary = coordinator.run().await?;
//!     println!("shown {} values", summary.display.shown);
//!     Ok(())
//! }
//! ```

pub const APP_NAME: &str = "Ticktock";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod output;
pub mod state;

/// A prelude module for easy importing of the most common Ticktock types.
pub mod prelude {
    pub use crate::common::{Priority, TaskKind, TaskState};
    pub use crate::components::display::{Display, DisplayReport};
    pub use crate::components::handle::TaskHandle;
    pub use crate::components::updater::{Updater, UpdaterReport};
    pub use crate::config::ClockConfig;
    pub use crate::coordinator::{ClockCoordinator, RunSummary};
    pub use crate::error::ClockError;
    pub use crate::events::ClockEvent;
    pub use crate::output::OutputSink;
    pub use crate::state::{ClockFormat, SharedClockState, SystemTimeSource, TimeSource};
}
