//! Error types for the clock library.
//!
//! Cancellation is deliberately absent: a cancelled wait is a normal stop, not
//! a failure.

use crate::common::TaskKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClockError {
    /// The current time could not be rendered with the configured format.
    /// The shared value keeps its previous contents.
    #[error("failed to format the current {component} with {format:?}")]
    Formatting {
        component: &'static str,
        format: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration sources could not be read or deserialized.
    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),

    /// A clock task panicked or was aborted before returning its report.
    #[error("{task} task failed")]
    TaskFailed {
        task: TaskKind,
        #[source]
        source: tokio::task::JoinError,
    },
}
