//! Contains common, primitive types shared by the clock tasks.
//!
//! These are the small value types that flow between the coordinator and its
//! two tasks: which task is which, where it is in its lifecycle, and the
//! advisory priority it was started with.

use serde::Deserialize;
use std::fmt;

/// An advisory scheduling priority on the classic 1..=10 scale.
///
/// Priorities are hints only. They are recorded on the task handle, attached to
/// the task's tracing span and reported at startup, but nothing in the crate
/// relies on them for ordering or correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const NORM: Priority = Priority(5);
    pub const MAX: Priority = Priority(10);

    /// Returns the raw priority level.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns `true` if the level lies within `MIN..=MAX`.
    pub fn is_valid(self) -> bool {
        (Self::MIN..=Self::MAX).contains(&self)
    }

    /// Returns the priority `levels` steps above this one, saturating at `MAX`.
    pub fn raised(self, levels: u8) -> Priority {
        Priority(self.0.saturating_add(levels).min(Self::MAX.0))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one of the two cooperating clock tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// The periodic writer that refreshes the shared clock value.
    Updater,
    /// The bounded periodic reader that prints the shared clock value.
    Display,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Updater => f.write_str("updater"),
            TaskKind::Display => f.write_str("display"),
        }
    }
}

/// The lifecycle of a clock task.
///
/// The updater moves `Created → Running → StopRequested → Stopped`; the display
/// moves `Created → Running → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Running,
    StopRequested,
    Stopped,
    Completed,
}

impl TaskState {
    /// Returns `true` once the task's loop has exited for good.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Stopped | TaskState::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_bounds() {
        assert!(Priority::MIN.is_valid());
        assert!(Priority::MAX.is_valid());
        assert!(!Priority(0).is_valid());
        assert!(!Priority(11).is_valid());
        assert_eq!(Priority::MIN.raised(1), Priority(2));
        assert_eq!(Priority::MAX.raised(3), Priority::MAX);
    }

    #[test]
    fn terminal_states() {
        assert!(TaskState::Stopped.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(!TaskState::StopRequested.is_terminal());
        assert!(!TaskState::Running.is_terminal());
    }
}
