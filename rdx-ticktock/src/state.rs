//! The shared clock value and the time source that feeds it.

use crate::error::ClockError;
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{trace, warn};

/// What `SharedClockState::read` returns before the first successful update.
pub const PLACEHOLDER: &str = "--:--:-- ----------";

/// A source of "now" with at least second resolution.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone, or in a fixed IANA timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource {
    timezone: Option<Tz>,
}

impl SystemTimeSource {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// The pair of `chrono` format strings used to render a reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFormat {
    pub time: String,
    pub date: String,
}

impl Default for ClockFormat {
    fn default() -> Self {
        Self {
            time: "%H:%M:%S".to_string(),
            date: "%d-%m-%Y".to_string(),
        }
    }
}

/// One complete, already formatted snapshot of the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    pub time_text: String,
    pub date_text: String,
}

impl ClockReading {
    /// Formats `now` with `format`. Fails without producing a partial reading.
    pub fn format(now: NaiveDateTime, format: &ClockFormat) -> Result<Self, ClockError> {
        Ok(Self {
            time_text: render(now, &format.time, "time")?,
            date_text: render(now, &format.date, "date")?,
        })
    }

    pub fn display_text(&self) -> String {
        format!("{} {}", self.time_text, self.date_text)
    }
}

fn render(
    now: NaiveDateTime,
    format: &str,
    component: &'static str,
) -> Result<String, ClockError> {
    let mut text = String::new();
    // `DelayedFormat` reports unknown specifiers as `fmt::Error`.
    write!(text, "{}", now.format(format)).map_err(|_| ClockError::Formatting {
        component,
        format: format.to_string(),
    })?;
    Ok(text)
}

/// The single mutable value shared between the updater and the display.
///
/// Cloning is cheap and yields another handle to the same value. Each
/// `update` replaces the whole reading under the write lock, so a `read` sees
/// either the previous reading or the new one, never a mix.
#[derive(Clone)]
pub struct SharedClockState {
    reading: Arc<RwLock<Option<ClockReading>>>,
    source: Arc<dyn TimeSource>,
    format: Arc<ClockFormat>,
}

impl SharedClockState {
    pub fn new(source: Arc<dyn TimeSource>, format: ClockFormat) -> Self {
        Self {
            reading: Arc::new(RwLock::new(None)),
            source,
            format: Arc::new(format),
        }
    }

    /// Computes "now" and stores it as the current reading.
    ///
    /// A formatting failure is logged and returned; the stored reading is left
    /// untouched.
    pub async fn update(&self) -> Result<(), ClockError> {
        let now = self.source.now();
        let next = match ClockReading::format(now, &self.format) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Error updating time: {}", e);
                return Err(e);
            }
        };
        trace!("Clock updated to {}", next.display_text());
        *self.reading.write().await = Some(next);
        Ok(())
    }

    /// Returns `"<time> <date>"`, or [`PLACEHOLDER`] before the first update.
    pub async fn read(&self) -> String {
        match self.reading.read().await.as_ref() {
            Some(reading) => reading.display_text(),
            None => PLACEHOLDER.to_string(),
        }
    }

    /// Returns the current reading, if any update has succeeded yet.
    pub async fn snapshot(&self) -> Option<ClockReading> {
        self.reading.read().await.clone()
    }
}
