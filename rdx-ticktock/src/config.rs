//! Defines the configuration for a clock run.
//!
//! Every field has a default, so an empty configuration reproduces the
//! classic behavior: one update and one display per second, ten displays, and
//! a two-second grace period for the updater on shutdown. Values can be
//! overridden from an optional `ticktock.toml` or from `TICKTOCK_*`
//! environment variables.

use crate::common::Priority;
use crate::error::ClockError;
use crate::state::ClockFormat;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

/// The file stem searched for in the working directory.
pub const CONFIG_FILE_STEM: &str = "ticktock";

/// The prefix for environment overrides, e.g. `TICKTOCK_MAX_DISPLAYS=5`.
pub const ENV_PREFIX: &str = "TICKTOCK";

/// The top-level configuration for a `ClockCoordinator` run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// The period of both the updater and the display loops, in milliseconds.
    pub tick_interval_ms: u64,

    /// How many values the display prints before completing on its own.
    pub max_displays: u32,

    /// How long the coordinator waits for the updater after cancelling it.
    pub updater_join_timeout_ms: u64,

    /// Priority hint for the display task.
    pub display_priority: Priority,

    /// Priority hint for the updater task.
    pub updater_priority: Priority,

    /// `chrono` format string for the time-of-day half of the value.
    pub time_format: String,

    /// `chrono` format string for the date half of the value.
    pub date_format: String,

    /// IANA timezone name (e.g. "Europe/Paris"). Local time when unset.
    pub timezone: Option<Tz>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            max_displays: 10,
            updater_join_timeout_ms: 2000,
            display_priority: Priority::MAX,
            updater_priority: Priority::MIN.raised(1),
            time_format: "%H:%M:%S".to_string(),
            date_format: "%d-%m-%Y".to_string(),
            timezone: None,
        }
    }
}

impl ClockConfig {
    /// Loads the configuration from `ticktock.toml` (if present) and the
    /// environment, then validates it.
    pub fn load() -> Result<Self, ClockError> {
        let sources = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE_STEM).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_sources(sources)
    }

    /// Deserializes and validates an already-built `config::Config`.
    pub fn from_sources(sources: config::Config) -> Result<Self, ClockError> {
        let config: ClockConfig = sources.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the coordinator cannot run with.
    pub fn validate(&self) -> Result<(), ClockError> {
        if self.tick_interval_ms == 0 {
            return Err(ClockError::InvalidConfig(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_displays == 0 {
            return Err(ClockError::InvalidConfig(
                "max_displays must be at least 1".to_string(),
            ));
        }
        for (name, priority) in [
            ("display_priority", self.display_priority),
            ("updater_priority", self.updater_priority),
        ] {
            if !priority.is_valid() {
                return Err(ClockError::InvalidConfig(format!(
                    "{name} must be within {}..={}, got {priority}",
                    Priority::MIN,
                    Priority::MAX
                )));
            }
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn updater_join_timeout(&self) -> Duration {
        Duration::from_millis(self.updater_join_timeout_ms)
    }

    pub fn clock_format(&self) -> ClockFormat {
        ClockFormat {
            time: self.time_format.clone(),
            date: self.date_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Result<ClockConfig, ClockError> {
        let sources = config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        ClockConfig::from_sources(sources)
    }

    #[test]
    fn defaults_match_the_classic_clock() {
        let config = ClockConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.max_displays, 10);
        assert_eq!(config.updater_join_timeout(), Duration::from_secs(2));
        assert_eq!(config.display_priority, Priority(10));
        assert_eq!(config.updater_priority, Priority(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_source_yields_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.max_displays, 10);
        assert_eq!(config.time_format, "%H:%M:%S");
        assert!(config.timezone.is_none());
    }

    #[test]
    fn partial_override() {
        let config = from_toml(
            r#"
            max_displays = 3
            tick_interval_ms = 250
            timezone = "Europe/Paris"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_displays, 3);
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.timezone, Some(chrono_tz::Europe::Paris));
        assert_eq!(config.date_format, "%d-%m-%Y");
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            from_toml("max_displays = 0"),
            Err(ClockError::InvalidConfig(_))
        ));
        assert!(matches!(
            from_toml("tick_interval_ms = 0"),
            Err(ClockError::InvalidConfig(_))
        ));
        assert!(matches!(
            from_toml("display_priority = 11"),
            Err(ClockError::InvalidConfig(_))
        ));
        assert!(matches!(
            from_toml("updater_priority = 0"),
            Err(ClockError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(matches!(
            from_toml(r#"timezone = "Mars/Olympus""#),
            Err(ClockError::Config(_))
        ));
    }
}
