//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use punch_core::ReminderConfig;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the roster, session snapshot, and time logs.
    pub data_dir: PathBuf,

    /// Minutes of tracking before the watch loop asks if you are still working.
    pub reminder_interval_minutes: u32,

    /// Minutes the reminder prompt waits before clocking out on its own.
    pub reminder_timeout_minutes: u32,

    /// Wall-clock gap, in minutes, treated as a suspend rather than a slow tick.
    pub suspend_gap_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir,
            reminder_interval_minutes: 60,
            reminder_timeout_minutes: 15,
            suspend_gap_minutes: 5,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PUNCH_*)
        figment = figment.merge(Env::prefixed("PUNCH_"));

        figment.extract()
    }

    /// Path to the project roster file.
    pub fn projects_path(&self) -> PathBuf {
        self.data_dir.join("projects.json")
    }

    /// Path to the active-session snapshot file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("SessionState.json")
    }

    /// Directory holding the weekly time log partitions.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Reminder schedule derived from the configured minutes.
    pub fn reminder(&self) -> ReminderConfig {
        ReminderConfig {
            interval: TimeDelta::minutes(i64::from(self.reminder_interval_minutes)),
            prompt_timeout: TimeDelta::minutes(i64::from(self.reminder_timeout_minutes)),
        }
    }

    /// Wall-clock gap beyond which a missed tick counts as a suspend.
    pub fn suspend_gap(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.suspend_gap_minutes))
    }
}

/// Returns the platform-specific config directory for punch.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("punch"))
}

/// Returns the platform-specific data directory for punch.
///
/// On Linux: `~/.local/share/punch`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("punch"))
}
