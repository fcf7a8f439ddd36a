//! Completed time entries.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// A completed, persisted interval of tracked time.
///
/// Duration is always derived as `clock_out - clock_in`; it is never stored.
/// Entries are created by a clock-out and mutated only by the duration edit
/// in [`crate::reconcile`], which moves `clock_in` and sets `edited`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub project_name: String,
    pub project_number: Option<String>,
    pub task_name: Option<String>,
    pub task_number: Option<String>,
    pub notes: Option<String>,
    pub clock_in: DateTime<Utc>,
    pub clock_out: DateTime<Utc>,
    #[serde(default)]
    pub edited: bool,
}

impl LogEntry {
    /// Builds an entry from a session snapshot and its clock-out time.
    pub fn from_session(session: &Session, clock_out: DateTime<Utc>, notes: Option<String>) -> Self {
        Self {
            project_name: session.project_name.clone(),
            project_number: session.project_number.clone(),
            task_name: session.task_name.clone(),
            task_number: session.task_number.clone(),
            notes,
            clock_in: session.clock_in,
            clock_out,
            edited: false,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        self.clock_out - self.clock_in
    }

    /// The key that identifies this entry for in-place edits.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            clock_out: self.clock_out,
            project_name: self.project_name.clone(),
            task_number: self.task_number.clone(),
        }
    }
}

/// Identifies a stored entry for [`crate::store::LogStore::update_in_place`].
///
/// The engine is the only writer and holds at most one session, so a
/// (clock-out, project, task) tuple cannot refer to two different entries:
/// equal clock-out instants only arise at switch boundaries, which always
/// separate different projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey {
    pub clock_out: DateTime<Utc>,
    pub project_name: String,
    pub task_number: Option<String>,
}

impl EntryKey {
    /// Whether the given entry is the one this key names. Project names
    /// compare case-insensitively (roster identity); task numbers exactly.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        entry.clock_out == self.clock_out
            && entry.project_name.eq_ignore_ascii_case(&self.project_name)
            && entry.task_number == self.task_number
    }
}

/// Rounds a duration to whole minutes, half up.
///
/// Duration edits compare at this granularity: an edit that lands on the same
/// rounded minute as the stored duration is a no-op.
pub fn rounded_minutes(duration: TimeDelta) -> i64 {
    (duration.num_seconds() + 30).div_euclid(60)
}

/// Formats a duration as `HH:MM` for the log report.
pub fn format_hhmm(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Formats a duration as `HH:MM:SS` for elapsed-time display.
pub fn format_hhmmss(duration: TimeDelta) -> String {
    let seconds = duration.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
