//! The active-session snapshot.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::roster::{Project, Task};

/// Why a session was clocked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockOutReason {
    /// The user asked to clock out.
    Manual,
    /// The still-working prompt was declined or went unanswered.
    ReminderTimeout,
    /// The machine went to sleep while the session was active.
    Suspend,
    /// The session was closed as the first half of a project switch.
    Switch,
}

impl ClockOutReason {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::ReminderTimeout => "reminder timeout",
            Self::Suspend => "suspend",
            Self::Switch => "switch",
        }
    }
}

impl std::fmt::Display for ClockOutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of the interval currently being tracked.
///
/// The project/task fields are frozen copies taken at clock-in time, so later
/// roster edits or selection changes cannot alter which entity receives the
/// logged time. The snapshot is also the persisted crash-recovery record: its
/// presence in the session store means "a session is active".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub project_name: String,
    pub project_number: Option<String>,
    pub task_name: Option<String>,
    pub task_number: Option<String>,
    #[serde(rename = "clockInTime")]
    pub clock_in: DateTime<Utc>,
}

impl Session {
    /// Freezes a project/task pair into a new session starting at `clock_in`.
    pub fn new(project: &Project, task: Option<&Task>, clock_in: DateTime<Utc>) -> Self {
        Self {
            project_name: project.name.clone(),
            project_number: project.number.clone(),
            task_name: task.and_then(|t| t.name.clone()),
            task_number: task.map(|t| t.number.clone()),
            clock_in,
        }
    }

    /// Time tracked so far.
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.clock_in
    }
}
