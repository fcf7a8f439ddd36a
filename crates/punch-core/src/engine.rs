//! The session state machine.
//!
//! One [`SessionEngine`] instance owns the current session (if any), the
//! project roster, and both stores. Every stimulus (user commands, the
//! reminder trigger, suspend/resume) goes through its methods, and the
//! caller is responsible for serializing those calls: the CLI holds the
//! engine exclusively, and the watch loop drives it from a single `select!`.
//!
//! The engine is deliberately synchronous and clock-free: every operation
//! takes `now` from the caller, which keeps transitions deterministic under
//! test and lets a suspend handler back-date its clock-out.

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use crate::entry::{EntryKey, LogEntry};
use crate::roster::{OVERHEAD, Project, Roster, Task};
use crate::session::{ClockOutReason, Session};
use crate::store::{LogStore, SessionStore, StoreError, UpdateOutcome};

/// Errors surfaced by engine operations.
///
/// All of these are recoverable at the operation boundary; none is fatal to
/// the process. Storage failures on the clock-in/clock-out write-through
/// paths are intentionally absent: those are logged and the in-memory
/// transition completes anyway (best effort).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Clock-in found no explicit project, no selection, and no overhead
    /// project to fall back to.
    #[error("no project selected")]
    NoProjectSelected,
    /// Clock-in was called while a session is already active.
    #[error("already clocked in")]
    AlreadyActive,
    /// The named project does not exist in the roster.
    #[error("unknown project: {0}")]
    UnknownProject(String),
    /// The named project exists but is archived.
    #[error("project {0} is archived")]
    ProjectArchived(String),
    /// The project has no task with the given number.
    #[error("project {project} has no task numbered {number}")]
    UnknownTask { project: String, number: String },
    /// A duration edit named an entry that is not in the log store.
    #[error("no entry matches that clock-out, project, and task")]
    EntryNotFound,
    /// A storage operation failed where best-effort is not possible
    /// (reads and in-place updates).
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Reminder trigger timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    /// How long after a clock-in (or a confirmed prompt) the next
    /// still-working prompt is due.
    pub interval: TimeDelta,
    /// How long a prompt waits for an answer before it counts as "no".
    pub prompt_timeout: TimeDelta,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval: TimeDelta::minutes(60),
            prompt_timeout: TimeDelta::minutes(15),
        }
    }
}

/// A due still-working prompt the caller must answer within the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPrompt {
    pub project_name: String,
    /// Deadline for the answer; an unanswered prompt counts as "no".
    pub respond_by: DateTime<Utc>,
}

/// One-time notice that a suspend clocked the user out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeNotice {
    pub project_name: String,
    pub clocked_out_at: DateTime<Utc>,
}

/// What an idle clock-in without an explicit project would target.
///
/// Changing the selection never touches a live session; that requires the
/// explicit switch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub project_name: String,
    pub task_number: Option<String>,
}

/// Result of a switch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The active session was closed and a new one opened at the same
    /// instant; `closed` is the entry the old session produced.
    Switched { closed: LogEntry },
    /// Only the idle-selection pointer moved (engine was idle, or the
    /// target is the live session's own project).
    SelectionOnly,
}

/// The session state machine: Idle (no session) or Active (one session).
pub struct SessionEngine<L, S> {
    roster: Roster,
    log: L,
    sessions: S,
    session: Option<Session>,
    selection: Option<Selection>,
    reminder: ReminderConfig,
    reminder_due: Option<DateTime<Utc>>,
    resume_notice: Option<ResumeNotice>,
}

impl<L: LogStore, S: SessionStore> SessionEngine<L, S> {
    /// Constructs the engine, recovering any persisted session.
    ///
    /// A stored snapshot restores Active state as-is: elapsed time is simply
    /// `now - clockInTime` and the reminder trigger re-arms from `now`. The
    /// snapshot's own fields carry the accounting, so a project that no
    /// longer resolves against the roster loses nothing; only the
    /// idle-selection pointer is left unset. A corrupt or unreadable store
    /// reads as "no session".
    pub fn new(
        roster: Roster,
        log: L,
        sessions: S,
        reminder: ReminderConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let session = match sessions.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable; starting idle");
                None
            }
        };

        let mut reminder_due = None;
        let mut selection = None;
        if let Some(session) = &session {
            reminder_due = Some(now + reminder.interval);
            selection = roster.find(&session.project_name).map(|p| Selection {
                project_name: p.name.clone(),
                task_number: session.task_number.clone(),
            });
            tracing::info!(
                project = %session.project_name,
                clock_in = %session.clock_in,
                "recovered active session"
            );
        }

        Self {
            roster,
            log,
            sessions,
            session,
            selection,
            reminder,
            reminder_due,
            resume_notice: None,
        }
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The current idle-selection pointer.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Roster mutations go through [`Roster`]'s own validated methods; the
    /// caller persists the result.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// When the next still-working prompt is due. `None` while idle.
    pub fn reminder_due_at(&self) -> Option<DateTime<Utc>> {
        self.reminder_due
    }

    /// Starts a session on the given project (explicit name, else the idle
    /// selection, else the overhead project).
    pub fn clock_in(
        &mut self,
        project: Option<&str>,
        task: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<&Session, EngineError> {
        if self.session.is_some() {
            return Err(EngineError::AlreadyActive);
        }
        let (project, task) = self.resolve_target(project, task)?;
        let session = Session::new(project, task, now);
        self.selection = Some(Selection {
            project_name: session.project_name.clone(),
            task_number: session.task_number.clone(),
        });
        Ok(self.start_session(session, now))
    }

    /// Ends the active session, producing and persisting its log entry.
    ///
    /// A no-op returning `None` while idle, so a stale trigger firing after
    /// a manual clock-out cannot double-log. `at` is the effective clock-out
    /// time (suspend handlers back-date it); it is clamped to never precede
    /// the clock-in. Notes are kept only on manual clock-outs.
    pub fn clock_out(
        &mut self,
        reason: ClockOutReason,
        at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Option<LogEntry> {
        let session = self.session.take()?;
        let notes = match reason {
            ClockOutReason::Manual => notes.filter(|n| !n.trim().is_empty()),
            _ => None,
        };
        let entry = LogEntry::from_session(&session, at.max(session.clock_in), notes);

        if let Err(e) = self.log.append(&entry) {
            tracing::error!(
                error = %e,
                project = %entry.project_name,
                "time entry could not be persisted"
            );
        }
        if let Err(e) = self.sessions.clear() {
            tracing::warn!(error = %e, "stale session snapshot left behind");
        }
        self.reminder_due = None;
        tracing::debug!(reason = %reason, project = %entry.project_name, "clocked out");
        Some(entry)
    }

    /// Changes the tracked project.
    ///
    /// Idle, or targeting the live session's own project: moves the
    /// idle-selection pointer only. Active with a different project: closes
    /// the session and opens a new one at the exact same instant, so the two
    /// entries share a zero-gap boundary. The target is validated before
    /// anything is closed; a bad target leaves the session running.
    pub fn switch_project(
        &mut self,
        project: &str,
        task: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SwitchOutcome, EngineError> {
        let (target, task) = self.resolve_target(Some(project), task)?;
        let mut next = Session::new(target, task, now);
        self.selection = Some(Selection {
            project_name: next.project_name.clone(),
            task_number: next.task_number.clone(),
        });

        match &self.session {
            Some(current) if !current.project_name.eq_ignore_ascii_case(&next.project_name) => {}
            _ => return Ok(SwitchOutcome::SelectionOnly),
        }

        let Some(closed) = self.clock_out(ClockOutReason::Switch, now, None) else {
            return Ok(SwitchOutcome::SelectionOnly);
        };
        // Zero-gap boundary: the new session starts exactly where the old
        // entry ended, even if the clock-out was clamped.
        next.clock_in = closed.clock_out;
        self.start_session(next, closed.clock_out);
        Ok(SwitchOutcome::Switched { closed })
    }

    /// The due still-working prompt, if the trigger has fired.
    ///
    /// Returns `None` while idle or before the due time, which makes a stale
    /// trigger a safe no-op.
    pub fn due_reminder(&self, now: DateTime<Utc>) -> Option<ReminderPrompt> {
        let due = self.reminder_due?;
        let session = self.session.as_ref()?;
        if now < due {
            return None;
        }
        Some(ReminderPrompt {
            project_name: session.project_name.clone(),
            respond_by: now + self.reminder.prompt_timeout,
        })
    }

    /// Resolves a still-working prompt.
    ///
    /// "Yes" re-arms the trigger and the session continues; "no" (or an
    /// elapsed answer window, which the caller reports the same way) clocks
    /// out. Returns the entry when a clock-out happened. A response arriving
    /// after the session already ended is a no-op.
    pub fn reminder_response(
        &mut self,
        still_working: bool,
        now: DateTime<Utc>,
    ) -> Option<LogEntry> {
        self.session.as_ref()?;
        if still_working {
            self.reminder_due = Some(now + self.reminder.interval);
            return None;
        }
        self.clock_out(ClockOutReason::ReminderTimeout, now, None)
    }

    /// Machine-sleep notification: clock out back-dated to the suspend
    /// moment, so sleeping time is never billed. Records the one-time
    /// notice for [`Self::handle_resume`].
    pub fn handle_suspend(&mut self, at: DateTime<Utc>) -> Option<LogEntry> {
        let entry = self.clock_out(ClockOutReason::Suspend, at, None)?;
        self.resume_notice = Some(ResumeNotice {
            project_name: entry.project_name.clone(),
            clocked_out_at: entry.clock_out,
        });
        Some(entry)
    }

    /// Wake notification: yields the notice that the suspend clocked the
    /// user out, exactly once.
    pub fn handle_resume(&mut self) -> Option<ResumeNotice> {
        self.resume_notice.take()
    }

    /// Applies a duration edit to the stored entry matching `key`.
    pub fn edit_duration(
        &mut self,
        key: &EntryKey,
        new_duration: TimeDelta,
    ) -> Result<UpdateOutcome, EngineError> {
        let outcome = self
            .log
            .update_in_place(key, &mut |entry| {
                crate::reconcile::apply_duration_edit(entry, new_duration);
            })?;
        match outcome {
            UpdateOutcome::Missing => Err(EngineError::EntryNotFound),
            found => Ok(found),
        }
    }

    /// Completed entries fully inside `[from, to]`, ordered by clock-in.
    pub fn query_logs(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, EngineError> {
        Ok(self.log.load_range(from, to)?)
    }

    /// Write-through for a new session: persist the snapshot (best effort),
    /// arm the reminder trigger, go Active.
    fn start_session(&mut self, session: Session, now: DateTime<Utc>) -> &Session {
        if let Err(e) = self.sessions.save(&session) {
            tracing::warn!(
                error = %e,
                "session snapshot not saved; recovery after a crash will miss this session"
            );
        }
        self.reminder_due = Some(now + self.reminder.interval);
        tracing::debug!(project = %session.project_name, clock_in = %session.clock_in, "clocked in");
        self.session.insert(session)
    }

    /// Resolves a clock-in/switch target against the roster.
    ///
    /// Fallback order for a missing explicit project: idle selection, then
    /// the overhead project.
    fn resolve_target(
        &self,
        project: Option<&str>,
        task: Option<&str>,
    ) -> Result<(&Project, Option<&Task>), EngineError> {
        let (name, fallback_task) = match (project, &self.selection) {
            (Some(name), _) => (name, None),
            (None, Some(selection)) => (
                selection.project_name.as_str(),
                selection.task_number.as_deref(),
            ),
            (None, None) => (OVERHEAD, None),
        };

        let entry = match self.roster.find(name) {
            Some(entry) => entry,
            None if project.is_some() => {
                return Err(EngineError::UnknownProject(name.to_string()));
            }
            None => return Err(EngineError::NoProjectSelected),
        };
        if entry.archived {
            return Err(EngineError::ProjectArchived(entry.name.clone()));
        }

        let task = match task.or(fallback_task) {
            Some(number) => Some(entry.task(number).ok_or_else(|| EngineError::UnknownTask {
                project: entry.name.clone(),
                number: number.to_string(),
            })?),
            None => None,
        };
        Ok((entry, task))
    }
}
