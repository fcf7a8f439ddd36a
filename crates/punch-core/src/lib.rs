//! Core domain logic for the punch time tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Sessions: the Idle/Active state machine and every transition into and
//!   out of it (clock-in, clock-out, switch, reminder, suspend)
//! - Entries: completed time entries, duration edits, and overlap detection
//! - The roster: projects, their tasks, and the overhead fallback
//!
//! Persistence is abstracted behind the [`store`] traits; the file-backed
//! implementations live in `punch-store`.

mod engine;
pub mod entry;
pub mod reconcile;
pub mod roster;
pub mod session;
pub mod store;

pub use engine::{
    EngineError, ReminderConfig, ReminderPrompt, ResumeNotice, Selection, SessionEngine,
    SwitchOutcome,
};
pub use entry::{EntryKey, LogEntry, format_hhmm, format_hhmmss, rounded_minutes};
pub use reconcile::{apply_duration_edit, overlap_flags};
pub use roster::{OVERHEAD, Project, Roster, RosterError, Task};
pub use session::{ClockOutReason, Session};
pub use store::{LogStore, SessionStore, StoreError, UpdateOutcome};
