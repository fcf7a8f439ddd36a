//! Storage traits the engine writes through.
//!
//! The engine owns one [`LogStore`] (completed entries) and one
//! [`SessionStore`] (the at-most-one crash-recovery snapshot). File-backed
//! implementations live in the `punch-store` crate; tests use in-memory ones.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entry::{EntryKey, LogEntry};
use crate::session::Session;

/// Storage failures.
///
/// Only genuine I/O and serialization failures surface here; a missing or
/// unparseable file is "no data" to the loading side, not an error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of an in-place entry update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No stored entry matched the key.
    Missing,
    /// A match was found but the mutator left it identical; nothing was
    /// written.
    Unchanged(LogEntry),
    /// The entry was rewritten in its partition.
    Updated(LogEntry),
}

/// Durable, append-friendly storage of completed time entries.
///
/// Implementations partition entries by write-time period. An entry's
/// partition never changes, even when an edit moves its effective times, so
/// range reads and updates must consider every partition.
pub trait LogStore {
    /// Appends a completed entry to the partition covering "now".
    fn append(&mut self, entry: &LogEntry) -> Result<(), StoreError>;

    /// Returns entries fully inside `[from, to]`, ordered by clock-in.
    fn load_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, StoreError>;

    /// Applies `mutator` to the entry matching `key`, rewriting its
    /// partition only if the entry actually changed.
    fn update_in_place(
        &mut self,
        key: &EntryKey,
        mutator: &mut dyn FnMut(&mut LogEntry),
    ) -> Result<UpdateOutcome, StoreError>;
}

/// Durable storage for the single in-progress session snapshot.
pub trait SessionStore {
    /// Writes the snapshot, replacing any previous one.
    fn save(&mut self, session: &Session) -> Result<(), StoreError>;

    /// Reads the snapshot if one exists.
    fn load(&self) -> Result<Option<Session>, StoreError>;

    /// Removes the snapshot; succeeds if none exists.
    fn clear(&mut self) -> Result<(), StoreError>;
}
