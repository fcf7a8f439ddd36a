//! File-backed persistence for the punch time tracker.
//!
//! Everything lives under one data directory as plain JSON:
//! - `projects.json`: the project roster, a bare array of projects
//! - `SessionState.json`: the active-session snapshot, present only while
//!   clocked in
//! - `logs/TimeLog_<start>_to_<end>.json`: completed entries, one file per
//!   calendar week
//!
//! All writes go through [`write_json`], which writes a temp file in the
//! target directory and renames it into place, so an interrupted write never
//! leaves a truncated file behind.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use punch_core::StoreError;
use serde::Serialize;

mod log;
mod roster;
mod session;

pub use log::FileLogStore;
pub use roster::{load_roster, save_roster};
pub use session::FileSessionStore;

/// Serializes `value` as pretty JSON and writes it to `path` atomically,
/// creating parent directories as needed.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    // Rename is atomic on the same filesystem, so the temp file must live in
    // the target directory.
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
