//! Active-session snapshot persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use punch_core::{Session, SessionStore, StoreError};

/// Stores the active-session snapshot as a single JSON file.
///
/// File presence is the Active/Idle signal: the snapshot is written on
/// clock-in and deleted on clock-out, so a crash while clocked in leaves
/// the file behind for recovery. A corrupt snapshot reads as "no session"
/// rather than wedging startup.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        crate::write_json(&self.path, session)
    }

    fn load(&self) -> Result<Option<Session>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session snapshot unreadable; treating as no session"
                );
                Ok(None)
            }
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
