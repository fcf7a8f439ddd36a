//! Roster persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use punch_core::{Project, Roster, StoreError};

/// Loads the roster, or the default roster when the file does not exist yet.
///
/// A corrupt roster file is an error rather than an empty roster: silently
/// starting over would detach every project the user has, and the next save
/// would make that permanent.
pub fn load_roster(path: &Path) -> Result<Roster, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Roster::default()),
        Err(e) => return Err(e.into()),
    };
    let projects: Vec<Project> = serde_json::from_str(&content)?;
    Ok(Roster::from_projects(projects))
}

/// Saves the roster as a bare JSON array, atomically.
pub fn save_roster(path: &Path, roster: &Roster) -> Result<(), StoreError> {
    crate::write_json(path, &roster.projects())
}
