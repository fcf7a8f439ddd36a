//! Roster commands for projects.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use punch_store::save_roster;

use crate::Engine;

/// Lists projects with their numbers and tasks. Archived projects are
/// hidden unless asked for.
pub fn list<W: Write>(writer: &mut W, engine: &Engine, archived: bool) -> Result<()> {
    for project in engine.roster().projects() {
        if project.archived && !archived {
            continue;
        }
        let mut line = project.name.clone();
        if let Some(number) = &project.number {
            line.push_str(&format!(" [{number}]"));
        }
        if project.archived {
            line.push_str(" (archived)");
        }
        writeln!(writer, "{line}")?;
        for task in &project.tasks {
            match &task.name {
                Some(name) => writeln!(writer, "  task {}: {name}", task.number)?,
                None => writeln!(writer, "  task {}", task.number)?,
            }
        }
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    roster_path: &Path,
    name: &str,
    number: Option<String>,
) -> Result<()> {
    let name = engine.roster_mut().add_project(name, number)?.name.clone();
    save_roster(roster_path, engine.roster())?;
    writeln!(writer, "Added project {name}.")?;
    Ok(())
}

/// Archiving keeps the project's history and only blocks new sessions; a
/// session already running on it is unaffected.
pub fn archive<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    roster_path: &Path,
    name: &str,
) -> Result<()> {
    engine.roster_mut().archive(name)?;
    save_roster(roster_path, engine.roster())?;
    writeln!(writer, "Archived {name}.")?;
    Ok(())
}

pub fn restore<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    roster_path: &Path,
    name: &str,
) -> Result<()> {
    engine.roster_mut().restore(name)?;
    save_roster(roster_path, engine.roster())?;
    writeln!(writer, "Restored {name}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use punch_core::{ReminderConfig, Roster};
    use punch_store::{FileLogStore, FileSessionStore, load_roster};
    use tempfile::TempDir;

    fn engine(temp: &TempDir) -> Engine {
        let mut roster = Roster::default();
        roster
            .add_project("Website", Some("1001".to_string()))
            .unwrap();
        roster
            .add_task("Website", "100", Some("Design".to_string()))
            .unwrap();
        Engine::new(
            roster,
            FileLogStore::new(temp.path().join("logs")),
            FileSessionStore::new(temp.path().join("SessionState.json")),
            ReminderConfig::default(),
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn list_shows_numbers_and_tasks() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp);

        let mut output = Vec::new();
        list(&mut output, &engine, false).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "overhead\nWebsite [1001]\n  task 100: Design\n"
        );
    }

    #[test]
    fn archived_projects_are_hidden_by_default() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        engine.roster_mut().archive("Website").unwrap();

        let mut hidden = Vec::new();
        list(&mut hidden, &engine, false).unwrap();
        assert_eq!(String::from_utf8(hidden).unwrap(), "overhead\n");

        let mut shown = Vec::new();
        list(&mut shown, &engine, true).unwrap();
        assert!(
            String::from_utf8(shown)
                .unwrap()
                .contains("Website [1001] (archived)")
        );
    }

    #[test]
    fn add_persists_the_roster() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let path = temp.path().join("projects.json");

        let mut output = Vec::new();
        add(&mut output, &mut engine, &path, "Mobile App", None).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Added project Mobile App.\n");
        let stored = load_roster(&path).unwrap();
        assert!(stored.find("Mobile App").is_some());
    }

    #[test]
    fn archive_and_restore_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let path = temp.path().join("projects.json");

        let mut output = Vec::new();
        archive(&mut output, &mut engine, &path, "website").unwrap();
        assert!(load_roster(&path).unwrap().find("Website").unwrap().archived);

        restore(&mut output, &mut engine, &path, "website").unwrap();
        assert!(!load_roster(&path).unwrap().find("Website").unwrap().archived);
    }

    #[test]
    fn overhead_cannot_be_archived() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        let path = temp.path().join("projects.json");

        let mut output = Vec::new();
        let err = archive(&mut output, &mut engine, &path, "overhead").unwrap_err();

        assert!(err.to_string().contains("overhead"));
        assert!(!path.exists());
    }
}
