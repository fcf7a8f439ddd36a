//! Project and task roster.
//!
//! The roster is the set of projects a session can be billed against. One
//! distinguished project, "overhead", always exists and can never be
//! archived; it is the fallback target when a clock-in names no project.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the distinguished always-present project.
pub const OVERHEAD: &str = "overhead";

/// Roster validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// The provided project name was empty or whitespace-only.
    #[error("project name cannot be empty")]
    EmptyProjectName,
    /// The provided task number was empty or whitespace-only.
    #[error("task number cannot be empty")]
    EmptyTaskNumber,
    /// A project with the same name (case-insensitive) already exists.
    #[error("a project named {0} already exists")]
    DuplicateProject(String),
    /// The task number is already taken within the project.
    #[error("project {project} already has a task numbered {number}")]
    DuplicateTask { project: String, number: String },
    /// No project with the given name exists.
    #[error("unknown project: {0}")]
    UnknownProject(String),
    /// The overhead project cannot be archived.
    #[error("the overhead project cannot be archived")]
    OverheadProtected,
}

/// A billable unit of work within a project.
///
/// Identity is the task number (a free-form billing code, unique within the
/// owning project); the display name is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub number: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A project with its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub number: Option<String>,
    /// Soft-delete flag; archived projects cannot be clocked into.
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    /// Looks up a task by number.
    pub fn task(&self, number: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.number == number)
    }
}

/// The full project roster.
///
/// Construction goes through [`Roster::from_projects`], which guarantees the
/// overhead project is present. Persistence works on the bare project list
/// ([`Roster::projects`] out, `from_projects` back in), so a stored roster
/// can never smuggle the overhead project away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    projects: Vec<Project>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::from_projects(Vec::new())
    }
}

impl Roster {
    /// Builds a roster from loaded projects, inserting the overhead project
    /// if it is missing and clearing its archived flag if set.
    pub fn from_projects(mut projects: Vec<Project>) -> Self {
        match projects.iter_mut().find(|p| p.name.eq_ignore_ascii_case(OVERHEAD)) {
            Some(overhead) => overhead.archived = false,
            None => projects.insert(
                0,
                Project {
                    name: OVERHEAD.to_string(),
                    number: None,
                    archived: false,
                    tasks: Vec::new(),
                },
            ),
        }
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Looks up a project by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Adds a new project with an optional billing number.
    pub fn add_project(
        &mut self,
        name: &str,
        number: Option<String>,
    ) -> Result<&Project, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyProjectName);
        }
        if let Some(existing) = self.find(name) {
            return Err(RosterError::DuplicateProject(existing.name.clone()));
        }
        let index = self.projects.len();
        self.projects.push(Project {
            name: name.to_string(),
            number,
            archived: false,
            tasks: Vec::new(),
        });
        Ok(&self.projects[index])
    }

    /// Adds a task to an existing project. Task numbers are unique within
    /// their project.
    pub fn add_task(
        &mut self,
        project: &str,
        number: &str,
        name: Option<String>,
    ) -> Result<&Task, RosterError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(RosterError::EmptyTaskNumber);
        }
        let entry = self
            .projects
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(project))
            .ok_or_else(|| RosterError::UnknownProject(project.to_string()))?;
        if entry.task(number).is_some() {
            return Err(RosterError::DuplicateTask {
                project: entry.name.clone(),
                number: number.to_string(),
            });
        }
        let index = entry.tasks.len();
        entry.tasks.push(Task {
            number: number.to_string(),
            name,
        });
        Ok(&entry.tasks[index])
    }

    /// Archives a project (soft delete). Idempotent; the overhead project is
    /// protected.
    pub fn archive(&mut self, name: &str) -> Result<(), RosterError> {
        if name.eq_ignore_ascii_case(OVERHEAD) {
            return Err(RosterError::OverheadProtected);
        }
        let entry = self
            .projects
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RosterError::UnknownProject(name.to_string()))?;
        entry.archived = true;
        Ok(())
    }

    /// Clears a project's archived flag. Idempotent.
    pub fn restore(&mut self, name: &str) -> Result<(), RosterError> {
        let entry = self
            .projects
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RosterError::UnknownProject(name.to_string()))?;
        entry.archived = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roster_contains_overhead() {
        let roster = Roster::default();
        let overhead = roster.find(OVERHEAD).unwrap();
        assert_eq!(overhead.name, OVERHEAD);
        assert!(!overhead.archived);
    }

    #[test]
    fn from_projects_inserts_missing_overhead() {
        let roster = Roster::from_projects(vec![Project {
            name: "Website".to_string(),
            number: Some("1001".to_string()),
            archived: false,
            tasks: Vec::new(),
        }]);
        assert_eq!(roster.projects().len(), 2);
        assert!(roster.find("overhead").is_some());
        assert!(roster.find("Website").is_some());
    }

    #[test]
    fn from_projects_unarchives_overhead() {
        let roster = Roster::from_projects(vec![Project {
            name: "Overhead".to_string(),
            number: None,
            archived: true,
            tasks: Vec::new(),
        }]);
        let overhead = roster.find("overhead").unwrap();
        assert!(!overhead.archived);
        // The stored capitalization is kept; identity is case-insensitive.
        assert_eq!(overhead.name, "Overhead");
    }

    #[test]
    fn add_project_rejects_duplicate_names_case_insensitively() {
        let mut roster = Roster::default();
        roster.add_project("Website", None).unwrap();
        let err = roster.add_project("WEBSITE", None).unwrap_err();
        assert_eq!(err, RosterError::DuplicateProject("Website".to_string()));
    }

    #[test]
    fn add_project_rejects_blank_names() {
        let mut roster = Roster::default();
        assert_eq!(
            roster.add_project("   ", None).unwrap_err(),
            RosterError::EmptyProjectName
        );
    }

    #[test]
    fn add_project_trims_whitespace() {
        let mut roster = Roster::default();
        let project = roster.add_project("  Website  ", None).unwrap();
        assert_eq!(project.name, "Website");
    }

    #[test]
    fn add_task_enforces_unique_numbers_within_project() {
        let mut roster = Roster::default();
        roster.add_project("Website", None).unwrap();
        roster
            .add_task("Website", "100", Some("Design".to_string()))
            .unwrap();
        let err = roster.add_task("website", "100", None).unwrap_err();
        assert_eq!(
            err,
            RosterError::DuplicateTask {
                project: "Website".to_string(),
                number: "100".to_string(),
            }
        );
        // The same number is fine on a different project.
        roster.add_task("overhead", "100", None).unwrap();
    }

    #[test]
    fn add_task_to_unknown_project_fails() {
        let mut roster = Roster::default();
        let err = roster.add_task("Nope", "1", None).unwrap_err();
        assert_eq!(err, RosterError::UnknownProject("Nope".to_string()));
    }

    #[test]
    fn archive_and_restore_round_trip() {
        let mut roster = Roster::default();
        roster.add_project("Website", None).unwrap();
        roster.archive("website").unwrap();
        assert!(roster.find("Website").unwrap().archived);
        roster.restore("WEBSITE").unwrap();
        assert!(!roster.find("Website").unwrap().archived);
    }

    #[test]
    fn archive_overhead_is_rejected() {
        let mut roster = Roster::default();
        assert_eq!(
            roster.archive("Overhead").unwrap_err(),
            RosterError::OverheadProtected
        );
    }

    #[test]
    fn project_list_round_trips_as_bare_array() {
        let mut roster = Roster::default();
        roster.add_project("Website", Some("1001".to_string())).unwrap();
        let json = serde_json::to_value(roster.projects()).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);

        let parsed: Vec<Project> = serde_json::from_value(json).unwrap();
        assert_eq!(Roster::from_projects(parsed), roster);
    }
}
