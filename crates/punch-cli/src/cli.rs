//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};

/// Personal punch-clock time tracker.
///
/// Tracks work sessions against a roster of projects and writes them
/// to weekly JSON time logs.
#[derive(Debug, Parser)]
#[command(name = "punch", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clock in to a project.
    In {
        /// Project name. Falls back to the remembered selection, then overhead.
        project: Option<String>,

        /// Task number within the project.
        #[arg(short, long)]
        task: Option<String>,
    },

    /// Clock out of the current session.
    Out {
        /// Notes to attach to the time entry.
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Switch to another project, closing the current session without a gap.
    Switch {
        /// Project name to switch to.
        project: String,

        /// Task number within the project.
        #[arg(short, long)]
        task: Option<String>,
    },

    /// Show current tracking status.
    Status,

    /// Show logged time entries.
    Log {
        /// Only today's entries.
        #[arg(long)]
        today: bool,

        /// All entries on record.
        #[arg(long)]
        all: bool,

        /// Start date (inclusive), e.g. 2025-01-12.
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (inclusive), e.g. 2025-01-18.
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Emit entries as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Correct the duration of a logged entry.
    Edit {
        /// Clock-out time identifying the entry, e.g. 2025-01-15T17:30:00Z.
        #[arg(long)]
        clock_out: DateTime<Utc>,

        /// Project name of the entry.
        #[arg(long)]
        project: String,

        /// Task number of the entry, if it has one.
        #[arg(long)]
        task: Option<String>,

        /// New duration, as H:MM or whole minutes.
        duration: String,
    },

    /// Manage the project roster.
    #[command(subcommand)]
    Projects(ProjectsAction),

    /// Manage tasks within a project.
    #[command(subcommand)]
    Task(TaskAction),

    /// Track interactively with idle reminders and suspend detection.
    Watch {
        /// Project name to start on. Falls back like `punch in`.
        project: Option<String>,

        /// Task number within the project.
        #[arg(short, long)]
        task: Option<String>,
    },
}

/// Roster operations on projects.
#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// List projects.
    List {
        /// Include archived projects.
        #[arg(long)]
        archived: bool,
    },

    /// Add a project.
    Add {
        /// Project name.
        name: String,

        /// Project number, e.g. a billing code.
        #[arg(short, long)]
        number: Option<String>,
    },

    /// Archive a project so it no longer accepts new sessions.
    Archive {
        /// Project name.
        name: String,
    },

    /// Restore an archived project.
    Restore {
        /// Project name.
        name: String,
    },
}

/// Roster operations on tasks.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a task to a project.
    Add {
        /// Project name.
        project: String,

        /// Task number, e.g. 100 or 4.2.
        number: String,

        /// Human-readable task name.
        #[arg(long)]
        name: Option<String>,
    },
}
