//! Project-switch command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use punch_core::{SwitchOutcome, format_hhmm};

use crate::Engine;

/// Moves tracking to another project without a gap between the entries.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    project: &str,
    task: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    match engine.switch_project(project, task, now)? {
        SwitchOutcome::Switched { closed } => {
            writeln!(
                writer,
                "Stopped {} after {}.",
                closed.project_name,
                format_hhmm(closed.duration())
            )?;
            if let Some(session) = engine.session() {
                match &session.task_number {
                    Some(number) => writeln!(
                        writer,
                        "Now tracking {} (task {number}).",
                        session.project_name
                    )?,
                    None => writeln!(writer, "Now tracking {}.", session.project_name)?,
                }
            }
        }
        SwitchOutcome::SelectionOnly => match engine.session() {
            Some(session) => writeln!(
                writer,
                "Already tracking {}; updated the task selection.",
                session.project_name
            )?,
            None => {
                let name = engine
                    .selection()
                    .map_or(project, |s| s.project_name.as_str());
                writeln!(writer, "Selected {name}. Clock in to start tracking.")?;
            }
        },
    }
    Ok(())
}
