//! Clock-in command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use crate::Engine;

/// Starts a session and reports which project received it.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    project: Option<&str>,
    task: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    let session = engine.clock_in(project, task, now)?;
    let started = session.clock_in.with_timezone(&Local).format("%H:%M");
    match &session.task_number {
        Some(number) => writeln!(
            writer,
            "Clocked in to {} (task {number}) at {started}.",
            session.project_name
        )?,
        None => writeln!(
            writer,
            "Clocked in to {} at {started}.",
            session.project_name
        )?,
    }
    Ok(())
}
