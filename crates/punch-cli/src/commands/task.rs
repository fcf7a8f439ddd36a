//! Roster commands for tasks.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use punch_store::save_roster;

use crate::Engine;

pub fn add<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    roster_path: &Path,
    project: &str,
    number: &str,
    name: Option<String>,
) -> Result<()> {
    let number = engine
        .roster_mut()
        .add_task(project, number, name)?
        .number
        .clone();
    save_roster(roster_path, engine.roster())?;
    let project = engine
        .roster()
        .find(project)
        .map_or(project, |p| p.name.as_str());
    writeln!(writer, "Added task {number} to {project}.")?;
    Ok(())
}
