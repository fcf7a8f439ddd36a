//! Status command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use punch_core::format_hhmmss;

use crate::Engine;

/// Shows whether a session is running, and on what.
pub fn run<W: Write>(writer: &mut W, engine: &Engine, now: DateTime<Utc>) -> Result<()> {
    match engine.session() {
        Some(session) => {
            let started = session.clock_in.with_timezone(&Local).format("%H:%M");
            match &session.task_number {
                Some(number) => writeln!(
                    writer,
                    "Tracking {} (task {number}) since {started}.",
                    session.project_name
                )?,
                None => writeln!(
                    writer,
                    "Tracking {} since {started}.",
                    session.project_name
                )?,
            }
            writeln!(writer, "Elapsed: {}", format_hhmmss(session.elapsed(now)))?;
        }
        None => {
            writeln!(writer, "Not clocked in.")?;
            if let Some(selection) = engine.selection() {
                writeln!(writer, "Selected project: {}", selection.project_name)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeDelta, TimeZone};
    use punch_core::{ReminderConfig, Roster};
    use punch_store::{FileLogStore, FileSessionStore};
    use tempfile::TempDir;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    fn engine(temp: &TempDir) -> Engine {
        let mut roster = Roster::default();
        roster.add_project("Website", None).unwrap();
        Engine::new(
            roster,
            FileLogStore::new(temp.path().join("logs")),
            FileSessionStore::new(temp.path().join("SessionState.json")),
            ReminderConfig::default(),
            ts(0),
        )
    }

    #[test]
    fn shows_the_active_session_and_elapsed_time() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        engine.clock_in(Some("Website"), None, ts(0)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &engine, ts(125)).unwrap();

        let started = ts(0).with_timezone(&Local).format("%H:%M");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("Tracking Website since {started}.\nElapsed: 02:05:00\n")
        );
    }

    #[test]
    fn idle_status_mentions_the_selection() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        engine.clock_in(Some("Website"), None, ts(0)).unwrap();
        engine.clock_out(punch_core::ClockOutReason::Manual, ts(30), None);

        let mut output = Vec::new();
        run(&mut output, &engine, ts(60)).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Not clocked in.\nSelected project: Website\n"
        );
    }

    #[test]
    fn idle_status_without_a_selection_is_one_line() {
        let temp = TempDir::new().unwrap();
        let engine = engine(&temp);

        let mut output = Vec::new();
        run(&mut output, &engine, ts(0)).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Not clocked in.\n");
    }
}
