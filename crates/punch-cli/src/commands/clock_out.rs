//! Clock-out command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use punch_core::{ClockOutReason, format_hhmm};

use crate::Engine;

/// Ends the active session and reports the logged entry. Clocking out while
/// idle is not an error; it just says so.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    match engine.clock_out(ClockOutReason::Manual, now, notes) {
        Some(entry) => writeln!(
            writer,
            "Clocked out of {}. Logged {}.",
            entry.project_name,
            format_hhmm(entry.duration())
        )?,
        None => writeln!(writer, "Not clocked in.")?,
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
    fn reports_the_logged_duration() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        engine.clock_in(Some("Website"), None, ts(0)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &mut engine, None, ts(90)).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Clocked out of Website. Logged 01:30.\n"
        );
        assert!(engine.session().is_none());
    }

    #[test]
    fn notes_end_up_on_the_entry() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);
        engine.clock_in(Some("Website"), None, ts(0)).unwrap();

        let mut output = Vec::new();
        run(
            &mut output,
            &mut engine,
            Some("wrote the deploy docs".to_string()),
            ts(30),
        )
        .unwrap();

        let entries = engine.query_logs(ts(-60), ts(60)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].notes.as_deref(), Some("wrote the deploy docs"));
    }

    #[test]
    fn clocking_out_while_idle_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine(&temp);

        let mut output = Vec::new();
        run(&mut output, &mut engine, None, ts(0)).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "Not clocked in.\n");
    }
}
