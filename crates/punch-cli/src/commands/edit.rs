//! Duration-edit command.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, TimeDelta, Utc};
use punch_core::{EntryKey, UpdateOutcome, format_hhmm};

use crate::Engine;

/// Parses a duration written as `H:MM` or as whole minutes.
pub fn parse_duration(s: &str) -> Result<TimeDelta> {
    let s = s.trim();
    let minutes = match s.split_once(':') {
        Some((hours, minutes)) => {
            let (Ok(hours), Ok(minutes)) = (hours.parse::<u32>(), minutes.parse::<u32>()) else {
                return Err(invalid(s));
            };
            if minutes >= 60 {
                anyhow::bail!("Invalid duration: {s}. Minutes must be 00-59 in H:MM form");
            }
            i64::from(hours) * 60 + i64::from(minutes)
        }
        None => match s.parse::<u32>() {
            Ok(minutes) => i64::from(minutes),
            Err(_) => return Err(invalid(s)),
        },
    };
    Ok(TimeDelta::minutes(minutes))
}

fn invalid(s: &str) -> anyhow::Error {
    anyhow::anyhow!("Invalid duration: {s}. Use H:MM (e.g., 1:30) or whole minutes (e.g., 90)")
}

/// Rewrites the duration of the stored entry matching the key. The clock-out
/// stays fixed; the clock-in moves.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &mut Engine,
    clock_out: DateTime<Utc>,
    project: &str,
    task: Option<&str>,
    duration: &str,
) -> Result<()> {
    let new_duration = parse_duration(duration)?;
    let key = EntryKey {
        clock_out,
        project_name: project.to_string(),
        task_number: task.map(str::to_string),
    };

    match engine.edit_duration(&key, new_duration)? {
        UpdateOutcome::Updated(entry) => {
            let start = entry.clock_in.with_timezone(&Local).format("%H:%M");
            writeln!(
                writer,
                "Updated {}: now {}, starting {}.",
                entry.project_name,
                format_hhmm(entry.duration()),
                start
            )?;
        }
        UpdateOutcome::Unchanged(entry) => {
            writeln!(
                writer,
                "No change: {} was already {}.",
                entry.project_name,
                format_hhmm(entry.duration())
            )?;
        }
        // edit_duration surfaces a miss as EntryNotFound
        UpdateOutcome::Missing => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use insta::assert_snapshot;
    use punch_core::{ClockOutReason, ReminderConfig, Roster};
    use punch_store::{FileLogStore, FileSessionStore};
    use tempfile::TempDir;

    #[test]
    fn parses_hours_and_minutes() {
        assert_eq!(parse_duration("1:30").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration("0:05").unwrap(), TimeDelta::minutes(5));
        assert_eq!(parse_duration("10:00").unwrap(), TimeDelta::minutes(600));
    }

    #[test]
    fn parses_bare_minutes() {
        assert_eq!(parse_duration("90").unwrap(), TimeDelta::minutes(90));
        assert_eq!(parse_duration(" 45 ").unwrap(), TimeDelta::minutes(45));
        assert_eq!(parse_duration("0").unwrap(), TimeDelta::zero());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_duration("abc").unwrap_err();
        assert_snapshot!(
            err.to_string(),
            @"Invalid duration: abc. Use H:MM (e.g., 1:30) or whole minutes (e.g., 90)"
        );
        assert!(parse_duration("-30").is_err());
        assert!(parse_duration("1:3x").is_err());
    }

    #[test]
    fn rejects_minute_overflow_in_hmm_form() {
        let err = parse_duration("1:75").unwrap_err();
        assert_snapshot!(
            err.to_string(),
            @"Invalid duration: 1:75. Minutes must be 00-59 in H:MM form"
        );
    }

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap() + TimeDelta::minutes(minutes)
    }

    fn engine_with_entry(temp: &TempDir) -> Engine {
        let mut roster = Roster::default();
        roster.add_project("Website", None).unwrap();
        let mut engine = Engine::new(
            roster,
            FileLogStore::new(temp.path().join("logs")),
            FileSessionStore::new(temp.path().join("SessionState.json")),
            ReminderConfig::default(),
            ts(0),
        );
        engine.clock_in(Some("Website"), None, ts(0)).unwrap();
        engine.clock_out(ClockOutReason::Manual, ts(120), None);
        engine
    }

    #[test]
    fn shortens_an_entry_by_moving_its_start() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine_with_entry(&temp);

        let mut output = Vec::new();
        run(&mut output, &mut engine, ts(120), "Website", None, "1:30").unwrap();

        let entries = engine.query_logs(ts(-60), ts(180)).unwrap();
        assert_eq!(entries[0].clock_in, ts(30));
        assert_eq!(entries[0].clock_out, ts(120));
        assert!(entries[0].edited);
        assert!(String::from_utf8(output).unwrap().contains("now 01:30"));
    }

    #[test]
    fn editing_to_the_same_duration_reports_no_change() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine_with_entry(&temp);

        let mut output = Vec::new();
        run(&mut output, &mut engine, ts(120), "Website", None, "2:00").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "No change: Website was already 02:00.\n"
        );
        let entries = engine.query_logs(ts(-60), ts(180)).unwrap();
        assert!(!entries[0].edited);
    }

    #[test]
    fn missing_entry_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine_with_entry(&temp);

        let mut output = Vec::new();
        let err = run(&mut output, &mut engine, ts(999), "Website", None, "1:00").unwrap_err();

        assert!(err.to_string().contains("no entry matches"));
    }
}
