//! Log command for listing recorded time entries.
//!
//! Periods (`--today`, `--all`, `--from`/`--to`, default current week) are
//! resolved against the local calendar and queried as UTC bounds. Output is
//! a table by default, or raw entries with `--json`.

use std::io::Write;

use anyhow::Result;
use chrono::{
    DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc,
};
use punch_core::{LogEntry, format_hhmm, overlap_flags};

use crate::Engine;

/// Which slice of the log to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The current Sunday-to-Saturday week.
    Week,
    /// Today only.
    Today,
    /// Everything on record.
    All,
    /// An explicit date range; an open end means unbounded on that side.
    Range {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

// ========== Period Date Calculation ==========

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight; 1am local exists in every
            // zone that skips midnight
            let one_am = local_date.and_time(NaiveTime::MIN + TimeDelta::hours(1));
            match Local.from_local_datetime(&one_am) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
                LocalResult::None => Utc.from_utc_datetime(&midnight),
            }
        }
    }
}

/// Calculates week boundaries (Sun 00:00 to next Sun 00:00 local time) as a
/// half-open interval.
fn week_boundaries(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_since_sunday = today.weekday().num_days_from_sunday();
    let sunday = today - TimeDelta::days(i64::from(days_since_sunday));
    let next_sunday = sunday + TimeDelta::days(7);

    (local_midnight_to_utc(sunday), local_midnight_to_utc(next_sunday))
}

/// Calculates day boundaries (today 00:00 to tomorrow 00:00 local time).
fn day_boundaries(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let tomorrow = today + TimeDelta::days(1);

    (local_midnight_to_utc(today), local_midnight_to_utc(tomorrow))
}

/// Resolves a period to UTC query bounds, using `today` as the reference date.
pub fn period_bounds(period: Period, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    match period {
        Period::Week => week_boundaries(today),
        Period::Today => day_boundaries(today),
        Period::All => (DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC),
        Period::Range { from, to } => {
            let start = from.map_or(DateTime::<Utc>::MIN_UTC, local_midnight_to_utc);
            let end = to.map_or(DateTime::<Utc>::MAX_UTC, |d| {
                local_midnight_to_utc(d + TimeDelta::days(1))
            });
            (start, end)
        }
    }
}

// ========== Rendering ==========

fn entry_label(entry: &LogEntry) -> String {
    let mut label = entry.project_name.clone();
    if let Some(task) = &entry.task_number {
        label.push_str(&format!(" (task {task})"));
    }
    if let Some(notes) = &entry.notes {
        label.push_str(&format!(": {notes}"));
    }
    label
}

fn render_table<W: Write>(writer: &mut W, entries: &[LogEntry]) -> Result<()> {
    let flags = overlap_flags(entries);
    let total = entries
        .iter()
        .fold(TimeDelta::zero(), |acc, e| acc + e.duration());

    for (entry, overlaps) in entries.iter().zip(&flags) {
        let start = entry.clock_in.with_timezone(&Local);
        let end = entry.clock_out.with_timezone(&Local);
        let mut marks = String::new();
        if entry.edited {
            marks.push('*');
        }
        if *overlaps {
            marks.push('!');
        }
        writeln!(
            writer,
            "{}  {}-{}  {}{:<2} {}",
            start.format("%Y-%m-%d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            format_hhmm(entry.duration()),
            marks,
            entry_label(entry)
        )?;
    }

    writeln!(writer, "Total: {}", format_hhmm(total))?;
    if entries.iter().any(|e| e.edited) {
        writeln!(writer, "* duration was edited")?;
    }
    if flags.iter().any(|f| *f) {
        writeln!(writer, "! overlaps the previous entry")?;
    }
    Ok(())
}

/// Runs the log command.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &Engine,
    period: Period,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let (from, to) = period_bounds(period, today);
    let entries = engine.query_logs(from, to)?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }
    if entries.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }
    render_table(writer, &entries)
}
