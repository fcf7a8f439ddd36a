//! Duration reconciliation and overlap detection.

use chrono::TimeDelta;

use crate::entry::{LogEntry, rounded_minutes};

/// Rewrites an entry to have `new_duration`, holding its clock-out fixed.
///
/// The clock-out is the authoritative endpoint (it is what the user and the
/// edit key both anchor on), so the edit recomputes
/// `clock_in = clock_out - new_duration` and marks the entry edited. Edits
/// that land on the same rounded minute as the current duration are dropped
/// entirely, leaving the entry byte-identical so stores can skip the write
/// and the edited flag stays honest.
pub fn apply_duration_edit(entry: &mut LogEntry, new_duration: TimeDelta) {
    if rounded_minutes(new_duration) == rounded_minutes(entry.duration()) {
        return;
    }
    entry.clock_in = entry.clock_out - new_duration;
    entry.edited = true;
}

/// Flags entries that overlap their predecessor.
///
/// `entries` must be sorted ascending by clock-in (the order range queries
/// return). Entry `i > 0` overlaps iff `clock_in[i] < clock_out[i - 1]`.
/// Recomputed on every load; never cached, since edits reorder entries.
pub fn overlap_flags(entries: &[LogEntry]) -> Vec<bool> {
    let mut flags = vec![false; entries.len()];
    for i in 1..entries.len() {
        flags[i] = entries[i].clock_in < entries[i - 1].clock_out;
    }
    flags
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0)
            .single()
            .expect("valid timestamp")
            + TimeDelta::minutes(minutes)
    }

    fn entry(start: i64, end: i64) -> LogEntry {
        LogEntry {
            project_name: "Website".to_string(),
            project_number: None,
            task_name: None,
            task_number: None,
            notes: None,
            clock_in: ts(start),
            clock_out: ts(end),
            edited: false,
        }
    }

    #[test]
    fn edit_moves_clock_in_and_marks_edited() {
        let mut e = entry(0, 60);
        apply_duration_edit(&mut e, TimeDelta::minutes(90));

        assert_eq!(e.clock_out, ts(60), "clock-out is fixed");
        assert_eq!(e.clock_in, ts(-30));
        assert_eq!(e.duration(), TimeDelta::minutes(90));
        assert!(e.edited);
    }

    #[test]
    fn edit_to_same_rounded_minute_is_a_no_op() {
        let mut e = entry(0, 60);
        let before = e.clone();

        // 60 minutes plus 20 seconds rounds back to 60 minutes.
        apply_duration_edit(&mut e, TimeDelta::minutes(60) + TimeDelta::seconds(20));

        assert_eq!(e, before);
        assert!(!e.edited);
    }

    #[test]
    fn repeated_edit_is_idempotent() {
        let mut e = entry(0, 60);
        apply_duration_edit(&mut e, TimeDelta::minutes(45));
        let after_first = e.clone();

        apply_duration_edit(&mut e, TimeDelta::minutes(45));
        assert_eq!(e, after_first);
    }

    #[test]
    fn edit_can_shrink_a_duration() {
        let mut e = entry(0, 120);
        apply_duration_edit(&mut e, TimeDelta::minutes(15));
        assert_eq!(e.clock_in, ts(105));
        assert_eq!(e.clock_out, ts(120));
    }

    #[test]
    fn overlap_flags_adjacent_pairs() {
        // A(10:00-11:00), B(10:30-11:30), C(12:00-12:30): B overlaps A, C is clear.
        let entries = vec![entry(0, 60), entry(30, 90), entry(120, 150)];
        assert_eq!(overlap_flags(&entries), vec![false, true, false]);
    }

    #[test]
    fn back_to_back_entries_do_not_overlap() {
        // A switch boundary produces equal clock-out/clock-in stamps.
        let entries = vec![entry(0, 60), entry(60, 90)];
        assert_eq!(overlap_flags(&entries), vec![false, false]);
    }

    #[test]
    fn overlap_compares_against_immediate_predecessor_only() {
        // The third entry starts inside the first but after the second ends;
        // the scan is an adjacent-pair walk over the sorted sequence.
        let entries = vec![entry(0, 200), entry(10, 20), entry(30, 40)];
        assert_eq!(overlap_flags(&entries), vec![false, true, false]);
    }

    #[test]
    fn empty_and_single_entry_sets_have_no_overlaps() {
        assert!(overlap_flags(&[]).is_empty());
        assert_eq!(overlap_flags(&[entry(0, 60)]), vec![false]);
    }
}
