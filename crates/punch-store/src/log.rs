//! Weekly time-log persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use punch_core::{EntryKey, LogEntry, LogStore, StoreError, UpdateOutcome};

/// Stores completed entries as one JSON array per calendar week.
///
/// Partition files are named `TimeLog_<start>_to_<end>.json`, where `<start>`
/// is the week's Sunday and `<end>` its Saturday. An entry lands in the
/// partition of the moment it is appended, which can differ from the week of
/// its own timestamps (a duration edit moves the clock-in, a suspend flushes
/// after the fact), so every query scans all partitions.
#[derive(Debug)]
pub struct FileLogStore {
    dir: PathBuf,
}

impl FileLogStore {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn partition_path(&self, at: DateTime<Utc>) -> PathBuf {
        let (start, end) = week_bounds(at.date_naive());
        self.dir.join(format!("TimeLog_{start}_to_{end}.json"))
    }

    /// All partition files, in name (and therefore week) order.
    fn partition_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut paths = Vec::new();
        for entry in dir {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with("TimeLog_") && name.ends_with(".json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// Reads one partition. A missing or corrupt partition reads as empty;
/// only real IO failures (permissions and the like) propagate.
fn read_partition(path: &Path) -> Result<Vec<LogEntry>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "log partition unreadable; treating as empty"
            );
            Ok(Vec::new())
        }
    }
}

/// Sunday-to-Saturday bounds of the week containing `date`.
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - TimeDelta::days(i64::from(date.weekday().num_days_from_sunday()));
    (start, start + TimeDelta::days(6))
}

impl LogStore for FileLogStore {
    fn append(&mut self, entry: &LogEntry) -> Result<(), StoreError> {
        let path = self.partition_path(Utc::now());
        let mut entries = read_partition(&path)?;
        entries.push(entry.clone());
        crate::write_json(&path, &entries)
    }

    fn load_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let mut entries = Vec::new();
        for path in self.partition_paths()? {
            entries.extend(
                read_partition(&path)?
                    .into_iter()
                    .filter(|e| e.clock_in >= from && e.clock_out <= to),
            );
        }
        entries.sort_by_key(|e| e.clock_in);
        Ok(entries)
    }

    fn update_in_place(
        &mut self,
        key: &EntryKey,
        mutator: &mut dyn FnMut(&mut LogEntry),
    ) -> Result<UpdateOutcome, StoreError> {
        for path in self.partition_paths()? {
            let mut entries = read_partition(&path)?;
            let Some(entry) = entries.iter_mut().find(|e| key.matches(e)) else {
                continue;
            };

            let before = entry.clone();
            mutator(entry);
            if *entry == before {
                // No rewrite for a no-op edit.
                return Ok(UpdateOutcome::Unchanged(before));
            }
            let updated = entry.clone();
            crate::write_json(&path, &entries)?;
            return Ok(UpdateOutcome::Updated(updated));
        }
        Ok(UpdateOutcome::Missing)
    }
}
