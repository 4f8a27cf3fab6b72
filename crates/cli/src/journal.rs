//! Hourly CSV journal of match log lines.
//!
//! Every line of a finished match is appended as a `timestamp,message` row
//! to `<dir>/match_<YYYYMMDD>_<HH>.csv`, where the hour is the line's own
//! timestamp. Files are created on demand and never truncated.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use pingpong_engine::log::format_timestamp;
use pingpong_engine::LogLine;
use time::macros::format_description;

/// Writes match lines to hourly CSV files under one directory.
#[derive(Debug, Clone)]
pub(crate) struct CsvJournal {
    dir: PathBuf,
}

impl CsvJournal {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    /// `match_20241001_12.csv` for any time within that hour.
    pub(crate) fn file_name(line: &LogLine) -> String {
        let hour = line
            .at
            .format(format_description!("[year][month][day]_[hour]"))
            .unwrap_or_else(|_| "unknown".to_string());
        format!("match_{}.csv", hour)
    }

    /// Append `lines`, grouped into their hourly files.
    pub(crate) fn append(&self, lines: &[LogLine]) -> Result<(), csv::Error> {
        std::fs::create_dir_all(&self.dir)?;

        let mut by_file: BTreeMap<String, Vec<&LogLine>> = BTreeMap::new();
        for line in lines {
            by_file.entry(Self::file_name(line)).or_default().push(line);
        }

        for (name, lines) in by_file {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.dir.join(name))?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            for line in lines {
                writer.write_record([format_timestamp(line.at), line.message.clone()])?;
            }
            writer.flush()?;
        }
        Ok(())
    }

    /// [`append`](Self::append) on the blocking pool. Failures are logged,
    /// never returned.
    pub(crate) async fn append_in_background(&self, lines: Vec<LogLine>) {
        let journal = self.clone();
        let result = tokio::task::spawn_blocking(move || journal.append(&lines)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(dir = %self.dir().display(), error = %e, "failed to write csv journal")
            }
            Err(e) => tracing::warn!(error = %e, "csv journal task failed"),
        }
    }
}
