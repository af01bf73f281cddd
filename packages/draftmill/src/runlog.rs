//! Append-only run log.
//!
//! One JSON line per successful run, written after the draft is
//! submitted. The log is an operator convenience for auditing what the
//! bot produced; a write failure is logged and swallowed so it can
//! never undo a publish that already happened.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One logged run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: DateTime<Utc>,
    pub mode: String,
    pub category: String,
    /// Title the topic selector chose.
    pub topic_title: String,
    /// Title the article was submitted under.
    pub final_title: String,
    pub receipt_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

/// Writes [`RunLogEntry`] records to a JSON-lines file.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry. Failures are logged, never propagated.
    pub fn append(&self, entry: &RunLogEntry) {
        if let Err(e) = self.try_append(entry) {
            warn!(path = %self.path.display(), error = %e, "run log write failed");
        }
    }

    fn try_append(&self, entry: &RunLogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("draftmill-runlog-{tag}-{}.jsonl", std::process::id()))
    }

    fn entry(title: &str) -> RunLogEntry {
        RunLogEntry {
            timestamp: Utc::now(),
            mode: "approval".into(),
            category: "Wellness".into(),
            topic_title: title.into(),
            final_title: format!("{title} (final)"),
            receipt_id: "draft-1".into(),
            receipt_url: None,
        }
    }

    #[test]
    fn test_append_writes_one_line_per_entry() {
        let path = temp_log_path("append");
        let _ = std::fs::remove_file(&path);
        let log = RunLog::new(&path);

        log.append(&entry("First"));
        log.append(&entry("Second"));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: RunLogEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.topic_title, "First");
        assert_eq!(first.receipt_id, "draft-1");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_none_url_omitted_from_line() {
        let path = temp_log_path("url");
        let _ = std::fs::remove_file(&path);
        let log = RunLog::new(&path);

        log.append(&entry("No URL"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("receipt_url"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let log = RunLog::new("/nonexistent-dir/never/runlog.jsonl");
        log.append(&entry("Ignored"));
    }
}
