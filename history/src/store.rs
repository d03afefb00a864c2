//! Append-only history store for run summaries.
//!
//! Each analysis run appends exactly one [`HistoryRecord`] row to a CSV
//! file. The schema only ever grows by appending optional columns; existing
//! columns are never renumbered or removed, so every consumer of an older
//! file keeps working. The store assumes a single writer per file: one
//! analysis process at a time, no locking (concurrent invocations are out
//! of scope).

use std::fs::OpenOptions;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use qa_report_core::RunSummary;

use crate::error::{PersistenceError, Result};

/// One stored run: the run-level aggregate plus its source identity.
///
/// Flat on purpose — this is the CSV row schema. Fields added after the
/// initial schema carry `#[serde(default)]` so records written by older
/// versions still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// RFC 3339 timestamp of the run.
    pub recorded_at: String,
    /// Workbook file name.
    pub source_file: String,
    /// SHA-256 of the workbook bytes, for correlating runs to inputs.
    pub source_sha256: String,
    /// Sheets configured for the run.
    pub sheets_total: usize,
    /// Sheets evaluated.
    pub sheets_analyzed: usize,
    /// Sheets recorded as degraded.
    pub sheets_degraded: usize,
    pub pass: u64,
    pub fail: u64,
    pub error: u64,
    pub skipped: u64,
    pub unknown: u64,
    /// Total rows evaluated across all sheets.
    pub rows_evaluated: u64,
    /// Overall pass rate; empty when no row was decided.
    pub pass_rate: Option<f64>,
}

impl HistoryRecord {
    /// Builds the record for one run summary.
    pub fn from_run(run: &RunSummary) -> Self {
        Self {
            recorded_at: run.generated_at.clone(),
            source_file: run.source_file.clone(),
            source_sha256: run.source_sha256.clone(),
            sheets_total: run.sheets.len(),
            sheets_analyzed: run.sheets_analyzed,
            sheets_degraded: run.sheets_degraded,
            pass: run.totals.pass,
            fail: run.totals.fail,
            error: run.totals.error,
            skipped: run.totals.skipped,
            unknown: run.totals.unknown,
            rows_evaluated: run.rows_evaluated(),
            pass_rate: run.pass_rate,
        }
    }

    /// Rows with a decided outcome (pass + fail + error).
    pub fn decided(&self) -> u64 {
        self.pass + self.fail + self.error
    }
}

/// Handle on one append-only history file.
///
/// # Examples
///
/// ```no_run
/// use qa_report_history::HistoryStore;
///
/// let store = HistoryStore::new("qa_history.csv");
/// for record in store.read_all().unwrap() {
///     println!("{}: {:?}", record.recorded_at, record.pass_rate);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// A store backed by the file at `path`. The file is created on first
    /// append.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record.
    ///
    /// The row (and the header, when the file is new) is serialized into a
    /// buffer first and lands in a single write, so a failed serialization
    /// leaves the file untouched and the trend reporter never observes a
    /// partial row.
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let has_rows = std::fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!has_rows)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        let buffer = writer
            .into_inner()
            .map_err(|e| PersistenceError::Io(std::io::Error::other(e.to_string())))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buffer)?;
        file.flush()?;

        tracing::debug!(path = %self.path.display(), at = %record.recorded_at, "history appended");
        Ok(())
    }

    /// Reads every record in append order.
    ///
    /// A store that does not exist yet reads as empty. Unknown trailing
    /// columns from newer writers are ignored, so older and newer records
    /// can share one file.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_report_core::{OutcomeCounts, SheetResolution, SheetSummary};

    fn run(generated_at: &str, pass: u64, fail: u64) -> RunSummary {
        let mut sheet = SheetSummary::degraded("S", "unused");
        sheet.resolution = SheetResolution::Resolved {
            columns: vec!["J".into()],
        };
        sheet.counts = OutcomeCounts {
            pass,
            fail,
            ..OutcomeCounts::default()
        };
        sheet.rows_evaluated = pass + fail;
        RunSummary::from_sheets(
            generated_at.to_string(),
            "wb.xlsx".into(),
            "cafe".into(),
            vec![sheet],
        )
    }

    #[test]
    fn test_append_creates_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));

        store.append(&HistoryRecord::from_run(&run("2026-02-01T08:00:00Z", 5, 1))).unwrap();
        store.append(&HistoryRecord::from_run(&run("2026-02-02T08:00:00Z", 6, 0))).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let headers: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("recorded_at,"))
            .collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_appends_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.csv"));

        for (at, pass) in [("2026-02-01T08:00:00Z", 3u64), ("2026-02-02T08:00:00Z", 4)] {
            store.append(&HistoryRecord::from_run(&run(at, pass, 1))).unwrap();
        }

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pass, 3);
        assert_eq!(records[1].pass, 4);
        assert!(records[0].recorded_at < records[1].recorded_at);
    }

    #[test]
    fn test_missing_store_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("absent.csv"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_reader_tolerates_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        // A newer writer appended one optional column at the end.
        std::fs::write(
            &path,
            "recorded_at,source_file,source_sha256,sheets_total,sheets_analyzed,sheets_degraded,\
pass,fail,error,skipped,unknown,rows_evaluated,pass_rate,future_column\n\
2026-02-01T08:00:00Z,wb.xlsx,cafe,1,1,0,5,1,0,0,0,6,0.8333,extra\n",
        )
        .unwrap();

        let records = HistoryStore::new(&path).read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pass, 5);
        assert_eq!(records[0].pass_rate, Some(0.8333));
    }

    #[test]
    fn test_append_to_unwritable_path_is_persistence_error() {
        let store = HistoryStore::new("/nonexistent/dir/history.csv");
        let err = store
            .append(&HistoryRecord::from_run(&run("2026-02-01T08:00:00Z", 1, 0)))
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }

    #[test]
    fn test_record_round_trips_through_run_summary() {
        let summary = run("2026-02-01T08:00:00Z", 7, 2);
        let record = HistoryRecord::from_run(&summary);
        assert_eq!(record.rows_evaluated, 9);
        assert_eq!(record.decided(), 9);
        assert_eq!(record.pass_rate, summary.pass_rate);
        assert_eq!(record.sheets_total, 1);
    }
}
