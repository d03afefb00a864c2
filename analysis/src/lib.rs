//! Workbook analysis: load a spreadsheet of manual QA results, classify
//! every configured sheet's outcome column, and aggregate one run summary.
//!
//! # Main entry points
//!
//! - [`analyze_workbook`] — load a workbook from disk and aggregate it in
//!   one call.
//! - [`load_workbook`] + [`aggregate_run`] — the same two stages separately,
//!   when the caller wants the loaded [`WorkbookData`] too.
//! - [`write_report_set`] — write the text/CSV/JSON artifact set,
//!   all-or-none.
//!
//! Processing is sequential and synchronous throughout: one sheet after
//! another, whole-file I/O only. A degraded sheet (missing, empty, or with
//! no resolvable outcome column) never aborts the run; only a workbook-level
//! load failure does.
//!
//! # Example
//!
//! ```
//! use qa_report_analysis::{SheetData, WorkbookData, aggregate_run_at};
//! use qa_report_core::{RunConfig, SheetConfig};
//!
//! let workbook = WorkbookData {
//!     file_name: "results.xlsx".into(),
//!     sha256: "deadbeef".into(),
//!     sheets: vec![SheetData::new(
//!         "Auth",
//!         &[&["ID", "Result"], &["1", "Pass"], &["2", "Failed"]],
//!     )],
//! };
//! let config = RunConfig {
//!     version: "1.0".into(),
//!     failing_row_cap: 500,
//!     sheets: vec![SheetConfig::with_columns("Auth", &["B"])],
//! };
//!
//! let run = aggregate_run_at(&workbook, &config, "2026-02-01T08:00:00Z".into());
//! assert_eq!(run.totals.pass, 1);
//! assert_eq!(run.totals.fail, 1);
//! assert_eq!(run.pass_rate, Some(0.5));
//! ```

mod error;
mod load;
mod output;
mod run;
mod sheet;

pub use error::{ReportError, WorkbookError};
pub use load::{SheetData, WorkbookData, load_workbook};
pub use output::{
    ReportPaths, file_stamp, render_csv_report, render_json_report, render_text_report,
    write_report_set,
};
pub use run::{aggregate_run, aggregate_run_at};
pub use sheet::aggregate_sheet;

use qa_report_core::{RunConfig, RunSummary};
use std::path::Path;

/// Loads a workbook from disk and aggregates it against `config`.
///
/// # Errors
///
/// Returns [`WorkbookError`] when the file cannot be read or parsed; this is
/// fatal and no summary is produced. Per-sheet problems degrade the affected
/// sheet inside the returned [`RunSummary`] instead.
pub fn analyze_workbook(
    path: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunSummary, WorkbookError> {
    let workbook = load_workbook(path)?;
    Ok(aggregate_run(&workbook, config))
}
