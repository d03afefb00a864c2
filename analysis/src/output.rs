//! Report rendering and the atomic report-set writer.
//!
//! Three artifacts per run, timestamp-suffixed: a human-readable text
//! summary, a tabular CSV export (one row per sheet) for trend correlation,
//! and the full JSON detail. The writer stages each artifact as a `.tmp`
//! sibling and renames only after all three are produced, so a run either
//! leaves a complete report set on disk or none at all.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::DateTime;
use serde::Serialize;

use qa_report_core::{OutcomeCategory, RunSummary, SheetResolution, SheetSummary};

use crate::error::ReportError;

const RULE: &str = "======================================================================";
const SUBRULE: &str = "----------------------------------------------------------------------";

/// One CSV export row. Columns are only ever appended, never renumbered or
/// removed, so downstream consumers stay compatible as the schema grows.
#[derive(Debug, Serialize)]
struct SheetCsvRow<'a> {
    timestamp: &'a str,
    source_file: &'a str,
    sheet_name: &'a str,
    status: &'a str,
    columns: String,
    pass: u64,
    fail: u64,
    error: u64,
    skipped: u64,
    unknown: u64,
    rows_evaluated: u64,
    failing_rows: u64,
    pass_rate: Option<f64>,
    degraded_reason: String,
}

impl<'a> SheetCsvRow<'a> {
    fn from_sheet(run: &'a RunSummary, sheet: &'a SheetSummary) -> Self {
        let (status, columns, degraded_reason) = match &sheet.resolution {
            SheetResolution::Resolved { columns } => ("analyzed", columns.join("+"), String::new()),
            SheetResolution::Degraded { reason } => ("degraded", String::new(), reason.clone()),
        };
        Self {
            timestamp: &run.generated_at,
            source_file: &run.source_file,
            sheet_name: &sheet.name,
            status,
            columns,
            pass: sheet.counts.pass,
            fail: sheet.counts.fail,
            error: sheet.counts.error,
            skipped: sheet.counts.skipped,
            unknown: sheet.counts.unknown,
            rows_evaluated: sheet.rows_evaluated,
            failing_rows: sheet.failing_total(),
            pass_rate: sheet.pass_rate(),
            degraded_reason,
        }
    }
}

/// Renders the human-readable summary report.
pub fn render_text_report(run: &RunSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "QA TESTING SUMMARY REPORT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Generated: {}", run.generated_at);
    let _ = writeln!(
        out,
        "Workbook:  {} (sha256 {})",
        run.source_file,
        short_digest(&run.source_sha256)
    );
    let _ = writeln!(
        out,
        "Sheets:    {} analyzed, {} degraded",
        run.sheets_analyzed, run.sheets_degraded
    );
    out.push('\n');

    let _ = writeln!(out, "OVERALL SUMMARY");
    let _ = writeln!(out, "{SUBRULE}");
    let evaluated = run.rows_evaluated();
    let _ = writeln!(out, "Rows evaluated: {evaluated}");
    for category in OutcomeCategory::ALL {
        let count = run.totals.get(category);
        let _ = writeln!(
            out,
            "  {:<8} {:>6}{}",
            format!("{category}:"),
            count,
            percent_of(count, evaluated)
        );
    }
    match run.pass_rate {
        Some(rate) => {
            let _ = writeln!(out, "Pass rate (pass / decided): {:.1}%", rate * 100.0);
        }
        None => {
            let _ = writeln!(out, "Pass rate (pass / decided): n/a (no decided rows)");
        }
    }
    out.push('\n');

    let _ = writeln!(out, "SHEET-BY-SHEET BREAKDOWN");
    let _ = writeln!(out, "{SUBRULE}");
    for sheet in &run.sheets {
        out.push('\n');
        match &sheet.resolution {
            SheetResolution::Resolved { columns } => {
                let _ = writeln!(out, "{} (columns {})", sheet.name, columns.join(", "));
                let _ = writeln!(
                    out,
                    "  rows evaluated: {}  pass: {}  fail: {}  error: {}  skipped: {}  unknown: {}",
                    sheet.rows_evaluated,
                    sheet.counts.pass,
                    sheet.counts.fail,
                    sheet.counts.error,
                    sheet.counts.skipped,
                    sheet.counts.unknown,
                );
                match sheet.pass_rate() {
                    Some(rate) => {
                        let _ = writeln!(out, "  pass rate: {:.1}%", rate * 100.0);
                    }
                    None => {
                        let _ = writeln!(out, "  pass rate: n/a");
                    }
                }
                if !sheet.failing.is_empty() {
                    let _ = writeln!(out, "  failing rows:");
                    for row in &sheet.failing {
                        let _ = writeln!(
                            out,
                            "    row {:>4} [{}] {:?} ({})",
                            row.row, row.column, row.text, row.category
                        );
                    }
                    if sheet.failing_overflow > 0 {
                        let _ = writeln!(out, "    (+{} more)", sheet.failing_overflow);
                    }
                }
            }
            SheetResolution::Degraded { reason } => {
                let _ = writeln!(out, "{} -- DEGRADED: {reason}", sheet.name);
            }
        }
    }

    out.push('\n');
    let _ = writeln!(out, "{RULE}");
    out
}

/// Renders the tabular CSV export, one row per sheet.
pub fn render_csv_report(run: &RunSummary) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for sheet in &run.sheets {
        writer.serialize(SheetCsvRow::from_sheet(run, sheet))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(std::io::Error::other(e.to_string())))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Io(std::io::Error::other(e.to_string())))
}

/// Renders the full structured detail export.
pub fn render_json_report(run: &RunSummary) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(run)?)
}

/// Paths of one written report set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub summary_txt: PathBuf,
    pub results_csv: PathBuf,
    pub analysis_json: PathBuf,
}

impl ReportPaths {
    fn for_stamp(dir: &Path, stamp: &str) -> Self {
        Self {
            summary_txt: dir.join(format!("qa_summary_{stamp}.txt")),
            results_csv: dir.join(format!("qa_results_{stamp}.csv")),
            analysis_json: dir.join(format!("qa_analysis_{stamp}.json")),
        }
    }
}

/// File-name stamp derived from the run timestamp (`%Y%m%d_%H%M%S`).
pub fn file_stamp(generated_at: &str) -> String {
    match DateTime::parse_from_rfc3339(generated_at) {
        Ok(ts) => ts.format("%Y%m%d_%H%M%S").to_string(),
        Err(_) => generated_at
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
    }
}

/// Writes the complete report set into `dir`, all-or-none.
///
/// Every artifact is rendered up front and staged as `<name>.tmp`; the
/// renames into place happen only after all three temporaries exist. On any
/// failure the temporaries are removed and no final artifact is left
/// behind.
pub fn write_report_set(run: &RunSummary, dir: impl AsRef<Path>) -> Result<ReportPaths, ReportError> {
    let dir = dir.as_ref();
    let stamp = file_stamp(&run.generated_at);
    let paths = ReportPaths::for_stamp(dir, &stamp);

    let artifacts = [
        (paths.summary_txt.clone(), render_text_report(run)),
        (paths.results_csv.clone(), render_csv_report(run)?),
        (paths.analysis_json.clone(), render_json_report(run)?),
    ];

    let temporaries: Vec<PathBuf> = artifacts
        .iter()
        .map(|(path, _)| path.with_extension(temp_extension(path)))
        .collect();

    let staged: Result<(), std::io::Error> = artifacts
        .iter()
        .zip(&temporaries)
        .try_for_each(|((_, content), temp)| std::fs::write(temp, content));
    if let Err(err) = staged {
        for temp in &temporaries {
            let _ = std::fs::remove_file(temp);
        }
        return Err(err.into());
    }

    for ((path, _), temp) in artifacts.iter().zip(&temporaries) {
        if let Err(err) = std::fs::rename(temp, path) {
            for temp in &temporaries {
                let _ = std::fs::remove_file(temp);
            }
            return Err(err.into());
        }
    }

    tracing::info!(dir = %dir.display(), stamp = %stamp, "report set written");
    Ok(paths)
}

fn temp_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.tmp"),
        None => "tmp".to_string(),
    }
}

fn short_digest(digest: &str) -> &str {
    &digest[..digest.len().min(12)]
}

fn percent_of(count: u64, total: u64) -> String {
    if total == 0 {
        String::new()
    } else {
        format!("  ({:.1}%)", count as f64 / total as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qa_report_core::{OutcomeCounts, RowResult, SheetResolution, SheetSummary};

    fn sample_run() -> RunSummary {
        let sheet_a = SheetSummary {
            name: "Auth".into(),
            resolution: SheetResolution::Resolved {
                columns: vec!["J".into()],
            },
            counts: OutcomeCounts {
                pass: 7,
                fail: 2,
                ..OutcomeCounts::default()
            },
            failing: vec![
                RowResult {
                    row: 3,
                    column: "J".into(),
                    text: "Failed".into(),
                    category: OutcomeCategory::Fail,
                    note: None,
                },
                RowResult {
                    row: 8,
                    column: "J".into(),
                    text: "failed - timeout".into(),
                    category: OutcomeCategory::Fail,
                    note: None,
                },
            ],
            failing_overflow: 0,
            rows_evaluated: 9,
        };
        let sheet_b = SheetSummary::degraded("Gone", "sheet not found");
        RunSummary::from_sheets(
            "2026-02-01T08:15:30Z".into(),
            "results.xlsx".into(),
            "0123456789abcdef0123".into(),
            vec![sheet_a, sheet_b],
        )
    }

    #[test]
    fn test_text_report_contents() {
        let text = render_text_report(&sample_run());
        assert!(text.contains("QA TESTING SUMMARY REPORT"));
        assert!(text.contains("results.xlsx (sha256 0123456789ab)"));
        assert!(text.contains("1 analyzed, 1 degraded"));
        assert!(text.contains("Pass rate (pass / decided): 77.8%"));
        assert!(text.contains("Auth (columns J)"));
        assert!(text.contains("Gone -- DEGRADED: sheet not found"));
        assert!(text.contains("row    3 [J] \"Failed\" (fail)"));
    }

    #[test]
    fn test_text_report_truncation_marker() {
        let mut run = sample_run();
        run.sheets[0].failing_overflow = 12;
        let text = render_text_report(&run);
        assert!(text.contains("(+12 more)"));
    }

    #[test]
    fn test_csv_report_one_row_per_sheet() {
        let csv = render_csv_report(&sample_run()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 sheets
        assert!(lines[0].starts_with("timestamp,source_file,sheet_name,status"));
        assert!(lines[1].contains("Auth,analyzed,J,7,2,0,0,0,9,2,"));
        assert!(lines[2].contains("Gone,degraded,,0,0,0,0,0,0,0,,sheet not found"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let run = sample_run();
        let json = render_json_report(&run).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.totals, run.totals);
        assert_eq!(back.sheets.len(), 2);
        assert_eq!(back.sheets[0].failing.len(), 2);
    }

    #[test]
    fn test_file_stamp_from_rfc3339() {
        assert_eq!(file_stamp("2026-02-01T08:15:30Z"), "20260201_081530");
    }

    #[test]
    fn test_write_report_set_complete() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_report_set(&sample_run(), dir.path()).unwrap();
        assert!(paths.summary_txt.exists());
        assert!(paths.results_csv.exists());
        assert!(paths.analysis_json.exists());
        // No temporaries left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_report_set_failure_leaves_nothing() {
        let err = write_report_set(&sample_run(), "/nonexistent/report-dir").unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
