//! Trend reporting over the history store.
//!
//! Reads the append-only record sequence and computes deltas and moving
//! statistics across runs. This module never writes: the store owns the
//! file, the trend reporter only consumes its schema.

use std::fmt::Write as _;

use serde::Serialize;

use crate::store::HistoryRecord;

const RULE: &str = "======================================================================";
const SUBRULE: &str = "----------------------------------------------------------------------";

/// Default moving-average window, in runs.
pub const DEFAULT_TREND_WINDOW: usize = 3;

/// Signed per-category change between two runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendDelta {
    pub pass: i64,
    pub fail: i64,
    pub error: i64,
    pub skipped: i64,
    pub unknown: i64,
    pub rows_evaluated: i64,
}

impl TrendDelta {
    fn between(first: &HistoryRecord, last: &HistoryRecord) -> Self {
        let diff = |a: u64, b: u64| b as i64 - a as i64;
        Self {
            pass: diff(first.pass, last.pass),
            fail: diff(first.fail, last.fail),
            error: diff(first.error, last.error),
            skipped: diff(first.skipped, last.skipped),
            unknown: diff(first.unknown, last.unknown),
            rows_evaluated: diff(first.rows_evaluated, last.rows_evaluated),
        }
    }
}

/// Computed trend over the whole history.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    /// Number of recorded runs.
    pub runs: usize,
    /// The most recent record.
    pub latest: HistoryRecord,
    /// First-to-last change; absent with a single run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_to_last: Option<TrendDelta>,
    /// Window used for the moving average.
    pub window: usize,
    /// Mean pass rate over the last `window` runs that had decided rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_average_pass_rate: Option<f64>,
    /// All records in append order.
    pub points: Vec<HistoryRecord>,
}

impl TrendReport {
    /// Builds a trend report from records in append order.
    ///
    /// Returns `None` when the history is empty. `window` is clamped to at
    /// least one run.
    ///
    /// # Examples
    ///
    /// ```
    /// use qa_report_history::{HistoryRecord, TrendReport};
    ///
    /// let record = HistoryRecord {
    ///     recorded_at: "2026-02-01T08:00:00Z".into(),
    ///     source_file: "wb.xlsx".into(),
    ///     source_sha256: "cafe".into(),
    ///     sheets_total: 1,
    ///     sheets_analyzed: 1,
    ///     sheets_degraded: 0,
    ///     pass: 5,
    ///     fail: 1,
    ///     error: 0,
    ///     skipped: 0,
    ///     unknown: 0,
    ///     rows_evaluated: 6,
    ///     pass_rate: Some(5.0 / 6.0),
    /// };
    ///
    /// let report = TrendReport::build(vec![record], 3).unwrap();
    /// assert_eq!(report.runs, 1);
    /// assert!(report.first_to_last.is_none());
    /// ```
    pub fn build(points: Vec<HistoryRecord>, window: usize) -> Option<Self> {
        let (first, last) = (points.first()?, points.last()?);
        let window = window.max(1);
        let first_to_last = (points.len() > 1).then(|| TrendDelta::between(first, last));
        let moving_average_pass_rate = moving_average(&points, window);

        Some(Self {
            runs: points.len(),
            latest: last.clone(),
            first_to_last,
            window,
            moving_average_pass_rate,
            points,
        })
    }
}

/// Mean pass rate over the last `window` records that had decided rows.
fn moving_average(points: &[HistoryRecord], window: usize) -> Option<f64> {
    let tail = &points[points.len().saturating_sub(window)..];
    let rates: Vec<f64> = tail.iter().filter_map(|p| p.pass_rate).collect();
    if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }
}

/// Renders the trend report as plain text.
pub fn render_trend_text(report: &TrendReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "QA TESTING PROGRESS REPORT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Runs recorded: {}", report.runs);
    let _ = writeln!(
        out,
        "Period: {} to {}",
        report
            .points
            .first()
            .map(|p| p.recorded_at.as_str())
            .unwrap_or("-"),
        report.latest.recorded_at
    );
    out.push('\n');

    let _ = writeln!(out, "CURRENT STATUS (latest run)");
    let _ = writeln!(out, "{SUBRULE}");
    let latest = &report.latest;
    let _ = writeln!(out, "As of:     {}", latest.recorded_at);
    let _ = writeln!(out, "Workbook:  {}", latest.source_file);
    let _ = writeln!(
        out,
        "Sheets:    {} analyzed, {} degraded",
        latest.sheets_analyzed, latest.sheets_degraded
    );
    let _ = writeln!(
        out,
        "Rows:      {} evaluated  pass: {}  fail: {}  error: {}  skipped: {}  unknown: {}",
        latest.rows_evaluated, latest.pass, latest.fail, latest.error, latest.skipped, latest.unknown,
    );
    match latest.pass_rate {
        Some(rate) => {
            let _ = writeln!(out, "Pass rate: {:.1}%", rate * 100.0);
        }
        None => {
            let _ = writeln!(out, "Pass rate: n/a (no decided rows)");
        }
    }
    out.push('\n');

    if let Some(delta) = &report.first_to_last {
        let _ = writeln!(out, "PROGRESS OVER TIME (first to last)");
        let _ = writeln!(out, "{SUBRULE}");
        let _ = writeln!(out, "  rows evaluated: {:+}", delta.rows_evaluated);
        let _ = writeln!(out, "  pass:    {:+}", delta.pass);
        let _ = writeln!(out, "  fail:    {:+}", delta.fail);
        let _ = writeln!(out, "  error:   {:+}", delta.error);
        let _ = writeln!(out, "  skipped: {:+}", delta.skipped);
        let _ = writeln!(out, "  unknown: {:+}", delta.unknown);
        out.push('\n');
    }

    let _ = writeln!(out, "TREND");
    let _ = writeln!(out, "{SUBRULE}");
    let _ = writeln!(
        out,
        "{:<22} | {:>9} | {:>6} | {:>6} | {:>6}",
        "Timestamp", "Evaluated", "Pass", "Fail", "Pass%"
    );
    for point in &report.points {
        let rate = point
            .pass_rate
            .map(|r| format!("{:.1}", r * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<22} | {:>9} | {:>6} | {:>6} | {:>6}",
            point.recorded_at, point.rows_evaluated, point.pass, point.fail, rate
        );
    }
    out.push('\n');

    match report.moving_average_pass_rate {
        Some(avg) => {
            let _ = writeln!(
                out,
                "Moving average pass rate (last {} runs): {:.1}%",
                report.window.min(report.runs),
                avg * 100.0
            );
        }
        None => {
            let _ = writeln!(out, "Moving average pass rate: n/a");
        }
    }
    let _ = writeln!(out, "{RULE}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(at: &str, pass: u64, fail: u64, skipped: u64) -> HistoryRecord {
        let decided = pass + fail;
        HistoryRecord {
            recorded_at: at.to_string(),
            source_file: "wb.xlsx".into(),
            source_sha256: "cafe".into(),
            sheets_total: 2,
            sheets_analyzed: 2,
            sheets_degraded: 0,
            pass,
            fail,
            error: 0,
            skipped,
            unknown: 0,
            rows_evaluated: decided + skipped,
            pass_rate: (decided > 0).then(|| pass as f64 / decided as f64),
        }
    }

    #[test]
    fn test_empty_history_yields_no_report() {
        assert!(TrendReport::build(Vec::new(), 3).is_none());
    }

    #[test]
    fn test_single_run_has_no_delta() {
        let report = TrendReport::build(vec![record("2026-02-01T08:00:00Z", 5, 1, 0)], 3).unwrap();
        assert_eq!(report.runs, 1);
        assert!(report.first_to_last.is_none());
        assert_eq!(report.latest.pass, 5);
    }

    #[test]
    fn test_first_to_last_deltas_are_signed() {
        let report = TrendReport::build(
            vec![
                record("2026-02-01T08:00:00Z", 5, 4, 1),
                record("2026-02-02T08:00:00Z", 8, 1, 0),
            ],
            3,
        )
        .unwrap();
        let delta = report.first_to_last.unwrap();
        assert_eq!(delta.pass, 3);
        assert_eq!(delta.fail, -3);
        assert_eq!(delta.skipped, -1);
        assert_eq!(delta.rows_evaluated, -1);
    }

    #[test]
    fn test_moving_average_over_window() {
        let report = TrendReport::build(
            vec![
                record("2026-02-01T08:00:00Z", 1, 9, 0), // 0.1, outside the window
                record("2026-02-02T08:00:00Z", 5, 5, 0), // 0.5
                record("2026-02-03T08:00:00Z", 9, 1, 0), // 0.9
            ],
            2,
        )
        .unwrap();
        let avg = report.moving_average_pass_rate.unwrap();
        assert!((avg - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_moving_average_skips_undecided_runs() {
        let report = TrendReport::build(
            vec![
                record("2026-02-01T08:00:00Z", 4, 4, 0), // 0.5
                record("2026-02-02T08:00:00Z", 0, 0, 5), // no decided rows
            ],
            2,
        )
        .unwrap();
        assert_eq!(report.moving_average_pass_rate, Some(0.5));
    }

    #[test]
    fn test_window_is_clamped_to_one() {
        let report = TrendReport::build(vec![record("2026-02-01T08:00:00Z", 2, 2, 0)], 0).unwrap();
        assert_eq!(report.window, 1);
    }

    #[test]
    fn test_text_rendering_mentions_every_section() {
        let report = TrendReport::build(
            vec![
                record("2026-02-01T08:00:00Z", 5, 4, 0),
                record("2026-02-02T08:00:00Z", 8, 1, 0),
            ],
            3,
        )
        .unwrap();
        let text = render_trend_text(&report);
        assert!(text.contains("QA TESTING PROGRESS REPORT"));
        assert!(text.contains("Runs recorded: 2"));
        assert!(text.contains("CURRENT STATUS"));
        assert!(text.contains("PROGRESS OVER TIME"));
        assert!(text.contains("pass:    +3"));
        assert!(text.contains("2026-02-01T08:00:00Z"));
        assert!(text.contains("Pass rate: 88.9%"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = TrendReport::build(vec![record("2026-02-01T08:00:00Z", 5, 1, 0)], 3).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"runs\":1"));
        assert!(!json.contains("first_to_last"));
    }
}
