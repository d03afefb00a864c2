//! Run-level aggregation across all configured sheets.

use chrono::{SecondsFormat, Utc};
use qa_report_core::{RunConfig, RunSummary, SheetSummary};

use crate::load::WorkbookData;
use crate::sheet::aggregate_sheet;

/// Aggregates a loaded workbook into one [`RunSummary`], stamped with the
/// current UTC time.
pub fn aggregate_run(workbook: &WorkbookData, config: &RunConfig) -> RunSummary {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    aggregate_run_at(workbook, config, generated_at)
}

/// Aggregates with an explicit timestamp.
///
/// Sheets are processed in configured order, so repeated runs over the same
/// workbook produce identically ordered reports. A configured sheet missing
/// from the workbook is recorded as degraded and the run continues; only a
/// workbook-level load failure (handled by the loader) aborts a run.
///
/// # Examples
///
/// ```
/// use qa_report_analysis::{SheetData, WorkbookData, aggregate_run_at};
/// use qa_report_core::{RunConfig, SheetConfig};
///
/// let workbook = WorkbookData {
///     file_name: "results.xlsx".into(),
///     sha256: "deadbeef".into(),
///     sheets: vec![SheetData::new("Auth", &[&["Result"], &["Pass"]])],
/// };
/// let config = RunConfig {
///     version: "1.0".into(),
///     failing_row_cap: 500,
///     sheets: vec![
///         SheetConfig::with_columns("Auth", &["A"]),
///         SheetConfig::auto("Gone"),
///     ],
/// };
///
/// let run = aggregate_run_at(&workbook, &config, "2026-02-01T08:00:00Z".into());
/// assert_eq!(run.sheets_analyzed, 1);
/// assert_eq!(run.sheets_degraded, 1);
/// assert_eq!(run.totals.pass, 1);
/// ```
pub fn aggregate_run_at(
    workbook: &WorkbookData,
    config: &RunConfig,
    generated_at: String,
) -> RunSummary {
    let mut sheets = Vec::with_capacity(config.sheets.len());
    for sheet_config in &config.sheets {
        let summary = match workbook.sheet(&sheet_config.name) {
            Some(data) => aggregate_sheet(data, Some(sheet_config), config.failing_row_cap),
            None => {
                tracing::warn!(sheet = %sheet_config.name, "configured sheet not found in workbook");
                SheetSummary::degraded(&sheet_config.name, "sheet not found")
            }
        };
        sheets.push(summary);
    }

    tracing::info!(
        sheets = sheets.len(),
        degraded = sheets.iter().filter(|s| !s.resolution.is_resolved()).count(),
        "run aggregated"
    );

    RunSummary::from_sheets(
        generated_at,
        workbook.file_name.clone(),
        workbook.sha256.clone(),
        sheets,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::SheetData;
    use qa_report_core::SheetConfig;

    fn workbook() -> WorkbookData {
        WorkbookData {
            file_name: "wb.xlsx".into(),
            sha256: "ab".into(),
            sheets: vec![
                SheetData::new("First", &[&["Result"], &["Pass"], &["Fail"]]),
                SheetData::new("Second", &[&["Result"], &["Pass"]]),
            ],
        }
    }

    fn config_for(names: &[&str]) -> RunConfig {
        RunConfig {
            version: "1.0".into(),
            failing_row_cap: 500,
            sheets: names.iter().map(|n| SheetConfig::auto(n)).collect(),
        }
    }

    #[test]
    fn test_sheets_follow_configured_order() {
        let run = aggregate_run_at(
            &workbook(),
            &config_for(&["Second", "First"]),
            "2026-02-01T08:00:00Z".into(),
        );
        let names: Vec<&str> = run.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }

    #[test]
    fn test_missing_sheet_degrades_but_run_continues() {
        let run = aggregate_run_at(
            &workbook(),
            &config_for(&["First", "Gone", "Second"]),
            "2026-02-01T08:00:00Z".into(),
        );
        assert_eq!(run.sheets_analyzed, 2);
        assert_eq!(run.sheets_degraded, 1);
        assert_eq!(run.totals.pass, 2);
        assert_eq!(run.totals.fail, 1);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let a = aggregate_run_at(
            &workbook(),
            &config_for(&["First", "Second"]),
            "2026-02-01T08:00:00Z".into(),
        );
        let b = aggregate_run_at(
            &workbook(),
            &config_for(&["First", "Second"]),
            "2026-02-01T08:00:00Z".into(),
        );
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
