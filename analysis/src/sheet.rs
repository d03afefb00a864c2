//! Per-sheet aggregation: resolve the outcome column(s), classify every
//! row, and fold the results into one [`SheetSummary`].

use qa_report_core::columns::{self, ResolveError};
use qa_report_core::{
    OutcomeCounts, RowResult, SheetConfig, SheetResolution, SheetSummary, classify::classify,
};

use crate::load::SheetData;

/// Aggregates one worksheet into a [`SheetSummary`].
///
/// Rows whose cells are all blank are excluded from every category. When
/// several columns are configured for the sheet, each resolved column is
/// evaluated per row and the counts combine into one set, so "rows
/// evaluated" counts one evaluation per resolved column. Any resolution
/// failure degrades this sheet only.
///
/// The source sheet is never mutated and no I/O happens here.
///
/// # Examples
///
/// ```
/// use qa_report_analysis::{SheetData, aggregate_sheet};
///
/// let sheet = SheetData::new(
///     "Auth",
///     &[
///         &["ID", "Result"],
///         &["1", "Pass"],
///         &["2", "Failed"],
///         &["", ""],
///     ],
/// );
/// let summary = aggregate_sheet(&sheet, None, 500);
/// assert_eq!(summary.counts.pass, 1);
/// assert_eq!(summary.counts.fail, 1);
/// assert_eq!(summary.rows_evaluated, 2); // the blank row is excluded
/// ```
pub fn aggregate_sheet(
    sheet: &SheetData,
    config: Option<&SheetConfig>,
    failing_row_cap: usize,
) -> SheetSummary {
    let Some(header) = sheet.header() else {
        return SheetSummary::degraded(&sheet.name, "sheet is empty");
    };
    let width = header.len();

    let resolved = match config {
        Some(cfg) if !cfg.auto_detect() => columns::resolve_hinted(&cfg.columns, width),
        _ => resolve_auto(sheet, header),
    };
    let indices = match resolved {
        Ok(indices) => indices,
        Err(err) => {
            tracing::warn!(sheet = %sheet.name, error = %err, "sheet degraded");
            return SheetSummary::degraded(&sheet.name, &err.to_string());
        }
    };
    let letters: Vec<String> = indices
        .iter()
        .map(|&i| columns::column_index_to_letter(i))
        .collect();

    let mut counts = OutcomeCounts::default();
    let mut failing: Vec<RowResult> = Vec::new();
    let mut failing_overflow = 0u64;

    for (offset, row) in sheet.rows.iter().enumerate().skip(1) {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        for (index, letter) in indices.iter().zip(&letters) {
            let text = row.get(*index).map(String::as_str).unwrap_or("");
            let category = classify(text);
            counts = counts.record(category);
            if category.is_failing() {
                if failing.len() < failing_row_cap {
                    failing.push(RowResult {
                        row: offset as u32 + 1,
                        column: letter.clone(),
                        text: text.to_string(),
                        category,
                        note: None,
                    });
                } else {
                    failing_overflow += 1;
                }
            }
        }
    }

    let rows_evaluated = counts.evaluated();
    SheetSummary {
        name: sheet.name.clone(),
        resolution: SheetResolution::Resolved { columns: letters },
        counts,
        failing,
        failing_overflow,
        rows_evaluated,
    }
}

/// Auto-detection: header keyword scan first, then the value-sampling
/// fallback over each column left-to-right.
fn resolve_auto(sheet: &SheetData, header: &[String]) -> Result<Vec<usize>, ResolveError> {
    if let Some(index) = columns::resolve_by_header(header) {
        return Ok(vec![index]);
    }
    for index in 0..header.len() {
        let values = sheet
            .rows
            .iter()
            .skip(1)
            .map(|row| row.get(index).map(String::as_str).unwrap_or(""));
        if columns::looks_like_outcome_column(values) {
            return Ok(vec![index]);
        }
    }
    Err(ResolveError::ColumnNotFound)
}
