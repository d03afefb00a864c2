//! Workbook loading via calamine.
//!
//! The workbook is read in one whole-file operation: the raw bytes feed the
//! SHA-256 source digest and are then handed to calamine, so the digest
//! always matches exactly what was analyzed. Every cell is converted to its
//! display text up front; the aggregators only ever see strings.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use sha2::{Digest, Sha256};

use crate::error::WorkbookError;

/// One worksheet as loaded: name plus cell text per row, header first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetData {
    /// Worksheet name as stored in the workbook.
    pub name: String,
    /// Cell text row by row. The first row is the header.
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    /// Builds a sheet from rows of string-like cells.
    ///
    /// # Examples
    ///
    /// ```
    /// use qa_report_analysis::SheetData;
    ///
    /// let sheet = SheetData::new("Auth", &[&["ID", "Result"], &["1", "Pass"]]);
    /// assert_eq!(sheet.rows.len(), 2);
    /// ```
    pub fn new(name: &str, rows: &[&[&str]]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        }
    }

    /// The header row, when the sheet has one.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }
}

/// A fully loaded workbook: source identity plus all sheets.
#[derive(Debug, Clone)]
pub struct WorkbookData {
    /// File name of the source workbook (not the full path).
    pub file_name: String,
    /// SHA-256 of the workbook bytes, lowercase hex.
    pub sha256: String,
    /// All sheets in workbook order.
    pub sheets: Vec<SheetData>,
}

impl WorkbookData {
    /// Looks up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&SheetData> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Loads a workbook from disk.
///
/// # Errors
///
/// Returns [`WorkbookError::Io`] when the file cannot be read and
/// [`WorkbookError::Spreadsheet`] when calamine cannot parse it. Both are
/// fatal to the run.
pub fn load_workbook(path: impl AsRef<Path>) -> Result<WorkbookData, WorkbookError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names().to_owned();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        sheets.push(SheetData { name, rows });
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(file = %file_name, sheets = sheets.len(), "workbook loaded");

    Ok(WorkbookData {
        file_name,
        sha256,
        sheets,
    })
}

/// Converts a calamine cell to the text the classifier sees.
///
/// Whole floats print without a trailing `.0` so numeric markers read the
/// way they display in the sheet.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e}"),
    }
}
