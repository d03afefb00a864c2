//! Error types for workbook loading and report emission.

use thiserror::Error;

/// Errors raised while loading a workbook.
///
/// These are fatal to the whole run: they occur before any sheet summary
/// exists, so a failed load never produces partial output.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// File I/O failure (missing file, permissions, truncated read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet could not be parsed (corrupt or unsupported file).
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Errors raised while rendering or writing report artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// File I/O failure while writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
