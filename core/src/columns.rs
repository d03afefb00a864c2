//! Outcome-column resolution for heterogeneous sheet layouts.
//!
//! Sheets name their result column inconsistently ("Result", "QA Status",
//! "Pass/Fail", ...) and some carry no usable header at all. Resolution runs
//! three stages: explicit letter hints from the configuration, then a
//! case-insensitive header keyword scan, then a value-sampling fallback that
//! accepts a column whose contents classify as known outcomes. All stages
//! are deterministic: the same header and configuration always yield the
//! same columns or the same error.

use thiserror::Error;

use crate::OutcomeCategory;
use crate::classify::classify;

/// Header labels recognized as outcome columns (lowercase, matched as
/// substrings of the header cell).
pub const RESULT_HEADER_KEYWORDS: &[&str] = &[
    "result",
    "status",
    "outcome",
    "pass/fail",
    "verdict",
    "test result",
    "qa result",
    "test status",
    "qa status",
];

/// Maximum non-blank values sampled per column by the fallback detector.
pub const SAMPLE_LIMIT: usize = 100;

/// Fraction of sampled values that must classify as a known outcome for a
/// column to be accepted by the fallback detector (strict inequality).
pub const SAMPLE_MATCH_RATIO: f64 = 0.3;

/// Errors from resolving a sheet's outcome column(s).
///
/// All three variants degrade the affected sheet only; the run aggregator
/// records them and continues with the remaining sheets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A configured column reference is not a letter reference like "J".
    #[error("invalid column reference {0:?}: expected letters like \"J\" or \"AD\"")]
    InvalidColumnRef(String),

    /// A configured column lies outside the sheet.
    #[error("configured column {column} (index {index}) is out of range: sheet has {width} columns")]
    HintOutOfRange {
        column: String,
        index: usize,
        width: usize,
    },

    /// Neither the header scan nor value sampling found an outcome column.
    #[error("no outcome column found in header")]
    ColumnNotFound,
}

/// Converts an Excel-style column letter to a zero-based index.
///
/// # Examples
///
/// ```
/// use qa_report_core::columns::column_letter_to_index;
///
/// assert_eq!(column_letter_to_index("A").unwrap(), 0);
/// assert_eq!(column_letter_to_index("Z").unwrap(), 25);
/// assert_eq!(column_letter_to_index("AA").unwrap(), 26);
/// assert_eq!(column_letter_to_index("AD").unwrap(), 29);
/// assert!(column_letter_to_index("7").is_err());
/// ```
pub fn column_letter_to_index(letter: &str) -> Result<usize, ResolveError> {
    let trimmed = letter.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ResolveError::InvalidColumnRef(letter.to_string()));
    }
    let mut index = 0usize;
    for c in trimmed.chars() {
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Ok(index - 1)
}

/// Converts a zero-based column index back to its Excel-style letter.
///
/// # Examples
///
/// ```
/// use qa_report_core::columns::column_index_to_letter;
///
/// assert_eq!(column_index_to_letter(0), "A");
/// assert_eq!(column_index_to_letter(26), "AA");
/// assert_eq!(column_index_to_letter(29), "AD");
/// ```
pub fn column_index_to_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Resolves explicitly configured column letters against a sheet of `width`
/// columns, preserving configuration order.
pub fn resolve_hinted(hints: &[String], width: usize) -> Result<Vec<usize>, ResolveError> {
    let mut indices = Vec::with_capacity(hints.len());
    for hint in hints {
        let index = column_letter_to_index(hint)?;
        if index >= width {
            return Err(ResolveError::HintOutOfRange {
                column: hint.trim().to_uppercase(),
                index,
                width,
            });
        }
        indices.push(index);
    }
    Ok(indices)
}

/// Scans a header row case-insensitively for a recognized outcome label.
/// First match wins, left-to-right.
pub fn resolve_by_header(header: &[String]) -> Option<usize> {
    header.iter().position(|cell| {
        let cell = cell.trim().to_lowercase();
        !cell.is_empty() && RESULT_HEADER_KEYWORDS.iter().any(|kw| cell.contains(kw))
    })
}

/// Value-sampling fallback: accepts a column when strictly more than
/// [`SAMPLE_MATCH_RATIO`] of up to [`SAMPLE_LIMIT`] non-blank values
/// classify as a known (non-unknown) outcome.
pub fn looks_like_outcome_column<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sampled = 0usize;
    let mut matched = 0usize;
    for value in values {
        if value.trim().is_empty() {
            continue;
        }
        sampled += 1;
        if classify(value) != OutcomeCategory::Unknown {
            matched += 1;
        }
        if sampled == SAMPLE_LIMIT {
            break;
        }
    }
    sampled > 0 && (matched as f64 / sampled as f64) > SAMPLE_MATCH_RATIO
}
