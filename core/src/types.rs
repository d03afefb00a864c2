//! Data model for QA run aggregation.
//!
//! This module defines the record types produced by the sheet and run
//! aggregators. All types are designed for serialization with [`serde`] and
//! round-trip through JSON and CSV exports. Summaries are built once and
//! never mutated afterwards; the per-row counters thread functionally
//! through the aggregation loop via [`OutcomeCounts::record`].

use serde::{Deserialize, Serialize};

/// Version of the report contract (semver).
///
/// Embedded in every [`RunSummary`] so downstream tooling can track
/// compatibility as the export schema grows.
pub const REPORT_CONTRACT_VERSION: &str = "1.0.0";

/// Canonical outcome category assigned to one evaluated test row.
///
/// Serialized in snake_case; the `Display` impl matches the serde form.
///
/// # Examples
///
/// ```
/// use qa_report_core::OutcomeCategory;
///
/// assert_eq!(OutcomeCategory::Pass.to_string(), "pass");
/// assert!(OutcomeCategory::Error.is_failing());
/// assert!(!OutcomeCategory::Skipped.is_failing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCategory {
    /// Test executed and passed.
    Pass,
    /// Test executed and failed.
    Fail,
    /// Test could not complete (crash, exception, environment error).
    Error,
    /// Test explicitly not run (n/a, pending, skipped).
    Skipped,
    /// Cell text did not match any known pattern.
    Unknown,
}

impl OutcomeCategory {
    /// All categories in display order.
    pub const ALL: [OutcomeCategory; 5] = [
        OutcomeCategory::Pass,
        OutcomeCategory::Fail,
        OutcomeCategory::Error,
        OutcomeCategory::Skipped,
        OutcomeCategory::Unknown,
    ];

    /// The snake_case label, identical to the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for categories retained in the failing-row list.
    pub fn is_failing(&self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }
}

impl std::fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-category counters for one sheet or one whole run.
///
/// Counters are threaded functionally through the row loop: [`record`]
/// consumes and returns the value instead of mutating shared state.
///
/// # Examples
///
/// ```
/// use qa_report_core::{OutcomeCategory, OutcomeCounts};
///
/// let counts = OutcomeCounts::default()
///     .record(OutcomeCategory::Pass)
///     .record(OutcomeCategory::Pass)
///     .record(OutcomeCategory::Fail);
///
/// assert_eq!(counts.evaluated(), 3);
/// assert_eq!(counts.pass_rate(), Some(2.0 / 3.0));
/// ```
///
/// [`record`]: OutcomeCounts::record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub pass: u64,
    pub fail: u64,
    pub error: u64,
    pub skipped: u64,
    pub unknown: u64,
}

impl OutcomeCounts {
    /// Returns a copy with the counter for `category` incremented.
    #[must_use]
    pub fn record(mut self, category: OutcomeCategory) -> Self {
        match category {
            OutcomeCategory::Pass => self.pass += 1,
            OutcomeCategory::Fail => self.fail += 1,
            OutcomeCategory::Error => self.error += 1,
            OutcomeCategory::Skipped => self.skipped += 1,
            OutcomeCategory::Unknown => self.unknown += 1,
        }
        self
    }

    /// Returns the component-wise sum of two count sets.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            pass: self.pass + other.pass,
            fail: self.fail + other.fail,
            error: self.error + other.error,
            skipped: self.skipped + other.skipped,
            unknown: self.unknown + other.unknown,
        }
    }

    /// Total rows evaluated: the sum over all five categories.
    pub fn evaluated(&self) -> u64 {
        self.pass + self.fail + self.error + self.skipped + self.unknown
    }

    /// Rows with a decided outcome: pass + fail + error.
    pub fn decided(&self) -> u64 {
        self.pass + self.fail + self.error
    }

    /// Pass rate over decided rows: pass / (pass + fail + error).
    ///
    /// Skipped and unknown rows are excluded from the denominator. This
    /// convention is fixed for every report and history record; it never
    /// varies with sheet content. Returns `None` when no row was decided.
    pub fn pass_rate(&self) -> Option<f64> {
        let decided = self.decided();
        if decided == 0 {
            None
        } else {
            Some(self.pass as f64 / decided as f64)
        }
    }

    /// The counter for `category`.
    pub fn get(&self, category: OutcomeCategory) -> u64 {
        match category {
            OutcomeCategory::Pass => self.pass,
            OutcomeCategory::Fail => self.fail,
            OutcomeCategory::Error => self.error,
            OutcomeCategory::Skipped => self.skipped,
            OutcomeCategory::Unknown => self.unknown,
        }
    }
}

/// One evaluated row. Created during aggregation, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowResult {
    /// 1-based row number as displayed in the sheet (header is row 1).
    pub row: u32,
    /// Column letter the outcome text was read from (e.g. "J").
    pub column: String,
    /// Raw cell text before normalization.
    pub text: String,
    /// Classified outcome.
    pub category: OutcomeCategory,
    /// Optional free-text note attached by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// How a sheet's outcome column(s) were, or were not, resolved.
///
/// A degraded sheet stays in the run with zero rows evaluated and the
/// failure reason recorded, so no configured sheet ever disappears from a
/// report silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetResolution {
    /// Outcome columns located; letters in evaluation order.
    Resolved { columns: Vec<String> },
    /// The sheet could not be evaluated.
    Degraded { reason: String },
}

impl SheetResolution {
    /// Returns `true` when the sheet was evaluated.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Aggregate over one worksheet.
///
/// Invariant: `counts.evaluated() == rows_evaluated`. Rows that are
/// entirely blank are excluded before counting; rows with unrecognized
/// outcome text count under [`OutcomeCategory::Unknown`], never dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSummary {
    /// Worksheet name from the configuration.
    pub name: String,
    /// Column resolution outcome.
    pub resolution: SheetResolution,
    /// Per-category counts.
    pub counts: OutcomeCounts,
    /// Fail/error rows in sheet order, capped by the configured limit.
    pub failing: Vec<RowResult>,
    /// Failing rows beyond the cap, dropped from `failing` but counted.
    pub failing_overflow: u64,
    /// Total rows evaluated (blank rows excluded).
    pub rows_evaluated: u64,
}

impl SheetSummary {
    /// A degraded summary: zero rows evaluated, reason recorded.
    pub fn degraded(name: &str, reason: &str) -> Self {
        Self {
            name: name.to_string(),
            resolution: SheetResolution::Degraded {
                reason: reason.to_string(),
            },
            counts: OutcomeCounts::default(),
            failing: Vec::new(),
            failing_overflow: 0,
            rows_evaluated: 0,
        }
    }

    /// Pass rate for this sheet (see [`OutcomeCounts::pass_rate`]).
    pub fn pass_rate(&self) -> Option<f64> {
        self.counts.pass_rate()
    }

    /// Total failing rows, including those dropped past the cap.
    pub fn failing_total(&self) -> u64 {
        self.failing.len() as u64 + self.failing_overflow
    }
}

/// Aggregate over all configured sheets for one invocation.
///
/// Built once by the run aggregator and appended immutably to the history
/// store; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Report contract version (populated from [`REPORT_CONTRACT_VERSION`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Workbook file name (not the full path).
    pub source_file: String,
    /// SHA-256 of the workbook bytes, for trend correlation.
    pub source_sha256: String,
    /// Per-sheet summaries in configured order.
    pub sheets: Vec<SheetSummary>,
    /// Grand totals over all sheets.
    pub totals: OutcomeCounts,
    /// Sheets that were evaluated.
    pub sheets_analyzed: usize,
    /// Sheets recorded as degraded.
    pub sheets_degraded: usize,
    /// Overall pass rate per [`OutcomeCounts::pass_rate`].
    pub pass_rate: Option<f64>,
}

impl RunSummary {
    /// Builds a run summary from per-sheet results, computing grand totals
    /// and the overall pass rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use qa_report_core::{RunSummary, SheetSummary};
    ///
    /// let sheets = vec![SheetSummary::degraded("Missing", "sheet not found")];
    /// let run = RunSummary::from_sheets(
    ///     "2026-02-01T08:00:00Z".into(),
    ///     "results.xlsx".into(),
    ///     "deadbeef".into(),
    ///     sheets,
    /// );
    /// assert_eq!(run.sheets_degraded, 1);
    /// assert_eq!(run.pass_rate, None);
    /// ```
    pub fn from_sheets(
        generated_at: String,
        source_file: String,
        source_sha256: String,
        sheets: Vec<SheetSummary>,
    ) -> Self {
        let totals = sheets
            .iter()
            .fold(OutcomeCounts::default(), |acc, s| acc.merge(s.counts));
        let sheets_analyzed = sheets
            .iter()
            .filter(|s| s.resolution.is_resolved())
            .count();
        let sheets_degraded = sheets.len() - sheets_analyzed;
        let pass_rate = totals.pass_rate();

        Self {
            schema_version: Some(REPORT_CONTRACT_VERSION.to_string()),
            generated_at,
            source_file,
            source_sha256,
            sheets,
            totals,
            sheets_analyzed,
            sheets_degraded,
            pass_rate,
        }
    }

    /// Total rows evaluated across all sheets.
    pub fn rows_evaluated(&self) -> u64 {
        self.totals.evaluated()
    }
}
