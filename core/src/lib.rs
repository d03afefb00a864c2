//! Core types, outcome classification, and run configuration for QA result
//! aggregation.
//!
//! This crate defines the foundational pieces shared by the analysis and
//! history crates:
//!
//! - [`OutcomeCategory`] / [`OutcomeCounts`] — the canonical outcome model
//!   and per-category counters.
//! - [`RowResult`], [`SheetSummary`], [`RunSummary`] — immutable aggregation
//!   records, from one evaluated row up to one whole invocation.
//! - [`classify`](classify::classify) — the pure pattern-based outcome
//!   classifier.
//! - [`columns`] — outcome-column resolution (letter hints, header keyword
//!   scan, value-sampling fallback).
//! - [`RunConfig`] / [`SheetConfig`] — the immutable YAML run configuration.
//!
//! # Example
//!
//! ```
//! use qa_report_core::{OutcomeCategory, OutcomeCounts, classify::classify};
//!
//! let cells = ["Passed", "FAILED", "n/a", "tbd?"];
//! let counts = cells
//!     .iter()
//!     .fold(OutcomeCounts::default(), |acc, cell| acc.record(classify(cell)));
//!
//! assert_eq!(counts.pass, 1);
//! assert_eq!(counts.fail, 1);
//! assert_eq!(counts.skipped, 1);
//! assert_eq!(counts.unknown, 1);
//! assert_eq!(counts.evaluated(), 4);
//! assert_eq!(counts.pass_rate(), Some(0.5));
//! ```

pub mod classify;
pub mod columns;
mod config;
mod error;
mod types;

pub use config::{DEFAULT_FAILING_ROW_CAP, RunConfig, SheetConfig};
pub use error::{ConfigError, Result};
pub use types::*;
