//! Append-only run history and trend reporting.
//!
//! The history store owns a durable, append-only CSV file of
//! [`HistoryRecord`]s, one per analysis run. The trend reporter reads that
//! sequence and computes first-to-last deltas and a moving average of the
//! pass rate. The split is strict: [`HistoryStore`] is the only writer,
//! [`TrendReport`] only consumes.
//!
//! # Example
//!
//! ```no_run
//! use qa_report_history::{HistoryStore, TrendReport, render_trend_text};
//!
//! let store = HistoryStore::new("qa_history.csv");
//! if let Some(report) = TrendReport::build(store.read_all().unwrap(), 3) {
//!     println!("{}", render_trend_text(&report));
//! }
//! ```

mod error;
mod store;
mod trend;

pub use error::{PersistenceError, Result};
pub use store::{HistoryRecord, HistoryStore};
pub use trend::{DEFAULT_TREND_WINDOW, TrendDelta, TrendReport, render_trend_text};
