//! Error types for history store operations.

use thiserror::Error;

/// Errors raised while appending to or reading the history store.
///
/// An append failure is fatal to the run's tracked status only: the
/// in-memory run summary and any report artifacts already written stay
/// valid and on disk.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization or parsing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for results with [`PersistenceError`].
pub type Result<T> = std::result::Result<T, PersistenceError>;
