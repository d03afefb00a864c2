//! Error types for configuration loading and validation.
//!
//! Configuration errors are fatal at startup: they are raised before any
//! workbook is loaded or any sheet is aggregated. Per-sheet resolution
//! failures live in [`columns::ResolveError`](crate::columns::ResolveError)
//! and only ever degrade a single sheet.

use thiserror::Error;

/// Errors raised while loading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration lists no sheets.
    #[error("configuration lists no sheets")]
    NoSheets,

    /// A sheet entry has an empty name.
    #[error("sheet name cannot be empty")]
    EmptySheetName,

    /// Two sheet entries share the same name.
    #[error("duplicate sheet in configuration: {0}")]
    DuplicateSheet(String),

    /// A configured column reference is not an Excel-style letter.
    #[error("invalid column reference {reference:?} for sheet {sheet:?}")]
    InvalidColumnRef { sheet: String, reference: String },
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
