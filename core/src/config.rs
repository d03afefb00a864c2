//! Run configuration: which worksheets to scan and where their outcome
//! columns live.
//!
//! Loaded from a YAML file once at process start into an immutable value
//! that is passed explicitly into the run aggregator; nested components
//! never read configuration ad hoc.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! failing_row_cap: 500
//! sheets:
//!   - name: "SMS template"
//!     columns: [I]
//!   - name: "Conversation Flow_main menu"
//!     columns: [K, L]
//!   - name: "Accessibility"
//!     columns: []
//! ```

use std::collections::HashSet;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::columns::column_letter_to_index;
use crate::error::{ConfigError, Result};

/// Default cap on retained failing rows per sheet.
pub const DEFAULT_FAILING_ROW_CAP: usize = 500;

/// Static description of one worksheet to scan.
///
/// # Examples
///
/// ```
/// # let yaml = r#"name: "Auth New OP"
/// # columns: [K]"#;
/// let sheet: qa_report_core::SheetConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(sheet.columns, vec!["K"]);
/// assert!(!sheet.auto_detect());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Worksheet name, matched exactly against the workbook.
    pub name: String,
    /// Excel-style column letters holding outcome text, in evaluation
    /// order. Empty means auto-detect (header scan, then value sampling).
    #[serde(default)]
    pub columns: Vec<String>,
}

impl SheetConfig {
    /// Configuration for a sheet whose outcome column is auto-detected.
    pub fn auto(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Configuration with explicit column letters.
    pub fn with_columns(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Returns `true` when no explicit column hint is configured.
    pub fn auto_detect(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Top-level run configuration, loaded once per invocation.
///
/// # Examples
///
/// ```no_run
/// use qa_report_core::RunConfig;
///
/// let config = RunConfig::load("qa-sheets.yml").unwrap();
/// for sheet in &config.sheets {
///     println!("{}", sheet.name);
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Configuration format version (e.g. `"1.0"`).
    pub version: String,
    /// Cap on retained failing rows per sheet.
    #[serde(default = "default_failing_row_cap")]
    pub failing_row_cap: usize,
    /// Worksheets to scan, in report order.
    pub sheets: Vec<SheetConfig>,
}

fn default_failing_row_cap() -> usize {
    DEFAULT_FAILING_ROW_CAP
}

impl RunConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if parsing fails, or any [`validate`] error.
    ///
    /// [`validate`]: RunConfig::validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Validates structural invariants: at least one sheet, no duplicate
    /// sheet names, column references must be letter references.
    pub fn validate(&self) -> Result<()> {
        if self.sheets.is_empty() {
            return Err(ConfigError::NoSheets);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for sheet in &self.sheets {
            if sheet.name.trim().is_empty() {
                return Err(ConfigError::EmptySheetName);
            }
            if !seen.insert(sheet.name.as_str()) {
                return Err(ConfigError::DuplicateSheet(sheet.name.clone()));
            }
            for reference in &sheet.columns {
                if column_letter_to_index(reference).is_err() {
                    return Err(ConfigError::InvalidColumnRef {
                        sheet: sheet.name.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up the configuration for a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&SheetConfig> {
        self.sheets.iter().find(|s| s.name == name)
    }
}
