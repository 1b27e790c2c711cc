use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::error::AppError;

/// What `load` does with a line that has the wrong field count or a non-numeric id/balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Stop loading and return the error.
    #[default]
    Fail,
    /// Skip the line, note it in the error log and keep going.
    SkipAndLog,
}

/// Quoting rule for text fields.
///
/// `Never` keeps the plain `id,name,type,balance` format: a comma inside a
/// name splits the field. `Necessary` quotes fields that contain the
/// delimiter, which makes the file unreadable by tools expecting the plain
/// format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldQuoting {
    #[default]
    Never,
    Necessary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_path: PathBuf,
    pub error_log_path: PathBuf,
    /// A missing or empty data file loads as zero records instead of failing.
    pub treat_missing_as_empty: bool,
    pub malformed_lines: MalformedLinePolicy,
    pub quoting: FieldQuoting,
    /// Write `rewrite_all` output to a temporary sibling and rename it into place.
    pub atomic_rewrite: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("accounts.csv"),
            error_log_path: PathBuf::from("errors.log"),
            treat_missing_as_empty: true,
            malformed_lines: MalformedLinePolicy::Fail,
            quoting: FieldQuoting::Never,
            atomic_rewrite: false,
        }
    }
}

impl StoreConfig {
    pub fn new(data_path: impl Into<PathBuf>, error_log_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            error_log_path: error_log_path.into(),
            ..Self::default()
        }
    }

    /// Reads a JSON config file. Keys left out keep their defaults.
    ///
    /// ```json
    /// { "data_path": "bank.csv", "malformed_lines": "skip_and_log" }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }
}
