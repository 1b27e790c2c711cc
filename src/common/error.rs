use std::num::ParseIntError;

/// Failures raised by [`crate::io::store::RecordStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: field `{field}` is not an integer in {raw:?}: {source}")]
    Parse {
        line: u64,
        field: &'static str,
        raw: String,
        source: ParseIntError,
    },
    #[error("line {line}: expected 4 fields, found {found} in {raw:?}")]
    Arity { line: u64, found: usize, raw: String },
    #[error("account source reported {size} accounts but has none at index {index}")]
    SourceShort { index: usize, size: usize },
}

impl StoreError {
    /// True for errors caused by the content of a data line rather than the file system.
    pub fn is_malformed_line(&self) -> bool {
        matches!(self, StoreError::Parse { .. } | StoreError::Arity { .. })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: String,
        source: serde_json::Error,
    },
    #[error("account {0} already exists")]
    DuplicateAccount(i64),
    #[error("account {0} not found")]
    UnknownAccount(i64),
    #[error("{field} {value:?} cannot be stored: it contains a line break or the field delimiter")]
    InvalidField { field: &'static str, value: String },
    #[error("{0}")]
    Usage(#[from] clap::Error),
}
