//! Error types for test-data generation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Column {column} not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Sheet {sheet} not found in {}", path.display())]
    MissingSheet { sheet: String, path: PathBuf },

    #[error("Row {row}: cannot parse date {value:?}")]
    DateParse { row: usize, value: String },

    #[error("No valid SESSION_ID found in the file.")]
    NoValidSessionId,

    #[error("Invalid placeholder token: {0}")]
    InvalidPlaceholder(String),

    #[error("Value for {token} contains a placeholder delimiter: {value:?}")]
    PlaceholderCollision { token: String, value: String },

    #[error("Placeholder {0} does not occur in the template")]
    UnusedPlaceholder(String),

    #[error("Template still contains unresolved placeholders: {}", .0.join(", "))]
    UnresolvedPlaceholder(Vec<String>),

    #[error("Substituted template is not valid JSON: {0}")]
    TemplateJson(#[source] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DataResult<T> = Result<T, DataError>;

/// Read a fixture to a string, keeping the path in the error
pub(crate) fn read_to_string(path: &std::path::Path) -> DataResult<String> {
    std::fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })
}
