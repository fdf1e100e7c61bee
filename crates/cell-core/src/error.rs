use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the cell performance analyzer.
#[derive(Error, Debug)]
pub enum CellError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be parsed.
    #[error("Failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from a CSV file.
    #[error("Missing column `{column}` in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A cell value could not be parsed as a number.
    #[error("Invalid `{column}` value on line {line} of {path}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        column: String,
    },

    /// An error from the chart rendering backend.
    #[error("Chart render error: {0}")]
    ChartRender(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the analyzer crates.
pub type Result<T> = std::result::Result<T, CellError>;
