use std::path::PathBuf;

use thiserror::Error;

/// Structural ingest failures. Any of these aborts the whole run; row-level
/// problems are never reported through this type.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported encoding in {}: {encoding}", path.display())]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    #[error("failed to parse CSV {}: {message}", path.display())]
    CsvParse { path: PathBuf, message: String },

    #[error("workbook contains no sheets")]
    EmptyWorkbook,

    #[error("sheet {sheet:?} has no header row")]
    NoHeaderRow { sheet: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
