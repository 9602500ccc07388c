use thiserror::Error;

/// Structural validation failures. Row-level findings are [`Issue`]s, never
/// errors.
///
/// [`Issue`]: juris_model::Issue
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The sheet's header set is missing columns its declared model requires.
    /// Reported before any per-row rule runs.
    #[error("sheet {sheet:?} is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        sheet: String,
        columns: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, ValidateError>;
