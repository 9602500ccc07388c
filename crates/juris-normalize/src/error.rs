use thiserror::Error;

/// Structural normalization failures.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// An ambiguous sheet reached the normalizer without a model override.
    #[error("sheet {sheet:?} is ambiguous; resolve its model before normalizing")]
    AmbiguousSheet { sheet: String },

    /// A detected sheet has no matching raw sheet in the workbook.
    #[error("sheet {sheet:?} not present in the decoded workbook")]
    MissingSheet { sheet: String },
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
