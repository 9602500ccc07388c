use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid version id: {0:?}")]
    InvalidVersionId(String),
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
