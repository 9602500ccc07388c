//! Error taxonomy for the publish phases.
//!
//! Transient failures are safe to retry because staging is idempotent on the
//! session checksum; everything else is terminal and leaves the version
//! unpublished.

use std::time::Duration;

use juris_model::{ModelError, VersionId};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PublishError {
    /// A network-bound call exceeded its deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Connection reset, 5xx, and friends.
    #[error("transient store failure: {0}")]
    Transient(String),

    /// Staged rows diverge from the validation result that authorized the
    /// import. Never retried.
    #[error("staged row count {staged} does not match validated count {expected}")]
    CountMismatch { expected: usize, staged: usize },

    #[error("version {0} not found")]
    VersionNotFound(VersionId),

    /// The version is in the wrong phase for the requested call.
    #[error("version {id} is {status}, expected {expected}")]
    InvalidState {
        id: VersionId,
        status: String,
        expected: String,
    },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PublishError {
    /// Whether a retry with the same checksum may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transient(_))
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
