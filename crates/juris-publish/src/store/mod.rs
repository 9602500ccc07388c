//! The version-store boundary.
//!
//! This trait is the pipeline's only synchronization point: `publish_swap`
//! is the sole critical section, and implementations must serialize it so
//! readers never observe zero or two active versions.

use std::collections::BTreeSet;

use juris_model::{NormalizedRecord, Version, VersionId, VersionStatus};

use crate::error::Result;

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

pub trait VersionStore: Send + Sync {
    /// Allocates a new draft with the next monotonic number.
    ///
    /// Deliberately not idempotent: every call makes a new draft. Callers
    /// invoke it at most once per logical import attempt.
    fn create_version(&self) -> impl Future<Output = Result<Version>> + Send;

    fn version(&self, id: &VersionId) -> impl Future<Output = Result<Version>> + Send;

    /// All versions, oldest first. Retired versions are retained for audit.
    fn versions(&self) -> impl Future<Output = Result<Vec<Version>>> + Send;

    /// Writes one chunk of rows under `(version, checksum, chunk_index)`.
    ///
    /// Idempotent on that key: re-writing an already-staged chunk must not
    /// duplicate rows.
    fn stage_chunk(
        &self,
        id: &VersionId,
        checksum: &str,
        chunk_index: usize,
        records: &[NormalizedRecord],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Chunk indices already staged for the checksum. A retry resumes from
    /// here.
    fn staged_chunks(
        &self,
        id: &VersionId,
        checksum: &str,
    ) -> impl Future<Output = Result<BTreeSet<usize>>> + Send;

    /// Total rows staged for the version, across all chunks.
    fn staged_count(&self, id: &VersionId) -> impl Future<Output = Result<usize>> + Send;

    fn set_status(
        &self,
        id: &VersionId,
        status: VersionStatus,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Atomically publishes `id` and retires the previously active version.
    fn publish_swap(&self, id: &VersionId) -> impl Future<Output = Result<Version>> + Send;

    /// The single active published version, if any.
    fn active_version(&self) -> impl Future<Output = Result<Option<Version>>> + Send;
}
