//! The three-phase staged publish workflow.

use std::time::Duration;

use juris_model::{NormalizedBatch, PublishResult, Version, VersionId, VersionStatus};

use crate::error::{PublishError, Result};
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::store::VersionStore;

/// Configuration for the network-bound phases.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Rows per staged chunk. Bounds memory for large imports and gives a
    /// retry something to resume from.
    pub chunk_size: usize,
    /// Deadline per chunk write. The original deployment allowed about
    /// eight minutes for a whole large file; this is configuration, not a
    /// constant of the pipeline.
    pub stage_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            stage_timeout: Duration::from_secs(480),
            retry: RetryPolicy::default(),
        }
    }
}

/// Orchestrates `create -> stage -> publish` against a [`VersionStore`].
pub struct Publisher<S> {
    store: S,
    config: PublisherConfig,
}

impl<S: VersionStore> Publisher<S> {
    pub fn new(store: S, config: PublisherConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Phase one: allocate a fresh draft.
    ///
    /// Not idempotent; call once per logical import attempt.
    pub async fn create_version(&self) -> Result<Version> {
        let version = self.store.create_version().await?;
        tracing::info!(version = %version.id, number = version.number, "created draft version");
        Ok(version)
    }

    /// Phase two: bulk-write the batch under the draft version.
    ///
    /// Idempotent on `checksum`: chunks already staged for the same checksum
    /// are skipped, so a timeout-triggered client retry converges on the
    /// same final row count instead of duplicating. Transient chunk
    /// failures are retried with capped exponential backoff; terminal
    /// failures mark the version failed and propagate.
    pub async fn stage(
        &self,
        id: &VersionId,
        batch: &NormalizedBatch,
        checksum: &str,
    ) -> Result<usize> {
        let version = self.store.version(id).await?;
        let records = batch.to_records();
        let chunk_size = self.config.chunk_size.max(1);
        let already = self.store.staged_chunks(id, checksum).await?;

        let chunks: Vec<_> = records.chunks(chunk_size).enumerate().collect();
        let total = chunks.len();
        for (index, chunk) in chunks {
            if already.contains(&index) {
                tracing::debug!(version = %id, chunk = index, "chunk already staged, skipping");
                continue;
            }
            let write = retry_with_backoff(&self.config.retry, || async {
                match tokio::time::timeout(
                    self.config.stage_timeout,
                    self.store.stage_chunk(id, checksum, index, chunk),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => Err(PublishError::Timeout(self.config.stage_timeout)),
                }
            })
            .await;

            if let Err(err) = write {
                // Leave the version out of the publishable path; staged
                // chunks stay behind for a retry with the same checksum.
                if !err.is_retryable() {
                    self.store.set_status(id, VersionStatus::Failed).await.ok();
                }
                return Err(err);
            }
            tracing::debug!(version = %id, chunk = index, total, "staged chunk");
        }

        // A retry of an already-staged version skips the transition.
        if version.status == VersionStatus::Draft {
            self.store.set_status(id, VersionStatus::Staged).await?;
        }
        let staged = self.store.staged_count(id).await?;
        tracing::info!(version = %id, staged, "staging complete");
        Ok(staged)
    }

    /// Phase three: the atomic visibility switch.
    ///
    /// Refuses when the staged row count diverges from the validated count
    /// that authorized this import; that guards against partial or aborted
    /// staging ever becoming readable.
    pub async fn publish(&self, id: &VersionId, expected_valid: usize) -> Result<PublishResult> {
        let staged = self.store.staged_count(id).await?;
        if staged != expected_valid {
            return Err(PublishError::CountMismatch {
                expected: expected_valid,
                staged,
            });
        }

        let version = self.store.publish_swap(id).await?;
        let published_at = version.published_at.unwrap_or_else(chrono::Utc::now);
        tracing::info!(version = %id, number = version.number, staged, "published version");
        Ok(PublishResult {
            version_number: version.number,
            imported_count: staged,
            published_at,
        })
    }
}
