//! In-memory store, used by tests and as the reference implementation of the
//! staging/publish semantics.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use juris_model::{NormalizedRecord, Version, VersionId, VersionStatus};
use tokio::sync::Mutex;

use crate::error::{PublishError, Result};
use crate::store::VersionStore;

#[derive(Default)]
struct Inner {
    versions: BTreeMap<VersionId, Version>,
    /// `(version, checksum) -> chunk_index -> rows`.
    staged: BTreeMap<(VersionId, String), BTreeMap<usize, Vec<NormalizedRecord>>>,
    active: Option<VersionId>,
    next_number: u64,
}

/// Reference store. A single mutex serializes every operation, which makes
/// `publish_swap` trivially a critical section.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// Pending injected failures for `stage_chunk`; tests use this to model
    /// timeouts and connection resets.
    transient_failures: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `n` calls to `stage_chunk` fail transiently.
    pub fn inject_transient_failures(&self, n: usize) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl VersionStore for MemoryStore {
    async fn create_version(&self) -> Result<Version> {
        let mut inner = self.inner.lock().await;
        inner.next_number += 1;
        let number = inner.next_number;
        let version = Version {
            id: VersionId::new(format!("v-{number}"))?,
            number,
            status: VersionStatus::Draft,
            created_at: Utc::now(),
            published_at: None,
        };
        inner.versions.insert(version.id.clone(), version.clone());
        Ok(version)
    }

    async fn version(&self, id: &VersionId) -> Result<Version> {
        let inner = self.inner.lock().await;
        inner
            .versions
            .get(id)
            .cloned()
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))
    }

    async fn versions(&self) -> Result<Vec<Version>> {
        let inner = self.inner.lock().await;
        let mut all: Vec<Version> = inner.versions.values().cloned().collect();
        all.sort_by_key(|v| v.number);
        Ok(all)
    }

    async fn stage_chunk(
        &self,
        id: &VersionId,
        checksum: &str,
        chunk_index: usize,
        records: &[NormalizedRecord],
    ) -> Result<()> {
        if self.take_failure() {
            return Err(PublishError::Transient("injected failure".to_string()));
        }

        let mut inner = self.inner.lock().await;
        if !inner.versions.contains_key(id) {
            return Err(PublishError::VersionNotFound(id.clone()));
        }
        inner
            .staged
            .entry((id.clone(), checksum.to_string()))
            .or_default()
            .entry(chunk_index)
            .or_insert_with(|| records.to_vec());
        Ok(())
    }

    async fn staged_chunks(&self, id: &VersionId, checksum: &str) -> Result<BTreeSet<usize>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .staged
            .get(&(id.clone(), checksum.to_string()))
            .map(|chunks| chunks.keys().copied().collect())
            .unwrap_or_default())
    }

    async fn staged_count(&self, id: &VersionId) -> Result<usize> {
        let inner = self.inner.lock().await;
        Ok(inner
            .staged
            .iter()
            .filter(|((version, _), _)| version == id)
            .flat_map(|(_, chunks)| chunks.values())
            .map(Vec::len)
            .sum())
    }

    async fn set_status(&self, id: &VersionId, status: VersionStatus) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let version = inner
            .versions
            .get_mut(id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))?;
        version.transition(status)?;
        Ok(())
    }

    async fn publish_swap(&self, id: &VersionId) -> Result<Version> {
        let mut inner = self.inner.lock().await;

        let current = inner
            .versions
            .get(id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))?;
        if current.status != VersionStatus::Staged {
            return Err(PublishError::InvalidState {
                id: id.clone(),
                status: current.status.label().to_string(),
                expected: VersionStatus::Staged.label().to_string(),
            });
        }

        // Retire the previous active version first, then flip the pointer.
        // Both happen under the same lock, so no reader interleaves.
        if let Some(previous) = inner.active.clone() {
            if let Some(version) = inner.versions.get_mut(&previous) {
                version.transition(VersionStatus::Retired)?;
            }
        }
        let version = inner
            .versions
            .get_mut(id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))?;
        version.transition(VersionStatus::Published)?;
        let published = version.clone();
        inner.active = Some(id.clone());
        Ok(published)
    }

    async fn active_version(&self) -> Result<Option<Version>> {
        let inner = self.inner.lock().await;
        Ok(match &inner.active {
            Some(id) => inner.versions.get(id).cloned(),
            None => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versions_are_monotonically_numbered() {
        let store = MemoryStore::new();
        let first = store.create_version().await.unwrap();
        let second = store.create_version().await.unwrap();
        assert_eq!(first.number + 1, second.number);
        assert_eq!(first.status, VersionStatus::Draft);
    }

    #[tokio::test]
    async fn restaging_a_chunk_does_not_duplicate() {
        let store = MemoryStore::new();
        let version = store.create_version().await.unwrap();
        let records = vec![];

        store
            .stage_chunk(&version.id, "abc", 0, &records)
            .await
            .unwrap();
        store
            .stage_chunk(&version.id, "abc", 0, &records)
            .await
            .unwrap();

        let chunks = store.staged_chunks(&version.id, "abc").await.unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn publish_swap_retires_the_previous_active() {
        let store = MemoryStore::new();

        let first = store.create_version().await.unwrap();
        store
            .set_status(&first.id, VersionStatus::Staged)
            .await
            .unwrap();
        store.publish_swap(&first.id).await.unwrap();

        let second = store.create_version().await.unwrap();
        store
            .set_status(&second.id, VersionStatus::Staged)
            .await
            .unwrap();
        store.publish_swap(&second.id).await.unwrap();

        let active = store.active_version().await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        let first_now = store.version(&first.id).await.unwrap();
        assert_eq!(first_now.status, VersionStatus::Retired);
    }

    #[tokio::test]
    async fn publish_swap_requires_staged_status() {
        let store = MemoryStore::new();
        let version = store.create_version().await.unwrap();
        let result = store.publish_swap(&version.id).await;
        assert!(matches!(result, Err(PublishError::InvalidState { .. })));
    }
}
