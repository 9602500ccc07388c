//! Directory-backed store: one JSON state file plus one JSON file per staged
//! chunk. Good enough for local imports and for exercising the full
//! pipeline; a networked deployment implements [`VersionStore`] over RPC
//! instead.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::Utc;
use juris_model::{NormalizedRecord, Version, VersionId, VersionStatus};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{PublishError, Result};
use crate::store::VersionStore;

const STATE_FILE: &str = "state.json";
const STAGED_DIR: &str = "staged";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    versions: Vec<Version>,
    active: Option<VersionId>,
    next_number: u64,
}

/// File-system store rooted at a directory.
///
/// A process-wide mutex serializes all writers; the state file is replaced
/// via a temp-file rename so a crash never leaves a half-written state.
pub struct JsonStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl JsonStore {
    /// Opens (or initializes) a store at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(root.join(STAGED_DIR))?;
        let store = Self {
            root,
            lock: Mutex::new(()),
        };
        if !store.state_path().exists() {
            store.save_state(&StoreState::default())?;
        }
        Ok(store)
    }

    fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    fn load_state(&self) -> Result<StoreState> {
        let bytes = std::fs::read(self.state_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save_state(&self, state: &StoreState) -> Result<()> {
        let tmp = self.root.join(format!("{STATE_FILE}.tmp"));
        std::fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        std::fs::rename(&tmp, self.state_path())?;
        Ok(())
    }

    fn chunk_dir(&self, id: &VersionId) -> PathBuf {
        self.root.join(STAGED_DIR).join(id.as_str())
    }

    fn chunk_path(&self, id: &VersionId, checksum: &str, chunk_index: usize) -> PathBuf {
        self.chunk_dir(id)
            .join(format!("{checksum}.{chunk_index:06}.json"))
    }

    fn with_version<T>(
        state: &mut StoreState,
        id: &VersionId,
        f: impl FnOnce(&mut Version) -> Result<T>,
    ) -> Result<T> {
        let version = state
            .versions
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))?;
        f(version)
    }
}

impl VersionStore for JsonStore {
    async fn create_version(&self) -> Result<Version> {
        let _guard = self.lock.lock().await;
        let mut state = self.load_state()?;
        state.next_number += 1;
        let version = Version {
            id: VersionId::new(format!("v-{}", state.next_number))?,
            number: state.next_number,
            status: VersionStatus::Draft,
            created_at: Utc::now(),
            published_at: None,
        };
        state.versions.push(version.clone());
        self.save_state(&state)?;
        Ok(version)
    }

    async fn version(&self, id: &VersionId) -> Result<Version> {
        let _guard = self.lock.lock().await;
        let state = self.load_state()?;
        state
            .versions
            .into_iter()
            .find(|v| &v.id == id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))
    }

    async fn versions(&self) -> Result<Vec<Version>> {
        let _guard = self.lock.lock().await;
        let mut versions = self.load_state()?.versions;
        versions.sort_by_key(|v| v.number);
        Ok(versions)
    }

    async fn stage_chunk(
        &self,
        id: &VersionId,
        checksum: &str,
        chunk_index: usize,
        records: &[NormalizedRecord],
    ) -> Result<()> {
        let _guard = self.lock.lock().await;
        let state = self.load_state()?;
        if !state.versions.iter().any(|v| &v.id == id) {
            return Err(PublishError::VersionNotFound(id.clone()));
        }

        let path = self.chunk_path(id, checksum, chunk_index);
        if path.exists() {
            // Already staged by an earlier attempt with the same checksum.
            return Ok(());
        }
        std::fs::create_dir_all(self.chunk_dir(id))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(records)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    async fn staged_chunks(&self, id: &VersionId, checksum: &str) -> Result<BTreeSet<usize>> {
        let _guard = self.lock.lock().await;
        let mut chunks = BTreeSet::new();
        let dir = self.chunk_dir(id);
        if !dir.exists() {
            return Ok(chunks);
        }
        for entry in std::fs::read_dir(&dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(index) = parse_chunk_index(name, checksum) {
                chunks.insert(index);
            }
        }
        Ok(chunks)
    }

    async fn staged_count(&self, id: &VersionId) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let dir = self.chunk_dir(id);
        if !dir.exists() {
            return Ok(0);
        }
        let mut count = 0usize;
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            let records: Vec<NormalizedRecord> = serde_json::from_slice(&bytes)?;
            count += records.len();
        }
        Ok(count)
    }

    async fn set_status(&self, id: &VersionId, status: VersionStatus) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut state = self.load_state()?;
        Self::with_version(&mut state, id, |v| Ok(v.transition(status)?))?;
        self.save_state(&state)
    }

    async fn publish_swap(&self, id: &VersionId) -> Result<Version> {
        let _guard = self.lock.lock().await;
        let mut state = self.load_state()?;

        let current = state
            .versions
            .iter()
            .find(|v| &v.id == id)
            .ok_or_else(|| PublishError::VersionNotFound(id.clone()))?;
        if current.status != VersionStatus::Staged {
            return Err(PublishError::InvalidState {
                id: id.clone(),
                status: current.status.label().to_string(),
                expected: VersionStatus::Staged.label().to_string(),
            });
        }

        if let Some(previous) = state.active.clone() {
            Self::with_version(&mut state, &previous, |v| Ok(v.transition(VersionStatus::Retired)?))?;
        }
        let published =
            Self::with_version(&mut state, id, |v| {
                v.transition(VersionStatus::Published)?;
                Ok(v.clone())
            })?;
        state.active = Some(id.clone());

        // The swap becomes visible in one rename; readers see either the old
        // state file or the new one, never a mix.
        self.save_state(&state)?;
        Ok(published)
    }

    async fn active_version(&self) -> Result<Option<Version>> {
        let _guard = self.lock.lock().await;
        let state = self.load_state()?;
        Ok(match state.active {
            Some(id) => state.versions.into_iter().find(|v| v.id == id),
            None => None,
        })
    }
}

fn parse_chunk_index(file_name: &str, checksum: &str) -> Option<usize> {
    let rest = file_name.strip_prefix(checksum)?.strip_prefix('.')?;
    rest.strip_suffix(".json")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use juris_model::{RowRef, TestemunhaRecord};
    use tempfile::TempDir;

    fn record(row: usize) -> NormalizedRecord {
        NormalizedRecord::Testemunha(TestemunhaRecord {
            nome_testemunha: "Maria".to_string(),
            cnjs_como_testemunha: vec!["123".to_string()],
            source: RowRef {
                sheet: "t".to_string(),
                row,
            },
        })
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let id = {
            let store = JsonStore::open(dir.path()).unwrap();
            store.create_version().await.unwrap().id
        };
        let store = JsonStore::open(dir.path()).unwrap();
        let version = store.version(&id).await.unwrap();
        assert_eq!(version.number, 1);
    }

    #[tokio::test]
    async fn staged_chunks_resume_from_disk() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let version = store.create_version().await.unwrap();

        store
            .stage_chunk(&version.id, "abc", 0, &[record(0), record(1)])
            .await
            .unwrap();
        store
            .stage_chunk(&version.id, "abc", 2, &[record(2)])
            .await
            .unwrap();

        let chunks = store.staged_chunks(&version.id, "abc").await.unwrap();
        assert_eq!(chunks, BTreeSet::from([0, 2]));
        assert_eq!(store.staged_count(&version.id).await.unwrap(), 3);

        // Re-writing chunk 0 is a no-op.
        store
            .stage_chunk(&version.id, "abc", 0, &[record(9)])
            .await
            .unwrap();
        assert_eq!(store.staged_count(&version.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn publish_swap_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        let version = store.create_version().await.unwrap();
        store
            .set_status(&version.id, VersionStatus::Staged)
            .await
            .unwrap();
        let published = store.publish_swap(&version.id).await.unwrap();
        assert_eq!(published.status, VersionStatus::Published);
        assert!(published.published_at.is_some());

        let active = store.active_version().await.unwrap().unwrap();
        assert_eq!(active.id, version.id);
    }
}
