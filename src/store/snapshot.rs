/// Snapshot persistence
///
/// The whole learning state lives in one JSON document that is rewritten
/// after every mutation. There is no locking: two processes sharing a file
/// means last writer wins.

use crate::error::{LearningError, Result};
use crate::store::LearningData;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads and writes `learning.json`
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory if it doesn't exist
    pub async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Load the snapshot
    ///
    /// # Returns
    /// * `Ok(None)` - No file yet (first run)
    /// * `Ok(Some(data))` - Parsed snapshot
    /// * `Err(CorruptSnapshot)` - File exists but isn't learning data
    pub async fn load(&self) -> Result<Option<LearningData>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let data = serde_json::from_str(&raw).map_err(|source| LearningError::CorruptSnapshot {
            path: self.path.clone(),
            source,
        })?;

        info!("Loaded learning snapshot from {}", self.path.display());
        Ok(Some(data))
    }

    /// Rewrite the whole snapshot
    ///
    /// Writes a sibling temp file and renames it over the target so a crash
    /// mid-write never leaves half a document behind.
    pub async fn save(&self, data: &LearningData) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        let tmp = self.tmp_path();

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(
            "Saved learning snapshot ({} actions) to {}",
            data.actions.len(),
            self.path.display()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("learning.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("learning.json"));

        let mut data = LearningData::default();
        data.enabled = false;
        data.frequent_topics.insert("billing".to_string(), 3);

        store.save(&data).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, data);
        assert!(!store.tmp_path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learning.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SnapshotStore::new(&path);
        match store.load().await {
            Err(LearningError::CorruptSnapshot { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected CorruptSnapshot error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("learning.json");
        std::fs::write(&path, r#"{"enabled": "yes"}"#).unwrap();

        let store = SnapshotStore::new(&path);
        assert!(matches!(
            store.load().await,
            Err(LearningError::CorruptSnapshot { .. })
        ));
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_parents() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = SnapshotStore::new(nested.join("learning.json"));

        store.ensure_dir().await.unwrap();
        assert!(nested.is_dir());
    }
}
