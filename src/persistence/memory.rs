//! Process-local artifact store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ArtifactStore, StoreError, StoredArtifact};

/// Artifact store kept in memory; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: RwLock<HashMap<String, StoredArtifact>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    /// Returns `true` if nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoredArtifact>, StoreError> {
        Ok(self.artifacts.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        let artifact = StoredArtifact {
            bytes,
            modified_at: Utc::now(),
        };
        self.artifacts.write().await.insert(key.to_string(), artifact);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        tokio_test::assert_ok!(store.put("k", b"1".to_vec()).await);
        tokio_test::assert_ok!(store.put("k", b"2".to_vec()).await);
        assert_eq!(store.len().await, 1);

        let Ok(Some(artifact)) = store.get("k").await else {
            panic!("expected artifact");
        };
        assert_eq!(artifact.bytes, b"2");
    }

    #[tokio::test]
    async fn empty_key_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.put("", Vec::new()).await,
            Err(StoreError::InvalidKey(_))
        ));
    }
}
