//! Configuration store for the user-editable [`Settings`].

use std::sync::Arc;

use super::{ArtifactStore, StoreError, keys, load_json, save_json};
use crate::domain::Settings;

/// Reads and replaces the settings document.
///
/// Unreadable or corrupt content never fails the caller: [`Self::get`]
/// falls back to [`Settings::default`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    store: Arc<dyn ArtifactStore>,
}

impl SettingsStore {
    /// Creates a settings store on top of an artifact store.
    #[must_use]
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    /// Returns the current settings, or the defaults when absent or
    /// unreadable.
    pub async fn get(&self) -> Settings {
        match load_json::<Settings>(self.store.as_ref(), keys::SETTINGS).await {
            Ok(Some((settings, _))) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    /// Replaces the whole settings document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails; the previous settings
    /// stay in place.
    pub async fn set(&self, settings: &Settings) -> Result<(), StoreError> {
        save_json(self.store.as_ref(), keys::SETTINGS, settings).await?;
        tracing::info!(
            tournament = %settings.tournament,
            data_source = %settings.data_source,
            "settings replaced"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::DataSource;
    use crate::persistence::MemoryStore;

    fn fixture() -> (Arc<MemoryStore>, SettingsStore) {
        let memory = Arc::new(MemoryStore::new());
        let settings = SettingsStore::new(Arc::<MemoryStore>::clone(&memory));
        (memory, settings)
    }

    #[tokio::test]
    async fn absent_settings_fall_back_to_default() {
        let (_, settings) = fixture();
        assert_eq!(settings.get().await, Settings::default());
    }

    #[tokio::test]
    async fn corrupt_settings_fall_back_to_default() {
        let (memory, settings) = fixture();
        tokio_test::assert_ok!(memory.put(keys::SETTINGS, b"not json".to_vec()).await);
        assert_eq!(settings.get().await, Settings::default());

        tokio_test::assert_ok!(
            memory
                .put(
                    keys::SETTINGS,
                    br#"{"tournament":"X","data_source":"historical"}"#.to_vec()
                )
                .await
        );
        assert_eq!(settings.get().await, Settings::default());
    }

    #[tokio::test]
    async fn set_replaces_wholesale() {
        let (_, settings) = fixture();
        let first = Settings {
            tournament: "Pirate's Cove".to_string(),
            data_source: DataSource::Demo,
        };
        tokio_test::assert_ok!(settings.set(&first).await);
        assert_eq!(settings.get().await, first);

        let second = Settings {
            tournament: "Big Rock".to_string(),
            data_source: DataSource::Live,
        };
        tokio_test::assert_ok!(settings.set(&second).await);
        assert_eq!(settings.get().await, second);
    }
}
