//! Per-tournament mutual exclusion for ingestion cycles.
//!
//! [`TournamentLocks`] hands out one [`tokio::sync::Mutex`] per tournament
//! key. Cycles for the same tournament are serialized so two fetches never
//! interleave writes to the same persisted artifact; cycles for different
//! tournaments run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Registry of per-tournament cycle locks.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<Mutex<()>>` for the tournament scope itself.
#[derive(Debug, Default)]
pub struct TournamentLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl TournamentLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `tournament_key` and returns the guard.
    ///
    /// The scope is released when the guard is dropped.
    pub async fn acquire(&self, tournament_key: &str) -> OwnedMutexGuard<()> {
        let lock = self.lock_for(tournament_key).await;
        lock.lock_owned().await
    }

    /// Returns `true` if a cycle currently holds the tournament's scope.
    pub async fn is_busy(&self, tournament_key: &str) -> bool {
        let map = self.locks.read().await;
        map.get(tournament_key)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    async fn lock_for(&self, tournament_key: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(tournament_key) {
            return Arc::clone(lock);
        }
        let mut map = self.locks.write().await;
        Arc::clone(
            map.entry(tournament_key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_tournament_is_serialized() {
        let locks = Arc::new(TournamentLocks::new());
        let guard = locks.acquire("big_rock").await;
        assert!(locks.is_busy("big_rock").await);

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.acquire("big_rock").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        let joined = tokio::time::timeout(Duration::from_secs(1), contender).await;
        assert!(matches!(joined, Ok(Ok(()))));
        assert!(!locks.is_busy("big_rock").await);
    }

    #[tokio::test]
    async fn different_tournaments_do_not_block() {
        let locks = TournamentLocks::new();
        let _a = locks.acquire("big_rock").await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("pirates_cove")).await;
        assert!(b.is_ok());
    }
}
