//! PostgreSQL implementation of the artifact store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{ArtifactStore, StoreError, StoredArtifact};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS artifacts (\
     key TEXT PRIMARY KEY, \
     body BYTEA NOT NULL, \
     modified_at TIMESTAMPTZ NOT NULL DEFAULT now())";

/// Artifact store backed by a single `artifacts` table.
///
/// A `put` is one upsert statement, so readers see either the old or the
/// new row.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url` and makes sure the `artifacts` table exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection or the schema
    /// statement fails.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the `artifacts` table if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for PostgresStore {
    async fn get(&self, key: &str) -> Result<Option<StoredArtifact>, StoreError> {
        let row = sqlx::query_as::<_, (Vec<u8>, DateTime<Utc>)>(
            "SELECT body, modified_at FROM artifacts WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(bytes, modified_at)| StoredArtifact { bytes, modified_at }))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        sqlx::query(
            "INSERT INTO artifacts (key, body, modified_at) VALUES ($1, $2, now()) \
             ON CONFLICT (key) DO UPDATE SET body = EXCLUDED.body, modified_at = EXCLUDED.modified_at",
        )
        .bind(key)
        .bind(bytes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
