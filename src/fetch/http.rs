//! HTTP fetcher backed by `reqwest`.
//!
//! Expects each feed URL to answer with the already-extracted items as a
//! JSON array (the shape of [`RawRecord`] / [`RawParticipant`]). Rendering
//! the tournament pages and pulling items out of their HTML is the job of
//! the service behind those URLs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use super::{FetchError, Fetcher, RawParticipant, RawRecord, RawStanding};

/// User-Agent header sent with every request.
const USER_AGENT: &str = concat!("tourney-feed/", env!("CARGO_PKG_VERSION"));

/// Fetcher talking to a JSON feed endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Navigation`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Navigation {
                url: String::new(),
                reason: format!("cannot build http client: {e}"),
            })?;
        Ok(Self { client, timeout })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!(%url, "fetching feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                reason: format!("http status {status}"),
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(url, &e)
            } else {
                FetchError::MissingContent {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    fn transport_error(&self, url: &str, e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_events(&self, url: &str) -> Result<Vec<RawRecord>, FetchError> {
        let records: Vec<RawRecord> = self.get_json(url).await?;
        tracing::info!(%url, items = records.len(), "activity items fetched");
        Ok(records)
    }

    async fn fetch_participants(&self, url: &str) -> Result<Vec<RawParticipant>, FetchError> {
        let roster: Vec<RawParticipant> = self.get_json(url).await?;
        if roster.is_empty() {
            return Err(FetchError::MissingContent {
                url: url.to_string(),
                reason: "participant list is empty".to_string(),
            });
        }
        tracing::info!(%url, boats = roster.len(), "participants fetched");
        Ok(roster)
    }

    async fn fetch_leaderboard(&self, url: &str) -> Result<Vec<RawStanding>, FetchError> {
        let rows: Vec<RawStanding> = self.get_json(url).await?;
        tracing::info!(%url, rows = rows.len(), "leaderboard fetched");
        Ok(rows)
    }
}
