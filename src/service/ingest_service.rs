//! Ingestion service: runs ingestion cycles and serves the read paths of
//! the API façade.
//!
//! A cycle moves through
//! `Idle → Fetching → Classifying → Merging → (Synthesizing) → Persisted`
//! and ends in `Failed` if any step errors. Stored state only changes
//! through atomic artifact replacements at the end of `Merging` and
//! `Synthesizing`, so a failed cycle leaves the previous history intact.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::domain::settings::tournament_key;
use crate::domain::{
    BoatIdentity, DataSource, EventBus, EventKind, FeedEvent, FeedUpdate, LEADERBOARD_PLACES,
    Participant, Settings, Standing, TournamentLocks,
};
use crate::error::TrackerError;
use crate::fetch::{FetchError, Fetcher, SourceCatalog};
use crate::persistence::models::{
    DemoArtifact, DemoEntry, HistoryArtifact, LeaderboardArtifact, RosterArtifact,
};
use crate::persistence::{ArtifactStore, SettingsStore, keys, load_json, save_json};
use crate::pipeline::{Classifier, FreshnessPolicy, latest_timestamp, merge, synthesize};

/// Step of an ingestion cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    /// Not started.
    Idle,
    /// Waiting on the fetcher.
    Fetching,
    /// Turning raw records into events.
    Classifying,
    /// Merging into the stored history and persisting it.
    Merging,
    /// Deriving and persisting the demo artifact.
    Synthesizing,
    /// Completed; all artifacts written.
    Persisted,
    /// Aborted; nothing past the last completed write is stored.
    Failed,
}

/// Summary of a completed ingestion cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CycleReport {
    /// Tournament display name.
    pub tournament: String,
    /// Mode the cycle ran in.
    pub mode: DataSource,
    /// Final state.
    pub state: CycleState,
    /// Raw records returned by the fetcher.
    pub fetched: usize,
    /// Records skipped because their timestamp could not be parsed.
    pub rejected: usize,
    /// Events newly added to the history.
    pub added: usize,
    /// Events in the stored history after the cycle.
    pub total: usize,
}

/// A cycle's report together with the events it makes visible.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Cycle summary.
    pub report: CycleReport,
    /// Full history (live) or history plus hookups (demo).
    pub events: Vec<FeedEvent>,
}

/// Result of a settings replacement.
#[derive(Debug, Clone)]
pub struct SettingsUpdate {
    /// Settings now in effect.
    pub settings: Settings,
    /// Demo regeneration cycle, when the new settings select demo mode.
    pub demo_cycle: Option<Result<CycleReport, String>>,
}

/// Tunables of the ingestion service.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Upper bound of a single fetch.
    pub fetch_timeout: Duration,
    /// Refresh rule of the participant roster.
    pub participant_policy: FreshnessPolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(60),
            participant_policy: FreshnessPolicy::default(),
        }
    }
}

/// Orchestrates fetch, classify, merge, synthesize and persist.
///
/// Cycles of the same tournament are serialized through
/// [`TournamentLocks`], keyed by the history's storage key; different
/// tournaments proceed concurrently. Artifacts shared by all tournaments
/// (roster, demo events) are updated under their own locks.
#[derive(Debug)]
pub struct IngestService {
    store: Arc<dyn ArtifactStore>,
    settings: SettingsStore,
    fetcher: Arc<dyn Fetcher>,
    catalog: Arc<SourceCatalog>,
    classifier: Classifier,
    locks: TournamentLocks,
    roster_lock: Mutex<()>,
    demo_lock: Mutex<()>,
    event_bus: EventBus,
    options: IngestOptions,
}

impl IngestService {
    /// Creates a new service.
    #[must_use]
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        fetcher: Arc<dyn Fetcher>,
        catalog: Arc<SourceCatalog>,
        classifier: Classifier,
        event_bus: EventBus,
        options: IngestOptions,
    ) -> Self {
        Self {
            settings: SettingsStore::new(Arc::clone(&store)),
            store,
            fetcher,
            catalog,
            classifier,
            locks: TournamentLocks::new(),
            roster_lock: Mutex::new(()),
            demo_lock: Mutex::new(()),
            event_bus,
            options,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the current settings (defaults when unreadable).
    pub async fn settings(&self) -> Settings {
        self.settings.get().await
    }

    /// Replaces the settings wholesale. Selecting demo mode regenerates the
    /// demo artifact of the new tournament; a failed regeneration is
    /// reported but does not undo the replacement.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidRequest`] for an empty tournament name
    /// and [`TrackerError::Persistence`] if the settings cannot be written.
    pub async fn update_settings(&self, new: Settings) -> Result<SettingsUpdate, TrackerError> {
        let tournament = new.tournament.trim();
        if tournament.is_empty() {
            return Err(TrackerError::InvalidRequest(
                "tournament must not be empty".to_string(),
            ));
        }
        let settings = Settings {
            tournament: tournament.to_string(),
            data_source: new.data_source,
        };
        self.settings.set(&settings).await?;

        let demo_cycle = if settings.data_source == DataSource::Demo {
            let result = self
                .run_cycle(&settings.tournament, DataSource::Demo)
                .await
                .map(|outcome| outcome.report)
                .map_err(|e| {
                    tracing::warn!(
                        tournament = %settings.tournament,
                        error = %e,
                        "demo regeneration failed"
                    );
                    e.to_string()
                });
            Some(result)
        } else {
            None
        };

        Ok(SettingsUpdate {
            settings,
            demo_cycle,
        })
    }

    /// Returns the roster of the current tournament, refreshing it first when
    /// the cache is missing or stale. A failed refresh falls back to the
    /// stale roster when one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if there is no usable roster.
    pub async fn participants(&self) -> Result<Vec<Participant>, TrackerError> {
        let tournament = self.settings().await.tournament;
        let cached = self.load_roster(&tournament).await?;
        let modified = cached.as_ref().map(|(_, at)| *at);

        if !self.options.participant_policy.needs_refresh(modified, false)
            && let Some((roster, _)) = cached
        {
            return Ok(roster.participants);
        }

        match self.refresh_roster(&tournament).await {
            Ok(participants) => Ok(participants),
            Err(e) => match cached {
                Some((roster, _)) => {
                    tracing::warn!(
                        tournament = %tournament,
                        error = %e,
                        "roster refresh failed, serving cached roster"
                    );
                    Ok(roster.participants)
                }
                None => Err(e),
            },
        }
    }

    /// Re-fetches the roster of the current tournament regardless of age.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] on fetch or persistence failure; the
    /// cached roster is then left untouched.
    pub async fn refresh_participants(&self) -> Result<Vec<Participant>, TrackerError> {
        let tournament = self.settings().await.tournament;
        self.refresh_roster(&tournament).await
    }

    /// Maps boat identities of the cached roster to their image paths.
    /// Never fetches.
    pub async fn image_index(&self) -> HashMap<BoatIdentity, String> {
        let tournament = self.settings().await.tournament;
        match self.load_roster(&tournament).await {
            Ok(Some((roster, _))) => roster
                .participants
                .into_iter()
                .map(|p| (p.uid, p.image_path))
                .collect(),
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "roster unreadable, events served without images");
                HashMap::new()
            }
        }
    }

    /// Events of the current tournament. Live mode always runs a forced
    /// ingestion cycle; demo mode reads the derived artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if the cycle or the artifact read fails.
    pub async fn events(&self, mode: DataSource) -> Result<Vec<FeedEvent>, TrackerError> {
        let tournament = self.settings().await.tournament;
        match mode {
            DataSource::Live => Ok(self.run_cycle(&tournament, mode).await?.events),
            DataSource::Demo => Ok(self.load_demo_entry(&tournament).await?.events),
        }
    }

    /// Hookup events of the current tournament's demo artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if the artifact cannot be read.
    pub async fn hooked_events(&self) -> Result<Vec<FeedEvent>, TrackerError> {
        let tournament = self.settings().await.tournament;
        let entry = self.load_demo_entry(&tournament).await?;
        Ok(entry
            .events
            .into_iter()
            .filter(|e| e.kind == EventKind::HookedUp)
            .collect())
    }

    /// Leaderboard of the current tournament, best place first and at most
    /// [`LEADERBOARD_PLACES`] rows.
    ///
    /// Live mode fetches and replaces the cached copy; an empty or failed
    /// fetch falls back to the cache. Demo mode serves the cache and never
    /// fetches.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if the fetch fails with nothing cached, or
    /// if the cache cannot be read or written.
    pub async fn leaderboard(&self, mode: DataSource) -> Result<Vec<Standing>, TrackerError> {
        let tournament = self.settings().await.tournament;
        let key = keys::leaderboard(&tournament);
        let mut standings = match mode {
            DataSource::Demo => self.load_leaderboard(&key).await?.unwrap_or_default(),
            DataSource::Live => {
                let _guard = self.locks.acquire(&key).await;
                match self.fetch_leaderboard(&tournament).await {
                    Ok(fresh) if !fresh.is_empty() => {
                        let artifact = LeaderboardArtifact {
                            tournament: tournament.clone(),
                            standings: fresh,
                        };
                        save_json(self.store.as_ref(), &key, &artifact).await?;
                        artifact.standings
                    }
                    Ok(_) => {
                        tracing::warn!(tournament = %tournament, "leaderboard empty, serving cached copy");
                        self.load_leaderboard(&key).await?.unwrap_or_default()
                    }
                    Err(e) => match self.load_leaderboard(&key).await? {
                        Some(cached) => {
                            tracing::warn!(
                                tournament = %tournament,
                                error = %e,
                                "leaderboard fetch failed, serving cached copy"
                            );
                            cached
                        }
                        None => return Err(e),
                    },
                }
            }
        };
        standings.truncate(LEADERBOARD_PLACES);
        Ok(standings)
    }

    /// Runs a forced cycle for the current tournament in the configured
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if the cycle fails.
    pub async fn refresh_events(&self) -> Result<CycleOutcome, TrackerError> {
        let settings = self.settings().await;
        self.run_cycle(&settings.tournament, settings.data_source)
            .await
    }

    /// Runs one ingestion cycle for `tournament`.
    ///
    /// Waits for any cycle of the same tournament to finish first.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError`] if any step fails. Artifacts written
    /// before the failing step stay consistent; nothing partial is stored.
    pub async fn run_cycle(
        &self,
        tournament: &str,
        mode: DataSource,
    ) -> Result<CycleOutcome, TrackerError> {
        let history_key = keys::event_history(tournament);
        let _guard = self.locks.acquire(&history_key).await;

        let mut cycle = Cycle::new(tournament, mode);
        match self.run_locked(&history_key, &mut cycle).await {
            Ok(outcome) => {
                tracing::info!(
                    tournament,
                    mode = %mode,
                    fetched = outcome.report.fetched,
                    rejected = outcome.report.rejected,
                    added = outcome.report.added,
                    total = outcome.report.total,
                    "cycle persisted"
                );
                Ok(outcome)
            }
            Err(e) => {
                let failed_in = cycle.state;
                cycle.advance(CycleState::Failed);
                tracing::error!(
                    tournament,
                    mode = %mode,
                    state = ?failed_in,
                    error = %e,
                    "cycle failed"
                );
                Err(e)
            }
        }
    }

    async fn run_locked(
        &self,
        history_key: &str,
        cycle: &mut Cycle<'_>,
    ) -> Result<CycleOutcome, TrackerError> {
        let tournament = cycle.tournament;
        let history = load_json::<HistoryArtifact>(self.store.as_ref(), history_key)
            .await?
            .map(|(artifact, _)| artifact.events)
            .unwrap_or_default();
        let cutoff = latest_timestamp(&history);

        cycle.advance(CycleState::Fetching);
        let url = self.catalog.events_url(tournament)?;
        let records = self.bounded(url, self.fetcher.fetch_events(url)).await?;

        cycle.advance(CycleState::Classifying);
        let batch = self.classifier.classify_batch(&records, cutoff);
        let added = batch.events.clone();

        cycle.advance(CycleState::Merging);
        let merged = merge(history, batch.events)?;
        let artifact = HistoryArtifact {
            tournament: tournament.to_string(),
            events: merged,
        };
        save_json(self.store.as_ref(), history_key, &artifact).await?;
        let merged = artifact.events;

        let (events, update) = match cycle.mode {
            DataSource::Live => (merged.clone(), added.clone()),
            DataSource::Demo => {
                cycle.advance(CycleState::Synthesizing);
                let derived = synthesize(&merged);
                self.store_demo_entry(tournament, derived.clone()).await?;
                (derived, synthesize(&added))
            }
        };
        cycle.advance(CycleState::Persisted);

        if !update.is_empty() {
            let receivers = self.event_bus.publish(FeedUpdate {
                tournament: tournament.to_string(),
                mode: cycle.mode,
                events: update,
            });
            tracing::debug!(tournament, receivers, "feed update published");
        }

        Ok(CycleOutcome {
            report: CycleReport {
                tournament: tournament.to_string(),
                mode: cycle.mode,
                state: cycle.state,
                fetched: records.len(),
                rejected: batch.rejected,
                added: added.len(),
                total: merged.len(),
            },
            events,
        })
    }

    async fn refresh_roster(&self, tournament: &str) -> Result<Vec<Participant>, TrackerError> {
        let _guard = self.roster_lock.lock().await;
        let url = self.catalog.participants_url(tournament)?;
        let raw = self
            .bounded(url, self.fetcher.fetch_participants(url))
            .await?;

        let participants: Vec<Participant> = raw
            .iter()
            .filter(|p| !p.boat.trim().is_empty())
            .map(|p| Participant::new(&p.boat, &p.category, p.image_url.as_deref()))
            .collect();
        let roster = RosterArtifact {
            tournament: tournament.to_string(),
            participants,
        };
        save_json(self.store.as_ref(), keys::PARTICIPANTS, &roster).await?;
        tracing::info!(tournament, count = roster.participants.len(), "roster replaced");
        Ok(roster.participants)
    }

    /// Cached roster and its age, or `None` if absent or for another
    /// tournament.
    async fn load_roster(
        &self,
        tournament: &str,
    ) -> Result<Option<(RosterArtifact, chrono::DateTime<chrono::Utc>)>, TrackerError> {
        let cached = load_json::<RosterArtifact>(self.store.as_ref(), keys::PARTICIPANTS).await?;
        Ok(cached.filter(|(roster, _)| tournament_key(&roster.tournament) == tournament_key(tournament)))
    }

    async fn fetch_leaderboard(&self, tournament: &str) -> Result<Vec<Standing>, TrackerError> {
        let url = self.catalog.leaderboard_url(tournament)?;
        let rows = self
            .bounded(url, self.fetcher.fetch_leaderboard(url))
            .await?;
        Ok(rows
            .iter()
            .filter(|r| !r.boat.trim().is_empty())
            .map(|r| Standing::new(&r.boat, &r.points))
            .collect())
    }

    async fn load_leaderboard(&self, key: &str) -> Result<Option<Vec<Standing>>, TrackerError> {
        let cached = load_json::<LeaderboardArtifact>(self.store.as_ref(), key).await?;
        Ok(cached.map(|(artifact, _)| artifact.standings))
    }

    async fn load_demo_entry(&self, tournament: &str) -> Result<DemoEntry, TrackerError> {
        let demo = load_json::<DemoArtifact>(self.store.as_ref(), keys::DEMO_EVENTS)
            .await?
            .map(|(demo, _)| demo)
            .unwrap_or_default();
        Ok(demo.get(tournament).cloned().unwrap_or_default())
    }

    async fn store_demo_entry(
        &self,
        tournament: &str,
        events: Vec<FeedEvent>,
    ) -> Result<(), TrackerError> {
        let _guard = self.demo_lock.lock().await;
        let mut demo = match load_json::<DemoArtifact>(self.store.as_ref(), keys::DEMO_EVENTS).await
        {
            Ok(Some((demo, _))) => demo,
            Ok(None) => DemoArtifact::new(),
            Err(e) => {
                tracing::warn!(error = %e, "demo artifact unreadable, rebuilding");
                DemoArtifact::new()
            }
        };
        demo.insert(tournament.to_string(), DemoEntry { events });
        save_json(self.store.as_ref(), keys::DEMO_EVENTS, &demo).await?;
        Ok(())
    }

    async fn bounded<T>(
        &self,
        url: &str,
        fetch: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        let limit = self.options.fetch_timeout;
        tokio::time::timeout(limit, fetch)
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
                secs: limit.as_secs(),
            })?
    }
}

/// Bookkeeping of one running cycle.
struct Cycle<'a> {
    tournament: &'a str,
    mode: DataSource,
    state: CycleState,
}

impl<'a> Cycle<'a> {
    fn new(tournament: &'a str, mode: DataSource) -> Self {
        Self {
            tournament,
            mode,
            state: CycleState::Idle,
        }
    }

    fn advance(&mut self, next: CycleState) {
        tracing::debug!(tournament = self.tournament, from = ?self.state, to = ?next, "cycle step");
        self.state = next;
    }
}
