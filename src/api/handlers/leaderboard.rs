//! Leaderboard handler.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{LeaderboardQuery, LeaderboardResponse};
use crate::app_state::AppState;

/// `GET /leaderboard` — Top places of the current tournament.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    tag = "Leaderboard",
    summary = "Show leaderboard",
    description = "In `live` mode fetches the leaderboard, caches it and returns the top three places; an empty or failed fetch serves the cached copy. In `demo` mode returns the cached copy without fetching. Without `mode` the configured data source is used.",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Top places, best first", body = LeaderboardResponse),
        (status = 500, description = "Cache unreadable", body = LeaderboardResponse),
        (status = 502, description = "Fetch failed and nothing is cached", body = LeaderboardResponse),
        (status = 504, description = "Fetch timed out and nothing is cached", body = LeaderboardResponse),
    )
)]
pub async fn show_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> (StatusCode, Json<LeaderboardResponse>) {
    let service = &state.ingest_service;
    let mode = match query.mode {
        Some(mode) => mode,
        None => service.settings().await.data_source,
    };
    match service.leaderboard(mode).await {
        Ok(standings) => (StatusCode::OK, Json(LeaderboardResponse::ok(standings))),
        Err(e) => (e.status_code(), Json(LeaderboardResponse::error(&e))),
    }
}

/// Leaderboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(show_leaderboard))
}
