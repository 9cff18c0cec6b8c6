//! Participant roster handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::ParticipantListResponse;
use crate::app_state::AppState;
use crate::domain::Participant;
use crate::error::TrackerError;

/// `GET /participants` — Roster of the current tournament.
#[utoipa::path(
    get,
    path = "/api/v1/participants",
    tag = "Participants",
    summary = "List participants",
    description = "Returns the cached roster of the configured tournament, re-fetching it first when the cache is older than the roster TTL. A failed refresh falls back to the stale roster.",
    responses(
        (status = 200, description = "Roster", body = ParticipantListResponse),
        (status = 502, description = "No roster and the fetch failed", body = ParticipantListResponse),
    )
)]
pub async fn list_participants(
    State(state): State<AppState>,
) -> (StatusCode, Json<ParticipantListResponse>) {
    respond(state.ingest_service.participants().await)
}

/// `POST /participants/refresh` — Force a roster fetch.
#[utoipa::path(
    post,
    path = "/api/v1/participants/refresh",
    tag = "Participants",
    summary = "Refresh participants",
    description = "Re-fetches the roster regardless of its age and replaces the cached copy.",
    responses(
        (status = 200, description = "Fresh roster", body = ParticipantListResponse),
        (status = 502, description = "Fetch failed; cached roster untouched", body = ParticipantListResponse),
        (status = 504, description = "Fetch timed out", body = ParticipantListResponse),
    )
)]
pub async fn refresh_participants(
    State(state): State<AppState>,
) -> (StatusCode, Json<ParticipantListResponse>) {
    respond(state.ingest_service.refresh_participants().await)
}

fn respond(
    result: Result<Vec<Participant>, TrackerError>,
) -> (StatusCode, Json<ParticipantListResponse>) {
    match result {
        Ok(participants) => (StatusCode::OK, Json(ParticipantListResponse::ok(participants))),
        Err(e) => (e.status_code(), Json(ParticipantListResponse::error(&e))),
    }
}

/// Participant routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/participants", get(list_participants))
        .route("/participants/refresh", post(refresh_participants))
}
