//! Event feed handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    EventDto, EventListResponse, EventsQuery, RefreshEventsResponse, ResponseStatus,
};
use crate::app_state::AppState;
use crate::domain::FeedEvent;
use crate::error::TrackerError;

/// `GET /events` — Events of the current tournament.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "In `live` mode runs a forced ingestion cycle and returns the merged history. In `demo` mode returns the derived artifact including synthesized hookups. Without `mode` the configured data source is used.",
    params(EventsQuery),
    responses(
        (status = 200, description = "Events, oldest first", body = EventListResponse),
        (status = 500, description = "Persistence or integrity failure", body = EventListResponse),
        (status = 502, description = "Fetch failed; stored history untouched", body = EventListResponse),
        (status = 504, description = "Fetch timed out", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> (StatusCode, Json<EventListResponse>) {
    let service = &state.ingest_service;
    let mode = match query.mode {
        Some(mode) => mode,
        None => service.settings().await.data_source,
    };
    let result = service.events(mode).await;
    respond(&state, result).await
}

/// `GET /events/hooked` — Hookup events of the demo artifact.
#[utoipa::path(
    get,
    path = "/api/v1/events/hooked",
    tag = "Events",
    summary = "List hookups",
    description = "Returns only the `hooked_up` events of the current tournament's demo artifact.",
    responses(
        (status = 200, description = "Hookup events, oldest first", body = EventListResponse),
        (status = 500, description = "Artifact unreadable", body = EventListResponse),
    )
)]
pub async fn list_hooked_events(
    State(state): State<AppState>,
) -> (StatusCode, Json<EventListResponse>) {
    let result = state.ingest_service.hooked_events().await;
    respond(&state, result).await
}

/// `POST /events/refresh` — Run an ingestion cycle now.
#[utoipa::path(
    post,
    path = "/api/v1/events/refresh",
    tag = "Events",
    summary = "Refresh events",
    description = "Runs one ingestion cycle for the configured tournament and data source, bypassing any freshness check.",
    responses(
        (status = 200, description = "Cycle persisted", body = RefreshEventsResponse),
        (status = 500, description = "Persistence or integrity failure", body = RefreshEventsResponse),
        (status = 502, description = "Fetch failed", body = RefreshEventsResponse),
        (status = 504, description = "Fetch timed out", body = RefreshEventsResponse),
    )
)]
pub async fn refresh_events(
    State(state): State<AppState>,
) -> (StatusCode, Json<RefreshEventsResponse>) {
    match state.ingest_service.refresh_events().await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(RefreshEventsResponse {
                status: ResponseStatus::Ok,
                report: Some(outcome.report),
                message: None,
            }),
        ),
        Err(e) => (
            e.status_code(),
            Json(RefreshEventsResponse {
                status: ResponseStatus::Error,
                report: None,
                message: Some(e.to_string()),
            }),
        ),
    }
}

async fn respond(
    state: &AppState,
    result: Result<Vec<FeedEvent>, TrackerError>,
) -> (StatusCode, Json<EventListResponse>) {
    match result {
        Ok(events) => {
            let images = state.ingest_service.image_index().await;
            let events = EventDto::enrich(events, &images);
            (StatusCode::OK, Json(EventListResponse::ok(events)))
        }
        Err(e) => (e.status_code(), Json(EventListResponse::error(&e))),
    }
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/hooked", get(list_hooked_events))
        .route("/events/refresh", post(refresh_events))
}
