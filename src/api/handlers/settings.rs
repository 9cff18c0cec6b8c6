//! Settings handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SettingsUpdateResponse;
use crate::app_state::AppState;
use crate::domain::Settings;
use crate::error::{ErrorResponse, TrackerError};

/// `GET /settings` — Current settings.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "Settings",
    summary = "Get settings",
    description = "Returns the tournament and data source in effect. Missing or unreadable settings yield the defaults (`Big Rock`, `live`).",
    responses(
        (status = 200, description = "Current settings", body = Settings),
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.ingest_service.settings().await)
}

/// `PUT /settings` — Replace the settings.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidRequest`] for an empty tournament and
/// [`TrackerError::Persistence`] if the settings cannot be written.
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "Settings",
    summary = "Replace settings",
    description = "Replaces the whole settings document. Selecting `demo` regenerates the demo artifact of the tournament; a failed regeneration is reported with `status: error` but the settings stay replaced.",
    request_body = Settings,
    responses(
        (status = 200, description = "Settings replaced", body = SettingsUpdateResponse),
        (status = 400, description = "Invalid settings", body = ErrorResponse),
        (status = 500, description = "Settings could not be written", body = ErrorResponse),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<impl IntoResponse, TrackerError> {
    let update = state.ingest_service.update_settings(settings).await?;
    Ok(Json(SettingsUpdateResponse::from(update)))
}

/// Settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
