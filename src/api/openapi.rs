//! OpenAPI document of the REST surface.

use utoipa::OpenApi;

use super::dto::{
    EventDto, EventListResponse, LeaderboardResponse, ParticipantListResponse,
    RefreshEventsResponse, ResponseStatus, SettingsUpdateResponse,
};
use super::handlers::{events, leaderboard, participants, settings, system};
use crate::domain::{
    BoatIdentity, DataSource, EventKind, FeedEvent, Participant, Settings, Standing,
};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::{CycleReport, CycleState};

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`
/// when the `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "tourney-feed",
        description = "Live fishing-tournament activity feed: participants, events, synthesized hookups, leaderboard and settings."
    ),
    paths(
        system::health_handler,
        participants::list_participants,
        participants::refresh_participants,
        events::list_events,
        events::list_hooked_events,
        events::refresh_events,
        leaderboard::show_leaderboard,
        settings::get_settings,
        settings::update_settings,
    ),
    components(schemas(
        BoatIdentity,
        CycleReport,
        CycleState,
        DataSource,
        ErrorBody,
        ErrorResponse,
        EventDto,
        EventKind,
        EventListResponse,
        FeedEvent,
        LeaderboardResponse,
        Participant,
        ParticipantListResponse,
        RefreshEventsResponse,
        ResponseStatus,
        Settings,
        SettingsUpdateResponse,
        Standing,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Participants", description = "Tournament roster"),
        (name = "Events", description = "Activity feed and synthesized hookups"),
        (name = "Leaderboard", description = "Top places"),
        (name = "Settings", description = "Tracked tournament and data source"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/health",
            "/api/v1/participants",
            "/api/v1/participants/refresh",
            "/api/v1/events",
            "/api/v1/events/hooked",
            "/api/v1/events/refresh",
            "/api/v1/leaderboard",
            "/api/v1/settings",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
