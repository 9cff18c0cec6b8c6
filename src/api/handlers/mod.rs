//! REST endpoint handlers organized by resource.

pub mod events;
pub mod leaderboard;
pub mod participants;
pub mod settings;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(participants::routes())
        .merge(events::routes())
        .merge(leaderboard::routes())
        .merge(settings::routes())
}
