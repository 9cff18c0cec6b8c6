//! Settings update response.

use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::ResponseStatus;
use crate::domain::Settings;
use crate::service::{CycleReport, SettingsUpdate};

/// Response body of `PUT /settings`.
///
/// The settings are always replaced on success; `demo_cycle` and `message`
/// report the demo regeneration triggered by selecting demo mode.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsUpdateResponse {
    /// `error` only when the demo regeneration failed.
    pub status: ResponseStatus,
    /// Settings now in effect.
    pub settings: Settings,
    /// Demo regeneration cycle, when one ran and succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_cycle: Option<CycleReport>,
    /// Why the demo regeneration failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<SettingsUpdate> for SettingsUpdateResponse {
    fn from(update: SettingsUpdate) -> Self {
        let (status, demo_cycle, message) = match update.demo_cycle {
            None => (ResponseStatus::Ok, None, None),
            Some(Ok(report)) => (ResponseStatus::Ok, Some(report), None),
            Some(Err(reason)) => (ResponseStatus::Error, None, Some(reason)),
        };
        Self {
            status,
            settings: update.settings,
            demo_cycle,
            message,
        }
    }
}
