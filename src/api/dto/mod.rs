//! Data Transfer Objects for REST request/response serialization.
//!
//! List responses share the envelope `{ count, <items>, status, message? }`.

pub mod common_dto;
pub mod event_dto;
pub mod leaderboard_dto;
pub mod participant_dto;
pub mod settings_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use leaderboard_dto::*;
pub use participant_dto::*;
pub use settings_dto::*;
