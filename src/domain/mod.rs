//! Domain layer: identities, events, participants, settings, and the
//! coordination primitives shared by the service and WebSocket layers.

pub mod boat_identity;
pub mod event_bus;
pub mod feed_event;
pub mod participant;
pub mod settings;
pub mod standing;
pub mod tournament_locks;

pub use boat_identity::BoatIdentity;
pub use event_bus::{EventBus, FeedUpdate};
pub use feed_event::{EventKind, FeedEvent};
pub use participant::Participant;
pub use settings::{DataSource, Settings};
pub use standing::{LEADERBOARD_PLACES, Standing};
pub use tournament_locks::TournamentLocks;
