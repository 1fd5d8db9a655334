//! Sessions: a running game, its snapshots, and the registry that routes
//! calls by session id

pub mod game;
pub mod registry;
pub mod snapshot;

pub use game::{EventResolution, GameSession, TurnReport};
pub use registry::{SessionId, SessionRegistry};
pub use snapshot::SessionSnapshot;
