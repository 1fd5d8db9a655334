//! Non-player factions: ambition arena, relations and the planning loop

pub mod planning;
pub mod roster;

pub use planning::{run_faction_turns, FactionAction, FactionActionKind};
pub use roster::{FactionAmbition, FactionRoster};
