//! Ambition Realm - a deterministic political simulation steered by a
//! free-text ambition

pub mod ambition;
pub mod core;
pub mod events;
pub mod factions;
pub mod goals;
pub mod planner;
pub mod rules;
pub mod session;
pub mod simulation;
pub mod world;

pub use crate::core::{Result, SimError, SimulationConfig};
pub use crate::session::{GameSession, SessionRegistry, SessionSnapshot};
