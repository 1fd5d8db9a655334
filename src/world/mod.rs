//! World model: regions, factions, derived traits and generation

pub mod faction;
pub mod generation;
pub mod region;
pub mod state;
pub mod traits;

pub use faction::{Faction, Stance};
pub use generation::generate_world;
pub use region::{People, Pressures, Region, RegionMetric};
pub use state::{Forces, Legitimacy, Realm, RealmStat, WorldState};
