//! Derived world traits
//!
//! Traits are boolean flags recomputed every tick from numeric state. The
//! drift systems set the ones they own; `recompute` evaluates all of them at
//! once for freshly generated or restored worlds.

use crate::core::config::SimulationConfig;
use crate::world::faction::Stance;
use crate::world::state::WorldState;

pub const SCARCITY: &str = "scarcity";
pub const CRISIS: &str = "crisis";
pub const HIGH_CRIME: &str = "high_crime";
pub const HIGH_BUREAUCRACY: &str = "high_bureaucracy";
pub const ZEALOTRY: &str = "zealotry";
pub const RAMPANT_HERESY: &str = "rampant_heresy";
pub const DOMINANT_FACTION: &str = "dominant_faction";
pub const AT_WAR: &str = "at_war";

pub fn is_scarce(world: &WorldState, config: &SimulationConfig) -> bool {
    world.resources.food < config.scarcity_threshold || world.resources.gold < config.scarcity_threshold
}

pub fn is_crisis(world: &WorldState, config: &SimulationConfig) -> bool {
    world.realm.unrest > config.crisis_threshold
}

pub fn has_high_crime(world: &WorldState, config: &SimulationConfig) -> bool {
    world.regions.iter().any(|r| r.pressures.lawfulness < config.crime_threshold)
}

pub fn has_high_bureaucracy(world: &WorldState, config: &SimulationConfig) -> bool {
    world.regions.iter().any(|r| r.pressures.lawfulness > config.bureaucracy_threshold)
}

pub fn has_zealotry(world: &WorldState, config: &SimulationConfig) -> bool {
    world.regions.iter().any(|r| r.pressures.piety > config.zealotry_threshold)
}

pub fn has_rampant_heresy(world: &WorldState, config: &SimulationConfig) -> bool {
    world.regions.iter().any(|r| r.pressures.heresy > config.heresy_threshold)
}

/// Index of a faction holding more than the configured share of total power
pub fn dominant_faction(world: &WorldState, config: &SimulationConfig) -> Option<usize> {
    let total: f64 = world.factions.iter().map(|f| f.power).sum();
    if total <= 0.0 || world.factions.len() < 2 {
        return None;
    }
    world
        .factions
        .iter()
        .position(|f| f.power / total > config.dominant_faction_share)
}

pub fn is_at_war(world: &WorldState) -> bool {
    world.factions.iter().any(|f| f.stance == Stance::War)
}

/// Clear and re-derive every trait from the current numbers
pub fn recompute(world: &mut WorldState, config: &SimulationConfig) {
    let flags = [
        (SCARCITY, is_scarce(world, config)),
        (CRISIS, is_crisis(world, config)),
        (HIGH_CRIME, has_high_crime(world, config)),
        (HIGH_BUREAUCRACY, has_high_bureaucracy(world, config)),
        (ZEALOTRY, has_zealotry(world, config)),
        (RAMPANT_HERESY, has_rampant_heresy(world, config)),
        (DOMINANT_FACTION, dominant_faction(world, config).is_some()),
        (AT_WAR, is_at_war(world)),
    ];
    world.traits.clear();
    for (name, on) in flags {
        if on {
            world.set_trait(name);
        }
    }
}
