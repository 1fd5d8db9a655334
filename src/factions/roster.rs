//! Faction ambition arena and relation table
//!
//! World truth (power, stance, regions) lives on `Faction`. What each faction
//! wants, and how factions feel about each other, lives here keyed by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::rng::{streams, SeededRng};
use crate::core::types::{Domain, DomainVector, FactionId, Modifier, ModifierSet, ScaleVector, Tick};
use crate::factions::planning::FactionActionKind;
use crate::world::state::WorldState;

pub const RELATION_MIN: f64 = -100.0;
pub const RELATION_MAX: f64 = 100.0;

/// A faction's agent policy state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionAmbition {
    pub faction: FactionId,
    pub archetype: Domain,
    pub profile: AmbitionProfile,
    /// Turns until the faction acts again; acts at 0
    pub cooldown: u32,
    pub last_action: Option<FactionActionKind>,
    pub last_tick: Option<Tick>,
}

/// Base modifiers for each archetype
fn archetype_modifiers(archetype: Domain) -> ModifierSet {
    let mut m = ModifierSet::default();
    match archetype {
        Domain::Power => m.ruthless = 0.6,
        Domain::Wealth => m.opulent = 0.6,
        Domain::Faith => m.ascetic = 0.5,
        Domain::Virtue => m.peaceful = 0.6,
        Domain::Freedom => m.charismatic = 0.4,
        Domain::Creation => {
            m.opulent = 0.3;
            m.peaceful = 0.3;
        }
    }
    m
}

fn archetype_profile(archetype: Domain, jitter: f64, rng: &mut SeededRng) -> AmbitionProfile {
    let domains = DomainVector::from_fn(|d| {
        let base = if d == archetype { 0.5 } else { 0.1 };
        base + rng.next_range(-jitter, jitter)
    });
    let mut modifiers = archetype_modifiers(archetype);
    for m in Modifier::ALL {
        *modifiers.get_mut(m) += rng.next_range(-jitter, jitter);
    }
    AmbitionProfile::new(domains, modifiers, ScaleVector::default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FactionRoster {
    ambitions: BTreeMap<FactionId, FactionAmbition>,
    /// Symmetric; each pair is stored under both ids
    relations: BTreeMap<FactionId, BTreeMap<FactionId, f64>>,
}

impl FactionRoster {
    /// Derive ambitions and starting relations from a generated world
    pub fn generate(world: &WorldState, config: &SimulationConfig) -> Self {
        let mut rng = SeededRng::stream(world.seed, streams::FACTIONS);
        let mut roster = Self::default();

        for faction in &world.factions {
            let archetype = faction.affinity.dominant();
            let profile = archetype_profile(archetype, config.faction_profile_jitter, &mut rng);
            let cooldown = rng.next_int(0, config.faction_cooldown_max.max(0)) as u32;
            roster.ambitions.insert(
                faction.id,
                FactionAmbition {
                    faction: faction.id,
                    archetype,
                    profile,
                    cooldown,
                    last_action: None,
                    last_tick: None,
                },
            );
        }

        for (i, a) in world.factions.iter().enumerate() {
            for b in world.factions.iter().skip(i + 1) {
                let opinion = (a.affinity.similarity(&b.affinity) - 0.5) * 100.0;
                roster.set_relation(a.id, b.id, opinion);
            }
        }
        roster
    }

    pub fn ambition(&self, id: FactionId) -> Option<&FactionAmbition> {
        self.ambitions.get(&id)
    }

    pub fn ambition_mut(&mut self, id: FactionId) -> Option<&mut FactionAmbition> {
        self.ambitions.get_mut(&id)
    }

    pub fn ambitions(&self) -> impl Iterator<Item = &FactionAmbition> {
        self.ambitions.values()
    }

    pub fn insert(&mut self, ambition: FactionAmbition) {
        self.ambitions.insert(ambition.faction, ambition);
    }

    /// Opinion between two factions in [-100, 100]; 0 when unknown
    pub fn relation(&self, a: FactionId, b: FactionId) -> f64 {
        self.relations
            .get(&a)
            .and_then(|row| row.get(&b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set_relation(&mut self, a: FactionId, b: FactionId, value: f64) {
        if a == b {
            return;
        }
        let value = value.clamp(RELATION_MIN, RELATION_MAX);
        self.relations.entry(a).or_default().insert(b, value);
        self.relations.entry(b).or_default().insert(a, value);
    }

    pub fn adjust_relation(&mut self, a: FactionId, b: FactionId, delta: f64) {
        let current = self.relation(a, b);
        self.set_relation(a, b, current + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::generation::generate_world;

    fn world() -> WorldState {
        let config = SimulationConfig::default();
        generate_world(&AmbitionProfile::balanced(), 31, &config)
    }

    #[test]
    fn test_generate_covers_every_faction() {
        let config = SimulationConfig::default();
        let world = world();
        let roster = FactionRoster::generate(&world, &config);
        for faction in &world.factions {
            let ambition = roster.ambition(faction.id).unwrap();
            assert_eq!(ambition.archetype, faction.affinity.dominant());
            assert!(ambition.profile.is_valid());
            assert!(ambition.cooldown as i64 <= config.faction_cooldown_max);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = SimulationConfig::default();
        let world = world();
        assert_eq!(FactionRoster::generate(&world, &config), FactionRoster::generate(&world, &config));
    }

    #[test]
    fn test_relations_are_symmetric_and_clamped() {
        let mut roster = FactionRoster::default();
        roster.set_relation(FactionId(1), FactionId(2), 30.0);
        assert_eq!(roster.relation(FactionId(2), FactionId(1)), 30.0);
        roster.adjust_relation(FactionId(2), FactionId(1), 500.0);
        assert_eq!(roster.relation(FactionId(1), FactionId(2)), RELATION_MAX);
        roster.set_relation(FactionId(3), FactionId(3), 50.0);
        assert_eq!(roster.relation(FactionId(3), FactionId(3)), 0.0);
    }

    #[test]
    fn test_roster_json_round_trip() {
        let config = SimulationConfig::default();
        let roster = FactionRoster::generate(&world(), &config);
        let json = serde_json::to_string(&roster).unwrap();
        let back: FactionRoster = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
    }
}
