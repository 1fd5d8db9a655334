//! Faction power and diplomacy drift

use crate::core::config::SimulationConfig;
use crate::core::types::FactionId;
use crate::factions::roster::FactionRoster;
use crate::world::faction::Stance;
use crate::world::state::WorldState;
use crate::world::traits;

/// Stance change driven by current world traits, if any
fn next_stance(world: &WorldState, stance: Stance, power: f64, faith_leaning: bool, wealth_leaning: bool) -> Stance {
    let crisis = world.has_trait(traits::CRISIS);
    let scarcity = world.has_trait(traits::SCARCITY);
    match stance {
        Stance::Hostile if crisis && power >= 50.0 => Stance::War,
        Stance::War if !crisis && power < 30.0 => Stance::Hostile,
        Stance::Trade if scarcity => Stance::Neutral,
        Stance::Neutral if wealth_leaning && !scarcity => Stance::Trade,
        Stance::Neutral if faith_leaning && world.has_trait(traits::ZEALOTRY) => Stance::Allied,
        Stance::Allied | Stance::Neutral if faith_leaning && world.has_trait(traits::RAMPANT_HERESY) => {
            Stance::Hostile
        }
        other => other,
    }
}

pub fn diplomacy_drift(world: &mut WorldState, roster: Option<&mut FactionRoster>, config: &SimulationConfig) {
    // Power trends toward what the faction's territory can support
    for faction in world.factions.iter_mut() {
        let target = faction.regions.len() as f64 * config.power_per_region;
        faction.power += (target - faction.power) * config.power_trend_rate;
        faction.clamp();
    }

    let flips: Vec<(usize, Stance)> = world
        .factions
        .iter()
        .enumerate()
        .filter_map(|(i, f)| {
            let next = next_stance(
                world,
                f.stance,
                f.power,
                f.affinity.faith > 0.6,
                f.affinity.wealth > 0.6,
            );
            (next != f.stance).then_some((i, next))
        })
        .collect();
    for (i, stance) in flips {
        tracing::debug!(faction = %world.factions[i].id, from = world.factions[i].stance.as_str(), to = stance.as_str(), "stance changed");
        world.factions[i].stance = stance;
    }

    if let Some(dominant) = traits::dominant_faction(world, config) {
        world.set_trait(traits::DOMINANT_FACTION);
        if let Some(roster) = roster {
            let dominant_id = world.factions[dominant].id;
            let weaker: Vec<FactionId> = world
                .factions
                .iter()
                .map(|f| f.id)
                .filter(|&id| id != dominant_id)
                .collect();
            for (i, &a) in weaker.iter().enumerate() {
                for &b in &weaker[i + 1..] {
                    roster.adjust_relation(a, b, config.balancing_relation_gain);
                    if roster.relation(a, b) >= config.alliance_relation {
                        tracing::trace!(%a, %b, "balancing alliance holds");
                    }
                }
            }
        }
    }

    world.clamp_all();
    if traits::is_at_war(world) {
        world.set_trait(traits::AT_WAR);
    }
}
