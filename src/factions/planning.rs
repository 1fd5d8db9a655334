//! Faction planning loop
//!
//! A reduced-fidelity planner for non-player factions. Each faction whose
//! cooldown has run out draws one of six action categories, weighted by its
//! own domain weights, and applies it if it can pay the power cost. Faction
//! actions move power, territory and relations; they never touch regional
//! pressures.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::rng::{streams, SeededRng};
use crate::core::types::{Domain, FactionId, RegionId, Tick};
use crate::factions::roster::{FactionAmbition, FactionRoster};
use crate::world::faction::Stance;
use crate::world::state::WorldState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionActionKind {
    Expand,
    Trade,
    Diplomatic,
    Military,
    Internal,
    Religious,
}

impl FactionActionKind {
    pub const ALL: [FactionActionKind; 6] = [
        FactionActionKind::Expand,
        FactionActionKind::Trade,
        FactionActionKind::Diplomatic,
        FactionActionKind::Military,
        FactionActionKind::Internal,
        FactionActionKind::Religious,
    ];

    /// Domains whose weight pulls a faction toward this category
    fn drivers(self) -> &'static [Domain] {
        match self {
            FactionActionKind::Expand => &[Domain::Power, Domain::Freedom],
            FactionActionKind::Trade => &[Domain::Wealth],
            FactionActionKind::Diplomatic => &[Domain::Virtue, Domain::Freedom],
            FactionActionKind::Military => &[Domain::Power],
            FactionActionKind::Internal => &[Domain::Creation, Domain::Virtue],
            FactionActionKind::Religious => &[Domain::Faith],
        }
    }

    /// Power spent up front
    pub fn power_cost(self) -> f64 {
        match self {
            FactionActionKind::Expand => 10.0,
            FactionActionKind::Trade => 2.0,
            FactionActionKind::Diplomatic => 3.0,
            FactionActionKind::Military => 6.0,
            FactionActionKind::Internal => 0.0,
            FactionActionKind::Religious => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactionActionKind::Expand => "expand",
            FactionActionKind::Trade => "trade",
            FactionActionKind::Diplomatic => "diplomatic",
            FactionActionKind::Military => "military",
            FactionActionKind::Internal => "internal",
            FactionActionKind::Religious => "religious",
        }
    }
}

/// Record of one faction action, for the turn report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionAction {
    pub faction: FactionId,
    pub kind: FactionActionKind,
    pub target: Option<FactionId>,
    pub region: Option<RegionId>,
    pub summary: String,
}

fn choose_kind(ambition: &FactionAmbition, rng: &mut SeededRng) -> FactionActionKind {
    let weights: Vec<f64> = FactionActionKind::ALL
        .iter()
        .map(|k| k.drivers().iter().map(|&d| ambition.profile.weight(d)).sum())
        .collect();
    rng.weighted_index(&weights)
        .map(|i| FactionActionKind::ALL[i])
        .unwrap_or(FactionActionKind::Internal)
}

fn others(world: &WorldState, actor: FactionId) -> Vec<FactionId> {
    world.factions.iter().map(|f| f.id).filter(|&id| id != actor).collect()
}

fn name_of(world: &WorldState, id: FactionId) -> String {
    world
        .faction(id)
        .map(|f| f.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn add_power(world: &mut WorldState, id: FactionId, delta: f64) {
    if let Some(f) = world.faction_mut(id) {
        f.power += delta;
        f.clamp();
    }
}

/// Take the lowest-numbered region of the least-liked faction that holds any
fn expand(world: &mut WorldState, roster: &mut FactionRoster, actor: FactionId) -> FactionAction {
    let rival = others(world, actor)
        .into_iter()
        .filter(|&id| world.faction(id).is_some_and(|f| !f.regions.is_empty()))
        .min_by(|&a, &b| {
            roster
                .relation(actor, a)
                .total_cmp(&roster.relation(actor, b))
                .then(a.cmp(&b))
        });

    let seized = rival.and_then(|rival| {
        let region = world.faction(rival)?.regions.iter().next().copied()?;
        Some((rival, region))
    });

    match seized {
        Some((rival, region)) => {
            if let Some(f) = world.faction_mut(rival) {
                f.regions.remove(&region);
            }
            if let Some(f) = world.faction_mut(actor) {
                f.regions.insert(region);
            }
            if let Some(r) = world.region_mut(region) {
                r.owner = Some(actor);
            }
            roster.adjust_relation(actor, rival, -15.0);
            FactionAction {
                faction: actor,
                kind: FactionActionKind::Expand,
                target: Some(rival),
                region: Some(region),
                summary: format!("{} seized a province from {}", name_of(world, actor), name_of(world, rival)),
            }
        }
        None => {
            add_power(world, actor, 2.0);
            FactionAction {
                faction: actor,
                kind: FactionActionKind::Expand,
                target: None,
                region: None,
                summary: format!("{} consolidated its holdings", name_of(world, actor)),
            }
        }
    }
}

fn apply_kind(
    kind: FactionActionKind,
    world: &mut WorldState,
    roster: &mut FactionRoster,
    actor: FactionId,
    rng: &mut SeededRng,
) -> FactionAction {
    let name = name_of(world, actor);
    let mut action = FactionAction {
        faction: actor,
        kind,
        target: None,
        region: None,
        summary: String::new(),
    };

    match kind {
        FactionActionKind::Expand => return expand(world, roster, actor),
        FactionActionKind::Trade => {
            add_power(world, actor, 4.0);
            if let Ok(&partner) = rng.choice(&others(world, actor)) {
                roster.adjust_relation(actor, partner, 8.0);
                action.target = Some(partner);
                action.summary = format!("{} opened trade with {}", name, name_of(world, partner));
            } else {
                action.summary = format!("{} traded at home", name);
            }
        }
        FactionActionKind::Diplomatic => {
            let affinity = world.faction(actor).map(|f| f.affinity).unwrap_or_default();
            let partner = others(world, actor).into_iter().max_by(|&a, &b| {
                let sa = world.faction(a).map(|f| f.affinity.similarity(&affinity)).unwrap_or(0.0);
                let sb = world.faction(b).map(|f| f.affinity.similarity(&affinity)).unwrap_or(0.0);
                sa.total_cmp(&sb).then(b.cmp(&a))
            });
            match partner {
                Some(partner) => {
                    roster.adjust_relation(actor, partner, 12.0);
                    action.target = Some(partner);
                    action.summary = format!("{} courted {}", name, name_of(world, partner));
                }
                None => action.summary = format!("{} sent envoys that found no one", name),
            }
        }
        FactionActionKind::Military => {
            add_power(world, actor, 8.0);
            for other in others(world, actor) {
                roster.adjust_relation(actor, other, -3.0);
            }
            let ruthless = roster.ambition(actor).map(|a| a.profile.modifiers.ruthless).unwrap_or(0.0);
            if let Some(f) = world.faction_mut(actor) {
                if f.stance == Stance::Hostile && ruthless >= 0.5 {
                    f.stance = Stance::War;
                }
            }
            action.summary = format!("{} mustered its armies", name);
        }
        FactionActionKind::Internal => {
            add_power(world, actor, 3.0);
            action.summary = format!("{} tended to its own affairs", name);
        }
        FactionActionKind::Religious => {
            add_power(world, actor, 2.0);
            for other in others(world, actor) {
                let devout = roster.ambition(other).is_some_and(|a| a.archetype == Domain::Faith);
                roster.adjust_relation(actor, other, if devout { 5.0 } else { -2.0 });
            }
            action.summary = format!("{} held great rites", name);
        }
    }
    action
}

/// Run one planning round for every faction, in id order
pub fn run_faction_turns(
    world: &mut WorldState,
    roster: &mut FactionRoster,
    config: &SimulationConfig,
) -> Vec<FactionAction> {
    let tick: Tick = world.tick;
    let ids: Vec<FactionId> = world.factions.iter().map(|f| f.id).collect();
    let mut taken = Vec::new();

    for id in ids {
        let Some(ambition) = roster.ambition_mut(id) else {
            continue;
        };
        if ambition.cooldown > 0 {
            ambition.cooldown -= 1;
            continue;
        }

        let mut rng = SeededRng::keyed(world.seed, streams::FACTION_TURNS, &[tick, id.0 as u64]);
        let kind = choose_kind(ambition, &mut rng);
        let power = world.faction(id).map(|f| f.power).unwrap_or(0.0);
        if power < kind.power_cost() {
            // Try again next turn
            ambition.cooldown = 1;
            continue;
        }

        add_power(world, id, -kind.power_cost());
        let action = apply_kind(kind, world, roster, id, &mut rng);

        let cooldown = rng.next_int(config.faction_cooldown_min, config.faction_cooldown_max).max(0) as u32;
        if let Some(ambition) = roster.ambition_mut(id) {
            ambition.cooldown = cooldown;
            ambition.last_action = Some(kind);
            ambition.last_tick = Some(tick);
        }
        tracing::debug!(tick, faction = %id, kind = kind.as_str(), "{}", action.summary);
        taken.push(action);
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambition::profile::AmbitionProfile;
    use crate::world::generation::generate_world;

    fn setup(seed: u64) -> (WorldState, FactionRoster, SimulationConfig) {
        let config = SimulationConfig::default();
        let world = generate_world(&AmbitionProfile::balanced(), seed, &config);
        let roster = FactionRoster::generate(&world, &config);
        (world, roster, config)
    }

    #[test]
    fn test_ready_factions_act_and_reset_cooldown() {
        let (mut world, mut roster, config) = setup(8);
        let ids: Vec<FactionId> = world.factions.iter().map(|f| f.id).collect();
        for &id in &ids {
            roster.ambition_mut(id).unwrap().cooldown = 0;
            world.faction_mut(id).unwrap().power = 50.0;
        }
        let actions = run_faction_turns(&mut world, &mut roster, &config);
        assert_eq!(actions.len(), ids.len());
        for id in ids {
            let ambition = roster.ambition(id).unwrap();
            assert!((2..=4).contains(&ambition.cooldown));
            assert_eq!(ambition.last_tick, Some(world.tick));
        }
    }

    #[test]
    fn test_cooling_factions_only_count_down() {
        let (mut world, mut roster, config) = setup(9);
        for f in &world.factions {
            roster.ambition_mut(f.id).unwrap().cooldown = 3;
        }
        let before = world.clone();
        assert!(run_faction_turns(&mut world, &mut roster, &config).is_empty());
        assert_eq!(world, before);
        assert!(roster.ambitions().all(|a| a.cooldown == 2));
    }

    #[test]
    fn test_faction_turns_never_touch_pressures() {
        let (mut world, mut roster, config) = setup(10);
        let pressures: Vec<_> = world.regions.iter().map(|r| r.pressures.clone()).collect();
        for tick in 0..12 {
            world.tick = tick;
            run_faction_turns(&mut world, &mut roster, &config);
        }
        let after: Vec<_> = world.regions.iter().map(|r| r.pressures.clone()).collect();
        assert_eq!(pressures, after);
    }

    #[test]
    fn test_turns_are_deterministic() {
        let (mut w1, mut r1, config) = setup(12);
        let (mut w2, mut r2, _) = setup(12);
        for tick in 0..6 {
            w1.tick = tick;
            w2.tick = tick;
            assert_eq!(
                run_faction_turns(&mut w1, &mut r1, &config),
                run_faction_turns(&mut w2, &mut r2, &config)
            );
        }
        assert_eq!(w1, w2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_expansion_keeps_ownership_consistent() {
        let (mut world, mut roster, _) = setup(13);
        let actor = world.factions[0].id;
        let action = expand(&mut world, &mut roster, actor);
        if let Some(region) = action.region {
            assert_eq!(world.region(region).unwrap().owner, Some(actor));
            assert!(world.faction(actor).unwrap().regions.contains(&region));
            let holders = world.factions.iter().filter(|f| f.regions.contains(&region)).count();
            assert_eq!(holders, 1);
        }
    }
}
