//! World generation from an ambition profile
//!
//! Everything is drawn from the `WORLD` sub-stream in a fixed order, so
//! identical (profile, seed) pairs produce identical worlds.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;

use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::rng::{streams, SeededRng};
use crate::core::types::{clamp_percent, clamp_unit, Domain, DomainVector, FactionId, RegionId, Resources};
use crate::world::faction::{Faction, Stance};
use crate::world::region::{People, Pressures, Region};
use crate::world::state::{Forces, Legitimacy, Realm, WorldState};
use crate::world::traits;

const REGION_NAMES: &[&str] = &[
    "Ashford", "Brightwater", "Coldharbor", "Dunmere", "Eastmarch", "Fallowdeep",
    "Greywold", "Highcairn", "Ironvale", "Juniper Reach", "Kingsmoor", "Lowmarsh",
    "Mistral Coast", "Northwatch",
];

const FACTION_NAMES: &[&str] = &[
    "House Varn", "The Gilded Compact", "Order of the Dawn", "The Free Cantons",
    "Covenant of Ash", "House Merrow", "The Iron Synod", "Circle of Artificers",
];

const HOME_NAME: &str = "Heartland";

/// Generate a world for `profile` under `seed`
pub fn generate_world(profile: &AmbitionProfile, seed: u64, config: &SimulationConfig) -> WorldState {
    let mut rng = SeededRng::stream(seed, streams::WORLD);

    let region_count = rng.next_int(config.min_regions, config.max_regions).max(1) as usize;
    let faction_count = rng.next_int(config.min_factions, config.max_factions).max(0) as usize;

    let mut region_names: Vec<&str> = REGION_NAMES.to_vec();
    region_names.shuffle(&mut rng);
    let mut faction_names: Vec<&str> = FACTION_NAMES.to_vec();
    faction_names.shuffle(&mut rng);

    let outlook = player_outlook(profile);

    let mut factions: Vec<Faction> = (0..faction_count)
        .map(|i| generate_faction(i, &faction_names, profile, &outlook, config, &mut rng))
        .collect();

    let mut regions = Vec::with_capacity(region_count);
    regions.push(home_region(profile, &mut rng));
    for i in 1..region_count {
        regions.push(outer_region(i, &region_names, profile, config, &mut rng));
    }

    assign_regions(&mut regions, &mut factions, config, &mut rng);

    let population = regions.iter().map(|r| r.people.population).sum();
    let mut world = WorldState {
        seed,
        tick: 0,
        resources: starting_resources(profile),
        realm: Realm {
            population,
            loyalty: 50.0 + 30.0 * profile.weight(Domain::Virtue),
            unrest: 20.0 + 10.0 * profile.weight(Domain::Power) - 10.0 * profile.weight(Domain::Virtue),
            faith: 40.0 + 50.0 * profile.weight(Domain::Faith),
        },
        forces: Forces {
            soldiers: 50.0 + 150.0 * profile.weight(Domain::Power),
            morale: 50.0 + 30.0 * profile.weight(Domain::Power),
            supply: 50.0 + 30.0 * profile.weight(Domain::Wealth),
        },
        legitimacy: Legitimacy {
            law: 40.0 + 40.0 * profile.weight(Domain::Virtue),
            faith: 30.0 + 50.0 * profile.weight(Domain::Faith),
            lineage: 50.0 + 20.0 * profile.weight(Domain::Power),
            might: 30.0 + 50.0 * profile.weight(Domain::Power),
        },
        regions,
        factions,
        traits: BTreeSet::new(),
    };
    world.clamp_all();
    traits::recompute(&mut world, config);

    tracing::debug!(
        seed,
        regions = world.regions.len(),
        factions = world.factions.len(),
        "world generated"
    );
    world
}

/// The profile mapped onto the unit affinity scale: an even profile reads as
/// 0.5 everywhere, a domain holding a third or more of the weight reads as 1.0.
pub fn player_outlook(profile: &AmbitionProfile) -> DomainVector {
    DomainVector::from_fn(|d| clamp_unit(profile.weight(d) * 3.0))
}

/// Domain pick biased toward the player's strongest domains
fn biased_domain(profile: &AmbitionProfile, rng: &mut SeededRng) -> Domain {
    let weights: Vec<f64> = Domain::ALL.iter().map(|&d| profile.weight(d)).collect();
    rng.weighted_index(&weights)
        .map(|i| Domain::ALL[i])
        .unwrap_or_else(|| profile.dominant())
}

fn specialized_affinity(domain: Domain, rng: &mut SeededRng) -> DomainVector {
    DomainVector::from_fn(|d| {
        if d == domain {
            rng.next_range(0.7, 1.0)
        } else {
            rng.next_range(0.0, 0.2)
        }
    })
}

fn balanced_affinity(rng: &mut SeededRng) -> DomainVector {
    DomainVector::from_fn(|_| rng.next_range(0.3, 0.7))
}

fn pick_name(pool: &[&str], index: usize, fallback: &str) -> String {
    pool.get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{} {}", fallback, index + 1))
}

fn stance_for(similarity: f64) -> Stance {
    if similarity >= 0.8 {
        Stance::Allied
    } else if similarity >= 0.65 {
        Stance::Trade
    } else if similarity <= 0.45 {
        Stance::Hostile
    } else {
        Stance::Neutral
    }
}

fn generate_faction(
    index: usize,
    names: &[&str],
    profile: &AmbitionProfile,
    outlook: &DomainVector,
    config: &SimulationConfig,
    rng: &mut SeededRng,
) -> Faction {
    let affinity = if rng.chance(config.specialized_faction_chance) {
        let domain = biased_domain(profile, rng);
        specialized_affinity(domain, rng)
    } else {
        balanced_affinity(rng)
    };
    let power = rng.next_range(20.0, 60.0);

    Faction {
        id: FactionId(index as u32),
        name: pick_name(names, index, "Faction"),
        stance: stance_for(affinity.similarity(outlook)),
        power,
        regions: BTreeSet::new(),
        affinity,
    }
}

/// Lawfulness leans on virtue and, less, on power; local affinity nudges it
fn initial_lawfulness(profile: &AmbitionProfile, affinity: &DomainVector, rng: &mut SeededRng) -> f64 {
    40.0 + 40.0 * profile.weight(Domain::Virtue)
        + 20.0 * profile.weight(Domain::Power)
        + 10.0 * (affinity.virtue - 0.5)
        + rng.next_range(-4.0, 4.0)
}

fn initial_pressures(profile: &AmbitionProfile, affinity: &DomainVector, rng: &mut SeededRng) -> Pressures {
    let lawfulness = initial_lawfulness(profile, affinity, rng);
    let unrest = 30.0 + 20.0 * profile.weight(Domain::Power) - 20.0 * profile.weight(Domain::Virtue)
        + 10.0 * (affinity.freedom - 0.5)
        + rng.next_range(-4.0, 4.0);
    let piety = 40.0 + 40.0 * profile.weight(Domain::Faith)
        + 10.0 * (affinity.faith - 0.5)
        + rng.next_range(-4.0, 4.0);
    let heresy = 40.0 + 30.0 * profile.weight(Domain::Freedom) - 20.0 * profile.weight(Domain::Faith)
        + rng.next_range(-4.0, 4.0);
    Pressures {
        lawfulness: clamp_percent(lawfulness),
        unrest: clamp_percent(unrest),
        piety: clamp_percent(piety),
        heresy: clamp_percent(heresy),
    }
}

fn home_region(profile: &AmbitionProfile, rng: &mut SeededRng) -> Region {
    let affinity = DomainVector::uniform(0.5);
    let pressures = initial_pressures(profile, &affinity, rng);
    let population = rng.next_range(1500.0, 2500.0);

    Region {
        id: RegionId(0),
        name: HOME_NAME.to_string(),
        controlled: true,
        owner: None,
        endowment: Resources {
            gold: 5.0 + 15.0 * profile.weight(Domain::Wealth),
            food: 12.0 + 10.0 * profile.weight(Domain::Freedom),
            materials: 2.0 + 8.0 * profile.weight(Domain::Creation),
            manpower: 1.0 + 4.0 * profile.weight(Domain::Power),
            influence: 1.0 + 3.0 * profile.weight(Domain::Faith),
        },
        people: People {
            population,
            loyalty: 55.0 + 25.0 * profile.weight(Domain::Virtue),
            unrest: 20.0,
        },
        security: clamp_unit(0.4 + 0.4 * profile.weight(Domain::Power)),
        pressures,
        affinity,
        specialization: None,
    }
}

fn outer_region(
    index: usize,
    names: &[&str],
    profile: &AmbitionProfile,
    config: &SimulationConfig,
    rng: &mut SeededRng,
) -> Region {
    let (affinity, specialization) = if rng.chance(config.specialized_region_chance) {
        let domain = biased_domain(profile, rng);
        (specialized_affinity(domain, rng), Some(domain))
    } else {
        (balanced_affinity(rng), None)
    };
    let pressures = initial_pressures(profile, &affinity, rng);
    let population = rng.next_range(500.0, 2000.0);
    let security = rng.next_range(0.3, 0.7);

    Region {
        id: RegionId(index as u32),
        name: pick_name(names, index - 1, "Region"),
        controlled: false,
        owner: None,
        endowment: Resources {
            gold: 2.0 + 8.0 * affinity.wealth,
            food: 4.0 + 6.0 * affinity.freedom,
            materials: 1.0 + 6.0 * affinity.creation,
            manpower: 1.0 + 3.0 * affinity.power,
            influence: 3.0 * affinity.faith,
        },
        people: People {
            population,
            loyalty: 50.0,
            unrest: 20.0,
        },
        security,
        pressures,
        affinity,
        specialization,
    }
}

/// Give each non-home region to the faction it most resembles, or with some
/// chance to a random one. Ties go to the lower faction index.
fn assign_regions(
    regions: &mut [Region],
    factions: &mut [Faction],
    config: &SimulationConfig,
    rng: &mut SeededRng,
) {
    if factions.is_empty() {
        return;
    }
    for region in regions.iter_mut().filter(|r| !r.controlled) {
        let mut best = 0;
        let mut best_score = f64::MIN;
        for (i, faction) in factions.iter().enumerate() {
            let score = region.affinity.similarity(&faction.affinity);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        if rng.chance(config.random_reassignment_chance) {
            best = rng.next_int(0, factions.len() as i64 - 1) as usize;
        }
        region.owner = Some(factions[best].id);
        factions[best].regions.insert(region.id);
    }
}

fn starting_resources(profile: &AmbitionProfile) -> Resources {
    Resources {
        gold: 100.0 + 200.0 * profile.weight(Domain::Wealth),
        food: 150.0 + 100.0 * profile.weight(Domain::Freedom),
        materials: 50.0 + 150.0 * profile.weight(Domain::Creation),
        manpower: 50.0 + 150.0 * profile.weight(Domain::Power),
        influence: 20.0 + 80.0 * profile.weight(Domain::Virtue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambition::interpret;

    #[test]
    fn test_generation_is_deterministic() {
        let config = SimulationConfig::default();
        let profile = interpret("gold and trade and a great fortune", &config);
        let a = generate_world(&profile, 42, &config);
        let b = generate_world(&profile, 42, &config);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_counts_within_bounds() {
        let config = SimulationConfig::default();
        let profile = AmbitionProfile::balanced();
        for seed in 0..40 {
            let world = generate_world(&profile, seed, &config);
            assert!((6..=10).contains(&world.regions.len()));
            assert!((4..=6).contains(&world.factions.len()));
        }
    }

    #[test]
    fn test_home_region_is_controlled_and_balanced() {
        let config = SimulationConfig::default();
        let world = generate_world(&AmbitionProfile::balanced(), 7, &config);
        let home = &world.regions[0];
        assert!(home.controlled);
        assert!(home.owner.is_none());
        assert_eq!(home.affinity, DomainVector::uniform(0.5));
        assert!(world.regions[1..].iter().all(|r| !r.controlled && r.owner.is_some()));
    }

    #[test]
    fn test_region_ownership_matches_faction_sets() {
        let config = SimulationConfig::default();
        let world = generate_world(&AmbitionProfile::balanced(), 2024, &config);
        for region in world.regions.iter().skip(1) {
            let owner = region.owner.and_then(|id| world.faction(id)).unwrap();
            assert!(owner.regions.contains(&region.id));
        }
        let held: usize = world.factions.iter().map(|f| f.regions.len()).sum();
        assert_eq!(held, world.regions.len() - 1);
    }

    #[test]
    fn test_wealth_scales_starting_gold() {
        let config = SimulationConfig::default();
        let rich = interpret("gold money trade riches", &config);
        let poor = interpret("pray to the gods in the temple", &config);
        let a = generate_world(&rich, 1, &config);
        let b = generate_world(&poor, 1, &config);
        assert!(a.resources.gold > b.resources.gold);
        assert!(b.legitimacy.faith > a.legitimacy.faith);
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = SimulationConfig::default();
        let profile = AmbitionProfile::balanced();
        let a = generate_world(&profile, 1, &config);
        let b = generate_world(&profile, 2, &config);
        assert_ne!(a, b);
    }
}
