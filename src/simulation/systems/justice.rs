//! Justice and law: legitimacy-law feeds regional lawfulness, which in turn
//! breeds crime or bureaucracy

use crate::core::config::SimulationConfig;
use crate::world::region::RegionMetric;
use crate::world::state::WorldState;
use crate::world::traits;

pub fn justice_drift(world: &mut WorldState, config: &SimulationConfig) {
    if world.legitimacy.law < config.law_legitimacy_floor {
        for region in world.regions.iter_mut().filter(|r| r.controlled) {
            region.adjust(RegionMetric::Lawfulness, -config.lawfulness_decay);
        }
    }

    let mut lawless = false;
    let mut clerks = 0usize;
    for region in world.regions.iter_mut() {
        if region.pressures.lawfulness < config.crime_threshold {
            lawless = true;
            region.adjust(RegionMetric::Security, -0.05);
            region.adjust(RegionMetric::Loyalty, -2.0);
        }
        if region.pressures.lawfulness > config.bureaucracy_threshold && region.controlled {
            clerks += 1;
        }
    }
    world.resources.gold -= clerks as f64 * config.bureaucracy_upkeep;

    world.clamp_all();
    if lawless {
        world.set_trait(traits::HIGH_CRIME);
    }
    if traits::has_high_bureaucracy(world, config) {
        world.set_trait(traits::HIGH_BUREAUCRACY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::region::test_region;

    #[test]
    fn test_weak_law_legitimacy_erodes_controlled_lawfulness() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.legitimacy.law = 20.0;
        world.regions.push(test_region(0));
        world.regions.push(test_region(1));
        justice_drift(&mut world, &config);
        assert_eq!(world.regions[0].pressures.lawfulness, 49.0);
        assert_eq!(world.regions[1].pressures.lawfulness, 50.0);
    }

    #[test]
    fn test_crime_and_bureaucracy_traits() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.resources.gold = 10.0;
        let mut home = test_region(0);
        home.pressures.lawfulness = 90.0;
        let mut lawless = test_region(1);
        lawless.pressures.lawfulness = 10.0;
        world.regions.push(home);
        world.regions.push(lawless);

        justice_drift(&mut world, &config);

        assert!(world.has_trait(traits::HIGH_CRIME));
        assert!(world.has_trait(traits::HIGH_BUREAUCRACY));
        assert_eq!(world.resources.gold, 9.0);
        assert!((world.regions[1].security - 0.45).abs() < 1e-9);
        assert_eq!(world.regions[1].people.loyalty, 48.0);
    }
}
