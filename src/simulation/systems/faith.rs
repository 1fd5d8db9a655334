//! Faith: legitimacy-faith feeds regional piety; zealotry and heresy feed
//! back into the realm

use crate::core::config::SimulationConfig;
use crate::core::types::LegitimacyAxis;
use crate::world::region::RegionMetric;
use crate::world::state::WorldState;
use crate::world::traits;

pub fn faith_drift(world: &mut WorldState, config: &SimulationConfig) {
    if world.legitimacy.faith < config.faith_legitimacy_floor {
        for region in world.regions.iter_mut().filter(|r| r.controlled) {
            region.adjust(RegionMetric::Piety, -config.piety_decay);
        }
    }

    let mut zealous = false;
    let mut heretical = false;
    for region in world.regions.iter_mut() {
        if region.pressures.piety > config.zealotry_threshold {
            zealous = true;
            region.people.unrest += 1.0;
        }
        if region.pressures.heresy > config.heresy_threshold {
            heretical = true;
        }
    }

    if zealous {
        world.legitimacy.adjust(LegitimacyAxis::Faith, 0.5);
        world.realm.faith += 0.5;
    }
    if heretical {
        world.legitimacy.adjust(LegitimacyAxis::Faith, -1.0);
        world.realm.faith -= 1.0;
    }

    world.clamp_all();
    if zealous {
        world.set_trait(traits::ZEALOTRY);
    }
    if heretical {
        world.set_trait(traits::RAMPANT_HERESY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::region::test_region;

    #[test]
    fn test_weak_faith_legitimacy_erodes_piety() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.legitimacy.faith = 30.0;
        world.regions.push(test_region(0));
        faith_drift(&mut world, &config);
        assert_eq!(world.regions[0].pressures.piety, 49.0);
    }

    #[test]
    fn test_zealotry_and_heresy() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        let mut zealots = test_region(0);
        zealots.pressures.piety = 85.0;
        let mut heretics = test_region(1);
        heretics.pressures.heresy = 90.0;
        world.regions.push(zealots);
        world.regions.push(heretics);

        faith_drift(&mut world, &config);

        assert!(world.has_trait(traits::ZEALOTRY));
        assert!(world.has_trait(traits::RAMPANT_HERESY));
        assert_eq!(world.legitimacy.faith, 49.5);
        assert_eq!(world.regions[0].people.unrest, 21.0);
        // Lawfulness and pressure unrest are left alone
        assert_eq!(world.regions[0].pressures.lawfulness, 50.0);
        assert_eq!(world.regions[1].pressures.unrest, 50.0);
    }
}
