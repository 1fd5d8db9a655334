//! Political drift: loyalty decay, unrest response, force morale and supply

use crate::core::config::SimulationConfig;
use crate::core::types::drift_toward;
use crate::world::state::WorldState;
use crate::world::traits;

pub fn political_drift(world: &mut WorldState, config: &SimulationConfig) {
    let scarce = world.has_trait(traits::SCARCITY);
    let realm = &mut world.realm;

    realm.loyalty -= config.loyalty_decay;
    if realm.loyalty < config.loyalty_unrest_floor {
        realm.unrest += (config.loyalty_unrest_floor - realm.loyalty) * 0.1;
    } else if !scarce {
        realm.unrest -= 1.0;
    }
    if scarce {
        realm.unrest += config.scarcity_unrest;
    }

    let forces = &mut world.forces;
    forces.morale = drift_toward(forces.morale, world.realm.loyalty, 2.0);
    if scarce {
        forces.supply -= 5.0;
    } else {
        forces.supply += 2.0;
    }
    if forces.supply < 20.0 {
        forces.morale -= 2.0;
    }

    world.clamp_all();
    if traits::is_crisis(world, config) {
        world.set_trait(traits::CRISIS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loyalty_decays_and_unrest_eases_when_content() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.realm.loyalty = 70.0;
        world.realm.unrest = 30.0;
        political_drift(&mut world, &config);
        assert_eq!(world.realm.loyalty, 69.5);
        assert_eq!(world.realm.unrest, 29.0);
    }

    #[test]
    fn test_scarcity_and_disloyalty_drive_crisis() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.realm.loyalty = 10.0;
        world.realm.unrest = 68.0;
        world.set_trait(traits::SCARCITY);
        political_drift(&mut world, &config);
        assert!(world.realm.unrest > 70.0);
        assert!(world.has_trait(traits::CRISIS));
        assert!(world.forces.supply < 50.0);
    }
}
