//! Regional drift: security, loyalty/unrest propagation, pressure relaxation

use crate::core::config::SimulationConfig;
use crate::core::types::drift_toward;
use crate::world::state::WorldState;

pub fn regional_drift(world: &mut WorldState, config: &SimulationConfig) {
    let security_target = 0.3 + 0.4 * (world.forces.morale / 100.0);
    let realm_loyalty = world.realm.loyalty;
    let realm_unrest = world.realm.unrest;
    let k = config.regional_propagation;

    for region in world.regions.iter_mut() {
        if region.controlled {
            region.security = drift_toward(region.security, security_target, 0.02);
            region.people.loyalty += (realm_loyalty - region.people.loyalty) * k;
            region.people.unrest += (realm_unrest - region.people.unrest) * k;
        }

        let p = &mut region.pressures;
        p.lawfulness = drift_toward(p.lawfulness, config.pressure_equilibrium, config.pressure_drift);
        p.unrest = drift_toward(p.unrest, config.pressure_equilibrium, config.pressure_drift);
        p.piety = drift_toward(p.piety, config.pressure_equilibrium, config.pressure_drift);
        p.heresy = drift_toward(p.heresy, config.pressure_equilibrium, config.pressure_drift);
    }

    world.realm.population = world
        .controlled_regions()
        .map(|r| r.people.population)
        .sum();

    world.clamp_all();
}
