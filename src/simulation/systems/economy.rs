//! Economic drift: regional production, then upkeep

use crate::core::config::SimulationConfig;
use crate::world::state::WorldState;
use crate::world::traits;

/// Output multiplier for a region: insecure or disloyal land yields less
fn yield_factor(security: f64, loyalty: f64) -> f64 {
    0.5 + 0.25 * security + 0.25 * (loyalty / 100.0)
}

pub fn economic_drift(world: &mut WorldState, config: &SimulationConfig) {
    for region in world.regions.iter().filter(|r| r.controlled) {
        let produced = region
            .endowment
            .scaled(yield_factor(region.security, region.people.loyalty));
        world.resources.add(&produced);
    }

    let soldiers = world.forces.soldiers;
    world.resources.gold -= soldiers * config.soldier_gold_upkeep;
    world.resources.food -=
        soldiers * config.soldier_food_upkeep + world.realm.population * config.population_food_upkeep;

    // Unpaid upkeep comes out of the army's supply
    if world.resources.gold < 0.0 || world.resources.food < 0.0 {
        world.forces.supply -= 10.0;
    }

    world.clamp_all();
    if traits::is_scarce(world, config) {
        world.set_trait(traits::SCARCITY);
    }
}
