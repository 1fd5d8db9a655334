//! Effect and action application
//!
//! Actions and event choices both go through `apply_effects`, so a typed
//! effect means the same thing wherever it was authored.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::rng::SeededRng;
use crate::core::types::{LegitimacyAxis, ResourceKind, Resources};
use crate::planner::proposal::ActionProposal;
use crate::rules::effect::Effect;
use crate::rules::risk::RiskKind;
use crate::world::region::RegionMetric;
use crate::world::state::WorldState;

/// A risk that fired while applying an action
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredRisk {
    pub action_id: String,
    pub kind: RiskKind,
}

/// Fail with `InsufficientResources` naming the first short stock
pub fn check_affordable(world: &WorldState, action_id: &str, cost: &Resources) -> Result<()> {
    match world.resources.shortfall(cost) {
        None => Ok(()),
        Some((kind, needed, available)) => Err(SimError::InsufficientResources {
            action: action_id.to_string(),
            resource: kind.to_string(),
            needed,
            available,
        }),
    }
}

fn adjust_controlled(world: &mut WorldState, metric: RegionMetric, delta: f64) {
    for region in world.regions.iter_mut().filter(|r| r.controlled) {
        region.adjust(metric, delta);
    }
}

/// Apply one effect to the world. Domain and modifier effects belong to the
/// ambition profile and leave the world untouched.
pub fn apply_effect(world: &mut WorldState, effect: &Effect) {
    match effect {
        Effect::Legitimacy { axis, delta } => world.legitimacy.adjust(*axis, *delta),
        Effect::Region { metric, delta, region: Some(id) } => {
            if let Some(region) = world.region_mut(*id) {
                region.adjust(*metric, *delta);
            }
        }
        Effect::Region { metric, delta, region: None } => adjust_controlled(world, *metric, *delta),
        Effect::Domain { .. } | Effect::Modifier { .. } => {}
        Effect::Raw { text } => tracing::trace!(effect = %text, "raw effect has no numeric impact"),
    }
}

pub fn apply_effects(world: &mut WorldState, effects: &[Effect]) {
    for effect in effects {
        apply_effect(world, effect);
    }
}

fn apply_risk(world: &mut WorldState, kind: &RiskKind, action_id: &str) {
    match kind {
        // Handled by withholding the reward
        RiskKind::Failure => {}
        RiskKind::Unrest => world.realm.unrest += 5.0,
        RiskKind::Scandal => world.legitimacy.adjust(LegitimacyAxis::Lineage, -5.0),
        RiskKind::Casualties => {
            let manpower = world.resources.get_mut(ResourceKind::Manpower);
            *manpower *= 0.9;
        }
        RiskKind::Heresy => adjust_controlled(world, RegionMetric::Heresy, 5.0),
        RiskKind::Other(key) => tracing::debug!(action = action_id, risk = %key, "unrecognized risk fired"),
    }
}

/// Pay the cost, roll risks, grant the reward unless the action failed, and
/// apply its effects. An unaffordable action is rejected without changes.
pub fn apply_action(
    world: &mut WorldState,
    action: &ActionProposal,
    rng: &mut SeededRng,
) -> Result<Vec<FiredRisk>> {
    check_affordable(world, &action.id, &action.cost)?;
    world.resources.subtract(&action.cost);

    let fired: Vec<FiredRisk> = action
        .risks
        .iter()
        .filter(|risk| rng.chance(risk.chance))
        .map(|risk| FiredRisk {
            action_id: action.id.clone(),
            kind: risk.kind.clone(),
        })
        .collect();

    if !fired.iter().any(|r| r.kind == RiskKind::Failure) {
        world.resources.add(&action.reward);
    }
    apply_effects(world, &action.effects);
    for risk in &fired {
        apply_risk(world, &risk.kind, &action.id);
    }
    world.clamp_all();
    Ok(fired)
}
