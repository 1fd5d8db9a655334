//! Tick orchestrator
//!
//! Pass order is fixed:
//! actions -> factions -> economy -> politics -> regional -> justice
//! -> faith -> diplomacy. Derived traits are cleared after the faction
//! pass and re-set by the drift systems that own them. Every pass clamps.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::rng::{seed_from_text, streams, SeededRng};
use crate::factions::planning::{run_faction_turns, FactionAction};
use crate::factions::roster::FactionRoster;
use crate::planner::proposal::ActionProposal;
use crate::simulation::apply::{apply_action, FiredRisk};
use crate::simulation::systems;
use crate::world::state::WorldState;

/// What happened during one tick besides the drift itself
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Actions that were actually applied
    pub applied: Vec<String>,
    /// Actions rejected as unaffordable
    pub rejected: Vec<String>,
    pub fired_risks: Vec<FiredRisk>,
    pub faction_actions: Vec<FactionAction>,
}

/// Advance `world` by one tick in place. Never fails.
pub fn run_tick(
    world: &mut WorldState,
    actions: &[ActionProposal],
    roster: Option<&mut FactionRoster>,
    config: &SimulationConfig,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let tick = world.tick;

    for action in actions {
        let mut rng = SeededRng::keyed(world.seed, streams::ACTION_RISKS, &[tick, seed_from_text(&action.id)]);
        match apply_action(world, action, &mut rng) {
            Ok(fired) => {
                outcome.applied.push(action.id.clone());
                outcome.fired_risks.extend(fired);
            }
            Err(e) => {
                tracing::warn!(tick, action = %action.id, error = %e, "action rejected");
                outcome.rejected.push(action.id.clone());
            }
        }
    }

    let mut roster = roster;
    if let Some(roster) = roster.as_deref_mut() {
        outcome.faction_actions = run_faction_turns(world, roster, config);
        world.clamp_all();
    }

    world.traits.clear();
    systems::economic_drift(world, config);
    systems::political_drift(world, config);
    systems::regional_drift(world, config);
    systems::justice_drift(world, config);
    systems::faith_drift(world, config);
    systems::diplomacy_drift(world, roster, config);

    world.tick += 1;
    tracing::debug!(
        tick = world.tick,
        applied = outcome.applied.len(),
        faction_actions = outcome.faction_actions.len(),
        traits = ?world.traits,
        "tick complete"
    );
    outcome
}

/// Copy `prev` and advance the copy, leaving `prev` untouched for diffing
pub fn step(
    prev: &WorldState,
    actions: &[ActionProposal],
    roster: Option<&mut FactionRoster>,
    config: &SimulationConfig,
) -> (WorldState, TickOutcome) {
    let mut next = prev.clone();
    let outcome = run_tick(&mut next, actions, roster, config);
    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambition::profile::AmbitionProfile;
    use crate::planner::fallback::fallback_actions;
    use crate::rules::risk::{Risk, RiskKind};
    use crate::world::generation::generate_world;
    use crate::world::region::test_region;

    #[test]
    fn test_empty_world_tick_is_total() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        let outcome = run_tick(&mut world, &[], None, &config);
        assert_eq!(world.tick, 1);
        assert!(outcome.applied.is_empty());
    }

    #[test]
    fn test_pressures_relax_without_intervention() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        world.resources.gold = 100.0;
        world.resources.food = 100.0;
        let mut region = test_region(0);
        region.pressures.lawfulness = 80.0;
        region.pressures.unrest = 20.0;
        world.regions.push(region);

        run_tick(&mut world, &[], None, &config);

        let p = &world.regions[0].pressures;
        assert!(p.lawfulness < 80.0 && p.lawfulness >= 50.0);
        assert!(p.unrest > 20.0 && p.unrest <= 50.0);
    }

    #[test]
    fn test_step_leaves_prev_untouched() {
        let config = SimulationConfig::default();
        let prev = generate_world(&AmbitionProfile::balanced(), 4, &config);
        let mut roster = FactionRoster::generate(&prev, &config);
        let (next, outcome) = step(&prev, &fallback_actions()[..1], Some(&mut roster), &config);
        assert_eq!(prev.tick, 0);
        assert_eq!(next.tick, 1);
        assert_eq!(outcome.applied, vec!["gather_gold".to_string()]);
    }

    #[test]
    fn test_unaffordable_action_is_rejected_not_fatal() {
        let config = SimulationConfig::default();
        let mut world = WorldState::empty(0);
        let mut action = ActionProposal::bare("palace", "Build a palace");
        action.cost.gold = 1e6;
        let outcome = run_tick(&mut world, &[action], None, &config);
        assert_eq!(outcome.rejected, vec!["palace".to_string()]);
        assert_eq!(world.tick, 1);
    }

    #[test]
    fn test_same_inputs_same_outputs() {
        let config = SimulationConfig::default();
        let start = generate_world(&AmbitionProfile::balanced(), 77, &config);
        let mut r1 = FactionRoster::generate(&start, &config);
        let mut r2 = r1.clone();
        let mut a = start.clone();
        let mut b = start;
        for _ in 0..5 {
            let o1 = run_tick(&mut a, &fallback_actions()[1..2], Some(&mut r1), &config);
            let o2 = run_tick(&mut b, &fallback_actions()[1..2], Some(&mut r2), &config);
            assert_eq!(o1, o2);
        }
        assert_eq!(a, b);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_risk_rolls_do_not_depend_on_list_position() {
        let config = SimulationConfig::default();
        let mut risky = ActionProposal::bare("night_raid", "Raid by night");
        risky.risks = (0..16)
            .map(|i| Risk { kind: RiskKind::Other(format!("mishap_{}", i)), chance: 0.5 })
            .collect();
        let filler = ActionProposal::bare("muster", "Muster the guard");

        let mut alone = WorldState::empty(9);
        let mut behind = WorldState::empty(9);
        let a = run_tick(&mut alone, &[risky.clone()], None, &config);
        let b = run_tick(&mut behind, &[filler, risky], None, &config);

        let raid = |o: &TickOutcome| -> Vec<FiredRisk> {
            o.fired_risks.iter().filter(|r| r.action_id == "night_raid").cloned().collect()
        };
        assert_eq!(raid(&a), raid(&b));
    }
}
