//! Structured before/after world diff

use serde::{Deserialize, Serialize};

use crate::core::types::{FactionId, LegitimacyAxis, RegionId, ResourceKind, Tick};
use crate::world::faction::Stance;
use crate::world::region::RegionMetric;
use crate::world::state::WorldState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceShift {
    pub kind: ResourceKind,
    pub before: f64,
    pub delta: f64,
}

impl ResourceShift {
    /// Percentage change, capped at 100
    pub fn relative(&self) -> f64 {
        (self.delta.abs() / self.before.max(50.0) * 100.0).min(100.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionShift {
    pub region: RegionId,
    pub name: String,
    pub metric: RegionMetric,
    pub delta: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StanceChange {
    pub faction: FactionId,
    pub name: String,
    pub from: Stance,
    pub to: Stance,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDiff {
    /// Tick of the later snapshot
    pub tick: Tick,
    pub resources: Vec<ResourceShift>,
    pub loyalty: f64,
    pub unrest: f64,
    pub legitimacy: Vec<(LegitimacyAxis, f64)>,
    /// Pressure deltas at or above the significance threshold
    pub regions: Vec<RegionShift>,
    pub new_traits: Vec<String>,
    pub stance_changes: Vec<StanceChange>,
}

impl WorldDiff {
    /// Diff two snapshots of the same world. Regions and factions are
    /// matched by id; entries present on only one side are ignored.
    pub fn compute(prev: &WorldState, next: &WorldState, threshold: f64) -> Self {
        let resources = ResourceKind::ALL
            .into_iter()
            .map(|kind| ResourceShift {
                kind,
                before: prev.resources.get(kind),
                delta: next.resources.get(kind) - prev.resources.get(kind),
            })
            .filter(|s| s.delta != 0.0)
            .collect();

        let legitimacy = LegitimacyAxis::ALL
            .into_iter()
            .map(|axis| (axis, next.legitimacy.get(axis) - prev.legitimacy.get(axis)))
            .filter(|(_, d)| *d != 0.0)
            .collect();

        let mut regions = Vec::new();
        for after in &next.regions {
            let Some(before) = prev.region(after.id) else {
                continue;
            };
            for metric in RegionMetric::PRESSURES {
                let delta = after.metric(metric) - before.metric(metric);
                if delta.abs() >= threshold {
                    regions.push(RegionShift {
                        region: after.id,
                        name: after.name.clone(),
                        metric,
                        delta,
                    });
                }
            }
        }

        let new_traits = next
            .traits
            .iter()
            .filter(|t| !prev.traits.contains(*t))
            .cloned()
            .collect();

        let stance_changes = next
            .factions
            .iter()
            .filter_map(|after| {
                let before = prev.faction(after.id)?;
                (before.stance != after.stance).then(|| StanceChange {
                    faction: after.id,
                    name: after.name.clone(),
                    from: before.stance,
                    to: after.stance,
                })
            })
            .collect();

        Self {
            tick: next.tick,
            resources,
            loyalty: next.realm.loyalty - prev.realm.loyalty,
            unrest: next.realm.unrest - prev.realm.unrest,
            legitimacy,
            regions,
            new_traits,
            stance_changes,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.regions.is_empty() && self.new_traits.is_empty() && self.stance_changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::region::test_region;

    #[test]
    fn test_pressure_threshold_filters_small_moves() {
        let mut prev = WorldState::empty(0);
        prev.regions.push(test_region(0));
        let mut next = prev.clone();
        next.regions[0].pressures.heresy += 7.0;
        next.regions[0].pressures.piety -= 1.0;
        next.tick = 1;

        let diff = WorldDiff::compute(&prev, &next, 5.0);
        assert_eq!(diff.regions.len(), 1);
        assert_eq!(diff.regions[0].metric, RegionMetric::Heresy);
        assert_eq!(diff.regions[0].delta, 7.0);
        assert_eq!(diff.tick, 1);
    }

    #[test]
    fn test_new_traits_and_realm_deltas() {
        let mut prev = WorldState::empty(0);
        prev.set_trait("scarcity");
        let mut next = prev.clone();
        next.set_trait("crisis");
        next.realm.unrest += 12.0;
        next.legitimacy.might -= 3.0;

        let diff = WorldDiff::compute(&prev, &next, 5.0);
        assert_eq!(diff.new_traits, vec!["crisis".to_string()]);
        assert_eq!(diff.unrest, 12.0);
        assert_eq!(diff.legitimacy, vec![(LegitimacyAxis::Might, -3.0)]);
    }

    #[test]
    fn test_identical_snapshots_are_quiet() {
        let world = WorldState::empty(0);
        let diff = WorldDiff::compute(&world, &world, 5.0);
        assert!(diff.is_quiet());
        assert!(diff.resources.is_empty());
    }
}
