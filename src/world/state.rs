//! WorldState - the main world state container

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_percent, FactionId, LegitimacyAxis, RegionId, Resources, Tick};
use crate::world::faction::Faction;
use crate::world::region::Region;

/// Four-axis political legitimacy, each in [0, 100]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Legitimacy {
    pub law: f64,
    pub faith: f64,
    pub lineage: f64,
    pub might: f64,
}

impl Legitimacy {
    pub fn get(&self, axis: LegitimacyAxis) -> f64 {
        match axis {
            LegitimacyAxis::Law => self.law,
            LegitimacyAxis::Faith => self.faith,
            LegitimacyAxis::Lineage => self.lineage,
            LegitimacyAxis::Might => self.might,
        }
    }

    pub fn get_mut(&mut self, axis: LegitimacyAxis) -> &mut f64 {
        match axis {
            LegitimacyAxis::Law => &mut self.law,
            LegitimacyAxis::Faith => &mut self.faith,
            LegitimacyAxis::Lineage => &mut self.lineage,
            LegitimacyAxis::Might => &mut self.might,
        }
    }

    pub fn adjust(&mut self, axis: LegitimacyAxis, delta: f64) {
        let slot = self.get_mut(axis);
        *slot = clamp_percent(*slot + delta);
    }

    pub fn clamp(&mut self) {
        for axis in LegitimacyAxis::ALL {
            let slot = self.get_mut(axis);
            *slot = clamp_percent(*slot);
        }
    }
}

/// Realm-wide population aggregate
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    pub population: f64,
    /// 0 to 100
    pub loyalty: f64,
    /// 0 to 100
    pub unrest: f64,
    /// 0 to 100
    pub faith: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealmStat {
    Population,
    Loyalty,
    Unrest,
    Faith,
}

impl RealmStat {
    pub fn parse(s: &str) -> Option<RealmStat> {
        match s {
            "population" => Some(RealmStat::Population),
            "loyalty" => Some(RealmStat::Loyalty),
            "unrest" => Some(RealmStat::Unrest),
            "faith" => Some(RealmStat::Faith),
            _ => None,
        }
    }
}

impl Realm {
    pub fn get(&self, stat: RealmStat) -> f64 {
        match stat {
            RealmStat::Population => self.population,
            RealmStat::Loyalty => self.loyalty,
            RealmStat::Unrest => self.unrest,
            RealmStat::Faith => self.faith,
        }
    }

    pub fn clamp(&mut self) {
        self.loyalty = clamp_percent(self.loyalty);
        self.unrest = clamp_percent(self.unrest);
        self.faith = clamp_percent(self.faith);
        if !self.population.is_finite() || self.population < 0.0 {
            self.population = 0.0;
        }
    }
}

/// The player's standing forces
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Forces {
    pub soldiers: f64,
    /// 0 to 100
    pub morale: f64,
    /// 0 to 100
    pub supply: f64,
}

impl Forces {
    pub fn clamp(&mut self) {
        if !self.soldiers.is_finite() || self.soldiers < 0.0 {
            self.soldiers = 0.0;
        }
        self.morale = clamp_percent(self.morale);
        self.supply = clamp_percent(self.supply);
    }
}

/// Complete world state for one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Fixed at creation
    pub seed: u64,
    /// Increases by exactly 1 per simulation step
    pub tick: Tick,
    pub resources: Resources,
    pub realm: Realm,
    pub forces: Forces,
    pub legitimacy: Legitimacy,
    pub regions: Vec<Region>,
    pub factions: Vec<Faction>,
    /// Derived flags, recomputed every tick
    pub traits: BTreeSet<String>,
}

impl WorldState {
    /// An empty world with neutral figures; mostly useful as a test base
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            tick: 0,
            resources: Resources::default(),
            realm: Realm {
                population: 0.0,
                loyalty: 50.0,
                unrest: 20.0,
                faith: 50.0,
            },
            forces: Forces {
                soldiers: 0.0,
                morale: 50.0,
                supply: 50.0,
            },
            legitimacy: Legitimacy {
                law: 50.0,
                faith: 50.0,
                lineage: 50.0,
                might: 50.0,
            },
            regions: Vec::new(),
            factions: Vec::new(),
            traits: BTreeSet::new(),
        }
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.iter_mut().find(|f| f.id == id)
    }

    pub fn controlled_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.controlled)
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }

    pub fn set_trait(&mut self, name: &str) {
        self.traits.insert(name.to_string());
    }

    /// Mean lawfulness over all regions; 50 for a world with none
    pub fn average_lawfulness(&self) -> f64 {
        if self.regions.is_empty() {
            return 50.0;
        }
        self.regions.iter().map(|r| r.pressures.lawfulness).sum::<f64>() / self.regions.len() as f64
    }

    /// Enforce every declared range
    pub fn clamp_all(&mut self) {
        self.resources.clamp_non_negative();
        self.realm.clamp();
        self.forces.clamp();
        self.legitimacy.clamp();
        for region in &mut self.regions {
            region.clamp();
        }
        for faction in &mut self.factions {
            faction.clamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::region::test_region;

    #[test]
    fn test_clamp_all_enforces_ranges() {
        let mut world = WorldState::empty(1);
        world.resources.gold = -20.0;
        world.legitimacy.law = 150.0;
        world.realm.unrest = -3.0;
        let mut region = test_region(0);
        region.pressures.piety = 130.0;
        world.regions.push(region);

        world.clamp_all();

        assert_eq!(world.resources.gold, 0.0);
        assert_eq!(world.legitimacy.law, 100.0);
        assert_eq!(world.realm.unrest, 0.0);
        assert_eq!(world.regions[0].pressures.piety, 100.0);
    }

    #[test]
    fn test_average_lawfulness_empty_world() {
        assert_eq!(WorldState::empty(0).average_lawfulness(), 50.0);
    }

    #[test]
    fn test_legitimacy_adjust_clamps() {
        let mut legitimacy = Legitimacy { law: 95.0, ..Default::default() };
        legitimacy.adjust(LegitimacyAxis::Law, 10.0);
        assert_eq!(legitimacy.law, 100.0);
        legitimacy.adjust(LegitimacyAxis::Might, -10.0);
        assert_eq!(legitimacy.might, 0.0);
    }
}
