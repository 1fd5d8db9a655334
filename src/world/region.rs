//! Region - a province of the realm or of a rival faction

use serde::{Deserialize, Serialize};

use crate::core::types::{
    clamp_percent, clamp_unit, Domain, DomainVector, FactionId, RegionId, Resources,
};

/// A strategic region
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,

    // Ownership
    pub controlled: bool,
    pub owner: Option<FactionId>,

    /// Per-tick production when controlled; most fields are zero
    pub endowment: Resources,
    pub people: People,

    /// Security in [0, 1]
    pub security: f64,
    pub pressures: Pressures,

    // Flavor
    pub affinity: DomainVector,
    pub specialization: Option<Domain>,
}

/// Population-level figures of a region
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct People {
    pub population: f64,
    /// 0 to 100
    pub loyalty: f64,
    /// 0 to 100
    pub unrest: f64,
}

/// The four drifting pressure metrics, each in [0, 100]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pressures {
    pub lawfulness: f64,
    pub unrest: f64,
    pub piety: f64,
    pub heresy: f64,
}

impl Default for Pressures {
    fn default() -> Self {
        Self {
            lawfulness: 50.0,
            unrest: 50.0,
            piety: 50.0,
            heresy: 50.0,
        }
    }
}

/// Any numeric field of a region an effect can target
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionMetric {
    Lawfulness,
    Unrest,
    Piety,
    Heresy,
    Loyalty,
    Security,
}

impl RegionMetric {
    pub const PRESSURES: [RegionMetric; 4] = [
        RegionMetric::Lawfulness,
        RegionMetric::Unrest,
        RegionMetric::Piety,
        RegionMetric::Heresy,
    ];

    pub fn parse(s: &str) -> Option<RegionMetric> {
        match s {
            "lawfulness" => Some(RegionMetric::Lawfulness),
            "unrest" => Some(RegionMetric::Unrest),
            "piety" => Some(RegionMetric::Piety),
            "heresy" => Some(RegionMetric::Heresy),
            "loyalty" => Some(RegionMetric::Loyalty),
            "security" => Some(RegionMetric::Security),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionMetric::Lawfulness => "lawfulness",
            RegionMetric::Unrest => "unrest",
            RegionMetric::Piety => "piety",
            RegionMetric::Heresy => "heresy",
            RegionMetric::Loyalty => "loyalty",
            RegionMetric::Security => "security",
        }
    }
}

impl Region {
    pub fn metric(&self, metric: RegionMetric) -> f64 {
        match metric {
            RegionMetric::Lawfulness => self.pressures.lawfulness,
            RegionMetric::Unrest => self.pressures.unrest,
            RegionMetric::Piety => self.pressures.piety,
            RegionMetric::Heresy => self.pressures.heresy,
            RegionMetric::Loyalty => self.people.loyalty,
            RegionMetric::Security => self.security,
        }
    }

    /// Add `delta` to a metric and clamp it back into range
    pub fn adjust(&mut self, metric: RegionMetric, delta: f64) {
        let slot = match metric {
            RegionMetric::Lawfulness => &mut self.pressures.lawfulness,
            RegionMetric::Unrest => &mut self.pressures.unrest,
            RegionMetric::Piety => &mut self.pressures.piety,
            RegionMetric::Heresy => &mut self.pressures.heresy,
            RegionMetric::Loyalty => &mut self.people.loyalty,
            RegionMetric::Security => &mut self.security,
        };
        *slot += delta;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.pressures.lawfulness = clamp_percent(self.pressures.lawfulness);
        self.pressures.unrest = clamp_percent(self.pressures.unrest);
        self.pressures.piety = clamp_percent(self.pressures.piety);
        self.pressures.heresy = clamp_percent(self.pressures.heresy);
        self.people.loyalty = clamp_percent(self.people.loyalty);
        self.people.unrest = clamp_percent(self.people.unrest);
        if !self.people.population.is_finite() || self.people.population < 0.0 {
            self.people.population = 0.0;
        }
        self.security = clamp_unit(self.security);
        self.endowment.clamp_non_negative();
    }
}

#[cfg(test)]
pub(crate) fn test_region(id: u32) -> Region {
    Region {
        id: RegionId(id),
        name: format!("Region {}", id),
        controlled: id == 0,
        owner: None,
        endowment: Resources { gold: 5.0, food: 5.0, ..Default::default() },
        people: People { population: 1000.0, loyalty: 50.0, unrest: 20.0 },
        security: 0.5,
        pressures: Pressures::default(),
        affinity: DomainVector::uniform(0.5),
        specialization: None,
    }
}
