//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Simulation time unit (one player turn)
pub type Tick = u64;

/// Unique identifier for regions
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "region#{}", _0)]
pub struct RegionId(pub u32);

/// Unique identifier for factions
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "faction#{}", _0)]
pub struct FactionId(pub u32);

/// One of the six orthogonal ambition axes
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    #[display(fmt = "power")]
    Power,
    #[display(fmt = "wealth")]
    Wealth,
    #[display(fmt = "faith")]
    Faith,
    #[display(fmt = "virtue")]
    Virtue,
    #[display(fmt = "freedom")]
    Freedom,
    #[display(fmt = "creation")]
    Creation,
}

impl Domain {
    pub const ALL: [Domain; 6] = [
        Domain::Power,
        Domain::Wealth,
        Domain::Faith,
        Domain::Virtue,
        Domain::Freedom,
        Domain::Creation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Power => "power",
            Domain::Wealth => "wealth",
            Domain::Faith => "faith",
            Domain::Virtue => "virtue",
            Domain::Freedom => "freedom",
            Domain::Creation => "creation",
        }
    }

    pub fn parse(s: &str) -> Option<Domain> {
        Domain::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

/// Independent behavioral scalar, distinct from domain weights
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    #[display(fmt = "peaceful")]
    Peaceful,
    #[display(fmt = "ruthless")]
    Ruthless,
    #[display(fmt = "ascetic")]
    Ascetic,
    #[display(fmt = "opulent")]
    Opulent,
    #[display(fmt = "secretive")]
    Secretive,
    #[display(fmt = "charismatic")]
    Charismatic,
}

impl Modifier {
    pub const ALL: [Modifier; 6] = [
        Modifier::Peaceful,
        Modifier::Ruthless,
        Modifier::Ascetic,
        Modifier::Opulent,
        Modifier::Secretive,
        Modifier::Charismatic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Peaceful => "peaceful",
            Modifier::Ruthless => "ruthless",
            Modifier::Ascetic => "ascetic",
            Modifier::Opulent => "opulent",
            Modifier::Secretive => "secretive",
            Modifier::Charismatic => "charismatic",
        }
    }

    pub fn parse(s: &str) -> Option<Modifier> {
        Modifier::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Preferred scale of ambition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    Local,
    Regional,
    World,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::Local, Scale::Regional, Scale::World];
}

/// The four axes of political legitimacy
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegitimacyAxis {
    #[display(fmt = "law")]
    Law,
    #[display(fmt = "faith")]
    Faith,
    #[display(fmt = "lineage")]
    Lineage,
    #[display(fmt = "might")]
    Might,
}

impl LegitimacyAxis {
    pub const ALL: [LegitimacyAxis; 4] = [
        LegitimacyAxis::Law,
        LegitimacyAxis::Faith,
        LegitimacyAxis::Lineage,
        LegitimacyAxis::Might,
    ];

    pub fn parse(s: &str) -> Option<LegitimacyAxis> {
        match s {
            "law" => Some(LegitimacyAxis::Law),
            "faith" => Some(LegitimacyAxis::Faith),
            "lineage" => Some(LegitimacyAxis::Lineage),
            "might" => Some(LegitimacyAxis::Might),
            _ => None,
        }
    }
}

/// The five global resource stocks
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[display(fmt = "gold")]
    Gold,
    #[display(fmt = "food")]
    Food,
    #[display(fmt = "materials")]
    Materials,
    #[display(fmt = "manpower")]
    Manpower,
    #[display(fmt = "influence")]
    Influence,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Gold,
        ResourceKind::Food,
        ResourceKind::Materials,
        ResourceKind::Manpower,
        ResourceKind::Influence,
    ];

    pub fn parse(s: &str) -> Option<ResourceKind> {
        ResourceKind::ALL.into_iter().find(|k| k.to_string() == s)
    }
}

/// A bundle of resource amounts: stocks, costs, rewards and endowments
///
/// Missing fields deserialize as zero so rule bases can write `cost = { gold = 30 }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub gold: f64,
    pub food: f64,
    pub materials: f64,
    pub manpower: f64,
    pub influence: f64,
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Food => self.food,
            ResourceKind::Materials => self.materials,
            ResourceKind::Manpower => self.manpower,
            ResourceKind::Influence => self.influence,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Gold => &mut self.gold,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Materials => &mut self.materials,
            ResourceKind::Manpower => &mut self.manpower,
            ResourceKind::Influence => &mut self.influence,
        }
    }

    pub fn is_zero(&self) -> bool {
        ResourceKind::ALL.iter().all(|&k| self.get(k) == 0.0)
    }

    /// First stock in `self` that cannot cover `cost`, as (kind, needed, available)
    pub fn shortfall(&self, cost: &Resources) -> Option<(ResourceKind, f64, f64)> {
        ResourceKind::ALL
            .into_iter()
            .find(|&k| cost.get(k) > self.get(k))
            .map(|k| (k, cost.get(k), self.get(k)))
    }

    pub fn can_afford(&self, cost: &Resources) -> bool {
        self.shortfall(cost).is_none()
    }

    pub fn add(&mut self, other: &Resources) {
        for kind in ResourceKind::ALL {
            *self.get_mut(kind) += other.get(kind);
        }
    }

    pub fn subtract(&mut self, other: &Resources) {
        for kind in ResourceKind::ALL {
            *self.get_mut(kind) -= other.get(kind);
        }
    }

    pub fn scaled(&self, factor: f64) -> Resources {
        let mut out = *self;
        for kind in ResourceKind::ALL {
            *out.get_mut(kind) *= factor;
        }
        out
    }

    /// Stocks never go negative
    pub fn clamp_non_negative(&mut self) {
        for kind in ResourceKind::ALL {
            let v = self.get_mut(kind);
            if !v.is_finite() || *v < 0.0 {
                *v = 0.0;
            }
        }
    }
}

/// Six-domain weight or affinity vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainVector {
    pub power: f64,
    pub wealth: f64,
    pub faith: f64,
    pub virtue: f64,
    pub freedom: f64,
    pub creation: f64,
}

impl DomainVector {
    pub fn uniform(value: f64) -> Self {
        Self {
            power: value,
            wealth: value,
            faith: value,
            virtue: value,
            freedom: value,
            creation: value,
        }
    }

    /// Equal weight on every domain, summing to 1.0
    pub fn balanced() -> Self {
        Self::uniform(1.0 / 6.0)
    }

    pub fn from_fn(mut f: impl FnMut(Domain) -> f64) -> Self {
        let mut v = Self::default();
        for domain in Domain::ALL {
            v.set(domain, f(domain));
        }
        v
    }

    pub fn get(&self, domain: Domain) -> f64 {
        match domain {
            Domain::Power => self.power,
            Domain::Wealth => self.wealth,
            Domain::Faith => self.faith,
            Domain::Virtue => self.virtue,
            Domain::Freedom => self.freedom,
            Domain::Creation => self.creation,
        }
    }

    pub fn get_mut(&mut self, domain: Domain) -> &mut f64 {
        match domain {
            Domain::Power => &mut self.power,
            Domain::Wealth => &mut self.wealth,
            Domain::Faith => &mut self.faith,
            Domain::Virtue => &mut self.virtue,
            Domain::Freedom => &mut self.freedom,
            Domain::Creation => &mut self.creation,
        }
    }

    pub fn set(&mut self, domain: Domain, value: f64) {
        *self.get_mut(domain) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Domain, f64)> + '_ {
        Domain::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn sum(&self) -> f64 {
        Domain::ALL.iter().map(|&d| self.get(d)).sum()
    }

    /// Rescale to sum 1.0; negative or non-finite entries count as zero.
    /// A vector with nothing left falls back to `balanced()`.
    pub fn normalized(&self) -> Self {
        let cleaned = Self::from_fn(|d| {
            let v = self.get(d);
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        });
        let total = cleaned.sum();
        if total <= f64::EPSILON {
            return Self::balanced();
        }
        Self::from_fn(|d| cleaned.get(d) / total)
    }

    /// Average of `1 - |a - b|` over all six domains, in [0, 1] for unit-range vectors
    pub fn similarity(&self, other: &DomainVector) -> f64 {
        Domain::ALL
            .iter()
            .map(|&d| 1.0 - (self.get(d) - other.get(d)).abs())
            .sum::<f64>()
            / Domain::ALL.len() as f64
    }

    pub fn dot(&self, other: &DomainVector) -> f64 {
        Domain::ALL.iter().map(|&d| self.get(d) * other.get(d)).sum()
    }

    /// Strongest domain; ties resolve to the earlier domain in `Domain::ALL`
    pub fn dominant(&self) -> Domain {
        let mut best = Domain::Power;
        for domain in Domain::ALL {
            if self.get(domain) > self.get(best) {
                best = domain;
            }
        }
        best
    }

    /// Domains sorted by weight descending, ties in declaration order
    pub fn ranked(&self) -> Vec<Domain> {
        let mut domains = Domain::ALL.to_vec();
        domains.sort_by(|a, b| {
            self.get(*b)
                .partial_cmp(&self.get(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        domains
    }
}

/// Six independent modifier scalars, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierSet {
    pub peaceful: f64,
    pub ruthless: f64,
    pub ascetic: f64,
    pub opulent: f64,
    pub secretive: f64,
    pub charismatic: f64,
}

impl ModifierSet {
    pub fn get(&self, modifier: Modifier) -> f64 {
        match modifier {
            Modifier::Peaceful => self.peaceful,
            Modifier::Ruthless => self.ruthless,
            Modifier::Ascetic => self.ascetic,
            Modifier::Opulent => self.opulent,
            Modifier::Secretive => self.secretive,
            Modifier::Charismatic => self.charismatic,
        }
    }

    pub fn get_mut(&mut self, modifier: Modifier) -> &mut f64 {
        match modifier {
            Modifier::Peaceful => &mut self.peaceful,
            Modifier::Ruthless => &mut self.ruthless,
            Modifier::Ascetic => &mut self.ascetic,
            Modifier::Opulent => &mut self.opulent,
            Modifier::Secretive => &mut self.secretive,
            Modifier::Charismatic => &mut self.charismatic,
        }
    }

    pub fn clamp(&mut self) {
        for modifier in Modifier::ALL {
            let v = self.get_mut(modifier);
            *v = clamp_unit(*v);
        }
    }
}

/// Scale preference, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleVector {
    pub local: f64,
    pub regional: f64,
    pub world: f64,
}

impl Default for ScaleVector {
    fn default() -> Self {
        Self {
            local: 1.0 / 3.0,
            regional: 1.0 / 3.0,
            world: 1.0 / 3.0,
        }
    }
}

impl ScaleVector {
    pub fn get(&self, scale: Scale) -> f64 {
        match scale {
            Scale::Local => self.local,
            Scale::Regional => self.regional,
            Scale::World => self.world,
        }
    }

    pub fn normalized(&self) -> Self {
        let parts = [self.local, self.regional, self.world]
            .map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 });
        let total: f64 = parts.iter().sum();
        if total <= f64::EPSILON {
            return Self::default();
        }
        Self {
            local: parts[0] / total,
            regional: parts[1] / total,
            world: parts[2] / total,
        }
    }
}

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Clamp to [0, 100], mapping NaN to 0
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Move `value` toward `target` by at most `step`
pub fn drift_toward(value: f64, target: f64, step: f64) -> f64 {
    if value > target {
        (value - step).max(target)
    } else if value < target {
        (value + step).min(target)
    } else {
        value
    }
}
