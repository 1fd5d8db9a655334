//! AmbitionProfile - the player's continuous intent vector

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{Domain, DomainVector, Modifier, ModifierSet, ScaleVector, Tick};

/// Six normalized domain weights, six modifier scalars and a scale preference
///
/// Replaced wholesale on every mutation; callers never edit it in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbitionProfile {
    pub domains: DomainVector,
    pub modifiers: ModifierSet,
    pub scale: ScaleVector,
    /// Incremented once per applied mutation
    pub generation: u32,
    /// Append-only mutation log
    pub history: Vec<MutationRecord>,
    /// Dream thresholds already fired, so each fires once per session
    pub fired_dreams: BTreeSet<DreamMark>,
}

/// Per-field change applied by one mutation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDelta {
    pub domains: DomainVector,
    pub modifiers: ModifierSet,
}

impl ProfileDelta {
    pub fn is_zero(&self) -> bool {
        Domain::ALL.iter().all(|&d| self.domains.get(d) == 0.0)
            && Modifier::ALL.iter().all(|&m| self.modifiers.get(m) == 0.0)
    }

    pub fn merge(&mut self, other: &ProfileDelta) {
        for d in Domain::ALL {
            *self.domains.get_mut(d) += other.domains.get(d);
        }
        for m in Modifier::ALL {
            *self.modifiers.get_mut(m) += other.modifiers.get(m);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub action_id: String,
    pub tick: Tick,
    pub delta: ProfileDelta,
    pub reason: String,
}

/// A (domain, threshold) pair that has already produced a dream
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DreamMark {
    pub domain: Domain,
    /// Threshold in thousandths, so the mark stays hashable and ordered
    pub threshold_permille: u32,
}

impl DreamMark {
    pub fn new(domain: Domain, threshold: f64) -> Self {
        Self {
            domain,
            threshold_permille: (threshold * 1000.0).round() as u32,
        }
    }
}

impl Default for AmbitionProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

impl AmbitionProfile {
    /// Equal domain weights, no modifiers, even scale preference
    pub fn balanced() -> Self {
        Self::new(DomainVector::balanced(), ModifierSet::default(), ScaleVector::default())
    }

    /// Build a profile, normalizing domains and scale and clamping modifiers
    pub fn new(domains: DomainVector, mut modifiers: ModifierSet, scale: ScaleVector) -> Self {
        modifiers.clamp();
        Self {
            domains: domains.normalized(),
            modifiers,
            scale: scale.normalized(),
            generation: 0,
            history: Vec::new(),
            fired_dreams: BTreeSet::new(),
        }
    }

    pub fn weight(&self, domain: Domain) -> f64 {
        self.domains.get(domain)
    }

    pub fn modifier(&self, modifier: Modifier) -> f64 {
        self.modifiers.get(modifier)
    }

    pub fn dominant(&self) -> Domain {
        self.domains.dominant()
    }

    /// Domains whose weight is at least `threshold`, strongest first
    pub fn dominant_domains(&self, threshold: f64) -> Vec<Domain> {
        self.domains
            .ranked()
            .into_iter()
            .filter(|&d| self.weight(d) >= threshold)
            .collect()
    }

    /// Risk appetite in [-1, 1]: positive for ruthless, negative for peaceful
    pub fn risk_tolerance(&self) -> f64 {
        self.modifiers.ruthless - self.modifiers.peaceful
    }

    /// Domain weights sum to 1 and every scalar is in range
    pub fn is_valid(&self) -> bool {
        let domains_ok = (self.domains.sum() - 1.0).abs() < 1e-6
            && Domain::ALL.iter().all(|&d| self.weight(d) >= 0.0);
        let modifiers_ok = Modifier::ALL
            .iter()
            .all(|&m| (0.0..=1.0).contains(&self.modifier(m)));
        let scale_sum = self.scale.local + self.scale.regional + self.scale.world;
        domains_ok && modifiers_ok && (scale_sum - 1.0).abs() < 1e-6
    }
}
