//! Faction - a rival power in the world
//!
//! Only world truth lives here. What a faction wants (its ambition, cooldown
//! and last action) is kept in `factions::FactionRoster`, keyed by id.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{clamp_percent, DomainVector, FactionId, RegionId};

/// Diplomatic stance toward the player
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    Allied,
    Neutral,
    Hostile,
    War,
    Trade,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Allied => "allied",
            Stance::Neutral => "neutral",
            Stance::Hostile => "hostile",
            Stance::War => "war",
            Stance::Trade => "trade",
        }
    }

    pub fn is_friendly(&self) -> bool {
        matches!(self, Stance::Allied | Stance::Trade)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub stance: Stance,
    /// 0 to 100
    pub power: f64,
    pub regions: BTreeSet<RegionId>,
    pub affinity: DomainVector,
}

impl Faction {
    pub fn clamp(&mut self) {
        self.power = clamp_percent(self.power);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_power() {
        let mut faction = Faction {
            id: FactionId(1),
            name: "Test".into(),
            stance: Stance::Neutral,
            power: 140.0,
            regions: BTreeSet::new(),
            affinity: DomainVector::uniform(0.5),
        };
        faction.clamp();
        assert_eq!(faction.power, 100.0);
    }

    #[test]
    fn test_friendly_stances() {
        assert!(Stance::Allied.is_friendly());
        assert!(Stance::Trade.is_friendly());
        assert!(!Stance::War.is_friendly());
    }
}
