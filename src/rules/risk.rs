//! Probabilistic risk tables attached to actions

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::clamp_unit;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskKind {
    /// Rewards are withheld
    Failure,
    /// Realm unrest rises
    Unrest,
    /// Lineage legitimacy falls
    Scandal,
    /// A tenth of manpower is lost
    Casualties,
    /// Heresy rises in controlled regions
    Heresy,
    /// Unrecognized key, logged when it fires
    Other(String),
}

impl RiskKind {
    pub fn parse(key: &str) -> RiskKind {
        match key {
            "failure" => RiskKind::Failure,
            "unrest" => RiskKind::Unrest,
            "scandal" => RiskKind::Scandal,
            "casualties" => RiskKind::Casualties,
            "heresy" => RiskKind::Heresy,
            other => RiskKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskKind::Failure => write!(f, "failure"),
            RiskKind::Unrest => write!(f, "unrest"),
            RiskKind::Scandal => write!(f, "scandal"),
            RiskKind::Casualties => write!(f, "casualties"),
            RiskKind::Heresy => write!(f, "heresy"),
            RiskKind::Other(key) => write!(f, "{}", key),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub kind: RiskKind,
    /// Probability in [0, 1]
    pub chance: f64,
}

impl Risk {
    pub fn new(kind: RiskKind, chance: f64) -> Self {
        Self {
            kind,
            chance: clamp_unit(chance),
        }
    }
}

/// Build a risk list from an authored key -> chance table, in key order
pub fn risk_table(raw: &BTreeMap<String, f64>) -> Vec<Risk> {
    raw.iter()
        .map(|(key, &chance)| Risk::new(RiskKind::parse(key), chance))
        .collect()
}

/// Expected harm in [0, 1]: chance of any risk firing, assuming independence
pub fn total_risk(risks: &[Risk]) -> f64 {
    1.0 - risks.iter().map(|r| 1.0 - r.chance).product::<f64>()
}
