//! ActionProposal - a candidate action offered to the player

use serde::{Deserialize, Serialize};

use crate::core::types::{Domain, Resources};
use crate::rules::effect::Effect;
use crate::rules::risk::Risk;

/// Which candidate tier produced a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalSource {
    Rule,
    Generator,
    Fallback,
    /// A resolved event-card choice
    Event,
}

/// A pure value, regenerated every tick
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionProposal {
    pub id: String,
    pub label: String,
    pub description: String,
    pub domains: Vec<Domain>,
    pub cost: Resources,
    pub reward: Resources,
    pub risks: Vec<Risk>,
    /// Duration label, e.g. "1 season"
    pub duration: String,
    pub prerequisites: Vec<String>,
    pub effects: Vec<Effect>,
    /// Goal node this action completes, if any
    pub satisfies: Option<String>,
    pub source: ProposalSource,
    pub score: f64,
}

impl ActionProposal {
    /// A costless, effectless proposal
    pub fn bare(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: label.to_string(),
            domains: Vec::new(),
            cost: Resources::default(),
            reward: Resources::default(),
            risks: Vec::new(),
            duration: "1 turn".to_string(),
            prerequisites: Vec::new(),
            effects: Vec::new(),
            satisfies: None,
            source: ProposalSource::Fallback,
            score: 0.0,
        }
    }

    pub fn has_domain(&self, domain: Domain) -> bool {
        self.domains.contains(&domain)
    }

    /// Words used for keyword scoring: id, label and description
    pub fn keyword_text(&self) -> String {
        format!("{} {} {}", self.id, self.label, self.description)
    }
}
