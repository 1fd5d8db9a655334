//! Hard-coded fallback actions; none of them cost anything

use crate::core::types::{Domain, Resources};
use crate::planner::proposal::{ActionProposal, ProposalSource};
use crate::rules::risk::{Risk, RiskKind};

pub const GATHER_GOLD: &str = "gather_gold";
pub const RECRUIT_LEVIES: &str = "recruit_levies";
pub const REFLECT: &str = "reflect";

pub fn fallback_actions() -> Vec<ActionProposal> {
    vec![
        ActionProposal {
            description: "Send collectors through the home villages".into(),
            domains: vec![Domain::Wealth],
            reward: Resources { gold: 25.0, ..Default::default() },
            source: ProposalSource::Fallback,
            ..ActionProposal::bare(GATHER_GOLD, "Gather gold")
        },
        ActionProposal {
            description: "Call able-bodied folk to arms".into(),
            domains: vec![Domain::Power],
            reward: Resources { manpower: 15.0, ..Default::default() },
            risks: vec![Risk::new(RiskKind::Unrest, 0.05)],
            source: ProposalSource::Fallback,
            ..ActionProposal::bare(RECRUIT_LEVIES, "Recruit levies")
        },
        ActionProposal {
            description: "Spend the season in quiet reflection".into(),
            source: ProposalSource::Fallback,
            ..ActionProposal::bare(REFLECT, "Reflect")
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_free() {
        let actions = fallback_actions();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().all(|a| a.cost.is_zero()));
        assert_eq!(actions[0].id, GATHER_GOLD);
    }
}
