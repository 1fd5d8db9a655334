//! Dynamic planner: ranked, domain-diversified action proposals

pub mod candidates;
pub mod fallback;
pub mod proposal;
pub mod scoring;

use std::cmp::Reverse;
use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::Domain;
use crate::goals::graph::RequirementGraph;
use crate::rules::knowledge::KnowledgeBase;
use crate::world::state::WorldState;

pub use fallback::fallback_actions;
pub use proposal::{ActionProposal, ProposalSource};

/// Produce up to `config.max_proposals` proposals, best first.
///
/// Candidate tiers are tried in order until one yields an affordable
/// candidate. Unaffordable candidates are dropped before scoring.
pub fn plan(
    graph: &RequirementGraph,
    world: &WorldState,
    profile: &AmbitionProfile,
    kb: &KnowledgeBase,
    config: &SimulationConfig,
) -> Vec<ActionProposal> {
    let affordable = |candidates: Vec<ActionProposal>| -> Vec<ActionProposal> {
        candidates
            .into_iter()
            .filter(|c| world.resources.can_afford(&c.cost))
            .collect()
    };

    let mut pool = affordable(candidates::rule_candidates(graph, kb));
    if pool.is_empty() {
        pool = affordable(candidates::generator_candidates(
            world,
            profile,
            graph,
            kb,
            config.dominant_domain_threshold,
        ));
    }
    if pool.is_empty() {
        pool = affordable(fallback_actions());
    }

    for candidate in &mut pool {
        candidate.score = scoring::score(candidate, profile, config);
    }
    rank(&mut pool);
    pool.dedup_by(|a, b| a.id == b.id);

    let proposals = diversify(pool, config.max_proposals);
    tracing::debug!(
        tick = world.tick,
        count = proposals.len(),
        top = proposals.first().map(|p| p.id.as_str()).unwrap_or("-"),
        "proposals generated"
    );
    proposals
}

/// Score descending, ties by id
fn rank(proposals: &mut [ActionProposal]) {
    proposals.sort_by(|a, b| {
        Reverse(OrderedFloat(a.score))
            .cmp(&Reverse(OrderedFloat(b.score)))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Take the best candidate for each domain not yet covered, then fill the
/// remaining slots by raw score. Input must already be ranked.
fn diversify(ranked: Vec<ActionProposal>, limit: usize) -> Vec<ActionProposal> {
    let mut covered: BTreeSet<Domain> = BTreeSet::new();
    let mut picked = vec![false; ranked.len()];
    let mut count = 0;

    for (i, candidate) in ranked.iter().enumerate() {
        if count >= limit {
            break;
        }
        if candidate.domains.iter().any(|d| !covered.contains(d)) {
            covered.extend(candidate.domains.iter().copied());
            picked[i] = true;
            count += 1;
        }
    }
    for flag in picked.iter_mut() {
        if count >= limit {
            break;
        }
        if !*flag {
            *flag = true;
            count += 1;
        }
    }

    let mut out: Vec<ActionProposal> = ranked
        .into_iter()
        .zip(picked)
        .filter_map(|(p, keep)| keep.then_some(p))
        .collect();
    rank(&mut out);
    out
}

/// Look up a proposal by id
pub fn find_proposal<'a>(proposals: &'a [ActionProposal], id: &str) -> Result<&'a ActionProposal> {
    proposals
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| SimError::InvalidArgument(format!("no proposal with id '{}'", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DomainVector, Resources};
    use crate::goals::graph::test_node;

    fn candidate(id: &str, domain: Domain, score: f64) -> ActionProposal {
        let mut p = ActionProposal::bare(id, id);
        p.domains = vec![domain];
        p.score = score;
        p
    }

    #[test]
    fn test_empty_rule_base_falls_back() {
        let config = SimulationConfig::default();
        let world = WorldState::empty(0);
        let graph = RequirementGraph::new();
        let proposals = plan(&graph, &world, &AmbitionProfile::balanced(), &KnowledgeBase::default(), &config);
        let ids: Vec<&str> = proposals.iter().map(|p| p.id.as_str()).collect();
        assert!(ids.contains(&fallback::GATHER_GOLD));
        assert_eq!(proposals.len(), 3);
    }

    #[test]
    fn test_unaffordable_rules_drop_to_next_tier() {
        let config = SimulationConfig::default();
        let kb = KnowledgeBase::from_toml_str(
            r#"
            [requirements.fill_treasury]
            [[requirements.fill_treasury.paths]]
            name = "royal_mint"
            domains = ["wealth"]
            cost = { gold = 1000 }
            "#,
        )
        .unwrap();
        let mut graph = RequirementGraph::new();
        graph.add_node(test_node("fill_treasury", Domain::Wealth, &[])).unwrap();
        let mut world = WorldState::empty(0);
        world.resources = Resources { gold: 10.0, ..Default::default() };

        let proposals = plan(&graph, &world, &AmbitionProfile::balanced(), &kb, &config);
        assert!(proposals.iter().all(|p| p.source == ProposalSource::Fallback));

        world.resources.gold = 2000.0;
        let proposals = plan(&graph, &world, &AmbitionProfile::balanced(), &kb, &config);
        assert_eq!(proposals[0].id, "fill_treasury.royal_mint");
    }

    #[test]
    fn test_diversity_keeps_other_domains() {
        let ranked = vec![
            candidate("p1", Domain::Power, 30.0),
            candidate("p2", Domain::Power, 29.0),
            candidate("p3", Domain::Power, 28.0),
            candidate("p4", Domain::Power, 27.0),
            candidate("p5", Domain::Power, 26.0),
            candidate("w1", Domain::Wealth, 5.0),
            candidate("f1", Domain::Faith, 4.0),
        ];
        let out = diversify(ranked, 5);
        let ids: Vec<&str> = out.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "w1", "f1"]);
    }

    #[test]
    fn test_planning_is_repeatable() {
        let config = SimulationConfig::default();
        let profile = AmbitionProfile::new(
            DomainVector { virtue: 0.6, power: 0.4, ..Default::default() },
            Default::default(),
            Default::default(),
        );
        let world = WorldState::empty(5);
        let graph = RequirementGraph::new();
        let kb = KnowledgeBase::default();
        assert_eq!(
            plan(&graph, &world, &profile, &kb, &config),
            plan(&graph, &world, &profile, &kb, &config)
        );
    }

    #[test]
    fn test_find_proposal_unknown_id() {
        let proposals = fallback_actions();
        assert!(find_proposal(&proposals, "reflect").is_ok());
        assert!(matches!(find_proposal(&proposals, "nope"), Err(SimError::InvalidArgument(_))));
    }
}
