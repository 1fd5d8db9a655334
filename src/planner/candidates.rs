//! Candidate generation tiers
//!
//! 1. rule paths for ready, unmet goal nodes
//! 2. generator rules whose conditions hold
//! 3. the fallback set

use std::collections::BTreeSet;

use crate::ambition::profile::AmbitionProfile;
use crate::core::error::SimError;
use crate::goals::graph::{GoalNode, RequirementGraph};
use crate::planner::proposal::{ActionProposal, ProposalSource};
use crate::rules::knowledge::{GeneratorRule, KnowledgeBase, RequirementRule, RulePath};
use crate::world::state::WorldState;

fn warn_unknown(err: &SimError, referrer: &str) {
    tracing::warn!(referrer, error = %err, "skipping candidate");
}

fn path_proposal(rule: &RequirementRule, path: &RulePath, node: &GoalNode) -> ActionProposal {
    ActionProposal {
        id: rule.action_id(path),
        label: path.label.clone(),
        description: path.description.clone(),
        domains: if path.domains.is_empty() {
            node.domains.clone()
        } else {
            path.domains.clone()
        },
        cost: path.cost,
        reward: path.reward,
        risks: path.risks.clone(),
        duration: path.time.clone(),
        prerequisites: path.needs.clone(),
        effects: path.effects.clone(),
        satisfies: Some(node.id.clone()),
        source: ProposalSource::Rule,
        score: 0.0,
    }
}

/// Tier 1: every path of every ready unmet node whose domains overlap the
/// node's and whose own prerequisite nodes are met. Rules are keyed by the
/// node's template; only the first ready node per template is offered.
pub fn rule_candidates(graph: &RequirementGraph, kb: &KnowledgeBase) -> Vec<ActionProposal> {
    let mut out = Vec::new();
    let mut offered = BTreeSet::new();
    for node in graph.ready_unmet() {
        if !offered.insert(node.template.as_str()) {
            continue;
        }
        let rule = match kb.requirement(&node.template) {
            Ok(rule) => rule,
            Err(e) => {
                warn_unknown(&e, &node.id);
                continue;
            }
        };
        for path in &rule.paths {
            let overlaps = path.domains.is_empty() || path.domains.iter().any(|d| node.domains.contains(d));
            let needs_met = path
                .needs
                .iter()
                .all(|id| graph.node(id).is_some_and(|n| n.is_met()));
            if overlaps && needs_met {
                out.push(path_proposal(rule, path, node));
            }
        }
    }
    out
}

fn generator_proposal(generator: &GeneratorRule, satisfies: Option<String>) -> ActionProposal {
    ActionProposal {
        id: generator.id.clone(),
        label: generator.label.clone(),
        description: generator.description.clone(),
        domains: generator.domains.clone(),
        cost: generator.cost,
        reward: generator.reward,
        risks: generator.risks.clone(),
        duration: generator.time.clone(),
        prerequisites: generator.requires.iter().cloned().collect(),
        effects: generator.effects.clone(),
        satisfies,
        source: ProposalSource::Generator,
        score: 0.0,
    }
}

/// Tier 2: generators whose conditions all hold and whose domains overlap
/// the profile's dominant domains
pub fn generator_candidates(
    world: &WorldState,
    profile: &AmbitionProfile,
    graph: &RequirementGraph,
    kb: &KnowledgeBase,
    dominant_threshold: f64,
) -> Vec<ActionProposal> {
    let dominant = profile.dominant_domains(dominant_threshold);
    let mut out = Vec::new();
    for generator in kb.generators() {
        if !generator.domains.iter().any(|d| dominant.contains(d)) {
            continue;
        }
        if !generator.when.iter().all(|c| c.holds(world, profile)) {
            continue;
        }
        let satisfies = match &generator.requires {
            None => None,
            Some(req) => {
                if let Err(e) = kb.requirement(req) {
                    warn_unknown(&e, &generator.id);
                    continue;
                }
                graph
                    .nodes()
                    .iter()
                    .find(|n| n.template == *req && !n.is_met() && graph.is_ready(n))
                    .map(|n| n.id.clone())
            }
        };
        out.push(generator_proposal(generator, satisfies));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Domain;
    use crate::goals::graph::test_node;

    const RULES: &str = r#"
        [requirements.build_shrine]
        [[requirements.build_shrine.paths]]
        name = "village_shrine"
        domains = ["faith"]
        cost = { gold = 20 }

        [[requirements.build_shrine.paths]]
        name = "market_stall"
        domains = ["wealth"]

        [requirements.consecrate_cathedral]
        [[requirements.consecrate_cathedral.paths]]
        name = "grand_rite"
        domains = ["faith"]

        [[generators]]
        id = "tithe_drive"
        domains = ["faith"]
        when = ["resource.gold < 500"]
        requires = "build_shrine"

        [[generators]]
        id = "orphan"
        domains = ["faith"]
        requires = "no_such_rule"
    "#;

    fn graph() -> RequirementGraph {
        let mut graph = RequirementGraph::new();
        graph.add_node(test_node("build_shrine", Domain::Faith, &[])).unwrap();
        graph
            .add_node(test_node("consecrate_cathedral", Domain::Faith, &["build_shrine"]))
            .unwrap();
        graph.add_node(test_node("unwritten", Domain::Faith, &[])).unwrap();
        graph
    }

    #[test]
    fn test_rule_candidates_only_for_ready_nodes_and_matching_domains() {
        let kb = KnowledgeBase::from_toml_str(RULES).unwrap();
        let ids: Vec<String> = rule_candidates(&graph(), &kb).into_iter().map(|p| p.id).collect();
        // market_stall has no domain overlap; cathedral is blocked; unwritten has no rule
        assert_eq!(ids, vec!["build_shrine.village_shrine".to_string()]);
    }

    #[test]
    fn test_rule_candidates_unlock_after_prerequisite_met() {
        let kb = KnowledgeBase::from_toml_str(RULES).unwrap();
        let mut graph = graph();
        graph.mark_met("build_shrine").unwrap();
        let proposals = rule_candidates(&graph, &kb);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].satisfies.as_deref(), Some("consecrate_cathedral"));
    }

    #[test]
    fn test_renewed_dream_goal_is_plannable() {
        let kb = KnowledgeBase::from_toml_str(
            r#"
            [requirements.fill_treasury]
            [[requirements.fill_treasury.paths]]
            name = "levy_tolls"
            domains = ["wealth"]
            "#,
        )
        .unwrap();
        let mut graph = RequirementGraph::new();
        let mut rng = crate::core::rng::SeededRng::new(4);
        for _ in 0..6 {
            crate::goals::append_dream_node(&mut graph, Domain::Wealth, 0.4, 1, &mut rng);
        }
        for id in ["fill_treasury", "open_trade_routes", "found_merchant_guild", "command_markets"] {
            graph.mark_met(id).unwrap();
        }

        let proposals = rule_candidates(&graph, &kb);
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].id, "fill_treasury.levy_tolls");
        assert_eq!(proposals[0].satisfies.as_deref(), Some("fill_treasury_2"));

        graph.mark_met("fill_treasury_2").unwrap();
        let proposals = rule_candidates(&graph, &kb);
        assert_eq!(proposals[0].satisfies.as_deref(), Some("fill_treasury_3"));
    }

    #[test]
    fn test_generator_candidates_respect_conditions_and_references() {
        let kb = KnowledgeBase::from_toml_str(RULES).unwrap();
        let world = WorldState::empty(0);
        let faithful = AmbitionProfile::new(
            crate::core::types::DomainVector { faith: 1.0, ..Default::default() },
            Default::default(),
            Default::default(),
        );
        let out = generator_candidates(&world, &faithful, &graph(), &kb, 0.2);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "tithe_drive");
        assert_eq!(out[0].satisfies.as_deref(), Some("build_shrine"));

        let worldly = AmbitionProfile::new(
            crate::core::types::DomainVector { wealth: 1.0, ..Default::default() },
            Default::default(),
            Default::default(),
        );
        assert!(generator_candidates(&world, &worldly, &graph(), &kb, 0.2).is_empty());
    }
}
