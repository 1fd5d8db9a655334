//! The shipped rule base loads cleanly and drives the planner

use std::sync::Arc;

use ambition_realm::goals::TEMPLATES;
use ambition_realm::planner::ProposalSource;
use ambition_realm::rules::{Condition, Effect, KnowledgeBase};
use ambition_realm::session::GameSession;
use ambition_realm::SimulationConfig;

fn rule_base() -> KnowledgeBase {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/rules.toml");
    KnowledgeBase::load(path.as_ref()).unwrap()
}

#[test]
fn test_every_goal_template_has_paths() {
    let kb = rule_base();
    for template in TEMPLATES {
        let rule = kb.requirement(template.id).unwrap();
        assert!(!rule.paths.is_empty(), "{} has no paths", template.id);
    }
}

#[test]
fn test_effects_and_conditions_are_typed() {
    let kb = rule_base();
    for rule in kb.requirements() {
        for path in &rule.paths {
            assert!(
                path.effects.iter().all(|e| !e.is_raw()),
                "{} carries untyped effects",
                rule.action_id(path)
            );
        }
    }

    let relief = kb.generators().iter().find(|g| g.id == "famine_relief").unwrap();
    assert_eq!(relief.requires.as_deref(), Some("relieve_the_poor"));
    assert!(matches!(relief.when[0], Condition::HasTrait(ref t) if t == "scarcity"));
    assert!(relief.effects.iter().any(|e| matches!(e, Effect::Region { .. })));
}

#[test]
fn test_first_proposals_come_from_goal_paths() {
    let session = GameSession::start(
        "I wish to be a just king who rules with wisdom",
        Some(12345),
        Arc::new(rule_base()),
        SimulationConfig::default(),
    );
    assert!(session.proposals().iter().any(|p| p.source == ProposalSource::Rule));
    assert!(session.proposals().len() <= SimulationConfig::default().max_proposals);
}

#[test]
fn test_auto_play_runs_clean() {
    let mut session = GameSession::start("I want riches and a palace", Some(2024), Arc::new(rule_base()), SimulationConfig::default());
    for _ in 0..12 {
        assert!(!session.proposals().is_empty());
        let choice = session.proposals()[0].id.clone();
        session.advance(Some(&choice)).unwrap();
    }
    assert_eq!(session.tick(), 12);
    assert!(session.profile().is_valid());
    assert_eq!(session.profile().history.len() as u32, session.profile().generation);
}
