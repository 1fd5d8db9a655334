//! Proposal scoring
//!
//! score = alignment * 10 + modifier fit * 5 + 15 (completes a goal)
//!       + total risk * risk tolerance * 5 + scale fit * 3

use crate::ambition::interpreter::tokenize;
use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::types::{Modifier, Scale};
use crate::planner::proposal::ActionProposal;
use crate::rules::risk::total_risk;

const MODIFIER_KEYWORDS: &[(Modifier, &[&str])] = &[
    (Modifier::Peaceful, &[
        "peace", "negotiat", "treaty", "charity", "relief", "relieve", "mercy", "festival",
        "envoy", "diplomac", "alms", "pardon",
    ]),
    (Modifier::Ruthless, &[
        "conquer", "raid", "purge", "execut", "crush", "seize", "levy", "levies", "army",
        "subdue", "punish", "war", "force",
    ]),
    (Modifier::Secretive, &[
        "spy", "spies", "whisper", "bribe", "intrigue", "secret", "agent", "informant",
        "smuggl", "cabal",
    ]),
    (Modifier::Opulent, &[
        "feast", "palace", "luxur", "banquet", "jewel", "gild", "gold", "silk", "grand",
        "monument",
    ]),
];

const SCALE_KEYWORDS: &[(Scale, &[&str])] = &[
    (Scale::Local, &[
        "village", "town", "local", "shrine", "home", "hall", "court", "stall", "parish",
    ]),
    (Scale::Regional, &[
        "region", "province", "realm", "guild", "route", "levies", "march", "circuit",
        "border",
    ]),
    (Scale::World, &[
        "empire", "world", "crusade", "mandate", "markets", "frontier", "continent",
        "nations", "eternal",
    ]),
];

fn mentions(words: &[String], keys: &[&str]) -> bool {
    words.iter().any(|w| keys.iter().any(|k| w.starts_with(k)))
}

/// Mean profile weight over the action's domains, in [0, 1]
pub fn alignment(action: &ActionProposal, profile: &AmbitionProfile) -> f64 {
    if action.domains.is_empty() {
        return 0.0;
    }
    action.domains.iter().map(|&d| profile.weight(d)).sum::<f64>() / action.domains.len() as f64
}

/// Sum of the profile's modifier strength over axes the action's wording hits
pub fn modifier_fit(words: &[String], profile: &AmbitionProfile) -> f64 {
    MODIFIER_KEYWORDS
        .iter()
        .filter(|(_, keys)| mentions(words, keys))
        .map(|(m, _)| profile.modifier(*m))
        .sum()
}

/// Sum of the profile's scale preference over the framings the wording hits
pub fn scale_fit(words: &[String], profile: &AmbitionProfile) -> f64 {
    SCALE_KEYWORDS
        .iter()
        .filter(|(_, keys)| mentions(words, keys))
        .map(|(s, _)| profile.scale.get(*s))
        .sum()
}

/// Score an affordable candidate
pub fn score(action: &ActionProposal, profile: &AmbitionProfile, config: &SimulationConfig) -> f64 {
    let words = tokenize(&action.keyword_text());
    let node_bonus = if action.satisfies.is_some() { config.node_bonus } else { 0.0 };

    alignment(action, profile) * config.alignment_weight
        + modifier_fit(&words, profile) * config.modifier_weight
        + node_bonus
        + total_risk(&action.risks) * profile.risk_tolerance() * config.risk_weight
        + scale_fit(&words, profile) * config.scale_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Domain, DomainVector, ModifierSet, ScaleVector};
    use crate::rules::risk::{Risk, RiskKind};

    fn profile(domains: DomainVector, modifiers: ModifierSet) -> AmbitionProfile {
        AmbitionProfile::new(domains, modifiers, ScaleVector::default())
    }

    #[test]
    fn test_alignment_prefers_matching_domain() {
        let p = profile(DomainVector { virtue: 0.8, power: 0.2, ..Default::default() }, ModifierSet::default());
        let mut just = ActionProposal::bare("a", "a");
        just.domains = vec![Domain::Virtue];
        let mut greedy = ActionProposal::bare("b", "b");
        greedy.domains = vec![Domain::Wealth];
        let config = SimulationConfig::default();
        assert!(score(&just, &p, &config) > score(&greedy, &p, &config));
        assert!((alignment(&just, &p) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_node_bonus_applies() {
        let p = AmbitionProfile::balanced();
        let config = SimulationConfig::default();
        let plain = ActionProposal::bare("plain", "plain");
        let mut goal = plain.clone();
        goal.satisfies = Some("build_shrine".into());
        assert!((score(&goal, &p, &config) - score(&plain, &p, &config) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_risk_rewards_ruthless_and_punishes_peaceful() {
        let config = SimulationConfig::default();
        let mut risky = ActionProposal::bare("gamble", "gamble");
        risky.risks = vec![Risk::new(RiskKind::Failure, 0.5)];
        let ruthless = profile(DomainVector::balanced(), ModifierSet { ruthless: 1.0, ..Default::default() });
        let peaceful = profile(DomainVector::balanced(), ModifierSet { peaceful: 1.0, ..Default::default() });
        assert!(score(&risky, &ruthless, &config) > 0.0);
        assert!(score(&risky, &peaceful, &config) < 0.0);
    }

    #[test]
    fn test_modifier_keywords() {
        let secretive = profile(DomainVector::balanced(), ModifierSet { secretive: 0.8, ..Default::default() });
        let words = tokenize("Plant spies in the guild");
        assert!((modifier_fit(&words, &secretive) - 0.8).abs() < 1e-9);
        assert!(scale_fit(&words, &secretive) > 0.0);
    }
}
