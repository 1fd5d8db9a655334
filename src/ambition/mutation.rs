//! Ambition mutation engine
//!
//! Executed actions nudge the profile. A static table maps action ids, or
//! keyword-matched action categories, to domain/modifier deltas; typed
//! Domain/Modifier effects carried by the proposal add on top.

use serde::{Deserialize, Serialize};

use crate::ambition::interpreter::tokenize;
use crate::ambition::profile::{AmbitionProfile, DreamMark, MutationRecord, ProfileDelta};
use crate::core::config::SimulationConfig;
use crate::core::types::{Domain, Modifier, Tick};
use crate::planner::proposal::ActionProposal;
use crate::rules::effect::Effect;

/// A domain crossed one of the dream thresholds upward
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DreamEvent {
    pub domain: Domain,
    pub threshold: f64,
    pub tick: Tick,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MutationOutcome {
    pub profile: AmbitionProfile,
    pub dreams: Vec<DreamEvent>,
}

struct MutationEntry {
    key: &'static str,
    domains: &'static [(Domain, f64)],
    modifiers: &'static [(Modifier, f64)],
    reason: &'static str,
}

/// Exact action-id matches, checked first
const BY_ACTION_ID: &[MutationEntry] = &[
    MutationEntry {
        key: "gather_gold",
        domains: &[(Domain::Wealth, 0.03)],
        modifiers: &[(Modifier::Opulent, 0.01)],
        reason: "counting coin sharpens the appetite for more",
    },
    MutationEntry {
        key: "recruit_levies",
        domains: &[(Domain::Power, 0.03)],
        modifiers: &[(Modifier::Ruthless, 0.02), (Modifier::Peaceful, -0.01)],
        reason: "armed men at your back change how you see the world",
    },
    MutationEntry {
        key: "reflect",
        domains: &[],
        modifiers: &[(Modifier::Ascetic, 0.02)],
        reason: "quiet reflection tempers desire",
    },
];

/// Keyword categories, matched against the words of the action id and label
const BY_CATEGORY: &[MutationEntry] = &[
    MutationEntry {
        key: "conquer",
        domains: &[(Domain::Power, 0.04)],
        modifiers: &[(Modifier::Ruthless, 0.03), (Modifier::Peaceful, -0.02)],
        reason: "conquest feeds the hunger for dominion",
    },
    MutationEntry {
        key: "army",
        domains: &[(Domain::Power, 0.03)],
        modifiers: &[(Modifier::Ruthless, 0.02)],
        reason: "martial preparation breeds martial ambition",
    },
    MutationEntry {
        key: "trade",
        domains: &[(Domain::Wealth, 0.04)],
        modifiers: &[(Modifier::Opulent, 0.02)],
        reason: "profitable ventures whet the merchant spirit",
    },
    MutationEntry {
        key: "tax",
        domains: &[(Domain::Wealth, 0.03), (Domain::Power, 0.01)],
        modifiers: &[(Modifier::Ruthless, 0.01)],
        reason: "the treasury swells and so does the ambition",
    },
    MutationEntry {
        key: "pray",
        domains: &[(Domain::Faith, 0.04)],
        modifiers: &[(Modifier::Ascetic, 0.02)],
        reason: "devotion deepens with practice",
    },
    MutationEntry {
        key: "temple",
        domains: &[(Domain::Faith, 0.04)],
        modifiers: &[(Modifier::Charismatic, 0.01)],
        reason: "sacred stones call for a sacred purpose",
    },
    MutationEntry {
        key: "justice",
        domains: &[(Domain::Virtue, 0.04)],
        modifiers: &[(Modifier::Peaceful, 0.02)],
        reason: "acts of justice reinforce the conviction to do right",
    },
    MutationEntry {
        key: "charity",
        domains: &[(Domain::Virtue, 0.04)],
        modifiers: &[(Modifier::Peaceful, 0.02), (Modifier::Ascetic, 0.01)],
        reason: "generosity becomes a habit",
    },
    MutationEntry {
        key: "explore",
        domains: &[(Domain::Freedom, 0.04)],
        modifiers: &[],
        reason: "the horizon keeps moving",
    },
    MutationEntry {
        key: "charter",
        domains: &[(Domain::Freedom, 0.04)],
        modifiers: &[(Modifier::Charismatic, 0.01)],
        reason: "granting liberties makes you their champion",
    },
    MutationEntry {
        key: "build",
        domains: &[(Domain::Creation, 0.04)],
        modifiers: &[],
        reason: "every finished work suggests the next",
    },
    MutationEntry {
        key: "commission",
        domains: &[(Domain::Creation, 0.04)],
        modifiers: &[(Modifier::Opulent, 0.01)],
        reason: "patronage turns into passion",
    },
    MutationEntry {
        key: "spy",
        domains: &[(Domain::Power, 0.02)],
        modifiers: &[(Modifier::Secretive, 0.05)],
        reason: "secrets are habit-forming",
    },
    MutationEntry {
        key: "feast",
        domains: &[],
        modifiers: &[(Modifier::Charismatic, 0.04), (Modifier::Opulent, 0.02)],
        reason: "the hall's applause is intoxicating",
    },
];

fn entry_delta(entry: &MutationEntry) -> ProfileDelta {
    let mut delta = ProfileDelta::default();
    for &(d, v) in entry.domains {
        *delta.domains.get_mut(d) += v;
    }
    for &(m, v) in entry.modifiers {
        *delta.modifiers.get_mut(m) += v;
    }
    delta
}

/// Table deltas for an action plus a human-readable reason
fn table_delta(action: &ActionProposal) -> (ProfileDelta, Vec<&'static str>) {
    if let Some(entry) = BY_ACTION_ID.iter().find(|e| e.key == action.id) {
        return (entry_delta(entry), vec![entry.reason]);
    }

    let mut words = tokenize(&action.id);
    words.extend(tokenize(&action.label));

    let mut delta = ProfileDelta::default();
    let mut reasons = Vec::new();
    for entry in BY_CATEGORY {
        if words.iter().any(|w| w.starts_with(entry.key)) {
            delta.merge(&entry_delta(entry));
            reasons.push(entry.reason);
        }
    }
    (delta, reasons)
}

fn effect_delta(effects: &[Effect]) -> ProfileDelta {
    let mut delta = ProfileDelta::default();
    for effect in effects {
        match effect {
            Effect::Domain { domain, delta: v } => *delta.domains.get_mut(*domain) += v,
            Effect::Modifier { modifier, delta: v } => *delta.modifiers.get_mut(*modifier) += v,
            Effect::Legitimacy { .. } | Effect::Region { .. } | Effect::Raw { .. } => {}
        }
    }
    delta
}

/// Apply the mutation for one executed action
///
/// Returns the new profile and any dream events. An action with no table
/// entry and no domain/modifier effects leaves the profile untouched.
pub fn mutate(
    profile: &AmbitionProfile,
    action: &ActionProposal,
    tick: Tick,
    config: &SimulationConfig,
) -> MutationOutcome {
    let (mut delta, mut reasons) = table_delta(action);
    let typed = effect_delta(&action.effects);
    if !typed.is_zero() {
        delta.merge(&typed);
        reasons.push("direct consequences of the deed");
    }

    if delta.is_zero() {
        return MutationOutcome {
            profile: profile.clone(),
            dreams: Vec::new(),
        };
    }

    let mut next = profile.clone();
    for d in Domain::ALL {
        *next.domains.get_mut(d) += delta.domains.get(d);
    }
    next.domains = next.domains.normalized();
    for m in Modifier::ALL {
        *next.modifiers.get_mut(m) += delta.modifiers.get(m);
    }
    next.modifiers.clamp();
    next.generation += 1;
    next.history.push(MutationRecord {
        action_id: action.id.clone(),
        tick,
        delta,
        reason: reasons.join("; "),
    });

    let mut thresholds = config.dream_thresholds.clone();
    thresholds.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut dreams = Vec::new();
    for d in Domain::ALL {
        let before = profile.weight(d);
        let after = next.weight(d);
        for &threshold in &thresholds {
            let mark = DreamMark::new(d, threshold);
            if before < threshold && after >= threshold && !next.fired_dreams.contains(&mark) {
                next.fired_dreams.insert(mark);
                dreams.push(DreamEvent {
                    domain: d,
                    threshold,
                    tick,
                });
            }
        }
    }

    if !dreams.is_empty() {
        tracing::debug!(count = dreams.len(), tick, "dream thresholds crossed");
    }

    MutationOutcome {
        profile: next,
        dreams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DomainVector, ModifierSet, ScaleVector};
    use crate::planner::proposal::ActionProposal;

    fn action(id: &str, label: &str) -> ActionProposal {
        ActionProposal::bare(id, label)
    }

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let profile = AmbitionProfile::balanced();
        let outcome = mutate(&profile, &action("zzz_unknown", "Stare at the wall"), 3, &config());
        assert_eq!(outcome.profile, profile);
        assert!(outcome.dreams.is_empty());
    }

    #[test]
    fn test_exact_id_mutation_updates_generation_and_log() {
        let profile = AmbitionProfile::balanced();
        let outcome = mutate(&profile, &action("gather_gold", "Gather gold"), 1, &config());
        let next = outcome.profile;
        assert_eq!(next.generation, 1);
        assert_eq!(next.history.len(), 1);
        assert_eq!(next.history[0].action_id, "gather_gold");
        assert_eq!(next.history[0].tick, 1);
        assert!(next.weight(Domain::Wealth) > profile.weight(Domain::Wealth));
        assert!(next.is_valid());
    }

    #[test]
    fn test_category_keyword_match() {
        let profile = AmbitionProfile::balanced();
        let outcome = mutate(&profile, &action("hold_assizes", "Dispense justice"), 1, &config());
        assert!(outcome.profile.weight(Domain::Virtue) > profile.weight(Domain::Virtue));
        assert!(outcome.profile.modifier(Modifier::Peaceful) > 0.0);
    }

    #[test]
    fn test_typed_effects_apply() {
        let profile = AmbitionProfile::balanced();
        let mut act = action("zzz", "Nothing in the table");
        act.effects.push(Effect::Domain { domain: Domain::Creation, delta: 0.1 });
        let outcome = mutate(&profile, &act, 2, &config());
        assert!(outcome.profile.weight(Domain::Creation) > profile.weight(Domain::Creation));
    }

    #[test]
    fn test_dream_fires_once_per_threshold_crossed() {
        let domains = DomainVector { power: 0.39, ..DomainVector::uniform(0.122) };
        let profile = AmbitionProfile::new(domains, ModifierSet::default(), ScaleVector::default());
        assert!(profile.weight(Domain::Power) < 0.4);

        let mut act = action("zzz", "surge");
        act.effects.push(Effect::Domain { domain: Domain::Power, delta: 3.0 });
        let outcome = mutate(&profile, &act, 4, &config());

        // Jumps past 0.4, 0.6 and 0.8 in one mutation: one dream per threshold
        let fired: Vec<f64> = outcome
            .dreams
            .iter()
            .filter(|d| d.domain == Domain::Power)
            .map(|d| d.threshold)
            .collect();
        assert_eq!(fired, vec![0.4, 0.6, 0.8]);
        assert!(outcome.dreams.iter().all(|d| d.tick == 4));
        assert!(outcome.profile.is_valid());

        // Falling back and recrossing does not fire again
        let mut down = action("zzz", "decline");
        down.effects.push(Effect::Domain { domain: Domain::Virtue, delta: 5.0 });
        let lowered = mutate(&outcome.profile, &down, 5, &config()).profile;
        assert!(lowered.weight(Domain::Power) < 0.4);
        let again = mutate(&lowered, &act, 6, &config());
        assert!(again.dreams.iter().all(|d| d.domain != Domain::Power));
    }
}
