//! Intent interpreter: free text -> AmbitionProfile
//!
//! Weighted keyword and phrase scoring only. Text is tokenized into words and
//! every 2-3 word window; each hit adds to a domain, modifier or scale
//! accumulator. Pure function of the text and config, no randomness.

use std::sync::OnceLock;

use ahash::AHashMap;

use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::types::{Domain, DomainVector, Modifier, ModifierSet, Scale, ScaleVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Domain(Domain),
    Modifier(Modifier),
    Scale(Scale),
}

const DOMAIN_WORDS: &[(Domain, &[&str])] = &[
    (Domain::Power, &[
        "power", "powerful", "rule", "rules", "ruler", "ruling", "king", "kings", "queen",
        "emperor", "empress", "empire", "throne", "crown", "conquer", "conquest", "command",
        "dominate", "dominion", "army", "armies", "lord", "control", "reign", "sovereign",
        "might", "mighty", "general", "warlord", "authority",
    ]),
    (Domain::Wealth, &[
        "wealth", "wealthy", "rich", "riches", "gold", "money", "trade", "trader", "merchant",
        "merchants", "fortune", "prosper", "prosperity", "profit", "coin", "treasure",
        "market", "markets", "commerce", "bank", "banker",
    ]),
    (Domain::Faith, &[
        "faith", "god", "gods", "divine", "holy", "sacred", "pray", "prayer", "temple",
        "temples", "church", "priest", "priestess", "prophet", "heaven", "spirit",
        "spiritual", "worship", "pious", "saint", "blessed", "religion",
    ]),
    (Domain::Virtue, &[
        "just", "justice", "fair", "fairness", "wise", "wisdom", "honor", "honour",
        "honorable", "good", "kind", "kindness", "virtue", "virtuous", "mercy", "merciful",
        "noble", "protect", "righteous", "law", "laws", "lawful", "compassion", "truth",
        "honest",
    ]),
    (Domain::Freedom, &[
        "free", "freedom", "liberty", "liberate", "independent", "independence", "explore",
        "explorer", "adventure", "wander", "escape", "rebel", "rebellion", "revolution",
        "travel", "voyage", "frontier", "wild",
    ]),
    (Domain::Creation, &[
        "create", "creation", "build", "builder", "art", "artist", "craft", "craftsman",
        "invent", "inventor", "design", "beauty", "beautiful", "music", "poet", "poetry",
        "write", "writer", "forge", "architect", "knowledge", "library", "science",
        "discover",
    ]),
];

const DOMAIN_PHRASES: &[(Domain, &[&str])] = &[
    (Domain::Power, &["seize power", "rule over", "take the throne", "bend the knee"]),
    (Domain::Wealth, &["get rich", "make money", "great fortune", "trade empire"]),
    (Domain::Faith, &["serve god", "holy war", "spread the faith", "chosen one"]),
    (Domain::Virtue, &["do good", "help people", "protect the weak", "justice for all"]),
    (Domain::Freedom, &["break free", "set free", "free the people", "no master"]),
    (Domain::Creation, &["build something", "work of art", "leave a legacy", "great works"]),
];

const MODIFIER_WORDS: &[(Modifier, &[&str])] = &[
    (Modifier::Peaceful, &[
        "peace", "peaceful", "gentle", "harmony", "diplomacy", "diplomatic", "calm", "mercy",
        "merciful", "kind", "kindness", "compassion",
    ]),
    (Modifier::Ruthless, &[
        "ruthless", "crush", "destroy", "fear", "feared", "blood", "cruel", "conquer",
        "conquest", "dominate", "slaughter", "vengeance",
    ]),
    (Modifier::Ascetic, &[
        "humble", "simple", "modest", "ascetic", "poverty", "austere", "sacrifice",
        "discipline",
    ]),
    (Modifier::Opulent, &[
        "luxury", "lavish", "opulent", "palace", "palaces", "splendor", "feast", "feasts",
        "jewels", "riches",
    ]),
    (Modifier::Secretive, &[
        "secret", "secrets", "shadow", "shadows", "hidden", "spy", "spies", "whisper",
        "whispers", "intrigue", "cunning", "mysterious",
    ]),
    (Modifier::Charismatic, &[
        "beloved", "inspire", "inspiring", "charming", "charisma", "famous", "fame", "adored",
        "loved", "admired", "speech", "voice",
    ]),
];

const MODIFIER_PHRASES: &[(Modifier, &[&str])] = &[
    (Modifier::Ruthless, &["iron fist", "by any means"]),
    (Modifier::Secretive, &["in secret", "from the shadows"]),
    (Modifier::Charismatic, &["loved by all"]),
    (Modifier::Peaceful, &["without bloodshed"]),
];

const SCALE_WORDS: &[(Scale, &[&str])] = &[
    (Scale::Local, &[
        "village", "town", "home", "family", "local", "neighbors", "community", "farm", "city",
    ]),
    (Scale::Regional, &[
        "kingdom", "realm", "province", "region", "country", "nation", "land", "king", "queen",
        "throne", "lord",
    ]),
    (Scale::World, &[
        "world", "empire", "emperor", "continent", "everyone", "all", "globe", "universe",
        "seas", "nations",
    ]),
];

struct KeywordIndex {
    words: AHashMap<&'static str, Vec<Target>>,
    phrases: AHashMap<&'static str, Vec<Target>>,
}

fn index() -> &'static KeywordIndex {
    static INDEX: OnceLock<KeywordIndex> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut words: AHashMap<&'static str, Vec<Target>> = AHashMap::new();
        let mut phrases: AHashMap<&'static str, Vec<Target>> = AHashMap::new();

        for (domain, list) in DOMAIN_WORDS {
            for w in *list {
                words.entry(*w).or_default().push(Target::Domain(*domain));
            }
        }
        for (modifier, list) in MODIFIER_WORDS {
            for w in *list {
                words.entry(*w).or_default().push(Target::Modifier(*modifier));
            }
        }
        for (scale, list) in SCALE_WORDS {
            for w in *list {
                words.entry(*w).or_default().push(Target::Scale(*scale));
            }
        }
        for (domain, list) in DOMAIN_PHRASES {
            for p in *list {
                phrases.entry(*p).or_default().push(Target::Domain(*domain));
            }
        }
        for (modifier, list) in MODIFIER_PHRASES {
            for p in *list {
                phrases.entry(*p).or_default().push(Target::Modifier(*modifier));
            }
        }

        KeywordIndex { words, phrases }
    })
}

/// Lowercased alphanumeric words
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Every contiguous 2- and 3-word window, space-joined
fn phrases(words: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for len in 2..=3 {
        for window in words.windows(len) {
            out.push(window.join(" "));
        }
    }
    out
}

#[derive(Default)]
struct Accumulators {
    domains: DomainVector,
    modifiers: ModifierSet,
    scale: [f64; 3],
}

impl Accumulators {
    fn hit(&mut self, target: Target, weight: f64, modifier_weight: f64) {
        match target {
            Target::Domain(d) => *self.domains.get_mut(d) += weight,
            Target::Modifier(m) => *self.modifiers.get_mut(m) += modifier_weight,
            Target::Scale(s) => {
                let idx = Scale::ALL.iter().position(|x| *x == s).unwrap_or(0);
                self.scale[idx] += weight;
            }
        }
    }
}

/// Interpret an ambition statement into a normalized profile
///
/// Text with no domain keyword at all yields balanced domain weights.
pub fn interpret(text: &str, config: &SimulationConfig) -> AmbitionProfile {
    let index = index();
    let words = tokenize(text);
    let mut acc = Accumulators::default();

    for word in &words {
        if let Some(targets) = index.words.get(word.as_str()) {
            for &t in targets {
                acc.hit(t, config.word_hit_weight, config.modifier_hit_weight);
            }
        }
    }
    for phrase in phrases(&words) {
        if let Some(targets) = index.phrases.get(phrase.as_str()) {
            for &t in targets {
                acc.hit(t, config.phrase_hit_weight, config.modifier_hit_weight * 2.0);
            }
        }
    }

    let scale = ScaleVector {
        local: acc.scale[0],
        regional: acc.scale[1],
        world: acc.scale[2],
    };

    let profile = AmbitionProfile::new(acc.domains, acc.modifiers, scale);
    tracing::debug!(
        dominant = %profile.dominant(),
        words = words.len(),
        "interpreted ambition"
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_tokenize_strips_punctuation() {
        assert_eq!(tokenize("A King's, Crown!"), vec!["a", "king", "s", "crown"]);
    }

    #[test]
    fn test_empty_text_is_balanced() {
        let profile = interpret("", &config());
        assert!(profile.is_valid());
        for d in Domain::ALL {
            assert!((profile.weight(d) - 1.0 / 6.0).abs() < 1e-9);
        }
        for m in Modifier::ALL {
            assert_eq!(profile.modifier(m), 0.0);
        }
    }

    #[test]
    fn test_nonsense_text_is_balanced() {
        let profile = interpret("qwzx plorp blarg 12345", &config());
        assert!(profile.is_valid());
        assert_eq!(profile.domains, DomainVector::balanced());
    }

    #[test]
    fn test_just_king() {
        let profile = interpret("I wish to be a just king who rules with wisdom", &config());
        assert!(profile.weight(Domain::Virtue) >= 0.3);
        assert!(profile.weight(Domain::Power) >= 0.2);
        assert!(profile.is_valid());
    }

    #[test]
    fn test_single_domain_dominance_still_valid() {
        let profile = interpret("gold gold gold riches wealth money trade profit", &config());
        assert!(profile.is_valid());
        assert!((profile.weight(Domain::Wealth) - 1.0).abs() < 1e-9);
        assert!(profile.modifier(Modifier::Opulent) > 0.0);
    }

    #[test]
    fn test_phrase_counts_double() {
        let profile = interpret("I will break free", &config());
        // "free" (1.0) + "break free" (2.0), all freedom
        assert!((profile.weight(Domain::Freedom) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_modifiers_clamp_to_one() {
        let profile = interpret(
            "secret secret secret shadow whisper spy intrigue hidden",
            &config(),
        );
        assert_eq!(profile.modifier(Modifier::Secretive), 1.0);
    }

    #[test]
    fn test_scale_preference() {
        let profile = interpret("I want to rule the whole world", &config());
        assert!(profile.scale.world > profile.scale.local);
        let sum = profile.scale.local + profile.scale.regional + profile.scale.world;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_interpret_is_pure() {
        let a = interpret("a holy empire of merchants", &config());
        let b = interpret("a holy empire of merchants", &config());
        assert_eq!(a, b);
    }
}
