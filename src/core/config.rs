//! Simulation configuration with documented constants
//!
//! All tunable numbers are collected here. Content balance lives in these
//! values and in the rule base, never in the algorithms themselves.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Configuration passed explicitly into every component
///
/// Deserializes from TOML with every field optional, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === INTENT INTERPRETER ===
    /// Accumulator increment for a single-word keyword hit
    pub word_hit_weight: f64,

    /// Accumulator increment for a 2-3 word phrase hit
    ///
    /// Phrases are more specific than single words, so they count double.
    pub phrase_hit_weight: f64,

    /// Modifier scalar gained per modifier keyword hit (clamped to 1.0)
    pub modifier_hit_weight: f64,

    // === WORLD GENERATOR ===
    pub min_regions: i64,
    pub max_regions: i64,
    pub min_factions: i64,
    pub max_factions: i64,

    /// Share of non-home regions given a specialized domain affinity
    pub specialized_region_chance: f64,

    /// Share of factions given a specialized domain affinity
    pub specialized_faction_chance: f64,

    /// Chance a region ignores affinity matching and joins a random faction
    pub random_reassignment_chance: f64,

    // === GOAL GRAPH ===
    pub min_goal_nodes: i64,
    pub max_goal_nodes: i64,

    /// Deepest template tier used at initial generation (1..=3)
    pub goal_tier_depth: u8,

    /// Spawn probability of a template is `domain weight * goal_spawn_scale`
    ///
    /// At 3.0 a domain holding a third of the profile spawns every template
    /// whose prerequisites are present.
    pub goal_spawn_scale: f64,

    // === PLANNER ===
    pub max_proposals: usize,

    /// Minimum weight for a domain to count as "dominant" for generator rules
    pub dominant_domain_threshold: f64,
    pub alignment_weight: f64,
    pub modifier_weight: f64,

    /// Flat bonus for proposals that satisfy an unmet goal node
    pub node_bonus: f64,
    pub risk_weight: f64,
    pub scale_weight: f64,

    // === AMBITION MUTATION ===
    /// Domain weights whose upward crossing fires a dream event
    pub dream_thresholds: Vec<f64>,

    // === ECONOMY ===
    /// Gold consumed per soldier per tick
    pub soldier_gold_upkeep: f64,

    /// Food consumed per soldier per tick
    pub soldier_food_upkeep: f64,

    /// Food consumed per head of realm population per tick
    pub population_food_upkeep: f64,

    /// Stock level under which gold or food counts as scarce
    pub scarcity_threshold: f64,

    // === POLITICS ===
    /// Realm loyalty lost every tick absent intervention
    pub loyalty_decay: f64,

    /// Loyalty below which unrest starts to climb
    pub loyalty_unrest_floor: f64,

    /// Extra realm unrest per tick while the realm is in scarcity
    pub scarcity_unrest: f64,

    /// Realm unrest above which the "crisis" trait is set
    pub crisis_threshold: f64,

    // === REGIONS ===
    /// Value every pressure metric drifts toward
    pub pressure_equilibrium: f64,

    /// Points a pressure metric moves toward equilibrium each tick
    pub pressure_drift: f64,

    /// Fraction of the gap between regional and realm loyalty/unrest closed each tick
    pub regional_propagation: f64,

    // === JUSTICE ===
    /// Law legitimacy below which regional lawfulness decays
    pub law_legitimacy_floor: f64,
    pub lawfulness_decay: f64,
    pub crime_threshold: f64,
    pub bureaucracy_threshold: f64,

    /// Gold charged per over-administered region per tick
    pub bureaucracy_upkeep: f64,

    // === FAITH ===
    /// Faith legitimacy below which piety decays and heresy grows
    pub faith_legitimacy_floor: f64,
    pub piety_decay: f64,
    pub zealotry_threshold: f64,
    pub heresy_threshold: f64,

    // === FACTIONS ===
    /// Power a faction trends toward for each region it holds
    pub power_per_region: f64,

    /// Fraction of the gap to target power closed each tick
    pub power_trend_rate: f64,

    /// Power share above which a faction counts as dominant
    pub dominant_faction_share: f64,

    /// Relation gained per tick between factions balancing against a dominant one
    pub balancing_relation_gain: f64,

    /// Relation at which two factions count as allied
    pub alliance_relation: f64,
    pub faction_cooldown_min: i64,
    pub faction_cooldown_max: i64,

    /// Jitter applied to each archetype weight before renormalizing
    pub faction_profile_jitter: f64,

    // === EVENTS ===
    /// Minimum absolute change for a diff entry to count as significant
    pub significance_threshold: f64,
    pub max_event_cards: usize,
    pub omen_base_chance: f64,
    /// Added in regions whose piety is above `omen_piety_threshold`
    pub omen_piety_bonus: f64,
    pub omen_piety_threshold: f64,
    /// Added everywhere while faith legitimacy is below `omen_faith_threshold`
    pub omen_faith_bonus: f64,
    pub omen_faith_threshold: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            word_hit_weight: 1.0,
            phrase_hit_weight: 2.0,
            modifier_hit_weight: 0.35,

            min_regions: 6,
            max_regions: 10,
            min_factions: 4,
            max_factions: 6,
            specialized_region_chance: 0.4,
            specialized_faction_chance: 0.6,
            random_reassignment_chance: 0.3,

            min_goal_nodes: 3,
            max_goal_nodes: 10,
            goal_tier_depth: 3,
            goal_spawn_scale: 3.0,

            max_proposals: 5,
            dominant_domain_threshold: 0.2,
            alignment_weight: 10.0,
            modifier_weight: 5.0,
            node_bonus: 15.0,
            risk_weight: 5.0,
            scale_weight: 3.0,

            dream_thresholds: vec![0.4, 0.6, 0.8],

            soldier_gold_upkeep: 0.05,
            soldier_food_upkeep: 0.08,
            population_food_upkeep: 0.002,
            scarcity_threshold: 10.0,

            loyalty_decay: 0.5,
            loyalty_unrest_floor: 40.0,
            scarcity_unrest: 3.0,
            crisis_threshold: 70.0,

            pressure_equilibrium: 50.0,
            pressure_drift: 1.0,
            regional_propagation: 0.1,

            law_legitimacy_floor: 40.0,
            lawfulness_decay: 1.0,
            crime_threshold: 30.0,
            bureaucracy_threshold: 70.0,
            bureaucracy_upkeep: 1.0,

            faith_legitimacy_floor: 40.0,
            piety_decay: 1.0,
            zealotry_threshold: 70.0,
            heresy_threshold: 70.0,

            power_per_region: 15.0,
            power_trend_rate: 0.1,
            dominant_faction_share: 0.4,
            balancing_relation_gain: 5.0,
            alliance_relation: 50.0,
            faction_cooldown_min: 2,
            faction_cooldown_max: 4,
            faction_profile_jitter: 0.05,

            significance_threshold: 5.0,
            max_event_cards: 3,
            omen_base_chance: 0.02,
            omen_piety_bonus: 0.02,
            omen_piety_threshold: 70.0,
            omen_faith_bonus: 0.03,
            omen_faith_threshold: 40.0,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) TOML override file
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
