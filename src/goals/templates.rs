//! Objective template pool, by domain and tier

use crate::core::types::Domain;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalTemplate {
    pub id: &'static str,
    pub label: &'static str,
    /// Primary domain first
    pub domains: &'static [Domain],
    pub tier: u8,
    pub needs: &'static [&'static str],
}

impl GoalTemplate {
    pub fn domain(&self) -> Domain {
        self.domains[0]
    }
}

macro_rules! goal {
    ($id:expr, $label:expr, [$($d:ident),+], $tier:expr, [$($need:expr),*]) => {
        GoalTemplate {
            id: $id,
            label: $label,
            domains: &[$(Domain::$d),+],
            tier: $tier,
            needs: &[$($need),*],
        }
    };
}

pub const TEMPLATES: &[GoalTemplate] = &[
    // Power
    goal!("secure_throne", "Secure the throne", [Power], 1, []),
    goal!("raise_levies", "Raise the levies", [Power], 1, []),
    goal!("subdue_rivals", "Subdue rival houses", [Power], 2, ["raise_levies"]),
    goal!("forge_empire", "Forge an empire", [Power, Wealth], 3, ["subdue_rivals"]),
    // Wealth
    goal!("fill_treasury", "Fill the treasury", [Wealth], 1, []),
    goal!("open_trade_routes", "Open trade routes", [Wealth, Freedom], 1, []),
    goal!("found_merchant_guild", "Found a merchant guild", [Wealth], 2, ["open_trade_routes"]),
    goal!("command_markets", "Command the markets", [Wealth, Power], 3, ["found_merchant_guild"]),
    // Faith
    goal!("build_shrine", "Build a shrine", [Faith], 1, []),
    goal!("gain_clergy_favor", "Gain the clergy's favor", [Faith, Power], 1, []),
    goal!("consecrate_cathedral", "Consecrate a cathedral", [Faith, Creation], 2, ["build_shrine"]),
    goal!("proclaim_holy_mandate", "Proclaim a holy mandate", [Faith, Power], 3, ["consecrate_cathedral"]),
    // Virtue
    goal!("establish_courts", "Establish royal courts", [Virtue, Power], 1, []),
    goal!("relieve_the_poor", "Relieve the poor", [Virtue], 1, []),
    goal!("codify_laws", "Codify the laws", [Virtue], 2, ["establish_courts"]),
    goal!("golden_age_of_justice", "Usher in a golden age of justice", [Virtue], 3, ["codify_laws"]),
    // Freedom
    goal!("charter_free_towns", "Charter free towns", [Freedom], 1, []),
    goal!("map_the_frontier", "Map the frontier", [Freedom], 1, []),
    goal!("break_old_oaths", "Break the old oaths", [Freedom, Power], 2, ["charter_free_towns"]),
    goal!("sovereign_commonwealth", "Found a sovereign commonwealth", [Freedom, Virtue], 3, ["break_old_oaths"]),
    // Creation
    goal!("commission_works", "Commission great works", [Creation], 1, []),
    goal!("gather_artisans", "Gather the artisans", [Creation, Wealth], 1, []),
    goal!("raise_great_library", "Raise a great library", [Creation, Virtue], 2, ["gather_artisans"]),
    goal!("eternal_monument", "Raise an eternal monument", [Creation], 3, ["raise_great_library"]),
];

pub fn template(id: &str) -> Option<&'static GoalTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Templates whose primary domain is `domain` at `tier`, in pool order
pub fn templates_for(domain: Domain, tier: u8) -> impl Iterator<Item = &'static GoalTemplate> {
    TEMPLATES
        .iter()
        .filter(move |t| t.domain() == domain && t.tier == tier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_has_all_tiers() {
        for domain in Domain::ALL {
            for tier in 1..=3 {
                assert!(templates_for(domain, tier).next().is_some(), "{} tier {}", domain, tier);
            }
        }
    }

    #[test]
    fn test_needs_point_at_lower_tiers_of_the_same_domain() {
        for t in TEMPLATES {
            assert_eq!(t.needs.is_empty(), t.tier == 1, "{}", t.id);
            for need in t.needs {
                let prereq = template(need).unwrap();
                assert!(prereq.tier < t.tier);
                assert_eq!(prereq.domain(), t.domain());
            }
        }
    }
}
