//! Compiled rule base
//!
//! Requirement rules map a goal-node id to one or more named paths; generator
//! rules fire on world/ambition conditions regardless of the graph. The base
//! is read-only once loaded and shared through `Arc`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::{Domain, Resources};
use crate::rules::condition::Condition;
use crate::rules::effect::Effect;
use crate::rules::loader;
use crate::rules::risk::Risk;

/// One way of satisfying a requirement
#[derive(Clone, Debug, PartialEq)]
pub struct RulePath {
    pub name: String,
    pub label: String,
    pub description: String,
    pub domains: Vec<Domain>,
    pub cost: Resources,
    pub reward: Resources,
    pub risks: Vec<Risk>,
    pub time: String,
    pub effects: Vec<Effect>,
    /// Goal-node ids that must be met before this path is offered
    pub needs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RequirementRule {
    pub id: String,
    pub label: String,
    pub paths: Vec<RulePath>,
}

impl RequirementRule {
    /// Stable action id for one of this rule's paths
    pub fn action_id(&self, path: &RulePath) -> String {
        format!("{}.{}", self.id, path.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorRule {
    pub id: String,
    pub label: String,
    pub description: String,
    pub domains: Vec<Domain>,
    pub cost: Resources,
    pub reward: Resources,
    pub risks: Vec<Risk>,
    pub time: String,
    /// All must hold for the generator to fire
    pub when: Vec<Condition>,
    /// Requirement id this generator advances, if any
    pub requires: Option<String>,
    pub effects: Vec<Effect>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KnowledgeBase {
    requirements: BTreeMap<String, RequirementRule>,
    generators: Vec<GeneratorRule>,
}

impl KnowledgeBase {
    pub fn new(requirements: Vec<RequirementRule>, generators: Vec<GeneratorRule>) -> Self {
        Self {
            requirements: requirements.into_iter().map(|r| (r.id.clone(), r)).collect(),
            generators,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        loader::parse_rule_base(content)
    }

    pub fn load(path: &Path) -> Result<Self> {
        loader::load_rule_base(path)
    }

    /// Rule for a requirement id; a missing id is an unknown reference
    pub fn requirement(&self, id: &str) -> Result<&RequirementRule> {
        self.requirements
            .get(id)
            .ok_or_else(|| SimError::UnknownRuleReference(id.to_string()))
    }

    pub fn requirements(&self) -> impl Iterator<Item = &RequirementRule> {
        self.requirements.values()
    }

    pub fn generators(&self) -> &[GeneratorRule] {
        &self.generators
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty() && self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_requirement_is_unknown_reference() {
        let kb = KnowledgeBase::default();
        assert!(matches!(
            kb.requirement("build_shrine"),
            Err(SimError::UnknownRuleReference(id)) if id == "build_shrine"
        ));
    }

    #[test]
    fn test_action_id_joins_rule_and_path() {
        let kb = KnowledgeBase::from_toml_str(
            r#"
            [requirements.build_shrine]
            label = "Build a shrine"
            [[requirements.build_shrine.paths]]
            name = "village_shrine"
            domains = ["faith"]
            "#,
        )
        .unwrap();
        let rule = kb.requirement("build_shrine").unwrap();
        assert_eq!(rule.action_id(&rule.paths[0]), "build_shrine.village_shrine");
    }
}
