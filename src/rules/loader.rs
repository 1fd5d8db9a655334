//! Load the rule base from TOML
//!
//! Raw serde structs mirror the authored file; `compile` turns them into
//! typed rules, parsing every effect and condition string exactly once.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Result, SimError};
use crate::core::types::{Domain, Resources};
use crate::rules::condition::Condition;
use crate::rules::effect::Effect;
use crate::rules::knowledge::{GeneratorRule, KnowledgeBase, RequirementRule, RulePath};
use crate::rules::risk::risk_table;

#[derive(Debug, Deserialize)]
struct RawRuleBase {
    #[serde(default)]
    requirements: BTreeMap<String, RawRequirement>,
    #[serde(default)]
    generators: Vec<RawGenerator>,
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    label: Option<String>,
    #[serde(default)]
    paths: Vec<RawPath>,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    name: String,
    label: Option<String>,
    description: Option<String>,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    cost: Resources,
    #[serde(default)]
    reward: Resources,
    #[serde(default)]
    risk: BTreeMap<String, f64>,
    time: Option<String>,
    #[serde(default)]
    effects: Vec<String>,
    #[serde(default)]
    needs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawGenerator {
    id: String,
    label: Option<String>,
    description: Option<String>,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    cost: Resources,
    #[serde(default)]
    reward: Resources,
    #[serde(default)]
    risk: BTreeMap<String, f64>,
    time: Option<String>,
    #[serde(default)]
    when: Vec<String>,
    requires: Option<String>,
    #[serde(default)]
    effects: Vec<String>,
}

const DEFAULT_TIME: &str = "1 turn";

/// Parse rule-base TOML text
pub fn parse_rule_base(content: &str) -> Result<KnowledgeBase> {
    let raw: RawRuleBase = toml::from_str(content)?;
    compile(raw)
}

/// Load the rule base from a TOML file
pub fn load_rule_base(path: &Path) -> Result<KnowledgeBase> {
    let content = fs::read_to_string(path)?;
    let kb = parse_rule_base(&content)?;
    tracing::info!(
        path = %path.display(),
        requirements = kb.requirements().count(),
        generators = kb.generators().len(),
        "loaded rule base"
    );
    Ok(kb)
}

fn parse_domains(owner: &str, names: &[String]) -> Result<Vec<Domain>> {
    let mut domains = Vec::with_capacity(names.len());
    for name in names {
        let domain = Domain::parse(name)
            .ok_or_else(|| SimError::RuleBase(format!("{}: unknown domain '{}'", owner, name)))?;
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    Ok(domains)
}

fn parse_effects(owner: &str, texts: &[String]) -> Vec<Effect> {
    texts
        .iter()
        .map(|text| {
            let effect = Effect::parse(text);
            if effect.is_raw() {
                tracing::trace!(owner, text = %text, "keeping effect as raw text");
            }
            effect
        })
        .collect()
}

fn compile_path(requirement: &str, raw: RawPath) -> Result<RulePath> {
    let owner = format!("{}.{}", requirement, raw.name);
    let domains = parse_domains(&owner, &raw.domains)?;
    let effects = parse_effects(&owner, &raw.effects);
    let label = raw.label.unwrap_or_else(|| raw.name.replace('_', " "));
    Ok(RulePath {
        description: raw.description.unwrap_or_else(|| label.clone()),
        label,
        name: raw.name,
        domains,
        cost: raw.cost,
        reward: raw.reward,
        risks: risk_table(&raw.risk),
        time: raw.time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
        effects,
        needs: raw.needs,
    })
}

fn compile_generator(raw: RawGenerator) -> Result<GeneratorRule> {
    let domains = parse_domains(&raw.id, &raw.domains)?;
    let when = raw
        .when
        .iter()
        .map(|text| Condition::parse(text))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| SimError::RuleBase(format!("generator {}: {}", raw.id, e)))?;
    let effects = parse_effects(&raw.id, &raw.effects);
    let label = raw.label.unwrap_or_else(|| raw.id.replace('_', " "));
    Ok(GeneratorRule {
        description: raw.description.unwrap_or_else(|| label.clone()),
        label,
        id: raw.id,
        domains,
        cost: raw.cost,
        reward: raw.reward,
        risks: risk_table(&raw.risk),
        time: raw.time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
        when,
        requires: raw.requires,
        effects,
    })
}

fn compile(raw: RawRuleBase) -> Result<KnowledgeBase> {
    let mut requirements = Vec::with_capacity(raw.requirements.len());
    for (id, rule) in raw.requirements {
        if rule.paths.is_empty() {
            return Err(SimError::RuleBase(format!("requirement {} has no paths", id)));
        }
        let paths = rule
            .paths
            .into_iter()
            .map(|p| compile_path(&id, p))
            .collect::<Result<Vec<_>>>()?;
        requirements.push(RequirementRule {
            label: rule.label.unwrap_or_else(|| id.replace('_', " ")),
            id,
            paths,
        });
    }

    let generators = raw
        .generators
        .into_iter()
        .map(compile_generator)
        .collect::<Result<Vec<_>>>()?;

    Ok(KnowledgeBase::new(requirements, generators))
}
