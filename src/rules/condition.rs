//! Generator trigger conditions
//!
//! Grammar: `trait:<name>`, `!trait:<name>`, or `<subject> <op> <number>`.
//! Subjects are `resource.<kind>`, `legitimacy.<axis>`, `domain.<d>`,
//! `modifier.<m>`, `realm.<stat>` and `tick`.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::number::complete::double;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::ambition::profile::AmbitionProfile;
use crate::core::error::{Result, SimError};
use crate::core::types::{Domain, LegitimacyAxis, Modifier, ResourceKind};
use crate::rules::effect::ident;
use crate::world::state::{RealmStat, WorldState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl CmpOp {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => (lhs - rhs).abs() < 1e-9,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subject {
    Resource(ResourceKind),
    Legitimacy(LegitimacyAxis),
    Domain(Domain),
    Modifier(Modifier),
    Realm(RealmStat),
    Tick,
}

impl Subject {
    fn resolve(scope: &str, field: Option<&str>) -> Option<Subject> {
        match (scope, field) {
            ("tick", None) => Some(Subject::Tick),
            ("resource", Some(f)) => ResourceKind::parse(f).map(Subject::Resource),
            ("legitimacy", Some(f)) => LegitimacyAxis::parse(f).map(Subject::Legitimacy),
            ("domain", Some(f)) => Domain::parse(f).map(Subject::Domain),
            ("modifier", Some(f)) => Modifier::parse(f).map(Subject::Modifier),
            ("realm", Some(f)) => RealmStat::parse(f).map(Subject::Realm),
            _ => None,
        }
    }

    fn value(&self, world: &WorldState, profile: &AmbitionProfile) -> f64 {
        match *self {
            Subject::Resource(kind) => world.resources.get(kind),
            Subject::Legitimacy(axis) => world.legitimacy.get(axis),
            Subject::Domain(domain) => profile.weight(domain),
            Subject::Modifier(modifier) => profile.modifier(modifier),
            Subject::Realm(stat) => world.realm.get(stat),
            Subject::Tick => world.tick as f64,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    HasTrait(String),
    LacksTrait(String),
    Compare { subject: Subject, op: CmpOp, value: f64 },
}

enum Parsed<'a> {
    Trait { negated: bool, name: &'a str },
    Compare { scope: &'a str, field: Option<&'a str>, op: CmpOp, value: f64 },
}

fn trait_test(input: &str) -> IResult<&str, Parsed<'_>> {
    let (rest, (negated, _, name)) = (opt(char('!')), tag("trait:"), ident).parse(input)?;
    Ok((rest, Parsed::Trait { negated: negated.is_some(), name }))
}

fn comparison_op(input: &str) -> IResult<&str, CmpOp> {
    alt((
        tag("<=").map(|_| CmpOp::Le),
        tag(">=").map(|_| CmpOp::Ge),
        tag("==").map(|_| CmpOp::Eq),
        tag("<").map(|_| CmpOp::Lt),
        tag(">").map(|_| CmpOp::Gt),
    ))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, Parsed<'_>> {
    let (rest, (scope, field, _, op, _, value)) = (
        ident,
        opt(preceded(char('.'), ident)),
        multispace0,
        comparison_op,
        multispace0,
        double,
    )
        .parse(input)?;
    Ok((rest, Parsed::Compare { scope, field, op, value }))
}

fn condition(input: &str) -> IResult<&str, Parsed<'_>> {
    let (rest, (_, parsed, _)) = (multispace0, alt((trait_test, comparison)), multispace0).parse(input)?;
    Ok((rest, parsed))
}

impl Condition {
    /// Parse condition text; malformed text is a rule-base error
    pub fn parse(text: &str) -> Result<Condition> {
        let (_, parsed) = all_consuming(condition)
            .parse(text)
            .map_err(|_| SimError::RuleBase(format!("malformed condition '{}'", text)))?;
        match parsed {
            Parsed::Trait { negated: false, name } => Ok(Condition::HasTrait(name.to_string())),
            Parsed::Trait { negated: true, name } => Ok(Condition::LacksTrait(name.to_string())),
            Parsed::Compare { scope, field, op, value } => {
                let subject = Subject::resolve(scope, field).ok_or_else(|| {
                    SimError::RuleBase(format!("unknown condition subject in '{}'", text))
                })?;
                Ok(Condition::Compare { subject, op, value })
            }
        }
    }

    pub fn holds(&self, world: &WorldState, profile: &AmbitionProfile) -> bool {
        match self {
            Condition::HasTrait(name) => world.has_trait(name),
            Condition::LacksTrait(name) => !world.has_trait(name),
            Condition::Compare { subject, op, value } => op.apply(subject.value(world, profile), *value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trait_tests() {
        assert_eq!(Condition::parse("trait:scarcity").unwrap(), Condition::HasTrait("scarcity".into()));
        assert_eq!(Condition::parse(" !trait:at_war ").unwrap(), Condition::LacksTrait("at_war".into()));
    }

    #[test]
    fn test_parse_comparisons() {
        assert_eq!(
            Condition::parse("legitimacy.law < 80").unwrap(),
            Condition::Compare {
                subject: Subject::Legitimacy(LegitimacyAxis::Law),
                op: CmpOp::Lt,
                value: 80.0,
            }
        );
        assert_eq!(
            Condition::parse("resource.gold>=50").unwrap(),
            Condition::Compare {
                subject: Subject::Resource(ResourceKind::Gold),
                op: CmpOp::Ge,
                value: 50.0,
            }
        );
        assert_eq!(
            Condition::parse("tick == 3").unwrap(),
            Condition::Compare { subject: Subject::Tick, op: CmpOp::Eq, value: 3.0 }
        );
    }

    #[test]
    fn test_malformed_conditions_rejected() {
        for text in ["", "trait:", "legitimacy.law", "legitimacy.charm < 3", "gold < 3", "domain.power ~ 1"] {
            assert!(
                matches!(Condition::parse(text), Err(SimError::RuleBase(_))),
                "accepted '{}'",
                text
            );
        }
    }

    #[test]
    fn test_holds_against_world_and_profile() {
        let mut world = WorldState::empty(0);
        world.resources.gold = 60.0;
        world.set_trait("scarcity");
        let profile = AmbitionProfile::balanced();

        assert!(Condition::parse("resource.gold >= 50").unwrap().holds(&world, &profile));
        assert!(Condition::parse("trait:scarcity").unwrap().holds(&world, &profile));
        assert!(!Condition::parse("!trait:scarcity").unwrap().holds(&world, &profile));
        assert!(Condition::parse("domain.virtue < 0.2").unwrap().holds(&world, &profile));
        assert!(Condition::parse("realm.loyalty == 50").unwrap().holds(&world, &profile));
    }
}
