//! Typed effects parsed from rule-base strings
//!
//! Authored text like `legitimacy.law +5` or `region.piety -3` is parsed once
//! at load time. Text with an unknown scope or field, or that does not parse
//! at all, is kept verbatim as `Effect::Raw`.

use std::fmt;

use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::all_consuming;
use nom::number::complete::double;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

use crate::core::types::{Domain, LegitimacyAxis, Modifier, RegionId};
use crate::world::region::RegionMetric;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Legitimacy {
        axis: LegitimacyAxis,
        delta: f64,
    },
    /// Applies to `region` when set, otherwise to every controlled region
    Region {
        metric: RegionMetric,
        delta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        region: Option<RegionId>,
    },
    Domain {
        domain: Domain,
        delta: f64,
    },
    Modifier {
        modifier: Modifier,
        delta: f64,
    },
    Raw {
        text: String,
    },
}

pub(crate) fn ident(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_').parse(input)
}

fn scoped_delta(input: &str) -> IResult<&str, (&str, &str, f64)> {
    let (rest, (_, scope, _, field, _, delta, _)) =
        (multispace0, ident, char('.'), ident, multispace1, double, multispace0).parse(input)?;
    Ok((rest, (scope, field, delta)))
}

impl Effect {
    /// Parse authored effect text; never fails, unknown text becomes `Raw`
    pub fn parse(text: &str) -> Effect {
        let raw = || Effect::Raw {
            text: text.trim().to_string(),
        };
        let Ok((_, (scope, field, delta))) = all_consuming(scoped_delta).parse(text) else {
            return raw();
        };
        if !delta.is_finite() {
            return raw();
        }
        let parsed = match scope {
            "legitimacy" => LegitimacyAxis::parse(field).map(|axis| Effect::Legitimacy { axis, delta }),
            "region" => RegionMetric::parse(field).map(|metric| Effect::Region {
                metric,
                delta,
                region: None,
            }),
            "domain" => Domain::parse(field).map(|domain| Effect::Domain { domain, delta }),
            "modifier" => Modifier::parse(field).map(|modifier| Effect::Modifier { modifier, delta }),
            _ => None,
        };
        parsed.unwrap_or_else(raw)
    }

    /// Absolute numeric size, zero for raw text
    pub fn magnitude(&self) -> f64 {
        match self {
            Effect::Legitimacy { delta, .. }
            | Effect::Region { delta, .. }
            | Effect::Domain { delta, .. }
            | Effect::Modifier { delta, .. } => delta.abs(),
            Effect::Raw { .. } => 0.0,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Effect::Raw { .. })
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Legitimacy { axis, delta } => write!(f, "legitimacy.{} {:+}", axis, delta),
            Effect::Region { metric, delta, region: None } => {
                write!(f, "region.{} {:+}", metric.as_str(), delta)
            }
            Effect::Region { metric, delta, region: Some(id) } => {
                write!(f, "{}.{} {:+}", id, metric.as_str(), delta)
            }
            Effect::Domain { domain, delta } => write!(f, "domain.{} {:+}", domain, delta),
            Effect::Modifier { modifier, delta } => write!(f, "modifier.{} {:+}", modifier, delta),
            Effect::Raw { text } => write!(f, "{}", text),
        }
    }
}
