//! Event alchemizer
//!
//! Turns the numeric diff between two world snapshots, plus per-region omen
//! rolls, into a few narrative cards. Every choice on a card carries typed
//! effects, so resolving one runs through the same application path as a
//! planned action.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::rng::{streams, SeededRng};
use crate::core::types::{Domain, LegitimacyAxis, Modifier, RegionId, ResourceKind, Resources, Tick};
use crate::events::diff::{RegionShift, ResourceShift, StanceChange, WorldDiff};
use crate::planner::proposal::{ActionProposal, ProposalSource};
use crate::rules::effect::Effect;
use crate::rules::risk::{Risk, RiskKind};
use crate::world::faction::Stance;
use crate::world::region::{Region, RegionMetric};
use crate::world::state::WorldState;
use crate::world::traits;

const TRAIT_MAGNITUDE: f64 = 10.0;
const STANCE_MAGNITUDE: f64 = 8.0;
/// Percentage swing a stock needs before it makes a card
const MIN_LOSS_PERCENT: f64 = 10.0;
const MIN_GAIN_PERCENT: f64 = 30.0;

/// One way to answer an event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub id: String,
    pub label: String,
    pub cost: Resources,
    pub reward: Resources,
    pub risks: Vec<Risk>,
    pub effects: Vec<Effect>,
}

impl EventChoice {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            cost: Resources::default(),
            reward: Resources::default(),
            risks: Vec::new(),
            effects: Vec::new(),
        }
    }

    fn cost(mut self, kind: ResourceKind, amount: f64) -> Self {
        *self.cost.get_mut(kind) += amount;
        self
    }

    fn reward(mut self, kind: ResourceKind, amount: f64) -> Self {
        *self.reward.get_mut(kind) += amount;
        self
    }

    fn risk(mut self, kind: RiskKind, chance: f64) -> Self {
        self.risks.push(Risk::new(kind, chance));
        self
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// The choice as a one-off action with id `<card>:<choice>`
    pub fn to_action(&self, card_id: &str) -> ActionProposal {
        let mut action = ActionProposal::bare(&format!("{}:{}", card_id, self.id), &self.label);
        action.cost = self.cost;
        action.reward = self.reward;
        action.risks = self.risks.clone();
        action.effects = self.effects.clone();
        action.source = ProposalSource::Event;
        action
    }
}

/// A narrative card awaiting the player's answer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    pub id: String,
    pub tick: Tick,
    pub title: String,
    pub text: String,
    /// Size of the underlying change; larger cards win the slots
    pub magnitude: f64,
    pub choices: Vec<EventChoice>,
}

impl EventCard {
    pub fn choice(&self, choice_id: &str) -> Result<&EventChoice> {
        self.choices.iter().find(|c| c.id == choice_id).ok_or_else(|| {
            SimError::InvalidArgument(format!("event {} has no choice {}", self.id, choice_id))
        })
    }
}

fn legitimacy(axis: LegitimacyAxis, delta: f64) -> Effect {
    Effect::Legitimacy { axis, delta }
}

/// Applies to every controlled region
fn realm(metric: RegionMetric, delta: f64) -> Effect {
    Effect::Region { metric, delta, region: None }
}

fn local(metric: RegionMetric, delta: f64, region: RegionId) -> Effect {
    Effect::Region { metric, delta, region: Some(region) }
}

fn domain(domain: Domain, delta: f64) -> Effect {
    Effect::Domain { domain, delta }
}

fn modifier(modifier: Modifier, delta: f64) -> Effect {
    Effect::Modifier { modifier, delta }
}

/// Picks flavor text on the event stream for one tick
struct Narrator {
    rng: SeededRng,
    tick: Tick,
}

impl Narrator {
    fn new(world: &WorldState) -> Self {
        Self {
            rng: SeededRng::keyed(world.seed, streams::EVENTS, &[world.tick]),
            tick: world.tick,
        }
    }

    fn pick(&mut self, variants: &[&str], name: &str) -> String {
        self.rng
            .choice(variants)
            .map(|text| text.replace("{name}", name))
            .unwrap_or_default()
    }

    fn card(&mut self, id: String, title: String, variants: &[&str], name: &str, magnitude: f64) -> EventCard {
        EventCard {
            id,
            tick: self.tick,
            title,
            text: self.pick(variants, name),
            magnitude,
            choices: Vec::new(),
        }
    }
}

fn resource_card(n: &mut Narrator, shift: &ResourceShift, threshold: f64) -> Option<EventCard> {
    let percent = shift.relative();
    if shift.delta.abs() < threshold {
        return None;
    }
    let kind = shift.kind;
    let name = kind.to_string();
    let amount = (shift.delta.abs() / 2.0).round();

    if shift.delta < 0.0 {
        if percent < MIN_LOSS_PERCENT {
            return None;
        }
        let mut card = n.card(
            format!("{}-shortfall-t{}", name, n.tick),
            format!("Dwindling {}", name),
            &[
                "The stewards report that our {name} runs low.",
                "Whispers in the court: the {name} stores are thinner than anyone admits.",
                "Ledgers do not lie. Our {name} is draining away.",
            ],
            &name,
            percent / 2.0,
        );
        card.choices = vec![
            EventChoice::new("ration", "Ration what remains")
                .effect(realm(RegionMetric::Loyalty, -2.0))
                .effect(modifier(Modifier::Ascetic, 0.02)),
            EventChoice::new("levy", "Levy the shortfall from the provinces")
                .reward(kind, amount)
                .effect(realm(RegionMetric::Unrest, 4.0))
                .effect(legitimacy(LegitimacyAxis::Lineage, -1.0))
                .effect(modifier(Modifier::Ruthless, 0.02)),
            EventChoice::new("endure", "Endure it"),
        ];
        Some(card)
    } else {
        if percent < MIN_GAIN_PERCENT {
            return None;
        }
        let mut card = n.card(
            format!("{}-windfall-t{}", name, n.tick),
            format!("A windfall of {}", name),
            &[
                "Fortune smiles: our {name} swells beyond expectation.",
                "The storehouses overflow with {name}.",
            ],
            &name,
            percent / 2.0,
        );
        card.choices = vec![
            EventChoice::new("share", "Share it with the people")
                .cost(kind, amount)
                .effect(realm(RegionMetric::Loyalty, 3.0))
                .effect(modifier(Modifier::Peaceful, 0.02)),
            EventChoice::new("invest", "Invest it in great works")
                .cost(kind, amount)
                .effect(legitimacy(LegitimacyAxis::Lineage, 2.0))
                .effect(domain(Domain::Creation, 0.02)),
            EventChoice::new("hoard", "Hoard it").effect(modifier(Modifier::Opulent, 0.02)),
        ];
        Some(card)
    }
}

fn mood_card(n: &mut Narrator, diff: &WorldDiff, threshold: f64) -> Option<EventCard> {
    let souring = diff.unrest.max(-diff.loyalty);
    let brightening = (-diff.unrest).max(diff.loyalty);
    if souring >= threshold {
        let mut card = n.card(
            format!("discontent-t{}", n.tick),
            "Murmurs of discontent".to_string(),
            &[
                "Taverns fill with angry talk about the crown.",
                "Pamphlets mocking your rule appear on church doors.",
                "The people grumble, and the grumbling grows louder.",
            ],
            "",
            souring,
        );
        card.choices = vec![
            EventChoice::new("concede", "Concede to their demands")
                .cost(ResourceKind::Gold, 20.0)
                .effect(realm(RegionMetric::Unrest, -5.0))
                .effect(realm(RegionMetric::Loyalty, 3.0))
                .effect(modifier(Modifier::Peaceful, 0.02)),
            EventChoice::new("crack_down", "Crack down")
                .cost(ResourceKind::Manpower, 10.0)
                .risk(RiskKind::Unrest, 0.3)
                .effect(realm(RegionMetric::Unrest, -8.0))
                .effect(legitimacy(LegitimacyAxis::Law, -2.0))
                .effect(modifier(Modifier::Ruthless, 0.03)),
            EventChoice::new("ignore", "Ignore them"),
        ];
        Some(card)
    } else if brightening >= threshold {
        let mut card = n.card(
            format!("rejoicing-t{}", n.tick),
            "The realm rejoices".to_string(),
            &[
                "Songs in your honor drift up from the market squares.",
                "For once the people speak of you with warmth.",
            ],
            "",
            brightening,
        );
        card.choices = vec![
            EventChoice::new("festival", "Hold a festival")
                .cost(ResourceKind::Gold, 15.0)
                .effect(legitimacy(LegitimacyAxis::Lineage, 2.0))
                .effect(modifier(Modifier::Charismatic, 0.03)),
            EventChoice::new("carry_on", "Carry on"),
        ];
        Some(card)
    } else {
        None
    }
}

fn legitimacy_card(n: &mut Narrator, axis: LegitimacyAxis, delta: f64, threshold: f64) -> Option<EventCard> {
    if delta.abs() < threshold {
        return None;
    }
    let name = axis.to_string();
    let card = if delta < 0.0 {
        let mut card = n.card(
            format!("{}-questioned-t{}", name, n.tick),
            format!("Your {} authority questioned", name),
            &[
                "Voices at court question your claim by {name}.",
                "Your authority of {name} is openly doubted.",
            ],
            &name,
            delta.abs(),
        );
        card.choices = vec![
            EventChoice::new("proclaim", "Issue a proclamation")
                .cost(ResourceKind::Influence, 10.0)
                .effect(legitimacy(axis, 4.0)),
            EventChoice::new("show_force", "Answer with a show of force")
                .cost(ResourceKind::Manpower, 5.0)
                .effect(legitimacy(LegitimacyAxis::Might, 3.0))
                .effect(modifier(Modifier::Ruthless, 0.02)),
            EventChoice::new("accept", "Let it pass"),
        ];
        card
    } else {
        let mut card = n.card(
            format!("{}-acclaimed-t{}", name, n.tick),
            format!("Your {} authority acclaimed", name),
            &[
                "Your standing by {name} has never been firmer.",
                "Even rivals concede your claim by {name}.",
            ],
            &name,
            delta.abs(),
        );
        card.choices = vec![
            EventChoice::new("celebrate", "Celebrate publicly")
                .cost(ResourceKind::Gold, 10.0)
                .effect(realm(RegionMetric::Loyalty, 2.0))
                .effect(modifier(Modifier::Charismatic, 0.02)),
            EventChoice::new("stay_humble", "Stay humble").effect(modifier(Modifier::Ascetic, 0.02)),
        ];
        card
    };
    Some(card)
}

fn region_card(n: &mut Narrator, shift: &RegionShift) -> Option<EventCard> {
    let id = shift.region;
    let name = shift.name.as_str();
    let rising = shift.delta > 0.0;
    let magnitude = shift.delta.abs();

    let (slug, title, variants, choices): (&str, String, &[&str], Vec<EventChoice>) = match (shift.metric, rising) {
        (RegionMetric::Lawfulness, false) => (
            "lawlessness",
            format!("Lawlessness in {}", name),
            &["Bandits roam the roads of {name}.", "In {name} the magistrates are ignored."],
            vec![
                EventChoice::new("patrols", "Send patrols")
                    .cost(ResourceKind::Manpower, 5.0)
                    .effect(local(RegionMetric::Lawfulness, 6.0, id))
                    .effect(local(RegionMetric::Security, 0.05, id)),
                EventChoice::new("amnesty", "Declare an amnesty")
                    .effect(local(RegionMetric::Lawfulness, -2.0, id))
                    .effect(local(RegionMetric::Loyalty, 4.0, id))
                    .effect(modifier(Modifier::Peaceful, 0.02)),
            ],
        ),
        (RegionMetric::Lawfulness, true) => (
            "order",
            format!("Order returns to {}", name),
            &["The courts of {name} sit every day now.", "Merchants travel {name} without escort."],
            vec![
                EventChoice::new("commend_magistrates", "Commend the magistrates")
                    .cost(ResourceKind::Influence, 5.0)
                    .effect(legitimacy(LegitimacyAxis::Law, 3.0)),
                EventChoice::new("loosen_grip", "Loosen your grip")
                    .effect(local(RegionMetric::Lawfulness, -3.0, id))
                    .effect(domain(Domain::Freedom, 0.02)),
            ],
        ),
        (RegionMetric::Unrest, true) => (
            "riots",
            format!("Riots in {}", name),
            &["Mobs fill the streets of {name}.", "Granaries burn in {name} as the crowds turn violent."],
            vec![
                EventChoice::new("disperse", "Disperse the mob")
                    .cost(ResourceKind::Manpower, 8.0)
                    .risk(RiskKind::Casualties, 0.2)
                    .effect(local(RegionMetric::Unrest, -8.0, id))
                    .effect(local(RegionMetric::Loyalty, -3.0, id))
                    .effect(modifier(Modifier::Ruthless, 0.03)),
                EventChoice::new("hear_grievances", "Hear their grievances")
                    .cost(ResourceKind::Gold, 15.0)
                    .effect(local(RegionMetric::Unrest, -5.0, id))
                    .effect(legitimacy(LegitimacyAxis::Law, 1.0))
                    .effect(modifier(Modifier::Peaceful, 0.02)),
            ],
        ),
        (RegionMetric::Unrest, false) => (
            "calm",
            format!("Calm in {}", name),
            &["A rare quiet settles over {name}."],
            vec![
                EventChoice::new("tour", "Tour the province")
                    .cost(ResourceKind::Gold, 5.0)
                    .effect(local(RegionMetric::Loyalty, 3.0, id))
                    .effect(modifier(Modifier::Charismatic, 0.02)),
                EventChoice::new("carry_on", "Carry on"),
            ],
        ),
        (RegionMetric::Piety, true) => (
            "revival",
            format!("Revival in {}", name),
            &["Pilgrims crowd the shrines of {name}.", "A preacher in {name} draws thousands."],
            vec![
                EventChoice::new("endow_clergy", "Endow the clergy")
                    .cost(ResourceKind::Gold, 15.0)
                    .effect(legitimacy(LegitimacyAxis::Faith, 4.0))
                    .effect(domain(Domain::Faith, 0.02)),
                EventChoice::new("temper_zeal", "Temper their zeal")
                    .effect(local(RegionMetric::Piety, -4.0, id))
                    .effect(legitimacy(LegitimacyAxis::Faith, -1.0)),
            ],
        ),
        (RegionMetric::Piety, false) => (
            "empty-temples",
            format!("Empty temples in {}", name),
            &["The bells of {name} ring for empty pews."],
            vec![
                EventChoice::new("send_preachers", "Send preachers")
                    .cost(ResourceKind::Influence, 8.0)
                    .effect(local(RegionMetric::Piety, 5.0, id)),
                EventChoice::new("let_it_be", "Let it be").effect(domain(Domain::Freedom, 0.01)),
            ],
        ),
        (RegionMetric::Heresy, true) => (
            "heresy",
            format!("Heresy spreads in {}", name),
            &["Strange sermons are preached in the hills of {name}.", "Heretical tracts circulate in {name}."],
            vec![
                EventChoice::new("inquisition", "Summon the inquisition")
                    .cost(ResourceKind::Manpower, 5.0)
                    .risk(RiskKind::Unrest, 0.2)
                    .effect(local(RegionMetric::Heresy, -8.0, id))
                    .effect(local(RegionMetric::Unrest, 3.0, id))
                    .effect(modifier(Modifier::Ruthless, 0.03)),
                EventChoice::new("tolerate", "Tolerate dissent")
                    .effect(local(RegionMetric::Heresy, 2.0, id))
                    .effect(domain(Domain::Freedom, 0.02)),
            ],
        ),
        (RegionMetric::Heresy, false) => (
            "orthodoxy",
            format!("Orthodoxy restored in {}", name),
            &["The faithful of {name} return to the fold."],
            vec![
                EventChoice::new("give_thanks", "Give thanks")
                    .effect(legitimacy(LegitimacyAxis::Faith, 2.0)),
                EventChoice::new("carry_on", "Carry on"),
            ],
        ),
        (RegionMetric::Loyalty | RegionMetric::Security, _) => return None,
    };

    let card_id = format!("{}-r{}-t{}", slug, id.0, n.tick);
    let mut card = n.card(card_id, title, variants, name, magnitude);
    card.choices = choices;
    Some(card)
}

fn trait_card(n: &mut Narrator, name: &str) -> Option<EventCard> {
    let (title, variants, choices): (&str, &[&str], Vec<EventChoice>) = match name {
        traits::SCARCITY => (
            "Lean times",
            &["Bread prices climb week by week.", "The granaries echo."],
            vec![
                EventChoice::new("import_grain", "Import grain")
                    .cost(ResourceKind::Gold, 25.0)
                    .reward(ResourceKind::Food, 40.0),
                EventChoice::new("tighten_belts", "Tighten belts")
                    .effect(realm(RegionMetric::Loyalty, -3.0))
                    .effect(modifier(Modifier::Ascetic, 0.03)),
            ],
        ),
        traits::CRISIS => (
            "The realm in crisis",
            &["Everything seems to fail at once.", "Your councillors speak of collapse."],
            vec![
                EventChoice::new("emergency_council", "Call an emergency council")
                    .cost(ResourceKind::Influence, 15.0)
                    .effect(legitimacy(LegitimacyAxis::Law, 3.0))
                    .effect(realm(RegionMetric::Unrest, -4.0)),
                EventChoice::new("martial_law", "Declare martial law")
                    .cost(ResourceKind::Manpower, 10.0)
                    .effect(realm(RegionMetric::Unrest, -8.0))
                    .effect(legitimacy(LegitimacyAxis::Law, -3.0))
                    .effect(modifier(Modifier::Ruthless, 0.04)),
            ],
        ),
        traits::HIGH_CRIME => (
            "Crime wave",
            &["Cutpurses work the markets in broad daylight."],
            vec![
                EventChoice::new("hire_watchmen", "Hire watchmen")
                    .cost(ResourceKind::Gold, 20.0)
                    .effect(realm(RegionMetric::Lawfulness, 5.0)),
                EventChoice::new("look_away", "Look away").effect(modifier(Modifier::Secretive, 0.02)),
            ],
        ),
        traits::HIGH_BUREAUCRACY => (
            "Drowning in paperwork",
            &["Every petition now needs seven seals."],
            vec![
                EventChoice::new("prune_offices", "Prune the offices")
                    .cost(ResourceKind::Influence, 5.0)
                    .effect(realm(RegionMetric::Lawfulness, -4.0)),
                EventChoice::new("keep_clerks", "Keep the clerks")
                    .effect(legitimacy(LegitimacyAxis::Law, 1.0)),
            ],
        ),
        traits::ZEALOTRY => (
            "Zealots in the streets",
            &["Flagellants march through the capital."],
            vec![
                EventChoice::new("embrace", "Embrace their fervor")
                    .effect(legitimacy(LegitimacyAxis::Faith, 3.0))
                    .effect(realm(RegionMetric::Unrest, 2.0))
                    .effect(domain(Domain::Faith, 0.03)),
                EventChoice::new("restrain", "Restrain them")
                    .effect(realm(RegionMetric::Piety, -5.0))
                    .effect(legitimacy(LegitimacyAxis::Faith, -2.0)),
            ],
        ),
        traits::RAMPANT_HERESY => (
            "A heretic movement",
            &["A rival creed gathers followers openly."],
            vec![
                EventChoice::new("council_of_bishops", "Convene the bishops")
                    .cost(ResourceKind::Influence, 10.0)
                    .effect(realm(RegionMetric::Heresy, -6.0)),
                EventChoice::new("purge", "Purge the heretics")
                    .cost(ResourceKind::Manpower, 10.0)
                    .effect(realm(RegionMetric::Heresy, -10.0))
                    .effect(realm(RegionMetric::Unrest, 5.0))
                    .effect(modifier(Modifier::Ruthless, 0.05)),
            ],
        ),
        traits::DOMINANT_FACTION => (
            "A rival rises above the rest",
            &["One house now overshadows all others."],
            vec![
                EventChoice::new("join_coalition", "Join a coalition against them")
                    .cost(ResourceKind::Influence, 10.0)
                    .effect(legitimacy(LegitimacyAxis::Might, 2.0))
                    .effect(modifier(Modifier::Peaceful, 0.02)),
                EventChoice::new("bide_time", "Bide your time").effect(modifier(Modifier::Secretive, 0.02)),
            ],
        ),
        traits::AT_WAR => (
            "War drums",
            &["Beacons burn along the border.", "Heralds bring a declaration of war."],
            vec![
                EventChoice::new("muster", "Muster the host")
                    .cost(ResourceKind::Gold, 20.0)
                    .cost(ResourceKind::Manpower, 10.0)
                    .effect(legitimacy(LegitimacyAxis::Might, 4.0))
                    .effect(domain(Domain::Power, 0.03)),
                EventChoice::new("seek_terms", "Seek terms")
                    .cost(ResourceKind::Influence, 15.0)
                    .effect(legitimacy(LegitimacyAxis::Lineage, -2.0))
                    .effect(modifier(Modifier::Peaceful, 0.03)),
            ],
        ),
        _ => return None,
    };
    let mut card = n.card(
        format!("{}-t{}", name.replace('_', "-"), n.tick),
        title.to_string(),
        variants,
        "",
        TRAIT_MAGNITUDE,
    );
    card.choices = choices;
    Some(card)
}

fn stance_card(n: &mut Narrator, change: &StanceChange) -> EventCard {
    let variants: &[&str] = match change.to {
        Stance::War => &["{name} has declared war."],
        Stance::Hostile => &["{name} turns against us.", "Envoys from {name} leave without a word."],
        Stance::Allied => &["{name} offers friendship."],
        Stance::Trade => &["{name} opens its markets to us."],
        Stance::Neutral => &["{name} keeps its own counsel now."],
    };
    let mut card = n.card(
        format!("stance-f{}-t{}", change.faction.0, n.tick),
        format!("{} is now {}", change.name, change.to.as_str()),
        variants,
        &change.name,
        STANCE_MAGNITUDE,
    );
    card.choices = vec![
        EventChoice::new("send_gifts", "Send gifts")
            .cost(ResourceKind::Gold, 15.0)
            .effect(legitimacy(LegitimacyAxis::Lineage, 1.0))
            .effect(modifier(Modifier::Peaceful, 0.01)),
        EventChoice::new("rattle_sabres", "Rattle sabres")
            .cost(ResourceKind::Manpower, 5.0)
            .effect(legitimacy(LegitimacyAxis::Might, 2.0))
            .effect(modifier(Modifier::Ruthless, 0.02)),
        EventChoice::new("note_it", "Note it"),
    ];
    card
}

fn omen_card(n: &mut Narrator, region: &Region, magnitude: f64) -> EventCard {
    let id = region.id;
    let mut card = n.card(
        format!("omen-r{}-t{}", id.0, n.tick),
        format!("An omen over {}", region.name),
        &[
            "A comet hangs over {name} for three nights.",
            "The river at {name} runs red at dawn.",
            "A white stag is seen in the woods of {name}.",
        ],
        &region.name,
        magnitude,
    );
    card.choices = vec![
        EventChoice::new("blessing", "Proclaim it a blessing")
            .effect(legitimacy(LegitimacyAxis::Faith, 3.0))
            .effect(local(RegionMetric::Piety, 4.0, id))
            .effect(domain(Domain::Faith, 0.02)),
        EventChoice::new("warning", "Heed it as a warning")
            .effect(local(RegionMetric::Heresy, -3.0, id))
            .effect(legitimacy(LegitimacyAxis::Lineage, 1.0)),
        EventChoice::new("dismiss", "Dismiss it"),
    ];
    card
}

/// Regions where an omen appears this tick, keyed by (seed, tick, region)
pub fn roll_omens(world: &WorldState, config: &SimulationConfig) -> Vec<RegionId> {
    let faith_bonus = if world.legitimacy.faith < config.omen_faith_threshold {
        config.omen_faith_bonus
    } else {
        0.0
    };
    world
        .regions
        .iter()
        .filter(|region| {
            let piety_bonus = if region.pressures.piety > config.omen_piety_threshold {
                config.omen_piety_bonus
            } else {
                0.0
            };
            let mut rng =
                SeededRng::keyed(world.seed, streams::OMENS, &[world.tick, region.id.0 as u64]);
            rng.chance(config.omen_base_chance + piety_bonus + faith_bonus)
        })
        .map(|region| region.id)
        .collect()
}

/// Cards for everything significant in the diff, unsorted
pub fn cards_from_diff(diff: &WorldDiff, next: &WorldState, threshold: f64) -> Vec<EventCard> {
    let mut n = Narrator::new(next);
    let mut cards = Vec::new();
    cards.extend(diff.resources.iter().filter_map(|s| resource_card(&mut n, s, threshold)));
    cards.extend(mood_card(&mut n, diff, threshold));
    cards.extend(
        diff.legitimacy
            .iter()
            .filter_map(|&(axis, delta)| legitimacy_card(&mut n, axis, delta, threshold)),
    );
    cards.extend(diff.regions.iter().filter_map(|s| region_card(&mut n, s)));
    cards.extend(diff.new_traits.iter().filter_map(|t| trait_card(&mut n, t)));
    cards.extend(diff.stance_changes.iter().map(|c| stance_card(&mut n, c)));
    cards
}

/// Derive at most `max_event_cards` cards from one tick, largest first
pub fn alchemize(prev: &WorldState, next: &WorldState, config: &SimulationConfig) -> Vec<EventCard> {
    let threshold = config.significance_threshold;
    let diff = WorldDiff::compute(prev, next, threshold);
    let mut cards = cards_from_diff(&diff, next, threshold);

    let mut n = Narrator {
        rng: SeededRng::keyed(next.seed, streams::OMENS, &[next.tick]),
        tick: next.tick,
    };
    for id in roll_omens(next, config) {
        if let Some(region) = next.region(id) {
            cards.push(omen_card(&mut n, region, threshold));
        }
    }

    cards.sort_by(|a, b| {
        OrderedFloat(b.magnitude)
            .cmp(&OrderedFloat(a.magnitude))
            .then_with(|| a.id.cmp(&b.id))
    });
    let found = cards.len();
    cards.truncate(config.max_event_cards);
    tracing::debug!(tick = next.tick, found, kept = cards.len(), "events alchemized");
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::apply::apply_action;
    use crate::world::region::test_region;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            omen_base_chance: 0.0,
            omen_piety_bonus: 0.0,
            omen_faith_bonus: 0.0,
            ..Default::default()
        }
    }

    fn pair() -> (WorldState, WorldState) {
        let mut prev = WorldState::empty(11);
        prev.resources.gold = 100.0;
        prev.regions.push(test_region(0));
        prev.regions.push(test_region(1));
        let mut next = prev.clone();
        next.tick = 1;
        (prev, next)
    }

    #[test]
    fn test_quiet_tick_yields_no_cards() {
        let (prev, next) = pair();
        assert!(alchemize(&prev, &next, &quiet_config()).is_empty());
    }

    #[test]
    fn test_riots_card_targets_region() {
        let (prev, mut next) = pair();
        next.regions[1].pressures.unrest += 12.0;
        let cards = alchemize(&prev, &next, &quiet_config());
        assert_eq!(cards.len(), 1);
        let card = &cards[0];
        assert_eq!(card.id, "riots-r1-t1");
        assert_eq!(card.magnitude, 12.0);
        assert!(card.text.contains("Region 1"));

        let disperse = card.choice("disperse").unwrap();
        assert!(disperse
            .effects
            .contains(&Effect::Region { metric: RegionMetric::Unrest, delta: -8.0, region: Some(RegionId(1)) }));
    }

    #[test]
    fn test_unknown_choice_is_invalid_argument() {
        let (prev, mut next) = pair();
        next.regions[0].pressures.heresy += 9.0;
        let cards = alchemize(&prev, &next, &quiet_config());
        assert!(matches!(cards[0].choice("nope"), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_at_most_three_cards_largest_first() {
        let (prev, mut next) = pair();
        next.regions[0].pressures.unrest += 6.0;
        next.regions[0].pressures.piety += 20.0;
        next.regions[1].pressures.heresy += 15.0;
        next.regions[1].pressures.lawfulness -= 8.0;
        next.set_trait(traits::CRISIS);
        let cards = alchemize(&prev, &next, &quiet_config());
        assert_eq!(cards.len(), 3);
        let magnitudes: Vec<f64> = cards.iter().map(|c| c.magnitude).collect();
        assert_eq!(magnitudes, vec![20.0, 15.0, 10.0]);
    }

    #[test]
    fn test_small_moves_are_ignored() {
        let (prev, mut next) = pair();
        next.regions[0].pressures.unrest += 4.0;
        next.resources.gold += 2.0;
        next.legitimacy.law -= 1.0;
        assert!(alchemize(&prev, &next, &quiet_config()).is_empty());
    }

    #[test]
    fn test_omens_replay_and_respect_certainty() {
        let (_, next) = pair();
        let config = SimulationConfig::default();
        assert_eq!(roll_omens(&next, &config), roll_omens(&next, &config));

        let certain = SimulationConfig { omen_base_chance: 1.0, ..Default::default() };
        assert_eq!(roll_omens(&next, &certain), vec![RegionId(0), RegionId(1)]);
        assert!(roll_omens(&next, &quiet_config()).is_empty());
    }

    #[test]
    fn test_omen_bonus_thresholds_come_from_config() {
        let (_, mut next) = pair();
        next.legitimacy.faith = 50.0;
        next.regions[0].pressures.piety = 60.0;
        let config = SimulationConfig {
            omen_base_chance: 0.0,
            omen_piety_bonus: 1.0,
            omen_piety_threshold: 55.0,
            omen_faith_bonus: 0.0,
            ..Default::default()
        };
        assert_eq!(roll_omens(&next, &config), vec![RegionId(0)]);

        let faithless = SimulationConfig {
            omen_base_chance: 0.0,
            omen_piety_bonus: 0.0,
            omen_faith_bonus: 1.0,
            omen_faith_threshold: 60.0,
            ..Default::default()
        };
        assert_eq!(roll_omens(&next, &faithless), vec![RegionId(0), RegionId(1)]);
    }

    #[test]
    fn test_choice_applies_like_an_action() {
        let (prev, mut next) = pair();
        next.regions[1].pressures.unrest += 12.0;
        next.resources.gold = 100.0;
        let cards = alchemize(&prev, &next, &quiet_config());
        let action = cards[0].choice("hear_grievances").unwrap().to_action(&cards[0].id);
        assert_eq!(action.id, "riots-r1-t1:hear_grievances");
        assert_eq!(action.source, ProposalSource::Event);

        let mut world = next.clone();
        apply_action(&mut world, &action, &mut SeededRng::new(0)).unwrap();
        assert_eq!(world.resources.gold, 85.0);
        assert_eq!(world.regions[1].pressures.unrest, 57.0);
        assert_eq!(world.legitimacy.law, 51.0);
    }

    #[test]
    fn test_text_is_deterministic() {
        let (prev, mut next) = pair();
        next.set_trait(traits::AT_WAR);
        let a = alchemize(&prev, &next, &quiet_config());
        let b = alchemize(&prev, &next, &quiet_config());
        assert_eq!(a, b);
        assert_eq!(a[0].id, "at-war-t1");
    }
}
