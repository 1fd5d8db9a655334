//! GameSession - one player's run from ambition text to the current tick
//!
//! Owns every piece of mutable state for a run. The rule base is shared
//! read-only across sessions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ambition::interpreter::interpret;
use crate::ambition::mutation::{mutate, DreamEvent};
use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::rng::{seed_from_text, streams, SeededRng};
use crate::core::types::Tick;
use crate::events::alchemizer::{alchemize, EventCard};
use crate::factions::planning::FactionAction;
use crate::factions::roster::FactionRoster;
use crate::goals::generator::{append_dream_node, generate_graph};
use crate::goals::graph::RequirementGraph;
use crate::planner::proposal::ActionProposal;
use crate::planner::{find_proposal, plan};
use crate::rules::knowledge::KnowledgeBase;
use crate::simulation::apply::{apply_action, check_affordable, FiredRisk};
use crate::simulation::tick::step;
use crate::world::generation::generate_world;
use crate::world::state::WorldState;

/// Everything that happened in one `advance`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Tick reached after the advance
    pub tick: Tick,
    pub chosen: Option<String>,
    pub fired_risks: Vec<FiredRisk>,
    pub faction_actions: Vec<FactionAction>,
    pub dreams: Vec<DreamEvent>,
    /// Goal nodes added by dreams
    pub new_goals: Vec<String>,
    pub events: Vec<EventCard>,
    pub proposals: Vec<ActionProposal>,
}

/// Outcome of answering a pending event card
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventResolution {
    pub card_id: String,
    pub choice_id: String,
    pub fired_risks: Vec<FiredRisk>,
    pub dreams: Vec<DreamEvent>,
    pub new_goals: Vec<String>,
    pub proposals: Vec<ActionProposal>,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    pub(crate) seed: u64,
    pub(crate) config: SimulationConfig,
    pub(crate) kb: Arc<KnowledgeBase>,
    pub(crate) profile: AmbitionProfile,
    pub(crate) graph: RequirementGraph,
    pub(crate) world: WorldState,
    pub(crate) roster: FactionRoster,
    pub(crate) proposals: Vec<ActionProposal>,
    pub(crate) pending_events: Vec<EventCard>,
}

impl GameSession {
    /// Interpret the ambition, build the world and goals, and offer the
    /// first proposals. Without a seed, the seed is derived from the text.
    pub fn start(text: &str, seed: Option<u64>, kb: Arc<KnowledgeBase>, config: SimulationConfig) -> Self {
        let seed = seed.unwrap_or_else(|| seed_from_text(text));
        let profile = interpret(text, &config);
        let world = generate_world(&profile, seed, &config);
        let graph = generate_graph(&profile, &mut SeededRng::stream(seed, streams::GOALS), &config);
        let roster = FactionRoster::generate(&world, &config);

        let mut session = Self {
            seed,
            config,
            kb,
            profile,
            graph,
            world,
            roster,
            proposals: Vec::new(),
            pending_events: Vec::new(),
        };
        session.proposals = session.replan();
        tracing::info!(
            seed,
            regions = session.world.regions.len(),
            factions = session.world.factions.len(),
            goals = session.graph.len(),
            dominant = %session.profile.dominant(),
            "session started"
        );
        session
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> Tick {
        self.world.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn profile(&self) -> &AmbitionProfile {
        &self.profile
    }

    pub fn graph(&self) -> &RequirementGraph {
        &self.graph
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn roster(&self) -> &FactionRoster {
        &self.roster
    }

    /// Proposals offered for the current tick
    pub fn proposals(&self) -> &[ActionProposal] {
        &self.proposals
    }

    pub fn pending_events(&self) -> &[EventCard] {
        &self.pending_events
    }

    /// Recompute proposals from current state without storing them
    pub fn replan(&self) -> Vec<ActionProposal> {
        plan(&self.graph, &self.world, &self.profile, &self.kb, &self.config)
    }

    /// Advance one tick, applying the chosen proposal if any.
    ///
    /// An unknown id fails with `InvalidArgument` and an unaffordable one with
    /// `InsufficientResources`; in both cases nothing changes.
    pub fn advance(&mut self, choice: Option<&str>) -> Result<TurnReport> {
        let chosen = match choice {
            Some(id) => {
                let action = find_proposal(&self.proposals, id)?;
                check_affordable(&self.world, &action.id, &action.cost)?;
                vec![action.clone()]
            }
            None => Vec::new(),
        };

        let tick = self.world.tick;
        let (next, outcome) = step(&self.world, &chosen, Some(&mut self.roster), &self.config);

        let mut dreams = Vec::new();
        let mut new_goals = Vec::new();
        for action in chosen.iter().filter(|a| outcome.applied.contains(&a.id)) {
            let (d, g) = self.absorb(action, tick)?;
            dreams.extend(d);
            new_goals.extend(g);
        }

        let events = alchemize(&self.world, &next, &self.config);
        self.world = next;
        // Unanswered cards lapse when the next tick resolves
        self.pending_events = events.clone();
        self.proposals = self.replan();

        tracing::debug!(
            tick = self.world.tick,
            chosen = choice.unwrap_or("-"),
            dreams = dreams.len(),
            events = events.len(),
            proposals = self.proposals.len(),
            "turn advanced"
        );

        Ok(TurnReport {
            tick: self.world.tick,
            chosen: choice.map(str::to_string),
            fired_risks: outcome.fired_risks,
            faction_actions: outcome.faction_actions,
            dreams,
            new_goals,
            events,
            proposals: self.proposals.clone(),
        })
    }

    /// Answer a pending event card. The choice is applied immediately,
    /// without advancing the tick, and the card is removed.
    pub fn resolve_event(&mut self, card_id: &str, choice_id: &str) -> Result<EventResolution> {
        let card = self
            .pending_events
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| SimError::InvalidArgument(format!("no pending event '{}'", card_id)))?;
        let action = card.choice(choice_id)?.to_action(&card.id);

        let tick = self.world.tick;
        let mut rng = SeededRng::keyed(
            self.seed,
            streams::EVENTS,
            &[tick, seed_from_text(&action.id)],
        );
        let fired_risks = apply_action(&mut self.world, &action, &mut rng)?;
        self.pending_events.retain(|c| c.id != card_id);

        let (dreams, new_goals) = self.absorb(&action, tick)?;
        self.proposals = self.replan();

        Ok(EventResolution {
            card_id: card_id.to_string(),
            choice_id: choice_id.to_string(),
            fired_risks,
            dreams,
            new_goals,
            proposals: self.proposals.clone(),
        })
    }

    /// Mutate the profile for an applied action, spawn dream goals, and
    /// mark the goal the action satisfies.
    fn absorb(&mut self, action: &ActionProposal, tick: Tick) -> Result<(Vec<DreamEvent>, Vec<String>)> {
        let outcome = mutate(&self.profile, action, tick, &self.config);
        self.profile = outcome.profile;

        if let Some(node) = &action.satisfies {
            if self.graph.mark_met(node)? {
                tracing::info!(goal = %node, tick, "goal met");
            }
        }

        let mut new_goals = Vec::new();
        for dream in &outcome.dreams {
            let mut rng = SeededRng::keyed(
                self.seed,
                streams::DREAMS,
                &[dream.tick, dream.domain as u64, (dream.threshold * 1000.0).round() as u64],
            );
            for id in append_dream_node(&mut self.graph, dream.domain, dream.threshold, dream.tick, &mut rng) {
                tracing::info!(goal = %id, domain = %dream.domain, threshold = dream.threshold, "dream added a goal");
                new_goals.push(id);
            }
        }
        Ok((outcome.dreams, new_goals))
    }
}
