//! Session snapshots as JSON
//!
//! Every map reachable from a snapshot is ordered, so two equal sessions
//! serialize to the same bytes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ambition::profile::AmbitionProfile;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::Tick;
use crate::events::alchemizer::EventCard;
use crate::factions::roster::FactionRoster;
use crate::goals::graph::RequirementGraph;
use crate::planner::proposal::ActionProposal;
use crate::rules::knowledge::KnowledgeBase;
use crate::session::game::GameSession;
use crate::world::state::WorldState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub tick: Tick,
    pub config: SimulationConfig,
    pub profile: AmbitionProfile,
    pub graph: RequirementGraph,
    pub world: WorldState,
    pub roster: FactionRoster,
    pub proposals: Vec<ActionProposal>,
    pub pending_events: Vec<EventCard>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), tick = self.tick, "snapshot saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl GameSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed,
            tick: self.world.tick,
            config: self.config.clone(),
            profile: self.profile.clone(),
            graph: self.graph.clone(),
            world: self.world.clone(),
            roster: self.roster.clone(),
            proposals: self.proposals.clone(),
            pending_events: self.pending_events.clone(),
        }
    }

    /// Rebuild a session from a snapshot. The rule base is not part of the
    /// snapshot and must be the one the session was started with.
    pub fn restore(snapshot: SessionSnapshot, kb: Arc<KnowledgeBase>) -> Result<Self> {
        if snapshot.tick != snapshot.world.tick {
            return Err(SimError::InvalidArgument(format!(
                "snapshot tick {} does not match world tick {}",
                snapshot.tick, snapshot.world.tick
            )));
        }
        if snapshot.seed != snapshot.world.seed {
            return Err(SimError::InvalidArgument(format!(
                "snapshot seed {} does not match world seed {}",
                snapshot.seed, snapshot.world.seed
            )));
        }
        Ok(Self {
            seed: snapshot.seed,
            config: snapshot.config,
            kb,
            profile: snapshot.profile,
            graph: snapshot.graph,
            world: snapshot.world,
            roster: snapshot.roster,
            proposals: snapshot.proposals,
            pending_events: snapshot.pending_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::start(
            "I seek wealth and glory",
            Some(5150),
            Arc::new(KnowledgeBase::default()),
            SimulationConfig::default(),
        )
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let mut s = session();
        s.advance(None).unwrap();
        let snap = s.snapshot();
        let json = snap.to_json().unwrap();
        let back = SessionSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snap);
        assert_eq!(back.to_json().unwrap(), json);
    }

    #[test]
    fn test_mismatched_tick_is_rejected() {
        let mut snap = session().snapshot();
        snap.tick = 9;
        let err = GameSession::restore(snap, Arc::new(KnowledgeBase::default())).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
    }

    #[test]
    fn test_garbage_json_is_serde_error() {
        assert!(matches!(SessionSnapshot::from_json("{ nope"), Err(SimError::SerdeError(_))));
    }
}
