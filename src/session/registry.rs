//! In-memory session registry
//!
//! Sessions are independent; the registry only routes calls by id. Callers
//! that share a registry across threads must serialize access themselves.

use std::sync::Arc;

use ahash::AHashMap;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::rules::knowledge::KnowledgeBase;
use crate::session::game::{EventResolution, GameSession, TurnReport};
use crate::session::snapshot::SessionSnapshot;

/// Unique identifier for sessions
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SessionRegistry {
    kb: Arc<KnowledgeBase>,
    config: SimulationConfig,
    sessions: AHashMap<SessionId, GameSession>,
}

impl SessionRegistry {
    pub fn new(kb: Arc<KnowledgeBase>, config: SimulationConfig) -> Self {
        Self {
            kb,
            config,
            sessions: AHashMap::new(),
        }
    }

    /// Start a session and return its id
    pub fn create(&mut self, text: &str, seed: Option<u64>) -> SessionId {
        let id = SessionId::new();
        let session = GameSession::start(text, seed, Arc::clone(&self.kb), self.config.clone());
        tracing::debug!(session = %id, seed = session.seed(), "session registered");
        self.sessions.insert(id, session);
        id
    }

    /// Register a session rebuilt from a snapshot
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<SessionId> {
        let session = GameSession::restore(snapshot, Arc::clone(&self.kb))?;
        let id = SessionId::new();
        self.sessions.insert(id, session);
        Ok(id)
    }

    pub fn get(&self, id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&id)
    }

    fn get_mut(&mut self, id: SessionId) -> Result<&mut GameSession> {
        self.sessions
            .get_mut(&id)
            .ok_or_else(|| SimError::InvalidArgument(format!("unknown session {}", id)))
    }

    pub fn advance(&mut self, id: SessionId, choice: Option<&str>) -> Result<TurnReport> {
        self.get_mut(id)?.advance(choice)
    }

    pub fn resolve_event(&mut self, id: SessionId, card_id: &str, choice_id: &str) -> Result<EventResolution> {
        self.get_mut(id)?.resolve_event(card_id, choice_id)
    }

    pub fn snapshot(&self, id: SessionId) -> Result<SessionSnapshot> {
        self.get(id)
            .map(GameSession::snapshot)
            .ok_or_else(|| SimError::InvalidArgument(format!("unknown session {}", id)))
    }

    pub fn remove(&mut self, id: SessionId) -> Option<GameSession> {
        self.sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(KnowledgeBase::default()), SimulationConfig::default())
    }

    #[test]
    fn test_create_advance_remove() {
        let mut reg = registry();
        let id = reg.create("I crave power", Some(1));
        assert_eq!(reg.len(), 1);

        let report = reg.advance(id, None).unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(reg.get(id).unwrap().tick(), 1);

        assert!(reg.remove(id).is_some());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unknown_session_is_invalid_argument() {
        let mut reg = registry();
        let err = reg.advance(SessionId::new(), None).unwrap_err();
        assert!(matches!(err, SimError::InvalidArgument(_)));
        assert!(reg.snapshot(SessionId::new()).is_err());
    }

    #[test]
    fn test_restored_session_gets_new_id() {
        let mut reg = registry();
        let id = reg.create("faith", Some(2));
        let snap = reg.snapshot(id).unwrap();
        let copy = reg.restore(snap.clone()).unwrap();
        assert_ne!(id, copy);
        assert_eq!(reg.snapshot(copy).unwrap(), snap);
    }
}
