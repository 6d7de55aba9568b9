//! Many concurrent games, one engine each.
//!
//! Each session lives behind its own async mutex, so turns within a game are
//! serialised while different games (and their generator round trips) run
//! independently. The id map is only locked long enough to look up or insert
//! a handle.

use crate::engine::{EngineError, StartResponse, TurnEngine, TurnResponse};
use crate::narrator::Narrator;
use crate::session::{SessionConfig, SessionState};
use crate::suggestions::ActionSuggestion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Unique identifier for game sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

type SessionHandle = Arc<Mutex<TurnEngine>>;

/// Owns every live game.
pub struct SessionRegistry {
    narrator: Arc<dyn Narrator>,
    config: SessionConfig,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(narrator: Arc<dyn Narrator>, config: SessionConfig) -> Self {
        Self {
            narrator,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a game under a fresh id.
    ///
    /// The session is only registered once its opening scene is ready.
    pub async fn start_game(
        &self,
        player_name: &str,
    ) -> Result<(SessionId, StartResponse), RegistryError> {
        let mut engine = TurnEngine::new(self.narrator.clone(), self.config.clone());
        let response = engine.start_game(player_name).await?;

        let id = SessionId::new();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(engine)));
        tracing::debug!(session = %id, "session registered");

        Ok((id, response))
    }

    /// Start over in an existing session, discarding its history.
    pub async fn restart(
        &self,
        id: SessionId,
        player_name: &str,
    ) -> Result<StartResponse, RegistryError> {
        let handle = self.handle(id).await?;
        let mut engine = handle.lock().await;
        Ok(engine.start_game(player_name).await?)
    }

    pub async fn respond(
        &self,
        id: SessionId,
        action: &str,
    ) -> Result<TurnResponse, RegistryError> {
        let handle = self.handle(id).await?;
        let mut engine = handle.lock().await;
        Ok(engine.respond_to_event(action).await?)
    }

    pub async fn suggest(&self, id: SessionId) -> Result<Vec<ActionSuggestion>, RegistryError> {
        let handle = self.handle(id).await?;
        let engine = handle.lock().await;
        Ok(engine.suggest_actions().await?)
    }

    /// A copy of the session's current state.
    pub async fn snapshot(&self, id: SessionId) -> Result<SessionState, RegistryError> {
        let handle = self.handle(id).await?;
        let engine = handle.lock().await;
        engine
            .session()
            .cloned()
            .ok_or(RegistryError::Engine(EngineError::NoActiveSession))
    }

    /// Drop a session. Returns whether it existed.
    pub async fn end(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(session = %id, "session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    async fn handle(&self, id: SessionId) -> Result<SessionHandle, RegistryError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RegistryError::SessionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::OfflineNarrator;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(OfflineNarrator::new()), SessionConfig::default())
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = registry();
        let (ava, _) = registry.start_game("Ava").await.unwrap();
        let (bo, _) = registry.start_game("Bo").await.unwrap();
        assert_ne!(ava, bo);
        assert_eq!(registry.len().await, 2);

        registry.respond(ava, "look around").await.unwrap();
        registry.respond(ava, "walk on").await.unwrap();
        registry.respond(bo, "wait").await.unwrap();

        let ava_state = registry.snapshot(ava).await.unwrap();
        let bo_state = registry.snapshot(bo).await.unwrap();
        assert_eq!(ava_state.player_name, "Ava");
        assert_eq!(ava_state.history().len(), 2);
        assert_eq!(bo_state.history().len(), 1);
        assert_eq!(bo_state.round(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let registry = registry();
        let id = SessionId::new();
        assert_eq!(
            registry.respond(id, "hello").await.unwrap_err(),
            RegistryError::SessionNotFound(id)
        );
        assert!(!registry.end(id).await);
    }

    #[tokio::test]
    async fn test_restart_and_end() {
        let registry = registry();
        let (id, _) = registry.start_game("Ava").await.unwrap();
        registry.respond(id, "fight").await.unwrap();

        registry.restart(id, "Ava").await.unwrap();
        let state = registry.snapshot(id).await.unwrap();
        assert_eq!(state.round(), 1);
        assert!(state.history().is_empty());

        assert!(registry.end(id).await);
        assert!(registry.is_empty().await);
        assert!(matches!(
            registry.snapshot(id).await,
            Err(RegistryError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_engine_errors_pass_through() {
        let registry = registry();
        assert_eq!(
            registry.start_game("  ").await.unwrap_err(),
            RegistryError::Engine(EngineError::EmptyPlayerName)
        );
        assert!(registry.is_empty().await);

        let (id, _) = registry.start_game("Ava").await.unwrap();
        assert_eq!(
            registry.respond(id, "").await.unwrap_err(),
            RegistryError::Engine(EngineError::EmptyAction)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_turns_are_serialised() {
        let registry = Arc::new(registry());
        let (id, _) = registry.start_game("Ava").await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.respond(id, &format!("step {i}")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let state = registry.snapshot(id).await.unwrap();
        assert_eq!(state.round(), 21);
        let rounds: Vec<u32> = state.history().iter().map(|r| r.round).collect();
        assert_eq!(rounds, (2..=21).collect::<Vec<_>>());
    }
}
