//! The turn engine.
//!
//! `TurnEngine` owns at most one [`SessionState`]. With no session it is
//! idle; `start_game` (re)creates the session and every `respond_to_event`
//! resolves one round:
//!
//! 1. advance the round
//! 2. classify the action to a stat
//! 3. roll the check
//! 4. apply the stat consequence
//! 5. record the turn against the scene it answered
//! 6. build the narrator context
//! 7. ask the narrator for the next scene (fallback text on failure)
//!
//! There is no terminal state. Reaching zero health ends nothing.

use crate::check::{consequence, CheckOutcome, CheckResolver};
use crate::classify::classify;
use crate::narrator::Narrator;
use crate::session::{SessionConfig, SessionState};
use crate::stats::{StatName, Stats};
use crate::suggestions::{parse_suggestions, ActionSuggestion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from engine operations.
///
/// Generator failures never show up here; they are absorbed with fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("No active session - start a game first")]
    NoActiveSession,

    #[error("Action text is empty")]
    EmptyAction,

    #[error("Player name is empty")]
    EmptyPlayerName,
}

/// Result of starting a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub message: String,
    pub event: String,
    pub inventory: Vec<String>,
    pub stats: Stats,
}

/// Result of one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResponse {
    /// The new current scene.
    pub outcome: String,
    pub inventory: Vec<String>,
    pub stats: Stats,
    pub stat_used: StatName,
    pub success: Option<bool>,
    pub triggered: bool,
}

/// Drives one game session.
pub struct TurnEngine<R: Rng = StdRng> {
    narrator: Arc<dyn Narrator>,
    config: SessionConfig,
    resolver: CheckResolver,
    rng: R,
    session: Option<SessionState>,
}

impl TurnEngine<StdRng> {
    /// Create an idle engine with an entropy-seeded RNG.
    pub fn new(narrator: Arc<dyn Narrator>, config: SessionConfig) -> Self {
        Self::with_rng(narrator, config, StdRng::from_entropy())
    }

    /// Create an idle engine whose rolls repeat for a given seed.
    pub fn seeded(narrator: Arc<dyn Narrator>, config: SessionConfig, seed: u64) -> Self {
        Self::with_rng(narrator, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TurnEngine<R> {
    /// Create an idle engine with an explicit random source.
    pub fn with_rng(narrator: Arc<dyn Narrator>, config: SessionConfig, rng: R) -> Self {
        let resolver = config.resolver();
        Self {
            narrator,
            config,
            resolver,
            rng,
            session: None,
        }
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn is_in_progress(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new game, discarding any session in progress.
    pub async fn start_game(&mut self, player_name: &str) -> Result<StartResponse, EngineError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(EngineError::EmptyPlayerName);
        }

        let opening = match self.narrator.generate_opening_scene(player_name).await {
            Ok(scene) => scene,
            Err(e) => {
                tracing::warn!(error = %e, "opening scene generation failed, using fallback");
                self.config.fallback_opening_scene.clone()
            }
        };

        let session = SessionState::new(player_name, &self.config, opening);
        tracing::info!(player = %session.player_name, "game started");

        let response = StartResponse {
            message: format!(
                "The adventure begins! Welcome, {}. Round {} starts now.",
                session.player_name,
                session.round()
            ),
            event: session.current_event.clone(),
            inventory: session.inventory.clone(),
            stats: session.stats,
        };

        self.session = Some(session);
        Ok(response)
    }

    /// Resolve one player action and move the story forward.
    pub async fn respond_to_event(&mut self, action: &str) -> Result<TurnResponse, EngineError> {
        let action = action.trim();
        if action.is_empty() {
            return Err(EngineError::EmptyAction);
        }
        let session = self.session.as_mut().ok_or(EngineError::NoActiveSession)?;

        let round = session.advance_round();
        let stat_used = classify(action, &mut self.rng);
        let stat_value = session.stats.get(stat_used);
        let outcome = self.resolver.resolve(stat_value, &mut self.rng);

        if let Some(change) = consequence(stat_used, outcome) {
            session.stats.adjust(change.stat, change.delta);
        }

        session.record_turn(action, stat_used, outcome);
        tracing::debug!(
            round,
            stat = %stat_used,
            outcome = outcome.label(),
            "turn resolved"
        );

        let context = build_context(
            &session.current_event,
            action,
            stat_used,
            self.resolver.success_chance(stat_value),
            outcome,
            &session.stats,
        );

        let scene = match self.narrator.continue_scene(&context).await {
            Ok(scene) => scene,
            Err(e) => {
                tracing::warn!(error = %e, round, "scene generation failed, using fallback");
                self.config.fallback_scene.clone()
            }
        };
        session.current_event = scene;

        Ok(TurnResponse {
            outcome: session.current_event.clone(),
            inventory: session.inventory.clone(),
            stats: session.stats,
            stat_used,
            success: outcome.success(),
            triggered: outcome.triggered(),
        })
    }

    /// Ask the narrator for actions that fit the current scene.
    ///
    /// Returns an empty list if the narrator fails.
    pub async fn suggest_actions(&self) -> Result<Vec<ActionSuggestion>, EngineError> {
        let session = self.session.as_ref().ok_or(EngineError::NoActiveSession)?;

        match self.narrator.suggest_actions(&session.current_event).await {
            Ok(text) => Ok(parse_suggestions(&text, &session.stats)),
            Err(e) => {
                tracing::warn!(error = %e, "action suggestions failed");
                Ok(Vec::new())
            }
        }
    }
}

/// The narrator's view of a resolved turn.
fn build_context(
    scene: &str,
    action: &str,
    stat: StatName,
    chance: f64,
    outcome: CheckOutcome,
    stats: &Stats,
) -> String {
    format!(
        "Scene: {scene}\n\
         Player action: {action}\n\
         Stat tested: {stat} (success chance {percent}%)\n\
         Result: {result}\n\
         Current stats: {stats}",
        percent = (chance * 100.0).round() as i32,
        result = outcome.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrator::{FALLBACK_OPENING_SCENE, FALLBACK_SCENE};
    use crate::testing::MockNarrator;
    use rand::rngs::mock::StepRng;

    fn engine(narrator: Arc<MockNarrator>) -> TurnEngine {
        TurnEngine::seeded(narrator, SessionConfig::default(), 11)
    }

    #[tokio::test]
    async fn test_respond_before_start_is_rejected() {
        let mut engine = engine(Arc::new(MockNarrator::new()));
        assert!(!engine.is_in_progress());
        assert_eq!(
            engine.respond_to_event("I fight").await,
            Err(EngineError::NoActiveSession)
        );
        assert_eq!(
            engine.suggest_actions().await,
            Err(EngineError::NoActiveSession)
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_mutation() {
        let mut engine = engine(Arc::new(MockNarrator::new()));
        assert_eq!(
            engine.start_game("   ").await,
            Err(EngineError::EmptyPlayerName)
        );
        assert!(!engine.is_in_progress());

        engine.start_game("Ava").await.unwrap();
        assert_eq!(
            engine.respond_to_event(" \t").await,
            Err(EngineError::EmptyAction)
        );
        let session = engine.session().unwrap();
        assert_eq!(session.round(), 1);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_start_game_uses_opening_scene() {
        let narrator = Arc::new(MockNarrator::new().with_opening("Fog over the moor."));
        let mut engine = engine(narrator);

        let response = engine.start_game("Ava").await.unwrap();
        assert_eq!(response.event, "Fog over the moor.");
        assert!(response.message.contains("Ava"));
        assert_eq!(response.stats, Stats::default());
        assert!(response.inventory.is_empty());

        let session = engine.session().unwrap();
        assert_eq!(session.round(), 1);
        assert_eq!(session.current_event, "Fog over the moor.");
    }

    #[tokio::test]
    async fn test_start_game_falls_back_on_failure() {
        let mut engine = engine(Arc::new(MockNarrator::failing()));
        let response = engine.start_game("Ava").await.unwrap();
        assert_eq!(response.event, FALLBACK_OPENING_SCENE);
        assert!(engine.is_in_progress());
    }

    #[tokio::test]
    async fn test_turn_success_raises_stat() {
        // Every draw is 0.0: the check triggers and succeeds.
        let narrator = Arc::new(MockNarrator::new().with_scenes(["The guard steps aside."]));
        let mut engine =
            TurnEngine::with_rng(narrator.clone(), SessionConfig::default(), StepRng::new(0, 0));
        engine.start_game("Ava").await.unwrap();

        let turn = engine.respond_to_event("I try to charm the guard").await.unwrap();
        assert_eq!(turn.stat_used, StatName::Charisma);
        assert!(turn.triggered);
        assert_eq!(turn.success, Some(true));
        assert_eq!(turn.stats.charisma, 6);
        assert_eq!(turn.stats.health, 10);
        assert_eq!(turn.outcome, "The guard steps aside.");

        let context = narrator.contexts().pop().unwrap();
        assert!(context.contains("Player action: I try to charm the guard"));
        assert!(context.contains("Stat tested: charisma (success chance 50%)"));
        assert!(context.contains("Result: success"));
        assert!(context.contains("charisma=6"));
    }

    #[tokio::test]
    async fn test_turn_failure_costs_health() {
        let config = SessionConfig::default().with_starting_stats(Stats {
            health: 1,
            courage: 0,
            ..Stats::default()
        });
        let mut engine =
            TurnEngine::with_rng(Arc::new(MockNarrator::new()), config, StepRng::new(0, 0));
        engine.start_game("Ava").await.unwrap();

        let turn = engine.respond_to_event("fight the bear").await.unwrap();
        assert_eq!(turn.success, Some(false));
        assert_eq!(turn.stats.health, 0);
        assert_eq!(turn.stats.courage, 0);

        // Health stays at the floor and the game goes on.
        let turn = engine.respond_to_event("fight the bear again").await.unwrap();
        assert_eq!(turn.stats.health, 0);
        assert_eq!(engine.session().unwrap().round(), 3);
    }

    #[tokio::test]
    async fn test_untriggered_turn_changes_nothing() {
        // Every draw is just under 1.0: never triggers.
        let mut engine = TurnEngine::with_rng(
            Arc::new(MockNarrator::new()),
            SessionConfig::default(),
            StepRng::new(u64::MAX, 0),
        );
        engine.start_game("Ava").await.unwrap();

        let turn = engine.respond_to_event("study the map").await.unwrap();
        assert!(!turn.triggered);
        assert_eq!(turn.success, None);
        assert_eq!(turn.stats, Stats::default());
    }

    #[tokio::test]
    async fn test_record_holds_pre_turn_scene() {
        let narrator = Arc::new(
            MockNarrator::new()
                .with_opening("Opening.")
                .with_scenes(["Second.", "Third."]),
        );
        let mut engine = engine(narrator);
        engine.start_game("Ava").await.unwrap();
        engine.respond_to_event("look around").await.unwrap();
        engine.respond_to_event("walk on").await.unwrap();

        let history = engine.session().unwrap().history();
        assert_eq!(history[0].event, "Opening.");
        assert_eq!(history[1].event, "Second.");
        assert_eq!(engine.session().unwrap().current_event, "Third.");
    }

    #[tokio::test]
    async fn test_scene_failure_uses_fallback_and_still_records() {
        let mut engine = engine(Arc::new(MockNarrator::new().with_opening("Start.")));
        engine.start_game("Ava").await.unwrap();

        // The mock ran out of scripted scenes and now fails.
        let turn = engine.respond_to_event("I sneak past").await.unwrap();
        assert_eq!(turn.outcome, FALLBACK_SCENE);
        assert_eq!(turn.stat_used, StatName::Luck);
        assert_eq!(engine.session().unwrap().history().len(), 1);
    }

    #[tokio::test]
    async fn test_configured_fallbacks_replace_defaults() {
        let config = SessionConfig::default()
            .with_fallback_opening_scene("The tavern is quiet.")
            .with_fallback_scene("Time passes.");
        let mut engine = TurnEngine::seeded(Arc::new(MockNarrator::failing()), config, 3);

        let start = engine.start_game("Ava").await.unwrap();
        assert_eq!(start.event, "The tavern is quiet.");

        let turn = engine.respond_to_event("I fight").await.unwrap();
        assert_eq!(turn.outcome, "Time passes.");
        assert_eq!(
            engine.session().unwrap().history()[0].event,
            "The tavern is quiet."
        );
    }

    #[tokio::test]
    async fn test_suggest_actions_prices_with_current_stats() {
        let narrator = Arc::new(
            MockNarrator::new().with_suggestions("1. Bluff | stat: charisma | a free drink"),
        );
        let mut engine = engine(narrator);
        engine.start_game("Ava").await.unwrap();

        let suggestions = engine.suggest_actions().await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action, "Bluff");
        assert_eq!(suggestions[0].chance, 50);
    }

    #[tokio::test]
    async fn test_suggest_actions_failure_is_empty() {
        let mut engine = engine(Arc::new(MockNarrator::failing()));
        engine.start_game("Ava").await.unwrap();
        assert!(engine.suggest_actions().await.unwrap().is_empty());
    }

    #[test]
    fn test_build_context() {
        let context = build_context(
            "A cave.",
            "enter",
            StatName::Courage,
            0.5,
            CheckOutcome::NotTriggered,
            &Stats::default(),
        );
        assert_eq!(
            context,
            "Scene: A cave.\n\
             Player action: enter\n\
             Stat tested: courage (success chance 50%)\n\
             Result: no check\n\
             Current stats: health=10, courage=5, wisdom=5, charisma=5, luck=5"
        );
    }
}
