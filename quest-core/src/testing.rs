//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `MockNarrator` for deterministic testing without API calls
//! - `TestHarness` for scripted game scenarios
//! - Assertion helpers for verifying game state

use crate::cards::CardWriter;
use crate::engine::{EngineError, StartResponse, TurnEngine, TurnResponse};
use crate::narrator::{Narrator, NarratorError};
use crate::session::{SessionConfig, SessionState};
use crate::stats::StatName;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

const DEFAULT_OPENING: &str = "The story begins.";

#[derive(Debug, Default)]
struct Script {
    opening: Option<String>,
    scenes: VecDeque<String>,
    suggestions: Option<String>,
    cards: VecDeque<String>,
    contexts: Vec<String>,
    card_requests: Vec<usize>,
}

/// A narrator that returns scripted output.
///
/// Scenes and card batches are consumed in order; once a queue is empty the
/// matching call fails, which exercises the engine's fallback path. A
/// narrator built with [`MockNarrator::failing`] fails every call.
#[derive(Debug, Default)]
pub struct MockNarrator {
    script: Mutex<Script>,
    fail_all: bool,
}

impl MockNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A narrator whose every call errors.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn with_opening(self, text: impl Into<String>) -> Self {
        self.script().opening = Some(text.into());
        self
    }

    pub fn with_scenes<I, S>(self, scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue_scenes(scenes);
        self
    }

    pub fn with_suggestions(self, text: impl Into<String>) -> Self {
        self.script().suggestions = Some(text.into());
        self
    }

    /// Queue a raw card-list reply for the next `generate_cards` call.
    pub fn with_cards(self, text: impl Into<String>) -> Self {
        self.script().cards.push_back(text.into());
        self
    }

    /// Add scenes to the end of the queue.
    pub fn queue_scenes<I, S>(&self, scenes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.script()
            .scenes
            .extend(scenes.into_iter().map(Into::into));
    }

    /// Every context passed to `continue_scene`, oldest first.
    pub fn contexts(&self) -> Vec<String> {
        self.script().contexts.clone()
    }

    /// The `count` of every `generate_cards` call, oldest first.
    pub fn card_requests(&self) -> Vec<usize> {
        self.script().card_requests.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        // A panicking test poisons the lock; the script is still usable.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failing(&self) -> Result<(), NarratorError> {
        if self.fail_all {
            Err(NarratorError::Format("mock narrator set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn generate_opening_scene(&self, _player_name: &str) -> Result<String, NarratorError> {
        self.check_failing()?;
        Ok(self
            .script()
            .opening
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENING.to_string()))
    }

    async fn continue_scene(&self, context: &str) -> Result<String, NarratorError> {
        self.check_failing()?;
        let mut script = self.script();
        script.contexts.push(context.to_string());
        script
            .scenes
            .pop_front()
            .ok_or_else(|| NarratorError::Format("no more scripted scenes".to_string()))
    }

    async fn suggest_actions(&self, _scene: &str) -> Result<String, NarratorError> {
        self.check_failing()?;
        self.script()
            .suggestions
            .clone()
            .ok_or_else(|| NarratorError::Format("no scripted suggestions".to_string()))
    }
}

#[async_trait]
impl CardWriter for MockNarrator {
    async fn generate_cards(
        &self,
        count: usize,
        _inspiration: &[String],
    ) -> Result<String, NarratorError> {
        self.check_failing()?;
        let mut script = self.script();
        script.card_requests.push(count);
        script
            .cards
            .pop_front()
            .ok_or_else(|| NarratorError::Format("no more scripted cards".to_string()))
    }
}

/// Test harness for running game scenarios against a mock narrator.
pub struct TestHarness {
    pub narrator: Arc<MockNarrator>,
    pub engine: TurnEngine,
}

impl TestHarness {
    /// A harness with default config and a fixed seed.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let narrator = Arc::new(MockNarrator::new());
        let engine = TurnEngine::seeded(narrator.clone(), config, 0x5eed);
        Self { narrator, engine }
    }

    /// Queue a scene for the next turn.
    pub fn expect_scene(&mut self, text: impl Into<String>) -> &mut Self {
        self.narrator.queue_scenes([text.into()]);
        self
    }

    pub async fn start(&mut self, player_name: &str) -> StartResponse {
        match self.engine.start_game(player_name).await {
            Ok(response) => response,
            Err(e) => panic!("start_game failed: {e}"),
        }
    }

    pub async fn act(&mut self, action: &str) -> Result<TurnResponse, EngineError> {
        self.engine.respond_to_event(action).await
    }

    /// The active session; panics when the engine is idle.
    #[track_caller]
    pub fn session(&self) -> &SessionState {
        match self.engine.session() {
            Some(session) => session,
            None => panic!("Expected an active session"),
        }
    }

    pub fn round(&self) -> u32 {
        self.session().round()
    }

    pub fn history_len(&self) -> usize {
        self.session().history().len()
    }

    pub fn stat(&self, stat: StatName) -> i32 {
        self.session().stats.get(stat)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the session is at the given round.
#[track_caller]
pub fn assert_round(harness: &TestHarness, round: u32) {
    let actual = harness.round();
    assert_eq!(actual, round, "Expected round {round}, got {actual}");
}

/// Assert history rounds run 2, 3, ... with no gaps.
#[track_caller]
pub fn assert_history_contiguous(harness: &TestHarness) {
    for (i, record) in harness.session().history().iter().enumerate() {
        let expected = i as u32 + 2;
        assert_eq!(
            record.round, expected,
            "History entry {i} has round {}, expected {expected}",
            record.round
        );
    }
}

/// Assert health never went below zero.
#[track_caller]
pub fn assert_health_in_bounds(harness: &TestHarness) {
    let health = harness.stat(StatName::Health);
    assert!(health >= 0, "Health dropped below zero: {health}");
}
