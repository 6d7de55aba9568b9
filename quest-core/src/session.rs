//! Session state - the record of one game in progress.

use crate::check::{CheckOutcome, CheckResolver, DEFAULT_STAT_SCALE, DEFAULT_TRIGGER_CHANCE};
use crate::narrator::{FALLBACK_OPENING_SCENE, FALLBACK_SCENE};
use crate::stats::{StatName, Stats};
use serde::{Deserialize, Serialize};

/// Configuration for new game sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where every new session begins.
    pub starting_location: String,

    /// Stats a new character starts with.
    pub starting_stats: Stats,

    /// Items a new character starts with.
    pub starting_inventory: Vec<String>,

    /// Probability that an action triggers a check.
    pub trigger_chance: f64,

    /// Stat value at which checks always succeed.
    pub stat_scale: f64,

    /// Opening scene used when the narrator fails.
    pub fallback_opening_scene: String,

    /// Scene used when the narrator fails mid-game.
    pub fallback_scene: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_location: "The Crossroads".to_string(),
            starting_stats: Stats::default(),
            starting_inventory: Vec::new(),
            trigger_chance: DEFAULT_TRIGGER_CHANCE,
            stat_scale: DEFAULT_STAT_SCALE,
            fallback_opening_scene: FALLBACK_OPENING_SCENE.to_string(),
            fallback_scene: FALLBACK_SCENE.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting location.
    pub fn with_starting_location(mut self, location: impl Into<String>) -> Self {
        self.starting_location = location.into();
        self
    }

    /// Set the starting stats.
    pub fn with_starting_stats(mut self, stats: Stats) -> Self {
        self.starting_stats = stats;
        self
    }

    /// Set the starting inventory.
    pub fn with_starting_inventory(mut self, items: Vec<String>) -> Self {
        self.starting_inventory = items;
        self
    }

    /// Set the probability that an action triggers a check.
    pub fn with_trigger_chance(mut self, chance: f64) -> Self {
        self.trigger_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Set the stat value at which checks always succeed.
    ///
    /// Scales that are not finite and positive are ignored.
    pub fn with_stat_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.stat_scale = scale;
        }
        self
    }

    /// Set the opening scene used when the narrator fails.
    pub fn with_fallback_opening_scene(mut self, scene: impl Into<String>) -> Self {
        self.fallback_opening_scene = scene.into();
        self
    }

    /// Set the scene used when the narrator fails mid-game.
    pub fn with_fallback_scene(mut self, scene: impl Into<String>) -> Self {
        self.fallback_scene = scene.into();
        self
    }

    pub(crate) fn resolver(&self) -> CheckResolver {
        CheckResolver::new(self.trigger_chance, self.stat_scale)
    }
}

/// One resolved action. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub round: u32,
    pub action: String,
    /// The scene the action responded to.
    pub event: String,
    pub stat_used: StatName,
    pub triggered: bool,
    pub success: Option<bool>,
}

/// The authoritative state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub player_name: String,
    pub location: String,
    pub inventory: Vec<String>,
    pub stats: Stats,
    history: Vec<TurnRecord>,
    pub current_event: String,
    round: u32,
}

impl SessionState {
    /// A fresh session at round 1 with an empty history.
    pub fn new(
        player_name: impl Into<String>,
        config: &SessionConfig,
        opening_scene: impl Into<String>,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            location: config.starting_location.clone(),
            inventory: config.starting_inventory.clone(),
            stats: config.starting_stats,
            history: Vec::new(),
            current_event: opening_scene.into(),
            round: 1,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Move to the next round and return it.
    pub(crate) fn advance_round(&mut self) -> u32 {
        self.round += 1;
        self.round
    }

    /// Append a record for the current round, using the current scene as
    /// the event the action answered.
    pub(crate) fn record_turn(
        &mut self,
        action: impl Into<String>,
        stat_used: StatName,
        outcome: CheckOutcome,
    ) -> &TurnRecord {
        self.history.push(TurnRecord {
            round: self.round,
            action: action.into(),
            event: self.current_event.clone(),
            stat_used,
            triggered: outcome.triggered(),
            success: outcome.success(),
        });
        let last = self.history.len() - 1;
        &self.history[last]
    }
}
