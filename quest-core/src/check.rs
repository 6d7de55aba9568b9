//! Stat checks.
//!
//! A check happens in two draws. The first decides whether the action is
//! contested at all; the second, only when contested, compares against the
//! stat-derived success chance. Resolution is pure: the stat changes it
//! implies are returned as a [`StatDelta`] for the caller to apply.

use crate::stats::StatName;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Probability that an action triggers a check.
pub const DEFAULT_TRIGGER_CHANCE: f64 = 0.4;

/// Stat value that guarantees success. Chance is `stat / scale`.
pub const DEFAULT_STAT_SCALE: f64 = 10.0;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    NotTriggered,
    Succeeded,
    Failed,
}

impl CheckOutcome {
    pub fn triggered(&self) -> bool {
        !matches!(self, CheckOutcome::NotTriggered)
    }

    /// `None` when no check happened.
    pub fn success(&self) -> Option<bool> {
        match self {
            CheckOutcome::NotTriggered => None,
            CheckOutcome::Succeeded => Some(true),
            CheckOutcome::Failed => Some(false),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckOutcome::NotTriggered => "no check",
            CheckOutcome::Succeeded => "success",
            CheckOutcome::Failed => "failure",
        }
    }
}

/// A change to apply to one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: StatName,
    pub delta: i32,
}

/// Decides whether a check triggers and whether it succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckResolver {
    pub trigger_chance: f64,
    pub stat_scale: f64,
}

impl Default for CheckResolver {
    fn default() -> Self {
        Self {
            trigger_chance: DEFAULT_TRIGGER_CHANCE,
            stat_scale: DEFAULT_STAT_SCALE,
        }
    }
}

impl CheckResolver {
    pub fn new(trigger_chance: f64, stat_scale: f64) -> Self {
        Self {
            trigger_chance,
            stat_scale,
        }
    }

    /// Success probability for a stat value, clamped to [0, 1].
    pub fn success_chance(&self, stat_value: i32) -> f64 {
        if self.stat_scale.is_nan() || self.stat_scale <= 0.0 {
            return if stat_value > 0 { 1.0 } else { 0.0 };
        }
        (f64::from(stat_value) / self.stat_scale).clamp(0.0, 1.0)
    }

    /// Roll a check against `stat_value`.
    pub fn resolve<R: Rng + ?Sized>(&self, stat_value: i32, rng: &mut R) -> CheckOutcome {
        let trigger_draw: f64 = rng.gen();
        if trigger_draw >= self.trigger_chance {
            return CheckOutcome::NotTriggered;
        }

        let success_draw: f64 = rng.gen();
        if success_draw < self.success_chance(stat_value) {
            CheckOutcome::Succeeded
        } else {
            CheckOutcome::Failed
        }
    }
}

/// Stat change implied by a check outcome.
///
/// Failure costs one health. Success raises the tested stat by one, unless
/// that stat is health. No check, no change.
pub fn consequence(stat: StatName, outcome: CheckOutcome) -> Option<StatDelta> {
    match outcome {
        CheckOutcome::NotTriggered => None,
        CheckOutcome::Failed => Some(StatDelta {
            stat: StatName::Health,
            delta: -1,
        }),
        CheckOutcome::Succeeded if stat == StatName::Health => None,
        CheckOutcome::Succeeded => Some(StatDelta { stat, delta: 1 }),
    }
}
