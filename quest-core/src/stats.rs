//! Character attributes.
//!
//! Five named integer counters. `health` is the only bounded stat: it never
//! drops below zero and is the stat a failed check costs. The other four are
//! the ones player actions exercise, and they have no ceiling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a stat name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stat: {0}")]
pub struct UnknownStat(pub String);

/// The five character stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Health,
    Courage,
    Wisdom,
    Charisma,
    Luck,
}

impl StatName {
    /// Every stat, in display order.
    pub const ALL: [StatName; 5] = [
        StatName::Health,
        StatName::Courage,
        StatName::Wisdom,
        StatName::Charisma,
        StatName::Luck,
    ];

    /// Stats an action can exercise. Health is never a check target.
    pub const CHECKABLE: [StatName; 4] = [
        StatName::Courage,
        StatName::Wisdom,
        StatName::Charisma,
        StatName::Luck,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Health => "health",
            StatName::Courage => "courage",
            StatName::Wisdom => "wisdom",
            StatName::Charisma => "charisma",
            StatName::Luck => "luck",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatName {
    type Err = UnknownStat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(StatName::Health),
            "courage" => Ok(StatName::Courage),
            "wisdom" => Ok(StatName::Wisdom),
            "charisma" => Ok(StatName::Charisma),
            "luck" => Ok(StatName::Luck),
            _ => Err(UnknownStat(s.to_string())),
        }
    }
}

/// A character's stat block.
///
/// Serialises as a flat `{"health": 10, "courage": 5, ...}` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: i32,
    pub courage: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub luck: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 10,
            courage: 5,
            wisdom: 5,
            charisma: 5,
            luck: 5,
        }
    }
}

impl Stats {
    /// Current value of a stat.
    pub fn get(&self, stat: StatName) -> i32 {
        match stat {
            StatName::Health => self.health,
            StatName::Courage => self.courage,
            StatName::Wisdom => self.wisdom,
            StatName::Charisma => self.charisma,
            StatName::Luck => self.luck,
        }
    }

    /// Look a stat up by name. Unknown names read as 0 rather than failing.
    pub fn value_of(&self, name: &str) -> i32 {
        name.parse::<StatName>()
            .map(|stat| self.get(stat))
            .unwrap_or(0)
    }

    /// Add `delta` to a stat. Health is clamped at 0; nothing has a ceiling.
    pub fn adjust(&mut self, stat: StatName, delta: i32) {
        let slot = self.slot_mut(stat);
        *slot = slot.saturating_add(delta);
        if stat == StatName::Health {
            self.health = self.health.max(0);
        }
    }

    /// Iterate `(stat, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        StatName::ALL.iter().map(move |&stat| (stat, self.get(stat)))
    }

    fn slot_mut(&mut self, stat: StatName) -> &mut i32 {
        match stat {
            StatName::Health => &mut self.health,
            StatName::Courage => &mut self.courage,
            StatName::Wisdom => &mut self.wisdom,
            StatName::Charisma => &mut self.charisma,
            StatName::Luck => &mut self.luck,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(stat, value)| format!("{stat}={value}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_non_health_has_no_ceiling() {
        for stat in StatName::CHECKABLE {
            let mut stats = Stats::default();
            let before = stats.get(stat);
            stats.adjust(stat, 1);
            assert_eq!(stats.get(stat), before + 1);
        }

        let mut stats = Stats::default();
        for _ in 0..100 {
            stats.adjust(StatName::Wisdom, 1);
        }
        assert_eq!(stats.wisdom, 105);
    }

    #[test]
    fn test_health_clamped_at_zero() {
        let mut stats = Stats {
            health: 1,
            ..Stats::default()
        };
        stats.adjust(StatName::Health, -1);
        assert_eq!(stats.health, 0);
        stats.adjust(StatName::Health, -1);
        assert_eq!(stats.health, 0);
        stats.adjust(StatName::Health, -50);
        assert_eq!(stats.health, 0);
    }

    #[test]
    fn test_other_stats_can_go_negative() {
        let mut stats = Stats::default();
        stats.adjust(StatName::Luck, -7);
        assert_eq!(stats.luck, -2);
    }

    #[test]
    fn test_value_of_unknown_defaults_to_zero() {
        let stats = Stats::default();
        assert_eq!(stats.value_of("courage"), 5);
        assert_eq!(stats.value_of("  Health "), 10);
        assert_eq!(stats.value_of("strength"), 0);
        assert_eq!(stats.value_of("none"), 0);
    }

    #[test]
    fn test_stat_name_parse() {
        assert_eq!("LUCK".parse::<StatName>(), Ok(StatName::Luck));
        assert_eq!(
            "dexterity".parse::<StatName>(),
            Err(UnknownStat("dexterity".to_string()))
        );
        for stat in StatName::ALL {
            assert_eq!(stat.to_string().parse::<StatName>(), Ok(stat));
        }
    }

    #[test]
    fn test_serializes_as_name_map() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert_eq!(json["health"], 10);
        assert_eq!(json["charisma"], 5);
        assert_eq!(
            serde_json::to_value(StatName::Charisma).unwrap(),
            "charisma"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Stats::default().to_string(),
            "health=10, courage=5, wisdom=5, charisma=5, luck=5"
        );
    }
}
