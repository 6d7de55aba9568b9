//! Parsing of generator-suggested actions.
//!
//! The generator replies with one suggestion per line:
//!
//! ```text
//! 1. Climb the wall | stat: courage | a view of the valley
//! ```
//!
//! Lines without a `|` are chatter and are dropped.

use crate::stats::Stats;
use lazy_static::lazy_static;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref LIST_PREFIX: Regex = Regex::new(r"^\d+\.\s*").expect("valid list prefix regex");
}

const STAT_TAG: &str = "stat:";
const NONE: &str = "none";

/// One action the player might take next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSuggestion {
    pub action: String,
    /// Stat name as the generator wrote it, or `"none"`.
    pub stat: String,
    /// Reward description, or `"none"`.
    pub reward: String,
    /// Ten times the player's current value in `stat`; 0 when unknown.
    pub chance: i32,
}

/// Parse suggestion lines, pricing each against the player's stats.
pub fn parse_suggestions(text: &str, stats: &Stats) -> Vec<ActionSuggestion> {
    text.lines()
        .filter(|line| line.contains('|'))
        .map(|line| parse_line(line, stats))
        .collect()
}

fn parse_line(line: &str, stats: &Stats) -> ActionSuggestion {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let action = LIST_PREFIX.replace(fields[0], "").trim().to_string();

    let stat = fields
        .iter()
        .find_map(|field| {
            field
                .to_ascii_lowercase()
                .find(STAT_TAG)
                .map(|pos| field[pos + STAT_TAG.len()..].trim().to_string())
        })
        .filter(|stat| !stat.is_empty())
        .unwrap_or_else(|| NONE.to_string());

    let reward = fields
        .get(2)
        .filter(|field| !field.is_empty())
        .map(|field| field.to_string())
        .unwrap_or_else(|| NONE.to_string());

    let chance = stats.value_of(&stat).saturating_mul(10);

    ActionSuggestion {
        action,
        stat,
        reward,
        chance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> Stats {
        Stats {
            health: 8,
            courage: 6,
            wisdom: 3,
            charisma: 5,
            luck: 12,
        }
    }

    #[test]
    fn test_parse_full_lines() {
        let text = "Here are some ideas:\n\
                    1. Climb the wall | stat: courage | a view of the valley\n\
                    2. Read the inscription | stat: wisdom | ancient lore\n\
                    Good luck!";

        let suggestions = parse_suggestions(text, &stats());
        assert_eq!(suggestions.len(), 2);

        assert_eq!(suggestions[0].action, "Climb the wall");
        assert_eq!(suggestions[0].stat, "courage");
        assert_eq!(suggestions[0].reward, "a view of the valley");
        assert_eq!(suggestions[0].chance, 60);

        assert_eq!(suggestions[1].action, "Read the inscription");
        assert_eq!(suggestions[1].chance, 30);
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let suggestions = parse_suggestions("Wave hello |", &stats());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].action, "Wave hello");
        assert_eq!(suggestions[0].stat, "none");
        assert_eq!(suggestions[0].reward, "none");
        assert_eq!(suggestions[0].chance, 0);
    }

    #[test]
    fn test_unknown_stat_has_zero_chance() {
        let suggestions = parse_suggestions("3. Lift the gate | stat: strength | freedom", &stats());
        assert_eq!(suggestions[0].stat, "strength");
        assert_eq!(suggestions[0].chance, 0);
    }

    #[test]
    fn test_chance_is_not_capped() {
        let suggestions = parse_suggestions("Roll the dice | stat: luck | gold", &stats());
        assert_eq!(suggestions[0].chance, 120);
    }

    #[test]
    fn test_stat_tag_case_insensitive_and_in_any_field() {
        let suggestions =
            parse_suggestions("10. Smile warmly | a new friend | Stat: Charisma", &stats());
        assert_eq!(suggestions[0].action, "Smile warmly");
        assert_eq!(suggestions[0].stat, "Charisma");
        assert_eq!(suggestions[0].chance, 50);
        assert_eq!(suggestions[0].reward, "Stat: Charisma");
    }

    #[test]
    fn test_lines_without_separator_dropped() {
        assert!(parse_suggestions("1. Run\n2. Hide\n", &stats()).is_empty());
        assert!(parse_suggestions("", &stats()).is_empty());
    }
}
