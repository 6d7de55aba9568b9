//! Maps free-text player actions to the stat they exercise.

use crate::stats::StatName;
use rand::seq::SliceRandom;
use rand::Rng;

/// Keyword sets, checked in order. The first set with a hit wins.
const KEYWORDS: [(StatName, &[&str]); 4] = [
    (StatName::Courage, &["fight", "charge", "resist"]),
    (StatName::Wisdom, &["think", "study", "solve"]),
    (StatName::Charisma, &["charm", "talk", "convince"]),
    (StatName::Luck, &["sneak", "chance", "luck"]),
];

/// The deterministic part of classification.
///
/// Case-insensitive substring match against the keyword table; `None` when
/// nothing matches.
pub fn classify_keywords(action: &str) -> Option<StatName> {
    let action = action.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| action.contains(word)))
        .map(|(stat, _)| *stat)
}

/// Pick the stat an action exercises.
///
/// Unmatched text falls back to a uniform pick among the four checkable
/// stats, so the result is only repeatable for a fixed `rng`.
pub fn classify<R: Rng + ?Sized>(action: &str, rng: &mut R) -> StatName {
    classify_keywords(action).unwrap_or_else(|| {
        *StatName::CHECKABLE
            .choose(rng)
            .unwrap_or(&StatName::Luck)
    })
}
